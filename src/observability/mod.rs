//! Observability infrastructure for crash reports and debugging.
//!
//! ## Features
//!
//! - **Tracing**: `tracing` subscriber writing to stderr, driven by `-v`/`RUST_LOG`
//! - **Panic Hook**: Produces structured crash reports with context
//! - **Context Tracking**: Thread-local scan phase and file tracking
//!
//! ## Usage
//!
//! ```ignore
//! use sqlscan::observability::{install_panic_hook, init_tracing, set_phase, ScanPhase};
//!
//! fn main() {
//!     install_panic_hook();
//!     init_tracing(0);
//!     let _phase = set_phase(ScanPhase::FileDiscovery);
//!     // If a panic occurs here, the crash report shows the phase
//! }
//! ```

pub mod context;
pub mod panic_hook;
pub mod tracing;

pub use context::{
    get_current_context, set_current_file, set_phase, ContextGuard, ScanContext, ScanPhase,
};
pub use panic_hook::install_panic_hook;
pub use self::tracing::{init_tracing, level_for_verbosity};
