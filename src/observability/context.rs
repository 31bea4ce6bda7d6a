//! Thread-local context tracking for crash reports.
//!
//! Records the scan phase and the file being processed on the current
//! thread. Each rayon worker has its own context, and nothing here ever feeds
//! into scan results.

use std::cell::RefCell;
use std::path::PathBuf;

thread_local! {
    static CURRENT_CONTEXT: RefCell<ScanContext> = const { RefCell::new(ScanContext::new()) };
}

/// Context snapshot for the current thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanContext {
    pub phase: Option<ScanPhase>,
    pub current_file: Option<PathBuf>,
}

impl ScanContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_file: None,
        }
    }
}

/// Major stages of a scan, used to tell where a crash happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// Cloning a remote repository
    Acquisition,
    /// Walking the source tree
    FileDiscovery,
    /// Segmenting, recognizing and normalizing one file
    Extraction,
    /// Writing records and the summary
    OutputGeneration,
}

impl std::fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Acquisition => write!(f, "acquisition"),
            Self::FileDiscovery => write!(f, "file_discovery"),
            Self::Extraction => write!(f, "extraction"),
            Self::OutputGeneration => write!(f, "output_generation"),
        }
    }
}

/// RAII guard restoring the previous context on drop, so a file guard can
/// nest inside a phase guard.
pub struct ContextGuard {
    previous: ScanContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

/// Set the current scan phase until the guard drops.
#[must_use]
pub fn set_phase(phase: ScanPhase) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().phase = Some(phase);
        ContextGuard { previous }
    })
}

/// Set the file being scanned until the guard drops.
///
/// # Example
///
/// ```ignore
/// for file in files {
///     let _file_guard = set_current_file(&file.path);
///     extract(&file);
/// }
/// ```
#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().current_file = Some(path.into());
        ContextGuard { previous }
    })
}

/// Called by the panic hook to include context in crash reports.
#[must_use]
pub fn get_current_context() -> ScanContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}
