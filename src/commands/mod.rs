//! CLI command implementations.
//!
//! - **scan**: Extract embedded SQL from a directory, file or repository
//! - **init**: Write a default `.sqlscan.toml`

pub mod init;
pub mod scan;

pub use init::init_config;
pub use scan::{handle_scan, ScanConfig};
