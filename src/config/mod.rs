// Configuration for sqlscan, read from `.sqlscan.toml`
mod core;
mod loader;
mod recognizer;

pub use self::core::{FormatsConfig, IgnoreConfig, OutputConfig, SqlscanConfig};
pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_and_validate_config,
    CONFIG_FILE_NAME,
};
pub use recognizer::{default_min_length, RecognizerConfig};
