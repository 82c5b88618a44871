//! Configuration file loading for footing-quorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `FOOTING_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./footing.toml` or `./.footing.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/footing-quorum/config.toml`
//! 5. Default values
//!
//! Command-line flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    FileAgentProfile, FileBatchConfig, FileConfig, FileConsensusConfig, FileLoggingConfig,
    FileOutputConfig, FilePathsConfig, FileProviderConfig, resolve_profiles,
};
pub use loader::ConfigLoader;
