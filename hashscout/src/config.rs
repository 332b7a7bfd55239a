use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::hasher::HashAlgorithm;

/// Configuration for one preimage search.
///
/// Can be loaded from YAML config files in order of precedence:
/// 1. Custom config file passed explicitly
/// 2. Local `.hashscout.yaml` in the current directory
/// 3. Global `$CONFIG_DIR/hashscout/config.yaml`
///
/// Example:
/// ```yaml
/// # Target digest (hex) and its algorithm
/// target: "5d41402abc4b2a76b9719d911017c592"
/// algorithm: "md5"
///
/// # Longest candidate the brute-force phase will try
/// max_length: 4
///
/// # Phases to run
/// dictionary: true
/// brute_force: true
///
/// # Thread count (default: CPU cores)
/// thread_count: 4
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// CLI arguments take precedence over config file values; the merging
/// behavior is defined in `merge_with_cli`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Hex digest to find a preimage for
    #[serde(default)]
    pub target: String,

    /// Declared algorithm of the target digest
    #[serde(default = "default_algorithm")]
    pub algorithm: HashAlgorithm,

    /// Maximum candidate length for the brute-force phase
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Number of worker threads
    /// Defaults to number of CPU cores if not specified
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Whether to run the dictionary phase
    #[serde(default = "default_true")]
    pub dictionary: bool,

    /// Whether to run the brute-force phase
    #[serde(default = "default_true")]
    pub brute_force: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_algorithm() -> HashAlgorithm {
    HashAlgorithm::Sha256
}

fn default_max_length() -> usize {
    4
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            algorithm: default_algorithm(),
            max_length: default_max_length(),
            thread_count: default_thread_count(),
            dictionary: true,
            brute_force: true,
            log_level: default_log_level(),
        }
    }
}

impl SearchConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Default config locations
        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("hashscout/config.yaml")),
            // Local config
            Some(PathBuf::from(".hashscout.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        // Add existing config files
        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // Build and deserialize
        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: SearchConfig) -> Self {
        // CLI values take precedence over config file values
        if !cli_config.target.is_empty() {
            self.target = cli_config.target;
            self.algorithm = cli_config.algorithm;
        }
        if cli_config.max_length != default_max_length() {
            self.max_length = cli_config.max_length;
        }
        if !cli_config.dictionary {
            self.dictionary = false;
        }
        if !cli_config.brute_force {
            self.brute_force = false;
        }
        // Always use CLI thread count if specified
        self.thread_count = cli_config.thread_count;
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }
}
