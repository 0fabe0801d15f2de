//! Phloem configuration file handling
//!
//! Provides default configuration generation and loading for the operator
//! binary. Configuration files are TOML format.
//!
//! The `[governance]` section maps directly to `GovernanceConfig`: the
//! quorum stays a fixed constant for the lifetime of the engine, so the
//! config file is the only place a deployment can specify a different one.

use phloem::governance::GovernanceConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Operator configuration for the phloem binary.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PhloemConfig {
    /// Governance parameters handed to the engine at startup.
    #[serde(default)]
    pub governance: GovernanceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl PhloemConfig {
    /// Load configuration from a TOML file.
    ///
    /// Governance parameters are validated here so a bad file fails at
    /// startup rather than at the first vote.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: PhloemConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        config
            .governance
            .validate()
            .map_err(|e| format!("Invalid config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(path, contents)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        Ok(())
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml() -> String {
        r#"# Phloem Operator Configuration
#
# The [governance] section is handed to the engine at startup and is fixed
# for the lifetime of the process. The quorum is a total-vote count,
# independent of how many members exist: a proposal resolves on the vote
# that reaches it.

[governance]
# Total votes required to resolve a proposal (strict majority decides;
# a tie at an even quorum rejects).
quorum = 3

[logging]
# Log level: trace, debug, info, warn, error
level = "info"
"#
        .to_string()
    }

    /// Create and save a default configuration file
    pub fn create_default(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = Self::generate_default_toml();

        // Create parent directory if needed
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(config_path, contents).map_err(|e| {
            format!(
                "Failed to write config file '{}': {}",
                config_path.display(),
                e
            )
        })?;

        Ok(())
    }
}

/// Get the default config file path.
///
/// - Config: `<user config dir>/phloem/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("phloem")
        .join("config.toml")
}
