//! Configuration management for the voting server
//!
//! Loads settings from an optional `config.toml` with `VOTE_*` environment
//! overrides, falling back to built-in defaults. The option set is part of
//! the configuration because it is fixed for the lifetime of the process;
//! no protocol command can alter it.

use config::{Config, Environment, File};
use serde::Deserialize;

/// Server configuration, loaded once at startup.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// IP address to bind the listener
    pub bind_address: String,

    /// Port for client connections
    pub port: u16,

    /// Maximum concurrent client sessions
    pub max_clients: usize,

    /// Maximum accepted input line length in bytes
    pub max_command_length: usize,

    /// The fixed set of options clients vote among
    pub options: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 12345,
            max_clients: 32,
            max_command_length: 512,
            options: vec![
                "Option A".to_string(),
                "Option B".to_string(),
                "Option C".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    /// Load configuration from config.toml (if present) with environment
    /// overrides, then validate.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("VOTE").separator("__"))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Get bind address and port as a socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.max_command_length == 0 {
            return Err(config::ConfigError::Message(
                "max_command_length must be greater than 0".into(),
            ));
        }

        if self.options.is_empty() {
            return Err(config::ConfigError::Message(
                "options cannot be empty".into(),
            ));
        }

        for option in &self.options {
            // Options appear inside "RESULTS:<opt>:<count>;..." lines, so
            // the framing characters cannot appear in an option name.
            if option.trim().is_empty() {
                return Err(config::ConfigError::Message(
                    "option names cannot be blank".into(),
                ));
            }
            if option.contains([':', ';', '|', '\r', '\n']) {
                return Err(config::ConfigError::Message(format!(
                    "option name {:?} contains protocol framing characters",
                    option
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for option in &self.options {
            if !seen.insert(option.as_str()) {
                return Err(config::ConfigError::Message(format!(
                    "duplicate option name {:?}",
                    option
                )));
            }
        }

        Ok(())
    }
}
