//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! All settings have defaults matching the original deployment (listen on
//! `0.0.0.0:8000`, four player slots), so a missing config file is not an
//! error.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::{PartyPadError, Result};
use crate::session::DEFAULT_MAX_PLAYERS;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub players: PlayerConfig,
}

/// HTTP/WebSocket listener configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory the phone controller page is served from.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Player slot configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PlayerConfig {
    #[serde(default = "default_max_players")]
    pub max_players: u8,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_max_players() -> u8 {
    DEFAULT_MAX_PLAYERS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_players: default_max_players(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            players: PlayerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be parsed or validated.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            return Err(PartyPadError::Config(toml::de::Error::custom(
                "server host cannot be empty",
            )));
        }

        if self.server.port == 0 {
            return Err(PartyPadError::Config(toml::de::Error::custom(
                "server port cannot be 0",
            )));
        }

        if self.players.max_players == 0 || self.players.max_players > 16 {
            return Err(PartyPadError::Config(toml::de::Error::custom(
                "max_players must be between 1 and 16",
            )));
        }

        Ok(())
    }
}
