// Configuration management for the folio server
//
// Cross-platform config stored in:
// - macOS: ~/Library/Application Support/folio/config.json
// - Linux: ~/.config/folio/config.json
// - Windows: %APPDATA%\folio\config.json

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server binds to
    pub listen_addr: String,

    /// Port the HTTP server listens on
    pub listen_port: u16,

    /// Directory holding the built single-page app
    pub public_dir: String,

    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,

    /// Write daily rolling log files here in addition to stderr
    pub log_dir: Option<String>,

    /// Contact message store settings
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of messages kept in memory (0 = unbounded)
    pub max_messages: usize,

    /// Largest accepted contact form body in bytes
    pub max_body_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 5000,
            public_dir: "dist/public".to_string(),
            log_level: "info".to_string(),
            log_dir: None,
            store: StoreConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_messages: 10_000,
            max_body_bytes: 16 * 1024,
        }
    }
}

impl Config {
    /// Get the config directory path (cross-platform)
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("folio");

        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file()?)
    }

    /// Load config from `path`, writing defaults there if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
            let config: Config =
                serde_json::from_str(&contents).context("Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    /// Socket address the server should bind to
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid listen address: {}", self.listen_addr))?;
        Ok(SocketAddr::new(ip, self.listen_port))
    }

    /// Message cap for the store, `None` when unbounded
    pub fn message_limit(&self) -> Option<usize> {
        match self.store.max_messages {
            0 => None,
            n => Some(n),
        }
    }

    /// Set a config value. Does not persist; call `save` afterwards.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "listen_addr" => {
                value
                    .parse::<IpAddr>()
                    .context("Invalid IP address")?;
                self.listen_addr = value.to_string();
            }
            "listen_port" => {
                self.listen_port = value.parse().context("Invalid port number")?;
            }
            "public_dir" => {
                if value.is_empty() {
                    anyhow::bail!("public_dir cannot be empty");
                }
                self.public_dir = value.to_string();
            }
            "log_level" => {
                tracing_subscriber::EnvFilter::try_new(value).context("Invalid log filter")?;
                self.log_level = value.to_string();
            }
            "log_dir" => {
                self.log_dir = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "max_messages" => {
                self.store.max_messages = value.parse().context("Invalid number")?;
            }
            "max_body_bytes" => {
                self.store.max_body_bytes = value.parse().context("Invalid number")?;
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Get a config value
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "listen_addr" => Some(self.listen_addr.clone()),
            "listen_port" => Some(self.listen_port.to_string()),
            "public_dir" => Some(self.public_dir.clone()),
            "log_level" => Some(self.log_level.clone()),
            "log_dir" => self.log_dir.clone(),
            "max_messages" => Some(self.store.max_messages.to_string()),
            "max_body_bytes" => Some(self.store.max_body_bytes.to_string()),
            _ => None,
        }
    }

    /// List all config values
    pub fn list(&self) -> Vec<(String, String)> {
        vec![
            ("listen_addr".to_string(), self.listen_addr.clone()),
            ("listen_port".to_string(), self.listen_port.to_string()),
            ("public_dir".to_string(), self.public_dir.clone()),
            ("log_level".to_string(), self.log_level.clone()),
            (
                "log_dir".to_string(),
                self.log_dir.clone().unwrap_or_else(|| "(stderr only)".to_string()),
            ),
            (
                "max_messages".to_string(),
                match self.message_limit() {
                    Some(n) => n.to_string(),
                    None => "unbounded".to_string(),
                },
            ),
            ("max_body_bytes".to_string(), self.store.max_body_bytes.to_string()),
        ]
    }
}
