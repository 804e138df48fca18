use error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub mod error;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub network: NetworkConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NetworkConfig {
    /// Local address to bind the UDP socket to.
    pub listen: String,
    /// Remote address to actively send to. When unset, the demo just echoes
    /// to whoever it last heard from.
    pub peer: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionConfig {
    pub conv: u32,
    pub mtu: usize,
    pub interval: u32,
    pub nodelay: bool,
    pub fastresend: u32,
    pub nocwnd: bool,
    pub snd_wnd: u16,
    pub rcv_wnd: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:29900".to_string(),
            peer: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            conv: 1,
            mtu: 1400,
            interval: 100,
            nodelay: false,
            fastresend: 0,
            nocwnd: false,
            snd_wnd: 32,
            rcv_wnd: 32,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if SocketAddr::from_str(&self.network.listen).is_err() {
            return Err(ConfigError::Validation {
                reason: format!(
                    "Invalid listen address '{}'. Expected format like 'IP:PORT'.",
                    self.network.listen
                ),
            });
        }

        if let Some(peer) = &self.network.peer {
            if SocketAddr::from_str(peer).is_err() {
                return Err(ConfigError::Validation {
                    reason: format!(
                        "Invalid peer address '{}'. Expected format like 'IP:PORT'.",
                        peer
                    ),
                });
            }
        }

        if self.session.mtu < 50 {
            return Err(ConfigError::Validation {
                reason: format!("session.mtu must be at least 50, got {}", self.session.mtu),
            });
        }

        if self.session.snd_wnd == 0 || self.session.rcv_wnd == 0 {
            return Err(ConfigError::Validation {
                reason: "session.snd_wnd and session.rcv_wnd must be nonzero".to_string(),
            });
        }

        Ok(())
    }
}

pub fn handle() -> Result<Config, ConfigError> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    if config_path.exists() {
        let config_content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
            path: config_path.display().to_string(),
            source,
        })?;
        let config: Config =
            toml::from_str(&config_content).map_err(|source| ConfigError::TomlDeserialization {
                path: config_path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    } else {
        let config = Config::default();
        save(&config, &config_path)?;
        Ok(config)
    }
}

fn save(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let config_content = toml::to_string_pretty(config).map_err(|source| ConfigError::TomlSerialization {
        path: path.display().to_string(),
        source,
    })?;
    let mut file = fs::File::create(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    file.write_all(config_content.as_bytes())
        .map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
    Ok(())
}
