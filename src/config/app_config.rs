use crate::error::ConfigError;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub capture: CaptureConfig,
    pub sflow: SflowConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub enabled: bool,
    // 未設定なら起動時に選択する
    pub interface: Option<String>,
    pub buffer_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SflowConfig {
    pub enabled: bool,
    pub listen_addr: SocketAddr,
    pub buffer_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub file: PathBuf,
    pub level: String,
}

impl LogConfig {
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.level).unwrap_or(LevelFilter::Info)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Parse {
            key: key.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // .env は任意
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let level: String = parse_or(&lookup, "LOG_LEVEL", "info".to_string())?;
        if LevelFilter::from_str(&level).is_err() {
            return Err(ConfigError::Parse {
                key: "LOG_LEVEL".to_string(),
                value: level,
            });
        }

        Ok(Self {
            capture: CaptureConfig {
                enabled: parse_or(&lookup, "CAPTURE_ENABLED", true)?,
                interface: lookup("CAPTURE_INTERFACE").filter(|name| !name.trim().is_empty()),
                buffer_size: parse_or(&lookup, "CAPTURE_BUFFER_SIZE", 65535)?,
            },
            sflow: SflowConfig {
                enabled: parse_or(&lookup, "SFLOW_ENABLED", true)?,
                listen_addr: parse_or(&lookup, "SFLOW_LISTEN_ADDR", SocketAddr::from(([0, 0, 0, 0], 6343)))?,
                buffer_size: parse_or(&lookup, "SFLOW_BUFFER_SIZE", 65535)?,
            },
            log: LogConfig {
                file: parse_or(&lookup, "LOG_FILE", PathBuf::from("application.log"))?,
                level,
            },
        })
    }

    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            capture: CaptureConfig {
                enabled: false,
                interface: None,
                buffer_size: 4096,
            },
            sflow: SflowConfig {
                enabled: true,
                listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
                buffer_size: 4096,
            },
            log: LogConfig {
                file: PathBuf::from("test.log"),
                level: "debug".to_string(),
            },
        }
    }
}
