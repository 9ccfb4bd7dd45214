//! Config - 環境変数からの設定読み込み
//!
//! | 変数                          | 既定値 |
//! |-------------------------------|--------|
//! | `READCONTENT_PORT`            | 80     |
//! | `DATABASE_URL`                | (必須) |
//! | `READCONTENT_MAX_CONNECTIONS` | 5      |

use std::{env, fmt::Display, str::FromStr};

use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    Missing(&'static str),

    #[error("invalid {key} value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// テスト用: 任意の lookup から読む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load(&lookup, "READCONTENT_PORT", "80")?,
            database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            max_connections: try_load(&lookup, "READCONTENT_MAX_CONNECTIONS", "5")?,
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
