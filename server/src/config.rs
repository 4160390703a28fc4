//! Configuration for the lotto server.
//!
//! Every value except the database URL has a compile-time default and can be
//! overridden at runtime via a dedicated environment variable:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `LOTTO_DB_DSN` | required |
//! | `LOTTO_LISTEN_ADDR` | `0.0.0.0:8080` |
//! | `LOTTO_UPLOAD_DIR` | `var/ticket-photos` |
//! | `LOTTO_PLACEHOLDER_USER_ID` | `1` |
//! | `LOTTO_MAX_UPLOAD_BYTES` | `10485760` (10 MiB) |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const DATABASE_URL_VAR: &str = "LOTTO_DB_DSN";
pub const LISTEN_ADDR_VAR: &str = "LOTTO_LISTEN_ADDR";
pub const UPLOAD_DIR_VAR: &str = "LOTTO_UPLOAD_DIR";
pub const PLACEHOLDER_USER_ID_VAR: &str = "LOTTO_PLACEHOLDER_USER_ID";
pub const MAX_UPLOAD_BYTES_VAR: &str = "LOTTO_MAX_UPLOAD_BYTES";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPLOAD_DIR: &str = "var/ticket-photos";

/// Owner id stamped on every ticket until real authentication exists.
const DEFAULT_PLACEHOLDER_USER_ID: i64 = 1;

/// Cap on the whole photo-upload request body.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 << 20;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("LOTTO_DB_DSN is not set")]
    MissingDatabaseUrl,
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime settings, passed explicitly into the HTTP state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub upload_dir: PathBuf,
    pub placeholder_user_id: i64,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// A config with every default and the given database URL.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            placeholder_user_id: DEFAULT_PLACEHOLDER_USER_ID,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let listen_addr = parse_or(
            LISTEN_ADDR_VAR,
            lookup(LISTEN_ADDR_VAR).unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
        )?;

        let upload_dir = lookup(UPLOAD_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let placeholder_user_id = match lookup(PLACEHOLDER_USER_ID_VAR) {
            Some(v) => parse_or(PLACEHOLDER_USER_ID_VAR, v)?,
            None => DEFAULT_PLACEHOLDER_USER_ID,
        };

        let max_upload_bytes = match lookup(MAX_UPLOAD_BYTES_VAR) {
            Some(v) => parse_or(MAX_UPLOAD_BYTES_VAR, v)?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            database_url,
            listen_addr,
            upload_dir,
            placeholder_user_id,
            max_upload_bytes,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}
