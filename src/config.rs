//! Server configuration
//!
//! Settings come from an optional JSON file named by `RECORD_SERVER_CONFIG`,
//! then environment overrides.

use crate::utils::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "RECORD_SERVER_CONFIG";
pub const BIND_ENV: &str = "RECORD_SERVER_BIND";
pub const RECORDS_ENV: &str = "RECORD_SERVER_RECORDS";

const DEFAULT_BIND: &str = "127.0.0.1:8085";
const DEFAULT_RECORDS_PATH: &str = "records.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// JSON file the record store is loaded from
    pub records_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8085)),
            records_path: PathBuf::from(DEFAULT_RECORDS_PATH),
        }
    }
}

/// On-disk form; every key is optional
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    bind: Option<String>,
    records_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Load from the process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the environment
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match lookup(CONFIG_ENV).filter(|v| !v.trim().is_empty()) {
            Some(path) => read_config_file(Path::new(&path))?,
            None => ConfigFile::default(),
        };

        let bind = lookup(BIND_ENV)
            .filter(|v| !v.trim().is_empty())
            .or(file.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr: SocketAddr = bind
            .parse()
            .map_err(|e| AppError::Config(format!("invalid bind address '{}': {}", bind, e)))?;

        let records_path = lookup(RECORDS_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or(file.records_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORDS_PATH));

        Ok(Self {
            bind_addr,
            records_path,
        })
    }
}

fn read_config_file(path: &Path) -> AppResult<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {:?}: {}", path, e)))?;

    serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("invalid config file {:?}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    fn lookup_from(vars: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND);
    }

    #[test]
    fn test_env_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            (BIND_ENV, "0.0.0.0:9000".to_string()),
            (RECORDS_ENV, "/var/lib/rec/records.json".to_string()),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(
            config.records_path,
            PathBuf::from("/var/lib/rec/records.json")
        );
    }

    #[test]
    fn test_config_file_then_env() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("server.json");
        fs::write(
            &path,
            r#"{ "bind": "127.0.0.1:7000", "recordsPath": "/srv/records.json" }"#,
        )
        .unwrap();

        let config = ServerConfig::from_lookup(lookup_from(&[(
            CONFIG_ENV,
            path.to_string_lossy().into_owned(),
        )]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 7000);
        assert_eq!(config.records_path, PathBuf::from("/srv/records.json"));

        let config = ServerConfig::from_lookup(lookup_from(&[
            (CONFIG_ENV, path.to_string_lossy().into_owned()),
            (BIND_ENV, "127.0.0.1:7001".to_string()),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 7001);
        assert_eq!(config.records_path, PathBuf::from("/srv/records.json"));
    }

    #[test]
    fn test_invalid_bind() {
        let result = ServerConfig::from_lookup(lookup_from(&[(BIND_ENV, "nowhere".to_string())]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_unreadable_config_file() {
        let dir = tempdir().unwrap();
        let result = ServerConfig::from_lookup(lookup_from(&[(
            CONFIG_ENV,
            dir.path().join("missing.json").to_string_lossy().into_owned(),
        )]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
