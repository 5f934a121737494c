use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::cli::Cli;
use crate::storage::StoreBackend;

pub const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid config {}: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub listen_addr: String,
    pub storage: StoreBackend,
    pub db_path: PathBuf,
    pub admin_password: Option<String>,
    pub secure_cookie: bool,
    pub remote_profiles: bool,
    /// Allowed CORS origins; empty allows any.
    pub cors_origins: Vec<String>,
    pub log_level: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            storage: StoreBackend::Sled,
            db_path: PathBuf::from("feedback-board.db"),
            admin_password: None,
            secure_cookie: false,
            remote_profiles: false,
            cors_origins: Vec::new(),
            log_level: "info".to_string(),
        }
    }
}

impl fmt::Debug for BoardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardConfig")
            .field("listen_addr", &self.listen_addr)
            .field("storage", &self.storage)
            .field("db_path", &self.db_path)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<set>"))
            .field("secure_cookie", &self.secure_cookie)
            .field("remote_profiles", &self.remote_profiles)
            .field("cors_origins", &self.cors_origins)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl BoardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Defaults, then the `--config` file, then flags, then the environment
    /// for a secret that is still unset.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        Self::resolve(cli, |key| std::env::var(key).ok())
    }

    pub fn resolve(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let mut cfg = cli.merge_into_config(base);
        if cfg.admin_password.is_none() {
            cfg.admin_password = env(ADMIN_PASSWORD_ENV).filter(|v| !v.is_empty());
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_file_or_flags() {
        let cli = Cli::parse_from(["feedback-board"]);
        let cfg = BoardConfig::resolve(&cli, no_env).unwrap();
        assert_eq!(cfg, BoardConfig::default());
        assert_eq!(cfg.listen_addr, "0.0.0.0:3000");
        assert_eq!(cfg.storage, StoreBackend::Sled);
    }

    #[test]
    fn file_then_flags_then_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "listen_addr = \"127.0.0.1:8080\"\nstorage = \"sled\"\nremote_profiles = true\ncors_origins = [\"https://a.example\"]"
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let cli = Cli::parse_from(["feedback-board", "--config", path, "--listen-addr", "127.0.0.1:9000"]);
        let cfg = BoardConfig::resolve(&cli, |_| Some("from-env".to_string())).unwrap();
        assert_eq!(cfg.listen_addr, "127.0.0.1:9000");
        assert_eq!(cfg.storage, StoreBackend::Sled);
        assert!(cfg.remote_profiles);
        assert_eq!(cfg.cors_origins, vec!["https://a.example".to_string()]);
        assert_eq!(cfg.admin_password.as_deref(), Some("from-env"));

        let cli = Cli::parse_from(["feedback-board", "--config", path, "--admin-password", "flag"]);
        let cfg = BoardConfig::resolve(&cli, |_| Some("from-env".to_string())).unwrap();
        assert_eq!(cfg.admin_password.as_deref(), Some("flag"));
    }

    #[test]
    fn unknown_file_is_an_error() {
        let cli = Cli::parse_from(["feedback-board", "--config", "/definitely/not/here.toml"]);
        assert!(matches!(BoardConfig::resolve(&cli, no_env), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn debug_hides_password() {
        let cfg = BoardConfig { admin_password: Some("hunter2".into()), ..Default::default() };
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }
}
