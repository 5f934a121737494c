pub mod seed;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::BoardConfig;
use crate::storage::StoreBackend;

#[derive(Parser, Debug)]
#[command(name = "feedback-board", version, about = "Public feedback board with admin moderation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCmd>,

    /// TOML file with board settings; flags override it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, global = true)]
    pub listen_addr: Option<String>,
    #[arg(long, global = true, value_enum)]
    pub storage: Option<StoreBackend>,
    /// sled directory for the on-disk backend
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,
    /// Shared admin secret (falls back to ADMIN_PASSWORD)
    #[arg(long, global = true)]
    pub admin_password: Option<String>,
    /// Mark the session cookie Secure
    #[arg(long, global = true)]
    pub secure_cookie: bool,
    /// Ask public name services for nicknames
    #[arg(long, global = true)]
    pub remote_profiles: bool,
    /// Comma-separated allowed origins
    #[arg(long, global = true, value_delimiter = ',')]
    pub cors_origins: Vec<String>,
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCmd {
    /// Run the HTTP server (default)
    Serve,
    /// Insert random sample comments
    Seed {
        #[arg(long, default_value_t = 20)]
        count: usize,
    },
}

impl Cli {
    pub fn command(&self) -> CliCmd {
        self.command.clone().unwrap_or(CliCmd::Serve)
    }

    pub fn merge_into_config(&self, mut cfg: BoardConfig) -> BoardConfig {
        if let Some(v) = &self.listen_addr {
            cfg.listen_addr = v.clone();
        }
        if let Some(v) = self.storage {
            cfg.storage = v;
        }
        if let Some(v) = &self.db_path {
            cfg.db_path = v.clone();
        }
        if let Some(v) = &self.admin_password {
            cfg.admin_password = Some(v.clone());
        }
        if self.secure_cookie {
            cfg.secure_cookie = true;
        }
        if self.remote_profiles {
            cfg.remote_profiles = true;
        }
        if !self.cors_origins.is_empty() {
            cfg.cors_origins = self.cors_origins.clone();
        }
        if let Some(v) = &self.log_level {
            cfg.log_level = v.clone();
        }
        cfg
    }
}
