use log::warn;

use crate::board::Board;
use crate::config::BoardConfig;
use crate::profile::ProfileGenerator;

#[derive(Clone)]
pub struct AppState {
    pub board: Board,
    pub profiles: ProfileGenerator,
    pub secure_cookie: bool,
}

impl AppState {
    pub fn new(board: Board, profiles: ProfileGenerator, secure_cookie: bool) -> Self {
        Self { board, profiles, secure_cookie }
    }

    pub fn from_config(board: Board, config: &BoardConfig) -> Self {
        let profiles = if config.remote_profiles {
            ProfileGenerator::remote().unwrap_or_else(|e| {
                warn!("remote profile client unavailable ({e}), using local profiles");
                ProfileGenerator::local()
            })
        } else {
            ProfileGenerator::local()
        };
        Self::new(board, profiles, config.secure_cookie)
    }
}
