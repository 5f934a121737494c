//! Public feedback board: anonymous comments, a single shared-secret admin
//! session, and moderation (status, reply, soft delete) behind it.

pub mod api;
pub mod auth;
pub mod board;
pub mod cli;
pub mod clock;
pub mod config;
pub mod core;
pub mod profile;
pub mod storage;

pub use board::Board;
pub use config::BoardConfig;
