pub mod session;

pub use session::{Gate, SessionGate, SessionToken, SharedSecretGate, SESSION_COOKIE, SESSION_TTL};
