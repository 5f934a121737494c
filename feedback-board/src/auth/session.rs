use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use log::{info, warn};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::clock::SharedClock;
use crate::core::errors::{BoardError, BoardResult};

/// Name of the cookie carrying the admin session.
pub const SESSION_COOKIE: &str = "admin_session";
/// Sessions expire this long after login; activity does not extend them.
pub const SESSION_TTL: Duration = Duration::from_secs(8 * 60 * 60);

/// Opaque bearer credential issued by a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    value: String,
    expires_at: u64,
}

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Expiry in milliseconds since the Unix epoch.
    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken").field("value", &"<redacted>").field("expires_at", &self.expires_at).finish()
    }
}

/// The single admin identity. Implementations decide where the session lives.
pub trait SessionGate: Send + Sync {
    fn login(&self, supplied: &str) -> BoardResult<SessionToken>;
    /// Invalidates `token` if it is the live session. Always succeeds.
    fn logout(&self, token: Option<&str>);
    fn verify(&self, token: Option<&str>) -> bool;
}

pub type Gate = Arc<dyn SessionGate>;

struct ActiveSession {
    token: String,
    expires_at: u64,
}

/// Compares logins against one configured secret and keeps the issued
/// session in process memory. A new login replaces the previous session.
pub struct SharedSecretGate {
    secret: Option<String>,
    clock: SharedClock,
    session: Mutex<Option<ActiveSession>>,
}

impl SharedSecretGate {
    pub fn new(secret: Option<String>, clock: SharedClock) -> Self {
        Self { secret: secret.filter(|s| !s.is_empty()), clock, session: Mutex::new(None) }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

fn new_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    faster_hex::hex_string(&bytes)
}

impl SessionGate for SharedSecretGate {
    fn login(&self, supplied: &str) -> BoardResult<SessionToken> {
        let Some(secret) = &self.secret else {
            return Err(BoardError::SecretNotConfigured);
        };
        if digest(supplied) != digest(secret) {
            warn!("admin login rejected");
            return Err(BoardError::Unauthorized);
        }
        let token = new_token();
        let expires_at = self.clock.now_ms() + SESSION_TTL.as_millis() as u64;
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        if session.is_some() {
            info!("admin login replaces the previous session");
        }
        *session = Some(ActiveSession { token: token.clone(), expires_at });
        info!("admin session issued, expires_at={expires_at}");
        Ok(SessionToken { value: token, expires_at })
    }

    fn logout(&self, token: Option<&str>) {
        let Some(token) = token else { return };
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        if session.as_ref().is_some_and(|s| s.token == token) {
            *session = None;
            info!("admin session closed");
        }
    }

    fn verify(&self, token: Option<&str>) -> bool {
        let Some(token) = token else { return false };
        let now = self.clock.now_ms();
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        match session.as_ref() {
            Some(active) if now >= active.expires_at => {
                *session = None;
                info!("admin session expired");
                false
            }
            Some(active) => active.token == token,
            None => false,
        }
    }
}
