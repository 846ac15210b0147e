//! Shared application state.

use std::sync::Arc;

use axum_extra::extract::cookie::CookieJar;
use postboard_core::{AdminIdentity, AppConfig, Board, BoardDb, SessionKeys};

/// Name of the cookie carrying the admin session.
pub const SESSION_COOKIE: &str = "token";

#[derive(Clone)]
pub struct AppState {
    pub board: Arc<Board>,
    pub db: BoardDb,
    pub sessions: SessionKeys,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: BoardDb, config: AppConfig) -> Self {
        let sessions = match &config.jwt_secret {
            Some(secret) => SessionKeys::new(secret.as_bytes(), config.session_ttl()),
            None => SessionKeys::random(config.session_ttl()),
        };
        let board = Arc::new(Board::new(Arc::new(db.clone())));
        Self { board, db, sessions, config: Arc::new(config) }
    }

    /// Admin identity from the session cookie, if it verifies.
    pub fn admin(&self, jar: &CookieJar) -> Option<AdminIdentity> {
        jar.get(SESSION_COOKIE)
            .and_then(|cookie| self.sessions.verify(cookie.value()))
    }
}
