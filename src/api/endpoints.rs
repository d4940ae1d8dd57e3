// src/api/endpoints.rs
//
// Typed bindings for the backend routes this client consumes.

use super::{ApiClient, ApiError, HistoryRecord, LoginReply, LoginRequest, Method, ScrapeRequest,
            ScrapeResult, SignUpRequest, StatusReply};
use crate::session::Session;

pub const PATH_LOGIN: &str = "/login";
pub const PATH_SIGN_UP: &str = "/sign-up";
pub const PATH_SCRAPE: &str = "/scrape";
pub const PATH_AUTH: &str = "/auth";
pub const PATH_HISTORY: &str = "/history";

pub const HISTORY_TOKEN_REJECTED: &str = "Failed to load history: Token validation failed";
pub const NO_HISTORY: &str = "No scraping history found.";

impl ApiClient {
    pub fn login(&self, req: &LoginRequest, session: &Session) -> Result<LoginReply, ApiError> {
        self.post(PATH_LOGIN, req, session)
    }

    /// Registration only; does not log the user in.
    pub fn sign_up(&self, req: &SignUpRequest, session: &Session) -> Result<StatusReply, ApiError> {
        self.post(PATH_SIGN_UP, req, session)
    }

    pub fn scrape(&self, req: &ScrapeRequest, session: &Session) -> Result<ScrapeResult, ApiError> {
        self.post(PATH_SCRAPE, req, session)
    }

    /// Cheap token check. Any 2xx means the token is accepted.
    pub fn check_auth(&self, session: &Session) -> Result<(), ApiError> {
        self.request_text(Method::Get, PATH_AUTH, None, session).map(|_| ())
    }

    pub fn history(&self, session: &Session) -> Result<Vec<HistoryRecord>, ApiError> {
        self.get(PATH_HISTORY, session)
    }

    /// Token check, then the list. `/history` is not asked for if the check fails.
    /// Errors come back as the text to show.
    pub fn load_history(&self, session: &Session) -> Result<Vec<HistoryRecord>, String> {
        if let Err(e) = self.check_auth(session) {
            logw!("History: token check failed: {e}");
            return Err(s!(HISTORY_TOKEN_REJECTED));
        }
        self.history(session).map_err(|e| {
            let detail = e.backend.unwrap_or(e.message);
            format!("Failed to load history: {detail}")
        })
    }
}
