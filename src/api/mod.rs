// src/api/mod.rs
//
// HTTP client wrapper around the backend. No retries, no backoff, no hidden
// default headers: every request gets its headers from the session snapshot
// passed in by the caller.

pub mod endpoints;
pub mod transport;
pub mod types;

use std::{fmt::Display, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{config::AppOptions, session::Session};

pub use transport::{Accept, ApiRequest, ApiResponse, HttpTransport, Transport};
pub use types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Normalized failure: transport error, non-2xx, or an undecodable 2xx body.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    /// HTTP status, when there was a response at all.
    pub status: Option<u16>,
    /// Structured error text the backend put in the body, if any.
    pub backend: Option<String>,
}

impl ApiError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self { message: msg.into(), status: None, backend: None }
    }

    pub fn from_response(resp: &ApiResponse) -> Self {
        let backend = structured_error(&resp.body);
        let message = match &backend {
            Some(text) => format!("HTTP {}: {}", resp.status, text),
            None => format!("HTTP {}", resp.status),
        };
        Self { message, status: Some(resp.status), backend }
    }

    fn decode(status: u16, e: impl Display) -> Self {
        Self {
            message: format!("Unexpected response from server: {e}"),
            status: Some(status),
            backend: None,
        }
    }

    /// What a page should show: the backend's own words if it gave any.
    pub fn user_message(&self, fallback: &str) -> String {
        self.backend.clone().unwrap_or_else(|| s!(fallback))
    }
}

/// Pull an error string out of a JSON error body. The backend is not
/// consistent about the key.
fn structured_error(body: &[u8]) -> Option<String> {
    let Value::Object(map) = serde_json::from_slice::<Value>(body).ok()? else {
        return None;
    };
    ["error", "Message", "message", "Alert!"]
        .iter()
        .filter_map(|k| map.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Headers for one request, built from the current session snapshot.
pub fn headers_for(session: &Session) -> Vec<(String, String)> {
    let mut headers = vec![header!("Content-Type", "application/json")];
    if let Some(token) = session.bearer() {
        headers.push(header!("Authorization", join!("Bearer ", token)));
    }
    headers
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Real network client for the configured backend.
    pub fn http(opts: &AppOptions) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(opts.timeout)?;
        Ok(Self::new(&opts.base_url, Arc::new(transport)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            join!(&self.base_url, path)
        } else {
            join!(&self.base_url, "/", path)
        }
    }

    pub fn build(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        accept: Accept,
        session: &Session,
    ) -> ApiRequest {
        ApiRequest {
            method,
            url: self.url_for(path),
            headers: headers_for(session),
            body,
            accept,
        }
    }

    fn send(&self, req: ApiRequest) -> Result<ApiResponse, ApiError> {
        logd!(
            "Api: {} {} (bearer={})",
            req.method.as_str(),
            req.url,
            req.header("Authorization").is_some()
        );

        let resp = self.transport.send(&req).map_err(|e| {
            loge!("Api: {} {} transport error: {}", req.method.as_str(), req.url, e);
            ApiError::transport(e)
        })?;

        if !resp.is_success() {
            let err = ApiError::from_response(&resp);
            logw!("Api: {} {} → {}", req.method.as_str(), req.url, err);
            return Err(err);
        }

        logd!("Api: {} {} → {}", req.method.as_str(), req.url, resp.status);
        Ok(resp)
    }

    /// JSON in, JSON out.
    pub fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        session: &Session,
    ) -> Result<T, ApiError> {
        let resp = self.send(self.build(method, path, body, Accept::Json, session))?;
        serde_json::from_slice(&resp.body).map_err(|e| ApiError::decode(resp.status, e))
    }

    /// Same as `request`, but the body comes back as text.
    pub fn request_text(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        session: &Session,
    ) -> Result<String, ApiError> {
        let resp = self.send(self.build(method, path, body, Accept::Text, session))?;
        String::from_utf8(resp.body).map_err(|e| ApiError::decode(resp.status, e))
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str, session: &Session) -> Result<T, ApiError> {
        self.request(Method::Get, path, None, session)
    }

    pub fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        session: &Session,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::transport(format!("Could not encode request: {e}")))?;
        self.request(Method::Post, path, Some(body), session)
    }
}
