// src/api/transport.rs
//
// The one place that touches the network. Everything above works on
// `ApiRequest`/`ApiResponse`, so tests swap in a scripted transport.

use std::time::Duration;

use serde_json::Value;

use super::{ApiError, Method};
use crate::config::consts::USER_AGENT;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accept {
    Json,
    Text,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub accept: Accept,
}

impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport: Send + Sync {
    /// Perform the request. `Err` is for failures with no HTTP response at all.
    fn send(&self, req: &ApiRequest) -> Result<ApiResponse, String>;
}

/// reqwest's blocking client. Only ever called from worker threads or the CLI.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::transport(format!("HTTP client setup failed: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, req: &ApiRequest) -> Result<ApiResponse, String> {
        let method = match req.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &req.url);
        for (k, v) in &req.headers {
            builder = builder.header(k.as_str(), v.as_str());
        }
        builder = builder.header(
            "Accept",
            match req.accept {
                Accept::Json => "application/json",
                Accept::Text => "text/plain, */*",
            },
        );
        if let Some(body) = &req.body {
            let bytes = serde_json::to_vec(body).map_err(|e| e.to_string())?;
            builder = builder.body(bytes);
        }

        let resp = builder.send().map_err(|e| e.to_string())?;
        let status = resp.status().as_u16();
        let body = resp.bytes().map_err(|e| e.to_string())?.to_vec();
        Ok(ApiResponse { status, body })
    }
}
