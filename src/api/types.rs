// src/api/types.rs
//
// Request bodies and replies, shaped exactly like the backend's JSON.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Backend-side scraping strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeMethod {
    #[default]
    Requests,
    Bs4,
    Selenium,
}

impl ScrapeMethod {
    pub const ALL: [ScrapeMethod; 3] = [Self::Requests, Self::Bs4, Self::Selenium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requests => "requests",
            Self::Bs4 => "bs4",
            Self::Selenium => "selenium",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Requests => "Requests",
            Self::Bs4 => "Beautiful Soup",
            Self::Selenium => "Selenium - dynamic websites",
        }
    }

    /// Browser automation needs a company name alongside the URL.
    pub fn is_automation(&self) -> bool {
        matches!(self, Self::Selenium)
    }
}

impl fmt::Display for ScrapeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScrapeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "requests" => Ok(Self::Requests),
            "bs4" => Ok(Self::Bs4),
            "selenium" => Ok(Self::Selenium),
            other => Err(format!("Unknown scraping method: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScrapeRequest {
    pub url: String,
    pub scraping_method: ScrapeMethod,
    pub clean_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignUpRequest {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub repeat_password: String,
}

/// `status == 1` is success; the backend uses 0 or 2 for failures.
pub const STATUS_OK: i64 = 1;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ScrapeResult {
    #[serde(default)]
    pub status: i64,
    #[serde(default, rename = "scrape_result")]
    pub content: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ScrapeResult {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Scraped text, or the message to show.
    pub fn into_outcome(self) -> Result<String, String> {
        if self.is_success() {
            Ok(self.content.unwrap_or_default())
        } else {
            Err(non_blank(self.error).unwrap_or_else(|| s!("An error occurred during scraping")))
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LoginReply {
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl LoginReply {
    /// Token on success, message otherwise. A success without a token is a failure.
    pub fn into_outcome(self) -> Result<String, String> {
        match (self.status == STATUS_OK, non_blank(self.token)) {
            (true, Some(token)) => Ok(token),
            _ => Err(non_blank(self.error).unwrap_or_else(|| s!("Login failed. Please try again."))),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StatusReply {
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusReply {
    pub fn into_outcome(self, fallback: &str) -> Result<Option<String>, String> {
        if self.status == STATUS_OK {
            Ok(non_blank(self.message))
        } else {
            Err(non_blank(self.error).unwrap_or_else(|| s!(fallback)))
        }
    }
}

/// One past scrape, as returned by `GET /history`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub url: String,
    // The backend has used all three keys; a record may carry more than one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraping_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, alias = "scrapedData")]
    pub scraped_data: String,
    #[serde(default)]
    pub date: Option<String>,
}

impl HistoryRecord {
    /// First non-blank of `scrape_method`, `scraping_method`, `method`.
    pub fn raw_method(&self) -> Option<&str> {
        [&self.scrape_method, &self.scraping_method, &self.method]
            .into_iter()
            .filter_map(|m| m.as_deref())
            .map(str::trim)
            .find(|m| !m.is_empty())
    }

    pub fn method_label(&self) -> &str {
        self.raw_method().unwrap_or("Unknown")
    }

    pub fn parsed_method(&self) -> Option<ScrapeMethod> {
        self.raw_method().and_then(|m| m.parse().ok())
    }

    /// First `max_chars` characters, and whether anything was cut.
    pub fn preview(&self, max_chars: usize) -> (&str, bool) {
        match self.scraped_data.char_indices().nth(max_chars) {
            Some((cut, _)) => (&self.scraped_data[..cut], true),
            None => (&self.scraped_data, false),
        }
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}
