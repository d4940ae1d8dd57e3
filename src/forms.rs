// src/forms.rs
//
// Local validation. Nothing here touches the network: a form either turns into
// a request body or into messages for the user.

use std::sync::LazyLock;

use regex::Regex;

use crate::api::{LoginRequest, ScrapeMethod, ScrapeRequest, SignUpRequest};

pub const MIN_PASSWORD_CHARS: usize = 7;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"));

pub fn looks_like_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScrapeForm {
    pub url: String,
    pub method: ScrapeMethod,
    pub clean_data: bool,
    pub company_name: String,
}

impl ScrapeForm {
    /// `company_name` is only sent for the automation method, and is required there.
    pub fn validate(&self) -> Result<ScrapeRequest, String> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(s!("Please enter a valid URL"));
        }

        let company_name = if self.method.is_automation() {
            if self.company_name.trim().is_empty() {
                return Err(s!("Please enter a company name for Selenium scraping"));
            }
            Some(self.company_name.clone())
        } else {
            None
        };

        Ok(ScrapeRequest {
            url: s!(url),
            scraping_method: self.method,
            clean_data: self.clean_data,
            company_name,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

impl SignUpForm {
    /// Every problem at once, in field order.
    pub fn violations(&self) -> Vec<&'static str> {
        let mut errors = Vec::new();

        if self.user_name.trim().is_empty() {
            errors.push("Please enter a username");
        }

        if self.email.trim().is_empty() {
            errors.push("Please enter your E-mail");
        } else if !looks_like_email(&self.email) {
            errors.push("Invalid E-mail");
        }

        if self.password.trim().is_empty() {
            errors.push("Please enter a password");
        } else if self.password.chars().count() < MIN_PASSWORD_CHARS {
            errors.push("Password must contain at least 7 characters!");
        }

        if self.confirm.trim().is_empty() {
            errors.push("Please repeat your password");
        } else if self.confirm != self.password {
            errors.push("Passwords are not matching!");
        }

        errors
    }

    pub fn validate(&self) -> Result<SignUpRequest, Vec<&'static str>> {
        let errors = self.violations();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(SignUpRequest {
            user_name: s!(self.user_name.trim()),
            email: s!(self.email.trim()),
            password: self.password.clone(),
            repeat_password: self.confirm.clone(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, String> {
        if self.email.trim().is_empty() || self.password.trim().is_empty() {
            return Err(s!("Please enter both email and password"));
        }
        Ok(LoginRequest {
            email: s!(self.email.trim()),
            password: self.password.clone(),
        })
    }
}
