// tests/api_client.rs
use serde_json::json;

use scrapedesk::api::{Accept, ApiClient, LoginRequest, Method};
use scrapedesk::session::Session;

mod common;
use common::{FakeBackend, BASE};

fn token(t: &str) -> Session {
    Session { token: Some(t.into()), authenticated: true }
}

#[test]
fn base_url_and_paths_join_cleanly() {
    let backend = FakeBackend::new();
    let api = ApiClient::new("http://backend.test/", std::sync::Arc::new(backend));
    assert_eq!(api.base_url(), "http://backend.test");
    assert_eq!(api.url_for("/scrape"), "http://backend.test/scrape");
    assert_eq!(api.url_for("history"), "http://backend.test/history");
}

#[test]
fn post_sends_json_body_and_bearer() {
    let backend = FakeBackend::new();
    backend.reply("/login", 200, json!({"status": 1, "token": "abc"}));
    let api = backend.client();

    let req = LoginRequest { email: "a@b.co".into(), password: "secret1".into() };
    let reply = api.login(&req, &token("old")).unwrap();
    assert_eq!(reply.into_outcome(), Ok("abc".to_string()));

    let sent = &backend.requests()[0];
    assert_eq!(sent.method, Method::Post);
    assert_eq!(sent.url, format!("{BASE}/login"));
    assert_eq!(sent.body, Some(json!({"email": "a@b.co", "password": "secret1"})));
    assert_eq!(sent.header("content-type"), Some("application/json"));
    assert_eq!(sent.header("Authorization"), Some("Bearer old"));
}

#[test]
fn anonymous_requests_have_no_authorization() {
    let backend = FakeBackend::new();
    backend.reply("/history", 200, json!([]));
    let api = backend.client();

    api.history(&Session::anonymous()).unwrap();
    assert_eq!(backend.requests()[0].header("Authorization"), None);
}

#[test]
fn non_2xx_keeps_status_and_backend_text() {
    let backend = FakeBackend::new();
    backend.reply("/history", 401, json!({"Message": "Token expired"}));
    backend.reply_text("/history", 502, "<html>bad gateway</html>");
    let api = backend.client();

    let e = api.history(&token("t")).unwrap_err();
    assert_eq!(e.status, Some(401));
    assert_eq!(e.backend.as_deref(), Some("Token expired"));
    assert_eq!(e.user_message("fallback"), "Token expired");

    let e = api.history(&token("t")).unwrap_err();
    assert_eq!(e.status, Some(502));
    assert_eq!(e.backend, None);
    assert_eq!(e.user_message("fallback"), "fallback");
}

#[test]
fn transport_failure_has_no_status() {
    let backend = FakeBackend::new();
    backend.unreachable("/scrape");
    let api = backend.client();

    let e = api.post::<serde_json::Value, _>("/scrape", &json!({}), &Session::anonymous()).unwrap_err();
    assert_eq!(e.status, None);
    assert!(e.message.contains("connection refused"));
}

#[test]
fn undecodable_success_body_is_an_error() {
    let backend = FakeBackend::new();
    backend.reply_text("/history", 200, "not json");
    let api = backend.client();

    let e = api.history(&token("t")).unwrap_err();
    assert_eq!(e.status, Some(200));
    assert!(e.message.starts_with("Unexpected response from server"));
}

#[test]
fn auth_check_accepts_plain_text() {
    let backend = FakeBackend::new();
    backend.reply_text("/auth", 200, "Token is valid");
    let api = backend.client();

    api.check_auth(&token("t")).unwrap();
    let sent = &backend.requests()[0];
    assert_eq!(sent.method, Method::Get);
    assert_eq!(sent.accept, Accept::Text);
    assert_eq!(sent.body, None);
}

#[test]
fn load_history_checks_token_first() {
    let backend = FakeBackend::new();
    backend.reply("/auth", 401, json!({"Alert!": "Token is invalid!"}));
    backend.reply_text("/auth", 200, "ok");
    backend.reply("/history", 200, json!([
        {"url": "https://a.io", "scrape_method": "", "scraping_method": "selenium", "scraped_data": "x"}
    ]));
    let api = backend.client();

    let err = api.load_history(&token("t")).unwrap_err();
    assert_eq!(err, scrapedesk::api::endpoints::HISTORY_TOKEN_REJECTED);
    assert_eq!(backend.calls_to("/history"), 0);

    let records = api.load_history(&token("t")).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].method_label(), "selenium");
}
