// tests/signup_login.rs
use serde_json::json;

use scrapedesk::{
    api::ScrapeMethod,
    forms::{LoginForm, SignUpForm},
    gui::{
        components::navbar::{self, NavBar, NavLink},
        pages::{signup::CREATED_NOTICE, Page},
        router::{self, Navigator, Pages, Route},
    },
    session::SessionStore,
};

mod common;
use common::Harness;

fn good_signup() -> SignUpForm {
    SignUpForm {
        user_name: "ana".into(),
        email: "ana@example.com".into(),
        password: "1234567".into(),
        confirm: "1234567".into(),
    }
}

#[test]
fn four_bad_fields_four_messages_no_calls() {
    let mut h = Harness::new("signup_bad");
    let mut pages = Pages::default();
    pages.signup.form = SignUpForm {
        user_name: " ".into(),
        email: "not-an-email".into(),
        password: "123".into(),
        confirm: "321".into(),
    };

    pages.signup.submit(&mut h.ctx());

    assert_eq!(
        pages.signup.problems(),
        &[
            "Please enter a username",
            "Invalid E-mail",
            "Password must contain at least 7 characters!",
            "Passwords are not matching!",
        ]
    );
    assert!(h.backend.requests().is_empty());
    assert_eq!(h.nav.pending(), None);
}

#[test]
fn signup_success_lands_on_login_with_notice() {
    let mut h = Harness::new("signup_ok");
    h.backend.reply("/sign-up", 200, json!({"status": 1, "message": "created"}));
    h.nav = Navigator::new(Route::SignUp);

    let mut pages = Pages::default();
    pages.signup.form = good_signup();
    {
        let mut ctx = h.ctx();
        pages.signup.submit(&mut ctx);
        router::apply_navigation(&mut pages, &mut ctx);
    }

    assert_eq!(h.nav.current(), Route::Login);
    assert_eq!(pages.login.notice(), Some(CREATED_NOTICE));
    assert!(pages.signup.problems().is_empty());

    let body = h.backend.requests()[0].body.clone().unwrap();
    assert_eq!(
        body,
        json!({"userName": "ana", "email": "ana@example.com", "password": "1234567", "repeat_password": "1234567"})
    );
    // The account is not logged in by signing up.
    assert!(!h.session.get_session().is_authenticated());
}

#[test]
fn signup_backend_error_is_verbatim() {
    let mut h = Harness::new("signup_taken");
    h.backend.reply("/sign-up", 200, json!({"status": 0, "error": "E-mail already registered"}));
    h.backend.reply("/sign-up", 500, json!({}));

    let mut pages = Pages::default();
    pages.signup.form = good_signup();
    pages.signup.submit(&mut h.ctx());
    assert_eq!(pages.signup.backend_error(), Some("E-mail already registered"));

    pages.signup.submit(&mut h.ctx());
    assert_eq!(pages.signup.backend_error(), Some("Sign-Up failed. Please try again."));
    assert_eq!(h.nav.pending(), None);
}

#[test]
fn login_then_logout_controls_bearer_header() {
    let mut h = Harness::new("login_bearer");
    h.backend.reply("/login", 200, json!({"status": 1, "token": "abc"}));
    h.backend.reply("/scrape", 200, json!({"status": 1, "scrape_result": "one"}));
    h.backend.reply("/scrape", 200, json!({"status": 1, "scrape_result": "two"}));
    h.nav = Navigator::new(Route::Login);

    let navbar = NavBar::new(&h.session);
    assert!(navbar.links().contains(&NavLink::Go(Route::SignUp)));

    let mut pages = Pages::default();
    pages.login.form = LoginForm { email: "ana@example.com".into(), password: "1234567".into() };
    pages.scrape.form.url = "https://example.com".into();
    pages.scrape.form.method = ScrapeMethod::Requests;

    {
        let mut ctx = h.ctx();
        pages.login.submit(&mut ctx);
        router::apply_navigation(&mut pages, &mut ctx);
        assert_eq!(ctx.nav.current(), Route::Scrape);
        pages.scrape.submit(&mut ctx);
    }
    assert!(h.session.get_session().is_authenticated());
    assert!(navbar.is_authenticated());
    assert_eq!(
        navbar.links(),
        vec![NavLink::Go(Route::Scrape), NavLink::Go(Route::History), NavLink::Logout]
    );

    {
        let mut ctx = h.ctx();
        navbar::logout(&mut ctx);
        router::apply_navigation(&mut pages, &mut ctx);
        assert_eq!(ctx.nav.current(), Route::Login);
        pages.scrape.submit(&mut ctx);
    }
    assert!(!navbar.is_authenticated());

    let scrapes: Vec<_> = h.backend.requests().into_iter().filter(|r| r.url.ends_with("/scrape")).collect();
    assert_eq!(scrapes.len(), 2);
    assert_eq!(scrapes[0].header("Authorization"), Some("Bearer abc"));
    assert_eq!(scrapes[1].header("Authorization"), None);

    let fresh = SessionStore::new(h.storage.clone());
    assert!(!fresh.get_session().is_authenticated());
}

#[test]
fn login_failures() {
    let mut h = Harness::new("login_fail");
    h.backend.reply("/login", 200, json!({"status": 0}));
    h.backend.reply("/login", 200, json!({"status": 0, "error": "Wrong password"}));
    h.backend.unreachable("/login");

    let mut pages = Pages::default();
    pages.login.form = LoginForm { email: "a@b.co".into(), password: "".into() };
    pages.login.submit(&mut h.ctx());
    assert_eq!(pages.login.error(), Some("Please enter both email and password"));
    assert!(h.backend.requests().is_empty());

    pages.login.form.password = "1234567".into();
    for expected in ["Login failed. Please try again.", "Wrong password", "Network error. Please try again later."] {
        pages.login.submit(&mut h.ctx());
        assert_eq!(pages.login.error(), Some(expected));
    }
    assert!(!h.session.get_session().is_authenticated());
    assert_eq!(h.nav.pending(), None);
}

#[test]
fn notice_is_shown_once() {
    let mut h = Harness::new("login_notice");
    let mut pages = Pages::default();
    {
        let mut ctx = h.ctx();
        ctx.nav.navigate_with_notice(Route::Login, "hello");
        router::apply_navigation(&mut pages, &mut ctx);
    }
    assert_eq!(pages.login.notice(), Some("hello"));

    let mut ctx = h.ctx();
    pages.login.on_leave();
    pages.login.on_enter(&mut ctx);
    assert_eq!(pages.login.notice(), None);
}
