// src/gui/router.rs
use super::pages::{
    history::HistoryPage, login::LoginPage, scrape::ScrapePage, signup::SignUpPage, AppCtx, Page,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Route {
    #[default]
    Scrape,
    SignUp,
    Login,
    History,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Scrape, Route::SignUp, Route::Login, Route::History];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Scrape => "/",
            Route::SignUp => "/signup",
            Route::Login => "/login",
            Route::History => "/history",
        }
    }

    /// Unknown paths land on the scrape page.
    pub fn from_path(path: &str) -> Self {
        let p = path.trim();
        let p = p.split(&['?', '#'][..]).next().unwrap_or("");
        let p = p.trim_end_matches('/');
        match p {
            "/signup" | "signup" => Route::SignUp,
            "/login" | "login" => Route::Login,
            "/history" | "history" => Route::History,
            _ => Route::Scrape,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Scrape => "Scrape",
            Route::SignUp => "Sign Up",
            Route::Login => "Log In",
            Route::History => "History",
        }
    }
}

/// Current route plus at most one queued navigation. Pages ask for a route
/// change; the app applies it after the frame.
#[derive(Debug, Default)]
pub struct Navigator {
    current: Route,
    pending: Option<Route>,
    notice: Option<String>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self { current: start, pending: None, notice: None }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    pub fn pending(&self) -> Option<Route> {
        self.pending
    }

    pub fn navigate(&mut self, to: Route) {
        self.pending = Some(to);
    }

    /// Navigate and leave a one-shot message for the page being entered.
    pub fn navigate_with_notice(&mut self, to: Route, notice: impl Into<String>) {
        self.pending = Some(to);
        self.notice = Some(notice.into());
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    fn take_pending(&mut self) -> Option<Route> {
        self.pending.take()
    }
}

/// One instance of every page; each keeps its own state while the app runs.
#[derive(Default)]
pub struct Pages {
    pub scrape: ScrapePage,
    pub signup: SignUpPage,
    pub login: LoginPage,
    pub history: HistoryPage,
}

impl Pages {
    pub fn page_mut(&mut self, route: Route) -> &mut dyn Page {
        match route {
            Route::Scrape => &mut self.scrape,
            Route::SignUp => &mut self.signup,
            Route::Login => &mut self.login,
            Route::History => &mut self.history,
        }
    }
}

// Redirect chains longer than this are a bug; stop following them.
const MAX_HOPS: usize = 4;

/// Enter the current page (app start), then follow whatever it asks for.
pub fn enter_current(pages: &mut Pages, ctx: &mut AppCtx) {
    let route = ctx.nav.current();
    logf!("UI: Enter {}", route.path());
    pages.page_mut(route).on_enter(ctx);
    apply_navigation(pages, ctx);
}

/// Leave the old page, enter the new one, repeat while pages keep redirecting.
pub fn apply_navigation(pages: &mut Pages, ctx: &mut AppCtx) {
    for _ in 0..MAX_HOPS {
        let Some(next) = ctx.nav.take_pending() else {
            return;
        };
        let prev = ctx.nav.current();
        if next == prev {
            continue;
        }

        logf!("UI: Route {} → {}", prev.path(), next.path());
        pages.page_mut(prev).on_leave();
        ctx.nav.current = next;
        pages.page_mut(next).on_enter(ctx);
    }

    if let Some(stuck) = ctx.nav.take_pending() {
        loge!("UI: Redirect loop, dropped navigation to {}", stuck.path());
    }
}
