// src/gui/components/navbar.rs
//
// Link set depends on whether someone is logged in. The bar tracks that through
// a session subscription, so a login/logout from another instance shows up too.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use eframe::egui;

use crate::{
    gui::{pages::AppCtx, router::Route},
    session::{SessionStore, Subscription},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavLink {
    Go(Route),
    Logout,
}

pub struct NavBar {
    authenticated: Arc<AtomicBool>,
    _subscription: Subscription,
}

impl NavBar {
    pub fn new(session: &SessionStore) -> Self {
        let authenticated = Arc::new(AtomicBool::new(session.get_session().is_authenticated()));
        let flag = Arc::clone(&authenticated);
        let subscription = session.on_session_change(move |s| {
            flag.store(s.is_authenticated(), Ordering::Relaxed);
        });
        Self { authenticated, _subscription: subscription }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Relaxed)
    }

    pub fn links(&self) -> Vec<NavLink> {
        if self.is_authenticated() {
            vec![NavLink::Go(Route::Scrape), NavLink::Go(Route::History), NavLink::Logout]
        } else {
            vec![NavLink::Go(Route::Scrape), NavLink::Go(Route::SignUp), NavLink::Go(Route::Login)]
        }
    }

    pub fn draw(&self, ui: &mut egui::Ui, ctx: &mut AppCtx) {
        let current = ctx.nav.current();
        let mut clicked: Option<NavLink> = None;

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 12.0;
            for link in self.links() {
                let hit = match link {
                    NavLink::Go(route) => ui.selectable_label(route == current, route.label()).clicked(),
                    NavLink::Logout => ui.selectable_label(false, "Logout").clicked(),
                };
                if hit {
                    clicked = Some(link);
                }
            }
        });

        match clicked {
            Some(NavLink::Go(route)) => ctx.nav.navigate(route),
            Some(NavLink::Logout) => logout(ctx),
            None => {}
        }
    }
}

/// Forget the session and go to the login page. The bearer header goes with
/// it, since headers are rebuilt from the session on every request.
pub fn logout(ctx: &mut AppCtx) {
    if let Err(e) = ctx.session.clear_session() {
        loge!("Logout: could not clear session: {e}");
    }
    logf!("Logout: done");
    ctx.nav.navigate(Route::Login);
}
