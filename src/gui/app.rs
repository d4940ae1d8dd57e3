// src/gui/app.rs
use std::{
    error::Error,
    path::PathBuf,
    time::{Duration, Instant},
};

use eframe::egui::{self, RichText};

use crate::{
    api::ApiClient,
    config::{consts::STORAGE_POLL_MS, AppOptions},
    export::SaveToDir,
    session::SessionStore,
};

use super::{
    components::navbar::NavBar,
    pages::AppCtx,
    router::{self, Navigator, Pages, Route},
    task::Exec,
};

pub fn run(native: eframe::NativeOptions, opts: AppOptions, start: Route) -> Result<(), Box<dyn Error>> {
    let api = ApiClient::http(&opts)?;
    logf!("Init: backend={}, start={}", api.base_url(), start.path());

    eframe::run_native(
        "ScrapeDesk",
        native,
        Box::new(move |cc| {
            let exec = Exec::threaded(&cc.egui_ctx);
            Ok(Box::new(App::new(opts, api, exec, start)))
        }),
    )?;
    Ok(())
}

pub struct App {
    pub session: SessionStore,
    pub api: ApiClient,
    pub nav: Navigator,
    pub exec: Exec,
    pub downloads: SaveToDir,
    pub staging_dir: PathBuf,
    pub pages: Pages,
    navbar: NavBar,
    last_storage_poll: Instant,
    shown_route: Option<Route>,
}

/// Split-borrow `App` into the page context plus the pieces that sit beside it.
macro_rules! with_ctx {
    ($app:expr, |$pages:ident, $navbar:ident, $ctx:ident| $body:block) => {{
        let App { session, api, nav, exec, downloads, staging_dir, pages: $pages, navbar: $navbar, .. } = $app;
        let mut $ctx = AppCtx {
            session,
            api: &*api,
            nav,
            exec: &*exec,
            downloads: &*downloads,
            staging_dir: staging_dir.as_path(),
        };
        $body
    }};
}

impl App {
    pub fn new(opts: AppOptions, api: ApiClient, exec: Exec, start: Route) -> Self {
        let session = SessionStore::open_file(opts.session_path());
        let navbar = NavBar::new(&session);

        let mut app = Self {
            session,
            api,
            nav: Navigator::new(start),
            exec,
            downloads: SaveToDir::new(opts.download_dir.clone()),
            staging_dir: opts.staging_dir(),
            pages: Pages::default(),
            navbar,
            last_storage_poll: Instant::now(),
            shown_route: None,
        };

        with_ctx!(&mut app, |pages, _navbar, ctx| {
            router::enter_current(pages, &mut ctx);
        });
        app
    }

    /// Pick up logins/logouts made by another running instance.
    fn poll_storage(&mut self, ctx: &egui::Context) {
        let every = Duration::from_millis(STORAGE_POLL_MS);
        if self.last_storage_poll.elapsed() >= every {
            self.last_storage_poll = Instant::now();
            if self.session.poll_changes() {
                logf!("Session: changed elsewhere (authenticated={})", self.navbar.is_authenticated());
            }
        }
        ctx.request_repaint_after(every);
    }

    fn sync_title(&mut self, ctx: &egui::Context) {
        let route = self.nav.current();
        if self.shown_route == Some(route) {
            return;
        }
        self.shown_route = Some(route);
        let title = self.pages.page_mut(route).title();
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!("ScrapeDesk - {title}")));
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_storage(ctx);
        self.sync_title(ctx);

        with_ctx!(self, |pages, navbar, actx| {
            egui::TopBottomPanel::top("header").show(ctx, |ui| {
                ui.add_space(6.0);
                ui.heading(RichText::new("Web Scraping Made Simple").strong());
                ui.label("Extract and clean web data");
                ui.separator();
                navbar.draw(ui, &mut actx);
                ui.add_space(4.0);
            });

            egui::CentralPanel::default().show(ctx, |ui| {
                let page = pages.page_mut(actx.nav.current());
                page.poll(&mut actx);
                egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                    page.draw(ui, &mut actx);
                });
            });

            router::apply_navigation(pages, &mut actx);
        });
    }
}
