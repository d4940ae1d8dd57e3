// src/gui/pages/login.rs
use eframe::egui::{self, RichText};

use crate::{
    api::{ApiError, LoginReply},
    forms::LoginForm,
    gui::{
        components::feedback,
        router::Route,
        task::{Pending, TaskState},
    },
};

use super::{AppCtx, Page};

const REJECTED: &str = "Login failed. Please try again.";
const UNREACHABLE: &str = "Network error. Please try again later.";

#[derive(Default)]
pub struct LoginPage {
    pub form: LoginForm,
    error: Option<String>,
    notice: Option<String>,
    pending: Option<Pending<Result<LoginReply, ApiError>>>,
}

impl LoginPage {
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Message handed over by the previous page (e.g. after sign-up).
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn submit(&mut self, ctx: &mut AppCtx) {
        if self.is_busy() {
            return;
        }
        self.error = None;

        let req = match self.form.validate() {
            Ok(req) => req,
            Err(msg) => {
                self.error = Some(msg);
                return;
            }
        };

        logf!("Login: attempt");
        let session = ctx.session.get_session();
        let api = ctx.api.clone();
        self.pending = Some(ctx.exec.run("login", move || api.login(&req, &session)));
        self.collect(ctx);
    }

    fn collect(&mut self, ctx: &mut AppCtx) {
        let Some(pending) = &self.pending else {
            return;
        };

        let outcome = match pending.poll() {
            TaskState::Running => return,
            TaskState::Ready(Ok(reply)) => reply.into_outcome(),
            TaskState::Ready(Err(e)) => Err(e.user_message(UNREACHABLE)),
            TaskState::Lost => Err(s!(UNREACHABLE)),
        };
        self.pending = None;

        let token = match outcome {
            Ok(token) => token,
            Err(msg) => {
                logw!("Login: rejected: {msg}");
                self.error = Some(msg);
                return;
            }
        };

        if let Err(e) = ctx.session.set_session(&token, true) {
            loge!("Login: could not store session: {e}");
            self.error = Some(s!(REJECTED));
            return;
        }

        logf!("Login: ok");
        self.form = LoginForm::default();
        self.notice = None;
        ctx.nav.navigate(Route::Scrape);
    }
}

impl Page for LoginPage {
    fn route(&self) -> Route {
        Route::Login
    }

    fn title(&self) -> &'static str {
        "Log In"
    }

    fn on_enter(&mut self, ctx: &mut AppCtx) {
        self.error = None;
        self.notice = ctx.nav.take_notice();
    }

    fn on_leave(&mut self) {
        self.pending = None;
    }

    fn poll(&mut self, ctx: &mut AppCtx) {
        self.collect(ctx);
    }

    fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    fn draw(&mut self, ui: &mut egui::Ui, ctx: &mut AppCtx) {
        let busy = self.is_busy();
        let mut submit = false;

        ui.heading("Log in");
        if let Some(n) = &self.notice {
            feedback::notice(ui, n);
        }
        ui.add_space(8.0);

        ui.add_enabled_ui(!busy, |ui| {
            feedback::field(ui, "E-mail", &mut self.form.email, false);
            let pw = feedback::field(ui, "Password", &mut self.form.password, true);
            if pw.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit = true;
            }
        });

        ui.add_space(8.0);
        if feedback::submit_button(ui, busy, "Log In", "Logging in...") {
            submit = true;
        }
        if submit && !busy {
            self.submit(ctx);
        }

        if let Some(err) = &self.error {
            feedback::error(ui, err);
        }

        ui.add_space(16.0);
        ui.group(|ui| {
            ui.label(RichText::new("Why log in?").strong());
            ui.label("Scraping works without an account. Logged-in scrapes are saved to your history, where you can download them again later.");
        });

        ui.horizontal(|ui| {
            ui.label("No account yet?");
            if ui.link("Sign up").clicked() {
                ctx.nav.navigate(Route::SignUp);
            }
        });
    }
}
