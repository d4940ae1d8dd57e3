// src/gui/pages/signup.rs
use eframe::egui;

use crate::{
    api::{ApiError, StatusReply},
    forms::SignUpForm,
    gui::{
        components::feedback,
        router::Route,
        task::{Pending, TaskState},
    },
};

use super::{AppCtx, Page};

const FAILED: &str = "Sign-Up failed. Please try again.";
pub const CREATED_NOTICE: &str = "Account successfully created! You can now log in.";

#[derive(Default)]
pub struct SignUpPage {
    pub form: SignUpForm,
    problems: Vec<&'static str>,
    backend_error: Option<String>,
    pending: Option<Pending<Result<StatusReply, ApiError>>>,
}

impl SignUpPage {
    /// Local validation messages from the last submit, in field order.
    pub fn problems(&self) -> &[&'static str] {
        &self.problems
    }

    pub fn backend_error(&self) -> Option<&str> {
        self.backend_error.as_deref()
    }

    pub fn submit(&mut self, ctx: &mut AppCtx) {
        if self.is_busy() {
            return;
        }
        self.backend_error = None;

        let req = match self.form.validate() {
            Ok(req) => req,
            Err(problems) => {
                logd!("SignUp: {} validation problem(s)", problems.len());
                self.problems = problems;
                return;
            }
        };
        self.problems.clear();

        logf!("SignUp: registering {}", req.user_name);
        let session = ctx.session.get_session();
        let api = ctx.api.clone();
        self.pending = Some(ctx.exec.run("sign-up", move || api.sign_up(&req, &session)));
        self.collect(ctx);
    }

    fn collect(&mut self, ctx: &mut AppCtx) {
        let Some(pending) = &self.pending else {
            return;
        };

        let outcome = match pending.poll() {
            TaskState::Running => return,
            TaskState::Ready(Ok(reply)) => reply.into_outcome(FAILED).map(|_| ()),
            TaskState::Ready(Err(e)) => Err(e.user_message(FAILED)),
            TaskState::Lost => Err(s!(FAILED)),
        };
        self.pending = None;

        match outcome {
            Ok(()) => {
                logf!("SignUp: account created");
                self.form = SignUpForm::default();
                ctx.nav.navigate_with_notice(Route::Login, CREATED_NOTICE);
            }
            Err(msg) => {
                logw!("SignUp: rejected: {msg}");
                self.backend_error = Some(msg);
            }
        }
    }
}

impl Page for SignUpPage {
    fn route(&self) -> Route {
        Route::SignUp
    }

    fn title(&self) -> &'static str {
        "Sign Up"
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

        ui.heading("Create an account");
        ui.add_space(8.0);

        ui.add_enabled_ui(!busy, |ui| {
            feedback::field(ui, "Username", &mut self.form.user_name, false);
            feedback::field(ui, "E-mail", &mut self.form.email, false);
            feedback::field(ui, "Password", &mut self.form.password, true);
            feedback::field(ui, "Repeat password", &mut self.form.confirm, true);
        });

        ui.add_space(8.0);
        if feedback::submit_button(ui, busy, "Sign Up", "Signing up...") {
            self.submit(ctx);
        }

        for p in &self.problems {
            feedback::error(ui, p);
        }
        if let Some(err) = &self.backend_error {
            feedback::error(ui, err);
        }

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.label("Already have an account?");
            if ui.link("Log in").clicked() {
                ctx.nav.navigate(Route::Login);
            }
        });
    }
}
