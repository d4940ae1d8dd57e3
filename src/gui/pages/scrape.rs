// src/gui/pages/scrape.rs
use std::path::PathBuf;

use eframe::egui::{self, RichText};

use crate::{
    api::{ApiError, ScrapeMethod, ScrapeResult},
    export::FileName,
    forms::ScrapeForm,
    gui::{
        components::feedback,
        router::Route,
        task::{Pending, TaskState},
    },
};

use super::{AppCtx, Page};

const TRANSPORT_FALLBACK: &str = "Failed to scrape the website. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrapeStatus {
    Idle,
    Submitting,
    Done,
    Error,
}

enum Phase {
    Idle,
    Submitting(Pending<Result<ScrapeResult, ApiError>>),
    Done(String),
    Failed,
}

pub struct ScrapePage {
    pub form: ScrapeForm,
    phase: Phase,
    error: Option<String>,
    notice: Option<String>,
    show_preview: bool,
    /// URL of the request that produced the current content; names the export.
    submitted_url: String,
}

impl Default for ScrapePage {
    fn default() -> Self {
        Self {
            form: ScrapeForm::default(),
            phase: Phase::Idle,
            error: None,
            notice: None,
            show_preview: false,
            submitted_url: String::new(),
        }
    }
}

impl ScrapePage {
    pub fn status(&self) -> ScrapeStatus {
        match self.phase {
            Phase::Idle => ScrapeStatus::Idle,
            Phase::Submitting(_) => ScrapeStatus::Submitting,
            Phase::Done(_) => ScrapeStatus::Done,
            Phase::Failed => ScrapeStatus::Error,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        match &self.phase {
            Phase::Done(c) => Some(c),
            _ => None,
        }
    }

    /// Content to show in the preview box, if the preview is open.
    pub fn preview(&self) -> Option<&str> {
        self.content().filter(|_| self.show_preview)
    }

    pub fn toggle_preview(&mut self) {
        if self.content().is_some() {
            self.show_preview = !self.show_preview;
        }
    }

    /// Validate and send. A validation failure never reaches the backend.
    pub fn submit(&mut self, ctx: &mut AppCtx) {
        if self.is_busy() {
            return;
        }
        self.error = None;
        self.notice = None;

        let req = match self.form.validate() {
            Ok(req) => req,
            Err(msg) => {
                logd!("Scrape: validation failed: {msg}");
                self.error = Some(msg);
                return;
            }
        };

        logf!("Scrape: {} via {}", req.url, req.scraping_method);
        self.submitted_url = req.url.clone();
        self.show_preview = false;

        let session = ctx.session.get_session();
        let api = ctx.api.clone();
        self.phase = Phase::Submitting(ctx.exec.run("scrape", move || api.scrape(&req, &session)));
        self.collect();
    }

    fn collect(&mut self) {
        let Phase::Submitting(pending) = &self.phase else {
            return;
        };

        let outcome = match pending.poll() {
            TaskState::Running => return,
            TaskState::Ready(Ok(result)) => result.into_outcome(),
            TaskState::Ready(Err(e)) => Err(e.user_message(TRANSPORT_FALLBACK)),
            TaskState::Lost => Err(s!(TRANSPORT_FALLBACK)),
        };

        match outcome {
            Ok(content) => {
                logf!("Scrape: received {} chars", content.chars().count());
                self.phase = Phase::Done(content);
            }
            Err(msg) => {
                logw!("Scrape: failed: {msg}");
                self.error = Some(msg);
                self.phase = Phase::Failed;
            }
        }
    }

    /// Save the current content as `{host}_scrape_{date}.txt`.
    pub fn export(&mut self, ctx: &AppCtx) -> Option<PathBuf> {
        let content = self.content()?;
        match ctx.export(content, FileName::FromUrl(self.submitted_url.clone())) {
            Ok(path) => {
                self.notice = Some(format!("Saved to {}", path.display()));
                Some(path)
            }
            Err(e) => {
                loge!("Scrape: {e}");
                self.error = Some(e.to_string());
                None
            }
        }
    }
}

impl Page for ScrapePage {
    fn route(&self) -> Route {
        Route::Scrape
    }

    fn title(&self) -> &'static str {
        "Scrape"
    }

    fn on_leave(&mut self) {
        if matches!(self.phase, Phase::Submitting(_)) {
            logd!("Scrape: left while submitting; result will be dropped");
            self.phase = Phase::Idle;
        }
    }

    fn poll(&mut self, _ctx: &mut AppCtx) {
        self.collect();
    }

    fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Submitting(_))
    }

    fn draw(&mut self, ui: &mut egui::Ui, ctx: &mut AppCtx) {
        let busy = self.is_busy();
        let mut submit = false;

        ui.heading("Scrape a website");
        ui.add_space(8.0);

        ui.add_enabled_ui(!busy, |ui| {
            let url = feedback::field(ui, "Website URL", &mut self.form.url, false);
            if url.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit = true;
            }
            ui.add_space(6.0);

            ui.label(RichText::new("Scraping method").strong());
            for m in ScrapeMethod::ALL {
                ui.radio_value(&mut self.form.method, m, m.label());
            }

            if self.form.method.is_automation() {
                ui.add_space(6.0);
                feedback::field(ui, "Company name", &mut self.form.company_name, false);
            }

            ui.add_space(6.0);
            ui.checkbox(&mut self.form.clean_data, "Clean data");
        });

        ui.add_space(8.0);
        if feedback::submit_button(ui, busy, "Scrape", "Scraping...") {
            submit = true;
        }
        if submit && !busy {
            self.submit(ctx);
        }

        if let Some(err) = &self.error {
            feedback::error(ui, err);
        }

        if self.content().is_none() {
            return;
        }

        ui.separator();
        let (mut toggle, mut download) = (false, false);
        ui.horizontal(|ui| {
            let label = if self.show_preview { "Hide preview" } else { "Preview" };
            toggle = ui.button(label).clicked();
            download = ui.button("Download").clicked();
        });
        if toggle {
            self.toggle_preview();
        }
        if download {
            self.export(ctx);
        }
        if let Some(n) = &self.notice {
            feedback::notice(ui, n);
        }

        if let Some(mut text) = self.preview() {
            egui::ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut text)
                        .desired_width(f32::INFINITY)
                        .font(egui::TextStyle::Monospace),
                );
            });
        }
    }
}
