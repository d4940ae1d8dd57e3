// src/gui/pages/history.rs
//
// Past scrapes for the logged-in user. Entering the page runs
// `ApiClient::load_history` (token check, then the list).

use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText};
use egui_extras::{Column, TableBuilder};

use crate::{
    api::{endpoints::NO_HISTORY, HistoryRecord, ScrapeMethod},
    config::consts::PREVIEW_CHARS,
    export::FileName,
    gui::{
        components::feedback,
        router::Route,
        task::{Pending, TaskState},
    },
};

use super::{AppCtx, Page};

/// Badge colour per scraping method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodStyle {
    Requests,
    Bs4,
    Selenium,
    Other,
}

impl MethodStyle {
    pub fn of(record: &HistoryRecord) -> Self {
        match record.parsed_method() {
            Some(ScrapeMethod::Requests) => Self::Requests,
            Some(ScrapeMethod::Bs4) => Self::Bs4,
            Some(ScrapeMethod::Selenium) => Self::Selenium,
            None => Self::Other,
        }
    }

    pub fn color(&self) -> Color32 {
        match self {
            Self::Requests => Color32::from_rgb(22, 163, 74),
            Self::Bs4 => Color32::from_rgb(37, 99, 235),
            Self::Selenium => Color32::from_rgb(147, 51, 234),
            Self::Other => Color32::from_rgb(107, 114, 128),
        }
    }
}

enum Load {
    NotLoaded,
    Loading(Pending<Result<Vec<HistoryRecord>, String>>),
    Loaded(Vec<HistoryRecord>),
    Failed(String),
}

pub struct HistoryPage {
    load: Load,
    export_error: Option<String>,
    notice: Option<String>,
}

impl Default for HistoryPage {
    fn default() -> Self {
        Self { load: Load::NotLoaded, export_error: None, notice: None }
    }
}

impl HistoryPage {
    pub fn records(&self) -> Option<&[HistoryRecord]> {
        match &self.load {
            Load::Loaded(r) => Some(r),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.load {
            Load::Failed(msg) => Some(msg),
            _ => self.export_error.as_deref(),
        }
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Run the auth check + fetch again. Also what "Try Again" does.
    pub fn reload(&mut self, ctx: &mut AppCtx) {
        self.export_error = None;
        self.notice = None;

        let session = ctx.session.get_session();
        if !session.is_authenticated() {
            logf!("History: not logged in, redirecting");
            self.load = Load::NotLoaded;
            ctx.nav.navigate(Route::Login);
            return;
        }

        let api = ctx.api.clone();
        self.load = Load::Loading(ctx.exec.run("history", move || api.load_history(&session)));
        self.collect();
    }

    fn collect(&mut self) {
        let Load::Loading(pending) = &self.load else {
            return;
        };
        self.load = match pending.poll() {
            TaskState::Running => return,
            TaskState::Ready(Ok(records)) => {
                logf!("History: {} record(s)", records.len());
                Load::Loaded(records)
            }
            TaskState::Ready(Err(msg)) => Load::Failed(msg),
            TaskState::Lost => Load::Failed(s!("Failed to load history")),
        };
    }

    /// Download one record's content as `{host}_scrape_{date}.txt`.
    pub fn export_record(&mut self, idx: usize, ctx: &AppCtx) -> Option<PathBuf> {
        let record = self.records()?.get(idx)?;
        match ctx.export(&record.scraped_data, FileName::FromUrl(record.url.clone())) {
            Ok(path) => {
                self.export_error = None;
                self.notice = Some(format!("Saved to {}", path.display()));
                Some(path)
            }
            Err(e) => {
                loge!("History: {e}");
                self.export_error = Some(e.to_string());
                None
            }
        }
    }

    fn draw_table(&self, ui: &mut egui::Ui, records: &[HistoryRecord]) -> Option<usize> {
        let mut download = None;

        TableBuilder::new(ui)
            .striped(true)
            .min_scrolled_height(0.0)
            .column(Column::initial(140.0).at_least(90.0).clip(true))
            .column(Column::initial(110.0).at_least(70.0))
            .column(Column::initial(220.0).resizable(true).clip(true))
            .column(Column::remainder().clip(true))
            .column(Column::exact(90.0))
            .header(24.0, |mut header| {
                for title in ["Date", "Method", "URL", "Preview", ""] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for (i, rec) in records.iter().enumerate() {
                    body.row(64.0, |mut row| {
                        row.col(|ui| {
                            ui.label(rec.date.as_deref().unwrap_or("-"));
                        });
                        row.col(|ui| {
                            let style = MethodStyle::of(rec);
                            ui.label(
                                RichText::new(rec.method_label())
                                    .color(Color32::WHITE)
                                    .background_color(style.color()),
                            );
                        });
                        row.col(|ui| {
                            ui.hyperlink_to(rec.url.as_str(), rec.url.as_str());
                        });
                        row.col(|ui| {
                            let (text, cut) = rec.preview(PREVIEW_CHARS);
                            let shown = if cut { join!(text, "...") } else { s!(text) };
                            ui.label(RichText::new(shown).small().monospace());
                        });
                        row.col(|ui| {
                            if ui.button("Download").clicked() {
                                download = Some(i);
                            }
                        });
                    });
                }
            });

        download
    }
}

impl Page for HistoryPage {
    fn route(&self) -> Route {
        Route::History
    }

    fn title(&self) -> &'static str {
        "History"
    }

    fn on_enter(&mut self, ctx: &mut AppCtx) {
        self.reload(ctx);
    }

    fn on_leave(&mut self) {
        if matches!(self.load, Load::Loading(_)) {
            self.load = Load::NotLoaded;
        }
    }

    fn poll(&mut self, _ctx: &mut AppCtx) {
        self.collect();
    }

    fn is_busy(&self) -> bool {
        matches!(self.load, Load::Loading(_))
    }

    fn draw(&mut self, ui: &mut egui::Ui, ctx: &mut AppCtx) {
        ui.heading("Scraping history");
        ui.add_space(8.0);

        match &self.load {
            Load::NotLoaded => {}
            Load::Loading(_) => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading history...");
                });
            }
            Load::Failed(msg) => {
                feedback::error(ui, msg);
                if ui.button("Try Again").clicked() {
                    self.reload(ctx);
                }
            }
            Load::Loaded(records) if records.is_empty() => {
                ui.label(NO_HISTORY);
                if ui.button("Go to Scraper").clicked() {
                    ctx.nav.navigate(Route::Scrape);
                }
            }
            Load::Loaded(records) => {
                if let Some(err) = &self.export_error {
                    feedback::error(ui, err);
                }
                if let Some(n) = &self.notice {
                    feedback::notice(ui, n);
                }
                if let Some(i) = self.draw_table(ui, records) {
                    self.export_record(i, ctx);
                }
            }
        }
    }
}
