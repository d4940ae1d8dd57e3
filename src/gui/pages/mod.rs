// src/gui/pages/mod.rs
use std::path::{Path, PathBuf};

use eframe::egui;

use crate::{
    api::ApiClient,
    export::{self, ExportError, FileName, SaveToDir},
    session::SessionStore,
};

use super::{router::{Navigator, Route}, task::Exec};

pub mod history;
pub mod login;
pub mod scrape;
pub mod signup;

/// What a page gets to work with: the session, the backend, navigation and
/// the export target. Pages hold no references between frames.
pub struct AppCtx<'a> {
    pub session: &'a mut SessionStore,
    pub api: &'a ApiClient,
    pub nav: &'a mut Navigator,
    pub exec: &'a Exec,
    pub downloads: &'a SaveToDir,
    pub staging_dir: &'a Path,
}

impl AppCtx<'_> {
    /// Save `content` as a text file named per `name`.
    pub fn export(&self, content: &str, name: FileName) -> Result<PathBuf, ExportError> {
        export::export_text_file(content, Some(&name), self.downloads, self.staging_dir)
    }
}

pub trait Page {
    fn route(&self) -> Route;
    fn title(&self) -> &'static str;

    /// Called when the page becomes current (the "mount").
    fn on_enter(&mut self, _ctx: &mut AppCtx) {}

    /// Called when navigating away. In-flight requests must be dropped here.
    fn on_leave(&mut self) {}

    /// Pick up finished background work. Runs every frame before `draw`.
    fn poll(&mut self, _ctx: &mut AppCtx) {}

    /// True while a request is in flight.
    fn is_busy(&self) -> bool {
        false
    }

    fn draw(&mut self, ui: &mut egui::Ui, ctx: &mut AppCtx);
}
