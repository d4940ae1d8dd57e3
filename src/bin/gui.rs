// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use eframe::egui::{IconData, ViewportBuilder};
use scrapedesk::{
    config::{
        consts::{WINDOW_H, WINDOW_W},
        AppOptions,
    },
    gui::{self, router::Route},
    logging,
};

fn app_icon() -> Option<IconData> {
    let img = image::load_from_memory(include_bytes!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/assets/scrapedesk.png"
    )))
    .ok()?
    .to_rgba8();
    let (w, h) = img.dimensions();
    Some(IconData { rgba: img.into_raw(), width: w, height: h })
}

fn main() {
    let opts = AppOptions::from_env();
    logging::init(&opts.store_dir);

    // Optional start path, e.g. `scrapedesk /history`
    let start = std::env::args().nth(1).map(|p| Route::from_path(&p)).unwrap_or_default();

    let mut viewport = ViewportBuilder::default().with_inner_size([WINDOW_W, WINDOW_H]);
    if let Some(icon) = app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let native = eframe::NativeOptions { viewport, ..Default::default() };

    if let Err(e) = gui::run(native, opts, start) {
        eprintln!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
