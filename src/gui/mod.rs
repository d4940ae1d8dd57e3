// src/gui/mod.rs
pub mod app;
pub mod components;
pub mod pages;
pub mod router;
pub mod task;

pub use app::run;
