// src/gui/components/mod.rs
pub mod feedback;
pub mod navbar;
