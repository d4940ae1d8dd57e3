// src/lib.rs
// #![allow(dead_code)]

#[macro_use]
pub mod macros;
#[macro_use]
pub mod logging;

pub mod api;
pub mod cli;
pub mod config;
pub mod export;
pub mod forms;
pub mod gui;
pub mod session;
