//! The practice page: one screen that exercises every Tether hook.

pub mod app;
pub mod options;

#[cfg(target_arch = "wasm32")]
mod web;

pub use app::{App, SECTIONS, Section};
pub use options::{CAT_FACT_URL, PageOptions};
