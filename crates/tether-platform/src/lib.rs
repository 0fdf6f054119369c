//! Platform runners: a scriptable headless platform for tests and native
//! sessions, and a browser runner on web-sys (wasm32 only).

pub mod controlled;
pub mod headless;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use controlled::ControlledInput;
pub use headless::*;

#[cfg(target_arch = "wasm32")]
pub use web::*;
