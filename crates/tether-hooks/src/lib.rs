#![allow(non_snake_case)]
//! Reusable page behaviours ("hooks") and the view builders they render with.
//!
//! Every hook is called from a composable function, unconditionally and in the
//! same order each frame. Hooks keep their state in remembered slots, reach
//! the outside world through the ambient [`Platform`](tether_core::Platform),
//! and register only post-commit effects whose cleanups run on unmount.
//!
//! ```rust,ignore
//! use tether_hooks::*;
//!
//! fn Greeting() -> View {
//!     let name = use_input("Mr.", Some(Rc::new(|v: &str| v.len() < 10)));
//!     let title = use_title("Loading...");
//!     Div().child((H1(format!("Hello {}", name.value)), name.view("Name")))
//! }
//! ```

pub mod before_leave;
pub mod click;
pub mod confirm;
pub mod fade_in;
pub mod fetch;
pub mod fullscreen;
pub mod input;
pub mod interval;
pub mod network;
pub mod notification;
pub mod prevent_leave;
pub mod scroll;
pub mod tabs;
pub mod title;
pub mod widgets;

pub use before_leave::*;
pub use click::*;
pub use confirm::*;
pub use fade_in::*;
pub use fetch::*;
pub use fullscreen::*;
pub use input::*;
pub use interval::*;
pub use network::*;
pub use notification::*;
pub use prevent_leave::*;
pub use scroll::*;
pub use tabs::*;
pub use title::*;
pub use widgets::*;

pub use tether_core::prelude::*;

use std::rc::Rc;

/// Identity of a shared callback, for keying effects on "same closure".
pub(crate) fn callback_key<T: ?Sized>(callback: &Rc<T>) -> usize {
    Rc::as_ptr(callback) as *const () as usize
}
