//! # State, Effects, and Mounts
//!
//! Tether is a small reactive core for page behaviour: stateful "hooks" whose
//! subscriptions are bound to the lifetime of a mount. The main pieces:
//!
//! - `Signal<T>`: observable value; writes ask the runner for a new frame.
//! - `remember*`: slot storage owned by the mount, stable across frames.
//! - `disposable_effect` / `mount_effect` / `side_effect`: side effects that
//!   run after the frame is rendered, with symmetric cleanup.
//! - `Host`: a single mount. It composes, lets the runner render, flushes effects,
//!   and tears everything down on `unmount`.
//! - `Platform`: the injected capability object every effect talks to.
//!
//! ## Signals
//!
//! ```rust
//! use tether_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! assert!(!count.set_if_changed(2));
//! ```
//!
//! ## Remembered state
//!
//! `remember` is order‑based: the Nth call in a composition always refers to
//! the Nth stored value, so hooks must be called unconditionally and in the
//! same order every frame. `remember_with_key` is key‑based and survives
//! conditional branches.
//!
//! ## Effects and cleanup
//!
//! ```rust,ignore
//! fn Example() -> View {
//!     let node = remember(NodeRef::new);
//!     mount_effect({
//!         let node = (*node).clone();
//!         move || {
//!             log::info!("mounted with element {:?}", node.current());
//!             on_unmount(|| log::info!("unmounted"))
//!         }
//!     });
//!     Div().node_ref((*node).clone())
//! }
//! ```
//!
//! Effects run after rendering so element references are live. Every cleanup
//! returned by an effect runs exactly once: on key change or on unmount.

pub mod effects;
pub mod effects_ext;
pub mod error;
pub mod events;
pub mod geometry;
pub mod locals;
pub mod node_ref;
pub mod platform;
pub mod prelude;
pub mod runtime;
pub mod scope;
pub mod signal;
pub mod view;

pub use effects::*;
pub use effects_ext::*;
pub use error::*;
pub use events::*;
pub use geometry::*;
pub use locals::*;
pub use node_ref::*;
pub use platform::*;
pub use runtime::*;
pub use scope::*;
pub use signal::*;
pub use view::*;
