//! # Composition locals
//!
//! Tether keeps ambient values in a thread‑local stack of "composition
//! locals" instead of passing them through every hook signature. The one every
//! hook needs is the [`Platform`] capability object:
//!
//! ```rust,ignore
//! use tether_core::*;
//!
//! with_platform(platform.clone(), || {
//!     // hooks called here reach the browser (or the headless stand-in)
//!     // through `platform()`
//! });
//! ```
//!
//! `Host::frame` installs the platform for both composition and post-commit
//! effects, so hooks rarely call `with_platform` themselves.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::platform::Platform;

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = const { RefCell::new(Vec::new()) };
}

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // Non-panicking frame guard (ensures pop on unwind)
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_local_boxed(t: TypeId, v: Box<dyn Any>) {
    LOCALS_STACK.with(|st| {
        if let Some(top) = st.borrow_mut().last_mut() {
            top.insert(t, v);
        } else {
            // no frame: create a temporary one
            let mut m = HashMap::new();
            m.insert(t, v);
            st.borrow_mut().push(m);
        }
    });
}

fn local<T: Clone + 'static>() -> Option<T> {
    LOCALS_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<T>())
                && let Some(t) = v.downcast_ref::<T>()
            {
                return Some(t.clone());
            }
        }
        None
    })
}

pub fn with_platform<R>(platform: Rc<dyn Platform>, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<Rc<dyn Platform>>(), Box::new(platform));
        f()
    })
}

pub fn try_platform() -> Option<Rc<dyn Platform>> {
    local::<Rc<dyn Platform>>()
}

/// The platform of the frame being composed.
///
/// # Panics
///
/// When called outside `Host::frame` / `with_platform`. Hooks are only valid
/// during composition.
pub fn platform() -> Rc<dyn Platform> {
    match try_platform() {
        Some(p) => p,
        None => panic!("hook called outside a frame: no platform installed (use Host::frame)"),
    }
}
