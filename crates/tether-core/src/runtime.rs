use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::locals::with_platform;
use crate::platform::Platform;
use crate::scope::Scope;
use crate::view::View;

thread_local! {
    pub static COMPOSER: RefCell<Composer> = RefCell::new(Composer::default());
    static COMPOSING: Cell<bool> = const { Cell::new(false) };
    static PENDING_EFFECTS: RefCell<Vec<Box<dyn FnOnce()>>> = const { RefCell::new(Vec::new()) };
    static INVALIDATED: Cell<bool> = const { Cell::new(false) };
    static FRAME_REQUEST: RefCell<Option<Rc<dyn Fn()>>> = const { RefCell::new(None) };
}

#[derive(Default)]
pub struct Composer {
    pub slots: Vec<Box<dyn Any>>,
    pub cursor: usize,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
}

/// Installs a host's slots as the thread's composer for the duration of one
/// composition and swaps them back out on drop (including on unwind).
struct ComposeGuard<'a> {
    slots: &'a mut Composer,
}

impl<'a> ComposeGuard<'a> {
    fn begin(slots: &'a mut Composer) -> Self {
        COMPOSER.with(|c| {
            let mut c = c.borrow_mut();
            std::mem::swap(&mut *c, &mut *slots);
            c.cursor = 0;
        });
        COMPOSING.with(|f| f.set(true));
        ComposeGuard { slots }
    }
}

impl Drop for ComposeGuard<'_> {
    fn drop(&mut self) {
        COMPOSING.with(|f| f.set(false));
        COMPOSER.with(|c| std::mem::swap(&mut *c.borrow_mut(), &mut *self.slots));
    }
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let cursor = c.cursor;
        c.cursor += 1;

        if cursor >= c.slots.len() {
            let rc: Rc<T> = Rc::new(init());
            c.slots.push(Box::new(rc.clone()));
            return rc;
        }

        if let Some(rc) = c.slots[cursor].downcast_ref::<Rc<T>>() {
            rc.clone()
        } else {
            // replace (else panics)
            log::warn!(
                "remember: slot {} type changed; replacing. \
                 If this is due to conditional composition, prefer remember_with_key.",
                cursor
            );
            let rc: Rc<T> = Rc::new(init());
            c.slots[cursor] = Box::new(rc.clone());
            rc
        }
    })
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let key = key.into();

        if let Some(existing) = c.keyed_slots.get(&key) {
            if let Some(rc) = existing.downcast_ref::<Rc<T>>() {
                return rc.clone();
            } else {
                log::warn!(
                    "remember_with_key: key '{}' reused with a different type; replacing.",
                    key
                );
            }
        }

        let rc: Rc<T> = Rc::new(init());
        c.keyed_slots.insert(key, Box::new(rc.clone()));
        rc
    })
}

/// Queues `f` to run once the current frame has been rendered.
///
/// Element references are only live after rendering, so anything that touches
/// an element (listeners, styles) belongs here rather than in composition.
pub fn after_commit(f: impl FnOnce() + 'static) {
    PENDING_EFFECTS.with(|q| q.borrow_mut().push(Box::new(f)));
}

/// Marks the tree stale and asks the platform for a frame.
///
/// Writes made during composition only mark; runners check `is_invalidated`
/// once the frame is done.
pub fn invalidate() {
    INVALIDATED.with(|i| i.set(true));
    if COMPOSING.with(|c| c.get()) {
        return;
    }
    let request = FRAME_REQUEST.with(|r| r.borrow().clone());
    if let Some(request) = request {
        request();
    }
}

pub fn is_invalidated() -> bool {
    INVALIDATED.with(|i| i.get())
}

/// Owns one mount: its remembered slots, its scope and the platform it runs on.
///
/// `frame` mounts lazily; `unmount` tears everything down and a following
/// `frame` starts again from empty slots.
pub struct Host {
    platform: Rc<dyn Platform>,
    composer: Composer,
    scope: Option<Scope>,
    frames: u64,
}

impl Host {
    pub fn new(platform: Rc<dyn Platform>) -> Self {
        let request: Rc<dyn Fn()> = {
            let platform = platform.clone();
            Rc::new(move || platform.request_frame())
        };
        FRAME_REQUEST.with(|r| *r.borrow_mut() = Some(request));

        Self {
            platform,
            composer: Composer::default(),
            scope: None,
            frames: 0,
        }
    }

    pub fn platform(&self) -> &Rc<dyn Platform> {
        &self.platform
    }

    pub fn is_mounted(&self) -> bool {
        self.scope.is_some()
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Compose, render, then run the effects queued during composition.
    pub fn frame(
        &mut self,
        build_root: impl FnOnce() -> View,
        render: impl FnOnce(&View),
    ) -> View {
        let scope = self
            .scope
            .get_or_insert_with(|| {
                log::debug!("host: mounting");
                Scope::new()
            })
            .clone();
        let platform = self.platform.clone();

        INVALIDATED.with(|i| i.set(false));
        let view = {
            let _guard = ComposeGuard::begin(&mut self.composer);
            with_platform(platform.clone(), || scope.run(build_root))
        };

        render(&view);

        let effects = PENDING_EFFECTS.with(|q| std::mem::take(&mut *q.borrow_mut()));
        if !effects.is_empty() {
            log::trace!("host: running {} post-commit effects", effects.len());
        }
        with_platform(platform, || {
            scope.run(|| {
                for effect in effects {
                    effect();
                }
            })
        });

        self.frames += 1;
        view
    }

    pub fn unmount(&mut self) {
        let Some(scope) = self.scope.take() else {
            return;
        };
        log::debug!("host: unmounting after {} frames", self.frames);
        PENDING_EFFECTS.with(|q| q.borrow_mut().clear());
        with_platform(self.platform.clone(), || scope.dispose());
        self.composer = Composer::default();
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.unmount();
    }
}
