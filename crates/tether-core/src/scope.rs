use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

thread_local! {
    static CURRENT_SCOPE: RefCell<Option<Weak<ScopeInner>>> = const { RefCell::new(None) };
}

/// The lifetime of one mount. Everything registered here is torn down together.
#[derive(Clone)]
pub struct Scope {
    inner: Rc<ScopeInner>,
}

struct ScopeInner {
    alive: Rc<Cell<bool>>,
    disposers: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl ScopeInner {
    fn teardown(&self) {
        self.alive.set(false);
        // Reverse registration order.
        let disposers = std::mem::take(&mut *self.disposers.borrow_mut());
        for disposer in disposers.into_iter().rev() {
            disposer();
        }
    }
}

/// Cheap, cloneable view of whether a scope has been disposed yet.
///
/// Async completions hold one of these instead of the scope itself, so a late
/// result can check that its mount still exists before touching state.
#[derive(Clone)]
pub struct Liveness(Rc<Cell<bool>>);

impl Liveness {
    pub fn is_alive(&self) -> bool {
        self.0.get()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                alive: Rc::new(Cell::new(true)),
                disposers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Runs `f` with this scope as the current one; the previous scope is
    /// restored afterwards, also on unwind.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        struct Restore(Option<Weak<ScopeInner>>);
        impl Drop for Restore {
            fn drop(&mut self) {
                let prev = self.0.take();
                CURRENT_SCOPE.with(|current| *current.borrow_mut() = prev);
            }
        }

        let prev = CURRENT_SCOPE.with(|current| {
            current.borrow_mut().replace(Rc::downgrade(&self.inner))
        });
        let _restore = Restore(prev);
        f()
    }

    /// Registers a cleanup. On a scope that is already gone the cleanup runs
    /// right away.
    pub fn add_disposer(&self, disposer: impl FnOnce() + 'static) {
        if !self.is_alive() {
            log::debug!("scope: disposer added after teardown; running it now");
            disposer();
            return;
        }
        self.inner.disposers.borrow_mut().push(Box::new(disposer));
    }

    pub fn is_alive(&self) -> bool {
        self.inner.alive.get()
    }

    pub fn liveness(&self) -> Liveness {
        Liveness(self.inner.alive.clone())
    }

    pub fn dispose(self) {
        self.inner.teardown();
    }
}

pub fn current_scope() -> Option<Scope> {
    CURRENT_SCOPE.with(|current| {
        let inner = current.borrow().as_ref()?.upgrade()?;
        Some(Scope { inner })
    })
}

/// Runs `f` now and ties the cleanup it returns to the current scope.
pub fn scoped_effect<F>(f: F)
where
    F: FnOnce() -> Box<dyn FnOnce()> + 'static,
{
    let cleanup = f();
    match current_scope() {
        Some(scope) => scope.add_disposer(cleanup),
        None => log::warn!("scoped_effect: no current scope; cleanup dropped without running"),
    }
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        self.teardown();
    }
}
