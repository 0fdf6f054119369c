use std::cell::Cell;
use std::rc::Rc;

thread_local! {
    static NEXT_ELEMENT: Cell<u64> = const { Cell::new(1) };
}

/// Platform-side identity of a rendered element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl ElementId {
    pub fn next() -> Self {
        NEXT_ELEMENT.with(|n| {
            let id = n.get();
            n.set(id + 1);
            ElementId(id)
        })
    }
}

/// Handle to an element that a hook wants to reach after rendering.
///
/// The id is fixed when the ref is created; the renderer flips it live when
/// it puts a view carrying this ref on screen and back when it removes it.
#[derive(Clone)]
pub struct NodeRef(Rc<Inner>);

struct Inner {
    id: ElementId,
    live: Cell<bool>,
}

impl Default for NodeRef {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRef {
    pub fn new() -> Self {
        Self(Rc::new(Inner {
            id: ElementId::next(),
            live: Cell::new(false),
        }))
    }

    pub fn id(&self) -> ElementId {
        self.0.id
    }

    /// The element, if it is currently rendered.
    pub fn current(&self) -> Option<ElementId> {
        self.0.live.get().then_some(self.0.id)
    }

    pub fn is_live(&self) -> bool {
        self.0.live.get()
    }

    pub fn attach(&self) {
        self.0.live.set(true);
    }

    pub fn detach(&self) {
        self.0.live.set(false);
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.0.id)
            .field("live", &self.0.live.get())
            .finish()
    }
}
