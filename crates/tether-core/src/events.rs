use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::Vec2;
use crate::node_ref::ElementId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Input,
    MouseLeave,
    Scroll,
    Online,
    Offline,
    BeforeUnload,
    FullscreenChange,
}

impl EventKind {
    /// DOM event type name.
    pub fn dom_name(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Input => "input",
            EventKind::MouseLeave => "mouseleave",
            EventKind::Scroll => "scroll",
            EventKind::Online => "online",
            EventKind::Offline => "offline",
            EventKind::BeforeUnload => "beforeunload",
            EventKind::FullscreenChange => "fullscreenchange",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Document,
    Element(ElementId),
}

#[derive(Clone, Debug, PartialEq, Default)]
pub enum EventPayload {
    #[default]
    None,
    Pointer {
        client_x: f32,
        client_y: f32,
    },
    Input {
        value: String,
    },
    Scroll {
        offset: Vec2,
    },
}

/// A dispatched platform event.
///
/// Listeners get a shared reference; the two mutable bits a listener may touch
/// (`prevent_default` and the unload `return_value`) use interior mutability so
/// the dispatcher can read them back afterwards.
#[derive(Debug)]
pub struct Event {
    pub kind: EventKind,
    pub target: EventTarget,
    pub payload: EventPayload,
    default_prevented: Cell<bool>,
    return_value: RefCell<Option<String>>,
}

pub type Listener = Rc<dyn Fn(&Event)>;

impl Event {
    pub fn new(kind: EventKind, target: EventTarget) -> Self {
        Self {
            kind,
            target,
            payload: EventPayload::None,
            default_prevented: Cell::new(false),
            return_value: RefCell::new(None),
        }
    }

    pub fn with_payload(mut self, payload: EventPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn input(target: EventTarget, value: impl Into<String>) -> Self {
        Self::new(EventKind::Input, target).with_payload(EventPayload::Input {
            value: value.into(),
        })
    }

    pub fn input_value(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::Input { value } => Some(value),
            _ => None,
        }
    }

    pub fn client_y(&self) -> Option<f32> {
        match self.payload {
            EventPayload::Pointer { client_y, .. } => Some(client_y),
            _ => None,
        }
    }

    pub fn scroll_offset(&self) -> Option<Vec2> {
        match self.payload {
            EventPayload::Scroll { offset } => Some(offset),
            _ => None,
        }
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn set_return_value(&self, value: impl Into<String>) {
        *self.return_value.borrow_mut() = Some(value.into());
    }

    pub fn return_value(&self) -> Option<String> {
        self.return_value.borrow().clone()
    }
}
