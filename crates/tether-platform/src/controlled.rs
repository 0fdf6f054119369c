//! Controlled text inputs: an input element shows what the last frame rendered,
//! not whatever was typed into it.

use std::cell::RefCell;
use std::rc::Rc;

/// The value a frame last rendered into one input element.
#[derive(Clone, Default)]
pub struct ControlledInput {
    rendered: Rc<RefCell<String>>,
}

impl ControlledInput {
    /// Records the value a frame rendered. Returns true when the element
    /// currently shows something else and must be overwritten.
    pub fn render(&self, value: &str, shown: &str) -> bool {
        if *self.rendered.borrow() != value {
            *self.rendered.borrow_mut() = value.to_string();
        }
        shown != value
    }

    /// Passes `typed` to the input handler and returns the text the element
    /// should show until the next frame. A rejected value is thus reverted
    /// right away; an accepted one arrives with the frame it requested.
    pub fn dispatch(&self, typed: String, handler: impl FnOnce(String)) -> String {
        handler(typed);
        self.rendered.borrow().clone()
    }

    pub fn rendered(&self) -> String {
        self.rendered.borrow().clone()
    }
}
