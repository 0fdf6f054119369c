use std::cell::RefCell;
use std::rc::Rc;

use tether_core::*;

use crate::widgets::Input;

/// Accepts or rejects a candidate input value.
pub type Validator = Rc<dyn Fn(&str) -> bool>;

/// Value and change handler for a controlled text input.
#[derive(Clone)]
pub struct InputBinding {
    pub value: String,
    pub on_change: InputCallback,
}

impl InputBinding {
    /// Renders an input bound to this value.
    pub fn view(&self, placeholder: impl Into<String>) -> View {
        Input(placeholder, self.value.clone(), Some(self.on_change.clone()))
    }
}

impl std::fmt::Debug for InputBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputBinding")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Controlled text value. A change is stored only when `validator` is absent
/// or accepts the candidate; the validator passed on the latest frame wins.
pub fn use_input(initial: impl Into<String>, validator: Option<Validator>) -> InputBinding {
    let value = remember(|| signal(initial.into()));
    let current = remember(|| RefCell::new(None::<Validator>));
    *current.borrow_mut() = validator;

    let on_change: InputCallback = {
        let value = (*value).clone();
        Rc::new(move |event: &Event| {
            let Some(candidate) = event.input_value() else {
                log::debug!("use_input: {:?} event carries no value", event.kind);
                return;
            };
            let validator = current.borrow().clone();
            if validator.is_none_or(|accept| accept(candidate)) {
                value.set_if_changed(candidate.to_string());
            } else {
                log::trace!("use_input: rejected {candidate:?}");
            }
        })
    };

    InputBinding {
        value: value.get(),
        on_change,
    }
}
