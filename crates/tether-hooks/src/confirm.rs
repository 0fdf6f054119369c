use std::rc::Rc;

use tether_core::*;

/// Builds an action that asks the user `message` and runs `on_confirm` on
/// acceptance or `on_cancel` (if any) on rejection.
///
/// The dialog is shown only when the returned action is invoked.
pub fn use_confirm(
    message: impl Into<String>,
    on_confirm: Rc<dyn Fn()>,
    on_cancel: Option<Rc<dyn Fn()>>,
) -> Callback {
    let message = message.into();
    let platform = platform();
    Rc::new(move || {
        if platform.confirm(&message) {
            on_confirm();
        } else if let Some(cancel) = &on_cancel {
            cancel();
        } else {
            log::debug!("use_confirm: {message:?} declined");
        }
    })
}
