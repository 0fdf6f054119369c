use std::cell::Cell;
use std::rc::Rc;

use tether_core::*;

/// Toggle for the "are you sure you want to leave?" prompt on page unload.
#[derive(Clone)]
pub struct PreventLeave {
    platform: Rc<dyn Platform>,
    active: Rc<Cell<Option<ListenerId>>>,
    liveness: Option<Liveness>,
}

impl PreventLeave {
    /// Registers the unload guard. Enabling twice keeps a single registration;
    /// a handle whose mount is gone does nothing.
    pub fn enable(&self) {
        if self.liveness.as_ref().is_some_and(|l| !l.is_alive()) {
            log::warn!("use_prevent_leave: enable after unmount ignored");
            return;
        }
        if self.active.get().is_some() {
            log::debug!("use_prevent_leave: already enabled");
            return;
        }
        let listener: Listener = Rc::new(|event: &Event| {
            event.prevent_default();
            event.set_return_value("");
        });
        let id = self
            .platform
            .add_listener(EventTarget::Window, EventKind::BeforeUnload, listener);
        self.active.set(Some(id));
    }

    /// Removes the unload guard if it is registered.
    pub fn disable(&self) {
        if let Some(id) = self.active.take() {
            self.platform.remove_listener(id);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.active.get().is_some()
    }
}

/// Unload protection the page can switch on and off. Whatever is still
/// enabled at unmount is removed.
pub fn use_prevent_leave() -> PreventLeave {
    let active = remember(|| Cell::new(None::<ListenerId>));
    let guard = PreventLeave {
        platform: platform(),
        active: active.clone(),
        liveness: current_scope().map(|s| s.liveness()),
    };
    mount_effect({
        let guard = guard.clone();
        move || on_unmount(move || guard.disable())
    });
    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::*;
    use std::cell::RefCell;
    use tether_platform::HeadlessApp;

    fn mount() -> (HeadlessApp, Rc<RefCell<Option<PreventLeave>>>) {
        let out = Rc::new(RefCell::new(None));
        let app = HeadlessApp::new({
            let out = out.clone();
            move || {
                let guard = use_prevent_leave();
                *out.borrow_mut() = Some(guard.clone());
                let (enable, disable) = (guard.clone(), guard);
                Div().child((
                    Button("Protect", move || enable.enable()),
                    Button("Unprotect", move || disable.disable()),
                ))
            }
        });
        (app, out)
    }

    fn unload_guards(app: &HeadlessApp) -> usize {
        app.platform()
            .active_listeners(EventTarget::Window, EventKind::BeforeUnload)
    }

    #[test]
    fn enable_guards_unload() {
        let (mut app, _out) = mount();
        app.settle();
        assert!(!app.platform().before_unload().default_prevented());

        app.click_button("Protect");
        let event = app.platform().before_unload();
        assert!(event.default_prevented());
        assert_eq!(event.return_value().as_deref(), Some(""));

        app.click_button("Unprotect");
        assert!(!app.platform().before_unload().default_prevented());
    }

    #[test]
    fn toggling_is_idempotent() {
        let (mut app, out) = mount();
        app.settle();
        app.click_button("Protect");
        app.click_button("Protect");
        assert_eq!(unload_guards(&app), 1);
        assert!(out.borrow().as_ref().is_some_and(PreventLeave::is_enabled));

        app.click_button("Unprotect");
        app.click_button("Unprotect");
        assert_eq!(unload_guards(&app), 0);
    }

    #[test]
    fn unmount_removes_enabled_guard() {
        let (mut app, _out) = mount();
        app.settle();
        app.click_button("Protect");
        app.unmount();
        assert_eq!(unload_guards(&app), 0);
        assert!(!app.platform().before_unload().default_prevented());
    }

    #[test]
    fn enable_after_unmount_is_ignored() {
        let (mut app, out) = mount();
        app.settle();
        let kept = out.borrow().clone().expect("guard captured during compose");
        app.unmount();

        kept.enable();
        assert!(!kept.is_enabled());
        assert_eq!(unload_guards(&app), 0);
        assert!(!app.platform().before_unload().default_prevented());
    }
}
