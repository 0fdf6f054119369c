use std::rc::Rc;

use tether_core::*;

use crate::callback_key;

/// Calls `on_before` when the pointer leaves the document through its top
/// edge (pointer y at or above zero), the usual "about to close the tab" move.
pub fn use_before_leave(on_before: Rc<dyn Fn()>) {
    let platform = platform();
    disposable_effect(callback_key(&on_before), move || {
        let listener: Listener = Rc::new(move |event: &Event| {
            if event.client_y().is_some_and(|y| y <= 0.0) {
                on_before();
            }
        });
        let id = platform.add_listener(EventTarget::Document, EventKind::MouseLeave, listener);
        on_unmount(move || {
            platform.remove_listener(id);
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::*;
    use std::cell::Cell;
    use tether_platform::HeadlessApp;

    fn mount() -> (HeadlessApp, Rc<Cell<u32>>) {
        let pleas = Rc::new(Cell::new(0));
        let callback: Rc<dyn Fn()> = {
            let pleas = pleas.clone();
            Rc::new(move || pleas.set(pleas.get() + 1))
        };
        let app = HeadlessApp::new(move || {
            use_before_leave(callback.clone());
            H1("Don't leave")
        });
        (app, pleas)
    }

    #[test]
    fn leaving_through_the_top_triggers() {
        let (mut app, pleas) = mount();
        app.settle();
        app.platform().mouse_leave(120.0, 0.0);
        app.platform().mouse_leave(120.0, -4.0);
        assert_eq!(pleas.get(), 2);
    }

    #[test]
    fn leaving_elsewhere_is_ignored() {
        let (mut app, pleas) = mount();
        app.settle();
        app.platform().mouse_leave(0.0, 300.0);
        app.platform().mouse_leave(800.0, 1.0);
        assert_eq!(pleas.get(), 0);
    }

    #[test]
    fn unmount_stops_listening() {
        let (mut app, pleas) = mount();
        app.settle();
        app.unmount();
        app.platform().mouse_leave(10.0, 0.0);
        assert_eq!(pleas.get(), 0);
        assert_eq!(app.platform().listener_count(), 0);
    }
}
