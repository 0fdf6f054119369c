use std::rc::Rc;

use tether_core::*;

use crate::callback_key;

/// Runs `on_click` whenever the element carrying the returned ref is clicked.
///
/// The listener is bound after render and rebound only when a different
/// callback `Rc` is passed; unmounting removes it. Nothing is bound while the
/// ref is not attached to a rendered view.
pub fn use_click(on_click: Rc<dyn Fn()>) -> NodeRef {
    let node = remember(NodeRef::new);
    let element = (*node).clone();
    let platform = platform();

    disposable_effect(callback_key(&on_click), move || {
        let Some(id) = element.current() else {
            log::debug!("use_click: element not rendered; nothing to bind");
            return Dispose::noop();
        };
        let listener: Listener = Rc::new(move |_: &Event| on_click());
        let listener_id = platform.add_listener(EventTarget::Element(id), EventKind::Click, listener);
        on_unmount(move || {
            platform.remove_listener(listener_id);
        })
    });

    (*node).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::*;
    use std::cell::{Cell, RefCell};
    use tether_platform::{HeadlessApp, ListenerRecord};

    #[test]
    fn clicks_reach_the_callback() {
        let clicks = Rc::new(Cell::new(0));
        let callback: Rc<dyn Fn()> = {
            let clicks = clicks.clone();
            Rc::new(move || clicks.set(clicks.get() + 1))
        };
        let mut app = HeadlessApp::new(move || {
            let title = use_click(callback.clone());
            H1("Hi").node_ref(title)
        });
        app.settle();
        let id = app.view().and_then(|v| v.node_ref.as_ref()).map(NodeRef::id);
        let Some(id) = id else {
            panic!("heading has no ref");
        };

        app.platform().click(id);
        app.platform().click(id);
        assert_eq!(clicks.get(), 2);
    }

    #[test]
    fn same_callback_binds_once_across_frames() {
        let callback: Rc<dyn Fn()> = Rc::new(|| {});
        let mut app = HeadlessApp::new(move || {
            let r = use_click(callback.clone());
            Div().node_ref(r)
        });
        for _ in 0..5 {
            app.settle();
        }
        assert_eq!(app.platform().listener_count(), 1);
    }

    #[test]
    fn new_callback_replaces_old_binding() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let generation = Rc::new(Cell::new(0));
        let mut app = HeadlessApp::new({
            let log = log.clone();
            let generation = generation.clone();
            let mut cached: Option<(u32, Rc<dyn Fn()>)> = None;
            move || {
                let g = generation.get();
                let callback = match &cached {
                    Some((cg, cb)) if *cg == g => cb.clone(),
                    _ => {
                        let log = log.clone();
                        let cb: Rc<dyn Fn()> = Rc::new(move || log.borrow_mut().push(g));
                        cached = Some((g, cb.clone()));
                        cb
                    }
                };
                let r = use_click(callback);
                Div().node_ref(r)
            }
        });
        app.settle();
        generation.set(1);
        app.settle();

        let id = app.view().and_then(|v| v.node_ref.as_ref()).map(NodeRef::id);
        if let Some(id) = id {
            app.platform().click(id);
        }
        assert_eq!(*log.borrow(), vec![1]);
        assert_eq!(app.platform().listener_count(), 1);
    }

    #[test]
    fn unbound_when_ref_not_rendered() {
        let mut app = HeadlessApp::new(|| {
            let _unused = use_click(Rc::new(|| {}));
            Div()
        });
        app.settle();
        assert_eq!(app.platform().listener_count(), 0);
    }

    #[test]
    fn mount_unmount_cycles_leave_nothing_behind() {
        let callback: Rc<dyn Fn()> = Rc::new(|| {});
        let mut app = HeadlessApp::new(move || {
            let r = use_click(callback.clone());
            Button("Go", || {}).node_ref(r)
        });

        for _ in 0..4 {
            app.settle();
            assert_eq!(app.platform().listener_count(), 1);
            app.unmount();
            assert_eq!(app.platform().listener_count(), 0);
        }

        let log = app.platform().listener_log();
        let attached = log
            .iter()
            .filter(|r| matches!(r, ListenerRecord::Attached { .. }))
            .count();
        let detached = log
            .iter()
            .filter(|r| matches!(r, ListenerRecord::Detached { .. }))
            .count();
        assert_eq!((attached, detached), (4, 4));
    }
}
