use std::cell::RefCell;
use std::rc::Rc;

use tether_core::*;

pub type FullscreenCallback = Rc<dyn Fn(bool)>;

/// Fullscreen controls for one element.
#[derive(Clone)]
pub struct Fullscreen {
    pub node_ref: NodeRef,
    /// Whether the platform currently shows this element fullscreen.
    pub is_fullscreen: bool,
    platform: Rc<dyn Platform>,
}

impl Fullscreen {
    /// Asks for the element to go fullscreen. The outcome arrives later as a
    /// fullscreen change; failures are logged.
    pub fn trigger(&self) {
        let Some(id) = self.node_ref.current() else {
            log::warn!("use_full_screen: trigger before the element is rendered");
            return;
        };
        if let Err(e) = self.platform.request_fullscreen(id) {
            log::warn!("use_full_screen: {e}");
        }
    }

    /// Leaves fullscreen, but only when this element is the one shown.
    pub fn exit(&self) {
        if self.platform.fullscreen_element() != Some(self.node_ref.id()) {
            log::debug!("use_full_screen: exit while this element is not fullscreen");
            return;
        }
        if let Err(e) = self.platform.exit_fullscreen() {
            log::warn!("use_full_screen: {e}");
        }
    }
}

/// Tracks whether the element carrying `node_ref` is the fullscreen element.
///
/// State and `on_change` follow the platform's fullscreen change
/// notifications, so they also catch the user leaving fullscreen with Esc.
/// `on_change` fires only when the state actually flips.
pub fn use_full_screen(on_change: Option<FullscreenCallback>) -> Fullscreen {
    let node = remember(NodeRef::new);
    let active = remember(|| signal(false));
    let callback = remember(|| RefCell::new(None::<FullscreenCallback>));
    *callback.borrow_mut() = on_change;
    let platform = platform();

    {
        let platform = platform.clone();
        let element = (*node).clone();
        let active = (*active).clone();
        mount_effect(move || {
            let listener: Listener = {
                let platform = platform.clone();
                Rc::new(move |_: &Event| {
                    let now = platform.fullscreen_element() == Some(element.id());
                    if active.set_if_changed(now) {
                        log::debug!("use_full_screen: fullscreen = {now}");
                        let cb = callback.borrow().clone();
                        if let Some(cb) = cb {
                            cb(now);
                        }
                    }
                })
            };
            let id = platform.add_listener(EventTarget::Document, EventKind::FullscreenChange, listener);
            on_unmount(move || {
                platform.remove_listener(id);
            })
        });
    }

    Fullscreen {
        node_ref: (*node).clone(),
        is_fullscreen: active.get(),
        platform,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::*;
    use tether_platform::HeadlessApp;

    fn mount() -> (HeadlessApp, Rc<RefCell<Vec<bool>>>, Rc<RefCell<Option<Fullscreen>>>) {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let out = Rc::new(RefCell::new(None));
        let app = HeadlessApp::new({
            let changes = changes.clone();
            let out = out.clone();
            move || {
                let cb: FullscreenCallback = {
                    let changes = changes.clone();
                    Rc::new(move |on| changes.borrow_mut().push(on))
                };
                let fs = use_full_screen(Some(cb));
                *out.borrow_mut() = Some(fs.clone());
                let (enter, exit) = (fs.clone(), fs.clone());
                Div().node_ref(fs.node_ref.clone()).child((
                    P(if fs.is_fullscreen { "big" } else { "small" }),
                    Button("Make fullscreen", move || enter.trigger()),
                    Button("Exit fullscreen", move || exit.exit()),
                ))
            }
        });
        (app, changes, out)
    }

    #[test]
    fn state_follows_platform_notifications() {
        let (mut app, changes, _out) = mount();
        app.settle();

        app.click_button("Make fullscreen");
        // Nothing changes until the platform reports it.
        assert!(changes.borrow().is_empty());
        assert!(app.platform().flush_fullscreen());
        assert_eq!(app.settle().text_content().lines().next(), Some("big"));

        app.click_button("Exit fullscreen");
        app.platform().flush_fullscreen();
        assert_eq!(app.settle().text_content().lines().next(), Some("small"));

        assert_eq!(*changes.borrow(), vec![true, false]);
    }

    #[test]
    fn rejected_request_changes_nothing() {
        let (mut app, changes, out) = mount();
        app.settle();
        app.platform().reject_fullscreen(true);
        app.click_button("Make fullscreen");
        assert!(!app.platform().flush_fullscreen());
        app.settle();
        assert!(changes.borrow().is_empty());
        assert!(out.borrow().as_ref().is_some_and(|f| !f.is_fullscreen));
    }

    #[test]
    fn exit_when_not_fullscreen_is_a_no_op() {
        let (mut app, changes, _out) = mount();
        app.settle();
        app.click_button("Exit fullscreen");
        assert!(!app.platform().flush_fullscreen());
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn other_elements_going_fullscreen_do_not_count() {
        let (mut app, changes, _out) = mount();
        app.settle();
        let elsewhere = NodeRef::new();
        assert!(app.platform().request_fullscreen(elsewhere.id()).is_ok());
        app.platform().flush_fullscreen();
        app.settle();
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn exit_leaves_other_elements_alone() {
        let (mut app, _changes, _out) = mount();
        app.settle();
        let elsewhere = NodeRef::new();
        assert!(app.platform().request_fullscreen(elsewhere.id()).is_ok());
        app.platform().flush_fullscreen();

        app.click_button("Exit fullscreen");
        assert!(!app.platform().flush_fullscreen());
        assert_eq!(app.platform().fullscreen_element(), Some(elsewhere.id()));
    }
}
