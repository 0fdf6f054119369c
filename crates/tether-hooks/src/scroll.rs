use std::rc::Rc;

use tether_core::*;

/// Window scroll offset, updated on every scroll event.
pub fn use_scroll() -> Vec2 {
    let offset = remember(|| signal(Vec2::ZERO));
    let platform = platform();

    {
        let offset = (*offset).clone();
        mount_effect(move || {
            let listener: Listener = Rc::new(move |event: &Event| {
                if let Some(o) = event.scroll_offset() {
                    offset.set(o);
                }
            });
            let id = platform.add_listener(EventTarget::Window, EventKind::Scroll, listener);
            on_unmount(move || {
                platform.remove_listener(id);
            })
        });
    }

    offset.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::*;
    use tether_platform::HeadlessApp;

    fn mount() -> HeadlessApp {
        HeadlessApp::new(|| {
            let offset = use_scroll();
            let class = if offset.y > 100.0 { "red" } else { "blue" };
            H1(format!("{},{}", offset.x, offset.y)).class(class)
        })
    }

    #[test]
    fn starts_at_origin() {
        let mut app = mount();
        let view = app.settle();
        assert_eq!(view.text(), Some("0,0"));
        assert_eq!(view.class.as_deref(), Some("blue"));
    }

    #[test]
    fn tracks_latest_offset() {
        let mut app = mount();
        app.settle();
        app.platform().scroll_to(0.0, 40.0);
        app.platform().scroll_to(12.0, 250.0);
        let view = app.settle();
        assert_eq!(view.text(), Some("12,250"));
        assert_eq!(view.class.as_deref(), Some("red"));
    }

    #[test]
    fn unmount_detaches() {
        let mut app = mount();
        app.settle();
        app.unmount();
        assert_eq!(
            app.platform()
                .active_listeners(EventTarget::Window, EventKind::Scroll),
            0
        );
    }
}
