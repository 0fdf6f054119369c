use std::rc::Rc;

use tether_core::*;

/// Shows one configured notification, asking for permission first if needed.
#[derive(Clone)]
pub struct NotifyAction {
    platform: Rc<dyn Platform>,
    title: String,
    options: NotificationOptions,
}

impl NotifyAction {
    pub fn fire(&self) {
        match self.platform.notification_permission() {
            Permission::Granted => self.show(),
            Permission::Denied => {
                log::info!("use_notification: permission denied; dropping {:?}", self.title)
            }
            Permission::Default => {
                let this = self.clone();
                self.platform
                    .request_notification_permission(Box::new(move |answer| {
                        if answer == Permission::Granted {
                            this.show();
                        } else {
                            log::info!("use_notification: permission {answer:?}; not showing");
                        }
                    }));
            }
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn show(&self) {
        if let Err(e) = self.platform.show_notification(&self.title, &self.options) {
            log::warn!("use_notification: {e}");
        }
    }
}

/// Returns `None` when the platform has no notification support.
pub fn use_notification(
    title: impl Into<String>,
    options: NotificationOptions,
) -> Option<NotifyAction> {
    let platform = platform();
    if !platform.notifications_supported() {
        log::warn!("use_notification: notifications are not supported here");
        return None;
    }
    Some(NotifyAction {
        platform,
        title: title.into(),
        options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::*;
    use std::cell::RefCell;
    use tether_platform::{HeadlessApp, HeadlessPlatform, ShownNotification};

    fn mount(platform: HeadlessPlatform) -> (HeadlessApp, Rc<RefCell<Option<NotifyAction>>>) {
        let out = Rc::new(RefCell::new(None));
        let app = HeadlessApp::with_platform(Rc::new(platform), {
            let out = out.clone();
            move || {
                let notify = use_notification(
                    "Can I steal your kimchi?",
                    NotificationOptions::default().body("I love kimchi, don't you?"),
                );
                *out.borrow_mut() = notify.clone();
                Div().child(notify.map(|n| Button("Notify", move || n.fire())))
            }
        });
        (app, out)
    }

    fn expected() -> ShownNotification {
        ShownNotification {
            title: "Can I steal your kimchi?".into(),
            options: NotificationOptions::default().body("I love kimchi, don't you?"),
        }
    }

    #[test]
    fn unsupported_platform_yields_none() {
        let (mut app, out) =
            mount(HeadlessPlatform::new().with_notifications(false, Permission::Default));
        let view = app.settle();
        assert!(view.find_button("Notify").is_none());
        assert!(out.borrow().is_none());
    }

    #[test]
    fn granted_shows_immediately() {
        let (mut app, _out) =
            mount(HeadlessPlatform::new().with_notifications(true, Permission::Granted));
        app.settle();
        app.click_button("Notify");
        assert_eq!(app.platform().notifications(), vec![expected()]);
        assert_eq!(app.platform().pending_permission_requests(), 0);
    }

    #[test]
    fn default_asks_then_shows_on_grant() {
        let (mut app, _out) = mount(HeadlessPlatform::new());
        app.settle();
        app.click_button("Notify");
        assert!(app.platform().notifications().is_empty());
        assert_eq!(app.platform().pending_permission_requests(), 1);

        app.platform().resolve_permission(Permission::Granted);
        assert_eq!(app.platform().notifications(), vec![expected()]);
    }

    #[test]
    fn default_asks_and_drops_on_deny() {
        let (mut app, _out) = mount(HeadlessPlatform::new());
        app.settle();
        app.click_button("Notify");
        app.platform().resolve_permission(Permission::Denied);
        assert!(app.platform().notifications().is_empty());
    }

    #[test]
    fn denied_never_asks() {
        let (mut app, _out) =
            mount(HeadlessPlatform::new().with_notifications(true, Permission::Denied));
        app.settle();
        app.click_button("Notify");
        assert_eq!(app.platform().pending_permission_requests(), 0);
        assert!(app.platform().notifications().is_empty());
    }
}
