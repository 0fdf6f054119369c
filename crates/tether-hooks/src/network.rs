use std::cell::RefCell;
use std::rc::Rc;

use tether_core::*;

pub type StatusCallback = Rc<dyn Fn(bool)>;

/// Current connectivity, updated from the platform's online/offline events.
///
/// `on_change` (the one passed on the latest frame) is told the new status
/// before the hook's own state changes.
pub fn use_network(on_change: Option<StatusCallback>) -> bool {
    let platform = platform();
    let status = remember(|| signal(platform.is_online()));
    let callback = remember(|| RefCell::new(None::<StatusCallback>));
    *callback.borrow_mut() = on_change;

    {
        let status = (*status).clone();
        mount_effect(move || {
            let handler = |online: bool| -> Listener {
                let status = status.clone();
                let callback = callback.clone();
                Rc::new(move |_: &Event| {
                    let cb = callback.borrow().clone();
                    if let Some(cb) = cb {
                        cb(online);
                    }
                    status.set(online);
                })
            };
            let on = platform.add_listener(EventTarget::Window, EventKind::Online, handler(true));
            let off = platform.add_listener(EventTarget::Window, EventKind::Offline, handler(false));
            on_unmount(move || {
                platform.remove_listener(on);
                platform.remove_listener(off);
            })
        });
    }

    status.get()
}
