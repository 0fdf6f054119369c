//! Headless runner: an in-memory `Platform` that tests (and the native demo)
//! can script event by event.
//!
//! Nothing here happens on its own. Network responses, permission prompts,
//! fullscreen transitions and timers all wait for an explicit call
//! (`respond`, `resolve_permission`, `flush_fullscreen`, `advance`), which
//! keeps every ordering question in a test deterministic.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;

use slotmap::SlotMap;
use tether_core::prelude::*;
use tether_core::{FetchCallback, PermissionCallback, is_invalidated};
use web_time::Duration;

/// One line of the listener audit trail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerRecord {
    Attached {
        id: ListenerId,
        target: EventTarget,
        kind: EventKind,
    },
    Detached {
        id: ListenerId,
        target: EventTarget,
        kind: EventKind,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShownNotification {
    pub title: String,
    pub options: NotificationOptions,
}

struct Registration {
    target: EventTarget,
    kind: EventKind,
    listener: Listener,
}

struct PendingRequest {
    config: RequestConfig,
    done: FetchCallback,
}

struct Timer {
    period: Duration,
    next_due: Duration,
    tick: Rc<dyn Fn()>,
}

struct State {
    title: String,
    title_writes: Vec<String>,
    listeners: SlotMap<ListenerId, Registration>,
    listener_log: Vec<ListenerRecord>,
    styles: HashMap<ElementId, BTreeMap<String, String>>,
    online: bool,
    confirm_answers: VecDeque<bool>,
    prompts: Vec<String>,
    fullscreen: Option<ElementId>,
    pending_fullscreen: Option<Option<ElementId>>,
    reject_fullscreen: bool,
    notifications_supported: bool,
    permission: Permission,
    permission_requests: Vec<PermissionCallback>,
    notifications: Vec<ShownNotification>,
    requests: VecDeque<PendingRequest>,
    timers: SlotMap<TimerId, Timer>,
    now: Duration,
    frame_requests: usize,
}

pub struct HeadlessPlatform {
    state: RefCell<State>,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State {
                title: String::new(),
                title_writes: Vec::new(),
                listeners: SlotMap::with_key(),
                listener_log: Vec::new(),
                styles: HashMap::new(),
                online: true,
                confirm_answers: VecDeque::new(),
                prompts: Vec::new(),
                fullscreen: None,
                pending_fullscreen: None,
                reject_fullscreen: false,
                notifications_supported: true,
                permission: Permission::Default,
                permission_requests: Vec::new(),
                notifications: Vec::new(),
                requests: VecDeque::new(),
                timers: SlotMap::with_key(),
                now: Duration::ZERO,
                frame_requests: 0,
            }),
        }
    }

    pub fn with_online(self, online: bool) -> Self {
        self.state.borrow_mut().online = online;
        self
    }

    pub fn with_notifications(self, supported: bool, permission: Permission) -> Self {
        {
            let mut st = self.state.borrow_mut();
            st.notifications_supported = supported;
            st.permission = permission;
        }
        self
    }

    // --- events ---

    /// Delivers `event` to every listener registered for its target and kind,
    /// in registration order, and hands the event back for inspection.
    pub fn dispatch(&self, event: Event) -> Event {
        let listeners: Vec<Listener> = {
            let st = self.state.borrow();
            let mut matching: Vec<(ListenerId, Listener)> = st
                .listeners
                .iter()
                .filter(|(_, r)| r.target == event.target && r.kind == event.kind)
                .map(|(id, r)| (id, r.listener.clone()))
                .collect();
            matching.sort_by_key(|(id, _)| registration_order(&st.listener_log, *id));
            matching.into_iter().map(|(_, l)| l).collect()
        };
        log::trace!(
            "headless: {} -> {} listener(s)",
            event.kind.dom_name(),
            listeners.len()
        );
        for listener in listeners {
            listener(&event);
        }
        event
    }

    pub fn go_online(&self) {
        self.state.borrow_mut().online = true;
        self.dispatch(Event::new(EventKind::Online, EventTarget::Window));
    }

    pub fn go_offline(&self) {
        self.state.borrow_mut().online = false;
        self.dispatch(Event::new(EventKind::Offline, EventTarget::Window));
    }

    pub fn scroll_to(&self, x: f32, y: f32) {
        self.dispatch(
            Event::new(EventKind::Scroll, EventTarget::Window).with_payload(EventPayload::Scroll {
                offset: Vec2::new(x, y),
            }),
        );
    }

    pub fn mouse_leave(&self, client_x: f32, client_y: f32) {
        self.dispatch(
            Event::new(EventKind::MouseLeave, EventTarget::Document)
                .with_payload(EventPayload::Pointer { client_x, client_y }),
        );
    }

    pub fn click(&self, element: ElementId) {
        self.dispatch(Event::new(EventKind::Click, EventTarget::Element(element)));
    }

    /// Simulates the user closing the tab. Returns the event so callers can
    /// see whether a listener asked for confirmation.
    pub fn before_unload(&self) -> Event {
        self.dispatch(Event::new(EventKind::BeforeUnload, EventTarget::Window))
    }

    pub fn listener_log(&self) -> Vec<ListenerRecord> {
        self.state.borrow().listener_log.clone()
    }

    pub fn active_listeners(&self, target: EventTarget, kind: EventKind) -> usize {
        self.state
            .borrow()
            .listeners
            .values()
            .filter(|r| r.target == target && r.kind == kind)
            .count()
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    // --- chrome & styles ---

    /// Every value written to the title slot, in order.
    pub fn title_writes(&self) -> Vec<String> {
        self.state.borrow().title_writes.clone()
    }

    pub fn style(&self, element: ElementId, property: &str) -> Option<String> {
        self.state
            .borrow()
            .styles
            .get(&element)
            .and_then(|s| s.get(property).cloned())
    }

    // --- dialogs ---

    /// Queues the user's answer to the next `confirm`.
    pub fn answer_confirm(&self, accept: bool) {
        self.state.borrow_mut().confirm_answers.push_back(accept);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.state.borrow().prompts.clone()
    }

    // --- fullscreen ---

    pub fn reject_fullscreen(&self, reject: bool) {
        self.state.borrow_mut().reject_fullscreen = reject;
    }

    /// Applies a pending fullscreen transition and fires `fullscreenchange`.
    pub fn flush_fullscreen(&self) -> bool {
        let pending = self.state.borrow_mut().pending_fullscreen.take();
        let Some(next) = pending else {
            return false;
        };
        self.state.borrow_mut().fullscreen = next;
        self.dispatch(Event::new(EventKind::FullscreenChange, EventTarget::Document));
        true
    }

    // --- notifications ---

    /// Answers every outstanding permission prompt with `permission`.
    pub fn resolve_permission(&self, permission: Permission) {
        let waiting = {
            let mut st = self.state.borrow_mut();
            st.permission = permission;
            std::mem::take(&mut st.permission_requests)
        };
        for done in waiting {
            done(permission);
        }
    }

    pub fn pending_permission_requests(&self) -> usize {
        self.state.borrow().permission_requests.len()
    }

    pub fn notifications(&self) -> Vec<ShownNotification> {
        self.state.borrow().notifications.clone()
    }

    // --- network ---

    pub fn pending_requests(&self) -> Vec<RequestConfig> {
        self.state
            .borrow()
            .requests
            .iter()
            .map(|r| r.config.clone())
            .collect()
    }

    /// Completes the oldest outstanding GET.
    pub fn respond(&self, result: Result<serde_json::Value, FetchError>) -> bool {
        self.respond_at(0, result)
    }

    /// Completes the outstanding GET at `index` (0 = oldest).
    pub fn respond_at(&self, index: usize, result: Result<serde_json::Value, FetchError>) -> bool {
        let request = self.state.borrow_mut().requests.remove(index);
        match request {
            Some(r) => {
                log::debug!("headless: completing GET {}", r.config.url);
                (r.done)(result);
                true
            }
            None => false,
        }
    }

    // --- time ---

    /// Moves the virtual clock forward, firing every interval that falls due.
    pub fn advance(&self, by: Duration) {
        let target = self.state.borrow().now + by;
        loop {
            let due = {
                let st = self.state.borrow();
                st.timers
                    .iter()
                    .filter(|(_, t)| t.next_due <= target)
                    .min_by_key(|(_, t)| t.next_due)
                    .map(|(id, t)| (id, t.next_due, t.tick.clone()))
            };
            let Some((id, at, tick)) = due else {
                break;
            };
            {
                let mut st = self.state.borrow_mut();
                st.now = at;
                if let Some(t) = st.timers.get_mut(id) {
                    t.next_due = at + t.period;
                }
            }
            tick();
        }
        self.state.borrow_mut().now = target;
    }

    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    pub fn active_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    pub fn frame_requests(&self) -> usize {
        self.state.borrow().frame_requests
    }
}

fn registration_order(log: &[ListenerRecord], id: ListenerId) -> usize {
    log.iter()
        .rposition(|r| matches!(r, ListenerRecord::Attached { id: a, .. } if *a == id))
        .unwrap_or(usize::MAX)
}

impl Platform for HeadlessPlatform {
    fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    fn set_title(&self, title: &str) {
        let mut st = self.state.borrow_mut();
        st.title = title.to_string();
        st.title_writes.push(title.to_string());
    }

    fn add_listener(&self, target: EventTarget, kind: EventKind, listener: Listener) -> ListenerId {
        let mut st = self.state.borrow_mut();
        let id = st.listeners.insert(Registration {
            target,
            kind,
            listener,
        });
        st.listener_log
            .push(ListenerRecord::Attached { id, target, kind });
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut st = self.state.borrow_mut();
        match st.listeners.remove(id) {
            Some(r) => {
                st.listener_log.push(ListenerRecord::Detached {
                    id,
                    target: r.target,
                    kind: r.kind,
                });
                true
            }
            None => {
                log::warn!("headless: remove_listener for unknown id {id:?}");
                false
            }
        }
    }

    fn set_style(&self, element: ElementId, property: &str, value: &str) {
        self.state
            .borrow_mut()
            .styles
            .entry(element)
            .or_default()
            .insert(property.to_string(), value.to_string());
    }

    fn is_online(&self) -> bool {
        self.state.borrow().online
    }

    fn confirm(&self, message: &str) -> bool {
        let mut st = self.state.borrow_mut();
        st.prompts.push(message.to_string());
        st.confirm_answers.pop_front().unwrap_or_else(|| {
            log::warn!("headless: no scripted answer for confirm({message:?}); rejecting");
            false
        })
    }

    fn request_fullscreen(&self, element: ElementId) -> Result<(), PlatformError> {
        let mut st = self.state.borrow_mut();
        if st.reject_fullscreen {
            return Err(PlatformError::Fullscreen(
                "request denied by the user agent".into(),
            ));
        }
        st.pending_fullscreen = Some(Some(element));
        Ok(())
    }

    fn exit_fullscreen(&self) -> Result<(), PlatformError> {
        let mut st = self.state.borrow_mut();
        if st.fullscreen.is_none() && st.pending_fullscreen.is_none() {
            return Err(PlatformError::Fullscreen("document is not fullscreen".into()));
        }
        st.pending_fullscreen = Some(None);
        Ok(())
    }

    fn fullscreen_element(&self) -> Option<ElementId> {
        self.state.borrow().fullscreen
    }

    fn notifications_supported(&self) -> bool {
        self.state.borrow().notifications_supported
    }

    fn notification_permission(&self) -> Permission {
        self.state.borrow().permission
    }

    fn request_notification_permission(&self, done: PermissionCallback) {
        self.state.borrow_mut().permission_requests.push(done);
    }

    fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), PlatformError> {
        let mut st = self.state.borrow_mut();
        if st.permission != Permission::Granted {
            return Err(PlatformError::Notification("permission not granted".into()));
        }
        st.notifications.push(ShownNotification {
            title: title.to_string(),
            options: options.clone(),
        });
        Ok(())
    }

    fn http_get(&self, request: &RequestConfig, done: FetchCallback) {
        self.state.borrow_mut().requests.push_back(PendingRequest {
            config: request.clone(),
            done,
        });
    }

    fn set_interval(&self, period: Duration, tick: Rc<dyn Fn()>) -> TimerId {
        let mut st = self.state.borrow_mut();
        let next_due = st.now + period;
        st.timers.insert(Timer {
            period,
            next_due,
            tick,
        })
    }

    fn clear_interval(&self, id: TimerId) {
        self.state.borrow_mut().timers.remove(id);
    }

    fn request_frame(&self) {
        self.state.borrow_mut().frame_requests += 1;
    }
}

/// Mounts a root composable on a `HeadlessPlatform` and drives frames by hand.
pub struct HeadlessApp {
    host: Host,
    platform: Rc<HeadlessPlatform>,
    root: Box<dyn FnMut() -> View>,
    binder: RefBinder,
    view: Option<View>,
}

/// Upper bound on back-to-back frames in `settle`; effects that keep writing
/// state forever would otherwise hang a test.
const MAX_SETTLE_FRAMES: usize = 32;

impl HeadlessApp {
    pub fn new(root: impl FnMut() -> View + 'static) -> Self {
        Self::with_platform(Rc::new(HeadlessPlatform::new()), root)
    }

    pub fn with_platform(
        platform: Rc<HeadlessPlatform>,
        root: impl FnMut() -> View + 'static,
    ) -> Self {
        Self {
            host: Host::new(platform.clone()),
            platform,
            root: Box::new(root),
            binder: RefBinder::default(),
            view: None,
        }
    }

    pub fn platform(&self) -> &Rc<HeadlessPlatform> {
        &self.platform
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    fn compose(&mut self) -> View {
        let root = &mut self.root;
        let binder = &mut self.binder;
        self.host.frame(|| root(), |v| binder.bind(v))
    }

    /// Runs exactly one frame.
    pub fn frame(&mut self) -> &View {
        let view = self.compose();
        self.view.insert(view)
    }

    /// Runs frames until no state write is outstanding.
    pub fn settle(&mut self) -> &View {
        let mut view = self.compose();
        let mut frames = 1;
        while is_invalidated() && frames < MAX_SETTLE_FRAMES {
            view = self.compose();
            frames += 1;
        }
        if is_invalidated() {
            log::warn!("headless: still invalidated after {frames} frames");
        }
        self.view.insert(view)
    }

    pub fn view(&self) -> Option<&View> {
        self.view.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.host.is_mounted()
    }

    pub fn unmount(&mut self) {
        self.host.unmount();
        self.binder.release_all();
        self.view = None;
    }

    /// Presses the button labelled `label` the way a browser would: the view's
    /// own handler first, then any listeners bound to its element.
    pub fn click_button(&self, label: &str) -> bool {
        let Some((on_click, element)) = self.view.as_ref().and_then(|v| {
            v.find_button(label).map(|b| {
                let on_click = match &b.kind {
                    ViewKind::Button { on_click, .. } => on_click.clone(),
                    _ => None,
                };
                (on_click, b.node_ref.as_ref().and_then(NodeRef::current))
            })
        }) else {
            log::warn!("headless: no button labelled {label:?}");
            return false;
        };
        if let Some(cb) = on_click {
            cb();
        }
        if let Some(id) = element {
            self.platform.click(id);
        }
        true
    }

    /// Types `value` into the input with `placeholder`, replacing its content.
    pub fn type_into(&self, placeholder: &str, value: &str) -> bool {
        let Some((on_input, target)) = self.view.as_ref().and_then(|v| {
            v.find_input(placeholder).and_then(|i| match &i.kind {
                ViewKind::Input { on_input, .. } => Some((
                    on_input.clone(),
                    i.node_ref
                        .as_ref()
                        .map(|r| EventTarget::Element(r.id()))
                        .unwrap_or(EventTarget::Document),
                )),
                _ => None,
            })
        }) else {
            log::warn!("headless: no input with placeholder {placeholder:?}");
            return false;
        };
        if let Some(cb) = on_input {
            cb(&Event::input(target, value));
        }
        true
    }
}

impl Drop for HeadlessApp {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn listeners_fire_in_registration_order_and_log_symmetrically() {
        let platform = HeadlessPlatform::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let ids: Vec<ListenerId> = (0..3)
            .map(|i| {
                let order = order.clone();
                platform.add_listener(
                    EventTarget::Window,
                    EventKind::Scroll,
                    Rc::new(move |_| order.borrow_mut().push(i)),
                )
            })
            .collect();

        platform.scroll_to(0.0, 10.0);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);

        assert!(platform.remove_listener(ids[1]));
        assert!(!platform.remove_listener(ids[1]));
        assert_eq!(
            platform.active_listeners(EventTarget::Window, EventKind::Scroll),
            2
        );
        let detached = platform
            .listener_log()
            .into_iter()
            .filter(|r| matches!(r, ListenerRecord::Detached { .. }))
            .count();
        assert_eq!(detached, 1);
    }

    #[test]
    fn intervals_fire_per_period_until_cleared() {
        let platform = HeadlessPlatform::new();
        let ticks = Rc::new(Cell::new(0));
        let id = {
            let ticks = ticks.clone();
            platform.set_interval(
                Duration::from_secs(2),
                Rc::new(move || ticks.set(ticks.get() + 1)),
            )
        };
        platform.advance(Duration::from_secs(1));
        assert_eq!(ticks.get(), 0);
        platform.advance(Duration::from_secs(5));
        assert_eq!(ticks.get(), 3);
        assert_eq!(platform.now(), Duration::from_secs(6));

        platform.clear_interval(id);
        platform.advance(Duration::from_secs(10));
        assert_eq!(ticks.get(), 3);
        assert_eq!(platform.active_timers(), 0);
    }

    #[test]
    fn fullscreen_changes_wait_for_flush() {
        let platform = HeadlessPlatform::new();
        let el = ElementId::next();
        assert!(platform.request_fullscreen(el).is_ok());
        assert_eq!(platform.fullscreen_element(), None);
        assert!(platform.flush_fullscreen());
        assert_eq!(platform.fullscreen_element(), Some(el));
        assert!(!platform.flush_fullscreen());

        platform.reject_fullscreen(true);
        assert!(platform.request_fullscreen(el).is_err());
    }

    #[test]
    fn confirm_without_scripted_answer_rejects() {
        let platform = HeadlessPlatform::new();
        platform.answer_confirm(true);
        assert!(platform.confirm("first?"));
        assert!(!platform.confirm("second?"));
        assert_eq!(platform.prompts(), vec!["first?", "second?"]);
    }

    #[test]
    fn requests_complete_in_the_order_chosen_by_the_test() {
        let platform = HeadlessPlatform::new();
        let results = Rc::new(RefCell::new(Vec::new()));
        for url in ["https://a.test", "https://b.test"] {
            let results = results.clone();
            platform.http_get(
                &RequestConfig::get(url),
                Box::new(move |r| results.borrow_mut().push((url, r.is_ok()))),
            );
        }
        assert_eq!(platform.pending_requests().len(), 2);
        assert!(platform.respond_at(1, Ok(serde_json::json!({"b": 1}))));
        assert!(platform.respond(Err(FetchError::Status { status: 500 })));
        assert!(!platform.respond(Ok(serde_json::Value::Null)));
        assert_eq!(
            *results.borrow(),
            vec![("https://b.test", true), ("https://a.test", false)]
        );
    }
}
