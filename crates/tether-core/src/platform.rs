//! The capability boundary between hooks and whatever hosts them.
//!
//! Hooks never touch a global document or window. Everything they need from
//! the outside world goes through [`Platform`], which a browser backend
//! implements with `web-sys` and the headless backend implements with plain
//! in-memory state that tests can script.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::{FetchError, PlatformError};
use crate::events::{EventKind, EventTarget, Listener};
use crate::node_ref::ElementId;

slotmap::new_key_type! {
    /// One registered event listener.
    pub struct ListenerId;
    /// One running interval.
    pub struct TimerId;
}

pub type FetchCallback = Box<dyn FnOnce(Result<serde_json::Value, FetchError>)>;
pub type PermissionCallback = Box<dyn FnOnce(Permission)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Not decided yet; asking is allowed.
    #[default]
    Default,
    Granted,
    Denied,
}

impl Permission {
    pub fn parse(s: &str) -> Self {
        match s {
            "granted" => Permission::Granted,
            "denied" => Permission::Denied,
            _ => Permission::Default,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationOptions {
    pub body: Option<String>,
    pub icon: Option<String>,
    pub tag: Option<String>,
    pub lang: Option<String>,
    pub silent: bool,
    pub require_interaction: bool,
}

impl NotificationOptions {
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// What to GET. The body is expected to be JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestConfig {
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl RequestConfig {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

pub trait Platform {
    // Document chrome
    fn title(&self) -> String;
    fn set_title(&self, title: &str);

    // Events
    fn add_listener(&self, target: EventTarget, kind: EventKind, listener: Listener)
    -> ListenerId;
    /// Returns `false` if `id` was not registered (already removed).
    fn remove_listener(&self, id: ListenerId) -> bool;

    // Elements
    fn set_style(&self, element: ElementId, property: &str, value: &str);

    // Connectivity
    fn is_online(&self) -> bool;

    // Dialogs. Blocks until the user answers.
    fn confirm(&self, message: &str) -> bool;

    // Fullscreen. The outcome is reported through `EventKind::FullscreenChange`.
    fn request_fullscreen(&self, element: ElementId) -> Result<(), PlatformError>;
    fn exit_fullscreen(&self) -> Result<(), PlatformError>;
    fn fullscreen_element(&self) -> Option<ElementId>;

    // Notifications
    fn notifications_supported(&self) -> bool;
    fn notification_permission(&self) -> Permission;
    fn request_notification_permission(&self, done: PermissionCallback);
    fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), PlatformError>;

    // Network. `done` runs later, on the UI thread, exactly once.
    fn http_get(&self, request: &RequestConfig, done: FetchCallback);

    // Timers
    fn set_interval(&self, period: Duration, tick: Rc<dyn Fn()>) -> TimerId;
    fn clear_interval(&self, id: TimerId);

    /// Ask the runner to compose another frame soon.
    fn request_frame(&self) {}
}
