pub use crate::effects::{Dispose, on_unmount};
pub use crate::effects_ext::{disposable_effect, mount_effect, side_effect};
pub use crate::error::{FetchError, HookError, PlatformError};
pub use crate::events::{Event, EventKind, EventPayload, EventTarget, Listener};
pub use crate::geometry::Vec2;
pub use crate::locals::{platform, try_platform, with_platform};
pub use crate::node_ref::{ElementId, NodeRef};
pub use crate::platform::{
    ListenerId, NotificationOptions, Permission, Platform, RequestConfig, TimerId,
};
pub use crate::runtime::{Host, after_commit, remember, remember_with_key};
pub use crate::scope::{Liveness, Scope, current_scope, scoped_effect};
pub use crate::signal::{Signal, signal};
pub use crate::view::{Callback, InputCallback, RefBinder, Style, View, ViewKind};
