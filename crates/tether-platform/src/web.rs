//! Web runner (wasm32): `Platform` on top of web-sys plus a small DOM patcher.
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use slotmap::SlotMap;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{BeforeUnloadEvent, Document, Element, HtmlElement, HtmlInputElement, MouseEvent};

use tether_core::{
    Callback, ElementId, Event, EventKind, EventPayload, EventTarget, FetchCallback, FetchError,
    Host, InputCallback, Listener, ListenerId, NotificationOptions, Permission,
    PermissionCallback, Platform, PlatformError, RefBinder, RequestConfig, TimerId, Vec2, View,
    ViewKind,
};
use web_time::Duration;

use crate::controlled::ControlledInput;

#[wasm_bindgen]
pub struct WebOptions {
    mount_id: Option<String>,
    verbose: bool,
}

#[wasm_bindgen]
impl WebOptions {
    #[wasm_bindgen(constructor)]
    pub fn new(mount_id: Option<String>) -> Self {
        Self {
            mount_id,
            verbose: false,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn mount_id(&self) -> Option<String> {
        self.mount_id.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    #[wasm_bindgen(setter)]
    pub fn set_verbose(&mut self, v: bool) {
        self.verbose = v;
    }
}

impl Default for WebOptions {
    fn default() -> Self {
        Self::new(None)
    }
}

struct Bound {
    target: Option<web_sys::EventTarget>,
    name: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

struct Interval {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

pub struct WebPlatform {
    window: web_sys::Window,
    document: Document,
    listeners: RefCell<SlotMap<ListenerId, Bound>>,
    timers: RefCell<SlotMap<TimerId, Interval>>,
    elements: RefCell<HashMap<ElementId, Element>>,
    scheduler: RefCell<Option<Rc<dyn Fn()>>>,
}

impl WebPlatform {
    pub fn new(window: web_sys::Window, document: Document) -> Self {
        Self {
            window,
            document,
            listeners: RefCell::new(SlotMap::with_key()),
            timers: RefCell::new(SlotMap::with_key()),
            elements: RefCell::new(HashMap::new()),
            scheduler: RefCell::new(None),
        }
    }

    fn set_scheduler(&self, schedule: Rc<dyn Fn()>) {
        *self.scheduler.borrow_mut() = Some(schedule);
    }

    fn set_elements(&self, elements: HashMap<ElementId, Element>) {
        *self.elements.borrow_mut() = elements;
    }

    fn element(&self, id: ElementId) -> Option<Element> {
        self.elements.borrow().get(&id).cloned()
    }

    fn resolve(&self, target: EventTarget) -> Option<web_sys::EventTarget> {
        match target {
            EventTarget::Window => Some(self.window.clone().into()),
            EventTarget::Document => Some(self.document.clone().into()),
            EventTarget::Element(id) => self.element(id).map(Into::into),
        }
    }
}

fn translate(
    kind: EventKind,
    target: EventTarget,
    raw: &web_sys::Event,
    window: &web_sys::Window,
) -> Event {
    let payload = match kind {
        EventKind::Click | EventKind::MouseLeave => {
            raw.dyn_ref::<MouseEvent>()
                .map(|m| EventPayload::Pointer {
                    client_x: m.client_x() as f32,
                    client_y: m.client_y() as f32,
                })
        }
        EventKind::Input => raw
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            .map(|i| EventPayload::Input { value: i.value() }),
        EventKind::Scroll => Some(EventPayload::Scroll {
            offset: Vec2::new(
                window.scroll_x().unwrap_or(0.0) as f32,
                window.scroll_y().unwrap_or(0.0) as f32,
            ),
        }),
        _ => None,
    };
    Event::new(kind, target).with_payload(payload.unwrap_or_default())
}

fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

impl Platform for WebPlatform {
    fn title(&self) -> String {
        self.document.title()
    }

    fn set_title(&self, title: &str) {
        self.document.set_title(title);
    }

    fn add_listener(&self, target: EventTarget, kind: EventKind, listener: Listener) -> ListenerId {
        let window = self.window.clone();
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |raw: web_sys::Event| {
            let event = translate(kind, target, &raw, &window);
            listener(&event);
            if event.default_prevented() {
                raw.prevent_default();
            }
            if let Some(value) = event.return_value()
                && let Some(unload) = raw.dyn_ref::<BeforeUnloadEvent>()
            {
                unload.set_return_value(&value);
            }
        });

        let resolved = self.resolve(target);
        match &resolved {
            Some(t) => {
                if let Err(e) = t.add_event_listener_with_callback(
                    kind.dom_name(),
                    closure.as_ref().unchecked_ref(),
                ) {
                    log::error!("web: addEventListener({}) failed: {}", kind.dom_name(), js_error(e));
                }
            }
            None => log::warn!("web: {target:?} is not rendered; {} listener is inert", kind.dom_name()),
        }

        self.listeners.borrow_mut().insert(Bound {
            target: resolved,
            name: kind.dom_name(),
            closure,
        })
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let Some(bound) = self.listeners.borrow_mut().remove(id) else {
            return false;
        };
        if let Some(t) = &bound.target
            && let Err(e) = t.remove_event_listener_with_callback(
                bound.name,
                bound.closure.as_ref().unchecked_ref(),
            )
        {
            log::warn!("web: removeEventListener({}) failed: {}", bound.name, js_error(e));
        }
        true
    }

    fn set_style(&self, element: ElementId, property: &str, value: &str) {
        let Some(el) = self.element(element) else {
            log::debug!("web: set_style on unrendered {element:?}");
            return;
        };
        if let Some(html) = el.dyn_ref::<HtmlElement>()
            && let Err(e) = html.style().set_property(property, value)
        {
            log::warn!("web: style {property} = {value}: {}", js_error(e));
        }
    }

    fn is_online(&self) -> bool {
        self.window.navigator().on_line()
    }

    fn confirm(&self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or(false)
    }

    fn request_fullscreen(&self, element: ElementId) -> Result<(), PlatformError> {
        let el = self
            .element(element)
            .ok_or(PlatformError::NotMounted(element))?;
        el.request_fullscreen()
            .map_err(|e| PlatformError::Fullscreen(js_error(e)))
    }

    fn exit_fullscreen(&self) -> Result<(), PlatformError> {
        if self.document.fullscreen_element().is_none() {
            return Err(PlatformError::Fullscreen("document is not fullscreen".into()));
        }
        self.document.exit_fullscreen();
        Ok(())
    }

    fn fullscreen_element(&self) -> Option<ElementId> {
        let current = self.document.fullscreen_element()?;
        self.elements
            .borrow()
            .iter()
            .find(|(_, el)| **el == current)
            .map(|(id, _)| *id)
    }

    fn notifications_supported(&self) -> bool {
        js_sys::Reflect::has(&self.window, &JsValue::from_str("Notification")).unwrap_or(false)
    }

    fn notification_permission(&self) -> Permission {
        match web_sys::Notification::permission() {
            web_sys::NotificationPermission::Granted => Permission::Granted,
            web_sys::NotificationPermission::Denied => Permission::Denied,
            _ => Permission::Default,
        }
    }

    fn request_notification_permission(&self, done: PermissionCallback) {
        let promise = match web_sys::Notification::request_permission() {
            Ok(p) => p,
            Err(e) => {
                log::warn!("web: requestPermission failed: {}", js_error(e));
                done(Permission::Denied);
                return;
            }
        };
        spawn_local(async move {
            let answer = JsFuture::from(promise)
                .await
                .ok()
                .and_then(|v| v.as_string())
                .map(|s| Permission::parse(&s))
                .unwrap_or(Permission::Denied);
            done(answer);
        });
    }

    fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), PlatformError> {
        let opts = web_sys::NotificationOptions::new();
        if let Some(body) = &options.body {
            opts.set_body(body);
        }
        if let Some(icon) = &options.icon {
            opts.set_icon(icon);
        }
        if let Some(tag) = &options.tag {
            opts.set_tag(tag);
        }
        if let Some(lang) = &options.lang {
            opts.set_lang(lang);
        }
        opts.set_silent(Some(options.silent));
        opts.set_require_interaction(options.require_interaction);
        web_sys::Notification::new_with_options(title, &opts)
            .map(|_| ())
            .map_err(|e| PlatformError::Notification(js_error(e)))
    }

    fn http_get(&self, request: &RequestConfig, done: FetchCallback) {
        let window = self.window.clone();
        let request = request.clone();
        spawn_local(async move {
            let result = fetch_json(&window, &request).await;
            if let Err(e) = &result {
                log::warn!("web: GET {} failed: {e}", request.url);
            }
            done(result);
        });
    }

    fn set_interval(&self, period: Duration, tick: Rc<dyn Fn()>) -> TimerId {
        let closure = Closure::<dyn FnMut()>::new(move || tick());
        let handle = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period.as_millis().min(i32::MAX as u128) as i32,
            )
            .unwrap_or_else(|e| {
                log::error!("web: setInterval failed: {}", js_error(e));
                -1
            });
        self.timers.borrow_mut().insert(Interval {
            handle,
            _closure: closure,
        })
    }

    fn clear_interval(&self, id: TimerId) {
        if let Some(interval) = self.timers.borrow_mut().remove(id) {
            self.window.clear_interval_with_handle(interval.handle);
        }
    }

    fn request_frame(&self) {
        let schedule = self.scheduler.borrow().clone();
        if let Some(schedule) = schedule {
            schedule();
        }
    }
}

async fn fetch_json(
    window: &web_sys::Window,
    request: &RequestConfig,
) -> Result<serde_json::Value, FetchError> {
    let network = |e: JsValue| FetchError::Network(js_error(e));

    let init = web_sys::RequestInit::new();
    init.set_method("GET");
    let headers = web_sys::Headers::new().map_err(network)?;
    for (name, value) in &request.headers {
        headers.set(name, value).map_err(network)?;
    }
    init.set_headers(&headers);

    let req = web_sys::Request::new_with_str_and_init(&request.url, &init).map_err(network)?;
    let resp: web_sys::Response = JsFuture::from(window.fetch_with_request(&req))
        .await
        .map_err(network)?
        .dyn_into()
        .map_err(network)?;
    if !resp.ok() {
        return Err(FetchError::Status {
            status: resp.status(),
        });
    }
    let text = JsFuture::from(resp.text().map_err(network)?)
        .await
        .map_err(network)?
        .as_string()
        .ok_or_else(|| FetchError::Decode("response body is not text".into()))?;
    Ok(serde_json::from_str(&text)?)
}

// --- DOM patching ---

struct DomNode {
    element: Element,
    tag: &'static str,
    children: Vec<DomNode>,
    on_click: Rc<RefCell<Option<Callback>>>,
    on_input: Rc<RefCell<Option<InputCallback>>>,
    input: ControlledInput,
    target: Rc<Cell<EventTarget>>,
    _handlers: Vec<Closure<dyn FnMut(web_sys::Event)>>,
}

impl DomNode {
    fn create(document: &Document, view: &View) -> Result<Self, JsValue> {
        let tag = view.kind.tag();
        let element = document.create_element(tag)?;
        // Initial style only; hooks own the live style afterwards.
        if let Some(opacity) = view.style.opacity
            && let Some(html) = element.dyn_ref::<HtmlElement>()
        {
            html.style().set_property("opacity", &opacity.to_string())?;
        }

        let mut node = DomNode {
            element,
            tag,
            children: Vec::new(),
            on_click: Rc::new(RefCell::new(None)),
            on_input: Rc::new(RefCell::new(None)),
            input: ControlledInput::default(),
            target: Rc::new(Cell::new(EventTarget::Document)),
            _handlers: Vec::new(),
        };

        match &view.kind {
            ViewKind::Button { .. } => {
                let slot = node.on_click.clone();
                let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |_| {
                    let cb = slot.borrow().clone();
                    if let Some(cb) = cb {
                        cb();
                    }
                });
                node.element
                    .add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
                node._handlers.push(handler);
            }
            ViewKind::Input { .. } => {
                let slot = node.on_input.clone();
                let controlled = node.input.clone();
                let target = node.target.clone();
                let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |raw: web_sys::Event| {
                    let Some(element) = raw
                        .target()
                        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    else {
                        return;
                    };
                    let cb = slot.borrow().clone();
                    let shown = controlled.dispatch(element.value(), |typed| {
                        if let Some(cb) = cb {
                            cb(&Event::input(target.get(), typed));
                        }
                    });
                    if element.value() != shown {
                        element.set_value(&shown);
                    }
                });
                node.element
                    .add_event_listener_with_callback("input", handler.as_ref().unchecked_ref())?;
                node._handlers.push(handler);
            }
            _ => {}
        }

        node.patch(document, view)?;
        Ok(node)
    }

    fn patch(&mut self, document: &Document, view: &View) -> Result<(), JsValue> {
        match &view.kind {
            ViewKind::Heading { text, .. } | ViewKind::Text { text } => self.set_text(text),
            ViewKind::Button { text, on_click } => {
                self.set_text(text);
                *self.on_click.borrow_mut() = on_click.clone();
            }
            ViewKind::Input {
                value,
                placeholder,
                on_input,
            } => {
                if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
                    if self.input.render(value, &input.value()) {
                        input.set_value(value);
                    }
                    input.set_placeholder(placeholder);
                }
                *self.on_input.borrow_mut() = on_input.clone();
                self.target.set(
                    view.node_ref
                        .as_ref()
                        .map(|r| EventTarget::Element(r.id()))
                        .unwrap_or(EventTarget::Document),
                );
            }
            ViewKind::Container => {}
        }

        match &view.class {
            Some(class) => self.element.set_class_name(class),
            None if self.element.has_attribute("class") => self.element.remove_attribute("class")?,
            None => {}
        }

        for (i, child) in view.children.iter().enumerate() {
            match self.children.get_mut(i) {
                Some(existing) if existing.tag == child.kind.tag() => {
                    existing.patch(document, child)?
                }
                Some(existing) => {
                    let fresh = DomNode::create(document, child)?;
                    self.element
                        .replace_child(&fresh.element, &existing.element)?;
                    *existing = fresh;
                }
                None => {
                    let fresh = DomNode::create(document, child)?;
                    self.element.append_child(&fresh.element)?;
                    self.children.push(fresh);
                }
            }
        }
        while self.children.len() > view.children.len() {
            if let Some(gone) = self.children.pop() {
                gone.element.remove();
            }
        }
        Ok(())
    }

    fn set_text(&self, text: &str) {
        if self.element.text_content().as_deref() != Some(text) {
            self.element.set_text_content(Some(text));
        }
    }

    fn collect_refs(&self, view: &View, out: &mut HashMap<ElementId, Element>) {
        if let Some(r) = &view.node_ref {
            out.insert(r.id(), self.element.clone());
        }
        for (node, child) in self.children.iter().zip(&view.children) {
            node.collect_refs(child, out);
        }
    }
}

struct WebApp {
    host: Host,
    platform: Rc<WebPlatform>,
    root: Box<dyn FnMut() -> View>,
    binder: RefBinder,
    document: Document,
    mount: Element,
    tree: Option<DomNode>,
}

impl WebApp {
    fn frame(&mut self) {
        let root = &mut self.root;
        let binder = &mut self.binder;
        let tree = &mut self.tree;
        let document = &self.document;
        let mount = &self.mount;
        let platform = &self.platform;

        self.host.frame(
            || root(),
            |view| {
                if let Err(e) = render(document, mount, tree, view) {
                    log::error!("web: render failed: {}", js_error(e));
                }
                let mut elements = HashMap::new();
                if let Some(t) = tree.as_ref() {
                    t.collect_refs(view, &mut elements);
                }
                platform.set_elements(elements);
                binder.bind(view);
            },
        );
    }

    fn unmount(&mut self) {
        self.host.unmount();
        self.binder.release_all();
        if let Some(tree) = self.tree.take() {
            tree.element.remove();
        }
    }
}

fn render(
    document: &Document,
    mount: &Element,
    tree: &mut Option<DomNode>,
    view: &View,
) -> Result<(), JsValue> {
    if let Some(node) = tree.as_mut().filter(|n| n.tag == view.kind.tag()) {
        return node.patch(document, view);
    }
    let fresh = DomNode::create(document, view)?;
    if let Some(old) = tree.take() {
        old.element.remove();
    }
    mount.append_child(&fresh.element)?;
    *tree = Some(fresh);
    Ok(())
}

thread_local! {
    static MOUNTED: RefCell<Option<Rc<RefCell<WebApp>>>> = const { RefCell::new(None) };
}

/// Mounts `root` into the page and keeps it alive until `unmount_web_page`.
pub fn run_web_page(
    root: impl FnMut() -> View + 'static,
    options: WebOptions,
) -> Result<(), JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    let level = if options.verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    let _ = console_log::init_with_level(level);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let mount: Element = match &options.mount_id {
        Some(id) => document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{id}'")))?,
        None => document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .into(),
    };

    let platform = Rc::new(WebPlatform::new(window.clone(), document.clone()));
    let app = Rc::new(RefCell::new(WebApp {
        host: Host::new(platform.clone()),
        platform: platform.clone(),
        root: Box::new(root),
        binder: RefBinder::default(),
        document,
        mount,
        tree: None,
    }));

    let pending = Rc::new(Cell::new(false));
    let schedule: Rc<dyn Fn()> = {
        let weak = Rc::downgrade(&app);
        Rc::new(move || {
            if pending.replace(true) {
                return;
            }
            let weak = weak.clone();
            let pending = pending.clone();
            let cb = Closure::once_into_js(move || {
                pending.set(false);
                if let Some(app) = weak.upgrade() {
                    app.borrow_mut().frame();
                }
            });
            if let Err(e) = window.request_animation_frame(cb.unchecked_ref()) {
                log::error!("web: requestAnimationFrame failed: {}", js_error(e));
            }
        })
    };
    platform.set_scheduler(schedule);

    log::info!("web: mounting");
    app.borrow_mut().frame();
    MOUNTED.with(|m| *m.borrow_mut() = Some(app));
    Ok(())
}

/// Tears down the page mounted by `run_web_page`: every hook cleanup runs and
/// the rendered tree is removed.
#[wasm_bindgen]
pub fn unmount_web_page() {
    let app = MOUNTED.with(|m| m.borrow_mut().take());
    match app {
        Some(app) => app.borrow_mut().unmount(),
        None => log::debug!("web: nothing mounted"),
    }
}
