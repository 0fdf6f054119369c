use tether_core::*;

/// Handle for changing the document title from event handlers.
#[derive(Clone)]
pub struct TitleSetter(Signal<String>);

impl TitleSetter {
    pub fn set(&self, title: impl Into<String>) {
        self.0.set_if_changed(title.into());
    }

    pub fn get(&self) -> String {
        self.0.get()
    }
}

/// Keeps the document title equal to the hook's current value.
///
/// The platform title is written after the frame renders, once per distinct
/// value.
pub fn use_title(initial: impl Into<String>) -> TitleSetter {
    let title = remember(|| signal(initial.into()));
    let current = title.get();
    let platform = platform();
    disposable_effect(current.clone(), move || {
        log::debug!("use_title: {current:?}");
        platform.set_title(&current);
        Dispose::noop()
    });
    TitleSetter((*title).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tether_platform::HeadlessApp;

    fn mount(initial: &'static str) -> (HeadlessApp, Rc<RefCell<Option<TitleSetter>>>) {
        let out = Rc::new(RefCell::new(None));
        let app = HeadlessApp::new({
            let out = out.clone();
            move || {
                let setter = use_title(initial);
                *out.borrow_mut() = Some(setter.clone());
                Div()
            }
        });
        (app, out)
    }

    #[test]
    fn writes_initial_title_after_first_frame() {
        let (mut app, _out) = mount("Loading...");
        assert!(app.platform().title_writes().is_empty());
        app.settle();
        assert_eq!(app.platform().title(), "Loading...");
    }

    #[test]
    fn each_distinct_value_is_written_once() {
        let (mut app, out) = mount("Loading...");
        app.settle();

        let setter = out.borrow().clone();
        let Some(setter) = setter else {
            panic!("hook did not run");
        };
        setter.set("Loaded");
        app.settle();
        setter.set("Loaded");
        app.settle();
        app.settle();

        assert_eq!(setter.get(), "Loaded");
        assert_eq!(app.platform().title_writes(), vec!["Loading...", "Loaded"]);
    }
}
