use std::cell::Cell;
use std::rc::Rc;

use tether_core::*;

pub type TabSelector = Rc<dyn Fn(usize) -> Result<(), HookError>>;

/// The selected entry of a tab list and a way to change it.
#[derive(Clone)]
pub struct Tabs<T> {
    pub current_item: T,
    pub current_index: usize,
    select: TabSelector,
}

impl<T> Tabs<T> {
    /// Selects `index`. Out-of-range indices are rejected and the selection
    /// stays where it was.
    pub fn change_item(&self, index: usize) -> Result<(), HookError> {
        (self.select)(index)
    }

    pub fn selector(&self) -> TabSelector {
        self.select.clone()
    }
}

/// Tracks which of `all` is selected.
///
/// Returns `None` when the list is missing or empty, and when the selected
/// index does not name an entry of it.
pub fn use_tabs<T: Clone + 'static>(initial: usize, all: Option<&[T]>) -> Option<Tabs<T>> {
    let index = remember(|| signal(initial));
    let len = remember(|| Cell::new(0usize));

    let Some(items) = all.filter(|items| !items.is_empty()) else {
        log::debug!("use_tabs: no tabs to select from");
        len.set(0);
        return None;
    };
    len.set(items.len());

    let current_index = index.get();
    let Some(current_item) = items.get(current_index).cloned() else {
        log::warn!(
            "use_tabs: index {current_index} is out of range for {} tabs",
            items.len()
        );
        return None;
    };

    let select: TabSelector = {
        let index = (*index).clone();
        Rc::new(move |i| {
            let n = len.get();
            if i >= n {
                return Err(HookError::IndexOutOfRange { index: i, len: n });
            }
            index.set_if_changed(i);
            Ok(())
        })
    };

    Some(Tabs {
        current_item,
        current_index,
        select,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::*;
    use std::cell::RefCell;
    use tether_platform::HeadlessApp;

    #[derive(Clone, Debug, PartialEq)]
    struct Section {
        tab: &'static str,
        content: &'static str,
    }

    const SECTIONS: [Section; 2] = [
        Section {
            tab: "Section 1",
            content: "I'm the content of the Section 1",
        },
        Section {
            tab: "Section 2",
            content: "I'm the content of the Section 2",
        },
    ];

    type Probe = Rc<RefCell<Option<Tabs<Section>>>>;

    fn mount(initial: usize, items: Option<Vec<Section>>) -> (HeadlessApp, Probe) {
        let out: Probe = Rc::new(RefCell::new(None));
        let app = HeadlessApp::new({
            let out = out.clone();
            move || {
                let tabs = use_tabs(initial, items.as_deref());
                let content = tabs.as_ref().map(|t| P(t.current_item.content));
                *out.borrow_mut() = tabs;
                Div().child(content)
            }
        });
        (app, out)
    }

    fn current(out: &Probe) -> Option<(usize, &'static str)> {
        out.borrow()
            .as_ref()
            .map(|t| (t.current_index, t.current_item.tab))
    }

    #[test]
    fn selects_initial_tab() {
        let (mut app, out) = mount(0, Some(SECTIONS.to_vec()));
        let view = app.settle();
        assert_eq!(view.text_content(), "I'm the content of the Section 1");
        assert_eq!(current(&out), Some((0, "Section 1")));
    }

    #[test]
    fn change_item_switches_content() {
        let (mut app, out) = mount(0, Some(SECTIONS.to_vec()));
        app.settle();

        let tabs = out.borrow().clone();
        assert!(tabs.is_some_and(|t| t.change_item(1).is_ok()));
        let view = app.settle();
        assert_eq!(view.text_content(), "I'm the content of the Section 2");
        assert_eq!(current(&out), Some((1, "Section 2")));
    }

    #[test]
    fn out_of_range_change_is_rejected() {
        let (mut app, out) = mount(1, Some(SECTIONS.to_vec()));
        app.settle();

        let selector = out.borrow().as_ref().map(Tabs::selector);
        let err = selector.map(|s| s(2));
        assert_eq!(
            err,
            Some(Err(HookError::IndexOutOfRange { index: 2, len: 2 }))
        );
        app.settle();
        assert_eq!(current(&out), Some((1, "Section 2")));
    }

    #[test]
    fn missing_or_empty_list_yields_nothing() {
        let (mut app, out) = mount(0, None);
        assert_eq!(app.settle().text_content(), "");
        assert!(out.borrow().is_none());

        let (mut app, out) = mount(0, Some(Vec::new()));
        app.settle();
        assert!(out.borrow().is_none());
    }

    #[test]
    fn out_of_range_initial_index_yields_nothing() {
        let (mut app, out) = mount(5, Some(SECTIONS.to_vec()));
        app.settle();
        assert!(out.borrow().is_none());
    }
}
