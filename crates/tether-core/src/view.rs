use std::rc::Rc;

use crate::events::Event;
use crate::node_ref::NodeRef;

pub type Callback = Rc<dyn Fn()>;
pub type InputCallback = Rc<dyn Fn(&Event)>;

#[derive(Clone)]
pub enum ViewKind {
    Container,
    Heading {
        level: u8,
        text: String,
    },
    Text {
        text: String,
    },
    Button {
        text: String,
        on_click: Option<Callback>,
    },
    Input {
        value: String,
        placeholder: String,
        on_input: Option<InputCallback>,
    },
}

impl ViewKind {
    /// HTML tag a DOM renderer uses for this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            ViewKind::Container => "div",
            ViewKind::Heading { level: 1, .. } => "h1",
            ViewKind::Heading { level: 2, .. } => "h2",
            ViewKind::Heading { .. } => "h3",
            ViewKind::Text { .. } => "p",
            ViewKind::Button { .. } => "button",
            ViewKind::Input { .. } => "input",
        }
    }
}

impl std::fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Container => f.write_str("Container"),
            ViewKind::Heading { level, text } => f
                .debug_struct("Heading")
                .field("level", level)
                .field("text", text)
                .finish(),
            ViewKind::Text { text } => f.debug_struct("Text").field("text", text).finish(),
            ViewKind::Button { text, on_click } => f
                .debug_struct("Button")
                .field("text", text)
                .field("on_click", &on_click.is_some())
                .finish(),
            ViewKind::Input {
                value,
                placeholder,
                ..
            } => f
                .debug_struct("Input")
                .field("value", value)
                .field("placeholder", placeholder)
                .finish(),
        }
    }
}

/// Inline style a view starts with. Hooks may change the live element later.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Style {
    pub opacity: Option<f32>,
}

#[derive(Clone, Debug)]
pub struct View {
    pub kind: ViewKind,
    pub class: Option<String>,
    pub node_ref: Option<NodeRef>,
    pub style: Style,
    pub children: Vec<View>,
}

impl View {
    pub fn new(kind: ViewKind) -> Self {
        View {
            kind,
            class: None,
            node_ref: None,
            style: Style::default(),
            children: vec![],
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn node_ref(mut self, node_ref: NodeRef) -> Self {
        self.node_ref = Some(node_ref);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }

    /// Text content of headings, paragraphs and buttons.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            ViewKind::Heading { text, .. } | ViewKind::Text { text } | ViewKind::Button { text, .. } => {
                Some(text)
            }
            _ => None,
        }
    }

    /// Depth-first, parents before children.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a View)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    pub fn find(&self, pred: impl Fn(&View) -> bool) -> Option<&View> {
        let mut found = None;
        self.walk(&mut |v| {
            if found.is_none() && pred(v) {
                found = Some(v);
            }
        });
        found
    }

    pub fn find_button(&self, label: &str) -> Option<&View> {
        self.find(|v| matches!(&v.kind, ViewKind::Button { text, .. } if text == label))
    }

    pub fn find_input(&self, placeholder: &str) -> Option<&View> {
        self.find(|v| {
            matches!(&v.kind, ViewKind::Input { placeholder: p, .. } if p == placeholder)
        })
    }

    /// Concatenated text of the whole subtree, one line per node with text.
    pub fn text_content(&self) -> String {
        let mut lines = Vec::new();
        self.walk(&mut |v| {
            if let Some(t) = v.text() {
                lines.push(t.to_string());
            }
        });
        lines.join("\n")
    }
}

/// Keeps `NodeRef` liveness in step with what a renderer has on screen.
#[derive(Default)]
pub struct RefBinder {
    attached: Vec<NodeRef>,
}

impl RefBinder {
    /// Attaches every ref in `view` and detaches refs that are no longer present.
    pub fn bind(&mut self, view: &View) {
        let mut present = Vec::new();
        view.walk(&mut |v| {
            if let Some(r) = &v.node_ref {
                present.push(r.clone());
            }
        });

        for old in &self.attached {
            if !present.contains(old) {
                old.detach();
            }
        }
        for r in &present {
            r.attach();
        }
        self.attached = present;
    }

    pub fn release_all(&mut self) {
        for r in self.attached.drain(..) {
            r.detach();
        }
    }
}
