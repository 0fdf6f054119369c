//! View builders for page markup.

use std::rc::Rc;

use tether_core::*;

pub fn Div() -> View {
    View::new(ViewKind::Container)
}

pub fn H1(text: impl Into<String>) -> View {
    View::new(ViewKind::Heading {
        level: 1,
        text: text.into(),
    })
}

pub fn H2(text: impl Into<String>) -> View {
    View::new(ViewKind::Heading {
        level: 2,
        text: text.into(),
    })
}

pub fn P(text: impl Into<String>) -> View {
    View::new(ViewKind::Text { text: text.into() })
}

pub fn Button(text: impl Into<String>, on_click: impl Fn() + 'static) -> View {
    View::new(ViewKind::Button {
        text: text.into(),
        on_click: Some(Rc::new(on_click)),
    })
}

/// Button that shares an existing callback instead of wrapping a new closure.
pub fn ActionButton(text: impl Into<String>, on_click: Callback) -> View {
    View::new(ViewKind::Button {
        text: text.into(),
        on_click: Some(on_click),
    })
}

/// Button without its own handler; behaviour is bound through a ref.
pub fn BareButton(text: impl Into<String>) -> View {
    View::new(ViewKind::Button {
        text: text.into(),
        on_click: None,
    })
}

pub fn Input(
    placeholder: impl Into<String>,
    value: impl Into<String>,
    on_input: Option<InputCallback>,
) -> View {
    View::new(ViewKind::Input {
        value: value.into(),
        placeholder: placeholder.into(),
        on_input,
    })
}

pub trait ViewExt: Sized {
    fn child(self, children: impl IntoChildren) -> Self;
}

impl ViewExt for View {
    fn child(self, children: impl IntoChildren) -> Self {
        let mut kids = self.children.clone();
        kids.extend(children.into_children());
        self.with_children(kids)
    }
}

pub trait IntoChildren {
    fn into_children(self) -> Vec<View>;
}

impl IntoChildren for View {
    fn into_children(self) -> Vec<View> {
        vec![self]
    }
}

impl IntoChildren for Option<View> {
    fn into_children(self) -> Vec<View> {
        self.into_iter().collect()
    }
}

impl IntoChildren for Vec<View> {
    fn into_children(self) -> Vec<View> {
        self
    }
}

impl<const N: usize> IntoChildren for [View; N] {
    fn into_children(self) -> Vec<View> {
        self.into()
    }
}

macro_rules! impl_into_children_tuple {
    ($($idx:tt $t:ident),+) => {
        impl<$($t: IntoChildren),+> IntoChildren for ($($t,)+) {
            fn into_children(self) -> Vec<View> {
                let mut v = Vec::new();
                $(v.extend(self.$idx.into_children());)+
                v
            }
        }
    };
}

impl_into_children_tuple!(0 A, 1 B);
impl_into_children_tuple!(0 A, 1 B, 2 C);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J, 10 K);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J, 10 K, 11 L);
