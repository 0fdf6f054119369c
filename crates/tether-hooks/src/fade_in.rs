use tether_core::*;

pub const DEFAULT_FADE_DURATION: f64 = 1.0;
pub const DEFAULT_FADE_DELAY: f64 = 0.0;

/// Ref and starting style for an element that fades in once rendered.
#[derive(Clone, Debug)]
pub struct FadeIn {
    pub node_ref: NodeRef,
    pub style: Style,
}

impl FadeIn {
    pub fn apply(&self, view: View) -> View {
        view.node_ref(self.node_ref.clone()).style(self.style)
    }
}

/// CSS transition for an opacity fade, durations in seconds.
pub fn fade_transition(duration: f64, delay: f64) -> String {
    format!("opacity {duration}s ease-in-out {delay}s")
}

/// Element starts fully transparent; after each render the transition and
/// full opacity are applied to it if it is on screen.
pub fn use_fade_in(duration: f64, delay: f64) -> FadeIn {
    let node = remember(NodeRef::new);
    let element = (*node).clone();
    let platform = platform();

    side_effect(move || {
        let Some(id) = element.current() else {
            return;
        };
        platform.set_style(id, "transition", &fade_transition(duration, delay));
        platform.set_style(id, "opacity", "1");
    });

    FadeIn {
        node_ref: (*node).clone(),
        style: Style { opacity: Some(0.0) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::*;
    use tether_platform::HeadlessApp;

    #[test]
    fn transition_string_formats_whole_and_fractional_seconds() {
        assert_eq!(fade_transition(3.0, 0.0), "opacity 3s ease-in-out 0s");
        assert_eq!(fade_transition(5.0, 2.0), "opacity 5s ease-in-out 2s");
        assert_eq!(fade_transition(0.5, 1.25), "opacity 0.5s ease-in-out 1.25s");
        assert_eq!(
            fade_transition(DEFAULT_FADE_DURATION, DEFAULT_FADE_DELAY),
            "opacity 1s ease-in-out 0s"
        );
    }

    #[test]
    fn element_starts_transparent_and_fades_after_render() {
        let mut app = HeadlessApp::new(|| {
            let fade = use_fade_in(3.0, 2.0);
            fade.apply(H1("Hello"))
        });
        let view = app.settle();
        assert_eq!(view.style.opacity, Some(0.0));
        let Some(id) = view.node_ref.as_ref().map(NodeRef::id) else {
            panic!("fade ref not attached");
        };

        let platform = app.platform();
        assert_eq!(platform.style(id, "opacity").as_deref(), Some("1"));
        assert_eq!(
            platform.style(id, "transition").as_deref(),
            Some("opacity 3s ease-in-out 2s")
        );
    }

    #[test]
    fn unrendered_element_is_left_alone() {
        let mut app = HeadlessApp::new(|| {
            let _fade = use_fade_in(5.0, 2.0);
            P("no ref here")
        });
        app.settle();
        let stray = NodeRef::new();
        assert_eq!(app.platform().style(stray.id(), "opacity"), None);
    }
}
