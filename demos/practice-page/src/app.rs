use std::rc::Rc;

use tether_hooks::*;

use crate::options::PageOptions;

#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub tab: &'static str,
    pub content: &'static str,
}

pub const SECTIONS: [Section; 2] = [
    Section {
        tab: "Section 1",
        content: "I'm the content of the Section 1",
    },
    Section {
        tab: "Section 2",
        content: "I'm the content of the Section 2",
    },
];

/// Appends a line to the page's activity feed.
type Recorder = Rc<dyn Fn(&str)>;

fn name_fits(value: &str) -> bool {
    value.chars().count() < 10
}

fn no_at_after_first(value: &str) -> bool {
    !value
        .char_indices()
        .any(|(i, c)| i > 0 && c == '@')
}

pub fn App(options: &PageOptions) -> View {
    let activity = remember(|| signal(Vec::<String>::new()));
    let record: Recorder = {
        let activity = (*activity).clone();
        Rc::new(move |line: &str| {
            log::info!("page: {line}");
            activity.update(|a| a.push(line.to_string()));
        })
    };

    // Title: "Loading..." now, "Loaded" once the delay has passed.
    let title = use_title(options.loading_title.clone());
    {
        let title = title.clone();
        let loaded = options.loaded_title.clone();
        use_interval(options.title_delay(), Rc::new(move || title.set(loaded.clone())));
    }

    let tabs = use_tabs(0, Some(&SECTIONS[..]));
    let name = use_input("Mr.", Some(Rc::new(name_fits)));
    let email = use_input("email", Some(Rc::new(no_at_after_first)));

    // Effects key on callback identity, so these two must survive frames.
    let say_hello = remember({
        let record = record.clone();
        move || -> Rc<dyn Fn()> { Rc::new(move || record("Hello!")) }
    });
    let please_stay = remember({
        let record = record.clone();
        move || -> Rc<dyn Fn()> { Rc::new(move || record("Please don't go...")) }
    });
    let hello_button = use_click((*say_hello).clone());
    use_before_leave((*please_stay).clone());

    let delete_all = use_confirm(
        "Are you sure you want to delete everything?",
        {
            let record = record.clone();
            Rc::new(move || record("Deleting everything..."))
        },
        Some({
            let record = record.clone();
            Rc::new(move || record("Deletion cancelled"))
        }),
    );
    let leave_guard = use_prevent_leave();

    let online = use_network(Some({
        let record = record.clone();
        Rc::new(move |online: bool| record(if online { "Back online" } else { "Went offline" }))
    }));
    let offset = use_scroll();
    let fullscreen = use_full_screen(Some({
        let record = record.clone();
        Rc::new(move |on: bool| record(if on { "Entered fullscreen" } else { "Left fullscreen" }))
    }));
    let notify = use_notification(
        "Can I steal your kimchi?",
        NotificationOptions::default().body("I love kimchi, don't you?"),
    );
    let fact = use_fetch(options.fact_request());

    let heading_fade = use_fade_in(3.0, 2.0);
    let paragraph_fade = use_fade_in(10.0, 5.0);

    Div().child((
        Div().class("greetings_container").child((
            heading_fade.apply(H1("Hello!!!")),
            paragraph_fade.apply(P("this is p")),
        )),
        P("Practice"),
        TabsMenu(tabs, record.clone()),
        Div().class("input_container").child((
            name.view("Name"),
            email.view("Email"),
            BareButton("Click!").node_ref(hello_button),
        )),
        Div().class("button_container").child((
            H2("Here you can delete all"),
            ActionButton("Click to delete everything", delete_all),
        )),
        LeaveControls(leave_guard),
        Status(online, offset),
        FullscreenSection(fullscreen),
        Div().class("notification_container").child(
            notify.map(|n| Button("Notify me", move || n.fire())),
        ),
        FactSection(fact),
        Div()
            .class("activity")
            .child(activity.get().into_iter().map(P).collect::<Vec<_>>()),
    ))
}

fn TabsMenu(tabs: Option<Tabs<Section>>, record: Recorder) -> View {
    let Some(tabs) = tabs else {
        return Div().class("tabs_menu");
    };
    let buttons: Vec<View> = SECTIONS
        .iter()
        .enumerate()
        .map(|(index, section)| {
            let select = tabs.selector();
            let record = record.clone();
            Button(section.tab, move || {
                if let Err(e) = select(index) {
                    record(&format!("Cannot open tab: {e}"));
                }
            })
        })
        .collect();
    Div()
        .class("tabs_menu")
        .child((buttons, P(tabs.current_item.content)))
}

fn LeaveControls(guard: PreventLeave) -> View {
    let (enable, disable) = (guard.clone(), guard.clone());
    Div().class("leave_container").child((
        Button("Enable protection", move || enable.enable()),
        Button("Disable protection", move || disable.disable()),
        P(if guard.is_enabled() {
            "Leaving is guarded"
        } else {
            "Leaving is free"
        }),
    ))
}

fn Status(online: bool, offset: Vec2) -> View {
    let scroll = P(format!("Scrolled to {}, {}", offset.x, offset.y));
    Div().class("status").child((
        P(if online { "You are online" } else { "You are offline" }),
        if offset.y > 100.0 {
            scroll.class("far")
        } else {
            scroll
        },
    ))
}

fn FullscreenSection(fs: Fullscreen) -> View {
    let (enter, exit) = (fs.clone(), fs.clone());
    Div().class("fullscreen_container").child((
        Div().node_ref(fs.node_ref.clone()).child((
            P(if fs.is_fullscreen {
                "Showing fullscreen"
            } else {
                "Showing inline"
            }),
            Button("Exit fullscreen", move || exit.exit()),
        )),
        Button("Make fullscreen", move || enter.trigger()),
    ))
}

fn FactSection(fact: FetchState) -> View {
    let line = if fact.loading {
        "Fetching a cat fact...".to_string()
    } else if let Some(e) = &fact.error {
        format!("Could not fetch a fact: {e}")
    } else if let Some(text) = fact.data.as_ref().and_then(|d| d["fact"].as_str()) {
        text.to_string()
    } else {
        "No fact yet".to_string()
    };
    Div()
        .class("fact_container")
        .child((P(line), ActionButton("Another fact", fact.refetcher())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validators() {
        assert!(name_fits("Mr. Smith"));
        assert!(!name_fits("Mr. Smithers"));
        assert!(no_at_after_first("@handle"));
        assert!(no_at_after_first("email"));
        assert!(!no_at_after_first("me@example.com"));
    }
}
