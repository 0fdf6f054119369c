//! Drives the practice page through a scripted session on the headless
//! platform and prints what the page shows after each step.
//!
//! Usage: `practice-page [options.json]`. Set `RUST_LOG=debug` for hook logs.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use std::rc::Rc;

    use anyhow::Context;
    use practice_page::{App, PageOptions};
    use tether_core::{Permission, Platform};
    use tether_platform::{HeadlessApp, HeadlessPlatform};
    use web_time::Duration;

    env_logger::init();

    let options = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading page options from {path}"))?;
            PageOptions::from_json(&json).with_context(|| format!("parsing {path}"))?
        }
        None => PageOptions::default(),
    };
    log::info!("page options: {options:?}");

    let platform =
        Rc::new(HeadlessPlatform::new().with_notifications(true, Permission::Default));
    let delay = options.title_delay();
    let mut app = HeadlessApp::with_platform(platform.clone(), move || App(&options));

    let show = |step: &str, app: &mut HeadlessApp| {
        let page = app.settle().text_content();
        println!("== {step} (title: {:?})\n{page}\n", app.platform().title());
    };

    show("mounted", &mut app);

    app.click_button("Section 2");
    app.type_into("Name", "Mr. Smith");
    app.type_into("Email", "me@example.com");
    show("typed and switched tab", &mut app);

    platform.answer_confirm(false);
    app.click_button("Click to delete everything");
    app.click_button("Click!");
    app.click_button("Enable protection");
    let unload = platform.before_unload();
    log::info!("unload prevented: {}", unload.default_prevented());
    platform.mouse_leave(300.0, 0.0);
    show("clicked around", &mut app);

    platform.go_offline();
    platform.scroll_to(0.0, 240.0);
    app.click_button("Make fullscreen");
    platform.flush_fullscreen();
    show("offline, scrolled, fullscreen", &mut app);

    app.click_button("Notify me");
    platform.resolve_permission(Permission::Granted);
    platform.respond(Ok(serde_json::json!({
        "fact": "A group of cats is called a clowder.",
        "length": 36
    })));
    platform.advance(delay);
    show("after the title delay", &mut app);

    let frames = app.host().frame_count();
    app.unmount();
    println!(
        "unmounted after {frames} frames: {} listeners, {} timers, {} notifications shown",
        platform.listener_count(),
        platform.active_timers(),
        platform.notifications().len()
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
