//! Standalone demo: one color session per editable slot.
//!
//! Plays the host application's part: it owns the three slot values
//! (background, header text, bullet text), hands each panel its current
//! hex, and receives live updates through the callbacks. Recent colors
//! persist to a JSON file next to the binary, one history per slot.

use std::rc::Rc;

use floem::prelude::*;
use floem::window::WindowConfig;
use floem_chroma::{color_session, JsonSwatchStore, SlotSpec, SwatchStore};

fn slot_panel(
    store: &Rc<JsonSwatchStore>,
    title: &'static str,
    key: &'static str,
    initial: &'static str,
) -> impl IntoView + use<> {
    let value = RwSignal::new(initial.to_string());
    let store: Rc<dyn SwatchStore> = store.clone();
    color_session(SlotSpec::new(title, key), initial, store, move |hex| {
        value.set(hex.to_string());
        println!("{key} is now {hex}");
    })
    .style(|s| s.width(248.0))
}

fn main() {
    env_logger::init();

    let store = Rc::new(JsonSwatchStore::new("chroma-swatches.json"));

    floem::Application::new()
        .window(
            move |_| {
                h_stack((
                    slot_panel(&store, "Background Color", "background", "#7ba5b8"),
                    slot_panel(&store, "Header Text Color", "header_text", "#ffffff"),
                    slot_panel(&store, "Bullet Text Color", "bullet_text", "#f8f8f8"),
                ))
                .style(|s| s.size_full())
                .on_event_stop(floem::event::EventListener::WindowClosed, |_| {
                    floem::quit_app()
                })
            },
            Some(
                WindowConfig::default()
                    .size((744.0, 560.0))
                    .title("floem-chroma"),
            ),
        )
        .run();
}
