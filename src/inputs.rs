//! Input components for color editing.

use std::rc::Rc;
use std::time::Duration;

use floem::event::EventPropagation;
use floem::prelude::*;
use floem::reactive::{create_effect, RwSignal, SignalGet, SignalUpdate};

use crate::constants;
use crate::math;

/// An integer input for one color channel, clamped to 0–`max`.
///
/// The field displays `value` and hands every committed edit (Enter or
/// focus lost) to `on_commit`; the caller routes it back through the
/// session, which echoes the clamped result into `value`.
pub(crate) fn number_input(
    lbl: &'static str,
    value: RwSignal<i64>,
    max: i64,
    on_commit: impl Fn(i64) + 'static,
) -> impl IntoView {
    let text = RwSignal::new(value.get_untracked().to_string());

    // Signal → text (external updates)
    create_effect(move |_| {
        let expected = value.get().to_string();
        if text.get_untracked() != expected {
            text.set(expected);
        }
    });

    let commit = Rc::new(move || {
        let raw = text.get_untracked();
        if let Ok(num) = raw.trim().parse::<i64>() {
            let clamped = num.clamp(0, max);
            on_commit(clamped);
            let formatted = clamped.to_string();
            if raw != formatted {
                text.set(formatted);
            }
        } else {
            // Reset to the current value
            let formatted = value.get_untracked().to_string();
            if raw != formatted {
                text.set(formatted);
            }
        }
    });
    let commit_key = commit.clone();

    v_stack((
        text_input(text)
            .style(|s| {
                s.width(constants::INPUT_WIDTH)
                    .padding(2.0)
                    .font_size(constants::INPUT_FONT)
                    .font_family("monospace".to_string())
                    .background(Color::WHITE)
                    .border(1.0)
                    .border_color(Color::rgb8(200, 200, 200))
                    .border_radius(3.0)
            })
            .on_event_stop(floem::event::EventListener::FocusLost, move |_| {
                commit();
            })
            .on_event(floem::event::EventListener::KeyDown, move |e| {
                if let floem::event::Event::KeyDown(ke) = e
                    && ke.key.logical_key
                        == floem::keyboard::Key::Named(floem::keyboard::NamedKey::Enter)
                {
                    commit_key();
                    return EventPropagation::Stop;
                }
                EventPropagation::Continue
            }),
        label(move || lbl).style(|s| {
            s.font_size(constants::LABEL_FONT)
                .color(Color::rgb8(120, 120, 120))
                .justify_content(Some(floem::taffy::AlignContent::Center))
        }),
    ))
    .style(|s| s.items_center().gap(1.0))
}

/// A hex input field.
///
/// `hex` holds the canonical `#rrggbb` string; the field displays it
/// without the prefix. Every keystroke that forms a strict 6-digit value
/// is handed to `on_valid` immediately; anything else is left in the
/// field and ignored until it becomes valid or is committed (which
/// resets an invalid field to the current color).
pub(crate) fn hex_input(hex: RwSignal<String>, on_valid: impl Fn(&str) + 'static) -> impl IntoView {
    let stripped = |s: String| s.trim_start_matches('#').to_string();
    let text = RwSignal::new(stripped(hex.get_untracked()));

    // External hex → text (only when not equivalent, so typing case is
    // not stomped mid-edit)
    create_effect(move |_| {
        let display = stripped(hex.get());
        let current = text.get_untracked();
        if !current.eq_ignore_ascii_case(&display) {
            text.set(display);
        }
    });

    // Dynamic: text → session on every valid keystroke
    create_effect(move |_| {
        let raw = text.get();
        if math::is_strict_hex(&raw) {
            let current = stripped(hex.get_untracked());
            if !raw.trim_start_matches('#').eq_ignore_ascii_case(&current) {
                on_valid(&raw);
            }
        }
    });

    let commit = move || {
        let raw = text.get_untracked();
        let current = stripped(hex.get_untracked());
        if math::is_strict_hex(&raw) {
            let normalized = raw.trim_start_matches('#').to_lowercase();
            if raw != normalized {
                text.set(normalized);
            }
        } else if raw != current {
            text.set(current);
        }
    };
    let commit_key = commit;

    h_stack((
        label(|| "#").style(|s| {
            s.font_size(constants::INPUT_FONT)
                .font_family("monospace".to_string())
                .color(Color::rgb8(120, 120, 120))
        }),
        text_input(text)
            .style(|s| {
                s.width(constants::HEX_INPUT_WIDTH)
                    .padding(2.0)
                    .font_size(constants::INPUT_FONT)
                    .font_family("monospace".to_string())
                    .background(Color::WHITE)
                    .border(1.0)
                    .border_color(Color::rgb8(200, 200, 200))
                    .border_radius(3.0)
            })
            .on_event_stop(floem::event::EventListener::FocusLost, move |_| {
                commit();
            })
            .on_event_stop(floem::event::EventListener::KeyDown, move |e| {
                if let floem::event::Event::KeyDown(ke) = e
                    && ke.key.logical_key
                        == floem::keyboard::Key::Named(floem::keyboard::NamedKey::Enter)
                {
                    commit_key();
                }
            }),
    ))
    .style(|s| s.items_center().gap(1.0))
}

/// A small copy button that copies the result of `get_text` to the
/// clipboard and flips `copied` on for two seconds as acknowledgement.
pub(crate) fn copy_button(
    get_text: impl Fn() -> String + 'static,
    copied: RwSignal<bool>,
) -> impl IntoView {
    let pressed = RwSignal::new(false);
    container(
        label(move || {
            let icon = if copied.get() {
                lucide_icons::Icon::Check
            } else {
                lucide_icons::Icon::Copy
            };
            icon.unicode().to_string()
        })
        .style(move |s| {
            let c = if pressed.get() {
                Color::rgb8(80, 80, 80)
            } else {
                Color::rgb8(120, 120, 120)
            };
            s.font_size(14.0).font_family("lucide".to_string()).color(c)
        }),
    )
    .style(|s| {
        s.size(20.0, 20.0)
            .items_center()
            .justify_center()
            .border_radius(3.0)
            .cursor(floem::style::CursorStyle::Pointer)
            .hover(|s| s.background(Color::rgb8(230, 230, 230)))
    })
    .on_event_stop(floem::event::EventListener::PointerDown, move |_| {
        pressed.set(true);
    })
    .on_event_stop(floem::event::EventListener::PointerUp, move |_| {
        pressed.set(false);
        copy_to_clipboard(&get_text());
        copied.set(true);
        // Auto-clear; firing after the panel closed is a harmless no-op.
        floem::action::exec_after(Duration::from_secs(2), move |_| {
            copied.set(false);
        });
    })
}

fn copy_to_clipboard(text: &str) {
    if let Ok(mut clipboard) = arboard::Clipboard::new() {
        let _ = clipboard.set_text(text);
    }
}
