//! Session panel: the color selection surface bound to one target slot.
//!
//! Wires the saturation/lightness area, hue slider, hex and RGB inputs,
//! quick palette, recent colors, clipboard copy, and the sampling chain
//! to a [`SessionCore`]. Every widget funnels its accepted value through
//! exactly one core call per micro-interaction, so the host callback
//! fires once per change and the display signals simply mirror the core.

use std::cell::RefCell;
use std::rc::Rc;

use floem::prelude::*;
use floem::reactive::{RwSignal, SignalGet, SignalUpdate};

use crate::capture_overlay::{capture_overlay, CaptureFrame};
use crate::color::Rgb;
use crate::color_area::color_area;
use crate::constants;
use crate::hue_slider::hue_slider;
use crate::inputs::{copy_button, hex_input, number_input};
use crate::recents::SwatchStore;
use crate::sampler::{SampleTier, SamplerChain, StaticFallback};
use crate::session::{SessionCore, SlotSpec};

fn parse_or_gray(hex: &str) -> Rgb {
    Rgb::from_hex(hex).unwrap_or(Rgb {
        r: 128,
        g: 128,
        b: 128,
    })
}

/// A clickable solid-color square.
fn swatch(hex: String, on_pick: Rc<dyn Fn(&str)>) -> impl IntoView {
    let rgb = parse_or_gray(&hex);
    empty()
        .style(move |s| {
            s.width(constants::SWATCH_SIZE)
                .height(constants::SWATCH_SIZE)
                .border_radius(3.0)
                .border(1.0)
                .border_color(Color::rgba8(0, 0, 0, 40))
                .background(Color::rgb8(rgb.r, rgb.g, rgb.b))
                .cursor(floem::style::CursorStyle::Pointer)
                .hover(|s| s.border_color(Color::rgba8(0, 0, 0, 140)))
        })
        .on_click_stop(move |_| on_pick(&hex))
}

pub(crate) fn session_panel(
    slot: SlotSpec,
    current_hex: &str,
    store: Rc<dyn SwatchStore>,
    on_change: impl Fn(&str) + 'static,
) -> impl IntoView {
    let core = Rc::new(RefCell::new(SessionCore::open(
        slot,
        current_hex,
        store,
        on_change,
    )));

    let title = core.borrow().title().to_string();
    let initial = core.borrow().hsl();
    let initial_rgb = parse_or_gray(&core.borrow().current_hex());

    // Display signals mirroring the core
    let hue = RwSignal::new(initial.h);
    let sat = RwSignal::new(initial.s);
    let light = RwSignal::new(initial.l);
    let hex = RwSignal::new(core.borrow().current_hex());
    let r = RwSignal::new(initial_rgb.r as i64);
    let g = RwSignal::new(initial_rgb.g as i64);
    let b = RwSignal::new(initial_rgb.b as i64);
    let recents = RwSignal::new(core.borrow().recents());

    // Transient flags
    let copied = RwSignal::new(false);
    let sampling = RwSignal::new(false);
    let notice = RwSignal::new(false);
    let frame: RwSignal<Option<Rc<CaptureFrame>>> = RwSignal::new(None);

    // Core → signals, after every accepted interaction
    let sync = {
        let core = core.clone();
        Rc::new(move || {
            let c = core.borrow();
            let hsl = c.hsl();
            if hue.get_untracked() != hsl.h {
                hue.set(hsl.h);
            }
            if sat.get_untracked() != hsl.s {
                sat.set(hsl.s);
            }
            if light.get_untracked() != hsl.l {
                light.set(hsl.l);
            }
            let hx = c.current_hex();
            let rgb = parse_or_gray(&hx);
            if r.get_untracked() != rgb.r as i64 {
                r.set(rgb.r as i64);
            }
            if g.get_untracked() != rgb.g as i64 {
                g.set(rgb.g as i64);
            }
            if b.get_untracked() != rgb.b as i64 {
                b.set(rgb.b as i64);
            }
            if hex.get_untracked() != hx {
                hex.set(hx);
            }
            recents.set(c.recents());
        })
    };

    let pick_hex: Rc<dyn Fn(&str)> = {
        let core = core.clone();
        let sync = sync.clone();
        Rc::new(move |hx: &str| {
            core.borrow_mut().accept_hex(hx);
            sync();
        })
    };

    // The overlay's pending delivery; parked here between the capture
    // tier presenting a frame and the user resolving it.
    #[allow(clippy::type_complexity)]
    let pending_pick: Rc<RefCell<Option<Box<dyn FnOnce(Option<Rgb>)>>>> =
        Rc::new(RefCell::new(None));

    let chain = {
        let mut tiers: Vec<Box<dyn SampleTier>> = Vec::new();
        #[cfg(all(feature = "eyedropper", target_os = "macos"))]
        tiers.push(Box::new(crate::eyedropper::NativeSampleTier));
        #[cfg(all(feature = "capture", target_os = "macos"))]
        {
            let pending_pick = pending_pick.clone();
            tiers.push(Box::new(crate::capture::CaptureClickTier::new(
                move |f, deliver| {
                    *pending_pick.borrow_mut() = Some(deliver);
                    frame.set(Some(Rc::new(f)));
                },
            )));
        }
        tiers.push(Box::new(StaticFallback::new(move || notice.set(true))));
        Rc::new(SamplerChain::new(tiers))
    };

    let begin_sample = {
        let core = core.clone();
        let sync = sync.clone();
        let chain = chain.clone();
        move || {
            if !core.borrow_mut().begin_sampling() {
                return;
            }
            sampling.set(true);
            let core_for_fallback = core.clone();
            let core = core.clone();
            let sync = sync.clone();
            let started = chain.run(move |picked| {
                core.borrow_mut().end_sampling(picked);
                sampling.set(false);
                sync();
            });
            if !started {
                core_for_fallback.borrow_mut().end_sampling(None);
                sampling.set(false);
            }
        }
    };

    let overlay = capture_overlay(frame, {
        let pending_pick = pending_pick.clone();
        move |picked| {
            frame.set(None);
            if let Some(deliver) = pending_pick.borrow_mut().take() {
                deliver(picked);
            }
        }
    });

    let palette_row = |colors: &'static [&'static str]| {
        let pick_hex = pick_hex.clone();
        h_stack_from_iter(
            colors
                .iter()
                .map(move |c| swatch(c.to_string(), pick_hex.clone())),
        )
        .style(|s| s.gap(4.0).justify_center())
    };

    v_stack((
        // Slot title + current color swatch
        h_stack((
            label(move || title.clone()).style(|s| {
                s.font_size(12.0)
                    .color(Color::rgb8(60, 60, 60))
                    .flex_grow(1.0)
            }),
            empty().style(move |st| {
                let c = parse_or_gray(&hex.get());
                st.width(32.0)
                    .height(32.0)
                    .border_radius(4.0)
                    .border(1.0)
                    .border_color(Color::rgb8(180, 180, 180))
                    .background(Color::rgb8(c.r, c.g, c.b))
            }),
        ))
        .style(|st| st.items_center().margin_horiz(8.0).margin_top(12.0)),
        // Saturation/lightness area
        {
            let core = core.clone();
            let sync = sync.clone();
            color_area(hue, sat, light, move |s, l| {
                core.borrow_mut().accept_sat_light(s, l);
                sync();
            })
            .style(|s| s.margin_horiz(8.0))
        },
        // Hue slider
        {
            let core = core.clone();
            let sync = sync.clone();
            hue_slider(hue, move |h| {
                core.borrow_mut().accept_hue(h);
                sync();
            })
            .style(|s| s.margin_horiz(8.0))
        },
        // Hex + copy + eyedropper row
        h_stack((
            {
                let pick_hex = pick_hex.clone();
                hex_input(hex, move |hx| pick_hex(hx))
            },
            copy_button(move || hex.get(), copied),
            sample_button(begin_sample, sampling),
        ))
        .style(|st| st.gap(constants::GAP).items_center().justify_center()),
        // RGB inputs row
        h_stack((
            {
                let core = core.clone();
                let sync = sync.clone();
                number_input("R", r, 255, move |v| {
                    core.borrow_mut()
                        .accept_rgb(v, g.get_untracked(), b.get_untracked());
                    sync();
                })
            },
            {
                let core = core.clone();
                let sync = sync.clone();
                number_input("G", g, 255, move |v| {
                    core.borrow_mut()
                        .accept_rgb(r.get_untracked(), v, b.get_untracked());
                    sync();
                })
            },
            {
                let core = core.clone();
                let sync = sync.clone();
                number_input("B", b, 255, move |v| {
                    core.borrow_mut()
                        .accept_rgb(r.get_untracked(), g.get_untracked(), v);
                    sync();
                })
            },
        ))
        .style(|st| st.gap(constants::GAP / 2.0).items_center().justify_center()),
        // Quick palette
        v_stack((
            palette_row(&constants::QUICK_PALETTE[..6]),
            palette_row(&constants::QUICK_PALETTE[6..]),
        ))
        .style(|s| s.gap(4.0)),
        // Recent colors for this slot
        v_stack((
            label(|| "Recent").style(|s| {
                s.font_size(constants::LABEL_FONT)
                    .color(Color::rgb8(120, 120, 120))
            }),
            {
                let pick_hex = pick_hex.clone();
                dyn_stack(
                    move || recents.get(),
                    |c| c.clone(),
                    move |c| swatch(c, pick_hex.clone()),
                )
                .style(|s| s.gap(4.0))
            },
        ))
        .style(move |s| {
            s.gap(2.0)
                .margin_horiz(8.0)
                .apply_if(recents.get().is_empty(), |s| s.hide())
        }),
        // Static sampling fallback notice
        h_stack((
            label(|| {
                "Screen sampling isn't available here. Pick from the area above, \
                 the RGB fields, or the quick palette."
                    .to_string()
            })
            .style(|s| {
                s.font_size(constants::LABEL_FONT)
                    .color(Color::rgb8(90, 90, 90))
                    .flex_grow(1.0)
            }),
            label(|| lucide_icons::Icon::X.unicode().to_string())
                .style(|s| {
                    s.font_size(12.0)
                        .font_family("lucide".to_string())
                        .color(Color::rgb8(120, 120, 120))
                        .cursor(floem::style::CursorStyle::Pointer)
                })
                .on_click_stop(move |_| notice.set(false)),
        ))
        .style(move |s| {
            s.gap(4.0)
                .padding(6.0)
                .margin_horiz(8.0)
                .border_radius(4.0)
                .background(Color::rgb8(252, 248, 227))
                .border(1.0)
                .border_color(Color::rgb8(220, 210, 160))
                .items_center()
                .apply_if(!notice.get(), |s| s.hide())
        }),
        overlay,
    ))
    .style(|st| {
        st.gap(constants::GAP)
            .padding_horiz(constants::PADDING)
            .padding_bottom(constants::PADDING)
            .padding_top(2.0)
            .size_full()
            .background(Color::rgb8(242, 242, 242))
    })
}

/// A small pipette button that starts the sampling chain. Dimmed and
/// inert while a sample request is outstanding.
fn sample_button(begin_sample: impl Fn() + 'static, sampling: RwSignal<bool>) -> impl IntoView {
    let pressed = RwSignal::new(false);
    label(|| lucide_icons::Icon::Pipette.unicode().to_string())
        .style(move |s| {
            let c = if sampling.get() {
                Color::rgb8(190, 190, 190)
            } else if pressed.get() {
                Color::rgb8(80, 80, 80)
            } else {
                Color::rgb8(120, 120, 120)
            };
            s.font_size(18.0)
                .font_family("lucide".to_string())
                .cursor(floem::style::CursorStyle::Pointer)
                .border_radius(3.0)
                .padding(2.0)
                .color(c)
                .hover(|s| s.background(Color::rgb8(230, 230, 230)))
        })
        .on_event_stop(floem::event::EventListener::PointerDown, move |_| {
            pressed.set(true);
        })
        .on_event_stop(floem::event::EventListener::PointerUp, move |_| {
            pressed.set(false);
            begin_sample();
        })
}
