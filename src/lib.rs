//! # floem-chroma
//!
//! A slot-bound color selection panel for [Floem](https://github.com/lapce/floem).
//!
//! A host application opens one session per editable color value (a
//! "slot": background, header text, …) by mounting the view returned
//! from [`color_session`]. The panel provides an HSL gradient area, hue
//! slider, hex and RGB inputs, a quick palette, per-slot recent colors,
//! clipboard copy, and a screen-sampling fallback chain. Every accepted
//! interaction invokes the host callback immediately with the new
//! `#rrggbb` value; closing is simply dropping the view.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use floem_chroma::{color_session, JsonSwatchStore, SlotSpec};
//!
//! let store = Rc::new(JsonSwatchStore::new("swatches.json"));
//! let view = color_session(
//!     SlotSpec::new("Background Color", "background"),
//!     "#7ba5b8",
//!     store,
//!     |hex| println!("background is now {hex}"),
//! );
//! // Mount `view` in your Floem view tree; drop it to close the session.
//! ```

mod capture_overlay;
mod color;
mod color_area;
mod constants;
mod hue_slider;
mod inputs;
mod math;
mod panel;
mod recents;
mod sampler;
mod session;

#[cfg(all(feature = "capture", target_os = "macos"))]
mod capture;
#[cfg(all(feature = "eyedropper", target_os = "macos"))]
mod eyedropper;

pub use capture_overlay::CaptureFrame;
pub use color::{Hsl, Rgb};
pub use constants::QUICK_PALETTE;
pub use recents::{JsonSwatchStore, MemorySwatchStore, StoreError, SwatchStore};
pub use sampler::{SampleTier, SamplerChain, StaticFallback};
pub use session::SlotSpec;

#[cfg(all(feature = "capture", target_os = "macos"))]
pub use capture::CaptureClickTier;
#[cfg(all(feature = "eyedropper", target_os = "macos"))]
pub use eyedropper::NativeSampleTier;

use std::rc::Rc;
use std::sync::Once;

use floem::prelude::*;
use floem::text::FONT_SYSTEM;

static LOAD_LUCIDE_FONT: Once = Once::new();

/// Opens a color selection session bound to one target slot.
///
/// `current_hex` seeds the session (malformed values fall back to a
/// neutral gray); `on_change` is invoked with a `#rrggbb` string on every
/// accepted interaction, and each accepted color is recorded into
/// `store` under the slot's key. The session's ephemeral state lives in
/// the returned view; dropping it closes the session and the last
/// broadcast value stands.
pub fn color_session(
    slot: SlotSpec,
    current_hex: &str,
    store: Rc<dyn SwatchStore>,
    on_change: impl Fn(&str) + 'static,
) -> impl IntoView {
    LOAD_LUCIDE_FONT.call_once(|| {
        FONT_SYSTEM
            .lock()
            .db_mut()
            .load_font_data(lucide_icons::LUCIDE_FONT_BYTES.to_vec());
    });
    panel::session_panel(slot, current_hex, store, on_change)
}
