//! Color selection session core.
//!
//! [`SessionCore`] owns the ephemeral state of one open panel: the
//! current HSL value, the sampling phase, and the live-update contract.
//! Every accepted color, whatever widget produced it, goes through
//! [`SessionCore::accept`]: convert to hex, drop value-level duplicates,
//! invoke the host callback, then record into the recent-colors store.
//! The core never outlives the panel; dropping it discards everything.

use std::rc::Rc;

use log::debug;

use crate::color::{Hsl, Rgb};
use crate::recents::{record, SwatchStore};

/// Neutral gray used when a session is opened on a malformed hex value.
const FALLBACK: Hsl = Hsl {
    h: 0.0,
    s: 0.0,
    l: 50.0,
};

/// The application-level color value a session edits: a display title for
/// the panel header and the key its recent colors persist under.
#[derive(Debug, Clone)]
pub struct SlotSpec {
    pub title: String,
    pub store_key: String,
}

impl SlotSpec {
    pub fn new(title: impl Into<String>, store_key: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            store_key: store_key.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Sampling,
}

pub(crate) struct SessionCore {
    slot: SlotSpec,
    hsl: Hsl,
    phase: Phase,
    store: Rc<dyn SwatchStore>,
    on_change: Box<dyn Fn(&str)>,
    /// Hex last handed to the host; repeat accepts of the same value are
    /// dropped here rather than at each event source.
    last_sent: Option<String>,
}

impl SessionCore {
    pub(crate) fn open(
        slot: SlotSpec,
        current_hex: &str,
        store: Rc<dyn SwatchStore>,
        on_change: impl Fn(&str) + 'static,
    ) -> Self {
        let (hsl, last_sent) = match Rgb::from_hex(current_hex) {
            Some(rgb) => (rgb.to_hsl(), Some(rgb.to_hex())),
            None => {
                debug!("session opened on malformed hex {current_hex:?}");
                (FALLBACK, Some(FALLBACK.to_hex()))
            }
        };
        Self {
            slot,
            hsl,
            phase: Phase::Idle,
            store,
            on_change: Box::new(on_change),
            last_sent,
        }
    }

    pub(crate) fn title(&self) -> &str {
        &self.slot.title
    }

    pub(crate) fn hsl(&self) -> Hsl {
        self.hsl
    }

    pub(crate) fn current_hex(&self) -> String {
        match &self.last_sent {
            Some(hex) => hex.clone(),
            None => self.hsl.to_hex(),
        }
    }

    pub(crate) fn recents(&self) -> Vec<String> {
        self.store.get(&self.slot.store_key)
    }

    /// Live-update path: callback first, then the recents record.
    fn accept(&mut self, hsl: Hsl, hex: String) {
        self.hsl = hsl;
        if self.last_sent.as_deref() == Some(hex.as_str()) {
            return;
        }
        (self.on_change)(&hex);
        let mut list = self.store.get(&self.slot.store_key);
        record(&mut list, &hex);
        self.store.put(&self.slot.store_key, &list);
        self.last_sent = Some(hex);
    }

    pub(crate) fn accept_hsl(&mut self, h: f64, s: f64, l: f64) {
        let hsl = Hsl { h, s, l };
        self.accept(hsl, hsl.to_hex());
    }

    /// Gradient-area pick: hue held constant.
    pub(crate) fn accept_sat_light(&mut self, s: f64, l: f64) {
        self.accept_hsl(self.hsl.h, s, l);
    }

    /// Hue-slider change: saturation and lightness held constant.
    pub(crate) fn accept_hue(&mut self, h: f64) {
        self.accept_hsl(h, self.hsl.s, self.hsl.l);
    }

    /// Typed hex. Anything that fails the strict pattern is ignored and
    /// leaves the session untouched.
    pub(crate) fn accept_hex(&mut self, hex: &str) -> bool {
        match Rgb::from_hex(hex) {
            Some(rgb) => {
                self.accept_rgb_value(rgb);
                true
            }
            None => {
                debug!("ignoring malformed hex {hex:?}");
                false
            }
        }
    }

    /// Numeric channel edit: each channel clamped to 0–255, then the full
    /// HSL re-derived so the area cursor and hue slider stay consistent.
    pub(crate) fn accept_rgb(&mut self, r: i64, g: i64, b: i64) {
        self.accept_rgb_value(Rgb::from_clamped(r, g, b));
    }

    fn accept_rgb_value(&mut self, rgb: Rgb) {
        let mut hsl = rgb.to_hsl();
        // Achromatic values carry no hue; keep the slider where it was.
        if hsl.s == 0.0 {
            hsl.h = self.hsl.h;
        }
        self.accept(hsl, rgb.to_hex());
    }

    /// Enter the sampling phase. Refused while a sample is outstanding.
    pub(crate) fn begin_sampling(&mut self) -> bool {
        if self.phase == Phase::Sampling {
            debug!("sampling already active for {:?}", self.slot.store_key);
            return false;
        }
        self.phase = Phase::Sampling;
        true
    }

    /// Leave the sampling phase; a picked color goes through the same
    /// accept path as every other selection, a cancel changes nothing.
    pub(crate) fn end_sampling(&mut self, picked: Option<Rgb>) {
        self.phase = Phase::Idle;
        if let Some(rgb) = picked {
            self.accept_rgb_value(rgb);
        }
    }

    pub(crate) fn sampling(&self) -> bool {
        self.phase == Phase::Sampling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recents::MemorySwatchStore;
    use std::cell::RefCell;

    /// Store that logs its writes into a shared event trace.
    struct TracingStore {
        inner: MemorySwatchStore,
        trace: Rc<RefCell<Vec<String>>>,
    }

    impl SwatchStore for TracingStore {
        fn get(&self, key: &str) -> Vec<String> {
            self.inner.get(key)
        }
        fn put(&self, key: &str, colors: &[String]) {
            self.trace.borrow_mut().push(format!("put:{key}"));
            self.inner.put(key, colors);
        }
    }

    fn session(
        current: &str,
    ) -> (SessionCore, Rc<RefCell<Vec<String>>>, Rc<RefCell<Vec<String>>>) {
        let trace = Rc::new(RefCell::new(Vec::new()));
        let sent = Rc::new(RefCell::new(Vec::new()));
        let store = Rc::new(TracingStore {
            inner: MemorySwatchStore::new(),
            trace: trace.clone(),
        });
        let trace2 = trace.clone();
        let sent2 = sent.clone();
        let core = SessionCore::open(
            SlotSpec::new("Background Color", "background"),
            current,
            store,
            move |hex| {
                trace2.borrow_mut().push(format!("cb:{hex}"));
                sent2.borrow_mut().push(hex.to_string());
            },
        );
        (core, trace, sent)
    }

    #[test]
    fn opening_derives_hsl_within_tolerance() {
        let (core, _, sent) = session("#7ba5b8");
        let back = core.hsl().to_rgb();
        let rgb = Rgb::from_hex("#7ba5b8").unwrap();
        assert!((back.r as i16 - rgb.r as i16).abs() <= 1);
        assert!((back.g as i16 - rgb.g as i16).abs() <= 1);
        assert!((back.b as i16 - rgb.b as i16).abs() <= 1);
        // Opening alone is not an interaction.
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn opening_on_malformed_hex_falls_back_to_gray() {
        let (core, _, sent) = session("not-a-color");
        assert_eq!(core.current_hex(), "#808080");
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn hue_drag_from_the_full_corner_reaches_red() {
        let (mut core, _, sent) = session("#7ba5b8");
        core.accept_sat_light(100.0, 50.0);
        core.accept_hue(0.0);
        assert_eq!(sent.borrow().last().map(String::as_str), Some("#ff0000"));
    }

    #[test]
    fn palette_pick_broadcasts_exactly_once_then_records() {
        let (mut core, trace, _) = session("#7ba5b8");
        assert!(core.accept_hex("#3b82f6"));
        assert_eq!(
            *trace.borrow(),
            vec!["cb:#3b82f6".to_string(), "put:background".to_string()]
        );
        assert_eq!(core.recents(), vec!["#3b82f6"]);
    }

    #[test]
    fn repeat_values_are_deduplicated() {
        let (mut core, _, sent) = session("#7ba5b8");
        core.accept_hex("#3b82f6");
        core.accept_hex("#3b82f6");
        core.accept_hex("3B82F6");
        assert_eq!(sent.borrow().len(), 1);
    }

    #[test]
    fn reselecting_the_opening_color_is_not_an_update() {
        let (mut core, _, sent) = session("#ff0000");
        core.accept_hex("#ff0000");
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn malformed_hex_is_ignored_silently() {
        let (mut core, trace, _) = session("#7ba5b8");
        let before = core.hsl();
        assert!(!core.accept_hex("#3b82f"));
        assert!(!core.accept_hex("#3b82fg"));
        assert!(trace.borrow().is_empty());
        assert_eq!(core.hsl(), before);
    }

    #[test]
    fn channel_edits_clamp_and_rederive_hsl() {
        let (mut core, _, sent) = session("#7ba5b8");
        core.accept_rgb(300, -5, 128);
        assert_eq!(sent.borrow().last().map(String::as_str), Some("#ff0080"));
        let expected = Rgb {
            r: 255,
            g: 0,
            b: 128,
        }
        .to_hsl();
        assert_eq!(core.hsl(), expected);
    }

    #[test]
    fn achromatic_edits_keep_the_current_hue() {
        let (mut core, _, _) = session("#00ff00");
        let hue = core.hsl().h;
        core.accept_hex("#808080");
        assert_eq!(core.hsl().h, hue);
        assert_eq!(core.hsl().s, 0.0);
    }

    #[test]
    fn sampling_refuses_reentry_and_routes_picks() {
        let (mut core, _, sent) = session("#7ba5b8");
        assert!(core.begin_sampling());
        assert!(core.sampling());
        assert!(!core.begin_sampling());

        core.end_sampling(Some(Rgb { r: 255, g: 0, b: 0 }));
        assert!(!core.sampling());
        assert_eq!(sent.borrow().last().map(String::as_str), Some("#ff0000"));

        // Cancelled sample: back to idle, nothing broadcast.
        assert!(core.begin_sampling());
        core.end_sampling(None);
        assert!(!core.sampling());
        assert_eq!(sent.borrow().len(), 1);
    }

    #[test]
    fn dead_sampling_ladder_shows_the_notice_and_broadcasts_nothing() {
        use crate::sampler::{SampleTier, SamplerChain, StaticFallback};
        use std::cell::Cell;

        struct Unavailable;
        impl SampleTier for Unavailable {
            fn name(&self) -> &'static str {
                "native"
            }
            fn supported(&self) -> bool {
                false
            }
            fn acquire(&self, deliver: Box<dyn FnOnce(Option<Rgb>)>) {
                deliver(None);
            }
        }

        let (core, _, sent) = session("#7ba5b8");
        let core = Rc::new(RefCell::new(core));
        let noticed = Rc::new(Cell::new(false));
        let noticed2 = noticed.clone();
        let chain = SamplerChain::new(vec![
            Box::new(Unavailable),
            Box::new(StaticFallback::new(move || noticed2.set(true))),
        ]);

        assert!(core.borrow_mut().begin_sampling());
        let core2 = core.clone();
        assert!(chain.run(move |picked| core2.borrow_mut().end_sampling(picked)));

        assert!(noticed.get());
        assert!(!core.borrow().sampling());
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn recents_follow_the_accept_stream_most_recent_first() {
        let (mut core, _, _) = session("#000000");
        core.accept_hex("#ff0000");
        core.accept_hex("#00ff00");
        core.accept_hex("#ff0000");
        assert_eq!(core.recents(), vec!["#ff0000", "#00ff00"]);
    }
}
