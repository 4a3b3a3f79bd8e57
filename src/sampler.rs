//! Screen-sample acquisition chain.
//!
//! Picking a color from outside the panel runs an ordered ladder of
//! tiers: the native point sampler, the capture-and-click overlay, and a
//! terminal informational notice. A tier is attempted only when every
//! tier before it was unsupported or resolved without a color; whatever a
//! tier does produce is routed through the same accept path as any other
//! selection. Failures never escape the chain — they are logged and the
//! ladder simply moves on.

use std::cell::Cell;
use std::rc::Rc;

use log::debug;

use crate::color::Rgb;

/// One rung of the acquisition ladder.
///
/// `acquire` must eventually call `deliver` exactly once, with `Some` for
/// a picked color and `None` when the tier produced nothing (cancelled,
/// permission denied, capture failed).
pub trait SampleTier {
    fn name(&self) -> &'static str;

    /// Whether this tier can run at all on the current platform/build.
    fn supported(&self) -> bool;

    fn acquire(&self, deliver: Box<dyn FnOnce(Option<Rgb>)>);
}

/// Ordered fallback ladder with a single-outstanding-request guard.
pub struct SamplerChain {
    tiers: Rc<Vec<Box<dyn SampleTier>>>,
    pending: Rc<Cell<bool>>,
}

impl SamplerChain {
    pub fn new(tiers: Vec<Box<dyn SampleTier>>) -> Self {
        Self {
            tiers: Rc::new(tiers),
            pending: Rc::new(Cell::new(false)),
        }
    }

    /// Whether a run is currently awaiting a tier's result.
    pub fn pending(&self) -> bool {
        self.pending.get()
    }

    /// Walk the ladder. Returns `false` without doing anything when a
    /// previous run is still outstanding.
    pub fn run(&self, on_done: impl FnOnce(Option<Rgb>) + 'static) -> bool {
        if self.pending.get() {
            debug!("sample request rejected: one is already pending");
            return false;
        }
        self.pending.set(true);
        let pending = self.pending.clone();
        Self::walk(
            self.tiers.clone(),
            0,
            Box::new(move |result| {
                pending.set(false);
                on_done(result);
            }),
        );
        true
    }

    fn walk(
        tiers: Rc<Vec<Box<dyn SampleTier>>>,
        index: usize,
        done: Box<dyn FnOnce(Option<Rgb>)>,
    ) {
        let Some(tier) = tiers.get(index) else {
            done(None);
            return;
        };
        if !tier.supported() {
            debug!("sample tier {} unsupported, falling through", tier.name());
            return Self::walk(tiers, index + 1, done);
        }
        debug!("trying sample tier {}", tier.name());
        let next = tiers.clone();
        tier.acquire(Box::new(move |result| match result {
            Some(color) => done(Some(color)),
            None => Self::walk(next, index + 1, done),
        }));
    }
}

/// Terminal tier: never yields a color, just raises a dismissible notice
/// pointing the user at the gradient area, RGB fields, or quick palette.
pub struct StaticFallback {
    show_notice: Box<dyn Fn()>,
}

impl StaticFallback {
    pub fn new(show_notice: impl Fn() + 'static) -> Self {
        Self {
            show_notice: Box::new(show_notice),
        }
    }
}

impl SampleTier for StaticFallback {
    fn name(&self) -> &'static str {
        "static-notice"
    }

    fn supported(&self) -> bool {
        true
    }

    fn acquire(&self, deliver: Box<dyn FnOnce(Option<Rgb>)>) {
        (self.show_notice)();
        deliver(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct ScriptedTier {
        label: &'static str,
        supported: bool,
        result: Option<Rgb>,
        hits: Rc<RefCell<Vec<&'static str>>>,
    }

    impl SampleTier for ScriptedTier {
        fn name(&self) -> &'static str {
            self.label
        }
        fn supported(&self) -> bool {
            self.supported
        }
        fn acquire(&self, deliver: Box<dyn FnOnce(Option<Rgb>)>) {
            self.hits.borrow_mut().push(self.label);
            deliver(self.result);
        }
    }

    /// Holds its delivery callback so the run stays pending.
    struct StalledTier {
        parked: Rc<RefCell<Option<Box<dyn FnOnce(Option<Rgb>)>>>>,
    }

    impl SampleTier for StalledTier {
        fn name(&self) -> &'static str {
            "stalled"
        }
        fn supported(&self) -> bool {
            true
        }
        fn acquire(&self, deliver: Box<dyn FnOnce(Option<Rgb>)>) {
            *self.parked.borrow_mut() = Some(deliver);
        }
    }

    fn tier(
        label: &'static str,
        supported: bool,
        result: Option<Rgb>,
        hits: &Rc<RefCell<Vec<&'static str>>>,
    ) -> Box<dyn SampleTier> {
        Box::new(ScriptedTier {
            label,
            supported,
            result,
            hits: hits.clone(),
        })
    }

    #[test]
    fn first_supported_tier_that_yields_wins() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let red = Rgb { r: 255, g: 0, b: 0 };
        let chain = SamplerChain::new(vec![
            tier("native", true, Some(red), &hits),
            tier("capture", true, Some(Rgb { r: 0, g: 0, b: 255 }), &hits),
        ]);

        let got = Rc::new(RefCell::new(None));
        let got2 = got.clone();
        assert!(chain.run(move |c| *got2.borrow_mut() = c));

        assert_eq!(*got.borrow(), Some(red));
        assert_eq!(*hits.borrow(), vec!["native"]);
        assert!(!chain.pending());
    }

    #[test]
    fn unsupported_tiers_are_skipped_without_acquiring() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let blue = Rgb { r: 0, g: 0, b: 255 };
        let chain = SamplerChain::new(vec![
            tier("native", false, Some(Rgb { r: 1, g: 1, b: 1 }), &hits),
            tier("capture", true, Some(blue), &hits),
        ]);

        let got = Rc::new(RefCell::new(None));
        let got2 = got.clone();
        chain.run(move |c| *got2.borrow_mut() = c);

        assert_eq!(*got.borrow(), Some(blue));
        assert_eq!(*hits.borrow(), vec!["capture"]);
    }

    #[test]
    fn cancellation_falls_through_to_the_next_tier() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let green = Rgb { r: 0, g: 255, b: 0 };
        let chain = SamplerChain::new(vec![
            tier("native", true, None, &hits),
            tier("capture", true, Some(green), &hits),
        ]);

        let got = Rc::new(RefCell::new(None));
        let got2 = got.clone();
        chain.run(move |c| *got2.borrow_mut() = c);

        assert_eq!(*got.borrow(), Some(green));
        assert_eq!(*hits.borrow(), vec!["native", "capture"]);
    }

    #[test]
    fn exhausted_ladder_ends_at_the_notice_with_no_color() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let noticed = Rc::new(Cell::new(false));
        let noticed2 = noticed.clone();
        let chain = SamplerChain::new(vec![
            tier("native", false, None, &hits),
            tier("capture", true, None, &hits),
            Box::new(StaticFallback::new(move || noticed2.set(true))),
        ]);

        let calls = Rc::new(Cell::new(0));
        let calls2 = calls.clone();
        let got = Rc::new(RefCell::new(Some(Rgb { r: 9, g: 9, b: 9 })));
        let got2 = got.clone();
        chain.run(move |c| {
            calls2.set(calls2.get() + 1);
            *got2.borrow_mut() = c;
        });

        assert!(noticed.get());
        assert_eq!(calls.get(), 1);
        assert_eq!(*got.borrow(), None);
        assert_eq!(*hits.borrow(), vec!["capture"]);
    }

    #[test]
    fn second_run_is_rejected_while_one_is_pending() {
        let parked = Rc::new(RefCell::new(None));
        let chain = SamplerChain::new(vec![Box::new(StalledTier {
            parked: parked.clone(),
        })]);

        assert!(chain.run(|_| {}));
        assert!(chain.pending());
        assert!(!chain.run(|_| {}));

        // Resolving the stalled tier frees the chain again.
        (parked.borrow_mut().take().unwrap())(None);
        assert!(!chain.pending());
        assert!(chain.run(|_| {}));
    }
}
