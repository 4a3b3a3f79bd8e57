//! macOS native eyedropper (screen color sampler) tier.
//!
//! Uses `NSColorSampler` via Objective-C FFI to invoke the system-wide
//! screen color picker. The sampler runs asynchronously — macOS shows a
//! magnifying-glass overlay, the user clicks a pixel, and the selection
//! handler fires with the sampled color, or with nil when the user
//! cancels.

use std::cell::Cell;

use block2::RcBlock;
use objc2::rc::{Allocated, Id};
use objc2::runtime::{AnyClass, AnyObject};
use objc2::{msg_send, msg_send_id};

use crate::color::Rgb;
use crate::sampler::SampleTier;

/// Tier 1 of the acquisition ladder: the OS point sampler.
pub struct NativeSampleTier;

impl SampleTier for NativeSampleTier {
    fn name(&self) -> &'static str {
        "native-sampler"
    }

    fn supported(&self) -> bool {
        AnyClass::get("NSColorSampler").is_some()
    }

    fn acquire(&self, deliver: Box<dyn FnOnce(Option<Rgb>)>) {
        sample_color(deliver);
    }
}

/// Invokes the macOS native screen color sampler.
///
/// `deliver` is called with the sampled color converted to sRGB, or with
/// `None` when the user cancels (Esc) or the color cannot be converted.
///
/// Must be called from the main thread (Floem event handlers satisfy this).
fn sample_color(deliver: Box<dyn FnOnce(Option<Rgb>)>) {
    let cls = match AnyClass::get("NSColorSampler") {
        Some(c) => c,
        None => {
            deliver(None);
            return;
        }
    };

    let sampler: Allocated<AnyObject> = unsafe { msg_send_id![cls, alloc] };
    let sampler: Id<AnyObject> = unsafe { msg_send_id![sampler, init] };

    type Callback = Cell<Option<Box<dyn FnOnce(Option<Rgb>)>>>;
    let callback: Callback = Cell::new(Some(deliver));

    let block = RcBlock::new(move |color_ptr: *mut AnyObject| {
        let picked = unsafe { srgb_components(color_ptr) };
        if let Some(cb) = callback.take() {
            cb(picked.map(|(r, g, b)| Rgb::from_normalized(r, g, b)));
        }
    });

    unsafe {
        let _: () = msg_send![&*sampler, showSamplerWithSelectionHandler: &*block];
    }
}

/// Convert an `NSColor*` to sRGB components. Nil (user cancelled) or a
/// color outside any convertible space yields `None`.
unsafe fn srgb_components(color_ptr: *mut AnyObject) -> Option<(f64, f64, f64)> {
    if color_ptr.is_null() {
        return None;
    }
    let ns_cs_cls = AnyClass::get("NSColorSpace")?;
    let srgb: *const AnyObject = unsafe { msg_send![ns_cs_cls, sRGBColorSpace] };
    if srgb.is_null() {
        return None;
    }
    let srgb_color: *const AnyObject =
        unsafe { msg_send![&*color_ptr, colorUsingColorSpace: &*srgb] };
    if srgb_color.is_null() {
        return None;
    }
    let mut r: f64 = 0.0;
    let mut g: f64 = 0.0;
    let mut b: f64 = 0.0;
    let mut a: f64 = 0.0;
    let _: () = unsafe {
        msg_send![
            &*srgb_color,
            getRed: &mut r,
            green: &mut g,
            blue: &mut b,
            alpha: &mut a
        ]
    };
    Some((r, g, b))
}
