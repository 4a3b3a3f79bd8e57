//! Screen-capture sample tier (macOS).
//!
//! Grabs a single frame of the main display through Core Graphics and
//! hands it to a host-provided presenter (the capture overlay). The
//! display image and its backing data are released inside
//! [`capture_frame`], before the overlay opens — nothing stays captured
//! while the user lines up the click.

use log::warn;

use core_graphics::display::CGDisplay;

use crate::capture_overlay::CaptureFrame;
use crate::color::Rgb;
use crate::sampler::SampleTier;

/// One frame of the main display as tight RGBA8, or `None` when capture
/// is unavailable (no display, no screen-recording permission, or an
/// unexpected pixel layout).
pub(crate) fn capture_frame() -> Option<CaptureFrame> {
    let image = CGDisplay::main().image()?;

    let width = image.width() as u32;
    let height = image.height() as u32;
    let bytes_per_row = image.bytes_per_row();
    if image.bits_per_pixel() != 32 || width == 0 || height == 0 {
        warn!(
            "unexpected display image layout: {} bpp",
            image.bits_per_pixel()
        );
        return None;
    }

    let data = image.data();
    let bytes = data.bytes();
    let mut rgba = vec![0u8; (width * height * 4) as usize];
    for y in 0..height as usize {
        let row = &bytes[y * bytes_per_row..];
        for x in 0..width as usize {
            // CGDisplay images are BGRA in memory.
            let src = x * 4;
            let dst = (y * width as usize + x) * 4;
            rgba[dst] = row[src + 2];
            rgba[dst + 1] = row[src + 1];
            rgba[dst + 2] = row[src];
            rgba[dst + 3] = 255;
        }
    }

    Some(CaptureFrame {
        width,
        height,
        rgba,
    })
}

/// Tier 2 of the acquisition ladder: capture one frame, then let the user
/// click a pixel of it in the overlay.
pub struct CaptureClickTier {
    present: Box<dyn Fn(CaptureFrame, Box<dyn FnOnce(Option<Rgb>)>)>,
}

impl CaptureClickTier {
    /// `present` shows a captured frame and eventually resolves its
    /// second argument with the clicked pixel, or `None` on dismissal.
    pub fn new(present: impl Fn(CaptureFrame, Box<dyn FnOnce(Option<Rgb>)>) + 'static) -> Self {
        Self {
            present: Box::new(present),
        }
    }
}

impl SampleTier for CaptureClickTier {
    fn name(&self) -> &'static str {
        "capture-click"
    }

    fn supported(&self) -> bool {
        true
    }

    fn acquire(&self, deliver: Box<dyn FnOnce(Option<Rgb>)>) {
        match capture_frame() {
            Some(frame) => (self.present)(frame, deliver),
            None => {
                warn!("screen capture unavailable, falling through");
                deliver(None);
            }
        }
    }
}
