//! Hue slider (0–360 degrees).
//!
//! Renders the full hue rainbow at full saturation and half lightness as
//! a rasterized horizontal gradient, avoiding vger's broken linear
//! gradient coordinate handling. Per-pixel `hsl(t·360, 100%, 50%)` is
//! piecewise-linear in RGB, so the track is exactly the six even stops at
//! 0/60/120/180/240/300/360 degrees.

use std::sync::Arc;

use floem::kurbo::Rect;
use floem::peniko::{self, Blob, Color};

use floem::reactive::{create_effect, RwSignal, SignalGet};
use floem::views::Decorators;
use floem::{
    context::{ComputeLayoutCx, EventCx, PaintCx, UpdateCx},
    event::{Event, EventPropagation},
    View, ViewId,
};
use floem_renderer::Renderer;

use crate::constants;
use crate::math;

/// Round `hue` to a whole degree and report it only when it differs from
/// `last`. Both the coarse and the fine-grained pointer paths funnel
/// through this, so repeated events for the same degree collapse to one
/// notification.
fn degree_change(last: Option<i32>, hue: f64) -> Option<i32> {
    let deg = hue.round() as i32;
    (last != Some(deg)).then_some(deg)
}

/// Rasterize the hue rainbow: red through the spectrum back to red.
fn rasterize_hue_track(width: u32, height: u32) -> Vec<u8> {
    let mut buf = vec![0u8; (width * height * 4) as usize];
    for px in 0..width {
        let t = px as f64 / (width - 1).max(1) as f64;
        let (r, g, b) = math::hsl_to_rgb(t, 1.0, 0.5);
        let cr = (r * 255.0 + 0.5) as u8;
        let cg = (g * 255.0 + 0.5) as u8;
        let cb = (b * 255.0 + 0.5) as u8;
        for py in 0..height {
            let offset = ((py * width + px) * 4) as usize;
            buf[offset] = cr;
            buf[offset + 1] = cg;
            buf[offset + 2] = cb;
            buf[offset + 3] = 255;
        }
    }
    buf
}

pub(crate) struct HueSlider {
    id: ViewId,
    held: bool,
    hue: f64,
    /// Last hue degree handed to `on_change`; pointer events that resolve
    /// to the same degree are dropped rather than re-notified.
    last_sent: Option<i32>,
    size: floem::taffy::prelude::Size<f32>,
    on_change: Option<Box<dyn Fn(f64)>>,
    /// Cached rainbow image.
    track_img: Option<peniko::Image>,
    track_hash: Vec<u8>,
    cached_dims: (u32, u32),
}

/// Creates the horizontal hue slider.
///
/// `hue` is in degrees; `on_change` fires once per actual value change,
/// no matter how many pointer events resolve to the same degree.
pub(crate) fn hue_slider(hue: RwSignal<f64>, on_change: impl Fn(f64) + 'static) -> HueSlider {
    let id = ViewId::new();

    create_effect(move |_| {
        let h = hue.get();
        id.update_state(h);
    });

    HueSlider {
        id,
        held: false,
        hue: hue.get_untracked(),
        last_sent: None,
        size: Default::default(),
        on_change: Some(Box::new(on_change)),
        track_img: None,
        track_hash: Vec::new(),
        cached_dims: (0, 0),
    }
    .style(|s| {
        s.height(constants::SLIDER_HEIGHT)
            .border_radius(constants::THUMB_RADIUS as f32)
            .cursor(floem::style::CursorStyle::Pointer)
    })
}

impl HueSlider {
    fn update_from_pointer(&mut self, x: f64) {
        let w = self.size.width as f64;
        let r = constants::THUMB_RADIUS;
        let usable = w - 2.0 * r;
        if usable > 0.0 {
            self.hue = ((x - r) / usable).clamp(0.0, 1.0) * 360.0;
        }
    }

    /// Notify only when the rounded degree actually changed.
    fn notify(&mut self) {
        let Some(deg) = degree_change(self.last_sent, self.hue) else {
            return;
        };
        self.last_sent = Some(deg);
        if let Some(cb) = &self.on_change {
            cb(self.hue);
        }
    }

    fn ensure_track_image(&mut self, scale: f64) {
        let s = scale.max(1.0);
        let pw = (self.size.width as f64 * s).round() as u32;
        let ph = (self.size.height as f64 * s).round() as u32;
        if pw == 0 || ph == 0 || self.cached_dims == (pw, ph) {
            return;
        }

        let pixels = rasterize_hue_track(pw, ph);
        let blob = Blob::new(Arc::new(pixels));
        let img = peniko::Image::new(blob.clone(), peniko::Format::Rgba8, pw, ph);

        self.track_hash = blob.id().to_le_bytes().to_vec();
        self.track_img = Some(img);
        self.cached_dims = (pw, ph);
    }
}

impl View for HueSlider {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(hue) = state.downcast::<f64>() {
            self.hue = *hue;
            self.last_sent = Some(self.hue.round() as i32);
            self.id.request_layout();
        }
    }

    fn event_before_children(&mut self, cx: &mut EventCx, event: &Event) -> EventPropagation {
        match event {
            Event::PointerDown(e) => {
                cx.update_active(self.id());
                self.held = true;
                self.update_from_pointer(e.pos.x);
                self.notify();
                self.id.request_layout();
                EventPropagation::Stop
            }
            Event::PointerMove(e) => {
                if self.held {
                    self.update_from_pointer(e.pos.x);
                    self.notify();
                    self.id.request_layout();
                    EventPropagation::Stop
                } else {
                    EventPropagation::Continue
                }
            }
            Event::PointerUp(_) => {
                self.held = false;
                EventPropagation::Continue
            }
            Event::FocusLost => {
                self.held = false;
                EventPropagation::Continue
            }
            _ => EventPropagation::Continue,
        }
    }

    fn compute_layout(&mut self, _cx: &mut ComputeLayoutCx) -> Option<Rect> {
        let layout = self.id.get_layout().unwrap_or_default();
        self.size = layout.size;
        None
    }

    fn paint(&mut self, cx: &mut PaintCx) {
        let w = self.size.width as f64;
        let h = self.size.height as f64;
        if w == 0.0 || h == 0.0 {
            return;
        }
        let rect = Rect::new(0.0, 0.0, w, h);
        let rrect = rect.to_rounded_rect(constants::THUMB_RADIUS);

        cx.save();
        cx.clip(&rrect);

        let scale = cx.scale();
        self.ensure_track_image(scale);
        if let Some(ref img) = self.track_img {
            cx.draw_img(
                floem_renderer::Img {
                    img: img.clone(),
                    hash: &self.track_hash,
                },
                rect,
            );
        }

        cx.restore();

        cx.stroke(
            &rrect,
            Color::rgba8(0, 0, 0, 40),
            &floem::kurbo::Stroke::new(1.0),
        );

        // Thumb rings
        let radius = constants::THUMB_RADIUS;
        let thumb_x = radius + (self.hue / 360.0).clamp(0.0, 1.0) * (w - 2.0 * radius);
        let thumb_cy = h / 2.0;
        let circle = floem::kurbo::Circle::new((thumb_x, thumb_cy), radius);
        cx.stroke(
            &circle,
            Color::rgba8(0, 0, 0, 80),
            &floem::kurbo::Stroke::new(1.0),
        );
        let inner = floem::kurbo::Circle::new((thumb_x, thumb_cy), radius - 1.5);
        cx.stroke(&inner, Color::WHITE, &floem::kurbo::Stroke::new(2.0));
        let innermost = floem::kurbo::Circle::new((thumb_x, thumb_cy), radius - 3.0);
        cx.stroke(
            &innermost,
            Color::rgba8(0, 0, 0, 80),
            &floem::kurbo::Stroke::new(1.0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{degree_change, rasterize_hue_track};

    #[test]
    fn repeated_events_for_the_same_degree_collapse() {
        // A press and a move landing on the same degree notify once.
        let first = degree_change(None, 119.6);
        assert_eq!(first, Some(120));
        assert_eq!(degree_change(first, 120.4), None);
        assert_eq!(degree_change(first, 120.6), Some(121));
    }

    #[test]
    fn track_hits_the_six_even_stops() {
        // 361 columns put each 60-degree stop exactly on a pixel.
        let buf = rasterize_hue_track(361, 1);
        let px = |i: usize| (buf[i * 4], buf[i * 4 + 1], buf[i * 4 + 2]);
        assert_eq!(px(0), (255, 0, 0));
        assert_eq!(px(60), (255, 255, 0));
        assert_eq!(px(120), (0, 255, 0));
        assert_eq!(px(180), (0, 255, 255));
        assert_eq!(px(240), (0, 0, 255));
        assert_eq!(px(300), (255, 0, 255));
        assert_eq!(px(360), (255, 0, 0));
    }
}
