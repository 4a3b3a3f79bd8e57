//! Rectangular saturation/lightness picking area.
//!
//! For a fixed hue, the horizontal axis maps to saturation and the
//! vertical axis maps to lightness, with full lightness at the top. The
//! area background is rasterized to an RGBA8 pixel buffer and the raster
//! is scaled to widget size rather than redrawn per frame.

use std::sync::Arc;

use floem::kurbo::{Circle, Point, Rect};
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

/// Map a pointer position inside a `width` × `height` box to
/// `(saturation, lightness)` percentages.
///
/// Both axes are normalized and clamped to 0–1 first; the left edge is
/// zero saturation, the top edge is full lightness. Returns `None` for a
/// degenerate box.
pub(crate) fn area_to_sat_light(x: f64, y: f64, width: f64, height: f64) -> Option<(f64, f64)> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let nx = (x / width).clamp(0.0, 1.0);
    let ny = (y / height).clamp(0.0, 1.0);
    Some((nx * 100.0, 100.0 - ny * 100.0))
}

/// Rasterize the saturation/lightness plane for `hue` (degrees) to RGBA8.
fn rasterize_area(width: u32, height: u32, hue: f64) -> Vec<u8> {
    let h = hue / 360.0;
    let mut buf = vec![0u8; (width * height * 4) as usize];
    for py in 0..height {
        let l = 1.0 - py as f64 / (height - 1).max(1) as f64;
        let row_offset = (py * width * 4) as usize;
        for px in 0..width {
            let s = px as f64 / (width - 1).max(1) as f64;
            let (r, g, b) = math::hsl_to_rgb(h, s, l);
            let offset = row_offset + (px * 4) as usize;
            buf[offset] = (r * 255.0 + 0.5) as u8;
            buf[offset + 1] = (g * 255.0 + 0.5) as u8;
            buf[offset + 2] = (b * 255.0 + 0.5) as u8;
            buf[offset + 3] = 255;
        }
    }
    buf
}

enum AreaUpdate {
    Hue(f64),
    SatLight(f64, f64),
}

pub(crate) struct ColorArea {
    id: ViewId,
    held: bool,
    hue: f64,
    saturation: f64,
    lightness: f64,
    size: floem::taffy::prelude::Size<f32>,
    on_change: Option<Box<dyn Fn(f64, f64)>>,
    /// Cached area image, keyed by the rounded hue degree.
    area_img: Option<peniko::Image>,
    area_hash: Vec<u8>,
    cached_hue: Option<i32>,
}

/// Creates the saturation/lightness area.
///
/// - `hue`: degrees, read-only; the raster is regenerated when it changes.
/// - `saturation`, `lightness`: percentages, drive the cursor position.
///
/// Pointer picks (single click or drag while the button is held) call
/// `on_change(saturation, lightness)` with the same mapping for both.
pub(crate) fn color_area(
    hue: RwSignal<f64>,
    saturation: RwSignal<f64>,
    lightness: RwSignal<f64>,
    on_change: impl Fn(f64, f64) + 'static,
) -> ColorArea {
    let id = ViewId::new();

    create_effect(move |_| {
        let h = hue.get();
        id.update_state(AreaUpdate::Hue(h));
    });

    create_effect(move |_| {
        let s = saturation.get();
        let l = lightness.get();
        id.update_state(AreaUpdate::SatLight(s, l));
    });

    ColorArea {
        id,
        held: false,
        hue: hue.get_untracked(),
        saturation: saturation.get_untracked(),
        lightness: lightness.get_untracked(),
        size: Default::default(),
        on_change: Some(Box::new(on_change)),
        area_img: None,
        area_hash: Vec::new(),
        cached_hue: None,
    }
    .style(|s| {
        s.flex_grow(1.0)
            .min_height(140.0)
            .cursor(floem::style::CursorStyle::Default)
    })
}

impl ColorArea {
    fn update_from_pointer(&mut self, pos: Point) -> bool {
        let w = self.size.width as f64;
        let h = self.size.height as f64;
        match area_to_sat_light(pos.x, pos.y, w, h) {
            Some((s, l)) => {
                self.saturation = s;
                self.lightness = l;
                true
            }
            None => false,
        }
    }

    fn cursor_position(&self) -> Point {
        let w = self.size.width as f64;
        let h = self.size.height as f64;
        Point::new(
            self.saturation / 100.0 * w,
            (1.0 - self.lightness / 100.0) * h,
        )
    }

    fn ensure_area_image(&mut self) {
        let key = self.hue.round() as i32;
        if self.cached_hue == Some(key) && self.area_img.is_some() {
            return;
        }

        let size = constants::AREA_RASTER_SIZE;
        let pixels = rasterize_area(size, size, key as f64);
        let blob = Blob::new(Arc::new(pixels));
        let img = peniko::Image::new(blob.clone(), peniko::Format::Rgba8, size, size);

        self.area_hash = blob.id().to_le_bytes().to_vec();
        self.area_img = Some(img);
        self.cached_hue = Some(key);
    }
}

impl View for ColorArea {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(update) = state.downcast::<AreaUpdate>() {
            match *update {
                AreaUpdate::Hue(h) => self.hue = h,
                AreaUpdate::SatLight(s, l) => {
                    self.saturation = s;
                    self.lightness = l;
                }
            }
            self.id.request_layout();
        }
    }

    fn event_before_children(&mut self, cx: &mut EventCx, event: &Event) -> EventPropagation {
        match event {
            Event::PointerDown(e) => {
                cx.update_active(self.id());
                self.held = true;
                if self.update_from_pointer(e.pos) {
                    if let Some(cb) = &self.on_change {
                        cb(self.saturation, self.lightness);
                    }
                }
                self.id.request_layout();
                EventPropagation::Stop
            }
            Event::PointerMove(e) => {
                if self.held {
                    if self.update_from_pointer(e.pos) {
                        if let Some(cb) = &self.on_change {
                            cb(self.saturation, self.lightness);
                        }
                    }
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
        self.ensure_area_image();
        if let Some(ref img) = self.area_img {
            cx.draw_img(
                floem_renderer::Img {
                    img: img.clone(),
                    hash: &self.area_hash,
                },
                rect,
            );
        }

        cx.stroke(
            &rect,
            Color::rgba8(0, 0, 0, 40),
            &floem::kurbo::Stroke::new(1.0),
        );

        // Cursor rings
        let cur_pt = self.cursor_position();
        let outer = Circle::new(cur_pt, constants::CURSOR_RADIUS + 1.0);
        cx.stroke(
            &outer,
            Color::rgba8(0, 0, 0, 80),
            &floem::kurbo::Stroke::new(1.0),
        );
        let cursor = Circle::new(cur_pt, constants::CURSOR_RADIUS);
        cx.stroke(&cursor, Color::WHITE, &floem::kurbo::Stroke::new(2.0));
        let inner = Circle::new(cur_pt, constants::CURSOR_RADIUS - 1.5);
        cx.stroke(
            &inner,
            Color::rgba8(0, 0, 0, 80),
            &floem::kurbo::Stroke::new(1.0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::area_to_sat_light;

    #[test]
    fn corners_and_center() {
        assert_eq!(area_to_sat_light(0.0, 0.0, 200.0, 100.0), Some((0.0, 100.0)));
        assert_eq!(
            area_to_sat_light(200.0, 100.0, 200.0, 100.0),
            Some((100.0, 0.0))
        );
        assert_eq!(
            area_to_sat_light(100.0, 50.0, 200.0, 100.0),
            Some((50.0, 50.0))
        );
    }

    #[test]
    fn positions_outside_the_box_are_clamped() {
        assert_eq!(
            area_to_sat_light(-30.0, 500.0, 200.0, 100.0),
            Some((0.0, 0.0))
        );
        assert_eq!(
            area_to_sat_light(999.0, -1.0, 200.0, 100.0),
            Some((100.0, 100.0))
        );
    }

    #[test]
    fn degenerate_box_maps_nothing() {
        assert_eq!(area_to_sat_light(10.0, 10.0, 0.0, 100.0), None);
        assert_eq!(area_to_sat_light(10.0, 10.0, 100.0, -5.0), None);
    }
}
