//! Click-to-pick overlay for the screen-capture sample tier.
//!
//! Shows one captured frame across the whole panel with a drawn
//! crosshair. A single click samples the 1×1 frame pixel under the
//! pointer, scaling the click coordinate by frame-size / overlay-size
//! independently per axis; Escape dismisses with no color.

use std::rc::Rc;
use std::sync::Arc;

use floem::kurbo::{Line, Point, Rect};
use floem::peniko::{self, Blob, Color};

use floem::reactive::{create_effect, RwSignal, SignalGet};
use floem::views::Decorators;
use floem::{
    context::{ComputeLayoutCx, EventCx, PaintCx, UpdateCx},
    event::{Event, EventPropagation},
    keyboard::{Key, NamedKey},
    View, ViewId,
};
use floem_renderer::Renderer;

use crate::color::Rgb;

/// One captured screen frame, tightly packed RGBA8.
pub struct CaptureFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl CaptureFrame {
    /// The pixel at frame coordinates, if in bounds.
    pub fn pixel_at(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let px = self.rgba.get(offset..offset + 3)?;
        Some(Rgb {
            r: px[0],
            g: px[1],
            b: px[2],
        })
    }
}

/// Map a click inside an `overlay_w` × `overlay_h` surface onto the frame
/// and sample that pixel. The scale ratio is frame/overlay per axis.
pub(crate) fn frame_pixel_at(
    frame: &CaptureFrame,
    click_x: f64,
    click_y: f64,
    overlay_w: f64,
    overlay_h: f64,
) -> Option<Rgb> {
    if overlay_w <= 0.0 || overlay_h <= 0.0 {
        return None;
    }
    let fx = (click_x * frame.width as f64 / overlay_w).floor();
    let fy = (click_y * frame.height as f64 / overlay_h).floor();
    let fx = (fx.max(0.0) as u32).min(frame.width.saturating_sub(1));
    let fy = (fy.max(0.0) as u32).min(frame.height.saturating_sub(1));
    frame.pixel_at(fx, fy)
}

pub(crate) struct CaptureOverlay {
    id: ViewId,
    frame: Option<Rc<CaptureFrame>>,
    pointer: Option<Point>,
    size: floem::taffy::prelude::Size<f32>,
    on_result: Box<dyn Fn(Option<Rgb>)>,
    frame_img: Option<peniko::Image>,
    frame_hash: Vec<u8>,
}

/// Creates the capture overlay. It is hidden until `frame` holds a
/// captured bitmap; while shown it swallows all pointer and key events,
/// resolving through `on_result` with the picked pixel or `None` on
/// Escape. The caller clears `frame` once the result is handled.
pub(crate) fn capture_overlay(
    frame: RwSignal<Option<Rc<CaptureFrame>>>,
    on_result: impl Fn(Option<Rgb>) + 'static,
) -> CaptureOverlay {
    let id = ViewId::new();

    create_effect(move |_| {
        let f = frame.get();
        id.update_state(f);
    });

    CaptureOverlay {
        id,
        frame: frame.get_untracked(),
        pointer: None,
        size: Default::default(),
        on_result: Box::new(on_result),
        frame_img: None,
        frame_hash: Vec::new(),
    }
    .style(move |s| {
        let active = frame.get().is_some();
        s.absolute()
            .inset_left(0.0)
            .inset_top(0.0)
            .size_full()
            .apply_if(!active, |s| s.hide())
    })
}

impl CaptureOverlay {
    fn ensure_frame_image(&mut self) {
        if self.frame_img.is_some() {
            return;
        }
        let Some(frame) = &self.frame else {
            return;
        };
        let blob = Blob::new(Arc::new(frame.rgba.clone()));
        let img = peniko::Image::new(blob.clone(), peniko::Format::Rgba8, frame.width, frame.height);
        self.frame_hash = blob.id().to_le_bytes().to_vec();
        self.frame_img = Some(img);
    }
}

impl View for CaptureOverlay {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(frame) = state.downcast::<Option<Rc<CaptureFrame>>>() {
            self.frame = *frame;
            self.frame_img = None;
            self.pointer = None;
            if self.frame.is_some() {
                // Escape must work without a prior click.
                self.id.request_focus();
            }
            self.id.request_layout();
        }
    }

    fn event_before_children(&mut self, cx: &mut EventCx, event: &Event) -> EventPropagation {
        if self.frame.is_none() {
            return EventPropagation::Continue;
        }
        match event {
            Event::PointerDown(e) => {
                cx.update_active(self.id());
                let picked = self.frame.as_ref().and_then(|frame| {
                    frame_pixel_at(
                        frame,
                        e.pos.x,
                        e.pos.y,
                        self.size.width as f64,
                        self.size.height as f64,
                    )
                });
                (self.on_result)(picked);
                EventPropagation::Stop
            }
            Event::PointerMove(e) => {
                self.pointer = Some(e.pos);
                self.id.request_paint();
                EventPropagation::Stop
            }
            Event::KeyDown(ke) => {
                if ke.key.logical_key == Key::Named(NamedKey::Escape) {
                    (self.on_result)(None);
                }
                EventPropagation::Stop
            }
            _ => EventPropagation::Stop,
        }
    }

    fn compute_layout(&mut self, _cx: &mut ComputeLayoutCx) -> Option<Rect> {
        let layout = self.id.get_layout().unwrap_or_default();
        self.size = layout.size;
        None
    }

    fn paint(&mut self, cx: &mut PaintCx) {
        if self.frame.is_none() {
            return;
        }
        let w = self.size.width as f64;
        let h = self.size.height as f64;
        if w == 0.0 || h == 0.0 {
            return;
        }

        let rect = Rect::new(0.0, 0.0, w, h);
        self.ensure_frame_image();
        if let Some(ref img) = self.frame_img {
            cx.draw_img(
                floem_renderer::Img {
                    img: img.clone(),
                    hash: &self.frame_hash,
                },
                rect,
            );
        }

        // Crosshair under the pointer
        if let Some(p) = self.pointer {
            let stroke = floem::kurbo::Stroke::new(1.0);
            cx.stroke(
                &Line::new(Point::new(0.0, p.y), Point::new(w, p.y)),
                Color::rgba8(0, 0, 0, 120),
                &stroke,
            );
            cx.stroke(
                &Line::new(Point::new(p.x, 0.0), Point::new(p.x, h)),
                Color::rgba8(0, 0, 0, 120),
                &stroke,
            );
            cx.stroke(
                &Line::new(Point::new(0.0, p.y - 1.0), Point::new(w, p.y - 1.0)),
                Color::rgba8(255, 255, 255, 160),
                &stroke,
            );
            cx.stroke(
                &Line::new(Point::new(p.x - 1.0, 0.0), Point::new(p.x - 1.0, h)),
                Color::rgba8(255, 255, 255, 160),
                &stroke,
            );
        }

        cx.stroke(
            &rect,
            Color::rgba8(0, 0, 0, 80),
            &floem::kurbo::Stroke::new(1.0),
        );
    }
}
