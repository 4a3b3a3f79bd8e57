//! Sizing, color, and styling constants for the panel.

/// 1D slider track height
pub const SLIDER_HEIGHT: f32 = 16.0;

/// Cursor circle radius on the 2D area
pub const CURSOR_RADIUS: f64 = 8.0;

/// Thumb radius on 1D sliders
pub const THUMB_RADIUS: f64 = 7.0;

/// Gap between panel elements
pub const GAP: f32 = 8.0;

/// Padding around the whole panel
pub const PADDING: f32 = 8.0;

/// Input field width
pub const INPUT_WIDTH: f32 = 32.0;

/// Hex input field width
pub const HEX_INPUT_WIDTH: f32 = 64.0;

/// Input font size
pub const INPUT_FONT: f32 = 11.0;

/// Label font size
pub const LABEL_FONT: f32 = 10.0;

/// Swatch side length for palette and recent-color rows
pub const SWATCH_SIZE: f32 = 20.0;

/// Raster resolution of the saturation/lightness area image
pub const AREA_RASTER_SIZE: u32 = 256;

/// Most-recently-used colors kept per slot
pub const MAX_RECENT: usize = 12;

/// Quick palette shown under the gradient area.
pub static QUICK_PALETTE: [&str; 12] = [
    "#7ba5b8", "#10b981", "#f97316", "#ef4444", "#8b5cf6", "#0891b2", "#06b6d4", "#84cc16",
    "#eab308", "#f59e0b", "#ec4899", "#6366f1",
];
