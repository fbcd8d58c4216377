//! Canvas sizing and pointer mapping

use glam::Vec2;

/// Playfield aspect ratio (width / height)
pub const ASPECT_RATIO: f32 = 4.0 / 3.0;
/// Share of the window width the canvas tries to fill
const WIDTH_FILL: f32 = 0.95;
/// Share of the window height the canvas may not exceed
const HEIGHT_FILL: f32 = 0.9;

/// Largest 4:3 canvas that fits the window
///
/// Width-limited at 95% of the window width unless that would exceed 90% of
/// the window height, in which case it becomes height-limited.
pub fn fit_canvas(window_width: f32, window_height: f32) -> (f32, f32) {
    let mut width = window_width * WIDTH_FILL;
    let mut height = width / ASPECT_RATIO;

    if height > window_height * HEIGHT_FILL {
        height = window_height * HEIGHT_FILL;
        width = height * ASPECT_RATIO;
    }

    (width, height)
}

/// Map a client-space pointer position into canvas pixels
///
/// `rect_origin`/`rect_size` are the canvas's bounding client rect, which can
/// differ from its pixel size when CSS scales it.
pub fn client_to_canvas(client: Vec2, rect_origin: Vec2, rect_size: Vec2, canvas_size: Vec2) -> Vec2 {
    let scale = Vec2::new(
        if rect_size.x > 0.0 { canvas_size.x / rect_size.x } else { 1.0 },
        if rect_size.y > 0.0 { canvas_size.y / rect_size.y } else { 1.0 },
    );
    (client - rect_origin) * scale
}
