// Pointer mapping from client coordinates into the fixed scene space.
// The canvas keeps its logical 1200x600 resolution while CSS scales it.

use web_sys::{HtmlCanvasElement, MouseEvent};

use crate::config::{SCENE_H, SCENE_W};

pub fn scene_pos(canvas: &HtmlCanvasElement, e: &MouseEvent) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    let sx = if rect.width() > 0.0 { SCENE_W / rect.width() } else { 1.0 };
    let sy = if rect.height() > 0.0 { SCENE_H / rect.height() } else { 1.0 };
    (
        (e.client_x() as f64 - rect.left()) * sx,
        (e.client_y() as f64 - rect.top()) * sy,
    )
}
