//! 2D Canvas rendering for the raster layer
//!
//! Clears and repaints every node as a filled circle on each drawn frame.

use std::f64::consts::TAU;

use blobcluster_sim::{RasterSink, Rgb};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// 2D Canvas renderer
pub struct Canvas2DRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2DRenderer {
    /// Create renderer from canvas element
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, String> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| format!("Failed to get 2d context: {:?}", e))?
            .ok_or("2d context not available")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Failed to cast to CanvasRenderingContext2d")?;

        Ok(Self { canvas, ctx })
    }

    /// Update canvas dimensions
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}

impl RasterSink for Canvas2DRenderer {
    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, fill: Rgb) {
        if r <= 0.0 {
            return;
        }
        self.ctx.begin_path();
        self.ctx.set_fill_style_str(&fill.to_string());
        self.ctx.move_to(cx, cy);
        if let Err(e) = self.ctx.arc(cx, cy, r, 0.0, TAU) {
            web_sys::console::warn_2(&JsValue::from_str("canvas arc failed:"), &e);
            return;
        }
        self.ctx.fill();
    }
}
