//! PNG Writer
//!
//! The raster layer rendered into an RGBA pixel buffer and encoded as PNG.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use blobcluster_sim::{RasterSink, Rgb, draw_raster};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use tracing::debug;

use crate::io::{IoError, IoResult, Writer};
use crate::session::Session;

/// Output file name inside the target directory
pub const PNG_FILE: &str = "blobcluster.png";

/// Pixel buffer implementing the raster layer
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    image: RgbaImage,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Encode the buffer as PNG
    pub fn save(&self, path: &Path) -> IoResult<()> {
        let output = BufWriter::new(File::create(path)?);
        let encoder = PngEncoder::new(output);
        encoder
            .write_image(
                self.image.as_raw(),
                self.image.width(),
                self.image.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| IoError::Write(e.to_string()))
    }
}

impl RasterSink for PixelCanvas {
    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    /// Paint every pixel whose centre lies inside the circle
    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, fill: Rgb) {
        if r <= 0.0 || !cx.is_finite() || !cy.is_finite() {
            return;
        }
        let (w, h) = (self.image.width() as f64, self.image.height() as f64);
        let x0 = (cx - r).floor().max(0.0);
        let x1 = (cx + r).ceil().min(w);
        let y0 = (cy - r).floor().max(0.0);
        let y1 = (cy + r).ceil().min(h);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let color = Rgba([fill.r, fill.g, fill.b, 255]);
        let r2 = r * r;
        for y in y0 as u32..y1 as u32 {
            let dy = y as f64 + 0.5 - cy;
            for x in x0 as u32..x1 as u32 {
                let dx = x as f64 + 0.5 - cx;
                if dx * dx + dy * dy <= r2 {
                    self.image.put_pixel(x, y, color);
                }
            }
        }
    }
}

/// Writer for the PNG snapshot
pub struct PngWriter;

impl PngWriter {
    /// Create a new PNG writer
    pub fn new() -> Self {
        Self
    }
}

impl Default for PngWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for PngWriter {
    fn write(&self, session: &Session, output: &Path) -> IoResult<()> {
        fs::create_dir_all(output)?;

        let config = session.config();
        let mut canvas = PixelCanvas::new(config.width.ceil() as u32, config.height.ceil() as u32);
        draw_raster(&mut canvas, &session.shapes());

        let path = output.join(PNG_FILE);
        canvas.save(&path)?;
        debug!(path = %path.display(), "wrote png");
        Ok(())
    }

    fn format_id(&self) -> &str {
        "png"
    }
}
