//! The mutable raster a single page is painted onto.
//!
//! A [PageCanvas] exclusively owns its pixel buffer while the page is being
//! composed. Calling [PageCanvas::finish] consumes the canvas and hands back an
//! immutable [Raster] that can be added to a [Document](crate::Document).

use crate::colour::{colours, Colour};
use crate::font::Font;
use crate::image::Raster;
use crate::rect::Rect;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgb, RgbImage, RgbaImage};
use rusttype::point;

/// Extra pixels between consecutive lines of a caption, on top of the font's line height
pub const LINE_SPACING: f32 = 4.0;

pub struct PageCanvas {
    pixels: RgbImage,
    dpi: u32,
}

impl PageCanvas {
    /// Create a blank (white) canvas
    pub fn new(width: u32, height: u32, dpi: u32) -> PageCanvas {
        PageCanvas {
            pixels: RgbImage::from_pixel(width, height, colours::WHITE.to_rgb8()),
            dpi,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Read back a single pixel. Panics if the coordinates are outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.pixels.get_pixel(x, y)
    }

    /// Resize a code image to `size` x `size` and paste it with its top-left corner at (x, y).
    /// The source image is left untouched; anything outside the canvas is clipped.
    pub fn paste_code(&mut self, code: &GrayImage, size: u32, x: u32, y: u32, filter: FilterType) {
        let resized = imageops::resize(code, size, size, filter);
        let resized = DynamicImage::ImageLuma8(resized).to_rgb8();
        imageops::replace(&mut self.pixels, &resized, x as i64, y as i64);
    }

    /// Paint `overlay` at (x, y), using its alpha channel as the mask. Fully transparent
    /// pixels leave the canvas untouched.
    pub fn composite(&mut self, overlay: &RgbaImage, x: u32, y: u32) {
        let (width, height) = self.pixels.dimensions();
        for (dx, dy, px) in overlay.enumerate_pixels() {
            let (tx, ty) = (x + dx, y + dy);
            if tx >= width || ty >= height {
                continue;
            }
            let [r, g, b, a] = px.0;
            if a == 0 {
                continue;
            }
            let target = self.pixels.get_pixel_mut(tx, ty);
            *target = blend(*target, Rgb([r, g, b]), a as f32 / 255.0);
        }
    }

    /// Fill a rectangle, clipped to the canvas
    pub fn fill_rect(&mut self, rect: Rect, colour: Colour) {
        let ink = colour.to_rgb8();
        let x2 = rect.x2.min(self.width());
        let y2 = rect.y2.min(self.height());
        for y in rect.y1..y2 {
            for x in rect.x1..x2 {
                self.pixels.put_pixel(x, y, ink);
            }
        }
    }

    /// Outline a rectangle with lines `width` pixels thick, centred on each edge
    pub fn stroke_rect(&mut self, rect: Rect, width: u32, colour: Colour) {
        if width == 0 {
            return;
        }
        let inner = width / 2;
        let outer = width - inner;
        let left = rect.x1.saturating_sub(inner);
        let right = rect.x2 + outer;
        let top = rect.y1.saturating_sub(inner);
        let bottom = rect.y2 + outer;

        let edges = [
            Rect { x1: left, y1: top, x2: right, y2: rect.y1 + outer },
            Rect { x1: left, y1: rect.y2.saturating_sub(inner), x2: right, y2: bottom },
            Rect { x1: left, y1: top, x2: rect.x1 + outer, y2: bottom },
            Rect { x1: rect.x2.saturating_sub(inner), y1: top, x2: right, y2: bottom },
        ];
        for edge in edges {
            self.fill_rect(edge, colour);
        }
    }

    /// Rasterise a block of text with its top-left corner at `origin`. Lines are split on
    /// `\n` and are never wrapped here; anything outside the canvas is clipped.
    pub fn draw_text(&mut self, font: &Font, size: f32, origin: (u32, u32), text: &str, colour: Colour) {
        let ink = colour.to_rgb8();
        let (width, height) = self.pixels.dimensions();
        let ascent = font.ascent(size);
        let line_height = font.line_height(size) + LINE_SPACING;

        for (i, line) in text.split('\n').enumerate() {
            let baseline = origin.1 as f32 + ascent + i as f32 * line_height;
            let glyphs = font
                .face()
                .layout(line, Font::scale(size), point(origin.0 as f32, baseline));
            for glyph in glyphs {
                let Some(bb) = glyph.pixel_bounding_box() else {
                    continue;
                };
                let pixels = &mut self.pixels;
                glyph.draw(|gx, gy, coverage| {
                    let x = bb.min.x + gx as i32;
                    let y = bb.min.y + gy as i32;
                    if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
                        return;
                    }
                    let target = pixels.get_pixel_mut(x as u32, y as u32);
                    *target = blend(*target, ink, coverage);
                });
            }
        }
    }

    /// Stop painting and freeze the page
    pub fn finish(self) -> Raster {
        Raster::new(self.pixels, self.dpi)
    }
}

fn blend(under: Rgb<u8>, over: Rgb<u8>, alpha: f32) -> Rgb<u8> {
    let alpha = alpha.clamp(0.0, 1.0);
    let mut out = [0u8; 3];
    for (i, channel) in out.iter_mut().enumerate() {
        let v = under.0[i] as f32 * (1.0 - alpha) + over.0[i] as f32 * alpha;
        *channel = v.round() as u8;
    }
    Rgb(out)
}
