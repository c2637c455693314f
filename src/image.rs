use crate::refs::{ObjectReferences, RefType};
use ::image::RgbImage;
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};

/// A finished, read-only page raster. Rasters are produced by
/// [PageCanvas::finish](crate::PageCanvas::finish) and owned by the [Document](crate::Document)
/// they are added to.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pixels: RgbImage,
    dpi: u32,
}

impl Raster {
    pub(crate) fn new(pixels: RgbImage, dpi: u32) -> Raster {
        Raster { pixels, dpi }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Write the raster as a Flate-compressed DeviceRGB image XObject
    pub(crate) fn write(&self, refs: &mut ObjectReferences, raster_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(raster_index));

        let level = CompressionLevel::DefaultLevel as u8;
        let bytes = compress_to_vec_zlib(self.pixels.as_raw(), level);

        let mut image = writer.image_xobject(id, bytes.as_slice());
        image.filter(Filter::FlateDecode);
        image.width(self.width() as i32);
        image.height(self.height() as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        image.finish();
    }
}
