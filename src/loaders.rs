//=========================================================================
// Image Loaders
//=========================================================================
//
// Pure decode functions turning encoded image bytes into pixel buffers
// for `Renderer::load_texture`.
//
//   bytes → decode_{png,tga,dds}() / decode() → ImageData (RGBA8)
//
// No state, no side effects beyond reporting decode failures. Decoding
// itself is delegated to the `image` crate.
//
//=========================================================================

//=== External Dependencies ===============================================

use image::{DynamicImage, ImageFormat};
use log::debug;

//=== Internal Dependencies ===============================================

use crate::error::ImageError;

//=== Types ===============================================================

/// Container format the pixels were decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Png,
    Tga,
    Dds,
}

impl SourceFormat {
    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Tga => ImageFormat::Tga,
            Self::Dds => ImageFormat::Dds,
        }
    }
}

/// Layout of [`ImageData::pixels`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8 bits per channel, RGBA order, rows top to bottom.
    Rgba8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8 => 4,
        }
    }
}

/// Decoded pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub source: SourceFormat,
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// Length in bytes of one row of pixels.
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }
}

//=== Decoders ============================================================

pub fn decode_png(bytes: &[u8]) -> Result<ImageData, ImageError> {
    decode_as(bytes, SourceFormat::Png)
}

pub fn decode_tga(bytes: &[u8]) -> Result<ImageData, ImageError> {
    decode_as(bytes, SourceFormat::Tga)
}

pub fn decode_dds(bytes: &[u8]) -> Result<ImageData, ImageError> {
    decode_as(bytes, SourceFormat::Dds)
}

/// Decodes bytes whose format is sniffed from their header.
///
/// TGA has no magic number and cannot be sniffed; use [`decode_tga`].
pub fn decode(bytes: &[u8]) -> Result<ImageData, ImageError> {
    let source = match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => SourceFormat::Png,
        Ok(ImageFormat::Dds) => SourceFormat::Dds,
        _ => return Err(ImageError::UnknownFormat),
    };
    decode_as(bytes, source)
}

fn decode_as(bytes: &[u8], source: SourceFormat) -> Result<ImageData, ImageError> {
    let image = image::load_from_memory_with_format(bytes, source.image_format())?;
    Ok(into_image_data(image, source))
}

fn into_image_data(image: DynamicImage, source: SourceFormat) -> ImageData {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!(target: "loaders", "Decoded {:?} image {}x{}", source, width, height);

    ImageData {
        width,
        height,
        format: PixelFormat::Rgba8,
        source,
        pixels: rgba.into_raw(),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
