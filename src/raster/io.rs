//! Decode/encode boundary built on the `image` crate.
//!
//! All `image`-crate usage is confined to this module; the rest of the
//! engine works on `Raster` buffers.

use crate::raster::Raster;
use crate::util::{MockwarpError, MockwarpResult};
use std::io::Cursor;
use std::path::Path;

/// Encoded output formats supported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Lossless PNG, the default.
    #[default]
    Png,
    /// JPEG at the encoder's default quality; alpha is dropped.
    Jpeg,
}

/// Creates a raster from a decoded dynamic image.
pub fn raster_from_dynamic(img: &image::DynamicImage) -> MockwarpResult<Raster> {
    let rgba = img.to_rgba8();
    let width = rgba.width() as usize;
    let height = rgba.height() as usize;
    Raster::new(rgba.into_raw(), width, height)
}

/// Decodes an encoded image byte stream (PNG/JPEG) into a raster.
pub fn decode_raster(bytes: &[u8]) -> MockwarpResult<Raster> {
    let img = image::load_from_memory(bytes).map_err(|err| MockwarpError::ImageIo {
        reason: err.to_string(),
    })?;
    raster_from_dynamic(&img)
}

/// Loads an image from disk into a raster.
pub fn load_raster<P: AsRef<Path>>(path: P) -> MockwarpResult<Raster> {
    let img = image::open(path).map_err(|err| MockwarpError::ImageIo {
        reason: err.to_string(),
    })?;
    raster_from_dynamic(&img)
}

/// Encodes a raster in the requested output format.
pub fn encode_raster(raster: &Raster, format: OutputFormat) -> MockwarpResult<Vec<u8>> {
    let width = raster.width() as u32;
    let height = raster.height() as u32;
    let rgba = image::RgbaImage::from_raw(width, height, raster.data().to_vec()).ok_or(
        MockwarpError::EncodeFailed {
            reason: "raster buffer does not match its dimensions".to_string(),
        },
    )?;

    let mut out = Cursor::new(Vec::new());
    let result = match format {
        OutputFormat::Png => rgba.write_to(&mut out, image::ImageFormat::Png),
        OutputFormat::Jpeg => image::DynamicImage::ImageRgba8(rgba)
            .to_rgb8()
            .write_to(&mut out, image::ImageFormat::Jpeg),
    };
    result.map_err(|err| MockwarpError::EncodeFailed {
        reason: err.to_string(),
    })?;
    Ok(out.into_inner())
}
