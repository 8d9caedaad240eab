//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_dimensions` (header only) |
//! | Decode | `image::ImageReader::decode` forced to JPEG |
//! | Resize | `image::DynamicImage::resize_exact` with `CatmullRom` (bicubic) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::ResizeParams;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Lowercased extensions routed to the resizer.
pub const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Open a file as a JPEG regardless of what its extension claims.
fn open_jpeg(path: &Path) -> Result<ImageReader<BufReader<File>>, BackendError> {
    let mut reader = ImageReader::open(path)?;
    reader.set_format(ImageFormat::Jpeg);
    Ok(reader)
}

/// Map decoder errors, keeping genuine I/O failures distinct from bad data.
fn decode_error(path: &Path, err: ImageError) -> BackendError {
    match err {
        ImageError::IoError(io) => BackendError::Io(io),
        other => BackendError::Decode(format!("{}: {}", path.display(), other)),
    }
}

fn load_jpeg(path: &Path) -> Result<DynamicImage, BackendError> {
    open_jpeg(path)?
        .decode()
        .map_err(|e| decode_error(path, e))
}

/// Encode and save as baseline JPEG.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    // Quality is clamped to 1..=100 by `Quality::new`, so the cast is lossless.
    let encoder = JpegEncoder::new_with_quality(writer, quality.min(100) as u8);
    img.write_with_encoder(encoder).map_err(|e| match e {
        ImageError::IoError(io) => BackendError::Io(io),
        other => BackendError::Encode(format!("{}: {}", path.display(), other)),
    })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = open_jpeg(path)?
            .into_dimensions()
            .map_err(|e| decode_error(path, e))?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_jpeg(&params.source)?;
        let resized = if img.width() == params.width && img.height() == params.height {
            img
        } else {
            img.resize_exact(params.width, params.height, FilterType::CatmullRom)
        };
        save_jpeg(&resized, &params.output, params.quality.value())
    }
}
