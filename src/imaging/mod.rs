//! Image processing — pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Downscale → JPEG** | Catmull-Rom resampling + `JpegEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for bounding-box math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{calculate_bounded_dimensions, calculate_scale_ratio};
pub use operations::{DownscaleConfig, Downscaled, downscale_jpeg};
pub use params::{Quality, ResizeParams};
pub use rust_backend::{JPEG_EXTENSIONS, RustBackend};
