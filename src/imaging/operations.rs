//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::calculate_bounded_dimensions;
use super::params::{Quality, ResizeParams};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Configuration for bounded-box downscaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownscaleConfig {
    /// Edge of the square bounding box, in pixels.
    pub max_size: u32,
    pub quality: Quality,
    /// Enlarge images that already fit inside the box.
    pub upscale: bool,
}

impl Default for DownscaleConfig {
    fn default() -> Self {
        Self {
            max_size: 1000,
            quality: Quality::default(),
            upscale: false,
        }
    }
}

/// Geometry of a completed downscale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Downscaled {
    pub original: Dimensions,
    pub resized: Dimensions,
}

/// Plan a downscale without executing it.
pub fn plan_downscale(
    source: &Path,
    output: &Path,
    original: Dimensions,
    config: &DownscaleConfig,
) -> ResizeParams {
    let (width, height) = calculate_bounded_dimensions(
        (original.width, original.height),
        config.max_size,
        config.upscale,
    );

    ResizeParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width,
        height,
        quality: config.quality,
    }
}

/// Shrink a JPEG into the configured bounding box and write it to `output`.
pub fn downscale_jpeg(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    config: &DownscaleConfig,
) -> Result<Downscaled> {
    let original = backend.identify(source)?;
    let params = plan_downscale(source, output, original, config);
    backend.resize(&params)?;

    Ok(Downscaled {
        original,
        resized: Dimensions {
            width: params.width,
            height: params.height,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::RustBackend;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::create_test_jpeg;

    #[test]
    fn plan_downscale_landscape() {
        let params = plan_downscale(
            Path::new("/pic.jpg"),
            Path::new("/out/pic.jpg"),
            (4000, 2000).into(),
            &DownscaleConfig::default(),
        );

        assert_eq!((params.width, params.height), (1000, 500));
        assert_eq!(params.quality, Quality::default());
    }

    #[test]
    fn plan_downscale_respects_custom_box() {
        let config = DownscaleConfig {
            max_size: 500,
            ..DownscaleConfig::default()
        };
        let params = plan_downscale(
            Path::new("/pic.jpg"),
            Path::new("/out/pic.jpg"),
            (1000, 2000).into(),
            &config,
        );

        assert_eq!((params.width, params.height), (250, 500));
    }

    #[test]
    fn downscale_identifies_then_resizes() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 800,
            height: 2400,
        }]);

        let result = downscale_jpeg(
            &backend,
            Path::new("/content/upright.JPG"),
            Path::new("/published/upright.JPG"),
            &DownscaleConfig::default(),
        )
        .unwrap();

        assert_eq!(result.resized, Dimensions::from((333, 1000)));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0], RecordedOp::Identify("/content/upright.JPG".into()));
        assert!(matches!(
            &ops[1],
            RecordedOp::Resize { output, width: 333, height: 1000, quality: 75, .. }
                if output == "/published/upright.JPG"
        ));
    }

    #[test]
    fn downscale_stops_when_identify_fails() {
        let backend = MockBackend::new();

        let result = downscale_jpeg(
            &backend,
            Path::new("/broken.jpg"),
            Path::new("/out.jpg"),
            &DownscaleConfig::default(),
        );

        assert!(result.is_err());
        assert_eq!(backend.get_operations().len(), 1);
    }

    #[test]
    fn downscale_real_jpeg_end_to_end() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("wide.jpg");
        let output = tmp.path().join("wide-small.jpg");
        create_test_jpeg(&source, 2400, 1200);

        let backend = RustBackend::new();
        let result =
            downscale_jpeg(&backend, &source, &output, &DownscaleConfig::default()).unwrap();

        assert_eq!(result.original, Dimensions::from((2400, 1200)));
        assert_eq!(backend.identify(&output).unwrap(), Dimensions::from((1000, 500)));
    }
}
