//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// The edge that decides the scale, and whether it is the height.
///
/// Height governs only when strictly greater than width.
fn governing_edge((width, height): (u32, u32)) -> (u32, bool) {
    if height > width {
        (height, true)
    } else {
        (width, false)
    }
}

/// Scale ratio that fits `source` inside a `max_size` square.
///
/// Portrait images (height strictly greater than width) are scaled by their
/// height, everything else by its width. Without `upscale` the ratio never
/// exceeds `1.0`.
///
/// # Examples
/// ```
/// # use klaus::imaging::calculate_scale_ratio;
/// assert_eq!(calculate_scale_ratio((4000, 2000), 1000, false), 0.25);
/// assert_eq!(calculate_scale_ratio((500, 250), 1000, false), 1.0);
/// assert_eq!(calculate_scale_ratio((500, 250), 1000, true), 2.0);
/// ```
pub fn calculate_scale_ratio(source: (u32, u32), max_size: u32, upscale: bool) -> f64 {
    let (governing, _) = governing_edge(source);
    if governing == 0 {
        return 1.0;
    }

    let ratio = max_size as f64 / governing as f64;
    if upscale { ratio } else { ratio.min(1.0) }
}

/// Target dimensions for an image bounded by a `max_size` square.
///
/// The governing edge (height for portraits, width otherwise) becomes exactly
/// `max_size`; the other edge is `⌊edge · max_size / governing⌋`. Integer
/// arithmetic keeps the truncation exact where `f64` would drift to `999`.
/// Neither edge drops below one pixel.
///
/// # Examples
/// ```
/// # use klaus::imaging::calculate_bounded_dimensions;
/// // Landscape: width governs
/// assert_eq!(calculate_bounded_dimensions((4000, 2000), 1000, false), (1000, 500));
///
/// // Portrait: height governs
/// assert_eq!(calculate_bounded_dimensions((800, 2400), 1000, false), (333, 1000));
/// ```
pub fn calculate_bounded_dimensions(source: (u32, u32), max_size: u32, upscale: bool) -> (u32, u32) {
    let (src_w, src_h) = source;
    if calculate_scale_ratio(source, max_size, upscale) == 1.0 {
        return (src_w.max(1), src_h.max(1));
    }
    let (governing, portrait) = governing_edge(source);

    let scale = |edge: u32| -> u32 {
        let scaled = u64::from(edge) * u64::from(max_size) / u64::from(governing);
        u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
    };

    if portrait {
        (scale(src_w), max_size)
    } else {
        (max_size, scale(src_h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // calculate_scale_ratio tests
    // =========================================================================

    #[test]
    fn ratio_landscape_uses_width() {
        assert_eq!(calculate_scale_ratio((4000, 2000), 1000, false), 0.25);
    }

    #[test]
    fn ratio_portrait_uses_height() {
        assert_eq!(calculate_scale_ratio((1000, 4000), 1000, false), 0.25);
    }

    #[test]
    fn ratio_square_uses_width() {
        assert_eq!(calculate_scale_ratio((2000, 2000), 1000, false), 0.5);
    }

    #[test]
    fn ratio_clamped_without_upscale() {
        assert_eq!(calculate_scale_ratio((200, 100), 1000, false), 1.0);
    }

    #[test]
    fn ratio_enlarges_with_upscale() {
        assert_eq!(calculate_scale_ratio((200, 100), 1000, true), 5.0);
    }

    #[test]
    fn ratio_zero_sized_source() {
        assert_eq!(calculate_scale_ratio((0, 0), 1000, true), 1.0);
    }

    // =========================================================================
    // calculate_bounded_dimensions tests
    // =========================================================================

    #[test]
    fn bounded_oversize_landscape() {
        assert_eq!(
            calculate_bounded_dimensions((4000, 2000), 1000, false),
            (1000, 500)
        );
    }

    #[test]
    fn bounded_oversize_portrait() {
        // 800 * 1000 / 2400 = 333.33 → 333
        assert_eq!(
            calculate_bounded_dimensions((800, 2400), 1000, false),
            (333, 1000)
        );
    }

    #[test]
    fn bounded_square() {
        assert_eq!(
            calculate_bounded_dimensions((3000, 3000), 1000, false),
            (1000, 1000)
        );
    }

    #[test]
    fn bounded_truncates_toward_zero() {
        // 1999 * 1000 / 3000 = 666.33 → 666
        assert_eq!(
            calculate_bounded_dimensions((3000, 1999), 1000, false),
            (1000, 666)
        );
    }

    #[test]
    fn bounded_small_image_kept_without_upscale() {
        assert_eq!(
            calculate_bounded_dimensions((640, 480), 1000, false),
            (640, 480)
        );
    }

    #[test]
    fn bounded_small_image_enlarged_with_upscale() {
        assert_eq!(
            calculate_bounded_dimensions((500, 250), 1000, true),
            (1000, 500)
        );
    }

    #[test]
    fn bounded_extreme_aspect_keeps_one_pixel() {
        assert_eq!(
            calculate_bounded_dimensions((10_000, 2), 1000, false),
            (1000, 1)
        );
    }

    #[test]
    fn bounded_fits_box_and_preserves_aspect() {
        for source in [(4000, 3000), (3000, 4000), (1234, 5678), (5001, 1001)] {
            let (w, h) = calculate_bounded_dimensions(source, 1000, false);
            assert!(w.max(h) <= 1000, "{source:?} → {w}x{h} exceeds box");
            let (src_w, src_h) = source;
            if src_h > src_w {
                assert_eq!(w, (u64::from(src_w) * 1000 / u64::from(src_h)) as u32);
            } else {
                assert_eq!(h, (u64::from(src_h) * 1000 / u64::from(src_w)) as u32);
            }
        }
    }

    #[test]
    fn bounded_unchanged_exactly_when_ratio_is_one() {
        let cases = [
            ((4000, 2000), false),
            ((800, 2400), false),
            ((1000, 1000), false),
            ((1000, 1000), true),
            ((500, 250), false),
            ((500, 250), true),
            ((0, 0), true),
        ];
        for (source, upscale) in cases {
            let unchanged = calculate_scale_ratio(source, 1000, upscale) == 1.0;
            let bounded = calculate_bounded_dimensions(source, 1000, upscale);
            assert_eq!(
                bounded == (source.0.max(1), source.1.max(1)),
                unchanged,
                "{source:?} upscale={upscale}"
            );
        }
    }

    #[test]
    fn governing_edge_prefers_width_on_ties() {
        assert_eq!(governing_edge((600, 600)), (600, false));
        assert_eq!(governing_edge((600, 601)), (601, true));
        assert_eq!(governing_edge((601, 600)), (601, false));
    }

    #[test]
    fn bounded_custom_box() {
        assert_eq!(
            calculate_bounded_dimensions((1600, 1200), 800, false),
            (800, 600)
        );
    }
}
