//! Pure calculation functions for thumbnail dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{FitMode, SizeSpec};
use crate::error::{Error, Result};

/// Largest thumbnail edge, in pixels.
pub const MAX_EDGE: u32 = 1 << 16;

/// Resolve a size request against the (orientation-corrected) source size.
///
/// # Arguments
/// * `original` - Source dimensions (width, height)
/// * `spec` - Requested size
/// * `fit` - How a bounding box is applied; ignored for the other specs
///
/// # Returns
/// * `(width, height)` - Target dimensions, never zero
///
/// # Examples
/// ```
/// # use simple_thumb::imaging::{resolve_size, FitMode, SizeSpec};
/// // 800x600 into a 200x200 box keeps 4:3 → 200x150
/// let spec = SizeSpec::Bounds { width: 200, height: 200 };
/// assert_eq!(resolve_size((800, 600), spec, FitMode::PreserveAspect).unwrap(), (200, 150));
///
/// // Exact mode ignores the source aspect ratio
/// assert_eq!(resolve_size((800, 600), spec, FitMode::Exact).unwrap(), (200, 200));
/// ```
pub fn resolve_size(original: (u32, u32), spec: SizeSpec, fit: FitMode) -> Result<(u32, u32)> {
    let (src_w, src_h) = original;
    if src_w == 0 || src_h == 0 {
        return Err(Error::InvalidSource(format!(
            "source has zero size ({src_w}x{src_h})"
        )));
    }

    let dims = match (spec, fit) {
        (SizeSpec::Bounds { width, height }, FitMode::Exact) => (width, height),
        (SizeSpec::Bounds { width, height }, FitMode::PreserveAspect) => {
            calculate_fit_dimensions(original, (width, height))
        }
        (SizeSpec::Width(width), _) => {
            let ratio = width as f64 / src_w as f64;
            (width, scale_edge(src_h, ratio))
        }
        (SizeSpec::Height(height), _) => {
            let ratio = height as f64 / src_h as f64;
            (scale_edge(src_w, ratio), height)
        }
        (SizeSpec::Scale { x, y }, _) => (scale_edge(src_w, x), scale_edge(src_h, y)),
    };
    if dims.0 > MAX_EDGE || dims.1 > MAX_EDGE {
        return Err(Error::argument(format!(
            "Thumbnail size {}x{} exceeds the {MAX_EDGE} pixel limit.",
            dims.0, dims.1
        )));
    }
    Ok(dims)
}

/// Largest size with the source aspect ratio that fits inside `bounds`.
///
/// The constraining edge matches its bound exactly; the other edge is
/// rounded to the nearest pixel but never past its bound.
pub fn calculate_fit_dimensions(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    let ratio_w = max_w as f64 / src_w as f64;
    let ratio_h = max_h as f64 / src_h as f64;

    if ratio_w <= ratio_h {
        // Width is the constraint
        (max_w, scale_edge(src_h, ratio_w).min(max_h))
    } else {
        // Height is the constraint
        (scale_edge(src_w, ratio_h).min(max_w), max_h)
    }
}

fn scale_edge(edge: u32, factor: f64) -> u32 {
    ((edge as f64 * factor).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
        resolve_size(
            source,
            SizeSpec::Bounds {
                width: bounds.0,
                height: bounds.1,
            },
            FitMode::PreserveAspect,
        )
        .unwrap()
    }

    // =========================================================================
    // Bounding box tests
    // =========================================================================

    #[test]
    fn fit_landscape_into_square() {
        assert_eq!(fit((800, 600), (200, 200)), (200, 150));
    }

    #[test]
    fn fit_portrait_into_square() {
        assert_eq!(fit((600, 800), (200, 200)), (150, 200));
    }

    #[test]
    fn fit_same_aspect_fills_box() {
        assert_eq!(fit((200, 200), (100, 100)), (100, 100));
    }

    #[test]
    fn fit_upscales_small_source() {
        assert_eq!(fit((50, 25), (200, 200)), (200, 100));
    }

    #[test]
    fn fit_extreme_panorama_keeps_one_pixel() {
        assert_eq!(fit((10000, 10), (100, 100)), (100, 1));
    }

    #[test]
    fn fit_stays_within_bounds_and_touches_one() {
        let sources = [(640, 480), (1920, 1080), (333, 777), (120, 1000), (999, 998)];
        let boxes = [(100, 100), (160, 90), (37, 211), (500, 20)];
        for source in sources {
            for bounds in boxes {
                let (w, h) = fit(source, bounds);
                assert!(w <= bounds.0 && h <= bounds.1, "{source:?} in {bounds:?} → {w}x{h}");
                assert!(w == bounds.0 || h == bounds.1, "{source:?} in {bounds:?} → {w}x{h}");

                let src_ratio = source.0 as f64 / source.1 as f64;
                // Rounding one edge by at most half a pixel bounds the ratio error
                let lo = (w as f64 - 0.5).max(0.5) / (h as f64 + 0.5);
                let hi = (w as f64 + 0.5) / (h as f64 - 0.5).max(0.5);
                assert!(
                    lo <= src_ratio && src_ratio <= hi,
                    "{source:?} in {bounds:?} → {w}x{h}"
                );
            }
        }
    }

    #[test]
    fn exact_mode_returns_bounds_verbatim() {
        let spec = SizeSpec::Bounds {
            width: 120,
            height: 40,
        };
        assert_eq!(resolve_size((800, 600), spec, FitMode::Exact).unwrap(), (120, 40));
    }

    // =========================================================================
    // Single edge and scale tests
    // =========================================================================

    #[test]
    fn width_only_preserves_aspect() {
        let dims = resolve_size((2000, 1500), SizeSpec::Width(1000), FitMode::default()).unwrap();
        assert_eq!(dims, (1000, 750));
    }

    #[test]
    fn height_only_preserves_aspect() {
        let dims = resolve_size((1500, 2000), SizeSpec::Height(1000), FitMode::default()).unwrap();
        assert_eq!(dims, (750, 1000));
    }

    #[test]
    fn scale_rounds_to_nearest() {
        let spec = SizeSpec::Scale { x: 0.25, y: 0.25 };
        assert_eq!(resolve_size((101, 99), spec, FitMode::default()).unwrap(), (25, 25));
    }

    #[test]
    fn scale_independent_axes() {
        let spec = SizeSpec::Scale { x: 2.0, y: 0.5 };
        assert_eq!(resolve_size((100, 100), spec, FitMode::default()).unwrap(), (200, 50));
    }

    #[test]
    fn scale_never_reaches_zero() {
        let spec = SizeSpec::Scale { x: 0.001, y: 0.001 };
        assert_eq!(resolve_size((10, 10), spec, FitMode::default()).unwrap(), (1, 1));
    }

    #[test]
    fn oversized_target_is_rejected() {
        let spec = SizeSpec::Scale { x: 1e12, y: 1.0 };
        let err = resolve_size((100, 100), spec, FitMode::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        // A thin strip stretched by a single edge grows the other one too.
        let err = resolve_size((1000, 1), SizeSpec::Height(100), FitMode::default()).unwrap_err();
        assert!(err.to_string().contains("pixel limit"));

        let spec = SizeSpec::Scale { x: 2.0, y: 2.0 };
        assert_eq!(
            resolve_size((MAX_EDGE / 2, 10), spec, FitMode::default()).unwrap(),
            (MAX_EDGE, 20)
        );
    }

    #[test]
    fn zero_sized_source_is_invalid() {
        let result = resolve_size((0, 100), SizeSpec::Width(10), FitMode::default());
        assert!(matches!(result, Err(Error::InvalidSource(_))));
    }
}
