//! High-level image operations.
//!
//! These functions combine calculations with pixel work for a single item:
//! orientation correction, then size resolution against the upright
//! dimensions, then resampling. Encoding goes through a [`Codec`].

use super::backend::Codec;
use super::calculations::resolve_size;
use super::orientation::{Orientation, correct};
use super::params::ThumbnailParams;
use super::resample::{plan_halvings, resample};
use crate::error::{Error, Result};
use image::{DynamicImage, GenericImageView, ImageFormat};

/// What will happen to one source, computed without touching pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailPlan {
    /// Dimensions after orientation correction.
    pub upright: (u32, u32),
    /// Final thumbnail dimensions.
    pub target: (u32, u32),
    /// Intermediate halving steps before the final pass.
    pub halvings: Vec<(u32, u32)>,
}

/// Plan a thumbnail from the stored dimensions and orientation.
///
/// Useful for testing parameter handling.
pub fn plan_thumbnail(
    stored: (u32, u32),
    orientation: Option<Orientation>,
    params: &ThumbnailParams,
) -> Result<ThumbnailPlan> {
    let swaps = params.use_exif_orientation && orientation.is_some_and(Orientation::swaps_dimensions);
    let upright = if swaps { (stored.1, stored.0) } else { stored };
    let target = resolve_size(upright, params.size, params.fit)?;
    let halvings = if params.scaling.is_progressive() {
        plan_halvings(upright, target)
    } else {
        Vec::new()
    };
    Ok(ThumbnailPlan {
        upright,
        target,
        halvings,
    })
}

/// Produce the thumbnail bitmap for one decoded source.
pub fn create_thumbnail(
    image: DynamicImage,
    orientation: Option<Orientation>,
    params: &ThumbnailParams,
) -> Result<DynamicImage> {
    let plan = plan_thumbnail(image.dimensions(), orientation, params)?;
    let upright = correct(image, orientation, params.use_exif_orientation);
    debug_assert_eq!(upright.dimensions(), plan.upright);
    Ok(resample(&upright, plan.target, params.scaling))
}

/// Encode a finished thumbnail.
pub fn encode_thumbnail(
    codec: &dyn Codec,
    image: &DynamicImage,
    format: ImageFormat,
    params: &ThumbnailParams,
) -> Result<Vec<u8>> {
    codec
        .encode(image, format, params.quality)
        .map_err(|e| Error::from_codec(e, "thumbnail"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockCodec, RecordedOp};
    use crate::imaging::params::{FitMode, Quality, ScalingMode, SizeSpec};
    use crate::test_helpers::two_tone;

    fn bounds(width: u32, height: u32) -> ThumbnailParams {
        ThumbnailParams::new(SizeSpec::Bounds { width, height })
    }

    #[test]
    fn plan_swaps_dimensions_for_rotated_sources() {
        let plan = plan_thumbnail((400, 200), Some(Orientation::Rotate90), &bounds(100, 100)).unwrap();
        assert_eq!(plan.upright, (200, 400));
        assert_eq!(plan.target, (50, 100));
    }

    #[test]
    fn plan_ignores_orientation_when_disabled() {
        let mut params = bounds(100, 100);
        params.use_exif_orientation = false;
        let plan = plan_thumbnail((400, 200), Some(Orientation::Rotate90), &params).unwrap();
        assert_eq!(plan.upright, (400, 200));
        assert_eq!(plan.target, (100, 50));
    }

    #[test]
    fn plan_lists_halvings_for_large_reduction() {
        let plan = plan_thumbnail((1600, 1600), None, &bounds(100, 100)).unwrap();
        assert_eq!(plan.halvings, vec![(800, 800), (400, 400), (200, 200), (100, 100)]);
    }

    #[test]
    fn plan_nearest_skips_halvings() {
        let mut params = bounds(100, 100);
        params.scaling = ScalingMode::Nearest;
        let plan = plan_thumbnail((1600, 1600), None, &params).unwrap();
        assert!(plan.halvings.is_empty());
    }

    #[test]
    fn create_thumbnail_corrects_before_resizing() {
        // Stored 200x100 with red on the left; a 90° turn puts red on top.
        let stored = two_tone(200, 100);
        let thumb = create_thumbnail(stored, Some(Orientation::Rotate90), &bounds(100, 100))
            .unwrap()
            .to_rgb8();
        assert_eq!(thumb.dimensions(), (50, 100));
        assert_eq!(thumb.get_pixel(25, 5).0, [255, 0, 0]);
        assert_eq!(thumb.get_pixel(25, 95).0, [0, 0, 255]);
    }

    #[test]
    fn create_thumbnail_exact_fit() {
        let mut params = bounds(30, 90);
        params.fit = FitMode::Exact;
        let thumb = create_thumbnail(two_tone(200, 100), None, &params).unwrap();
        assert_eq!(thumb.dimensions(), (30, 90));
    }

    #[test]
    fn encode_passes_quality_to_codec() {
        let codec = MockCodec::new();
        let mut params = bounds(10, 10);
        params.quality = Quality::new(0.9);
        let img = DynamicImage::new_rgb8(10, 5);
        let bytes = encode_thumbnail(&codec, &img, ImageFormat::Png, &params).unwrap();
        assert_eq!(bytes, b"10x5.png");
        assert_eq!(
            codec.get_operations(),
            vec![RecordedOp::Encode {
                width: 10,
                height: 5,
                format: ImageFormat::Png,
                quality: Some(90),
            }]
        );
    }
}
