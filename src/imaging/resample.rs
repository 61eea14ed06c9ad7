//! Multi-pass resampling.
//!
//! A single bilinear pass only looks at the few source pixels nearest to each
//! output sample, so reductions by more than 2x skip most of the input and
//! alias. For those, the image is first halved repeatedly (each halving is an
//! even 2x2 average) until one more halving would fall below the target, and
//! the remaining < 2x step is done with the configured kernel.
//!
//! Upscales and reductions up to 2x are a single pass. `Nearest` is always a
//! single pass.

use super::params::ScalingMode;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

/// Intermediate sizes visited before the final pass to `target`.
///
/// Empty when the reduction is at most 2x on both axes.
pub fn plan_halvings(source: (u32, u32), target: (u32, u32)) -> Vec<(u32, u32)> {
    let (mut w, mut h) = source;
    let (tw, th) = target;
    if w <= tw.saturating_mul(2) && h <= th.saturating_mul(2) {
        return Vec::new();
    }

    let mut steps = Vec::new();
    loop {
        let next_w = if w / 2 >= tw { w / 2 } else { w };
        let next_h = if h / 2 >= th { h / 2 } else { h };
        if (next_w, next_h) == (w, h) {
            break;
        }
        w = next_w;
        h = next_h;
        steps.push((w, h));
    }
    steps
}

/// Resize `image` to exactly `target`.
///
/// Keeps the pixel layout of the input (an RGBA source yields an RGBA
/// result). Resizing to the current size returns an identical copy.
pub fn resample(image: &DynamicImage, target: (u32, u32), mode: ScalingMode) -> DynamicImage {
    let (tw, th) = target;
    if image.dimensions() == target {
        return image.clone();
    }

    let steps = if mode.is_progressive() {
        plan_halvings(image.dimensions(), target)
    } else {
        Vec::new()
    };

    debug!(
        from_w = image.width(),
        from_h = image.height(),
        to_w = tw,
        to_h = th,
        halvings = steps.len(),
        ?mode,
        "resampling"
    );

    let mut intermediate: Option<DynamicImage> = None;
    for (w, h) in steps {
        let current = intermediate.as_ref().unwrap_or(image);
        intermediate = Some(current.resize_exact(w, h, FilterType::Triangle));
    }

    match intermediate {
        Some(img) if img.dimensions() == target => img,
        Some(img) => img.resize_exact(tw, th, mode.filter()),
        None => image.resize_exact(tw, th, mode.filter()),
    }
}
