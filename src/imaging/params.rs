//! Parameter types for thumbnail generation.
//!
//! These structs describe *what* to produce, not *how*. They are assembled
//! field by field by the [`Thumbnails`](crate::Thumbnails) builder and frozen
//! into a [`ThumbnailParams`] when a terminal operation starts; from then on
//! the run only reads them.
//!
//! ## Types
//!
//! - [`Quality`]: Encoder quality in `0.0..=1.0`. Meaning depends on the format.
//! - [`ScalingMode`]: Interpolation kernel used by the resampler.
//! - [`SizeSpec`]: Requested size: bounding box, single edge, or scale factors.
//! - [`FitMode`]: Whether a bounding box is filled exactly or fitted within.
//! - [`OutputFormat`]: Explicit format, or one of the "keep original" / "determine" sentinels.
//! - [`ThumbnailParams`]: The frozen combination of all of the above.

use crate::error::{Error, Result};
use image::ImageFormat;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Encoder quality, `0.0` (smallest) to `1.0` (best).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Quality(f32);

impl Quality {
    /// Returns `None` when `value` is outside `0.0..=1.0` or not finite.
    pub fn new(value: f32) -> Option<Self> {
        (value.is_finite() && (0.0..=1.0).contains(&value)).then_some(Self(value))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Quality on the 1-100 scale most lossy encoders expect.
    pub fn as_percent(self) -> u8 {
        ((self.0 * 100.0).round() as u8).clamp(1, 100)
    }
}

/// Interpolation kernel for the final (and, except for `Nearest`, the
/// intermediate) resize passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingMode {
    Nearest,
    #[default]
    Bilinear,
    Bicubic,
    Lanczos3,
}

impl ScalingMode {
    pub fn filter(self) -> FilterType {
        match self {
            ScalingMode::Nearest => FilterType::Nearest,
            ScalingMode::Bilinear => FilterType::Triangle,
            ScalingMode::Bicubic => FilterType::CatmullRom,
            ScalingMode::Lanczos3 => FilterType::Lanczos3,
        }
    }

    /// Whether large reductions should go through repeated halving first.
    pub fn is_progressive(self) -> bool {
        !matches!(self, ScalingMode::Nearest)
    }
}

impl FromStr for ScalingMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(ScalingMode::Nearest),
            "bilinear" => Ok(ScalingMode::Bilinear),
            "bicubic" => Ok(ScalingMode::Bicubic),
            "lanczos3" | "lanczos" => Ok(ScalingMode::Lanczos3),
            other => Err(format!("unknown scaling mode '{other}'")),
        }
    }
}

/// Requested thumbnail size, before it is resolved against a source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeSpec {
    /// Bounding box; combined with [`FitMode`].
    Bounds { width: u32, height: u32 },
    /// Target width, height follows the source aspect ratio.
    Width(u32),
    /// Target height, width follows the source aspect ratio.
    Height(u32),
    /// Scale factors applied to the source dimensions.
    Scale { x: f64, y: f64 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FitMode {
    /// Use the bounding box verbatim, distorting if necessary.
    Exact,
    /// Largest size with the source aspect ratio that fits the box.
    #[default]
    PreserveAspect,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Destination filename extension first, then the source format.
    #[default]
    Determine,
    /// Always the format sniffed from the source content.
    Original,
    /// A specific format.
    Format(ImageFormat),
}

impl OutputFormat {
    /// Parse a case-insensitive format name such as `"png"`, `"JPG"`,
    /// `"original"` or `"determine"`.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "original" => Ok(OutputFormat::Original),
            "determine" => Ok(OutputFormat::Determine),
            other => ImageFormat::from_extension(other)
                .filter(ImageFormat::writing_enabled)
                .map(OutputFormat::Format)
                .ok_or_else(|| Error::argument(format!("Unsupported output format: {name}."))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Determine => f.write_str("determine"),
            OutputFormat::Original => f.write_str("original"),
            OutputFormat::Format(format) => f.write_str(canonical_extension(*format)),
        }
    }
}

/// The extension appended to filenames written in `format`.
pub fn canonical_extension(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("img")
}

/// Frozen parameters for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub size: SizeSpec,
    pub fit: FitMode,
    pub format: OutputFormat,
    pub quality: Option<Quality>,
    pub scaling: ScalingMode,
    pub use_exif_orientation: bool,
    pub allow_overwrite: bool,
}

impl ThumbnailParams {
    /// Parameters with the given size and every other field at its default.
    pub fn new(size: SizeSpec) -> Self {
        Self {
            size,
            fit: FitMode::default(),
            format: OutputFormat::default(),
            quality: None,
            scaling: ScalingMode::default(),
            use_exif_orientation: true,
            allow_overwrite: true,
        }
    }

    /// Check the invariants that do not depend on any source.
    pub fn validate(&self) -> Result<()> {
        if let OutputFormat::Format(format) = self.format
            && !format.writing_enabled()
        {
            return Err(Error::argument(format!(
                "Unsupported output format: {}.",
                canonical_extension(format)
            )));
        }
        match self.size {
            SizeSpec::Bounds { width, height } if width == 0 || height == 0 => {
                Err(Error::argument("Width and height must be greater than 0."))
            }
            SizeSpec::Width(0) | SizeSpec::Height(0) => {
                Err(Error::argument("Width and height must be greater than 0."))
            }
            SizeSpec::Width(_) | SizeSpec::Height(_) if self.fit == FitMode::Exact => Err(
                Error::state(
                    "Both width and height must be specified when not keeping the aspect ratio.",
                ),
            ),
            SizeSpec::Scale { x, y } if !(x.is_finite() && y.is_finite() && x > 0.0 && y > 0.0) => {
                Err(Error::argument("Scaling factor must be greater than 0."))
            }
            _ => Ok(()),
        }
    }
}
