//! Pure Rust codec built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Format sniffing | `image::ImageReader::with_guessed_format` (magic bytes) |
//! | Decode (JPEG, PNG, GIF, BMP, TIFF, WebP) | `image` crate decoders |
//! | Orientation | `kamadak-exif` via [`read_orientation`](super::orientation::read_orientation) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with quality |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) with quality |
//! | Encode → other | `DynamicImage::write_to` |

use super::backend::{Codec, CodecError, Decoded};
use super::params::{Quality, canonical_extension};
use image::{DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage};
use std::borrow::Cow;
use std::io::Cursor;

/// JPEG quality used when none is configured; matches the encoder's own default.
const DEFAULT_JPEG_QUALITY: u8 = 75;

/// AVIF quality used when none is configured.
const DEFAULT_AVIF_QUALITY: u8 = 80;

/// Extensions of formats this build can decode.
const INPUT_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp",
];

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    INPUT_EXTENSIONS
}

/// Production codec. See the [module docs](self) for the crate mapping.
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

/// Whether `format` can store an alpha channel.
fn supports_alpha(format: ImageFormat) -> bool {
    !matches!(format, ImageFormat::Jpeg | ImageFormat::Pnm)
}

/// Composite transparent pixels onto a white background.
pub fn flatten_alpha(image: &DynamicImage) -> DynamicImage {
    let rgba = image.to_rgba8();
    let flat = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |c: u8| -> u8 {
            let a = a as u32;
            ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8
        };
        Rgb([blend(r), blend(g), blend(b)])
    });
    DynamicImage::ImageRgb8(flat)
}

/// Convert to a pixel layout the encoder for `format` accepts.
fn prepare_for_format(image: &DynamicImage, format: ImageFormat) -> Cow<'_, DynamicImage> {
    let has_alpha = image.color().has_alpha();
    if has_alpha && !supports_alpha(format) {
        return Cow::Owned(flatten_alpha(image));
    }

    match (format, image) {
        (ImageFormat::Png | ImageFormat::Tiff, DynamicImage::ImageRgb32F(_))
        | (ImageFormat::Png | ImageFormat::Tiff, DynamicImage::ImageRgba32F(_)) => {
            Cow::Owned(to_8bit(image, has_alpha))
        }
        (ImageFormat::Png | ImageFormat::Tiff, _) => Cow::Borrowed(image),
        (ImageFormat::Jpeg, DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_)) => {
            Cow::Borrowed(image)
        }
        (ImageFormat::Gif, DynamicImage::ImageRgba8(_)) => Cow::Borrowed(image),
        (ImageFormat::Gif, _) => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
        (_, DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_)) => Cow::Borrowed(image),
        _ => Cow::Owned(to_8bit(image, has_alpha)),
    }
}

fn to_8bit(image: &DynamicImage, has_alpha: bool) -> DynamicImage {
    if has_alpha {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    }
}

impl Codec for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<Decoded, CodecError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(format!("Cannot detect image format: {e}")))?;
        let format = reader
            .format()
            .ok_or_else(|| CodecError::Decode("Unrecognized image format".into()))?;
        let image = reader
            .decode()
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        Ok(Decoded { image, format })
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        quality: Option<Quality>,
    ) -> Result<Vec<u8>, CodecError> {
        if !format.writing_enabled() {
            return Err(CodecError::UnsupportedFormat(
                canonical_extension(format).to_string(),
            ));
        }

        let prepared = prepare_for_format(image, format);
        let mut buffer = Cursor::new(Vec::new());
        let result = match format {
            ImageFormat::Jpeg => {
                let q = quality.map_or(DEFAULT_JPEG_QUALITY, Quality::as_percent);
                let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, q);
                prepared.write_with_encoder(encoder)
            }
            ImageFormat::Avif => {
                let q = quality.map_or(DEFAULT_AVIF_QUALITY, Quality::as_percent);
                let encoder =
                    image::codecs::avif::AvifEncoder::new_with_speed_quality(&mut buffer, 6, q);
                prepared.write_with_encoder(encoder)
            }
            other => prepared.write_to(&mut buffer, other),
        };
        result.map_err(|e| CodecError::Encode(format!("{format:?} encode failed: {e}")))?;
        Ok(buffer.into_inner())
    }
}
