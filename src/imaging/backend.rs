//! Codec boundary: turning bytes into bitmaps and back.
//!
//! The [`Codec`] trait defines the three operations the pipeline needs from
//! a codec: decode (with the format sniffed from content), read the EXIF
//! orientation, and encode to a chosen format.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockCodec` below.

use super::orientation::{self, Orientation};
use super::params::Quality;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("{0}")]
    Decode(String),
    #[error("{0}")]
    Encode(String),
    #[error("unsupported format {0}")]
    UnsupportedFormat(String),
}

/// A decoded bitmap plus the format its bytes were in.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub image: DynamicImage,
    pub format: ImageFormat,
}

pub trait Codec {
    /// Decode an image, detecting its format from the content rather than
    /// from any filename.
    fn decode(&self, bytes: &[u8]) -> Result<Decoded, CodecError>;

    /// Orientation recorded in the image's metadata, if any.
    fn read_orientation(&self, bytes: &[u8]) -> Option<Orientation> {
        orientation::read_orientation(bytes)
    }

    /// Encode `image` as `format`.
    ///
    /// Formats without an alpha channel get transparent pixels flattened
    /// onto white first.
    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        quality: Option<Quality>,
    ) -> Result<Vec<u8>, CodecError>;
}

impl<C: Codec + ?Sized> Codec for &C {
    fn decode(&self, bytes: &[u8]) -> Result<Decoded, CodecError> {
        (**self).decode(bytes)
    }

    fn read_orientation(&self, bytes: &[u8]) -> Option<Orientation> {
        (**self).read_orientation(bytes)
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        quality: Option<Quality>,
    ) -> Result<Vec<u8>, CodecError> {
        (**self).encode(image, format, quality)
    }
}
