//! EXIF orientation handling.
//!
//! Cameras store pixels in sensor order and record how to display them in
//! the EXIF `Orientation` tag (`0x0112`). Codes 1-8 are each one of four
//! rotations with or without a horizontal mirror:
//!
//! | Code | Mirror | Then rotate (clockwise) |
//! |---|---|---|
//! | 1 | no | 0° |
//! | 2 | yes | 0° |
//! | 3 | no | 180° |
//! | 4 | yes | 180° |
//! | 5 | yes | 270° |
//! | 6 | no | 90° |
//! | 7 | yes | 90° |
//! | 8 | no | 270° |
//!
//! Correction always mirrors first and rotates second. Codes 5-8 swap width
//! and height, so correction runs before any size is resolved.

use exif::{In, Reader, Tag};
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Clockwise rotation applied after the optional mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    None,
    Cw90,
    Cw180,
    Cw270,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Normal,
    MirrorHorizontal,
    Rotate180,
    MirrorVertical,
    Transpose,
    Rotate90,
    Transverse,
    Rotate270,
}

impl Orientation {
    pub const ALL: [Orientation; 8] = [
        Orientation::Normal,
        Orientation::MirrorHorizontal,
        Orientation::Rotate180,
        Orientation::MirrorVertical,
        Orientation::Transpose,
        Orientation::Rotate90,
        Orientation::Transverse,
        Orientation::Rotate270,
    ];

    /// Map an EXIF orientation code. Anything outside 1-8 is `None`.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1..=8 => Some(Self::ALL[(code - 1) as usize]),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        Self::ALL
            .iter()
            .position(|o| *o == self)
            .map(|i| i as u32 + 1)
            .unwrap_or(1)
    }

    /// The mirror flag and rotation that bring the stored pixels upright.
    pub fn transform(self) -> (bool, Rotation) {
        match self {
            Orientation::Normal => (false, Rotation::None),
            Orientation::MirrorHorizontal => (true, Rotation::None),
            Orientation::Rotate180 => (false, Rotation::Cw180),
            Orientation::MirrorVertical => (true, Rotation::Cw180),
            Orientation::Transpose => (true, Rotation::Cw270),
            Orientation::Rotate90 => (false, Rotation::Cw90),
            Orientation::Transverse => (true, Rotation::Cw90),
            Orientation::Rotate270 => (false, Rotation::Cw270),
        }
    }

    /// Whether the upright image has width and height swapped.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self.transform().1, Rotation::Cw90 | Rotation::Cw270)
    }

    /// Turn stored pixels upright: mirror, then rotate.
    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        let (mirror, rotation) = self.transform();
        let image = if mirror { image.fliph() } else { image };
        rotate(image, rotation)
    }

    /// Inverse of [`apply`](Self::apply): rotate back, then mirror.
    pub fn undo(self, image: DynamicImage) -> DynamicImage {
        let (mirror, rotation) = self.transform();
        let inverse = match rotation {
            Rotation::None => Rotation::None,
            Rotation::Cw90 => Rotation::Cw270,
            Rotation::Cw180 => Rotation::Cw180,
            Rotation::Cw270 => Rotation::Cw90,
        };
        let image = rotate(image, inverse);
        if mirror { image.fliph() } else { image }
    }
}

fn rotate(image: DynamicImage, rotation: Rotation) -> DynamicImage {
    match rotation {
        Rotation::None => image,
        Rotation::Cw90 => image.rotate90(),
        Rotation::Cw180 => image.rotate180(),
        Rotation::Cw270 => image.rotate270(),
    }
}

/// Read the orientation tag from an encoded image (JPEG, TIFF, PNG, WebP, HEIF).
///
/// Returns `None` when there is no EXIF block, no tag, or the value is not 1-8.
pub fn read_orientation(bytes: &[u8]) -> Option<Orientation> {
    let exif = Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;
    let code = exif
        .get_field(Tag::Orientation, In::PRIMARY)?
        .value
        .get_uint(0)?;
    Orientation::from_code(code)
}

/// Apply `orientation` when correction is enabled; otherwise pass through.
pub fn correct(
    image: DynamicImage,
    orientation: Option<Orientation>,
    enabled: bool,
) -> DynamicImage {
    match orientation {
        Some(o) if enabled && o != Orientation::Normal => {
            debug!(code = o.code(), "applying EXIF orientation");
            o.apply(image)
        }
        _ => image,
    }
}
