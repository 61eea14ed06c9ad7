//! Image processing: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image` crate behind the [`Codec`] trait |
//! | **Orientation** | `kamadak-exif` tag lookup + flip/rotate |
//! | **Resize** | repeated halving, then `Triangle` / `CatmullRom` / `Lanczos3` / `Nearest` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing a thumbnail run
//! - **Resample / Orientation**: Pixel transforms
//! - **Backend**: [`Codec`] trait + [`RustBackend`]
//! - **Operations**: Per-item functions combining calculations + transforms

pub mod backend;
mod calculations;
pub mod operations;
pub mod orientation;
mod params;
pub mod resample;
pub mod rust_backend;

pub use backend::{Codec, CodecError, Decoded};
pub use calculations::{MAX_EDGE, calculate_fit_dimensions, resolve_size};
pub use operations::{ThumbnailPlan, create_thumbnail, encode_thumbnail, plan_thumbnail};
pub use orientation::{Orientation, read_orientation};
pub use params::{
    FitMode, OutputFormat, Quality, ScalingMode, SizeSpec, ThumbnailParams, canonical_extension,
};
pub use resample::resample;
pub use rust_backend::RustBackend;
