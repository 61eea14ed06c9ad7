//! # Simple Thumb
//!
//! Thumbnail generation for image files, URLs, byte streams and in-memory
//! bitmaps. Each source is decoded, turned upright according to its EXIF
//! orientation, resized, encoded and delivered to a file, a writer or the
//! caller.
//!
//! ```no_run
//! use simple_thumb::Thumbnails;
//!
//! # fn main() -> simple_thumb::Result<()> {
//! let path = Thumbnails::of(["photo.jpg"])
//!     .size(160, 160)
//!     .output_format("png")
//!     .to_file("thumb.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Pipeline
//!
//! ```text
//! source ─ read ─ decode ─ orient ─ resolve size ─ resample ─ encode ─ sink
//! ```
//!
//! Items flow through one at a time. Nothing is read until a terminal
//! operation runs, and every check that can be made without reading an
//! image (source/sink counts, destination directory, configuration) is made
//! before the first source is touched.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`thumbnails`] | The [`Thumbnails`] builder, terminal operations, lazy [`ThumbnailIter`] |
//! | [`source`] | Source kinds and the lazy queue that reads them |
//! | [`sink`] | Output format selection, extension reconciliation, overwrite and cardinality checks |
//! | [`naming`] | Rename strategies and numbered filename generation |
//! | [`imaging`] | Pure-Rust pixel work: size resolution, orientation, multi-pass resampling, codec |
//! | [`config`] | `simple-thumb.toml` loading, merging and validation |
//! | [`error`] | Crate error type with stable, exact-match messages |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Halving Before the Final Pass
//!
//! A single bilinear pass over a large reduction samples only a few source
//! pixels per output pixel and aliases badly. When the reduction is more
//! than 2× on either axis, the image is halved with a triangle filter until
//! the next halving would undershoot, and only then resized to the exact
//! target with the configured kernel. See [`imaging::resample`].
//!
//! ## Deferred Configuration Errors
//!
//! Builder setters never fail, so calls chain freely. The first invalid
//! setting is remembered and returned by the terminal operation before any
//! I/O happens.
//!
//! ## Codec Behind a Trait
//!
//! Decoding and encoding go through [`imaging::Codec`]. [`imaging::RustBackend`]
//! uses the `image` crate (no system libraries); tests swap in a recording
//! mock so pipeline logic is checked without real codecs.

pub mod config;
pub mod error;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod sink;
pub mod source;
pub mod thumbnails;

pub use error::{Error, Result};
pub use naming::{NumberedFilenames, Rename, StandardRename};
pub use source::ImageSource;
pub use thumbnails::{ThumbnailIter, Thumbnails};

#[cfg(test)]
pub(crate) mod test_helpers;
