//! Crate-wide error type.
//!
//! Validation failures carry fixed, human-readable messages so callers (and
//! tests) can match on them exactly. Per-item failures (decode, encode, I/O)
//! carry the context of the item that failed.
//!
//! | Family | Variants | When |
//! |---|---|---|
//! | Validation | [`Error::InvalidArgument`], [`Error::InvalidState`] | before any source is read |
//! | Overwrite | [`Error::DestinationExists`] | per item, file sinks only |
//! | Per item | [`Error::Decode`], [`Error::Encode`], [`Error::InvalidSource`], [`Error::Io`], [`Error::Network`] | while running |
//! | Iteration | [`Error::NoSuchElement`] | pulling past the end of a lazy run |

use crate::imaging::CodecError;
use std::path::PathBuf;
use thiserror::Error;

pub(crate) const MULTIPLE_TO_ONE_FILE: &str = "Cannot output multiple thumbnails to one file.";
pub(crate) const MULTIPLE_TO_ONE_STREAM: &str =
    "Cannot output multiple thumbnails to a single stream.";
pub(crate) const MULTIPLE_TO_ONE_IMAGE: &str =
    "Cannot create one thumbnail from multiple original images.";
pub(crate) const SOURCES_NOT_FILES: &str =
    "Cannot create thumbnails to files if original images are not from files.";
pub(crate) const FORMAT_NOT_SPECIFIED: &str = "Output format not specified.";
pub(crate) const NOT_A_DIRECTORY: &str = "Given destination is not a directory.";
pub(crate) const NOT_ENOUGH_DESTINATIONS: &str =
    "Not enough destinations provided for the number of sources.";
pub(crate) const NO_SOURCES: &str = "No source images were specified.";

#[derive(Error, Debug)]
pub enum Error {
    /// A caller-supplied value or combination is not acceptable.
    #[error("{0}")]
    InvalidArgument(String),

    /// The builder is not in a state that allows the requested operation.
    #[error("{0}")]
    InvalidState(String),

    /// Overwriting is disabled and the destination already exists.
    #[error("The destination file exists.")]
    DestinationExists { path: PathBuf },

    /// The source decoded, but to something that cannot be resized.
    #[error("Invalid source image: {0}")]
    InvalidSource(String),

    #[error("Could not decode {source_name}: {message}")]
    Decode {
        source_name: String,
        message: String,
    },

    #[error("Could not encode thumbnail: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to fetch {url}: {message}")]
    Network { url: String, message: String },

    #[error("No more thumbnails.")]
    NoSuchElement,
}

impl Error {
    pub(crate) fn argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    pub(crate) fn state(message: impl Into<String>) -> Self {
        Error::InvalidState(message.into())
    }

    /// True for errors raised while checking the configuration and the
    /// source/sink pairing, i.e. before any image was processed.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidArgument(_) | Error::InvalidState(_))
    }

    /// Attach a source name to a codec failure.
    pub(crate) fn from_codec(err: CodecError, source_name: &str) -> Self {
        match err {
            CodecError::Decode(message) => Error::Decode {
                source_name: source_name.to_string(),
                message,
            },
            CodecError::Encode(message) => Error::Encode(message),
            CodecError::UnsupportedFormat(name) => {
                Error::InvalidArgument(format!("Unsupported output format: {name}."))
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
