//! Destination resolution: where each thumbnail goes and in what format.
//!
//! Checks split into two groups. The run-level checks ([`require_single`],
//! [`require_file_sources`], [`require_directory`], [`require_stream_format`],
//! [`require_file_formats`], [`take_destinations`])
//! only look at counts, source kinds and the filesystem, and run before any
//! source is read. The per-item checks ([`resolve_format`],
//! [`reconcile_extension`], [`check_overwrite`]) need the decoded item.
//!
//! ## Format precedence
//!
//! | Requested | Destination extension known | Origin format known | Result |
//! |---|---|---|---|
//! | `Format(f)` | - | - | `f` |
//! | `Original` | - | yes | origin |
//! | `Original` | yes | no | extension |
//! | `Determine` | yes | - | extension |
//! | `Determine` | no | yes | origin |
//! | otherwise | | | `Output format not specified.` |

use crate::error::{self, Error, Result};
use crate::imaging::{OutputFormat, ThumbnailParams, canonical_extension};
use crate::naming::Rename;
use crate::source::ImageSource;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Sinks that can only receive one thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleSink {
    File,
    Stream,
    Image,
}

impl SingleSink {
    fn message(self) -> &'static str {
        match self {
            SingleSink::File => error::MULTIPLE_TO_ONE_FILE,
            SingleSink::Stream => error::MULTIPLE_TO_ONE_STREAM,
            SingleSink::Image => error::MULTIPLE_TO_ONE_IMAGE,
        }
    }
}

/// A single sink accepts exactly one source.
pub fn require_single(source_count: usize, sink: SingleSink) -> Result<()> {
    if source_count > 1 {
        return Err(Error::argument(sink.message()));
    }
    Ok(())
}

/// Naming strategies derive paths from original files, so every source
/// must be one.
pub fn require_file_sources(sources: &[ImageSource<'_>]) -> Result<()> {
    if sources.iter().all(ImageSource::is_file) {
        Ok(())
    } else {
        Err(Error::state(error::SOURCES_NOT_FILES))
    }
}

pub fn require_directory(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(Error::argument(error::NOT_A_DIRECTORY))
    }
}

/// Take exactly `count` destinations. Extras stay in the iterator, so
/// endless generators such as
/// [`NumberedFilenames`](crate::naming::NumberedFilenames) work.
pub fn take_destinations<T>(destinations: impl IntoIterator<Item = T>, count: usize) -> Result<Vec<T>> {
    let taken: Vec<T> = destinations.into_iter().take(count).collect();
    require_destination_count(taken.len(), count)?;
    Ok(taken)
}

pub fn require_destination_count(available: usize, count: usize) -> Result<()> {
    if available < count {
        return Err(Error::argument(error::NOT_ENOUGH_DESTINATIONS));
    }
    Ok(())
}

/// In-memory bitmaps carry no origin format, so writing them to a stream
/// needs an explicit one.
pub fn require_stream_format(sources: &[ImageSource<'_>], format: OutputFormat) -> Result<()> {
    let explicit = matches!(format, OutputFormat::Format(_));
    if !explicit && sources.iter().any(|s| matches!(s, ImageSource::Image(_))) {
        return Err(Error::state(error::FORMAT_NOT_SPECIFIED));
    }
    Ok(())
}

/// Each in-memory bitmap written to a file needs its format from the
/// request or from the destination's extension. `destinations` pairs with
/// `sources` by position.
pub fn require_file_formats(
    sources: &[ImageSource<'_>],
    destinations: &[PathBuf],
    format: OutputFormat,
) -> Result<()> {
    if matches!(format, OutputFormat::Format(_)) {
        return Ok(());
    }
    let unresolved = sources.iter().zip(destinations).any(|(source, destination)| {
        matches!(source, ImageSource::Image(_)) && format_from_path(destination).is_none()
    });
    if unresolved {
        return Err(Error::state(error::FORMAT_NOT_SPECIFIED));
    }
    Ok(())
}

/// Format named by a path's extension, if the extension is one we know.
pub fn format_from_path(path: &Path) -> Option<ImageFormat> {
    path.extension().and_then(ImageFormat::from_extension)
}

/// Pick the output format for one item. `destination` is `None` for
/// streams and in-memory sinks.
pub fn resolve_format(
    requested: OutputFormat,
    destination: Option<&Path>,
    origin: Option<ImageFormat>,
) -> Result<ImageFormat> {
    let from_path = destination.and_then(format_from_path);
    let resolved = match requested {
        OutputFormat::Format(format) => Some(format),
        OutputFormat::Original => origin.or(from_path),
        OutputFormat::Determine => from_path.or(origin),
    };
    resolved.ok_or_else(|| Error::state(error::FORMAT_NOT_SPECIFIED))
}

/// Append the canonical extension when `path`'s extension does not name
/// `format`. `a.JPEG` stays as is for JPEG; `a.png` becomes `a.png.jpg`.
pub fn reconcile_extension(path: &Path, format: ImageFormat) -> PathBuf {
    if format_from_path(path) == Some(format) {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(canonical_extension(format));
    PathBuf::from(name)
}

/// Fail with [`Error::DestinationExists`] when `path` exists and
/// overwriting is off.
pub fn check_overwrite(path: &Path, allow_overwrite: bool) -> Result<()> {
    if !allow_overwrite && path.exists() {
        return Err(Error::DestinationExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Destination for a renamed thumbnail: the renamed original filename,
/// inside `directory` or next to the original.
pub fn named_destination(
    origin_file: &Path,
    directory: Option<&Path>,
    rename: &dyn Rename,
    params: &ThumbnailParams,
) -> PathBuf {
    let name = origin_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let renamed = rename.apply(&name, params);
    let parent = directory
        .map(Path::to_path_buf)
        .or_else(|| origin_file.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    let destination = parent.join(renamed);
    debug!(origin = %origin_file.display(), destination = %destination.display(), "named destination");
    destination
}
