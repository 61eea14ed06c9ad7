//! Image sources and the lazy queue that reads them.
//!
//! A run holds an ordered list of [`ImageSource`]s. Nothing is read until the
//! pipeline pulls the next item from the [`SourceQueue`]; each pull reads
//! exactly one source, decodes it, and looks up its orientation. Sources are
//! consumed by the pull: a stream is read to the end and dropped, file
//! handles are closed before the pull returns.
//!
//! | Variant | Origin file | Origin format | Orientation |
//! |---|---|---|---|
//! | `File` | yes | sniffed | from EXIF |
//! | `Url` | no (name only) | sniffed | from EXIF |
//! | `Stream` | no | sniffed | from EXIF |
//! | `Image` | no | none | none |

use crate::error::{Error, Result};
use crate::imaging::{Codec, Orientation};
use image::{DynamicImage, ImageFormat};
use std::collections::VecDeque;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Timeout for fetching URL sources.
const URL_TIMEOUT_SECS: u64 = 30;

/// Upper bound on bytes read from a URL.
const MAX_URL_BYTES: u64 = 256 * 1024 * 1024;

pub enum ImageSource<'a> {
    File(PathBuf),
    Url(String),
    Stream(Box<dyn Read + 'a>),
    Image(DynamicImage),
}

impl<'a> ImageSource<'a> {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ImageSource::File(path.into())
    }

    pub fn url(url: impl Into<String>) -> Self {
        ImageSource::Url(url.into())
    }

    pub fn stream(reader: impl Read + 'a) -> Self {
        ImageSource::Stream(Box::new(reader))
    }

    pub fn image(image: DynamicImage) -> Self {
        ImageSource::Image(image)
    }

    /// Whether this source is backed by a file on disk.
    pub fn is_file(&self) -> bool {
        matches!(self, ImageSource::File(_))
    }

    /// Short label for logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            ImageSource::File(path) => path.display().to_string(),
            ImageSource::Url(url) => url.clone(),
            ImageSource::Stream(_) => "<stream>".to_string(),
            ImageSource::Image(image) => format!("<image {}x{}>", image.width(), image.height()),
        }
    }
}

impl fmt::Debug for ImageSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::File(path) => f.debug_tuple("File").field(path).finish(),
            ImageSource::Url(url) => f.debug_tuple("Url").field(url).finish(),
            ImageSource::Stream(_) => f.write_str("Stream"),
            ImageSource::Image(image) => f
                .debug_tuple("Image")
                .field(&(image.width(), image.height()))
                .finish(),
        }
    }
}

impl From<PathBuf> for ImageSource<'_> {
    fn from(path: PathBuf) -> Self {
        ImageSource::File(path)
    }
}

impl From<&Path> for ImageSource<'_> {
    fn from(path: &Path) -> Self {
        ImageSource::File(path.to_path_buf())
    }
}

impl From<&str> for ImageSource<'_> {
    fn from(path: &str) -> Self {
        ImageSource::File(PathBuf::from(path))
    }
}

impl From<String> for ImageSource<'_> {
    fn from(path: String) -> Self {
        ImageSource::File(PathBuf::from(path))
    }
}

impl From<DynamicImage> for ImageSource<'_> {
    fn from(image: DynamicImage) -> Self {
        ImageSource::Image(image)
    }
}

/// One decoded source, ready for the thumbnail transform.
#[derive(Debug)]
pub struct SourceItem {
    pub image: DynamicImage,
    /// Path of the original file, for `File` sources.
    pub origin_file: Option<PathBuf>,
    /// Original filename, for `File` and `Url` sources.
    pub origin_name: Option<String>,
    /// Format sniffed from the content.
    pub format: Option<ImageFormat>,
    pub orientation: Option<Orientation>,
}

/// Last path segment of a URL, without query or fragment.
pub fn url_file_name(url: &str) -> Option<String> {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let after_scheme = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest);
    let (_, path) = after_scheme.split_once('/')?;
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

fn fetch_url(url: &str) -> Result<Vec<u8>> {
    let agent = ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(URL_TIMEOUT_SECS))
        .build();
    let response = agent.get(url).call().map_err(|e| Error::Network {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_URL_BYTES)
        .read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Ordered, single-pass queue of sources.
///
/// [`pull`](Self::pull) reads and decodes the next source; `None` means the
/// queue is exhausted.
#[derive(Debug)]
pub struct SourceQueue<'a> {
    sources: VecDeque<ImageSource<'a>>,
    pulled: usize,
}

impl<'a> SourceQueue<'a> {
    pub fn new(sources: impl IntoIterator<Item = ImageSource<'a>>) -> Self {
        Self {
            sources: sources.into_iter().collect(),
            pulled: 0,
        }
    }

    /// Sources not yet pulled.
    pub fn remaining(&self) -> usize {
        self.sources.len()
    }

    /// Read and decode the next source.
    pub fn pull(&mut self, codec: &dyn Codec) -> Option<Result<SourceItem>> {
        let source = self.sources.pop_front()?;
        let index = self.pulled;
        self.pulled += 1;
        debug!(index, source = %source.describe(), "reading source");
        Some(load(source, codec))
    }
}

fn load(source: ImageSource<'_>, codec: &dyn Codec) -> Result<SourceItem> {
    let label = source.describe();
    let (bytes, origin_file, origin_name) = match source {
        ImageSource::Image(image) => {
            return Ok(SourceItem {
                image,
                origin_file: None,
                origin_name: None,
                format: None,
                orientation: None,
            });
        }
        ImageSource::File(path) => {
            let bytes = std::fs::read(&path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned());
            (bytes, Some(path), name)
        }
        ImageSource::Url(url) => {
            let bytes = fetch_url(&url)?;
            (bytes, None, url_file_name(&url))
        }
        ImageSource::Stream(mut reader) => {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes)?;
            (bytes, None, None)
        }
    };

    let decoded = codec
        .decode(&bytes)
        .map_err(|e| Error::from_codec(e, &label))?;
    let orientation = codec.read_orientation(&bytes);
    Ok(SourceItem {
        image: decoded.image,
        origin_file,
        origin_name,
        format: Some(decoded.format),
        orientation,
    })
}
