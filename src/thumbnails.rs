//! The thumbnail builder and its terminal operations.
//!
//! A [`Thumbnails`] value collects sources and settings. Setters never fail;
//! the first bad setting is remembered and reported by whichever terminal
//! operation runs, before any source is read.
//!
//! A terminal operation moves through three steps:
//!
//! 1. **Freeze**: settings become an immutable [`ThumbnailParams`].
//! 2. **Validate**: source/sink pairing, target directory, destination
//!    count, and an output format for every in-memory bitmap. Nothing has
//!    been read yet.
//! 3. **Run**: sources are pulled one at a time; each is decoded, turned
//!    upright, resized, encoded and written before the next one is read.
//!
//! ## Terminal operations
//!
//! | Operation | Sources | Result |
//! |---|---|---|
//! | [`as_image`](Thumbnails::as_image) | 1 | bitmap |
//! | [`as_images`](Thumbnails::as_images) | any | bitmaps |
//! | [`iter_images`](Thumbnails::iter_images) | any | lazy [`ThumbnailIter`] |
//! | [`to_file`](Thumbnails::to_file) | 1 | written path |
//! | [`to_files`](Thumbnails::to_files) / [`as_files`](Thumbnails::as_files) | any | one path per source |
//! | [`to_files_renamed`](Thumbnails::to_files_renamed) / [`as_files_renamed`](Thumbnails::as_files_renamed) | files | renamed next to originals |
//! | [`to_dir`](Thumbnails::to_dir) / [`as_files_in_dir`](Thumbnails::as_files_in_dir) | files | renamed into a directory |
//! | [`to_writer`](Thumbnails::to_writer) | 1 | encoded bytes |
//! | [`to_writers`](Thumbnails::to_writers) | any | encoded bytes per writer |
//!
//! When overwriting is disabled, `to_file` fails on an existing
//! destination. The multi-file operations skip that item instead, log it,
//! and leave it out of the returned list. Every other per-item failure
//! aborts the call.
//!
//! ```no_run
//! use simple_thumb::{StandardRename, Thumbnails};
//!
//! # fn main() -> simple_thumb::Result<()> {
//! let written = Thumbnails::of(["photos/a.jpg", "photos/b.jpg"])
//!     .size(160, 160)
//!     .output_format("png")
//!     .as_files_renamed(StandardRename::PrefixDotThumbnail)?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use crate::imaging::{
    Codec, FitMode, OutputFormat, Quality, RustBackend, ScalingMode, SizeSpec, ThumbnailParams,
    create_thumbnail, encode_thumbnail,
};
use crate::naming::Rename;
use crate::sink::{self, SingleSink};
use crate::source::{ImageSource, SourceItem, SourceQueue};
use image::{DynamicImage, ImageFormat};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const SIZE_NOT_SPECIFIED: &str = "Thumbnail size has not been specified.";
const SIZE_ALREADY_SPECIFIED: &str = "Thumbnail size has already been specified.";
const QUALITY_OUT_OF_RANGE: &str = "Output quality must be between 0.0 and 1.0.";

/// Builder for a thumbnail run. See the [module docs](self).
pub struct Thumbnails<'a> {
    sources: Vec<ImageSource<'a>>,
    size: Option<SizeSpec>,
    fit: FitMode,
    format: OutputFormat,
    quality: Option<Quality>,
    scaling: ScalingMode,
    use_exif_orientation: bool,
    allow_overwrite: bool,
    codec: Box<dyn Codec + 'a>,
    error: Option<Error>,
}

impl<'a> Default for Thumbnails<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Thumbnails<'a> {
    /// Empty builder with default settings and the [`RustBackend`] codec.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            size: None,
            fit: FitMode::default(),
            format: OutputFormat::default(),
            quality: None,
            scaling: ScalingMode::default(),
            use_exif_orientation: true,
            allow_overwrite: true,
            codec: Box::new(RustBackend::new()),
            error: None,
        }
    }

    /// Builder over `sources`. Paths and strings become file sources; use
    /// [`ImageSource::url`] / [`ImageSource::stream`] for the others.
    pub fn of<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ImageSource<'a>>,
    {
        Self::new().sources(sources)
    }

    pub fn source(mut self, source: impl Into<ImageSource<'a>>) -> Self {
        self.sources.push(source.into());
        self
    }

    pub fn sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ImageSource<'a>>,
    {
        self.sources.extend(sources.into_iter().map(Into::into));
        self
    }

    fn fail(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn set_size(mut self, spec: SizeSpec) -> Self {
        match (self.size, spec) {
            (None, spec) => self.size = Some(spec),
            (Some(SizeSpec::Width(width)), SizeSpec::Height(height))
            | (Some(SizeSpec::Height(height)), SizeSpec::Width(width)) => {
                self.size = Some(SizeSpec::Bounds { width, height });
            }
            (Some(_), _) => self.fail(Error::state(SIZE_ALREADY_SPECIFIED)),
        }
        self
    }

    /// Fit within `width`×`height`, keeping the aspect ratio unless
    /// [`keep_aspect_ratio(false)`](Self::keep_aspect_ratio) is set.
    pub fn size(self, width: u32, height: u32) -> Self {
        self.set_size(SizeSpec::Bounds { width, height })
    }

    /// Exactly `width`×`height`, distorting if necessary.
    pub fn force_size(self, width: u32, height: u32) -> Self {
        self.set_size(SizeSpec::Bounds { width, height })
            .keep_aspect_ratio(false)
    }

    /// Target width; combined with [`height`](Self::height) it forms a box.
    pub fn width(self, width: u32) -> Self {
        self.set_size(SizeSpec::Width(width))
    }

    pub fn height(self, height: u32) -> Self {
        self.set_size(SizeSpec::Height(height))
    }

    pub fn scale(self, factor: f64) -> Self {
        self.set_size(SizeSpec::Scale {
            x: factor,
            y: factor,
        })
    }

    pub fn scale_xy(self, x: f64, y: f64) -> Self {
        self.set_size(SizeSpec::Scale { x, y })
    }

    pub fn keep_aspect_ratio(mut self, keep: bool) -> Self {
        self.fit = if keep {
            FitMode::PreserveAspect
        } else {
            FitMode::Exact
        };
        self
    }

    /// Format by name, case-insensitive: `"png"`, `"jpg"`, `"original"`...
    pub fn output_format(mut self, name: &str) -> Self {
        match OutputFormat::parse(name) {
            Ok(format) => self.format = format,
            Err(e) => self.fail(e),
        }
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn output_quality(mut self, quality: f32) -> Self {
        match Quality::new(quality) {
            Some(q) => self.quality = Some(q),
            None => self.fail(Error::argument(QUALITY_OUT_OF_RANGE)),
        }
        self
    }

    pub fn scaling_mode(mut self, mode: ScalingMode) -> Self {
        self.scaling = mode;
        self
    }

    pub fn use_exif_orientation(mut self, enabled: bool) -> Self {
        self.use_exif_orientation = enabled;
        self
    }

    pub fn allow_overwrite(mut self, allow: bool) -> Self {
        self.allow_overwrite = allow;
        self
    }

    /// Replace the codec used to decode and encode.
    pub fn codec(mut self, codec: impl Codec + 'a) -> Self {
        self.codec = Box::new(codec);
        self
    }

    /// Freeze the settings. Configuration errors surface here.
    fn freeze(&mut self) -> Result<ThumbnailParams> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        let size = self.size.ok_or_else(|| Error::state(SIZE_NOT_SPECIFIED))?;
        let params = ThumbnailParams {
            size,
            fit: self.fit,
            format: self.format,
            quality: self.quality,
            scaling: self.scaling,
            use_exif_orientation: self.use_exif_orientation,
            allow_overwrite: self.allow_overwrite,
        };
        params.validate()?;
        if self.sources.is_empty() {
            return Err(Error::argument(crate::error::NO_SOURCES));
        }
        Ok(params)
    }

    /// Freeze, run `check` against the sources, then start the run.
    fn start(
        mut self,
        check: impl FnOnce(&[ImageSource<'a>], &ThumbnailParams) -> Result<()>,
    ) -> Result<Run<'a>> {
        let params = self.freeze()?;
        check(&self.sources, &params)?;
        info!(sources = self.sources.len(), size = ?params.size, format = %params.format, "starting thumbnail run");
        Ok(Run {
            params,
            queue: SourceQueue::new(self.sources),
            codec: self.codec,
        })
    }

    // =====================================================================
    // In-memory terminals
    // =====================================================================

    /// The single thumbnail as a bitmap.
    pub fn as_image(self) -> Result<DynamicImage> {
        let mut run = self.start(|s, _| sink::require_single(s.len(), SingleSink::Image))?;
        run.next_image().unwrap_or(Err(Error::NoSuchElement))
    }

    /// All thumbnails as bitmaps, in source order.
    pub fn as_images(self) -> Result<Vec<DynamicImage>> {
        let run = self.start(|_, _| Ok(()))?;
        ThumbnailIter { run }.collect()
    }

    /// Lazy sequence: each pull reads and processes one source.
    pub fn iter_images(self) -> Result<ThumbnailIter<'a>> {
        Ok(ThumbnailIter {
            run: self.start(|_, _| Ok(()))?,
        })
    }

    // =====================================================================
    // File terminals
    // =====================================================================

    /// Write the single thumbnail to `path`. Returns the path actually
    /// written, which gains an extension when `path`'s does not match the
    /// output format.
    pub fn to_file(self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let destination = [path.to_path_buf()];
        let mut run = self.start(|s, params| {
            sink::require_single(s.len(), SingleSink::File)?;
            sink::require_file_formats(s, &destination, params.format)
        })?;
        let item = run.next_item().unwrap_or(Err(Error::NoSuchElement))?;
        run.write_file(&item, path)
    }

    /// Write one thumbnail per source to the matching destination.
    pub fn to_files<I, P>(self, destinations: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.as_files(destinations).map(|_| ())
    }

    /// Like [`to_files`](Self::to_files), returning the paths written.
    /// Destinations beyond the number of sources are not consumed.
    pub fn as_files<I, P>(self, destinations: I) -> Result<Vec<PathBuf>>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let count = self.sources.len();
        let destinations: Vec<PathBuf> = destinations.into_iter().map(Into::into).take(count).collect();
        let mut run = self.start(|s, params| {
            sink::require_destination_count(destinations.len(), count)?;
            sink::require_file_formats(s, &destinations, params.format)
        })?;
        let mut destinations = destinations.into_iter();
        run.write_all(|_, _| {
            destinations
                .next()
                .ok_or_else(|| Error::argument(crate::error::NOT_ENOUGH_DESTINATIONS))
        })
    }

    /// Write each thumbnail next to its original, renamed.
    pub fn to_files_renamed(self, rename: impl Rename) -> Result<()> {
        self.as_files_renamed(rename).map(|_| ())
    }

    pub fn as_files_renamed(self, rename: impl Rename) -> Result<Vec<PathBuf>> {
        self.named(None, &rename)
    }

    /// Write each thumbnail into `directory`, renamed.
    pub fn to_dir(self, directory: impl AsRef<Path>, rename: impl Rename) -> Result<()> {
        self.as_files_in_dir(directory, rename).map(|_| ())
    }

    pub fn as_files_in_dir(
        self,
        directory: impl AsRef<Path>,
        rename: impl Rename,
    ) -> Result<Vec<PathBuf>> {
        self.named(Some(directory.as_ref()), &rename)
    }

    fn named(self, directory: Option<&Path>, rename: &dyn Rename) -> Result<Vec<PathBuf>> {
        let mut run = self.start(|sources, _| {
            sink::require_file_sources(sources)?;
            directory.map_or(Ok(()), sink::require_directory)
        })?;
        run.write_all(|item, params| {
            let origin = item
                .origin_file
                .as_deref()
                .ok_or_else(|| Error::state(crate::error::SOURCES_NOT_FILES))?;
            Ok(sink::named_destination(origin, directory, rename, params))
        })
    }

    // =====================================================================
    // Stream terminals
    // =====================================================================

    /// Encode the single thumbnail into `writer`.
    pub fn to_writer<W: Write>(self, mut writer: W) -> Result<()> {
        let mut run = self.start(|s, params| {
            sink::require_single(s.len(), SingleSink::Stream)?;
            sink::require_stream_format(s, params.format)
        })?;
        let item = run.next_item().unwrap_or(Err(Error::NoSuchElement))?;
        run.write_stream(&item, &mut writer)
    }

    /// Encode one thumbnail per source into the matching writer.
    pub fn to_writers<I, W>(self, writers: I) -> Result<()>
    where
        I: IntoIterator<Item = W>,
        W: Write,
    {
        let count = self.sources.len();
        let mut run = self.start(|s, params| sink::require_stream_format(s, params.format))?;
        let writers = sink::take_destinations(writers, count)?;
        for mut writer in writers {
            let Some(item) = run.next_item() else { break };
            run.write_stream(&item?, &mut writer)?;
        }
        Ok(())
    }
}

/// A processed item: the thumbnail plus what is known about its origin.
struct Processed {
    image: DynamicImage,
    origin_file: Option<PathBuf>,
    origin_format: Option<ImageFormat>,
}

/// State of a started run: frozen params, remaining sources, codec.
struct Run<'a> {
    params: ThumbnailParams,
    queue: SourceQueue<'a>,
    codec: Box<dyn Codec + 'a>,
}

impl<'a> Run<'a> {
    /// Pull and process the next source.
    fn next_item(&mut self) -> Option<Result<Processed>> {
        let item = match self.queue.pull(&*self.codec)? {
            Ok(item) => item,
            Err(e) => return Some(Err(e)),
        };
        Some(self.process(item))
    }

    fn next_image(&mut self) -> Option<Result<DynamicImage>> {
        self.next_item().map(|r| r.map(|p| p.image))
    }

    fn process(&self, item: SourceItem) -> Result<Processed> {
        let SourceItem {
            image,
            origin_file,
            origin_name,
            format,
            orientation,
        } = item;
        debug!(
            origin = origin_name.as_deref().unwrap_or("-"),
            width = image.width(),
            height = image.height(),
            ?orientation,
            "processing"
        );
        let image = create_thumbnail(image, orientation, &self.params)?;
        Ok(Processed {
            image,
            origin_file,
            origin_format: format,
        })
    }

    fn write_file(&self, item: &Processed, destination: &Path) -> Result<PathBuf> {
        let format = sink::resolve_format(self.params.format, Some(destination), item.origin_format)?;
        let path = sink::reconcile_extension(destination, format);
        sink::check_overwrite(&path, self.params.allow_overwrite)?;
        let bytes = encode_thumbnail(&*self.codec, &item.image, format, &self.params)?;
        std::fs::write(&path, bytes)?;
        debug!(path = %path.display(), ?format, "wrote thumbnail");
        Ok(path)
    }

    fn write_stream(&self, item: &Processed, writer: &mut dyn Write) -> Result<()> {
        let format = sink::resolve_format(self.params.format, None, item.origin_format)?;
        let bytes = encode_thumbnail(&*self.codec, &item.image, format, &self.params)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Process every remaining source, writing each to the path chosen by
    /// `destination`. Existing files with overwriting off are skipped.
    fn write_all(
        &mut self,
        mut destination: impl FnMut(&Processed, &ThumbnailParams) -> Result<PathBuf>,
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        while let Some(item) = self.next_item() {
            let item = item?;
            let target = destination(&item, &self.params)?;
            match self.write_file(&item, &target) {
                Ok(path) => written.push(path),
                Err(Error::DestinationExists { path }) => {
                    warn!(path = %path.display(), "destination exists, skipping");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(written)
    }
}

/// Lazy thumbnail sequence from [`Thumbnails::iter_images`].
///
/// Each call to [`next`](Iterator::next) reads, decodes and resizes one
/// source. An error on one item does not affect items already returned,
/// and iteration may continue past it. Dropping the iterator leaves the
/// remaining sources unread.
pub struct ThumbnailIter<'a> {
    run: Run<'a>,
}

impl<'a> ThumbnailIter<'a> {
    /// Like `next`, but pulling past the end is [`Error::NoSuchElement`].
    pub fn try_next(&mut self) -> Result<DynamicImage> {
        self.next().unwrap_or(Err(Error::NoSuchElement))
    }

    /// Sources not yet processed.
    pub fn remaining(&self) -> usize {
        self.run.queue.remaining()
    }
}

impl Iterator for ThumbnailIter<'_> {
    type Item = Result<DynamicImage>;

    fn next(&mut self) -> Option<Self::Item> {
        self.run.next_image()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for ThumbnailIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockCodec, RecordedOp};
    use crate::naming::StandardRename;
    use crate::test_helpers::{gradient, write_png};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn mock_stream(spec: &str) -> ImageSource<'static> {
        ImageSource::stream(Cursor::new(spec.as_bytes().to_vec()))
    }

    // =====================================================================
    // Deferred configuration errors
    // =====================================================================

    #[test]
    fn missing_size_is_reported_by_terminal() {
        let err = Thumbnails::of([gradient(10, 10)]).as_image().unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert_eq!(err.to_string(), "Thumbnail size has not been specified.");
    }

    #[test]
    fn size_twice_is_state_error() {
        let err = Thumbnails::of([gradient(10, 10)])
            .size(5, 5)
            .scale(0.5)
            .as_image()
            .unwrap_err();
        assert_eq!(err.to_string(), "Thumbnail size has already been specified.");
    }

    #[test]
    fn width_then_height_forms_box() {
        let img = Thumbnails::of([gradient(200, 100)])
            .width(50)
            .height(50)
            .as_image()
            .unwrap();
        assert_eq!((img.width(), img.height()), (50, 25));
    }

    #[test]
    fn first_configuration_error_wins() {
        let err = Thumbnails::of([gradient(10, 10)])
            .size(5, 5)
            .output_quality(2.0)
            .output_format("nope")
            .as_image()
            .unwrap_err();
        assert_eq!(err.to_string(), "Output quality must be between 0.0 and 1.0.");
    }

    #[test]
    fn bad_format_name_reported() {
        let err = Thumbnails::of([gradient(10, 10)])
            .size(5, 5)
            .output_format("foo")
            .as_image()
            .unwrap_err();
        assert_eq!(err.to_string(), "Unsupported output format: foo.");
    }

    #[test]
    fn zero_size_and_bad_scale_rejected() {
        let err = Thumbnails::of([gradient(10, 10)])
            .size(0, 5)
            .as_image()
            .unwrap_err();
        assert_eq!(err.to_string(), "Width and height must be greater than 0.");

        let err = Thumbnails::of([gradient(10, 10)])
            .scale(0.0)
            .as_image()
            .unwrap_err();
        assert_eq!(err.to_string(), "Scaling factor must be greater than 0.");
    }

    #[test]
    fn exact_fit_needs_both_edges() {
        let err = Thumbnails::of([gradient(10, 10)])
            .width(5)
            .keep_aspect_ratio(false)
            .as_image()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Both width and height must be specified when not keeping the aspect ratio."
        );
    }

    #[test]
    fn no_sources_rejected() {
        let err = Thumbnails::new().size(5, 5).as_images().unwrap_err();
        assert_eq!(err.to_string(), "No source images were specified.");
    }

    // =====================================================================
    // Validation happens before any read
    // =====================================================================

    #[test]
    fn cardinality_checked_before_decoding() {
        let codec = MockCodec::new();
        let err = Thumbnails::of([mock_stream("mock:10x10"), mock_stream("mock:10x10")])
            .size(5, 5)
            .codec(&codec)
            .as_image()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot create one thumbnail from multiple original images."
        );
        assert!(codec.get_operations().is_empty());
    }

    #[test]
    fn naming_requires_file_sources() {
        let codec = MockCodec::new();
        let err = Thumbnails::of([mock_stream("mock:10x10")])
            .size(5, 5)
            .codec(&codec)
            .as_files_renamed(StandardRename::PrefixDotThumbnail)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert!(codec.get_operations().is_empty());
    }

    #[test]
    fn too_few_destinations_rejected_before_reading() {
        let codec = MockCodec::new();
        let tmp = TempDir::new().unwrap();
        let err = Thumbnails::of([mock_stream("mock:10x10"), mock_stream("mock:10x10")])
            .size(5, 5)
            .codec(&codec)
            .to_files([tmp.path().join("one.png")])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Not enough destinations provided for the number of sources."
        );
        assert!(codec.get_operations().is_empty());
        assert!(!tmp.path().join("one.png").exists());
    }

    #[test]
    fn bitmap_to_stream_needs_format_before_reading() {
        let codec = MockCodec::new();
        let mut a = Vec::new();
        let mut b = Vec::new();
        let err = Thumbnails::new()
            .source(mock_stream("mock:10x10"))
            .source(gradient(10, 10))
            .size(5, 5)
            .codec(&codec)
            .to_writers([&mut a, &mut b])
            .unwrap_err();
        assert_eq!(err.to_string(), "Output format not specified.");
        assert!(codec.get_operations().is_empty());
        assert!(a.is_empty());
    }

    #[test]
    fn bitmap_to_bare_file_name_fails_before_writing_siblings() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("a.png");
        let err = Thumbnails::of([gradient(40, 20), gradient(20, 40)])
            .size(10, 10)
            .as_files([first.clone(), tmp.path().join("b")])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert_eq!(err.to_string(), "Output format not specified.");
        assert!(!first.exists());
    }

    #[test]
    fn bitmap_to_single_bare_file_name_rejected() {
        let tmp = TempDir::new().unwrap();
        let err = Thumbnails::of([gradient(40, 20)])
            .size(10, 10)
            .to_file(tmp.path().join("out"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Output format not specified.");
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn unwritable_format_rejected_before_reading() {
        let codec = MockCodec::new();
        let mut out = Vec::new();
        let err = Thumbnails::of([mock_stream("mock:10x10")])
            .size(5, 5)
            .output_format("dds")
            .codec(&codec)
            .to_writer(&mut out)
            .unwrap_err();
        assert_eq!(err.to_string(), "Unsupported output format: dds.");
        assert!(codec.get_operations().is_empty());

        let err = Thumbnails::of([mock_stream("mock:10x10")])
            .size(5, 5)
            .format(OutputFormat::Format(ImageFormat::Dds))
            .codec(&codec)
            .as_images()
            .unwrap_err();
        assert!(err.is_validation());
        assert!(codec.get_operations().is_empty());
    }

    // =====================================================================
    // Running
    // =====================================================================

    #[test]
    fn as_images_keeps_source_order() {
        let images = Thumbnails::of([gradient(100, 50), gradient(50, 100)])
            .size(10, 10)
            .as_images()
            .unwrap();
        let dims: Vec<_> = images.iter().map(|i| (i.width(), i.height())).collect();
        assert_eq!(dims, vec![(10, 5), (5, 10)]);
    }

    #[test]
    fn bitmap_terminals_skip_encoding() {
        let codec = MockCodec::new();
        Thumbnails::of([mock_stream("mock:40x20")])
            .size(10, 10)
            .codec(&codec)
            .as_image()
            .unwrap();
        assert_eq!(
            codec.get_operations(),
            vec![RecordedOp::Decode("mock:40x20".into())]
        );
    }

    #[test]
    fn iterator_is_lazy() {
        let codec = MockCodec::new();
        let mut iter = Thumbnails::of([mock_stream("mock:40x20"), mock_stream("mock:20x40")])
            .size(10, 10)
            .codec(&codec)
            .iter_images()
            .unwrap();
        assert_eq!(iter.len(), 2);
        assert!(codec.get_operations().is_empty());

        let first = iter.try_next().unwrap();
        assert_eq!((first.width(), first.height()), (10, 5));
        assert_eq!(codec.get_operations().len(), 1);

        let second = iter.next().unwrap().unwrap();
        assert_eq!((second.width(), second.height()), (5, 10));
        assert!(iter.next().is_none());
        assert!(matches!(iter.try_next(), Err(Error::NoSuchElement)));
    }

    #[test]
    fn iterator_error_does_not_poison_later_items() {
        let codec = MockCodec::new();
        let mut iter = Thumbnails::of([
            mock_stream("mock:10x10"),
            mock_stream("broken"),
            mock_stream("mock:30x30"),
        ])
        .size(5, 5)
        .codec(&codec)
        .iter_images()
        .unwrap();
        assert!(iter.next().unwrap().is_ok());
        assert!(matches!(iter.next().unwrap(), Err(Error::Decode { .. })));
        assert!(iter.next().unwrap().is_ok());
    }

    #[test]
    fn eager_call_aborts_on_decode_error() {
        let codec = MockCodec::new();
        let err = Thumbnails::of([mock_stream("broken"), mock_stream("mock:30x30")])
            .size(5, 5)
            .codec(&codec)
            .as_images()
            .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
        assert_eq!(codec.get_operations().len(), 1);
    }

    #[test]
    fn mock_orientation_swaps_dimensions() {
        let img = Thumbnails::of([mock_stream("mock:40x20@6")])
            .size(10, 10)
            .codec(MockCodec::new())
            .as_image()
            .unwrap();
        assert_eq!((img.width(), img.height()), (5, 10));

        let img = Thumbnails::of([mock_stream("mock:40x20@6")])
            .size(10, 10)
            .use_exif_orientation(false)
            .codec(MockCodec::new())
            .as_image()
            .unwrap();
        assert_eq!((img.width(), img.height()), (10, 5));
    }

    #[test]
    fn force_size_distorts() {
        let img = Thumbnails::of([gradient(100, 50)])
            .force_size(30, 30)
            .as_image()
            .unwrap();
        assert_eq!((img.width(), img.height()), (30, 30));
    }

    #[test]
    fn scale_xy_scales_independently() {
        let img = Thumbnails::of([gradient(100, 50)])
            .scale_xy(0.5, 0.2)
            .as_image()
            .unwrap();
        assert_eq!((img.width(), img.height()), (50, 10));
    }

    #[test]
    fn to_writer_uses_origin_format_when_undetermined() {
        let codec = MockCodec::new();
        let mut out = Vec::new();
        Thumbnails::of([mock_stream("mock:40x20")])
            .size(10, 10)
            .codec(&codec)
            .to_writer(&mut out)
            .unwrap();
        // The mock sniffs everything as PNG.
        assert_eq!(out, b"10x5.png");
    }

    #[test]
    fn to_writer_passes_quality() {
        let codec = MockCodec::new();
        let mut out = Vec::new();
        Thumbnails::of([gradient(40, 20)])
            .size(10, 10)
            .output_format("jpeg")
            .output_quality(0.7)
            .codec(&codec)
            .to_writer(&mut out)
            .unwrap();
        assert_eq!(
            codec.get_operations(),
            vec![RecordedOp::Encode {
                width: 10,
                height: 5,
                format: ImageFormat::Jpeg,
                quality: Some(70),
            }]
        );
    }

    #[test]
    fn to_writers_one_per_source() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        Thumbnails::of([mock_stream("mock:40x20"), mock_stream("mock:20x40")])
            .size(10, 10)
            .codec(MockCodec::new())
            .to_writers([&mut a, &mut b])
            .unwrap();
        assert_eq!(a, b"10x5.png");
        assert_eq!(b, b"5x10.png");
    }

    #[test]
    fn to_file_appends_extension_and_returns_path() {
        let tmp = TempDir::new().unwrap();
        let written = Thumbnails::of([gradient(40, 20)])
            .size(10, 10)
            .output_format("png")
            .to_file(tmp.path().join("thumb.jpg"))
            .unwrap();
        assert_eq!(written, tmp.path().join("thumb.jpg.png"));
        assert!(written.exists());
    }

    #[test]
    fn renamed_files_land_next_to_originals() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.png");
        let b = tmp.path().join("b.png");
        write_png(&a, 40, 20);
        write_png(&b, 20, 40);

        let written = Thumbnails::of([&a, &b].map(|p| p.as_path()))
            .size(10, 10)
            .as_files_renamed(StandardRename::SuffixHyphenThumbnail)
            .unwrap();
        assert_eq!(
            written,
            vec![tmp.path().join("a-thumbnail.png"), tmp.path().join("b-thumbnail.png")]
        );
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn to_dir_requires_existing_directory() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.png");
        write_png(&a, 40, 20);
        let err = Thumbnails::of([a.as_path()])
            .size(10, 10)
            .to_dir(tmp.path().join("missing"), StandardRename::NoChange)
            .unwrap_err();
        assert_eq!(err.to_string(), "Given destination is not a directory.");
    }

    #[test]
    fn as_files_skips_existing_when_overwrite_disabled() {
        let tmp = TempDir::new().unwrap();
        let existing = tmp.path().join("first.png");
        std::fs::write(&existing, b"keep me").unwrap();
        let fresh = tmp.path().join("second.png");

        let written = Thumbnails::of([gradient(40, 20), gradient(20, 40)])
            .size(10, 10)
            .allow_overwrite(false)
            .as_files([existing.clone(), fresh.clone()])
            .unwrap();
        assert_eq!(written, vec![fresh.clone()]);
        assert_eq!(std::fs::read(&existing).unwrap(), b"keep me");
        assert!(fresh.exists());
    }

    #[test]
    fn to_file_fails_when_destination_exists_and_overwrite_disabled() {
        let tmp = TempDir::new().unwrap();
        let existing = tmp.path().join("thumb.png");
        std::fs::write(&existing, b"keep me").unwrap();
        let err = Thumbnails::of([gradient(40, 20)])
            .size(10, 10)
            .allow_overwrite(false)
            .to_file(&existing)
            .unwrap_err();
        assert_eq!(err.to_string(), "The destination file exists.");
        assert_eq!(std::fs::read(&existing).unwrap(), b"keep me");
    }
}
