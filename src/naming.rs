//! Destination filename strategies.
//!
//! Two shapes exist:
//!
//! - A [`Rename`] maps an original filename (plus the run's parameters) to a
//!   new filename. Closures work directly; [`StandardRename`] covers the
//!   common prefix/suffix conventions.
//! - [`NumberedFilenames`] generates names from a running index and ignores
//!   original names entirely. It is an endless iterator of paths, meant for
//!   the explicit-destination terminals, which take only as many as needed.
//!
//! ## Standard renames
//!
//! | Variant | `photo.jpg` becomes |
//! |---|---|
//! | `NoChange` | `photo.jpg` |
//! | `PrefixDotThumbnail` | `thumbnail.photo.jpg` |
//! | `PrefixHyphenThumbnail` | `thumbnail-photo.jpg` |
//! | `SuffixDotThumbnail` | `photo.thumbnail.jpg` |
//! | `SuffixHyphenThumbnail` | `photo-thumbnail.jpg` |

use crate::imaging::ThumbnailParams;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Maps an original filename to a destination filename.
pub trait Rename {
    fn apply(&self, name: &str, params: &ThumbnailParams) -> String;
}

impl<F> Rename for F
where
    F: Fn(&str, &ThumbnailParams) -> String,
{
    fn apply(&self, name: &str, params: &ThumbnailParams) -> String {
        self(name, params)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StandardRename {
    NoChange,
    #[default]
    PrefixDotThumbnail,
    PrefixHyphenThumbnail,
    SuffixDotThumbnail,
    SuffixHyphenThumbnail,
}

impl StandardRename {
    pub const ALL: [StandardRename; 5] = [
        StandardRename::NoChange,
        StandardRename::PrefixDotThumbnail,
        StandardRename::PrefixHyphenThumbnail,
        StandardRename::SuffixDotThumbnail,
        StandardRename::SuffixHyphenThumbnail,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StandardRename::NoChange => "no-change",
            StandardRename::PrefixDotThumbnail => "prefix-dot-thumbnail",
            StandardRename::PrefixHyphenThumbnail => "prefix-hyphen-thumbnail",
            StandardRename::SuffixDotThumbnail => "suffix-dot-thumbnail",
            StandardRename::SuffixHyphenThumbnail => "suffix-hyphen-thumbnail",
        }
    }
}

impl Rename for StandardRename {
    fn apply(&self, name: &str, _params: &ThumbnailParams) -> String {
        match self {
            StandardRename::NoChange => name.to_string(),
            StandardRename::PrefixDotThumbnail => format!("thumbnail.{name}"),
            StandardRename::PrefixHyphenThumbnail => format!("thumbnail-{name}"),
            StandardRename::SuffixDotThumbnail => insert_before_extension(name, ".thumbnail"),
            StandardRename::SuffixHyphenThumbnail => insert_before_extension(name, "-thumbnail"),
        }
    }
}

impl fmt::Display for StandardRename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StandardRename {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown rename '{s}'"))
    }
}

/// `photo.jpg` + `-x` → `photo-x.jpg`. A leading dot does not start an
/// extension, so `.hidden` + `-x` → `.hidden-x`.
fn insert_before_extension(name: &str, suffix: &str) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}{suffix}{}", &name[..dot], &name[dot..]),
        _ => format!("{name}{suffix}"),
    }
}

/// Endless sequence of paths built from a `{}` pattern and a running index.
///
/// ```
/// use simple_thumb::NumberedFilenames;
///
/// let mut names = NumberedFilenames::new("out", "thumbnail-{}.png", 0);
/// assert_eq!(names.next().unwrap(), std::path::Path::new("out/thumbnail-0.png"));
/// assert_eq!(names.next().unwrap(), std::path::Path::new("out/thumbnail-1.png"));
/// ```
#[derive(Debug, Clone)]
pub struct NumberedFilenames {
    directory: PathBuf,
    pattern: String,
    next: u64,
}

impl NumberedFilenames {
    /// A pattern without `{}` gets `-N` inserted before its extension.
    pub fn new(directory: impl Into<PathBuf>, pattern: impl Into<String>, start: u64) -> Self {
        Self {
            directory: directory.into(),
            pattern: pattern.into(),
            next: start,
        }
    }

    fn name_for(&self, index: u64) -> String {
        if self.pattern.contains("{}") {
            self.pattern.replacen("{}", &index.to_string(), 1)
        } else {
            insert_before_extension(&self.pattern, &format!("-{index}"))
        }
    }
}

impl Iterator for NumberedFilenames {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        let path = self.directory.join(self.name_for(self.next));
        self.next = self.next.checked_add(1)?;
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::SizeSpec;
    use std::path::Path;

    fn params() -> ThumbnailParams {
        ThumbnailParams::new(SizeSpec::Width(100))
    }

    #[test]
    fn standard_renames() {
        let p = params();
        let cases = [
            (StandardRename::NoChange, "photo.jpg"),
            (StandardRename::PrefixDotThumbnail, "thumbnail.photo.jpg"),
            (StandardRename::PrefixHyphenThumbnail, "thumbnail-photo.jpg"),
            (StandardRename::SuffixDotThumbnail, "photo.thumbnail.jpg"),
            (StandardRename::SuffixHyphenThumbnail, "photo-thumbnail.jpg"),
        ];
        for (rename, expected) in cases {
            assert_eq!(rename.apply("photo.jpg", &p), expected, "{rename}");
        }
    }

    #[test]
    fn suffix_without_extension() {
        let p = params();
        assert_eq!(StandardRename::SuffixDotThumbnail.apply("photo", &p), "photo.thumbnail");
        assert_eq!(
            StandardRename::SuffixHyphenThumbnail.apply(".hidden", &p),
            ".hidden-thumbnail"
        );
    }

    #[test]
    fn suffix_goes_before_last_extension_only() {
        let p = params();
        assert_eq!(
            StandardRename::SuffixHyphenThumbnail.apply("archive.tar.png", &p),
            "archive.tar-thumbnail.png"
        );
    }

    #[test]
    fn closure_is_a_rename() {
        let upper = |name: &str, _: &ThumbnailParams| name.to_uppercase();
        assert_eq!(upper.apply("a.png", &params()), "A.PNG");
    }

    #[test]
    fn closure_sees_params() {
        let sized = |name: &str, p: &ThumbnailParams| match p.size {
            SizeSpec::Width(w) => format!("w{w}-{name}"),
            _ => name.to_string(),
        };
        assert_eq!(sized.apply("a.png", &params()), "w100-a.png");
    }

    #[test]
    fn standard_rename_parses_and_displays() {
        for rename in StandardRename::ALL {
            assert_eq!(rename.to_string().parse::<StandardRename>(), Ok(rename));
        }
        assert_eq!(
            "Suffix-Dot-Thumbnail".parse::<StandardRename>(),
            Ok(StandardRename::SuffixDotThumbnail)
        );
        assert!("thumbnailify".parse::<StandardRename>().is_err());
    }

    #[test]
    fn standard_rename_serde_uses_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            rename: StandardRename,
        }
        let w: Wrapper = toml::from_str(r#"rename = "suffix-hyphen-thumbnail""#).unwrap();
        assert_eq!(w.rename, StandardRename::SuffixHyphenThumbnail);
    }

    #[test]
    fn numbered_filenames_start_index() {
        let names: Vec<_> = NumberedFilenames::new("d", "t{}.jpg", 5).take(3).collect();
        assert_eq!(
            names,
            vec![
                Path::new("d/t5.jpg").to_path_buf(),
                Path::new("d/t6.jpg").to_path_buf(),
                Path::new("d/t7.jpg").to_path_buf(),
            ]
        );
    }

    #[test]
    fn numbered_filenames_without_placeholder() {
        let mut names = NumberedFilenames::new("", "thumb.png", 0);
        assert_eq!(names.next().unwrap(), Path::new("thumb-0.png"));
        assert_eq!(names.next().unwrap(), Path::new("thumb-1.png"));
    }
}
