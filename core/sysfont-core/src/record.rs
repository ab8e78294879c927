//! Font records extracted from `font` elements

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use read_fonts::types::Tag;
use serde::{Deserialize, Serialize};

use crate::config::LocaleSource;
use crate::document::{FontsDocument, NodeId};
use crate::tags::{axis_tag, parse_tag, tag_to_string};

pub const DEFAULT_WEIGHT: u16 = 400;

const AXIS_TAG: &str = "axis";
const XML_SPACES: &[char] = &[' ', '\r', '\n', '\t'];

/// One variable-font axis setting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontAxis {
    #[serde(serialize_with = "serialize_tag", deserialize_with = "deserialize_tag")]
    pub tag: Tag,
    pub value: f32,
}

/// Snapshot of one `font` entry, independent of the document it came from.
///
/// Records own all of their data, so they outlive both the iterator and the
/// parsed document. They also serialize to JSON, with axis tags written as
/// plain strings, and read back to the same record:
///
/// ```
/// use std::path::Path;
/// use std::sync::Arc;
///
/// use sysfont_core::{FontRecord, FontsDocument, SystemFontIterator, SystemFontsConfig};
///
/// let doc = FontsDocument::parse(
///     r#"<familyset><family lang="en"><font style="italic">Serif.ttf<axis tag="opsz" stylevalue="12"/></font></family></familyset>"#,
/// );
/// let config = SystemFontsConfig::default().with_font_dir("/fonts/");
/// let font = SystemFontIterator::from_document(Arc::new(doc), &config)
///     .next()
///     .unwrap();
///
/// assert_eq!(font.file_path(), Path::new("/fonts/Serif.ttf"));
/// assert!(font.is_italic());
///
/// let json = serde_json::to_string(&font)?;
/// assert!(json.contains(r#""tag":"opsz""#));
/// assert_eq!(serde_json::from_str::<FontRecord>(&json)?, font);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontRecord {
    file_path: PathBuf,
    weight: u16,
    italic: bool,
    collection_index: u32,
    locale: Option<String>,
    axes: Vec<FontAxis>,
}

impl FontRecord {
    /// Extract a record from a `font` element.
    ///
    /// Every field is read on its own; a malformed attribute falls back to
    /// its default without affecting the others.
    pub fn from_node(
        doc: &FontsDocument,
        font: NodeId,
        font_dir: &Path,
        locale_source: LocaleSource,
    ) -> Self {
        let locale_node = match locale_source {
            LocaleSource::Family => doc.parent(font),
            LocaleSource::DocumentParent => None,
        };

        Self {
            file_path: prefixed_path(font_dir, xml_trim(doc.text(font))),
            weight: parse_or(doc.attribute(font, "weight"), DEFAULT_WEIGHT),
            italic: doc.attribute(font, "style") == Some("italic"),
            collection_index: parse_or(doc.attribute(font, "index"), 0),
            locale: locale_node
                .and_then(|node| doc.attribute(node, "lang"))
                .map(str::to_string),
            axes: doc
                .children_named(font, AXIS_TAG)
                .filter_map(|axis| parse_axis(doc, axis))
                .collect(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn weight(&self) -> u16 {
        self.weight
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    pub fn collection_index(&self) -> u32 {
        self.collection_index
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn axes(&self) -> &[FontAxis] {
        &self.axes
    }

    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Tag of the axis at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.axis_count()`.
    pub fn axis_tag(&self, index: usize) -> Tag {
        self.axis(index).tag
    }

    /// Value of the axis at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.axis_count()`.
    pub fn axis_value(&self, index: usize) -> f32 {
        self.axis(index).value
    }

    fn axis(&self, index: usize) -> &FontAxis {
        let count = self.axes.len();
        self.axes
            .get(index)
            .unwrap_or_else(|| panic!("axis index {index} is out of bounds (< {count})"))
    }

    /// Render the path, appending `#<index>` for non-zero collection indices.
    pub fn path_with_index(&self) -> String {
        if self.collection_index != 0 {
            format!("{}#{}", self.file_path.display(), self.collection_index)
        } else {
            self.file_path.display().to_string()
        }
    }
}

fn parse_axis(doc: &FontsDocument, axis: NodeId) -> Option<FontAxis> {
    let tag = axis_tag(doc.attribute(axis, "tag")?)?;
    let value = doc.attribute(axis, "stylevalue")?.trim().parse::<f32>().ok()?;
    Some(FontAxis { tag, value })
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|value| value.trim_matches(XML_SPACES).parse().ok())
        .unwrap_or(default)
}

pub(crate) fn xml_trim(raw: &str) -> &str {
    raw.trim_matches(XML_SPACES)
}

/// Append `name` to `dir` as plain concatenation, adding a separator only
/// when `dir` does not already end with one.
pub(crate) fn prefixed_path(dir: &Path, name: &str) -> PathBuf {
    let mut joined = OsString::from(dir.as_os_str());
    let has_separator = dir
        .as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator);
    if !has_separator && !dir.as_os_str().is_empty() {
        joined.push(std::path::MAIN_SEPARATOR_STR);
    }
    joined.push(name);
    PathBuf::from(joined)
}

fn serialize_tag<S>(tag: &Tag, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    tag_to_string(*tag).serialize(serializer)
}

fn deserialize_tag<'de, D>(deserializer: D) -> Result<Tag, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_tag(&raw).map_err(serde::de::Error::custom)
}
