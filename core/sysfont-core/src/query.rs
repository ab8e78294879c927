//! Record filtering for listing tools

use std::collections::HashSet;
use std::ops::RangeInclusive;

use anyhow::{anyhow, Context, Result};
use read_fonts::types::Tag;
use regex::Regex;

use crate::record::FontRecord;
use crate::tags::parse_tag;

/// Narrow down what the iterator yields, the way `sysfont list` does.
///
/// An empty query lets everything through. Each `with_*` call adds one more
/// condition, and a record has to pass all of them. Within a single
/// condition, though, any listed locale or any path pattern is enough.
///
/// ```
/// use std::path::Path;
/// use std::sync::Arc;
///
/// use sysfont_core::query::{parse_tag_list, FontQuery};
/// use sysfont_core::{FontsDocument, SystemFontIterator, SystemFontsConfig};
///
/// let doc = FontsDocument::parse(
///     r#"<familyset>
///         <family lang="ja"><font weight="700">Bold.ttf<axis tag="wght" stylevalue="700"/></font></family>
///         <family lang="ko"><font>Regular.ttf</font></family>
///     </familyset>"#,
/// );
/// let config = SystemFontsConfig::default().with_font_dir("/fonts");
/// let query = FontQuery::new()
///     .with_axes(parse_tag_list(&["wght".to_string()])?)
///     .with_weight_range(600..=900);
///
/// let matched: Vec<_> = SystemFontIterator::from_document(Arc::new(doc), &config)
///     .with_availability(|_: &Path| true)
///     .filter(|font| query.matches(font))
///     .collect();
///
/// assert_eq!(matched.len(), 1);
/// assert_eq!(matched[0].locale(), Some("ja"));
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FontQuery {
    axes: Vec<Tag>,
    locales: Vec<String>,
    path_patterns: Vec<Regex>,
    italic: Option<bool>,
    weights: Option<RangeInclusive<u16>>,
}

impl FontQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_axes(mut self, axes: Vec<Tag>) -> Self {
        self.axes = axes;
        self
    }

    /// Accept records whose locale equals any of `locales`.
    pub fn with_locales(mut self, locales: Vec<String>) -> Self {
        self.locales = locales;
        self
    }

    pub fn with_path_patterns(mut self, patterns: Vec<Regex>) -> Self {
        self.path_patterns = patterns;
        self
    }

    /// `Some(true)` keeps italics only, `Some(false)` upright only.
    pub fn with_italic(mut self, italic: Option<bool>) -> Self {
        self.italic = italic;
        self
    }

    pub fn with_weight_range(mut self, weights: RangeInclusive<u16>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Check whether `record` satisfies every configured filter.
    pub fn matches(&self, record: &FontRecord) -> bool {
        if let Some(italic) = self.italic {
            if record.is_italic() != italic {
                return false;
            }
        }

        if let Some(weights) = &self.weights {
            if !weights.contains(&record.weight()) {
                return false;
            }
        }

        if !self.axes.is_empty() {
            let present: HashSet<Tag> = record.axes().iter().map(|axis| axis.tag).collect();
            if !self.axes.iter().all(|tag| present.contains(tag)) {
                return false;
            }
        }

        if !self.locales.is_empty() {
            match record.locale() {
                Some(locale) if self.locales.iter().any(|l| l == locale) => {}
                _ => return false,
            }
        }

        if !self.path_patterns.is_empty() {
            let path = record.file_path().to_string_lossy();
            if !self.path_patterns.iter().any(|re| re.is_match(&path)) {
                return false;
            }
        }

        true
    }
}

/// Parse a collection of tag strings into `Tag`s, rejecting anything that is not 4 bytes.
pub fn parse_tag_list(raw: &[String]) -> Result<Vec<Tag>> {
    raw.iter().map(|s| parse_tag(s)).collect()
}

/// Parse `700` or `300-500` into an inclusive weight range.
pub fn parse_weight_range(input: &str) -> Result<RangeInclusive<u16>> {
    let input = input.trim();
    let (lo, hi) = match input.split_once('-') {
        Some((lo, hi)) => (parse_weight(lo)?, parse_weight(hi)?),
        None => {
            let weight = parse_weight(input)?;
            (weight, weight)
        }
    };

    if lo > hi {
        return Err(anyhow!("weight range is reversed: {input}"));
    }
    Ok(lo..=hi)
}

fn parse_weight(token: &str) -> Result<u16> {
    token
        .trim()
        .parse()
        .with_context(|| format!("invalid weight: {token}"))
}
