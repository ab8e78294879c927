//! Lazy iteration over the `font` entries of the system font configuration

use std::iter::FusedIterator;
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, trace};

use crate::availability::{FileSystemAvailability, FontAvailability};
use crate::config::{LocaleSource, SystemFontsConfig};
use crate::document::{FontsDocument, NodeId};
use crate::record::FontRecord;

const FAMILY_TAG: &str = "family";
const FONT_TAG: &str = "font";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Unstarted,
    AtNode(NodeId),
    Exhausted,
}

/// Forward-only iterator over installed system fonts.
///
/// Walks `family` elements of the document root and the `font` elements
/// inside each family, in document order. Entries whose file is not
/// installed are skipped, except for the very first entry, which is yielded
/// as found. The document is released as soon as the iterator runs out.
pub struct SystemFontIterator<A = FileSystemAvailability> {
    document: Option<Arc<FontsDocument>>,
    cursor: Cursor,
    font_dir: PathBuf,
    locale_source: LocaleSource,
    availability: A,
}

impl SystemFontIterator {
    /// Iterate `/system/etc/fonts.xml`.
    pub fn open() -> Self {
        Self::open_with(&SystemFontsConfig::default())
    }

    pub fn open_with(config: &SystemFontsConfig) -> Self {
        let document = FontsDocument::load(&config.config_path);
        Self::from_document(Arc::new(document), config)
    }

    /// Iterate an already parsed document, resolving paths against `config.font_dir`.
    pub fn from_document(document: Arc<FontsDocument>, config: &SystemFontsConfig) -> Self {
        Self {
            document: Some(document),
            cursor: Cursor::Unstarted,
            font_dir: config.font_dir.clone(),
            locale_source: config.locale_source,
            availability: FileSystemAvailability,
        }
    }
}

impl<A: FontAvailability> SystemFontIterator<A> {
    /// Replace the installed-file check.
    pub fn with_availability<B: FontAvailability>(self, availability: B) -> SystemFontIterator<B> {
        SystemFontIterator {
            document: self.document,
            cursor: self.cursor,
            font_dir: self.font_dir,
            locale_source: self.locale_source,
            availability,
        }
    }

    /// True once the iterator has run out and dropped its document.
    pub fn is_exhausted(&self) -> bool {
        self.cursor == Cursor::Exhausted
    }

    /// Release the iterator and whatever document it still holds.
    pub fn close(self) {}

    fn exhaust(&mut self) -> Option<FontRecord> {
        debug!("font configuration exhausted");
        self.cursor = Cursor::Exhausted;
        self.document = None;
        None
    }

    fn record_for(&self, document: &FontsDocument, font: NodeId) -> FontRecord {
        FontRecord::from_node(document, font, &self.font_dir, self.locale_source)
    }
}

impl<A: FontAvailability> Iterator for SystemFontIterator<A> {
    type Item = FontRecord;

    fn next(&mut self) -> Option<FontRecord> {
        let document = self.document.clone()?;

        match self.cursor {
            Cursor::Exhausted => None,
            Cursor::Unstarted => match first_font(&document) {
                None => self.exhaust(),
                Some(font) => {
                    self.cursor = Cursor::AtNode(font);
                    Some(self.record_for(&document, font))
                }
            },
            Cursor::AtNode(mut current) => loop {
                let Some(font) = next_font(&document, current) else {
                    return self.exhaust();
                };
                self.cursor = Cursor::AtNode(font);
                current = font;

                let record = self.record_for(&document, font);
                if self.availability.is_available(record.file_path()) {
                    return Some(record);
                }
                debug!(
                    "skipping {}: font file is not installed",
                    record.file_path().display()
                );
            },
        }
    }
}

impl<A: FontAvailability> FusedIterator for SystemFontIterator<A> {}

/// First `font` of the first `family` that has one.
fn first_font(document: &FontsDocument) -> Option<NodeId> {
    let root = document.root()?;
    document
        .children_named(root, FAMILY_TAG)
        .find_map(|family| document.first_child(family, FONT_TAG))
}

/// The `font` after `current`: its next sibling font, else the first font
/// of the nearest following family that has any.
fn next_font(document: &FontsDocument, current: NodeId) -> Option<NodeId> {
    if let Some(font) = document.next_sibling(current, FONT_TAG) {
        return Some(font);
    }

    let mut family = document.parent(current)?;
    loop {
        family = document.next_sibling(family, FAMILY_TAG)?;
        trace!("advancing to next family");
        if let Some(font) = document.first_child(family, FONT_TAG) {
            return Some(font);
        }
    }
}
