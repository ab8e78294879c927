//! The one codec for axis tags, shared by the parser, serde and the CLI
//!
//! An `axis` element's `tag` attribute is taken byte for byte: whatever four
//! bytes it holds become the tag, first byte most significant. Tags always
//! print back to the same text they were read from, so anything written by
//! [`tag_to_string`] goes back through [`parse_tag`] unchanged.
//!
//! A [`Tag`] built some other way may hold bytes that are not UTF-8. Those
//! print as `0x` plus eight hex digits, which can never be mistaken for a
//! four-byte tag, and [`parse_tag`] reads that form too.

use anyhow::{anyhow, Result};
use read_fonts::types::Tag;

const HEX_PREFIX: &str = "0x";

/// Pack the `tag` attribute of an `axis` element.
///
/// The value must be exactly four bytes. No padding, no character-class check.
/// Note that this counts bytes, so two accented letters already make a tag.
///
/// ```
/// use sysfont_core::tags::{axis_tag, tag_to_string};
///
/// let wght = axis_tag("wght").unwrap();
/// assert_eq!(u32::from_be_bytes(wght.to_be_bytes()), 0x7767_6874);
///
/// assert!(axis_tag("wdt").is_none());
/// assert_eq!(tag_to_string(axis_tag("éé").unwrap()), "éé");
/// ```
pub fn axis_tag(raw: &str) -> Option<Tag> {
    let bytes: [u8; 4] = raw.as_bytes().try_into().ok()?;
    Some(Tag::from_be_bytes(bytes))
}

/// Like [`axis_tag`], but also accepts the `0x` form and says what went wrong.
pub fn parse_tag(raw: &str) -> Result<Tag> {
    if let Some(tag) = axis_tag(raw) {
        return Ok(tag);
    }

    if let Some(hex) = raw.strip_prefix(HEX_PREFIX).filter(|hex| hex.len() == 8) {
        return u32::from_str_radix(hex, 16)
            .map(Tag::from_u32)
            .map_err(|_| anyhow!("invalid hex axis tag: {raw}"));
    }

    Err(anyhow!("axis tag must be exactly 4 bytes: {raw:?}"))
}

pub fn tag_to_string(tag: Tag) -> String {
    let bytes = tag.to_be_bytes();
    match std::str::from_utf8(&bytes) {
        Ok(text) => text.to_string(),
        Err(_) => format!("{HEX_PREFIX}{:08X}", u32::from_be_bytes(bytes)),
    }
}
