//! sysfont-core: read the system font configuration one font at a time
//!
//! The system font configuration (`/system/etc/fonts.xml`) lists font
//! families, each holding one or more `font` entries:
//!
//! ```xml
//! <familyset>
//!     <family lang="ja">
//!         <font weight="400" style="normal" index="1">NotoSansCJK-Regular.ttc
//!             <axis tag="wght" stylevalue="400"/>
//!         </font>
//!     </family>
//! </familyset>
//! ```
//!
//! [`SystemFontIterator`] walks those entries in document order and yields a
//! [`FontRecord`] per font whose file is installed under the font directory.
//! Malformed attributes fall back to defaults (weight 400, upright,
//! collection index 0); malformed axes are dropped. A missing or broken
//! configuration simply yields nothing.
//!
//! ```rust,no_run
//! use sysfont_core::SystemFontIterator;
//!
//! for font in SystemFontIterator::open() {
//!     println!(
//!         "{} weight={} italic={} locale={:?}",
//!         font.file_path().display(),
//!         font.weight(),
//!         font.is_italic(),
//!         font.locale(),
//!     );
//! }
//! ```
//!
//! Other locations and interpretations are chosen through
//! [`SystemFontsConfig`]; [`query::FontQuery`] and [`output`] support
//! listing tools.

pub mod availability;
pub mod config;
pub mod discovery;
pub mod document;
pub mod iter;
pub mod output;
pub mod query;
pub mod record;
pub mod tags;

pub use availability::{FileSystemAvailability, FontAvailability};
pub use config::{LocaleSource, SystemFontsConfig};
pub use document::FontsDocument;
pub use iter::SystemFontIterator;
pub use record::{FontAxis, FontRecord};
