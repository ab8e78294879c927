//! C bindings for sysfont-core
//!
//! Handle-based surface over [`SystemFontIterator`]: every iterator and every
//! font returned through this API is owned by the caller and must be released
//! with the matching `*_close` function. Passing a null handle anywhere is a
//! programming error and aborts the process.

use std::ffi::{c_char, CStr, CString};
use std::path::PathBuf;
use std::ptr;

use sysfont_core::{FontRecord, SystemFontIterator, SystemFontsConfig};

/// Opaque iterator handle.
pub struct SysFontIterator {
    inner: SystemFontIterator,
}

/// Opaque font handle. Keeps NUL-terminated copies of the string fields so
/// the returned pointers stay valid until the font is closed.
pub struct SysFont {
    record: FontRecord,
    file_path: CString,
    locale: Option<CString>,
}

impl SysFont {
    fn new(record: FontRecord) -> Self {
        let file_path = to_cstring(&record.file_path().to_string_lossy());
        let locale = record.locale().map(to_cstring);
        Self {
            record,
            file_path,
            locale,
        }
    }
}

fn to_cstring(raw: &str) -> CString {
    // XML text cannot carry NUL, so this only drops a path that could not be opened anyway.
    CString::new(raw).unwrap_or_default()
}

macro_rules! fatal_if {
    ($cond:expr, $($arg:tt)+) => {
        if $cond {
            log::error!($($arg)+);
            eprintln!("sysfont: fatal: {}", format_args!($($arg)+));
            std::process::abort();
        }
    };
}

unsafe fn font_ref<'a>(font: *const SysFont) -> &'a SysFont {
    fatal_if!(font.is_null(), "nullptr has passed as font argument");
    &*font
}

unsafe fn optional_path(raw: *const c_char) -> Option<PathBuf> {
    if raw.is_null() {
        return None;
    }
    Some(PathBuf::from(CStr::from_ptr(raw).to_string_lossy().into_owned()))
}

/// Open an iterator over `/system/etc/fonts.xml`.
#[no_mangle]
pub extern "C" fn sysfont_iterator_open() -> *mut SysFontIterator {
    Box::into_raw(Box::new(SysFontIterator {
        inner: SystemFontIterator::open(),
    }))
}

/// Open an iterator over `config_path`, resolving font files against `font_dir`.
/// Either argument may be null to use the system default.
///
/// # Safety
///
/// Non-null arguments must point to NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn sysfont_iterator_open_config(
    config_path: *const c_char,
    font_dir: *const c_char,
) -> *mut SysFontIterator {
    let mut config = SystemFontsConfig::default();
    if let Some(path) = optional_path(config_path) {
        config = config.with_config_path(path);
    }
    if let Some(dir) = optional_path(font_dir) {
        config = config.with_font_dir(dir);
    }

    Box::into_raw(Box::new(SysFontIterator {
        inner: SystemFontIterator::open_with(&config),
    }))
}

/// Advance the iterator. Returns null once no fonts remain.
///
/// # Safety
///
/// `iterator` must come from one of the open functions and not be closed.
#[no_mangle]
pub unsafe extern "C" fn sysfont_iterator_next(iterator: *mut SysFontIterator) -> *mut SysFont {
    fatal_if!(iterator.is_null(), "nullptr has passed as iterator argument");
    match (*iterator).inner.next() {
        Some(record) => Box::into_raw(Box::new(SysFont::new(record))),
        None => ptr::null_mut(),
    }
}

/// Release an iterator and the document it may still hold.
///
/// # Safety
///
/// `iterator` must come from one of the open functions and not be closed.
#[no_mangle]
pub unsafe extern "C" fn sysfont_iterator_close(iterator: *mut SysFontIterator) {
    fatal_if!(iterator.is_null(), "nullptr has passed as iterator argument");
    drop(Box::from_raw(iterator));
}

/// Release a font returned by [`sysfont_iterator_next`].
///
/// # Safety
///
/// `font` must come from [`sysfont_iterator_next`] and not be closed.
#[no_mangle]
pub unsafe extern "C" fn sysfont_font_close(font: *mut SysFont) {
    fatal_if!(font.is_null(), "nullptr has passed as font argument");
    drop(Box::from_raw(font));
}

/// # Safety
///
/// `font` must be a live font handle. The string is owned by the font.
#[no_mangle]
pub unsafe extern "C" fn sysfont_font_file_path(font: *const SysFont) -> *const c_char {
    font_ref(font).file_path.as_ptr()
}

/// # Safety
///
/// `font` must be a live font handle.
#[no_mangle]
pub unsafe extern "C" fn sysfont_font_weight(font: *const SysFont) -> u16 {
    font_ref(font).record.weight()
}

/// # Safety
///
/// `font` must be a live font handle.
#[no_mangle]
pub unsafe extern "C" fn sysfont_font_is_italic(font: *const SysFont) -> bool {
    font_ref(font).record.is_italic()
}

/// Locale of the font's family, or null when none is set.
///
/// # Safety
///
/// `font` must be a live font handle. The string is owned by the font.
#[no_mangle]
pub unsafe extern "C" fn sysfont_font_locale(font: *const SysFont) -> *const c_char {
    font_ref(font)
        .locale
        .as_ref()
        .map_or(ptr::null(), |locale| locale.as_ptr())
}

/// # Safety
///
/// `font` must be a live font handle.
#[no_mangle]
pub unsafe extern "C" fn sysfont_font_collection_index(font: *const SysFont) -> usize {
    font_ref(font).record.collection_index() as usize
}

/// # Safety
///
/// `font` must be a live font handle.
#[no_mangle]
pub unsafe extern "C" fn sysfont_font_axis_count(font: *const SysFont) -> usize {
    font_ref(font).record.axis_count()
}

/// Big-endian packed tag of the axis at `index`. Aborts when out of bounds.
///
/// # Safety
///
/// `font` must be a live font handle.
#[no_mangle]
pub unsafe extern "C" fn sysfont_font_axis_tag(font: *const SysFont, index: u32) -> u32 {
    let record = &font_ref(font).record;
    check_axis_index(record, index);
    u32::from_be_bytes(record.axis_tag(index as usize).to_be_bytes())
}

/// Value of the axis at `index`. Aborts when out of bounds.
///
/// # Safety
///
/// `font` must be a live font handle.
#[no_mangle]
pub unsafe extern "C" fn sysfont_font_axis_value(font: *const SysFont, index: u32) -> f32 {
    let record = &font_ref(font).record;
    check_axis_index(record, index);
    record.axis_value(index as usize)
}

fn check_axis_index(record: &FontRecord, index: u32) {
    let count = record.axis_count();
    fatal_if!(
        index as usize >= count,
        "given axis index is out of bounds. (< {count})"
    );
}
