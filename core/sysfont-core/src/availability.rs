//! Checks whether a configured font file is actually installed

use std::fs;
use std::path::Path;

/// Decides whether the file behind a record can be handed out.
pub trait FontAvailability {
    fn is_available(&self, path: &Path) -> bool;
}

/// Accepts paths that resolve (following symlinks) to a regular file.
/// Any error while stat-ing counts as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemAvailability;

impl FontAvailability for FileSystemAvailability {
    fn is_available(&self, path: &Path) -> bool {
        fs::metadata(path)
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }
}

impl<F> FontAvailability for F
where
    F: Fn(&Path) -> bool,
{
    fn is_available(&self, path: &Path) -> bool {
        self(path)
    }
}
