//! Where the font configuration lives and how it is interpreted

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Well-known location of the system font configuration.
pub const DEFAULT_CONFIG_PATH: &str = "/system/etc/fonts.xml";
/// Directory that font file names in the configuration are relative to.
pub const DEFAULT_FONT_DIR: &str = "/system/fonts/";

pub const CONFIG_PATH_ENV: &str = "SYSFONT_CONFIG";
pub const FONT_DIR_ENV: &str = "SYSFONT_FONT_DIR";

/// Which node the `lang` attribute of a record is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocaleSource {
    /// The `family` element enclosing the font.
    #[default]
    Family,
    /// The parent of the document itself. A document never has one, so
    /// records carry no locale.
    DocumentParent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemFontsConfig {
    pub config_path: PathBuf,
    pub font_dir: PathBuf,
    #[serde(default)]
    pub locale_source: LocaleSource,
}

impl Default for SystemFontsConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            font_dir: PathBuf::from(DEFAULT_FONT_DIR),
            locale_source: LocaleSource::default(),
        }
    }
}

impl SystemFontsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `SYSFONT_CONFIG` / `SYSFONT_FONT_DIR` when set and non-empty.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var_os(key).map(PathBuf::from))
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<PathBuf>) -> Self {
        if let Some(path) = lookup(CONFIG_PATH_ENV).filter(|p| !p.as_os_str().is_empty()) {
            self.config_path = path;
        }
        if let Some(dir) = lookup(FONT_DIR_ENV).filter(|p| !p.as_os_str().is_empty()) {
            self.font_dir = dir;
        }
        self
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dir = dir.into();
        self
    }

    pub fn with_locale_source(mut self, source: LocaleSource) -> Self {
        self.locale_source = source;
        self
    }

    pub fn font_dir(&self) -> &Path {
        &self.font_dir
    }
}
