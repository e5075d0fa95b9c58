//! Light/dark theme preference behind a small storage port.

use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(ThemeError::Unknown(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Unknown theme '{0}'. Expected 'light' or 'dark'.")]
    Unknown(String),

    #[error("Failed to access theme file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode theme preference")]
    Encode(#[from] toml::ser::Error),

    #[error("Could not determine platform data directory")]
    NoDataDir,
}

/// Where the theme preference lives. Read once at startup, written on change.
pub trait ThemeStore: Send + fmt::Debug {
    fn load(&self) -> Result<Option<Theme>, ThemeError>;
    fn save(&mut self, theme: Theme) -> Result<(), ThemeError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct ThemeFile {
    theme: String,
}

/// `theme = "dark"` in a TOML file under the platform data directory.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_data_dir() -> Result<Self, ThemeError> {
        let dirs = Config::project_dirs().map_err(|_| ThemeError::NoDataDir)?;
        Ok(Self::new(dirs.data_dir().join("theme.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ThemeError {
        ThemeError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<Theme>, ThemeError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;

        // An unreadable or unknown value counts as "no preference saved".
        let theme = toml::from_str::<ThemeFile>(&contents)
            .ok()
            .and_then(|file| file.theme.parse().ok());
        if theme.is_none() {
            warn!(path = %self.path.display(), "ignoring unrecognised theme file");
        }
        Ok(theme)
    }

    fn save(&mut self, theme: Theme) -> Result<(), ThemeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let body = toml::to_string(&ThemeFile {
            theme: theme.as_str().to_string(),
        })?;
        fs::write(&self.path, body).map_err(|e| self.io_error(e))
    }
}

/// Keeps the preference in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    saved: Option<Theme>,
    writes: usize,
}

impl MemoryThemeStore {
    pub fn with_saved(theme: Theme) -> Self {
        Self {
            saved: Some(theme),
            writes: 0,
        }
    }

    pub fn saved(&self) -> Option<Theme> {
        self.saved
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<Option<Theme>, ThemeError> {
        Ok(self.saved)
    }

    fn save(&mut self, theme: Theme) -> Result<(), ThemeError> {
        self.saved = Some(theme);
        self.writes += 1;
        Ok(())
    }
}

/// The terminal's background hint from `COLORFGBG` ("fg;bg"), if any.
pub fn detect_system_theme() -> Option<Theme> {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|value| theme_from_colorfgbg(&value))
}

fn theme_from_colorfgbg(value: &str) -> Option<Theme> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    match bg {
        0..=6 | 8 => Some(Theme::Dark),
        7 | 9..=15 => Some(Theme::Light),
        _ => None,
    }
}

/// Current theme plus its persistence.
#[derive(Debug)]
pub struct ThemeController {
    store: Box<dyn ThemeStore>,
    current: Theme,
}

impl ThemeController {
    /// Saved preference, else the system preference, else dark.
    pub fn init(mut store: Box<dyn ThemeStore>, system: Option<Theme>) -> Result<Self, ThemeError> {
        let saved = store.load().unwrap_or_else(|e| {
            warn!(error = %e, "could not read saved theme");
            None
        });
        let current = saved.or(system).unwrap_or_default();
        debug!(%current, from_store = saved.is_some(), "theme resolved");

        store.save(current)?;
        Ok(Self { store, current })
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Flip and persist. On a failed write the theme is left unchanged.
    pub fn toggle(&mut self) -> Result<Theme, ThemeError> {
        let next = self.current.toggled();
        self.store.save(next)?;
        self.current = next;
        Ok(next)
    }

    pub fn store(&self) -> &dyn ThemeStore {
        self.store.as_ref()
    }
}
