use crate::richtext::color::Color;
use crate::richtext::theme::ThemeMode;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

const QUALIFIER: &str = "app";
const ORGANIZATION: &str = "Journal";
const APPLICATION: &str = "journal-richtext";
const CONFIG_FILE_NAME: &str = "editor.toml";

/// Font sizes offered by the toolbar, in px
pub const DEFAULT_FONT_SIZES: [u16; 10] = [12, 14, 16, 18, 20, 24, 28, 32, 36, 48];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Editor settings loaded from `editor.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub allowed_font_sizes: Vec<u16>,
    /// Size reported when no run sets one
    pub default_font_size: u16,
    /// Color reported in light mode when no run sets one
    pub default_text_color: Color,
    /// Stored instead of black while the dark theme is active
    pub dark_text_color: Color,
    pub default_theme: ThemeMode,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            allowed_font_sizes: DEFAULT_FONT_SIZES.to_vec(),
            default_font_size: 16,
            default_text_color: Color::BLACK,
            dark_text_color: Color::Rgb(0xe5, 0xe5, 0xe5),
            default_theme: ThemeMode::Light,
        }
    }
}

impl EditorConfig {
    pub fn is_allowed_font_size(&self, px: u16) -> bool {
        self.allowed_font_sizes.contains(&px)
    }

    /// Text color reported when a run carries none
    pub fn text_color_for(&self, theme: ThemeMode) -> Color {
        match theme {
            ThemeMode::Light => self.default_text_color,
            ThemeMode::Dark => self.dark_text_color,
        }
    }

    /// Read the config at `path`. A missing file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the user's config, falling back to the defaults if it is unusable
    pub fn load() -> Self {
        let Some(path) = config_file_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("{err}, using default editor settings");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|err| io::Error::other(format!("toml serialization error: {err}")))?;

        fs::write(path, toml)
    }
}

pub fn config_file_path() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load_from(&dir.path().join("editor.toml")).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.toml");
        fs::write(&path, "dark_text_color = \"#cccccc\"\ndefault_theme = \"dark\"\n").unwrap();

        let config = EditorConfig::load_from(&path).unwrap();
        assert_eq!(config.dark_text_color, Color::Rgb(0xcc, 0xcc, 0xcc));
        assert_eq!(config.default_theme, ThemeMode::Dark);
        assert_eq!(config.default_font_size, 16);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.toml");
        fs::write(&path, "allowed_font_sizes = \"big\"").unwrap();
        assert!(matches!(
            EditorConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("editor.toml");
        let config = EditorConfig {
            default_font_size: 18,
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(EditorConfig::load_from(&path).unwrap(), config);
    }
}
