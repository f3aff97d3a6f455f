use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::deck::{DeckFiles, LoadOptions, Orientation};

/// Optional colour overrides, `#RRGGBB` or `#RGB`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ThemeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_front: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_back: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_front: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_back: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the word lists
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// The full word list, never modified
    #[serde(default = "default_source_file")]
    pub source_file: String,

    /// Remaining cards, rewritten whenever one is learned
    #[serde(default = "default_progress_file")]
    pub progress_file: String,

    /// Save progress between sessions
    #[serde(default = "default_true")]
    pub persist_progress: bool,

    /// Ask the second column and answer with the first
    #[serde(default)]
    pub swap_sides: bool,

    /// Refuse word lists that repeat a word in the first column
    #[serde(default)]
    pub reject_duplicates: bool,

    /// Desktop notification when the deck is finished
    #[serde(default)]
    pub notifications: bool,

    #[serde(default)]
    pub theme: ThemeConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_source_file() -> String {
    "source.csv".to_string()
}

fn default_progress_file() -> String {
    "to_learn.csv".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            source_file: default_source_file(),
            progress_file: default_progress_file(),
            persist_progress: true,
            swap_sides: false,
            reject_duplicates: false,
            notifications: false,
            theme: ThemeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("flashdeck");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        } else {
            let config = AppConfig::default();
            if let Err(e) = config.save() {
                tracing::warn!("Could not write default config: {}", e);
            }
            return Ok(config);
        }

        // Keep a broken config file around for the user to fix
        Ok(AppConfig::default())
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Both files are always known; `persist_progress` only decides whether
    /// learned cards are written back.
    pub fn deck_files(&self) -> DeckFiles {
        DeckFiles::new(
            self.data_dir.join(&self.source_file),
            Some(self.data_dir.join(&self.progress_file)),
        )
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            reject_duplicates: self.reject_duplicates,
        }
    }

    pub fn orientation(&self) -> Orientation {
        if self.swap_sides {
            Orientation::Reversed
        } else {
            Orientation::Forward
        }
    }
}
