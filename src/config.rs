//! Configuration management: TOML config file, environment overrides, settings.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm::LlmConfig;
use crate::ocr::BackendKind;

/// Default database filename.
pub const DEFAULT_DATABASE_FILENAME: &str = "products.db";

/// Default config file name inside the platform config directory.
const CONFIG_SUBDIR: &str = "catalog-scout";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// PDF extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Ordered extraction backends (pdftotext, tesseract, lopdf).
    #[serde(default = "default_pdf_backends")]
    pub pdf_backends: Vec<String>,
    /// Language passed to Tesseract.
    #[serde(default = "default_tesseract_language")]
    pub tesseract_language: String,
    /// Resolution used when rasterizing pages for OCR.
    #[serde(default = "default_raster_dpi")]
    pub raster_dpi: u32,
}

fn default_pdf_backends() -> Vec<String> {
    vec![
        "pdftotext".to_string(),
        "tesseract".to_string(),
        "lopdf".to_string(),
    ]
}

fn default_tesseract_language() -> String {
    "eng".to_string()
}

fn default_raster_dpi() -> u32 {
    300
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pdf_backends: default_pdf_backends(),
            tesseract_language: default_tesseract_language(),
            raster_dpi: default_raster_dpi(),
        }
    }
}

impl ExtractionConfig {
    /// Resolve configured backend names, skipping unknown and repeated ones.
    ///
    /// Falls back to the default chain if nothing usable is configured.
    pub fn backends(&self) -> Vec<BackendKind> {
        let mut kinds: Vec<BackendKind> = Vec::new();
        for name in &self.pdf_backends {
            match BackendKind::from_str(name) {
                Some(kind) if !kinds.contains(&kind) => kinds.push(kind),
                Some(_) => debug!("Duplicate PDF backend '{}' ignored", name),
                None => warn!("Unknown PDF backend '{}' ignored", name),
            }
        }
        if kinds.is_empty() {
            return default_pdf_backends()
                .iter()
                .filter_map(|name| BackendKind::from_str(name))
                .collect();
        }
        kinds
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Database filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// PDF extraction settings.
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Language model settings.
    #[serde(default, skip_serializing_if = "LlmConfig::is_default")]
    pub llm: LlmConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_SUBDIR).join(CONFIG_FILENAME))
    }

    /// Load config from a TOML file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.source_path = Some(path.to_path_buf());
        config.llm = config.llm.with_env_overrides();
        Ok(config)
    }

    /// Load the explicit config file, else the default one if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => {
                debug!("No config file found, using defaults");
                let mut config = Self::default();
                config.llm = config.llm.with_env_overrides();
                Ok(config)
            }
        }
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let path = Path::new(path_str);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = self.resolve_path(data_dir, base_dir);
        }
        if let Some(ref database) = self.database {
            settings.database_filename = database.clone();
        }
    }
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Database filename.
    pub database_filename: String,
}

impl Default for Settings {
    fn default() -> Self {
        // Falls back gracefully: data dir -> home dir -> current dir
        let data_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_SUBDIR);

        Self {
            data_dir,
            database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
        }
    }
}

impl Settings {
    /// Apply a `DB_NAME` value: the database stem, without extension.
    ///
    /// Blank values leave the filename unchanged.
    pub fn apply_db_name(&mut self, db_name: Option<&str>) {
        if let Some(name) = db_name.map(str::trim).filter(|n| !n.is_empty()) {
            self.database_filename = format!("{}.db", name);
        }
    }

    /// Get the full path to the database.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_filename)
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create data directory '{}': {}",
                    self.data_dir.display(),
                    e
                ),
            )
        })
    }
}

/// Load config and derive settings.
///
/// Precedence: defaults, then the config file, then `DB_NAME`, then `data_dir`.
pub fn load_settings(
    config_path: Option<&Path>,
    data_dir: Option<PathBuf>,
) -> Result<(Settings, Config), ConfigError> {
    let config = Config::load(config_path)?;
    let mut settings = Settings::default();

    let base_dir = config
        .base_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    config.apply_to_settings(&mut settings, &base_dir);
    settings.apply_db_name(std::env::var("DB_NAME").ok().as_deref());

    if let Some(dir) = data_dir {
        settings.data_dir = dir;
    }

    Ok((settings, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backends_in_order() {
        let config = ExtractionConfig::default();
        assert_eq!(
            config.backends(),
            vec![
                BackendKind::Pdftotext,
                BackendKind::Tesseract,
                BackendKind::Lopdf
            ]
        );
    }

    #[test]
    fn test_backends_skip_unknown_and_duplicates() {
        let config = ExtractionConfig {
            pdf_backends: vec![
                "lopdf".to_string(),
                "bogus".to_string(),
                "LOPDF".to_string(),
                "tesseract".to_string(),
            ],
            ..Default::default()
        };
        assert_eq!(
            config.backends(),
            vec![BackendKind::Lopdf, BackendKind::Tesseract]
        );
    }

    #[test]
    fn test_empty_backends_fall_back_to_default() {
        let config = ExtractionConfig {
            pdf_backends: vec!["nope".to_string()],
            ..Default::default()
        };
        assert_eq!(config.backends().len(), 3);
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(
            r#"
            data_dir = "data"

            [extraction]
            pdf_backends = ["pdftotext", "lopdf"]
            raster_dpi = 150
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir.as_deref(), Some("data"));
        assert_eq!(config.extraction.raster_dpi, 150);
        assert_eq!(config.extraction.tesseract_language, "eng");
        assert_eq!(config.extraction.backends().len(), 2);
        assert_eq!(config.llm.max_tokens, 2000);
    }

    #[test]
    fn test_apply_relative_data_dir() {
        let config = Config {
            data_dir: Some("catalog".to_string()),
            database: Some("items.db".to_string()),
            ..Default::default()
        };
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, Path::new("/srv/scout"));

        assert_eq!(settings.data_dir, PathBuf::from("/srv/scout/catalog"));
        assert_eq!(
            settings.database_path(),
            PathBuf::from("/srv/scout/catalog/items.db")
        );
    }

    #[test]
    fn test_db_name_overrides_config_database() {
        let config = Config {
            database: Some("fromfile.db".to_string()),
            ..Default::default()
        };
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, Path::new("/srv/scout"));
        settings.apply_db_name(Some(" fromenv "));
        assert_eq!(settings.database_filename, "fromenv.db");

        settings.apply_db_name(Some("  "));
        settings.apply_db_name(None);
        assert_eq!(settings.database_filename, "fromenv.db");
    }

    #[test]
    fn test_load_settings_applies_db_name_last() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "database = \"fromfile.db\"\n").unwrap();

        std::env::set_var("DB_NAME", "fromenv");
        let loaded = load_settings(Some(&path), None);
        std::env::remove_var("DB_NAME");

        let (settings, _) = loaded.unwrap();
        assert_eq!(settings.database_filename, "fromenv.db");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let err = Config::load(Some(Path::new("/nonexistent/config.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
