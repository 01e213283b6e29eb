//! Configuration structures and loading.

use crate::error::{ConfigError, ConfigResult};
use crate::paths::AppPaths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub import: ImportConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> ConfigResult<Self> {
        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&paths.config_file)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.import.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Create a default config file with comments.
    pub fn create_default_file(path: &PathBuf) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, Self::default_config_string())?;
        Ok(())
    }

    /// Generate a default config file with helpful comments.
    pub fn default_config_string() -> String {
        r#"# Recruta Configuration

[general]
# Directory holding the database and the parecer inbox
# data_dir = "~/.local/share/recruta"

[import]
# Filenames look like Parecer_<Client>_<First>_<Last>_<YYYYMMDD>_<HHMM>.pdf
filename_prefix = "Parecer"
delimiter = "_"

# Which files a directory import picks up
file_pattern = "*.pdf"

# Leave files that already have an assessment alone (use --replace to re-import)
skip_existing = true

# Folders scanned by `recruta import` when no path is given
directories = []

[generator]
# Text generation service used to draft parecer narratives
enabled = true
host = "http://localhost:11434"
model = "llama3.1:8b"
timeout_seconds = 120

# Environment variable holding the API key; set to "" when none is needed
api_key_env = "RECRUTA_AI_API_KEY"

[ui]
color = true
date_format = "%Y-%m-%d %H:%M"
"#
        .to_string()
    }

    /// Add a directory to the import list.
    pub fn add_import_directory(&mut self, path: String) {
        if !self.import.directories.contains(&path) {
            self.import.directories.push(path);
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub data_dir: Option<String>,
}

/// Parecer import settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub filename_prefix: String,
    pub delimiter: String,
    pub file_pattern: String,
    pub skip_existing: bool,
    pub directories: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            filename_prefix: "Parecer".to_string(),
            delimiter: "_".to_string(),
            file_pattern: "*.pdf".to_string(),
            skip_existing: true,
            directories: vec![],
        }
    }
}

impl ImportConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.delimiter.is_empty() {
            return Err(ConfigError::InvalidImport(
                "delimiter must not be empty".to_string(),
            ));
        }
        if self.file_pattern.trim().is_empty() {
            return Err(ConfigError::InvalidImport(
                "file_pattern must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Text generation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub enabled: bool,
    pub host: String,
    pub model: String,
    pub timeout_seconds: u64,
    pub api_key_env: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "http://localhost:11434".to_string(),
            model: "llama3.1:8b".to_string(),
            timeout_seconds: 120,
            api_key_env: "RECRUTA_AI_API_KEY".to_string(),
        }
    }
}

/// UI/Display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub color: bool,
    pub date_format: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            color: true,
            date_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.import.filename_prefix, "Parecer");
        assert_eq!(config.import.delimiter, "_");
        assert!(config.import.skip_existing);
        assert_eq!(config.generator.api_key_env, "RECRUTA_AI_API_KEY");
    }

    #[test]
    fn test_default_string_parses_to_defaults() {
        let parsed: Config = toml::from_str(&Config::default_config_string()).unwrap();
        let defaults = Config::default();

        assert_eq!(parsed.import.file_pattern, defaults.import.file_pattern);
        assert_eq!(parsed.generator.host, defaults.generator.host);
        assert_eq!(parsed.generator.model, defaults.generator.model);
        assert_eq!(parsed.ui.date_format, defaults.ui.date_format);
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
            [import]
            filename_prefix = "Relatorio"
            "#
        )
        .unwrap();

        let path = temp_file.path().to_path_buf();
        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.import.filename_prefix, "Relatorio");
        // Defaults should still work
        assert_eq!(config.import.delimiter, "_");
        assert!(config.generator.enabled);
    }

    #[test]
    fn test_empty_delimiter_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[import]\ndelimiter = \"\"").unwrap();

        let path = temp_file.path().to_path_buf();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidImport(_))
        ));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = PathBuf::from("/nonexistent/recruta/config.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.import.filename_prefix, "Parecer");
    }

    #[test]
    fn test_add_import_directory() {
        let mut config = Config::default();
        config.add_import_directory("/srv/pareceres".to_string());
        config.add_import_directory("/srv/pareceres".to_string());

        assert_eq!(config.import.directories.len(), 1);
    }
}
