//! Application paths management.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Manages all application paths following platform conventions.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub config_file: PathBuf,
    pub database_file: PathBuf,
    /// Default drop folder for parecer PDFs awaiting import.
    pub inbox_dir: PathBuf,
}

impl AppPaths {
    /// Create paths using platform-specific directories.
    pub fn new() -> Option<Self> {
        let proj_dirs = ProjectDirs::from("com", "recruta", "recruta")?;

        let config_dir = proj_dirs.config_dir().to_path_buf();
        let data_dir = proj_dirs.data_dir().to_path_buf();

        Some(Self::build(config_dir, data_dir))
    }

    /// Move the data directory (database and inbox) elsewhere, keeping the config location.
    pub fn with_data_dir(self, data_dir: impl AsRef<Path>) -> Self {
        Self::build(self.config_dir, data_dir.as_ref().to_path_buf())
    }

    fn build(config_dir: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            config_file: config_dir.join("config.toml"),
            database_file: data_dir.join("recruta.db"),
            inbox_dir: data_dir.join("pareceres"),
            config_dir,
            data_dir,
        }
    }

    /// Create all necessary directories.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.inbox_dir)?;
        Ok(())
    }

    /// Check if recruta has been initialized.
    pub fn is_initialized(&self) -> bool {
        self.config_file.exists() && self.database_file.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_paths_creation() {
        let paths = AppPaths::new();
        assert!(paths.is_some());

        let paths = paths.unwrap();
        assert!(paths.config_file.to_string_lossy().contains("config.toml"));
        assert!(paths.database_file.to_string_lossy().contains("recruta.db"));
    }

    #[test]
    fn test_data_dir_override() {
        let paths = AppPaths::new().unwrap().with_data_dir("/srv/recruta");
        assert_eq!(paths.database_file, PathBuf::from("/srv/recruta/recruta.db"));
        assert_eq!(paths.inbox_dir, PathBuf::from("/srv/recruta/pareceres"));
        assert!(paths.config_file.ends_with("config.toml"));
    }
}
