use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".grade-book";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "gradebook.sqlite";
/// Log file written next to the database so stdout stays reserved for the menu.
const LOG_FILE_NAME: &str = "gradebook.log";

/// Filesystem locations the application reads and writes.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolve the data directory inside the user's home.
    pub fn resolve() -> Result<Self> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(Self::in_dir(base_dirs.home_dir().join(DATA_DIR_NAME)))
    }

    /// Use an explicit data directory. Tests point this at a temp dir.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }

    /// Create the data directory if it does not exist yet.
    pub fn ensure_data_dir(&self) -> Result<&Path> {
        fs::create_dir_all(&self.data_dir).context("failed to create data directory")?;
        Ok(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_inside_the_data_dir() {
        let config = Config::in_dir("/tmp/gb");
        assert_eq!(config.db_path(), PathBuf::from("/tmp/gb/gradebook.sqlite"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/gb/gradebook.log"));
    }

    #[test]
    fn ensure_data_dir_creates_nested_folders() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let config = Config::in_dir(tmp.path().join("a").join("b"));
        config.ensure_data_dir().expect("create dir");
        assert!(config.data_dir.is_dir());
    }
}
