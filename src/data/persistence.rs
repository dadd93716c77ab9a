use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Set once at startup by main() from the --data-dir argument.
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Call this from main() before any load/save operations.
pub fn set_data_dir(path: PathBuf) {
    let _ = DATA_DIR.set(path);
}

pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(dir) = DATA_DIR.get() {
        return Ok(dir.clone());
    }
    // Fallback when running tests or if set_data_dir was not called
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    Ok(cwd.join("config"))
}

/// YAML files the app keeps next to each other in the data directory.
/// Trips are never stored here; they live only in the remote store.
pub trait Persistable: Sized + Default + Serialize + for<'de> Deserialize<'de> {
    fn filename() -> &'static str;

    fn load() -> Result<Self> {
        Self::load_from(&get_data_dir()?)
    }

    /// Load from an explicit directory, bypassing the global `DATA_DIR`.
    /// A missing file yields `Default`.
    fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(Self::filename());
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_norway::from_str(&contents)
            .with_context(|| format!("failed to parse YAML from {}", path.display()))
    }

    /// Save to an explicit directory, bypassing the global `DATA_DIR`.
    fn save_to(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create dir {}", dir.display()))?;
        let path = dir.join(Self::filename());
        let contents = serde_norway::to_string(self).context("failed to serialize YAML")?;
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
    struct Scratch {
        value: String,
    }

    impl Persistable for Scratch {
        fn filename() -> &'static str {
            "scratch.yaml"
        }
    }

    #[test]
    fn test_get_data_dir_returns_a_path() {
        assert!(get_data_dir().is_ok());
    }

    #[test]
    fn test_load_from_returns_default_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        let result = Scratch::load_from(tmp.path()).unwrap();
        assert_eq!(result, Scratch::default());
    }

    #[test]
    fn test_save_to_and_load_from() {
        let tmp = TempDir::new().unwrap();
        let data = Scratch { value: "kept".to_string() };
        data.save_to(tmp.path()).unwrap();
        assert_eq!(Scratch::load_from(tmp.path()).unwrap(), data);
    }

    #[test]
    fn test_load_from_reports_malformed_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("scratch.yaml"), "value: [unclosed").unwrap();
        let err = Scratch::load_from(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse YAML"));
    }

    #[test]
    fn test_holiday_data_save_to_load_from() {
        use crate::data::holiday::{Holiday, HolidayData, HolidayKind};
        let tmp = TempDir::new().unwrap();
        let mut data = HolidayData::default();
        data.add(Holiday::new("Labour Day", "2025-05-01", HolidayKind::Holiday));
        data.save_to(tmp.path()).unwrap();
        let loaded = HolidayData::load_from(tmp.path()).unwrap();
        assert_eq!(loaded.holidays.len(), 1);
        assert_eq!(loaded.holidays[0].name, "Labour Day");
    }

    #[test]
    fn test_save_to_creates_directory_if_missing() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        let data = Scratch { value: "nested".to_string() };
        data.save_to(&nested).unwrap();
        assert_eq!(Scratch::load_from(&nested).unwrap(), data);
    }
}
