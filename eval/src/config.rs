// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Path configuration for dataset loading and report export

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the mapped QC/MLCQ datasets
pub const DEFAULT_MAPPED_DATASET_DIR: &str = "../data/mapped/";

/// Default base directory for exported reports
pub const DEFAULT_REPORTS_DIR: &str = "../reports";

/// Where datasets are read from and reports are written to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory holding the `mapped_*.csv` files
    #[serde(default = "default_mapped_dataset_dir")]
    pub mapped_dataset_dir: PathBuf,
    /// Base directory for exported reports
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,
}

fn default_mapped_dataset_dir() -> PathBuf {
    PathBuf::from(DEFAULT_MAPPED_DATASET_DIR)
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from(DEFAULT_REPORTS_DIR)
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            mapped_dataset_dir: default_mapped_dataset_dir(),
            reports_dir: default_reports_dir(),
        }
    }
}

impl ReportConfig {
    /// Load configuration from a JSON file; missing keys fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn with_mapped_dataset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.mapped_dataset_dir = dir.into();
        self
    }

    pub fn with_reports_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.reports_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = ReportConfig::default();
        assert_eq!(config.mapped_dataset_dir, PathBuf::from("../data/mapped/"));
        assert_eq!(config.reports_dir, PathBuf::from("../reports"));
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"reports_dir": "/tmp/out"}"#).unwrap();

        let config = ReportConfig::from_file(&path).unwrap();
        assert_eq!(config.reports_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.mapped_dataset_dir, PathBuf::from(DEFAULT_MAPPED_DATASET_DIR));
    }

    #[test]
    fn test_from_file_missing() {
        let result = ReportConfig::from_file(Path::new("/nonexistent/config.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_overrides() {
        let config = ReportConfig::load(None)
            .unwrap()
            .with_reports_dir("out")
            .with_mapped_dataset_dir("data");
        assert_eq!(config.reports_dir, PathBuf::from("out"));
        assert_eq!(config.mapped_dataset_dir, PathBuf::from("data"));
    }
}
