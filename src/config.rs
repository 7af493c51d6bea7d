//! Service configuration.
//!
//! ```json
//! { "resources": { "fonts": ["/usr/share/fonts/custom"] }, "defaultFontSize": 12.0 }
//! ```

use crate::error::ServiceError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Extra font directories, separated like `PATH`.
pub const FONT_PATHS_ENV: &str = "ACROFILL_FONT_PATHS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    #[serde(default, alias = "Resources")]
    pub resources: ResourcesConfig,
    /// Font size for free text that does not name one.
    #[serde(default, alias = "DefaultFontSize", skip_serializing_if = "Option::is_none")]
    pub default_font_size: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesConfig {
    /// Directories scanned for font files.
    #[serde(default, alias = "Fonts")]
    pub fonts: Vec<PathBuf>,
}

impl ServiceConfig {
    pub fn from_json(json: &str) -> Result<Self, ServiceError> {
        let config: ServiceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the file at `path`, then appends any directories listed in
    /// `ACROFILL_FONT_PATHS`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            ServiceError::Config(format!("Failed to read config from '{}': {}", path.display(), e))
        })?;
        let mut config = Self::from_json(&source)?;
        config.apply_env();
        Ok(config)
    }

    /// Defaults plus the environment override; used when no file is given.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Some(paths) = env::var_os(FONT_PATHS_ENV) {
            self.append_font_paths(env::split_paths(&paths));
        }
    }

    fn append_font_paths(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        for path in paths {
            if path.as_os_str().is_empty() || self.resources.fonts.contains(&path) {
                continue;
            }
            log::debug!("Adding font directory {} from {}", path.display(), FONT_PATHS_ENV);
            self.resources.fonts.push(path);
        }
    }

    fn validate(&self) -> Result<(), ServiceError> {
        match self.default_font_size {
            Some(size) if !(size.is_finite() && size > 0.0) => Err(ServiceError::Config(format!(
                "defaultFontSize must be a positive number, got {}",
                size
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_camel_case_and_aliases() {
        let config = ServiceConfig::from_json(
            r#"{"Resources":{"Fonts":["/a","/b"]},"defaultFontSize":9.5}"#,
        )
        .unwrap();
        assert_eq!(config.resources.fonts, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(config.default_font_size, Some(9.5));
    }

    #[test]
    fn test_missing_sections_default() {
        let config = ServiceConfig::from_json("{}").unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_rejects_non_positive_font_size() {
        let err = ServiceConfig::from_json(r#"{"defaultFontSize":0}"#).unwrap_err();
        assert!(err.to_string().contains("defaultFontSize"));
    }

    #[test]
    fn test_appended_paths_skip_duplicates_and_blanks() {
        let mut config = ServiceConfig::from_json(r#"{"resources":{"fonts":["/a"]}}"#).unwrap();
        config.append_font_paths(vec![PathBuf::from("/a"), PathBuf::new(), PathBuf::from("/c")]);
        assert_eq!(config.resources.fonts, vec![PathBuf::from("/a"), PathBuf::from("/c")]);
    }

    #[test]
    fn test_from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = ServiceConfig::from_file(&missing).unwrap_err();
        assert!(err.to_string().contains("nope.json"));

        let present = dir.path().join("config.json");
        fs::write(&present, r#"{"resources":{"fonts":["fonts"]}}"#).unwrap();
        let config = ServiceConfig::from_file(&present).unwrap();
        assert!(config.resources.fonts.contains(&PathBuf::from("fonts")));
    }
}
