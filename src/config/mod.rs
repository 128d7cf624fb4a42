// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for AI-nspect

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Classifier model settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Inspection history settings
    #[serde(default)]
    pub history: HistoryConfig,

    /// Window appearance, applied once when the window is created
    #[serde(default)]
    pub appearance: AppearanceConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ModelConfig {
    /// Label shown in the model dropdown
    #[serde(default = "default_model_version")]
    pub version: String,
    /// Path to the exported ONNX classifier
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
    #[serde(default = "default_inter_threads")]
    pub inter_threads: usize,
    #[serde(default = "default_true")]
    pub parallel_execution: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HistoryConfig {
    #[serde(default = "default_history_path")]
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppearanceConfig {
    #[serde(default)]
    pub mode: ThemeMode,
    #[serde(default = "default_title")]
    pub title: String,
    /// Initial inner window size in points
    #[serde(default = "default_window_size")]
    pub window_size: [f32; 2],
    /// RGB accent used for buttons and selections
    #[serde(default = "default_accent")]
    pub accent: [u8; 3],
    /// RGB fill of the rounded background card
    #[serde(default = "default_background")]
    pub background: [u8; 3],
    /// Fade duration for page switches and results, in milliseconds
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u64,
}

// Default value functions
fn default_model_version() -> String { "Model ver. 1.0".to_string() }
fn default_model_path() -> PathBuf { PathBuf::from("models/ai_detector_v2_optimized.onnx") }
fn default_intra_threads() -> usize { 4 }
fn default_inter_threads() -> usize { 1 }
fn default_true() -> bool { true }
fn default_history_path() -> PathBuf { PathBuf::from("history.json") }
fn default_title() -> String { "AI-nspect".to_string() }
fn default_window_size() -> [f32; 2] { [600.0, 400.0] }
fn default_accent() -> [u8; 3] { [31, 106, 165] }
fn default_background() -> [u8; 3] { [142, 168, 255] }
fn default_fade_ms() -> u64 { 250 }

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            version: default_model_version(),
            path: default_model_path(),
            intra_threads: default_intra_threads(),
            inter_threads: default_inter_threads(),
            parallel_execution: true,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            mode: ThemeMode::default(),
            title: default_title(),
            window_size: default_window_size(),
            accent: default_accent(),
            background: default_background(),
            fade_ms: default_fade_ms(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::AinspectError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.model.version, "Model ver. 1.0");
        assert_eq!(config.history.path, PathBuf::from("history.json"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "appearance": { "mode": "dark" }, "model": { "intra_threads": 2 } }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.appearance.mode, ThemeMode::Dark);
        assert_eq!(config.appearance.title, "AI-nspect");
        assert_eq!(config.model.intra_threads, 2);
        assert_eq!(config.model.inter_threads, 1);
        assert!(config.model.parallel_execution);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        match AppConfig::load(&path) {
            Err(crate::AinspectError::Config(msg)) => assert!(msg.contains("Failed to parse config")),
            other => panic!("Expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = AppConfig::default();
        config.history.path = PathBuf::from("/tmp/inspections.json");
        config.save(&path).unwrap();

        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }
}
