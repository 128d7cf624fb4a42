// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! ONNX Runtime classifier backend

use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::Classifier;
use crate::config::ModelConfig;
use crate::{AinspectError, Result};

/// Input name of the exported image classifier
pub const INPUT_NAME: &str = "pixel_values";

/// Classifier backed by an exported ONNX model
///
/// The session is created on first use so a missing model file surfaces as
/// a failed inspection rather than a failed start.
pub struct OnnxClassifier {
    config: ModelConfig,
    session: Mutex<Option<Session>>,
}

impl OnnxClassifier {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            session: Mutex::new(None),
        }
    }

    /// Load the model now instead of on the first inspection
    pub fn load(&self) -> Result<()> {
        let mut session = self.session.lock();
        if session.is_none() {
            *session = Some(open_session(&self.config)?);
        }
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.session.lock().is_some()
    }
}

impl Classifier for OnnxClassifier {
    fn version(&self) -> &str {
        &self.config.version
    }

    fn scores(&self, pixels: Array4<f32>) -> Result<Vec<f32>> {
        let mut guard = self.session.lock();
        if guard.is_none() {
            *guard = Some(open_session(&self.config)?);
        }
        let session = guard
            .as_mut()
            .ok_or_else(|| AinspectError::ModelLoad("Model not loaded".to_string()))?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| AinspectError::Inference("Model defines no outputs".to_string()))?;

        let input = Value::from_array(pixels)
            .map_err(|e| AinspectError::Inference(format!("Tensor error: {}", e)))?;

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| AinspectError::Inference(e.to_string()))?;

        let output = outputs
            .get(&output_name)
            .ok_or_else(|| AinspectError::Inference(format!("Missing output '{}'", output_name)))?;

        let (_, logits) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| AinspectError::Inference(format!("Extract error: {}", e)))?;

        Ok(logits.to_vec())
    }
}

fn open_session(config: &ModelConfig) -> Result<Session> {
    info!("Loading ONNX model from: {:?}", config.path);

    if !config.path.exists() {
        return Err(AinspectError::ModelLoad(format!(
            "Model not found: {}",
            config.path.display()
        )));
    }

    let session = Session::builder()
        .map_err(|e| AinspectError::ModelLoad(format!("Failed to create session builder: {}", e)))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| AinspectError::ModelLoad(format!("Failed to set optimization: {}", e)))?
        .with_intra_threads(config.intra_threads)
        .map_err(|e| AinspectError::ModelLoad(format!("Failed to set intra-op threads: {}", e)))?
        .with_inter_threads(config.inter_threads)
        .map_err(|e| AinspectError::ModelLoad(format!("Failed to set inter-op threads: {}", e)))?
        .with_parallel_execution(config.parallel_execution)
        .map_err(|e| AinspectError::ModelLoad(format!("Failed to set execution mode: {}", e)))?
        .commit_from_file(&config.path)
        .map_err(|e| AinspectError::ModelLoad(format!("Failed to load model: {}", e)))?;

    match session.inputs.first() {
        Some(input) if input.name == INPUT_NAME => debug!("Model input: {}", input.name),
        Some(input) => warn!("Model input is '{}', expected '{}'", input.name, INPUT_NAME),
        None => return Err(AinspectError::ModelLoad("Model defines no inputs".to_string())),
    }

    info!("ONNX model '{}' loaded", config.version);
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_at(path: std::path::PathBuf) -> ModelConfig {
        ModelConfig {
            path,
            ..ModelConfig::default()
        }
    }

    #[test]
    fn test_missing_model_is_load_error() {
        let dir = tempdir().unwrap();
        let classifier = OnnxClassifier::new(config_at(dir.path().join("absent.onnx")));

        assert!(!classifier.is_loaded());
        match classifier.scores(Array4::zeros((1, 3, 224, 224))) {
            Err(AinspectError::ModelLoad(msg)) => assert!(msg.contains("Model not found")),
            other => panic!("Expected model load error, got {:?}", other.map(|_| ())),
        }
        assert!(!classifier.is_loaded());
    }

    #[test]
    fn test_version_comes_from_config() {
        let classifier = OnnxClassifier::new(ModelConfig::default());
        assert_eq!(classifier.version(), "Model ver. 1.0");
    }
}
