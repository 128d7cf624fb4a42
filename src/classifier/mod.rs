// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Real/fake image classification

pub mod onnx;
pub mod preprocess;

use image::DynamicImage;
use ndarray::Array4;

use crate::history::Authenticity;
use crate::{AinspectError, Result};

/// Class order of the model output
pub const CLASS_LABELS: [Authenticity; 2] = [Authenticity::Real, Authenticity::Fake];

/// Trait for classifier backends
pub trait Classifier: Send + Sync {
    /// Model version shown to the user
    fn version(&self) -> &str;

    /// Raw per-class scores for a preprocessed `[1, 3, 224, 224]` tensor,
    /// in `CLASS_LABELS` order
    fn scores(&self, pixels: Array4<f32>) -> Result<Vec<f32>>;
}

/// Most probable class and its probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub authenticity: Authenticity,
    /// Probability of `authenticity` (0.0 - 1.0)
    pub probability: f32,
}

impl Prediction {
    pub fn confidence_percent(&self) -> f32 {
        self.probability * 100.0
    }

    /// Confidence as shown and logged, e.g. "85.81%"
    pub fn confidence_text(&self) -> String {
        format!("{:.2}%", self.confidence_percent())
    }
}

/// Normalize raw scores into a probability distribution
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Pick the most probable class from raw scores
pub fn predict(scores: &[f32]) -> Result<Prediction> {
    if scores.len() != CLASS_LABELS.len() {
        return Err(AinspectError::Inference(format!(
            "Expected {} class scores, model returned {}",
            CLASS_LABELS.len(),
            scores.len()
        )));
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(AinspectError::Inference(format!("Non-finite class scores: {:?}", scores)));
    }

    let probs = softmax(scores);
    let (index, probability) = probs
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, p)| if p > best.1 { (i, p) } else { best });

    Ok(Prediction {
        authenticity: CLASS_LABELS[index],
        probability,
    })
}

/// Preprocess, score and pick a class for a decoded image
pub fn classify_image(classifier: &dyn Classifier, image: &DynamicImage) -> Result<Prediction> {
    let pixels = preprocess::to_tensor(image);
    let scores = classifier.scores(pixels)?;
    tracing::debug!("Raw scores from {}: {:?}", classifier.version(), scores);
    predict(&scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScores(Vec<f32>);

    impl Classifier for FixedScores {
        fn version(&self) -> &str {
            "fixed"
        }

        fn scores(&self, pixels: Array4<f32>) -> Result<Vec<f32>> {
            assert_eq!(pixels.shape(), &[1, 3, 224, 224]);
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[2.0, 0.1]);
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!((probs[0] - 0.8699).abs() < 1e-4);
        assert!((probs[1] - 0.1301).abs() < 1e-4);
    }

    #[test]
    fn test_softmax_handles_large_scores() {
        let probs = softmax(&[1000.0, 998.2]);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!((probs[0] - 0.8581).abs() < 1e-4);
    }

    #[test]
    fn test_predict_real() {
        let prediction = predict(&[2.0, 0.1]).unwrap();
        assert_eq!(prediction.authenticity, Authenticity::Real);
        assert_eq!(prediction.confidence_text(), "86.99%");
    }

    #[test]
    fn test_predict_gap_of_one_point_eight() {
        let prediction = predict(&[1.8, 0.0]).unwrap();
        assert_eq!(prediction.authenticity, Authenticity::Real);
        assert_eq!(prediction.confidence_text(), "85.81%");
    }

    #[test]
    fn test_predict_fake() {
        let prediction = predict(&[-1.0, 3.0]).unwrap();
        assert_eq!(prediction.authenticity, Authenticity::Fake);
        assert_eq!(prediction.confidence_text(), "98.20%");
    }

    #[test]
    fn test_predict_tie_prefers_real() {
        let prediction = predict(&[0.5, 0.5]).unwrap();
        assert_eq!(prediction.authenticity, Authenticity::Real);
        assert_eq!(prediction.confidence_text(), "50.00%");
    }

    #[test]
    fn test_predict_rejects_wrong_arity() {
        assert!(matches!(predict(&[1.0]), Err(AinspectError::Inference(_))));
        assert!(matches!(predict(&[1.0, 2.0, 3.0]), Err(AinspectError::Inference(_))));
    }

    #[test]
    fn test_predict_rejects_nan() {
        assert!(matches!(predict(&[f32::NAN, 1.0]), Err(AinspectError::Inference(_))));
    }

    #[test]
    fn test_classify_image_runs_full_pipeline() {
        let image = DynamicImage::new_rgb8(40, 30);
        let prediction = classify_image(&FixedScores(vec![0.0, 2.0]), &image).unwrap();
        assert_eq!(prediction.authenticity, Authenticity::Fake);
    }
}
