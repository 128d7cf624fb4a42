// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! AI-nspect: AI-generated Image Detector
//!
//! Classifies a picked image as real or AI-generated with a local ONNX vision
//! transformer, shows the verdict and keeps a JSON history of inspections.

pub mod classifier;
pub mod config;
pub mod error;
pub mod history;
pub mod inspection;
pub mod ui;

pub use config::AppConfig;
pub use error::{AinspectError, Result};
