// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for AI-nspect

use thiserror::Error;

/// Result type alias for AI-nspect operations
pub type Result<T> = std::result::Result<T, AinspectError>;

/// AI-nspect error types
#[derive(Error, Debug)]
pub enum AinspectError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Cannot decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Cannot load model: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("History error: {0}")]
    History(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Inspector is not idle: {0}")]
    NotIdle(String),

    #[error("Window error: {0}")]
    Ui(String),
}
