// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Inspection workflow: background classification of one image at a time
//!
//! The [`Inspector`] is owned by the interactive thread. [`Inspector::begin`]
//! moves it from `Idle` to `Busy` and hands decode + classify to a blocking
//! worker; the worker's only output is an [`InspectionOutcome`] sent back over
//! a one-shot channel. [`Inspector::poll`] (or [`Inspector::finish`] outside
//! the UI) receives it on the owning thread, appends the history record and
//! moves to `ShowingResult`. The record and the displayed result are both
//! derived from that single outcome value.

use image::{DynamicImage, GenericImageView, ImageReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, error, info, warn};

use crate::classifier::{classify_image, Classifier, Prediction};
use crate::history::{timestamp_now, Authenticity, HistoryRecord, HistoryStore};
use crate::{AinspectError, Result};

/// Longest edge of the preview sent back with an outcome
pub const PREVIEW_EDGE: u32 = 320;

/// Extensions offered by the file picker
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// A user-confirmed file selection
#[derive(Debug, Clone, PartialEq)]
pub struct InspectionRequest {
    pub file_path: PathBuf,
}

impl InspectionRequest {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Base name of the selected file, as logged in history
    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.display().to_string())
    }
}

/// Outcome of classifying one image
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationResult {
    Classified(Prediction),
    Failed { description: String },
}

impl ClassificationResult {
    pub fn authenticity(&self) -> Authenticity {
        match self {
            ClassificationResult::Classified(prediction) => prediction.authenticity,
            ClassificationResult::Failed { .. } => Authenticity::Error,
        }
    }

    /// Percentage for a classification, the error description for a failure
    pub fn confidence_text(&self) -> String {
        match self {
            ClassificationResult::Classified(prediction) => prediction.confidence_text(),
            ClassificationResult::Failed { description } => description.clone(),
        }
    }
}

/// RGBA thumbnail of the inspected image
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}

/// Everything the interactive thread needs to show and log one inspection
#[derive(Debug, Clone, PartialEq)]
pub struct InspectionOutcome {
    pub request: InspectionRequest,
    pub result: ClassificationResult,
    pub preview: Option<Preview>,
    pub finished_at: String,
}

impl InspectionOutcome {
    fn failed(request: InspectionRequest, description: String) -> Self {
        Self {
            request,
            result: ClassificationResult::Failed { description },
            preview: None,
            finished_at: timestamp_now(),
        }
    }

    /// The history record for this outcome
    pub fn record(&self) -> HistoryRecord {
        HistoryRecord {
            file_name: self.request.file_name(),
            timestamp: self.finished_at.clone(),
            authenticity: Some(self.result.authenticity()),
            confidence: Some(self.result.confidence_text()),
        }
    }
}

/// Workflow state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InspectionState {
    #[default]
    Idle,
    Busy(InspectionRequest),
    ShowingResult(InspectionOutcome),
}

/// Decode, classify and build a preview for one request
///
/// Blocking. Every failure is folded into a `Failed` result.
pub fn inspect(classifier: &dyn Classifier, request: InspectionRequest) -> InspectionOutcome {
    let image = match decode(&request.file_path) {
        Ok(image) => image,
        Err(e) => {
            warn!("Cannot decode {:?}: {}", request.file_path, e);
            return InspectionOutcome::failed(request, e.to_string());
        }
    };

    let preview = make_preview(&image);

    let result = match classify_image(classifier, &image) {
        Ok(prediction) => ClassificationResult::Classified(prediction),
        Err(e) => {
            warn!("Classification of {:?} failed: {}", request.file_path, e);
            ClassificationResult::Failed {
                description: e.to_string(),
            }
        }
    };

    InspectionOutcome {
        request,
        result,
        preview: Some(preview),
        finished_at: timestamp_now(),
    }
}

fn decode(path: &Path) -> Result<DynamicImage> {
    let reader = ImageReader::open(path)
        .map_err(image::ImageError::IoError)?
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?;
    Ok(reader.decode()?)
}

fn make_preview(image: &DynamicImage) -> Preview {
    let (width, height) = image.dimensions();
    let thumb = if width > PREVIEW_EDGE || height > PREVIEW_EDGE {
        image.thumbnail(PREVIEW_EDGE, PREVIEW_EDGE).to_rgba8()
    } else {
        image.to_rgba8()
    };
    Preview {
        size: [thumb.width() as usize, thumb.height() as usize],
        pixels: thumb.into_raw(),
    }
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Drives inspections one at a time on behalf of the interactive thread
pub struct Inspector {
    classifier: Arc<dyn Classifier>,
    history: HistoryStore,
    runtime: Handle,
    state: InspectionState,
    pending: Option<oneshot::Receiver<InspectionOutcome>>,
    waker: Option<Waker>,
}

impl Inspector {
    pub fn new(classifier: Arc<dyn Classifier>, history: HistoryStore, runtime: Handle) -> Self {
        Self {
            classifier,
            history,
            runtime,
            state: InspectionState::Idle,
            pending: None,
            waker: None,
        }
    }

    /// Called from the worker once its outcome has been sent, e.g. to
    /// schedule a repaint of the window
    pub fn set_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.waker = Some(Arc::new(waker));
    }

    /// Start inspecting `file_path` in the background
    ///
    /// Rejected unless the inspector is idle.
    pub fn begin(&mut self, file_path: impl Into<PathBuf>) -> Result<()> {
        let request = InspectionRequest::new(file_path);

        match &self.state {
            InspectionState::Idle => {}
            InspectionState::Busy(current) => {
                return Err(AinspectError::NotIdle(format!(
                    "still inspecting {}",
                    current.file_name()
                )));
            }
            InspectionState::ShowingResult(outcome) => {
                return Err(AinspectError::NotIdle(format!(
                    "result for {} has not been dismissed",
                    outcome.request.file_name()
                )));
            }
        }

        info!("Inspecting: {:?}", request.file_path);

        let (tx, rx) = oneshot::channel();
        let classifier = Arc::clone(&self.classifier);
        let waker = self.waker.clone();
        let worker_request = request.clone();

        self.runtime.spawn_blocking(move || {
            let outcome = inspect(classifier.as_ref(), worker_request);
            if tx.send(outcome).is_err() {
                debug!("Inspection finished after the inspector was dropped");
            }
            if let Some(wake) = waker {
                wake();
            }
        });

        self.pending = Some(rx);
        self.state = InspectionState::Busy(request);
        Ok(())
    }

    /// Collect a finished inspection, if any
    ///
    /// Returns the outcome only on the call that completes it.
    pub fn poll(&mut self) -> Option<&InspectionOutcome> {
        let received = self.pending.as_mut()?.try_recv();
        let outcome = match received {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => self.lost_worker()?,
        };
        self.complete(outcome)
    }

    /// Wait for the running inspection to finish
    pub async fn finish(&mut self) -> Option<&InspectionOutcome> {
        let rx = self.pending.take()?;
        let outcome = match rx.await {
            Ok(outcome) => outcome,
            Err(_) => self.lost_worker()?,
        };
        self.complete(outcome)
    }

    /// Leave `ShowingResult` so a new inspection can begin
    pub fn dismiss(&mut self) {
        if matches!(self.state, InspectionState::ShowingResult(_)) {
            self.state = InspectionState::Idle;
        }
    }

    pub fn state(&self) -> &InspectionState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, InspectionState::Busy(_))
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, InspectionState::Idle)
    }

    /// Outcome currently on display
    pub fn outcome(&self) -> Option<&InspectionOutcome> {
        match &self.state {
            InspectionState::ShowingResult(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn model_version(&self) -> &str {
        self.classifier.version()
    }

    fn lost_worker(&self) -> Option<InspectionOutcome> {
        match &self.state {
            InspectionState::Busy(request) => {
                error!("Inspection worker for {:?} stopped without a result", request.file_path);
                Some(InspectionOutcome::failed(
                    request.clone(),
                    "Inspection stopped unexpectedly".to_string(),
                ))
            }
            _ => None,
        }
    }

    fn complete(&mut self, outcome: InspectionOutcome) -> Option<&InspectionOutcome> {
        self.pending = None;

        let record = outcome.record();
        if let Err(e) = self.history.append(&record) {
            warn!("Failed to record inspection of {}: {}", record.file_name, e);
        }

        match &outcome.result {
            ClassificationResult::Classified(prediction) => info!(
                "{}: {} ({})",
                record.file_name,
                prediction.authenticity,
                prediction.confidence_text()
            ),
            ClassificationResult::Failed { description } => {
                info!("{}: Error ({})", record.file_name, description)
            }
        }

        self.state = InspectionState::ShowingResult(outcome);
        self.outcome()
    }
}
