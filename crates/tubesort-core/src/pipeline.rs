//! Link to category pipeline: fetch the title, tokenize it, run the model,
//! name the top output.
//!
//! Each stage sits behind a trait so the HTTP client and the ONNX model can
//! be swapped for fakes. Failures are reported as tagged [`Prediction`]
//! variants; the web layer collapses them into the two user-facing messages.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::error::{ClassifyError, ExtractError};
use crate::labels::{Labels, argmax};
use crate::link::VideoLink;
use crate::sequence::TitleSequence;

/// Headline shown when no title could be fetched.
pub const EXTRACTION_FAILED: &str = "Failed to extract video title";

/// Resolves a link to the video's display title.
#[async_trait]
pub trait TitleSource: Send + Sync {
    async fn fetch_title(&self, link: &VideoLink) -> Result<String, ExtractError>;
}

/// Turns a title into the model's fixed-length input. Never fails.
pub trait Preprocess: Send + Sync {
    fn preprocess(&self, title: &str) -> TitleSequence;
}

/// One forward pass: token window in, one score per category out.
pub trait Classify: Send + Sync {
    fn classify(&self, seq: &TitleSequence) -> Result<Vec<f32>, ClassifyError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    Classified {
        title: String,
        label: String,
        probabilities: Vec<f32>,
    },
    ExtractionFailed(ExtractError),
    ClassificationFailed { reason: String },
}

impl Prediction {
    /// Text for the "predicted category" slot; `None` means the generic
    /// failure page.
    pub fn headline(&self) -> Option<&str> {
        match self {
            Self::Classified { label, .. } => Some(label),
            Self::ExtractionFailed(_) => Some(EXTRACTION_FAILED),
            Self::ClassificationFailed { .. } => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Classified { title, .. } => Some(title),
            _ => None,
        }
    }

    pub fn probabilities(&self) -> Option<&[f32]> {
        match self {
            Self::Classified { probabilities, .. } => Some(probabilities),
            _ => None,
        }
    }
}

/// Composes the three stages; cheap to clone and share across requests.
#[derive(Clone)]
pub struct Predictor {
    source: Arc<dyn TitleSource>,
    preprocessor: Arc<dyn Preprocess>,
    classifier: Arc<dyn Classify>,
    labels: Labels,
}

impl Predictor {
    pub fn new(
        source: Arc<dyn TitleSource>,
        preprocessor: Arc<dyn Preprocess>,
        classifier: Arc<dyn Classify>,
        labels: Labels,
    ) -> Self {
        Self {
            source,
            preprocessor,
            classifier,
            labels,
        }
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub async fn predict(&self, link: &VideoLink) -> Prediction {
        let title = match self.source.fetch_title(link).await {
            Ok(title) => title,
            Err(e) => {
                warn!(link = %link, error = %e, "title extraction failed");
                return Prediction::ExtractionFailed(e);
            }
        };
        debug!(link = %link, title = %title, "fetched title");

        let probabilities = match self.run_model(title.clone()).await {
            Ok(p) => p,
            Err(e) => {
                error!(link = %link, error = %e, "classification failed");
                return Prediction::ClassificationFailed {
                    reason: e.to_string(),
                };
            }
        };

        // An all-NaN output has no winner either.
        let Some(top) = argmax(&probabilities) else {
            error!(link = %link, ?probabilities, "model output has no maximum");
            return Prediction::ClassificationFailed {
                reason: ClassifyError::EmptyOutput.to_string(),
            };
        };

        let label = self.labels.label_for(top).to_string();
        debug!(link = %link, top, label = %label, "classified");
        Prediction::Classified {
            title,
            label,
            probabilities,
        }
    }

    /// Tokenize and run inference on the blocking pool.
    async fn run_model(&self, title: String) -> Result<Vec<f32>, ClassifyError> {
        let preprocessor = Arc::clone(&self.preprocessor);
        let classifier = Arc::clone(&self.classifier);
        tokio::task::spawn_blocking(move || {
            let seq = preprocessor.preprocess(&title);
            classifier.classify(&seq)
        })
        .await
        .map_err(|e| ClassifyError::Aborted(e.to_string()))?
    }
}
