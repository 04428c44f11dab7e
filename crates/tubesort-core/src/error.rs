use thiserror::Error;

/// Why a title could not be obtained for a link.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("metadata request failed: {0}")]
    Network(String),

    #[error("metadata service returned {status}")]
    Status { status: u16 },

    #[error("malformed metadata response: {0}")]
    Malformed(String),

    #[error("no video found for id {0:?}")]
    NotFound(String),

    #[error("video has an empty title")]
    EmptyTitle,
}

/// Failure inside the classifier adapter.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model produced an empty output")]
    EmptyOutput,

    #[error("inference task aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LabelsError {
    #[error("label list is empty")]
    Empty,

    #[error("blank label at position {0}")]
    Blank(usize),

    #[error("duplicate label {0:?}")]
    Duplicate(String),
}
