pub mod error;
pub mod history;
pub mod labels;
pub mod link;
pub mod pipeline;
pub mod sequence;

pub use error::{ClassifyError, ExtractError, LabelsError};
pub use history::{HistoryEntry, LinkHistory};
pub use labels::{Labels, UNKNOWN_LABEL};
pub use link::VideoLink;
pub use pipeline::{Classify, EXTRACTION_FAILED, Prediction, Predictor, Preprocess, TitleSource};
pub use sequence::{SEQUENCE_LEN, TitleSequence};
