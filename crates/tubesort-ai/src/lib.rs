//! Inference layer: title tokenization and ONNX Runtime classification.

mod preprocess;
pub use preprocess::TitlePreprocessor;

#[cfg(feature = "onnx")]
mod classifier;
#[cfg(feature = "onnx")]
pub use classifier::{OnnxClassifier, load_model_dir};
