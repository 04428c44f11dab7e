//! ONNX Runtime classifier over padded title windows.
//!
//! The model directory must contain `model.onnx` and `tokenizer.json`. The
//! model takes a single `[1, seq_len]` input and yields one score per
//! category on its first output.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use ort::session::Session;
use ort::tensor::TensorElementType;
use ort::value::{DynValue, Tensor, ValueType};
use tracing::{debug, info};
use tubesort_core::{ClassifyError, Classify, TitleSequence};

use crate::TitlePreprocessor;

/// Pretrained title classifier.
///
/// `Session::run` needs exclusive access, so concurrent requests take turns
/// on the mutex. A panic during `run` does not invalidate the session, so a
/// poisoned lock is recovered rather than failing every later request.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    input_name: String,
    input_type: TensorElementType,
}

/// Load the vocabulary and model from a directory holding `tokenizer.json`
/// and `model.onnx`.
pub fn load_model_dir(
    model_dir: &Path,
    seq_len: usize,
) -> anyhow::Result<(TitlePreprocessor, OnnxClassifier)> {
    let preprocessor = TitlePreprocessor::load(&model_dir.join("tokenizer.json"), seq_len)?;
    let classifier = OnnxClassifier::load(&model_dir.join("model.onnx"))?;
    Ok((preprocessor, classifier))
}

impl OnnxClassifier {
    pub fn load(model_path: &Path) -> anyhow::Result<Self> {
        anyhow::ensure!(model_path.exists(), "model not found at {model_path:?}");

        let session = Session::builder()?.commit_from_file(model_path)?;

        let input = session
            .inputs()
            .first()
            .ok_or_else(|| anyhow::anyhow!("model declares no inputs"))?;
        let input_name = input.name().to_string();
        let input_type = match input.dtype() {
            ValueType::Tensor { ty, .. } => *ty,
            other => anyhow::bail!("unsupported model input {input_name}: {other:?}"),
        };
        anyhow::ensure!(
            matches!(
                input_type,
                TensorElementType::Int64 | TensorElementType::Int32 | TensorElementType::Float32
            ),
            "unsupported input element type {input_type:?}"
        );
        let categories = output_width(session.outputs()[0].dtype());

        info!(
            input = %input_name,
            ?input_type,
            ?categories,
            model = %model_path.display(),
            "loaded classifier model"
        );
        Ok(Self {
            session: Mutex::new(session),
            input_name,
            input_type,
        })
    }

    fn input_value(&self, seq: &TitleSequence) -> ort::Result<DynValue> {
        let shape = [1i64, seq.len() as i64];
        let ids = seq.as_slice();
        let value = match self.input_type {
            TensorElementType::Int64 => {
                Tensor::from_array((shape, ids.to_vec().into_boxed_slice()))?.into_dyn()
            }
            TensorElementType::Int32 => {
                let data: Vec<i32> = ids.iter().map(|&id| id as i32).collect();
                Tensor::from_array((shape, data.into_boxed_slice()))?.into_dyn()
            }
            _ => {
                let data: Vec<f32> = ids.iter().map(|&id| id as f32).collect();
                Tensor::from_array((shape, data.into_boxed_slice()))?.into_dyn()
            }
        };
        Ok(value)
    }
}

impl Classify for OnnxClassifier {
    fn classify(&self, seq: &TitleSequence) -> Result<Vec<f32>, ClassifyError> {
        let input = self.input_value(seq).map_err(inference)?;

        let mut session = lock_recovering(&self.session);
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(inference)?;

        let (shape, data) = outputs[0].try_extract_tensor::<f32>().map_err(inference)?;
        let dims: &[i64] = shape;
        debug!(?dims, "model output");
        if data.is_empty() {
            return Err(ClassifyError::EmptyOutput);
        }
        Ok(data.to_vec())
    }
}

fn lock_recovering<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn inference(e: ort::Error) -> ClassifyError {
    ClassifyError::Inference(e.to_string())
}

/// Number of categories from the output's last dimension, when static.
fn output_width(output_type: &ValueType) -> Option<usize> {
    match output_type {
        ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}
