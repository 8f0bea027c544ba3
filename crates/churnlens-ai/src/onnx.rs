//! ONNX Runtime backend for scikit-learn classifiers.
//!
//! Expects a model exported with `skl2onnx` and `zipmap=False`:
//! one `float32 [N, 19]` input, output 0 the predicted label (`int64 [N]`),
//! output 1 the class probabilities (`float32 [N, n_classes]`).

use std::path::Path;
use std::sync::Mutex;

use churnlens_core::{FEATURE_COUNT, FeatureVector};
use ort::session::Session;
use ort::value::Tensor;
use tracing::info;

use crate::model::ChurnModel;

/// A churn classifier running in ONNX Runtime.
///
/// Running a session needs exclusive access, so runs are serialized.
pub struct OnnxModel {
    name: String,
    input_name: String,
    session: Mutex<Session>,
}

struct Scored {
    label: i64,
    probabilities: Vec<f64>,
}

impl OnnxModel {
    /// Load a classifier from a `.onnx` file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        anyhow::ensure!(path.exists(), "model not found: {}", path.display());

        let session = Session::builder()?.commit_from_file(path)?;

        anyhow::ensure!(
            session.outputs().len() >= 2,
            "expected label and probability outputs, found {}",
            session.outputs().len()
        );

        let input = session
            .inputs()
            .first()
            .ok_or_else(|| anyhow::anyhow!("model has no inputs"))?;
        if let Some(width) = infer_width(input.dtype()) {
            anyhow::ensure!(
                width == FEATURE_COUNT,
                "model expects {width} features, encoder produces {FEATURE_COUNT}"
            );
        }
        let input_name = input.name().to_string();

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("onnx")
            .to_string();

        info!(model = %name, input = %input_name, path = %path.display(), "loaded ONNX classifier");
        Ok(Self {
            name,
            input_name,
            session: Mutex::new(session),
        })
    }

    fn run(&self, x: &FeatureVector) -> anyhow::Result<Scored> {
        let shape = [1i64, FEATURE_COUNT as i64];
        let input = Tensor::from_array((shape, x.to_f32().into_boxed_slice()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("ONNX session lock poisoned"))?;
        let outputs = session.run(ort::inputs![self.input_name.as_str() => input])?;

        let (_, labels) = outputs[0].try_extract_tensor::<i64>()?;
        let label = *labels
            .first()
            .ok_or_else(|| anyhow::anyhow!("empty label output"))?;

        let (prob_shape, probs) = outputs[1].try_extract_tensor::<f32>()?;
        let dims: &[i64] = prob_shape;
        anyhow::ensure!(
            dims.len() == 2 && dims[0] == 1 && dims[1] >= 2,
            "unexpected probability shape: {dims:?}, expected [1, n_classes]"
        );
        let probabilities = probs.iter().map(|&p| f64::from(p)).collect();

        Ok(Scored {
            label,
            probabilities,
        })
    }
}

impl ChurnModel for OnnxModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, x: &FeatureVector) -> anyhow::Result<usize> {
        let scored = self.run(x)?;
        usize::try_from(scored.label)
            .map_err(|_| anyhow::anyhow!("negative class label {}", scored.label))
    }

    fn predict_proba(&self, x: &FeatureVector) -> anyhow::Result<Vec<f64>> {
        Ok(self.run(x)?.probabilities)
    }
}

/// Width of a `[batch, width]` input, if the model declares it.
fn infer_width(input_type: &ort::value::ValueType) -> Option<usize> {
    match input_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}
