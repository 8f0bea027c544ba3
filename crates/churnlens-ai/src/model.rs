//! The model seam: anything that can score a [`FeatureVector`].

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use churnlens_core::FeatureVector;
use thiserror::Error;
use tracing::info;

use crate::logistic::LogisticModel;

/// Problems with a model artifact, detected at load time.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model file not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("unsupported model format {0:?} (expected .json or .onnx)")]
    UnsupportedFormat(String),

    #[error("ONNX models need the `onnx` feature")]
    OnnxDisabled,

    #[error("unknown feature column {0:?} in model coefficients")]
    UnknownColumn(String),

    #[error("threshold must be in [0, 1], got {0}")]
    BadThreshold(f64),

    #[error("reading model: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A trained binary churn classifier.
///
/// Class 1 is "churn", class 0 is "stay". Implementations are immutable
/// after loading and shared across requests.
pub trait ChurnModel: Send + Sync {
    /// Short name for logs and pages.
    fn name(&self) -> &str;

    /// Predicted class index for one row.
    fn predict(&self, x: &FeatureVector) -> anyhow::Result<usize>;

    /// Probability per class for one row, indexed by class.
    fn predict_proba(&self, x: &FeatureVector) -> anyhow::Result<Vec<f64>>;
}

/// Load a model artifact, choosing the backend from the file extension.
pub fn load_model(path: &Path) -> anyhow::Result<Arc<dyn ChurnModel>> {
    if !path.exists() {
        return Err(ModelError::NotFound(path.to_path_buf()).into());
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let model: Arc<dyn ChurnModel> = match ext.as_str() {
        "json" => Arc::new(
            LogisticModel::load(path)
                .with_context(|| format!("loading logistic model {}", path.display()))?,
        ),
        "onnx" => load_onnx(path)?,
        other => return Err(ModelError::UnsupportedFormat(other.to_string()).into()),
    };

    info!(model = model.name(), path = %path.display(), "loaded churn model");
    Ok(model)
}

#[cfg(feature = "onnx")]
fn load_onnx(path: &Path) -> anyhow::Result<Arc<dyn ChurnModel>> {
    let model = crate::onnx::OnnxModel::load(path)
        .with_context(|| format!("loading ONNX model {}", path.display()))?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(_path: &Path) -> anyhow::Result<Arc<dyn ChurnModel>> {
    Err(ModelError::OnnxDisabled.into())
}
