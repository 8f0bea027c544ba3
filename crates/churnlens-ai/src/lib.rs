//! Inference layer: model artifacts behind the [`ChurnModel`] trait, and
//! [`classify`] to turn a feature row into a labelled prediction.

mod logistic;
mod model;
mod predict;

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;

pub use logistic::LogisticModel;
pub use model::{ChurnModel, ModelError, load_model};
pub use predict::{CHURN_CLASS, ChurnLabel, Prediction, classify};
