//! Logistic-regression churn model stored as JSON.
//!
//! ```json
//! {
//!   "name": "telco-logreg-v1",
//!   "intercept": -1.2,
//!   "coefficients": { "Tenure Months": -0.04, "Is Manual Payment": 0.6 },
//!   "threshold": 0.5
//! }
//! ```
//!
//! Coefficients are keyed by training column name. Columns left out weigh 0.

use std::collections::BTreeMap;
use std::path::Path;

use churnlens_core::{FEATURE_COUNT, Feature, FeatureVector};
use serde::Deserialize;

use crate::model::{ChurnModel, ModelError};

const DEFAULT_NAME: &str = "logistic";

fn default_threshold() -> f64 {
    0.5
}

#[derive(Debug, Deserialize)]
struct Artifact {
    #[serde(default)]
    name: Option<String>,
    intercept: f64,
    coefficients: BTreeMap<String, f64>,
    #[serde(default = "default_threshold")]
    threshold: f64,
}

/// Linear model with a sigmoid link, weights laid out in training order.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    name: String,
    intercept: f64,
    weights: [f64; FEATURE_COUNT],
    threshold: f64,
}

impl LogisticModel {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let artifact: Artifact = serde_json::from_str(text)?;

        if !(0.0..=1.0).contains(&artifact.threshold) {
            return Err(ModelError::BadThreshold(artifact.threshold));
        }

        let mut weights = [0.0; FEATURE_COUNT];
        for (column, weight) in &artifact.coefficients {
            let feature = Feature::from_column(column)
                .ok_or_else(|| ModelError::UnknownColumn(column.clone()))?;
            weights[feature.index()] = *weight;
        }

        Ok(Self {
            name: artifact.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            intercept: artifact.intercept,
            weights,
            threshold: artifact.threshold,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn weight(&self, feature: Feature) -> f64 {
        self.weights[feature.index()]
    }

    /// Probability of churn.
    fn churn_probability(&self, x: &FeatureVector) -> f64 {
        let z = self.intercept
            + self
                .weights
                .iter()
                .zip(x.as_slice())
                .map(|(w, v)| w * v)
                .sum::<f64>();
        sigmoid(z)
    }
}

impl ChurnModel for LogisticModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, x: &FeatureVector) -> anyhow::Result<usize> {
        Ok(usize::from(self.churn_probability(x) >= self.threshold))
    }

    fn predict_proba(&self, x: &FeatureVector) -> anyhow::Result<Vec<f64>> {
        let p = self.churn_probability(x);
        Ok(vec![1.0 - p, p])
    }
}

#[inline]
fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
