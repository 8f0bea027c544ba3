//! Turning model output into a labelled, human-readable prediction.

use churnlens_core::FeatureVector;
use tracing::debug;

use crate::model::ChurnModel;

/// Index of the churn class in model output.
pub const CHURN_CLASS: usize = 1;

/// Outcome for a single customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChurnLabel {
    /// Customer is expected to leave.
    Churn,
    /// Customer is expected to stay.
    Stay,
}

impl ChurnLabel {
    pub fn from_class(class: usize) -> Self {
        if class == CHURN_CLASS {
            Self::Churn
        } else {
            Self::Stay
        }
    }

    /// Sentence shown on the result page.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Churn => "Customer will Churn",
            Self::Stay => "Customer will Stay",
        }
    }

    /// Bootstrap text colour for the headline.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Churn => "text-danger",
            Self::Stay => "text-success",
        }
    }

    /// Result-card modifier.
    pub fn css_name(&self) -> &'static str {
        match self {
            Self::Churn => "positive",
            Self::Stay => "negative",
        }
    }
}

/// A scored customer.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: ChurnLabel,
    pub class_index: usize,
    pub probabilities: Vec<f64>,
    /// Probability of the predicted class, in percent.
    pub confidence_percent: f64,
}

impl Prediction {
    /// Confidence with two decimals, e.g. `"83.47%"`.
    pub fn confidence_display(&self) -> String {
        format!("{:.2}%", self.confidence_percent)
    }
}

/// Run both model operations on one row and label the result.
pub fn classify(model: &dyn ChurnModel, x: &FeatureVector) -> anyhow::Result<Prediction> {
    let class_index = model.predict(x)?;
    let probabilities = model.predict_proba(x)?;

    let p = *probabilities.get(class_index).ok_or_else(|| {
        anyhow::anyhow!(
            "model {} predicted class {class_index} but returned {} probabilities",
            model.name(),
            probabilities.len()
        )
    })?;
    anyhow::ensure!(
        (0.0..=1.0).contains(&p),
        "model {} returned probability {p} outside [0, 1]",
        model.name()
    );

    let label = ChurnLabel::from_class(class_index);
    debug!(model = model.name(), class = class_index, probability = p, "classified customer");

    Ok(Prediction {
        label,
        class_index,
        probabilities,
        confidence_percent: p * 100.0,
    })
}
