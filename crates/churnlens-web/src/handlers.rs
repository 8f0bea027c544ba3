use axum::Form;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::response::Html;
use churnlens_ai::classify;
use churnlens_core::{CustomerForm, FeatureVector};
use tracing::{info, warn};

use crate::error::AppError;
use crate::gallery::list_images;
use crate::{AppState, pages};

/// Directory under the static root holding gallery images.
pub const VISUALIZATIONS_DIR: &str = "visualizations";

pub async fn index() -> Html<String> {
    Html(pages::index())
}

pub async fn about() -> Html<String> {
    Html(pages::about())
}

pub async fn predict(
    State(state): State<AppState>,
    body: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let Form(pairs) = body?;
    let profile = CustomerForm::from_pairs(pairs).validate()?;
    let features = FeatureVector::from(&profile);
    let prediction = classify(state.model.as_ref(), &features)?;

    info!(
        model = state.model.name(),
        label = prediction.label.headline(),
        confidence = %prediction.confidence_display(),
        tenure = profile.tenure,
        "scored customer"
    );
    Ok(Html(pages::result(&prediction, &profile)))
}

pub async fn visualizations(State(state): State<AppState>) -> Html<String> {
    let dir = state.static_dir.join(VISUALIZATIONS_DIR);
    let images = match list_images(&dir).await {
        Ok(images) => images,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot list visualizations");
            Vec::new()
        }
    };
    Html(pages::gallery(&images))
}
