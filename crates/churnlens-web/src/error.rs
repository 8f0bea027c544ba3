use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use churnlens_core::ValidationError;
use thiserror::Error;
use tracing::{error, info};

use crate::pages;

/// Anything a handler can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("unreadable form body: {0}")]
    Form(#[from] FormRejection),

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Form(e) => {
                let status = e.status();
                info!(%status, error = %e, "rejected form body");
                let page = pages::error_page("Invalid request", &e.body_text());
                (status, Html(page)).into_response()
            }
            Self::Validation(e) => {
                info!(field = e.field(), error = %e, "rejected form submission");
                let page = pages::error_page("Invalid input", &e.to_string());
                (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response()
            }
            Self::Internal(e) => {
                let detail = format!("{e:#}");
                error!(error = %detail, "request failed");
                let page = pages::error_page(
                    "Something went wrong",
                    "The prediction could not be completed. Please try again later.",
                );
                (StatusCode::INTERNAL_SERVER_ERROR, Html(page)).into_response()
            }
        }
    }
}
