//! Web front end: prediction form, result page, visualization gallery.

mod error;
mod gallery;
mod handlers;
pub mod pages;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use churnlens_ai::ChurnModel;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::AppError;
pub use gallery::{IMAGE_EXTENSIONS, list_images};

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn ChurnModel>,
    /// Root of `/static`; images live in its `visualizations/` subdirectory.
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(model: Arc<dyn ChurnModel>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            model,
            static_dir: static_dir.into(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict))
        .route("/visualizations", get(handlers::visualizations))
        .route("/about", get(handlers::about))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let model = state.model.name().to_string();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, model = %model, "churnlens listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use churnlens_core::FeatureVector;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    /// Returns fixed output and counts how often it is asked.
    struct Scripted {
        class: usize,
        proba: Vec<f64>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl Scripted {
        fn new(class: usize, proba: &[f64]) -> Arc<Self> {
            Arc::new(Self {
                class,
                proba: proba.to_vec(),
                calls: AtomicUsize::new(0),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                class: 0,
                proba: vec![],
                calls: AtomicUsize::new(0),
                fail: true,
            })
        }
    }

    impl ChurnModel for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn predict(&self, _x: &FeatureVector) -> anyhow::Result<usize> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("inference backend unavailable");
            }
            Ok(self.class)
        }

        fn predict_proba(&self, _x: &FeatureVector) -> anyhow::Result<Vec<f64>> {
            Ok(self.proba.clone())
        }
    }

    const SAMPLE: &[(&str, &str)] = &[
        ("monthly_charges", "70.5"),
        ("total_charges", "846"),
        ("tenure", "15"),
        ("contract_type", "One year"),
        ("payment_method", "Credit card"),
        ("internet_service", "DSL"),
        ("online_security", "Yes"),
        ("online_backup", "No"),
        ("device_protection", "No"),
        ("tech_support", "No"),
        ("streaming_tv", "Yes"),
        ("streaming_movies", "No"),
        ("senior_citizen", "No"),
        ("partner", "Yes"),
        ("dependents", "No"),
        ("paperless_billing", "Yes"),
    ];

    fn form_body(pairs: &[(&str, &str)]) -> String {
        serde_urlencoded::to_string(pairs).unwrap()
    }

    fn with_override(field: &'static str, value: &'static str) -> Vec<(&'static str, &'static str)> {
        SAMPLE
            .iter()
            .map(|&(k, v)| if k == field { (k, value) } else { (k, v) })
            .collect()
    }

    fn app(model: Arc<dyn ChurnModel>, static_dir: &Path) -> Router {
        router(AppState::new(model, static_dir))
    }

    async fn get_page(app: Router, uri: &str) -> (StatusCode, String) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(app, req).await
    }

    async fn post_form(app: Router, pairs: &[(&str, &str)]) -> (StatusCode, String) {
        let req = Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form_body(pairs)))
            .unwrap();
        send(app, req).await
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, String) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn index_serves_form() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get_page(app(Scripted::new(0, &[1.0, 0.0]), dir.path()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("action=\"/predict\""));
        assert!(body.contains("name=\"monthly_charges\""));
    }

    #[tokio::test]
    async fn about_page() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get_page(app(Scripted::new(0, &[1.0, 0.0]), dir.path()), "/about").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>About</h1>"));
    }

    #[tokio::test]
    async fn predict_renders_churn_result() {
        let dir = tempfile::tempdir().unwrap();
        let model = Scripted::new(1, &[0.1653, 0.8347]);
        let (status, body) = post_form(app(model.clone(), dir.path()), SAMPLE).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Customer will Churn"));
        assert!(body.contains("83.47%"));
        assert!(body.contains("text-danger"));
        assert!(body.contains("<dd>Credit card</dd>"));
        assert!(body.contains("<dd>One year</dd>"));
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn predict_with_bundled_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("models")
            .join("churn_logistic.json");
        let model = churnlens_ai::load_model(&path).unwrap();

        let (status, body) = post_form(app(model, dir.path()), SAMPLE).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Customer will Stay"));
        assert!(body.contains("87.46%"));
    }

    #[tokio::test]
    async fn malformed_number_is_422_and_skips_model() {
        let dir = tempfile::tempdir().unwrap();
        let model = Scripted::new(1, &[0.2, 0.8]);
        let pairs = with_override("monthly_charges", "abc");
        let (status, body) = post_form(app(model.clone(), dir.path()), &pairs).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("monthly_charges"));
        assert!(body.contains("&quot;abc&quot;"));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_toggles_still_predict() {
        let dir = tempfile::tempdir().unwrap();
        let model = Scripted::new(0, &[0.7, 0.3]);
        let pairs: Vec<_> = SAMPLE
            .iter()
            .copied()
            .filter(|(k, _)| !matches!(*k, "partner" | "streaming_tv" | "tech_support"))
            .collect();
        let (status, body) = post_form(app(model, dir.path()), &pairs).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Customer will Stay"));
        assert!(body.contains("70.00%"));
    }

    #[tokio::test]
    async fn repeated_toggle_keeps_first_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("models")
            .join("churn_logistic.json");
        let model = churnlens_ai::load_model(&path).unwrap();

        let mut pairs = SAMPLE.to_vec();
        pairs.push(("partner", "No"));
        pairs.push(("contract_type", "Month-to-month"));
        let (status, body) = post_form(app(model, dir.path()), &pairs).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<dd>One year</dd>"));
        assert!(body.contains("87.46%"));
    }

    #[tokio::test]
    async fn unreadable_body_renders_error_page() {
        let dir = tempfile::tempdir().unwrap();
        let model = Scripted::new(1, &[0.2, 0.8]);
        let req = Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"tenure": "15"}"#))
            .unwrap();
        let (status, body) = send(app(model.clone(), dir.path()), req).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body.starts_with("<!DOCTYPE html>"));
        assert!(body.contains("Invalid request"));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_required_field_is_422() {
        let dir = tempfile::tempdir().unwrap();
        let pairs: Vec<_> = SAMPLE
            .iter()
            .copied()
            .filter(|(k, _)| *k != "tenure")
            .collect();
        let (status, body) = post_form(app(Scripted::new(0, &[1.0, 0.0]), dir.path()), &pairs).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("missing required field"));
    }

    #[tokio::test]
    async fn model_failure_is_500_without_details() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = post_form(app(Scripted::failing(), dir.path()), SAMPLE).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("Something went wrong"));
        assert!(!body.contains("inference backend unavailable"));
    }

    #[tokio::test]
    async fn echoed_input_is_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let pairs = with_override("payment_method", "<img src=x onerror=alert(1)>");
        let (status, body) = post_form(app(Scripted::new(0, &[0.9, 0.1]), dir.path()), &pairs).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("<img src=x"));
        assert!(body.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[tokio::test]
    async fn visualizations_lists_images() {
        let dir = tempfile::tempdir().unwrap();
        let vis = dir.path().join("visualizations");
        std::fs::create_dir(&vis).unwrap();
        std::fs::write(vis.join("tenure_hist.png"), b"png").unwrap();
        std::fs::write(vis.join("contract.svg"), b"<svg/>").unwrap();
        std::fs::write(vis.join("notes.txt"), b"text").unwrap();

        let (status, body) = get_page(app(Scripted::new(0, &[1.0, 0.0]), dir.path()), "/visualizations").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/static/visualizations/tenure_hist.png"));
        assert!(body.contains("/static/visualizations/contract.svg"));
        assert!(!body.contains("notes.txt"));
        let first = body.find("contract.svg").unwrap();
        let second = body.find("tenure_hist.png").unwrap();
        assert!(first < second, "gallery should be sorted");
    }

    #[tokio::test]
    async fn visualizations_without_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get_page(app(Scripted::new(0, &[1.0, 0.0]), dir.path()), "/visualizations").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("No visualizations available."));
    }

    #[tokio::test]
    async fn static_files_are_served() {
        let dir = tempfile::tempdir().unwrap();
        let vis = dir.path().join("visualizations");
        std::fs::create_dir(&vis).unwrap();
        std::fs::write(vis.join("chart.svg"), b"<svg/>").unwrap();

        let (status, body) = get_page(
            app(Scripted::new(0, &[1.0, 0.0]), dir.path()),
            "/static/visualizations/chart.svg",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<svg/>");
    }

    #[tokio::test]
    async fn predict_rejects_get() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _) = get_page(app(Scripted::new(0, &[1.0, 0.0]), dir.path()), "/predict").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
