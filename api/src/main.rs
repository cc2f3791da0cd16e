// ./api/src/main.rs
mod config;
mod views;

use axum::{
    Form, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::path::Path as FsPath;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use application::{ApplicationError, RecordService, SubmitRecordRequest};
use config::AppConfig;
use infrastructure::{StoreHandle, spawn_connect};

/// Where a successful submission sends the submitter.
const AFTER_SUBMIT_LOCATION: &str = "/";
const DASHBOARD_LOCATION: &str = "/dashboard";

#[derive(Clone)]
struct AppState {
    record_service: Arc<RecordService>,
    store: StoreHandle,
}

// Application entry point
#[tokio::main]
async fn main() {
    // --- Logger Initialization ---
    let filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
    info!("Logger initialized successfully.");

    // --- Configuration ---
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // --- Dependency Injection ---
    // The connection is established in the background; the server starts either way.
    let store = spawn_connect(config.store_uri.clone());
    let record_service = Arc::new(RecordService::new(Arc::new(store.clone())));
    let app_state = AppState {
        record_service,
        store,
    };

    let app = build_router(app_state, &config.static_dir);
    info!("Routes configured.");

    // --- Server Startup ---
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("Server running on http://localhost:{}", config.port);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn build_router(state: AppState, static_dir: &FsPath) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/submit", post(submit_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/delete/:id", post(delete_record_handler))
        .route("/delete-all", post(delete_all_handler))
        .route("/health", get(health_check))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 302 Found with the given Location.
fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

// --- Handlers ---

async fn health_check(State(state): State<AppState>) -> Response {
    if state.store.is_ready() {
        (StatusCode::OK, "OK").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable").into_response()
    }
}

async fn index_handler() -> Html<String> {
    Html(views::submission_form())
}

/// Handler for a form submission (POST /submit).
async fn submit_handler(
    State(state): State<AppState>,
    Form(payload): Form<SubmitRecordRequest>,
) -> Response {
    match state.record_service.create(payload).await {
        Ok(_) => found(AFTER_SUBMIT_LOCATION),
        Err(e) => {
            error!("Error saving record: {}", e);
            map_application_error_to_response(e)
        }
    }
}

/// Handler for the record listing (GET /dashboard).
async fn dashboard_handler(State(state): State<AppState>) -> Response {
    match state.record_service.list_all().await {
        Ok(records) => Html(views::dashboard(&records)).into_response(),
        Err(e) => {
            error!("Error fetching records: {}", e);
            map_application_error_to_response(e)
        }
    }
}

/// Handler for deleting one record (POST /delete/:id). Unknown IDs still redirect.
async fn delete_record_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.record_service.delete_one(&id).await {
        Ok(()) => found(DASHBOARD_LOCATION),
        Err(e) => {
            error!(record_id = %id, "Error deleting record: {}", e);
            map_application_error_to_response(e)
        }
    }
}

/// Handler for deleting every record (POST /delete-all).
async fn delete_all_handler(State(state): State<AppState>) -> Response {
    match state.record_service.delete_all().await {
        Ok(()) => found(DASHBOARD_LOCATION),
        Err(e) => {
            error!("Error deleting all records: {}", e);
            map_application_error_to_response(e)
        }
    }
}

/// Every application error leaves as a bare 500; details stay in the server log.
fn map_application_error_to_response(err: ApplicationError) -> Response {
    if let ApplicationError::DomainError(domain_err) = &err {
        warn!("Rejected submission: {}", domain_err);
    }
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use infrastructure::InMemoryRecordRepository;
    use tower::ServiceExt;

    fn app_with(store: StoreHandle) -> Router {
        let state = AppState {
            record_service: Arc::new(RecordService::new(Arc::new(store.clone()))),
            store,
        };
        build_router(state, FsPath::new("public"))
    }

    fn connected_app() -> Router {
        app_with(StoreHandle::connected(Arc::new(InMemoryRecordRepository::new())))
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn index_renders_form() {
        let response = connected_app().oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<form"));
    }

    #[tokio::test]
    async fn submit_stores_record_and_redirects() {
        let app = connected_app();

        let response = app
            .clone()
            .oneshot(form_post("/submit", "name=alice&message=pw1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/");

        let response = app.oneshot(get_request("/dashboard")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Records (1)"));
        assert!(html.contains("alice"));
        assert!(html.contains("pw1"));
    }

    #[tokio::test]
    async fn submit_missing_field_is_server_error() {
        let response = connected_app()
            .oneshot(form_post("/submit", "name=alice"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Internal Server Error");
    }

    #[tokio::test]
    async fn delete_unknown_record_redirects_to_dashboard() {
        let response = connected_app()
            .oneshot(form_post("/delete/does-not-exist", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/dashboard");
    }

    #[tokio::test]
    async fn delete_all_clears_dashboard() {
        let app = connected_app();
        for body in ["name=a&message=1", "name=b&message=2"] {
            app.clone().oneshot(form_post("/submit", body)).await.unwrap();
        }

        let response = app.clone().oneshot(form_post("/delete-all", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/dashboard");

        let html = body_text(app.oneshot(get_request("/dashboard")).await.unwrap()).await;
        assert!(html.contains("Records (0)"));
    }

    #[tokio::test]
    async fn unready_store_yields_generic_errors() {
        let app = app_with(StoreHandle::default());

        let response = app.clone().oneshot(get_request("/dashboard")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Internal Server Error");

        let response = app
            .clone()
            .oneshot(form_post("/submit", "name=a&message=1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn health_reports_ready_store() {
        let response = connected_app().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
