//! Sprout Web Server
//!
//! Axum-based REST API for the Sprout sustainability challenge tracker.
//! All state lives in one in-memory user aggregate behind an async lock;
//! handlers take the lock for the duration of a single operation, so the
//! observable order of mutations is the order requests are handled in.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

use sprout_core::{Catalog, Recommender, UserProfile, WeightMatrix};

mod handlers;

/// Number of recommendation reasons surfaced per challenge
pub const MAX_REASONS: usize = 3;

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Allowed CORS origins
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        // The local dev frontend origins
        Self {
            allowed_origins: vec![
                "http://localhost:8080".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

/// Shared application state
pub struct AppState {
    pub catalog: Catalog,
    pub recommender: Recommender,
    /// The singleton user aggregate
    pub profile: RwLock<UserProfile>,
    /// Directory holding the JSON data files (redemptions are re-read per
    /// request so the file can change without a restart)
    pub data_dir: PathBuf,
}

/// Create the application router
pub fn create_router(
    catalog: Catalog,
    profile: UserProfile,
    data_dir: PathBuf,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<Router> {
    let recommender = Recommender::new(WeightMatrix::builtin(), catalog.questions())?;

    let state = Arc::new(AppState {
        catalog,
        recommender,
        profile: RwLock::new(profile),
        data_dir,
    });

    let api_routes = Router::new()
        // Onboarding
        .route("/questions", get(handlers::get_questions))
        .route("/onboarding", post(handlers::submit_onboarding))
        // Profile
        .route(
            "/user/profile",
            get(handlers::get_user_profile).put(handlers::update_user_profile),
        )
        .route("/user/stats", get(handlers::get_user_stats))
        // Challenges
        .route(
            "/challenges/personalized",
            get(handlers::get_personalized_challenges),
        )
        .route("/challenges/:id", get(handlers::get_challenge))
        .route("/challenges/:id/start", post(handlers::start_challenge))
        .route(
            "/challenges/:id/complete",
            post(handlers::complete_challenge),
        )
        // Wallet
        .route("/wallet/transactions", get(handlers::get_transactions))
        .route("/wallet/redeem", post(handlers::redeem_reward))
        .route(
            "/wallet/redemptions",
            get(handlers::get_redemption_options),
        );

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let mut app = Router::new()
        .route("/", get(root))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    Ok(app)
}

/// Start the server
pub async fn serve(
    catalog: Catalog,
    profile: UserProfile,
    data_dir: PathBuf,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(
        catalog,
        profile,
        data_dir,
        host,
        port,
        static_dir,
        ServerConfig::default(),
    )
    .await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    catalog: Catalog,
    profile: UserProfile,
    data_dir: PathBuf,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let app = create_router(catalog, profile, data_dir, static_dir, config)?;
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET / - service banner
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Sprout API is running" }))
}

// ============================================================================
// Error Handling
// ============================================================================

/// An HTTP status plus a message that is safe to show the client.
///
/// Unexpected failures additionally carry the source error, which only ever
/// reaches the log.
pub struct AppError {
    status: StatusCode,
    message: String,
    source: Option<anyhow::Error>,
}

impl AppError {
    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            source: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unprocessable(msg: &str) -> Self {
        Self::with_status(StatusCode::UNPROCESSABLE_ENTITY, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }

    pub fn conflict(msg: &str) -> Self {
        Self::with_status(StatusCode::CONFLICT, msg)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(source) = &self.source {
            error!(error = %source, "Request failed unexpectedly");
        }

        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        // Anything not mapped to a 4xx becomes a generic 500; the source
        // detail stays out of the response body.
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "An internal error occurred".to_string(),
            source: Some(err.into()),
        }
    }
}

/// Map a core error to its HTTP representation: validation failures are
/// unprocessable input, precondition failures are conflicts, and anything
/// else is an internal error with a generic client message.
pub(crate) fn core_error(err: sprout_core::Error) -> AppError {
    match err {
        sprout_core::Error::Validation(msg) => AppError::unprocessable(&msg),
        sprout_core::Error::Precondition(msg) => AppError::conflict(&msg),
        sprout_core::Error::NotFound(msg) => AppError::not_found(&msg),
        other => other.into(),
    }
}
