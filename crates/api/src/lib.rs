//! # Agenda API
//!
//! HTTP surface of the booking service: availability lookup, reservations
//! and appointment status changes for salons and their clients.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into [`BookingCoordinator`] calls
//! - **Middleware**: Session claims extraction and error mapping
//! - **Config**: Environment configuration
//!
//! Callers are authenticated upstream; see [`middleware::auth`].

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Session claims and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use agenda_core::booking::BookingCoordinator;
use axum::error_handling::HandleErrorLayer;
use axum::http::{header, HeaderName, HeaderValue, Method, StatusCode};
use axum::{BoxError, Json, Router};
use chrono::{DateTime, Utc};
use eyre::{Result, WrapErr};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Source of the current instant for policy decisions.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub coordinator: Arc<BookingCoordinator>,
    clock: Clock,
}

impl ApiState {
    pub fn new(coordinator: Arc<BookingCoordinator>) -> Self {
        Self {
            coordinator,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replaces the wall clock, mainly for tests pinned to a fixed date.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

/// Builds the router with every endpoint attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::availability::routes())
        .merge(routes::booking::routes())
        .merge(routes::appointments::routes())
        .with_state(state)
}

/// Starts the API server with the provided configuration and coordinator
///
/// Installs the global tracing subscriber, applies CORS and the request
/// timeout, then serves until the listener fails.
pub async fn start_server(config: config::ApiConfig, coordinator: Arc<BookingCoordinator>) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::new(coordinator));
    let app = app(state).layer(TraceLayer::new_for_http());

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<serde_json::Value>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Request timed out", "code": "TIMEOUT" })),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Unhandled middleware error: {}", err), "code": "INTERNAL" })),
        )
    }
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin '{}'", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(middleware::auth::ACTOR_ID_HEADER),
            HeaderName::from_static(middleware::auth::ACTOR_ROLE_HEADER),
        ])
        .allow_origin(origins)
        .allow_credentials(true))
}
