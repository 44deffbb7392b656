//! Router configuration for the todo API.
//!
//! This module defines the HTTP routes and applies middleware for
//! authentication and CORS.
//!
//! # Route Structure
//!
//! ```text
//! /health              - Health check (public)
//! /signup              - User signup (public)
//! /login               - User login (public)
//! /api/secure          - Authenticated probe (bearer token required)
//! /todos               - Create / list todos (public)
//! /todos/{id}          - Update / delete a todo (public)
//! /images              - Image upload (public)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use todo_api::server::routes::{create_router, RouterConfig};
//!
//! let config = RouterConfig::new("my-secret-key");
//! let router = create_router(store, uploads, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::store::RecordStore;
use crate::upload::UploadReceiver;

use super::auth::{require_auth, TokenAuth};
use super::handlers::{
    create_todo_handler, delete_todo_handler, health_handler, list_todos_handler, login_handler,
    secure_handler, signup_handler, update_todo_handler, upload_image_handler, AppState,
};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Secret key for token signing and verification
    pub auth_secret: String,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration with the given auth secret.
    ///
    /// By default CORS allows any origin and tracing is enabled.
    pub fn new(auth_secret: impl Into<String>) -> Self {
        Self {
            auth_secret: auth_secret.into(),
            cors_origins: None,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Public routes (health, signup, login, todo CRUD, image upload)
/// - The protected probe under `/api`, gated by the bearer-token middleware
/// - CORS configuration
/// - Request tracing (optional)
pub fn create_router<S>(store: S, uploads: UploadReceiver, config: RouterConfig) -> Router
where
    S: RecordStore + 'static,
{
    let auth = TokenAuth::new(&config.auth_secret);
    let app_state = AppState::new(store, uploads, auth.clone());

    let cors = build_cors_layer(&config);

    // Protected routes: auth middleware applied to the nested router so a
    // missing or invalid token never reaches a handler.
    let protected_routes: Router<AppState<S>> = Router::new()
        .route("/secure", get(secure_handler))
        .layer(middleware::from_fn_with_state(auth, require_auth));

    // Public routes
    let public_routes: Router<AppState<S>> = Router::new()
        .route("/health", get(health_handler))
        .route("/signup", post(signup_handler::<S>))
        .route("/login", post(login_handler::<S>))
        .route(
            "/todos",
            post(create_todo_handler::<S>).get(list_todos_handler::<S>),
        )
        .route(
            "/todos/{id}",
            put(update_todo_handler::<S>).delete(delete_todo_handler::<S>),
        )
        .route("/images", post(upload_image_handler::<S>));

    let router = Router::new()
        .nest("/api", protected_routes)
        .merge(public_routes)
        .with_state(app_state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
