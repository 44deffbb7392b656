//! # Todo API
//!
//! A small single-process REST backend providing user signup/login with
//! bearer-token authentication, CRUD operations on todo records, and image
//! uploads, persisted to MongoDB.
//!
//! ## Features
//!
//! - **Token auth**: login issues an HS256 JWT embedding the user's record id
//! - **Todo CRUD**: create, paginated listing (page size 5), overwrite-style
//!   update, delete
//! - **Image uploads**: multipart uploads persisted to a local directory
//!   under the client-supplied filename
//! - **Injected store**: handlers are generic over a [`store::RecordStore`]
//!   trait, so tests run against an in-memory store
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`store`] - Record store trait, document models, MongoDB implementation
//! - [`upload`] - Upload receiver persisting files to disk
//! - [`server`] - Axum-based HTTP server, auth middleware, and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Store and upload error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use todo_api::{create_router, MongoStore, RouterConfig, UploadReceiver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = mongodb::Client::with_uri_str("mongodb://127.0.0.1:27017").await?;
//!     let store = MongoStore::new(client.database("test-api"));
//!
//!     let uploads = UploadReceiver::new("../uploads");
//!     uploads.ensure_dir().await?;
//!
//!     let router = create_router(store, uploads, RouterConfig::new("secret-key"));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod upload;

// Re-export commonly used types
pub use config::Config;
pub use error::{StoreError, UploadError};
pub use server::{
    create_router, require_auth, ApiError, AppState, AuthError, AuthenticatedUser, Claims,
    ErrorResponse, HealthResponse, ImageRecord, MessageResponse, RouterConfig, TodoRecord,
    TodoWithImages, TokenAuth, TokenResponse, PAGE_SIZE,
};
pub use store::{Image, MongoStore, RecordStore, Todo, TodoUpdate, User};
pub use upload::{StoredUpload, UploadReceiver, UPLOAD_FIELD};
