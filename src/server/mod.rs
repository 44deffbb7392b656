//! HTTP server layer for the todo API.
//!
//! This module provides the REST surface over the record store, the token
//! issuer, and the upload receiver.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │    /signup /login /api/secure /todos /todos/{id} /images        │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    auth     │  │        routes           │  │
//! │  │ (requests)  │  │ (bearer JWT)│  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{require_auth, AuthError, AuthenticatedUser, Claims, TokenAuth};
pub use handlers::{
    create_todo_handler, delete_todo_handler, health_handler, list_todos_handler, login_handler,
    secure_handler, signup_handler, update_todo_handler, upload_image_handler, ApiError, AppState,
    CreateTodoRequest, ErrorResponse, HealthResponse, ImageRecord, ListTodosQuery, LoginRequest,
    MessageResponse, SignupRequest, TodoRecord, TodoWithImages, TokenResponse, UpdateTodoRequest,
    PAGE_SIZE,
};
pub use routes::{create_router, RouterConfig};
