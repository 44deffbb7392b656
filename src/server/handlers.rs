//! HTTP request handlers for the todo API.
//!
//! Every handler is a thin composition of the record store, the token
//! issuer, and the upload receiver: parse the request, make at most two
//! store round trips, shape a JSON response.
//!
//! # Endpoints
//!
//! - `POST /signup` - Create a user account
//! - `POST /login` - Exchange credentials for a bearer token
//! - `GET /api/secure` - Authenticated probe
//! - `POST /todos` - Create a todo
//! - `GET /todos` - List todos, paginated, with attached images
//! - `PUT /todos/{id}` - Overwrite a todo's fields
//! - `DELETE /todos/{id}` - Delete a todo
//! - `POST /images` - Upload an image
//! - `GET /health` - Health check endpoint

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::store::{Image, RecordStore, Todo, TodoUpdate};
use crate::upload::UploadReceiver;

use super::auth::{AuthenticatedUser, TokenAuth};

/// Fixed page size for the todo listing.
pub const PAGE_SIZE: u64 = 5;

// Public messages for collapsed infrastructure failures. The underlying
// error is logged server-side and never reaches the client.
const SIGNUP_FAILED: &str = "Failed to sign up";
const LOGIN_FAILED: &str = "Failed to authenticate";
const CREATE_TODO_FAILED: &str = "Failed to create todo";
const LIST_TODOS_FAILED: &str = "Failed to retrieve todos";
const UPDATE_TODO_FAILED: &str = "Failed to update todo";
const DELETE_TODO_FAILED: &str = "Failed to delete todo";
const CREATE_IMAGE_FAILED: &str = "Failed to create image";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state passed to all handlers via Axum's State extractor.
pub struct AppState<S: RecordStore> {
    /// The record store holding users, todos, and images
    pub store: Arc<S>,

    /// Receiver persisting uploaded files to disk
    pub uploads: UploadReceiver,

    /// Token issuer/verifier backed by the shared secret
    pub auth: TokenAuth,
}

impl<S: RecordStore> AppState<S> {
    /// Create a new application state.
    pub fn new(store: S, uploads: UploadReceiver, auth: TokenAuth) -> Self {
        Self {
            store: Arc::new(store),
            uploads,
            auth,
        }
    }
}

impl<S: RecordStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            uploads: self.uploads.clone(),
            auth: self.auth.clone(),
        }
    }
}

// =============================================================================
// Request Schemas
// =============================================================================

/// Body for `POST /signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

/// Body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body for `POST /todos`. Title is required; description is optional.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Body for `PUT /todos/{id}`.
///
/// Any subset of the three fields may be present. Absent fields are not
/// preserved on the stored record: the update overwrites, it does not merge.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub completed: Option<bool>,
}

/// Query parameters for `GET /todos`.
#[derive(Debug, Deserialize)]
pub struct ListTodosQuery {
    /// 1-based page number. Accepted as raw text so non-numeric or sub-1
    /// values degrade to the default page rather than rejecting the request.
    #[serde(default)]
    pub page: Option<String>,
}

/// Resolve a raw `page` query value to a 1-based page number.
pub fn resolve_page(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.parse::<u64>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Plain confirmation payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Signed bearer token asserting the user's record id
    pub token: String,
}

/// A todo record as returned on the wire.
#[derive(Debug, Serialize)]
pub struct TodoRecord {
    /// Store-assigned id, rendered as a hex string
    pub id: String,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub completed: bool,
}

impl From<Todo> for TodoRecord {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
        }
    }
}

/// An image record as returned on the wire.
#[derive(Debug, Serialize)]
pub struct ImageRecord {
    /// Store-assigned id, rendered as a hex string
    pub id: String,

    /// Name the binary was stored under on disk
    pub filename: String,

    /// Client-supplied name
    pub originalname: String,
}

impl From<Image> for ImageRecord {
    fn from(image: Image) -> Self {
        Self {
            id: image.id.map(|id| id.to_hex()).unwrap_or_default(),
            filename: image.filename,
            originalname: image.originalname,
        }
    }
}

/// A listed todo with its associated images attached.
#[derive(Debug, Serialize)]
pub struct TodoWithImages {
    #[serde(flatten)]
    pub todo: TodoRecord,

    /// Images whose `todoId` matches this todo. Nothing populates that
    /// field, so this array is empty in practice.
    pub images: Vec<ImageRecord>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Handler-level errors mapped to HTTP responses.
///
/// Validation and credential failures surface as 4xx with a short message;
/// every infrastructure failure collapses to a 500 carrying only the
/// operation's generic public message.
#[derive(Debug)]
pub enum ApiError {
    /// Signup attempted with an already-used username
    UsernameTaken,

    /// Login with an unknown username or wrong password
    InvalidCredentials,

    /// Store, disk, or token failure; detail is logged, not exposed
    Internal {
        public: &'static str,
        detail: String,
    },
}

impl ApiError {
    /// Wrap an infrastructure error with the operation's public message.
    fn internal(public: &'static str, err: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            public,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::UsernameTaken => (
                StatusCode::BAD_REQUEST,
                "Username already exists".to_string(),
            ),
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            ApiError::Internal { public, detail } => {
                error!(detail = %detail, "Server error: {}", public);
                (StatusCode::INTERNAL_SERVER_ERROR, public.to_string())
            }
        };

        // Rejected credentials are common and expected, log at debug;
        // conflicts at warn.
        if status == StatusCode::BAD_REQUEST {
            warn!(status = status.as_u16(), "Client error: {}", message);
        } else if status == StatusCode::UNAUTHORIZED {
            debug!(status = status.as_u16(), "Client error: {}", message);
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle user signup.
///
/// # Endpoint
///
/// `POST /signup` with body `{"username": ..., "password": ...}`
///
/// # Response
///
/// - `201 Created`: `{"message": "Signup successful"}`
/// - `400 Bad Request`: username already exists
/// - `500 Internal Server Error`: store failure
pub async fn signup_handler<S: RecordStore>(
    State(state): State<AppState<S>>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let existing = state
        .store
        .find_user_by_username(&body.username)
        .await
        .map_err(|e| ApiError::internal(SIGNUP_FAILED, e))?;

    if existing.is_some() {
        return Err(ApiError::UsernameTaken);
    }

    // Read-before-write uniqueness check: two concurrent signups with the
    // same username can both pass it. The storage layer enforces nothing.
    let user = state
        .store
        .insert_user(&body.username, &body.password)
        .await
        .map_err(|e| ApiError::internal(SIGNUP_FAILED, e))?;

    debug!(username = %user.username, "user created");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Signup successful".to_string(),
        }),
    ))
}

/// Handle user login.
///
/// Looks the user up by username and compares the stored password field
/// byte-for-byte. On success, issues a token embedding the user's record id.
///
/// # Endpoint
///
/// `POST /login` with body `{"username": ..., "password": ...}`
///
/// # Response
///
/// - `200 OK`: `{"token": "<jwt>"}`
/// - `401 Unauthorized`: unknown username or wrong password
/// - `500 Internal Server Error`: store or token failure
pub async fn login_handler<S: RecordStore>(
    State(state): State<AppState<S>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = state
        .store
        .find_user_by_username(&body.username)
        .await
        .map_err(|e| ApiError::internal(LOGIN_FAILED, e))?
        .ok_or(ApiError::InvalidCredentials)?;

    // Plaintext equality against the stored field. Unknown-username and
    // wrong-password collapse to the same generic 401.
    if user.password != body.password {
        return Err(ApiError::InvalidCredentials);
    }

    let user_id = user.id.map(|id| id.to_hex()).unwrap_or_default();
    let token = state
        .auth
        .issue(&user_id)
        .map_err(|e| ApiError::internal(LOGIN_FAILED, e))?;

    Ok(Json(TokenResponse { token }))
}

/// Handle the authenticated probe.
///
/// The `require_auth` middleware has already verified the bearer token and
/// injected the authenticated user; the handler just confirms.
///
/// # Endpoint
///
/// `GET /api/secure` with `Authorization: Bearer <token>`
pub async fn secure_handler(
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<MessageResponse> {
    debug!(user_id = %user.user_id, "authenticated probe");

    Json(MessageResponse {
        message: "Authenticated API endpoint".to_string(),
    })
}

/// Handle todo creation.
///
/// # Endpoint
///
/// `POST /todos` with body `{"title": ..., "description": ...}`
///
/// # Response
///
/// - `201 Created`: the new record including its assigned id
/// - `500 Internal Server Error`: store failure
pub async fn create_todo_handler<S: RecordStore>(
    State(state): State<AppState<S>>,
    Json(body): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoRecord>), ApiError> {
    let todo = state
        .store
        .insert_todo(&body.title, body.description.as_deref())
        .await
        .map_err(|e| ApiError::internal(CREATE_TODO_FAILED, e))?;

    Ok((StatusCode::CREATED, Json(TodoRecord::from(todo))))
}

/// Handle the paginated todo listing.
///
/// Fetches one page of todos in the store's natural order, then fetches all
/// images whose `todoId` is among the page's ids and attaches them in
/// memory. Image creation never populates `todoId`, so the attached arrays
/// are empty in practice.
///
/// # Endpoint
///
/// `GET /todos?page=N` (1-based, default 1, fixed page size 5)
pub async fn list_todos_handler<S: RecordStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListTodosQuery>,
) -> Result<Json<Vec<TodoWithImages>>, ApiError> {
    let page = resolve_page(query.page.as_deref());
    let skip = (page - 1) * PAGE_SIZE;

    let todos = state
        .store
        .list_todos(skip, PAGE_SIZE as i64)
        .await
        .map_err(|e| ApiError::internal(LIST_TODOS_FAILED, e))?;

    let todo_ids: Vec<ObjectId> = todos.iter().filter_map(|todo| todo.id).collect();
    let images = state
        .store
        .images_for_todos(&todo_ids)
        .await
        .map_err(|e| ApiError::internal(LIST_TODOS_FAILED, e))?;

    let mut by_todo: HashMap<ObjectId, Vec<ImageRecord>> = HashMap::new();
    for image in images {
        if let Some(todo_id) = image.todo_id {
            by_todo
                .entry(todo_id)
                .or_default()
                .push(ImageRecord::from(image));
        }
    }

    let response = todos
        .into_iter()
        .map(|todo| {
            let images = todo
                .id
                .and_then(|id| by_todo.remove(&id))
                .unwrap_or_default();
            TodoWithImages {
                todo: TodoRecord::from(todo),
                images,
            }
        })
        .collect();

    Ok(Json(response))
}

/// Handle a todo update.
///
/// The submitted field set replaces the stored one: fields absent from the
/// body are removed from the record, not preserved.
///
/// # Endpoint
///
/// `PUT /todos/{id}` with any subset of `{"title", "description", "completed"}`
///
/// # Response
///
/// - `200 OK`: the post-update record, or JSON `null` when no record has
///   that id (not a 404)
/// - `500 Internal Server Error`: malformed id or store failure
pub async fn update_todo_handler<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTodoRequest>,
) -> Result<Response, ApiError> {
    let fields = TodoUpdate {
        title: body.title,
        description: body.description,
        completed: body.completed,
    };

    let updated = state
        .store
        .update_todo(&id, fields)
        .await
        .map_err(|e| ApiError::internal(UPDATE_TODO_FAILED, e))?;

    let response = match updated {
        Some(todo) => Json(TodoRecord::from(todo)).into_response(),
        None => Json(serde_json::Value::Null).into_response(),
    };
    Ok(response)
}

/// Handle a todo deletion.
///
/// No existence check: deleting an id that was already absent returns the
/// same success message as deleting a live record.
///
/// # Endpoint
///
/// `DELETE /todos/{id}`
pub async fn delete_todo_handler<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .delete_todo(&id)
        .await
        .map_err(|e| ApiError::internal(DELETE_TODO_FAILED, e))?;

    Ok(Json(MessageResponse {
        message: "Todo deleted successfully".to_string(),
    }))
}

/// Handle an image upload.
///
/// The upload receiver persists the `image` multipart field to disk before
/// the record is written, so the returned metadata always refers to bytes
/// already stored.
///
/// # Endpoint
///
/// `POST /images` with a multipart body carrying a file field named `image`
///
/// # Response
///
/// - `201 Created`: the new image record
/// - `500 Internal Server Error`: missing field, disk, or store failure
pub async fn upload_image_handler<S: RecordStore>(
    State(state): State<AppState<S>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ImageRecord>), ApiError> {
    let stored = state
        .uploads
        .receive(multipart)
        .await
        .map_err(|e| ApiError::internal(CREATE_IMAGE_FAILED, e))?;

    let image = state
        .store
        .insert_image(&stored.filename, &stored.originalname)
        .await
        .map_err(|e| ApiError::internal(CREATE_IMAGE_FAILED, e))?;

    Ok((StatusCode::CREATED, Json(ImageRecord::from(image))))
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
