//! Persisted document types for the three record collections.
//!
//! Each document is auto-identified by a store-assigned ObjectId carried in
//! the `_id` field. Users and images are immutable once created; todos are
//! the only mutable record type.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A user account document.
///
/// The password is stored exactly as submitted at signup. Username
/// uniqueness is an application-level check, not a storage constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub username: String,

    pub password: String,
}

/// A todo record document.
///
/// `title` is required at creation. A partial update overwrites rather than
/// merges, so previously-set fields can end up absent in the stored
/// document; the serde defaults render those as empty/false on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub completed: bool,
}

/// An uploaded image document.
///
/// `filename` is the name the binary was stored under on disk;
/// `originalname` is the client-supplied name. No write path populates
/// `todoId`, but the paginated todo listing still filters images on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub filename: String,

    pub originalname: String,

    #[serde(rename = "todoId", default, skip_serializing_if = "Option::is_none")]
    pub todo_id: Option<ObjectId>,
}

/// The field set submitted to a todo update.
///
/// Provided fields replace the stored values; absent fields are removed
/// from the stored document (overwrite, not merge).
#[derive(Debug, Clone, Default)]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}
