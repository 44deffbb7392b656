//! Record store layer for the todo API.
//!
//! The store holds three independent collections (users, todos, images) in
//! an external document database. Handlers never talk to the database
//! driver directly: they go through the [`RecordStore`] trait, which is
//! constructed once at startup and injected into the HTTP layer. Tests
//! substitute an in-memory implementation behind the same trait.
//!
//! There are no transactions across collections and no schema migrations;
//! every operation is a single round trip.

pub mod models;
pub mod mongo;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::StoreError;

pub use models::{Image, Todo, TodoUpdate, User};
pub use mongo::MongoStore;

/// Abstraction over the document database holding users, todos, and images.
///
/// Implementations return fully materialized records with their
/// store-assigned ids. Record ids are opaque and stable for the lifetime of
/// the record.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Look up a user by exact username.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Insert a new user, storing the password verbatim.
    async fn insert_user(&self, username: &str, password: &str) -> Result<User, StoreError>;

    /// Insert a new todo with `completed` defaulting to false.
    async fn insert_todo(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Todo, StoreError>;

    /// Fetch up to `limit` todos after skipping `skip`, in the store's
    /// natural order. No explicit sort is applied; the ordering is whatever
    /// the store returns by default.
    async fn list_todos(&self, skip: u64, limit: i64) -> Result<Vec<Todo>, StoreError>;

    /// Fetch all images whose `todoId` is among the given todo ids.
    async fn images_for_todos(&self, todo_ids: &[ObjectId]) -> Result<Vec<Image>, StoreError>;

    /// Overwrite a todo's fields with the given set and return the
    /// post-update record. Fields absent from `fields` are removed from the
    /// stored document, not preserved. Returns `None` when no record has
    /// that id.
    async fn update_todo(&self, id: &str, fields: TodoUpdate) -> Result<Option<Todo>, StoreError>;

    /// Delete the todo with the given id. Deleting an absent id is not an
    /// error and is indistinguishable from a successful delete.
    async fn delete_todo(&self, id: &str) -> Result<(), StoreError>;

    /// Insert a new image record.
    async fn insert_image(&self, filename: &str, originalname: &str) -> Result<Image, StoreError>;
}
