//! MongoDB-backed implementation of [`RecordStore`].
//!
//! One [`mongodb::Client`] is opened at process startup and shared for the
//! life of the process; this type only borrows a [`Database`] handle from
//! it. Collections are typed, so documents serialize and deserialize
//! through the models in [`super::models`].

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use super::models::{Image, Todo, TodoUpdate, User};
use super::RecordStore;
use crate::error::StoreError;

/// Collection name for user documents.
const USERS_COLLECTION: &str = "users";

/// Collection name for todo documents.
const TODOS_COLLECTION: &str = "todos";

/// Collection name for image documents.
const IMAGES_COLLECTION: &str = "images";

/// Record store backed by three MongoDB collections.
#[derive(Clone)]
pub struct MongoStore {
    users: Collection<User>,
    todos: Collection<Todo>,
    images: Collection<Image>,
}

impl MongoStore {
    /// Create a store over the given database handle.
    ///
    /// The caller owns the client lifecycle: connect and ping before
    /// constructing the store, shut the client down after the server stops.
    pub fn new(db: Database) -> Self {
        Self {
            users: db.collection(USERS_COLLECTION),
            todos: db.collection(TODOS_COLLECTION),
            images: db.collection(IMAGES_COLLECTION),
        }
    }
}

/// Parse a path id into a store ObjectId.
fn parse_object_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

/// Build the overwrite-style update document for a todo.
///
/// Provided fields go into `$set`; absent fields go into `$unset` so the
/// stored document loses them entirely. Empty operators are omitted because
/// the server rejects them.
fn build_update_document(fields: TodoUpdate) -> Document {
    let mut set = Document::new();
    let mut unset = Document::new();

    match fields.title {
        Some(title) => {
            set.insert("title", title);
        }
        None => {
            unset.insert("title", Bson::Int32(1));
        }
    }
    match fields.description {
        Some(description) => {
            set.insert("description", description);
        }
        None => {
            unset.insert("description", Bson::Int32(1));
        }
    }
    match fields.completed {
        Some(completed) => {
            set.insert("completed", completed);
        }
        None => {
            unset.insert("completed", Bson::Int32(1));
        }
    }

    let mut update = Document::new();
    if !set.is_empty() {
        update.insert("$set", set);
    }
    if !unset.is_empty() {
        update.insert("$unset", unset);
    }
    update
}

#[async_trait]
impl RecordStore for MongoStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = self.users.find_one(doc! { "username": username }).await?;
        Ok(user)
    }

    async fn insert_user(&self, username: &str, password: &str) -> Result<User, StoreError> {
        let mut user = User {
            id: None,
            username: username.to_string(),
            password: password.to_string(),
        };

        let result = self.users.insert_one(&user).await?;
        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    async fn insert_todo(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Todo, StoreError> {
        let mut todo = Todo {
            id: None,
            title: title.to_string(),
            description: description.map(str::to_string),
            completed: false,
        };

        let result = self.todos.insert_one(&todo).await?;
        todo.id = result.inserted_id.as_object_id();
        Ok(todo)
    }

    async fn list_todos(&self, skip: u64, limit: i64) -> Result<Vec<Todo>, StoreError> {
        let cursor = self.todos.find(doc! {}).skip(skip).limit(limit).await?;
        let todos = cursor.try_collect().await?;
        Ok(todos)
    }

    async fn images_for_todos(&self, todo_ids: &[ObjectId]) -> Result<Vec<Image>, StoreError> {
        let cursor = self
            .images
            .find(doc! { "todoId": { "$in": todo_ids.to_vec() } })
            .await?;
        let images = cursor.try_collect().await?;
        Ok(images)
    }

    async fn update_todo(&self, id: &str, fields: TodoUpdate) -> Result<Option<Todo>, StoreError> {
        let oid = parse_object_id(id)?;
        let update = build_update_document(fields);

        let updated = self
            .todos
            .find_one_and_update(doc! { "_id": oid }, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    async fn delete_todo(&self, id: &str) -> Result<(), StoreError> {
        let oid = parse_object_id(id)?;

        // No existence check: deleting an absent id succeeds the same way.
        self.todos.delete_one(doc! { "_id": oid }).await?;
        Ok(())
    }

    async fn insert_image(&self, filename: &str, originalname: &str) -> Result<Image, StoreError> {
        let mut image = Image {
            id: None,
            filename: filename.to_string(),
            originalname: originalname.to_string(),
            todo_id: None,
        };

        let result = self.images.insert_one(&image).await?;
        image.id = result.inserted_id.as_object_id();
        Ok(image)
    }
}
