use thiserror::Error;

/// Errors that can occur when talking to the record store
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Error from the MongoDB driver or an incompatible stored document
    #[error("database error: {0}")]
    Database(String),

    /// A path id that does not parse as a store-assigned ObjectId
    #[error("invalid record id: {0}")]
    InvalidId(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Errors that can occur while receiving an uploaded file
#[derive(Debug, Error)]
pub enum UploadError {
    /// The multipart body carried no "image" field
    #[error("missing multipart field \"image\"")]
    MissingField,

    /// The "image" field carried no client filename
    #[error("missing filename on multipart field \"image\"")]
    MissingFilename,

    /// The multipart stream could not be read
    #[error("multipart error: {0}")]
    Multipart(String),

    /// Writing the file to the upload directory failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
