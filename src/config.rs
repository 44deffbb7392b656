//! Configuration management for the todo API.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `TODO_` prefix
//! - Defaults matching the service's historical fixed constants
//!
//! # Example
//!
//! ```ignore
//! use todo_api::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//!
//! println!("Listening on {}", config.bind_address());
//! println!("MongoDB: {}/{}", config.mongodb_uri, config.database);
//! ```
//!
//! # Environment Variables
//!
//! All configuration options can be set via environment variables with the
//! `TODO_` prefix:
//!
//! - `TODO_HOST` - Server bind address (default: 0.0.0.0)
//! - `TODO_PORT` - Server port (default: 8000)
//! - `TODO_MONGODB_URI` - MongoDB connection string (default: mongodb://127.0.0.1:27017)
//! - `TODO_DATABASE` - Database name (default: test-api)
//! - `TODO_UPLOAD_DIR` - Directory uploaded files are written to (default: ../uploads)
//! - `TODO_AUTH_SECRET` - Token signing secret (default: the legacy built-in value)
//! - `TODO_CORS_ORIGINS` - Allowed CORS origins, comma-separated

use std::path::PathBuf;

use clap::Parser;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default MongoDB connection string.
pub const DEFAULT_MONGODB_URI: &str = "mongodb://127.0.0.1:27017";

/// Default database name.
pub const DEFAULT_DATABASE: &str = "test-api";

/// Default upload directory, a sibling of the process's working directory.
pub const DEFAULT_UPLOAD_DIR: &str = "../uploads";

/// The signing secret historically compiled into the service.
///
/// Kept as the default so existing tokens stay verifiable. Deployments
/// should override it via `--auth-secret` or `TODO_AUTH_SECRET`.
pub const DEFAULT_AUTH_SECRET: &str = "3228E95367EED";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Todo API - a REST backend for users, todos, and image uploads.
///
/// Persists records to MongoDB and uploaded binaries to a local directory.
/// Signup/login issue bearer tokens verified by the protected routes.
#[derive(Parser, Debug, Clone)]
#[command(name = "todo-api")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "TODO_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "TODO_PORT")]
    pub port: u16,

    // =========================================================================
    // Store Configuration
    // =========================================================================
    /// MongoDB connection string.
    #[arg(long, default_value = DEFAULT_MONGODB_URI, env = "TODO_MONGODB_URI")]
    pub mongodb_uri: String,

    /// Name of the database holding the users, todos, and images collections.
    #[arg(long, default_value = DEFAULT_DATABASE, env = "TODO_DATABASE")]
    pub database: String,

    // =========================================================================
    // Upload Configuration
    // =========================================================================
    /// Directory uploaded files are written to.
    ///
    /// Created at startup if it does not exist. Files are stored under their
    /// client-supplied names.
    #[arg(long, default_value = DEFAULT_UPLOAD_DIR, env = "TODO_UPLOAD_DIR")]
    pub upload_dir: PathBuf,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Secret key for token signing and verification.
    ///
    /// Defaults to the legacy built-in secret; override it anywhere beyond
    /// local development. Tokens carry no expiry, so rotating the secret is
    /// the only way to invalidate them.
    #[arg(long, default_value = DEFAULT_AUTH_SECRET, env = "TODO_AUTH_SECRET")]
    pub auth_secret: String,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "TODO_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.mongodb_uri.is_empty() {
            return Err(
                "MongoDB URI is required. Set --mongodb-uri or TODO_MONGODB_URI".to_string(),
            );
        }

        if self.database.is_empty() {
            return Err("Database name is required. Set --database or TODO_DATABASE".to_string());
        }

        if self.auth_secret.is_empty() {
            return Err(
                "Auth secret must not be empty. Set --auth-secret or TODO_AUTH_SECRET".to_string(),
            );
        }

        if self.upload_dir.as_os_str().is_empty() {
            return Err(
                "Upload directory is required. Set --upload-dir or TODO_UPLOAD_DIR".to_string(),
            );
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
