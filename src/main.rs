//! Todo API - a REST backend for users, todos, and image uploads.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use mongodb::bson::doc;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_api::{
    config::{Config, DEFAULT_AUTH_SECRET},
    server::{create_router, RouterConfig},
    store::MongoStore,
    upload::UploadReceiver,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  MongoDB URI: {}", config.mongodb_uri);
    info!("  Database: {}", config.database);
    info!("  Upload directory: {}", config.upload_dir.display());

    if config.auth_secret == DEFAULT_AUTH_SECRET {
        warn!("  Auth secret: built-in default in use");
        warn!("        Override for production: --auth-secret or TODO_AUTH_SECRET");
    }

    // Connect to the record store. The connection is opened once for the
    // life of the process; if it cannot be established, the server never
    // starts listening and there is no retry.
    info!("");
    info!("Connecting to MongoDB...");
    let client = match mongodb::Client::with_uri_str(&config.mongodb_uri).await {
        Ok(client) => client,
        Err(e) => {
            error!("  Invalid MongoDB URI: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match client
        .database(&config.database)
        .run_command(doc! { "ping": 1 })
        .await
    {
        Ok(_) => {
            info!("  Connected successfully");
        }
        Err(e) => {
            error!("  Failed to connect to MongoDB: {}", e);
            error!("");
            error!("  Please check:");
            error!("    - A MongoDB server is running at {}", config.mongodb_uri);
            error!("    - The URI and any credentials are correct");
            return ExitCode::FAILURE;
        }
    }

    let store = MongoStore::new(client.database(&config.database));

    // Prepare the upload directory
    let uploads = UploadReceiver::new(&config.upload_dir);
    if let Err(e) = uploads.ensure_dir().await {
        error!(
            "Failed to create upload directory {}: {}",
            config.upload_dir.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    // Build the router
    let router_config = build_router_config(&config);
    let router = create_router(store, uploads, router_config);

    // Bind and serve
    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!(
        "    curl -X POST http://{}/signup -H 'content-type: application/json' \\",
        addr
    );
    info!("         -d '{{\"username\":\"alice\",\"password\":\"pw1\"}}'");
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    // Teardown: close the store connection before exiting.
    client.shutdown().await;
    info!("Shutdown complete");

    ExitCode::SUCCESS
}

/// Resolve when the process receives a shutdown signal.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "todo_api=debug,tower_http=debug"
    } else {
        "todo_api=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new(&config.auth_secret);

    // Apply CORS origins
    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    // Apply tracing setting
    router_config.with_tracing(!config.no_tracing)
}
