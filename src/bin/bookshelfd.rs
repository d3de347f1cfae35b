use std::sync::Arc;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use tokio::net::TcpListener;
use tokio::signal;

use bookshelf::{
    ConfigOverrides, DocumentStore, InMemoryDocumentStore, PgDocumentStore, ServerConfig,
    create_router, init_tracing,
};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Args {
    #[arrrg(optional, "Host to bind the HTTP server")]
    host: Option<String>,
    #[arrrg(optional, "Port to bind the HTTP server")]
    port: Option<u16>,
    #[arrrg(optional, "PostgreSQL database URL; without one documents are kept in memory")]
    database_url: Option<String>,
    #[arrrg(flag, "Enable verbose logging")]
    verbose: bool,
}

const HELP_TEXT: &str = r#"bookshelfd - Bookshelf daemon

USAGE:
    bookshelfd [OPTIONS]

OPTIONS:
    --host <HOST>           Host to bind the HTTP server [env: BOOKSHELF_HOST] [default: 127.0.0.1]
    --port <PORT>           Port to bind the HTTP server [env: PORT] [default: 3000]
    --database-url <URL>    PostgreSQL database URL [env: DATABASE_URL]
    --verbose               Enable verbose logging

DESCRIPTION:
    Serves CRUD endpoints for books and users. With a database URL the
    documents live in PostgreSQL and pending migrations are applied on
    start; without one they are kept in memory and lost on exit.

    Log output is controlled by RUST_LOG (default: info, or debug with
    --verbose).

    The server supports graceful shutdown via SIGTERM or Ctrl+C.

API ENDPOINTS:
    GET    /                 Health check

    Books:
      GET    /books          List all books
      POST   /books          Create a book
      GET    /books/{id}     Get a specific book
      PUT    /books/{id}     Replace a book
      DELETE /books/{id}     Delete a book

    Users:
      GET    /users          List all users
      POST   /users          Create a user
      GET    /users/{id}     Get a specific user
      PUT    /users/{id}     Replace a user
      DELETE /users/{id}     Delete a user"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = Args::from_command_line("USAGE: bookshelfd [OPTIONS]");

    if !free.is_empty() && free[0] == "help" {
        println!("{}", HELP_TEXT);
        return Ok(());
    }

    let config = ServerConfig::from_env(ConfigOverrides {
        host: args.host,
        port: args.port,
        database_url: args.database_url,
        verbose: args.verbose,
    })?;

    init_tracing(config.verbose);

    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => {
            tracing::info!("connecting to PostgreSQL");
            let pool = sqlx::PgPool::connect(url)
                .await
                .map_err(|e| format!("Failed to connect to database: {}", e))?;
            bookshelf::sql::run_migrations(&pool).await?;
            tracing::info!("migrations applied");
            Arc::new(PgDocumentStore::new(pool))
        }
        None => {
            tracing::warn!("no database URL configured; documents are kept in memory");
            Arc::new(InMemoryDocumentStore::new())
        }
    };

    let app = create_router(store).await?;

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!(%addr, "bookshelf daemon listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("bookshelf daemon stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, stopping server gracefully");
}
