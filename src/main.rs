//! recipe-share server binary.

use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recipe_share::adapters::auth::JwtSessionValidator;
use recipe_share::adapters::http::{api_router, HttpOptions, RecipeAppState};
use recipe_share::adapters::postgres::{
    PostgresRecipeReader, PostgresRecipeRepository, PostgresUserRepository,
};
use recipe_share::config::{AppConfig, DatabaseConfig, LogFormat, ServerConfig};
use recipe_share::domain::recipe::RECIPE_INDEXES;
use recipe_share::ports::RecipeRepository;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let pool = connect(&config.database).await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Migrations applied");
    }

    let recipes = Arc::new(PostgresRecipeRepository::new(pool.clone()));
    recipes.ensure_indexes(&RECIPE_INDEXES).await?;

    let state = RecipeAppState {
        recipes,
        reader: Arc::new(PostgresRecipeReader::new(pool.clone())),
        users: Arc::new(PostgresUserRepository::new(pool)),
        session_validator: Arc::new(JwtSessionValidator::new(&config.auth.jwt())),
        limits: config.listing.limits(),
    };
    let options = HttpOptions {
        request_timeout: config.server.request_timeout(),
        cors_origins: config.server.allowed_origins(),
    };
    let app = api_router(state, &options);

    let addr = config.server.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, environment = ?config.server.environment, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured directive.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match server.log_format() {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn connect(database: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = &database.pool;
    let mut options = PgPoolOptions::new()
        .min_connections(pool.min_connections)
        .max_connections(pool.max_connections)
        .acquire_timeout(pool.acquire_timeout())
        .idle_timeout(pool.idle_timeout())
        .max_lifetime(pool.max_lifetime());

    if let Some(statement_timeout) = database.statement_timeout_sql() {
        options = options.after_connect(move |conn, _meta| {
            let statement_timeout = statement_timeout.clone();
            Box::pin(async move {
                conn.execute(statement_timeout.as_str()).await?;
                Ok(())
            })
        });
    }

    let connected = options.connect(database.url.expose_secret()).await?;
    info!(
        max_connections = pool.max_connections,
        statement_timeout_ms = database.statement_timeout_ms,
        "Database pool ready"
    );
    Ok(connected)
}

/// Resolves on Ctrl+C, or SIGTERM on unix, so in-flight requests drain.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
