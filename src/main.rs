//! MindHaven backend entrypoint.
//!
//! Wires configuration, Postgres, Redis, and the OIDC validator into the
//! assessment lifecycle handlers, then serves the HTTP API. A background
//! task sweeps soft-deleted records whose grace period has expired.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::{middleware, routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use mindhaven::adapters::auth::{OidcConfig, OidcSessionValidator};
use mindhaven::adapters::http::{assessments_routes, AssessmentsHandlers};
use mindhaven::adapters::http::{auth_middleware, AuthState};
use mindhaven::adapters::postgres::{
    PostgresAssessmentStore, PostgresDeletionLog, PostgresProfileStore,
};
use mindhaven::adapters::redis::RedisSnapshotCache;
use mindhaven::application::handlers::{
    DeleteAllAssessmentsHandler, DeleteAssessmentHandler, GetDeletionHistoryHandler,
    GetSnapshotHandler, GetSummaryHandler, RestoreAssessmentHandler, SweepExpiredHandler,
};
use mindhaven::config::AppConfig;
use mindhaven::ports::{AssessmentStore, DeletionLog, ProfileStore, SnapshotCache};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    info!(
        environment = ?config.server.environment,
        "Starting MindHaven backend"
    );

    // ═══════════════════════════════════════════════════════════════════
    // Infrastructure
    // ═══════════════════════════════════════════════════════════════════

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .max_lifetime(config.database.max_lifetime())
        .connect(&config.database.url)
        .await?;
    info!("Connected to Postgres");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
    }

    let redis_client = redis::Client::open(config.redis.url.as_str())?;
    let redis_conn = redis_client.get_multiplexed_tokio_connection().await?;
    info!("Connected to Redis");

    // ═══════════════════════════════════════════════════════════════════
    // Adapters and application handlers
    // ═══════════════════════════════════════════════════════════════════

    let store_timeout = config.lifecycle.store_timeout();
    let assessments: Arc<dyn AssessmentStore> =
        Arc::new(PostgresAssessmentStore::new(pool.clone(), store_timeout));
    let profiles: Arc<dyn ProfileStore> =
        Arc::new(PostgresProfileStore::new(pool.clone(), store_timeout));
    let deletion_log: Arc<dyn DeletionLog> =
        Arc::new(PostgresDeletionLog::new(pool.clone(), store_timeout));
    let snapshot_cache: Arc<dyn SnapshotCache> =
        Arc::new(RedisSnapshotCache::new(redis_conn, config.redis.timeout()));

    let oidc_config = OidcConfig::new(&config.auth.issuer_url, &config.auth.audience)
        .with_cache_duration(config.auth.jwks_cache_ttl());
    let session_validator: AuthState = Arc::new(OidcSessionValidator::new(oidc_config));

    let handlers = AssessmentsHandlers::new(
        Arc::new(DeleteAssessmentHandler::new(
            assessments.clone(),
            profiles.clone(),
            deletion_log.clone(),
            snapshot_cache.clone(),
        )),
        Arc::new(DeleteAllAssessmentsHandler::new(
            assessments.clone(),
            profiles.clone(),
            deletion_log.clone(),
            snapshot_cache.clone(),
        )),
        Arc::new(RestoreAssessmentHandler::new(
            assessments.clone(),
            profiles.clone(),
            deletion_log.clone(),
            snapshot_cache.clone(),
        )),
        Arc::new(GetSummaryHandler::new(assessments.clone(), profiles.clone())),
        Arc::new(GetDeletionHistoryHandler::new(deletion_log.clone())),
        Arc::new(GetSnapshotHandler::new(
            assessments.clone(),
            snapshot_cache.clone(),
            config.lifecycle.snapshot_ttl_secs,
        )),
    );

    let sweeper = Arc::new(SweepExpiredHandler::new(
        assessments,
        deletion_log,
        snapshot_cache,
    ));
    spawn_grace_period_sweeper(sweeper, config.lifecycle.sweep_interval());

    // ═══════════════════════════════════════════════════════════════════
    // HTTP server
    // ═══════════════════════════════════════════════════════════════════

    let app = Router::new()
        .nest("/api/assessments", assessments_routes(handlers))
        .layer(middleware::from_fn_with_state(
            session_validator,
            auth_middleware,
        ))
        .route("/health", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config));

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone()));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = config.server.cors_origins_list();
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Purges records whose grace period has lapsed, on a fixed cadence.
///
/// The first tick fires immediately so a restart catches up on anything
/// that expired while the service was down. Failures are logged and the
/// next tick retries from scratch.
fn spawn_grace_period_sweeper(sweeper: Arc<SweepExpiredHandler>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match sweeper.handle().await {
                Ok(outcome) if outcome.purged_count > 0 => {
                    info!(
                        purged = outcome.purged_count,
                        users = outcome.users_affected,
                        "Grace-period sweep purged expired assessments"
                    );
                }
                Ok(_) => {}
                Err(err) => {
                    error!(error = %err, "Grace-period sweep failed");
                }
            }
        }
    });
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
