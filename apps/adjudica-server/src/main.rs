//! Adjudica server binary: wires configuration, database, migrations
//! and the adjudication REST API into a single HTTP service.

mod config;
mod rate_limit;

use adjudication_service::api::rest;
use adjudication_service::infra::storage::migrations::Migrator;
use adjudication_service::infra::storage::repositories::{
    SeaOrmAssignmentRepository, SeaOrmCandidateRepository, SeaOrmFacilityRepository,
    SeaOrmImportRepository, SeaOrmNetworkRepository, SeaOrmOccupationalGroupRepository,
    SeaOrmPositionRepository,
};
use adjudication_service::Service;
use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use clap::Parser;
use config::{AppConfig, CorsConfig};
use rate_limit::RateLimiter;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "adjudica-server", version, about = "Servidor de adjudicación de plazas")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,sea_orm=warn")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref()).context("configuración inválida")?;

    let db = connect_database(&config).await?;
    Migrator::up(&db, None)
        .await
        .context("no se pudieron aplicar las migraciones")?;
    let db = Arc::new(db);

    let service = build_service(db);
    let app = build_router(&config, service)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("dirección de escucha inválida")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("no se pudo escuchar en {addr}"))?;
    tracing::info!(%addr, "servidor iniciado");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("el servidor terminó con error")?;

    tracing::info!("servidor detenido");
    Ok(())
}

async fn connect_database(config: &AppConfig) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(&config.database.url);
    options
        .max_connections(config.database.max_connections)
        .sqlx_logging(false);
    Database::connect(options)
        .await
        .context("no se pudo conectar a la base de datos")
}

fn build_service(db: Arc<DatabaseConnection>) -> Arc<Service> {
    Arc::new(Service::new(
        Arc::new(SeaOrmNetworkRepository::new(db.clone())),
        Arc::new(SeaOrmFacilityRepository::new(db.clone())),
        Arc::new(SeaOrmOccupationalGroupRepository::new(db.clone())),
        Arc::new(SeaOrmPositionRepository::new(db.clone())),
        Arc::new(SeaOrmCandidateRepository::new(db.clone())),
        Arc::new(SeaOrmAssignmentRepository::new(db.clone())),
        Arc::new(SeaOrmImportRepository::new(db)),
    ))
}

fn build_router(config: &AppConfig, service: Arc<Service>) -> anyhow::Result<Router> {
    let mut app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/info", get(info))
        .nest("/api", rest::router(service))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
        .layer(cors_layer(&config.cors)?);

    if config.rate_limit.enabled {
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        app = app.layer(axum::middleware::from_fn_with_state(
            limiter,
            rate_limit::middleware,
        ));
    }
    Ok(app)
}

fn cors_layer(config: &CorsConfig) -> anyhow::Result<CorsLayer> {
    if config.origins.iter().any(|origin| origin == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }
    let origins = config
        .origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .context("origen CORS inválido en la configuración")?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]))
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "API de Adjudicación de Plazas",
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "data": { "status": "ok" },
        "message": "Servicio operativo",
    }))
}

async fn info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "data": {
            "nombre": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        },
        "message": "Información del servicio",
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "no se pudo instalar el manejador de Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => tracing::error!(%error, "no se pudo instalar el manejador de SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("señal de apagado recibida");
}
