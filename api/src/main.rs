use std::net::SocketAddr;

use axum::Router;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod error;
mod extract;
mod history;
mod routes;
mod state;
mod trace;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Relance API",
        version = "0.1.0",
        description = "Proactive outreach decisions for the coaching product: which message (if any) to send each user today, and how to read their reply to a pending checkup invitation."
    ),
    paths(
        routes::health::health_check,
        routes::outreach::decide_outreach,
        routes::checkup::resolve_checkup,
    ),
    components(schemas(
        HealthResponse,
        relance_core::error::ApiError,
        relance_core::outreach::Category,
        relance_core::outreach::WindowState,
        relance_core::outreach::SkipReason,
        relance_core::outreach::OutreachDecision,
        relance_core::outreach::DecideOutreachRequest,
        relance_core::outreach::DecideOutreachResponse,
        relance_core::checkup::CheckupOutcome,
        relance_core::checkup::ResolutionVia,
        relance_core::checkup::CheckupResolution,
        relance_core::checkup::SignalStatus,
        relance_core::checkup::PendingResolutionSignal,
        relance_core::checkup::ResolveCheckupRequest,
        relance_core::checkup::ResolveCheckupResponse,
    ))
)]
struct ApiDoc;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[tokio::main]
async fn main() {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relance_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Database connection
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    sqlx::migrate!("../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let app_state = state::AppState { db: pool };

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(routes::health::router())
        .merge(routes::outreach::router())
        .merge(routes::checkup::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Relance API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app.into_make_service()).await.unwrap();
}
