use std::sync::Arc;

use anyhow::Context;
use leaderboard::{InMemoryRankStore, LeaderboardService, RankStore, RedisRankStore};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod routes;

use config::Config;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::leaderboard::handlers::submit_score,
        features::leaderboard::handlers::set_score,
        features::leaderboard::handlers::get_player,
        features::leaderboard::handlers::get_rank,
        features::leaderboard::handlers::get_neighborhood,
        features::leaderboard::handlers::get_top_players,
    ),
    components(
        schemas(
            leaderboard::dto::leaderboard::SubmitScoreRequest,
            leaderboard::dto::leaderboard::SetScoreRequest,
            leaderboard::dto::leaderboard::ScoreResponse,
            leaderboard::dto::leaderboard::RankResponse,
            leaderboard::dto::leaderboard::TopPlayersResponse,
            leaderboard::models::Player,
        )
    ),
    tags(
        (name = "players", description = "Score submission and per-player rank endpoints"),
        (name = "leaderboard", description = "Leaderboard-wide endpoints"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting leaderboard API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    let store: Arc<dyn RankStore> = match &config.redis_url {
        Some(redis_url) => {
            tracing::info!(
                "Connecting to Redis at: {}",
                redis_url.split('@').next_back().unwrap_or("unknown")
            );
            let store = RedisRankStore::connect(redis_url, &config.leaderboard_key)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Redis connection established, using key {}", store.key());
            Arc::new(store)
        }
        None => {
            tracing::warn!("REDIS_URL not set, scores are kept in memory only");
            Arc::new(InMemoryRankStore::new())
        }
    };

    let service = LeaderboardService::new(store, config.service_options());

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let app = routes::router(service)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}
