use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_tailor::config::Config;
use resume_tailor::db::Database;
use resume_tailor::llm_client::{self, LlmClient};
use resume_tailor::routes::build_router;
use resume_tailor::state::AppState;
use resume_tailor::tailoring::TailoringPipeline;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "resume_tailor={level},tailor_api={level},tower_http=info",
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tailor-api v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite (context items + optimization cache)
    let db = Database::connect(&config.database_path).await?;

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(config.anthropic_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let pipeline_config = config.pipeline();
    info!(
        "Model timeout {}s, structure fallback {}",
        pipeline_config.model_timeout.as_secs(),
        if pipeline_config.structure_fallback { "on" } else { "off" }
    );

    let pipeline = TailoringPipeline::new(db, llm, pipeline_config);
    let state = AppState::new(pipeline);

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict origins once the web client has a fixed host
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
