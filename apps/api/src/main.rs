mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod resume;
mod routes;
mod state;
mod vocabulary;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::matcher::JobMatcher;
use crate::analysis::service::ResumeAnalyzer;
use crate::analysis::weights::ScoringWeights;
use crate::config::Config;
use crate::extraction::{DocumentExtractor, HttpPageFetcher};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::vocabulary::Vocabulary;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting résumé analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Curated vocabularies (built-in table unless VOCABULARY_PATH is set)
    let vocabulary = Arc::new(Vocabulary::load(config.vocabulary_path.as_deref())?);

    // Initialize assessment oracle
    let llm = LlmClient::new(
        config.oracle_api_url.clone(),
        config.doubao_api_key.clone(),
        config.oracle_model.clone(),
        config.oracle_timeout,
    );
    info!("LLM client initialized (model: {})", llm.model());

    let matcher = JobMatcher::new(
        Arc::new(llm),
        vocabulary,
        ScoringWeights::default(),
        config.oracle_timeout,
    );
    let analyzer = ResumeAnalyzer::new(
        Arc::new(DocumentExtractor),
        Arc::new(HttpPageFetcher::new(config.oracle_timeout)),
        matcher,
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        analyzer: Arc::new(analyzer),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
