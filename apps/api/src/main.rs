mod config;
mod documents;
mod embeddings;
mod errors;
mod insights;
mod llm_client;
mod matching;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::documents::spool::UploadSpool;
use crate::documents::PdfLoader;
use crate::embeddings::OpenAiEmbedder;
use crate::insights::search::{TavilyClient, WebSearch};
use crate::llm_client::LlmClient;
use crate::matching::pipeline::MatchingServices;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Fit API v{}", env!("CARGO_PKG_VERSION"));

    let timeout = Duration::from_secs(config.llm_timeout_secs);

    // Initialize generation client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.chat_model.clone(),
        timeout,
        config.llm_max_attempts,
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    // Initialize embedding client
    let embedder = OpenAiEmbedder::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.embedding_model.clone(),
        timeout,
        config.llm_max_attempts,
    )?;
    info!("Embedding client initialized (model: {})", embedder.model());

    // Web search is optional; /interview-questions answers 503 without it
    let search: Option<Arc<dyn WebSearch>> = match &config.tavily_api_key {
        Some(key) => Some(Arc::new(TavilyClient::new(key.clone(), timeout)?)),
        None => {
            warn!("TAVILY_API_KEY not set; interview insights disabled");
            None
        }
    };

    let spool = config.upload_dir.clone().map(UploadSpool::new);
    if let Some(spool) = &spool {
        info!("Spooling uploads to {}", spool.dir().display());
    }

    info!(
        "Chunking: size={} overlap={} unit={:?}",
        config.chunk.size(),
        config.chunk.overlap(),
        config.chunk.unit()
    );

    // Build app state
    let state = AppState {
        matching: MatchingServices {
            loader: Arc::new(PdfLoader),
            embedder: Arc::new(embedder),
            generator: Arc::new(llm),
            chunking: config.chunk,
            spool,
        },
        search,
        default_top_k: config.default_top_k,
        max_upload_bytes: config.max_upload_bytes,
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
