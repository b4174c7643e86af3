use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_query::{
    api::{create_router, AppState},
    config::Config,
    engine::AtomSpace,
    services::{GeminiOracle, IntentParser, LanguageOracle},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_query=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // A missing or unreadable knowledge base is fatal
    let engine = AtomSpace::load(&config.metta_file_path)?;

    let oracle: Option<Arc<dyn LanguageOracle>> = match &config.gemini_api_key {
        Some(key) => match GeminiOracle::new(
            key.clone(),
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
            Duration::from_secs(config.oracle_timeout_secs),
        ) {
            Ok(oracle) => Some(Arc::new(oracle)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to initialize Gemini, using fallback parser");
                None
            }
        },
        None => {
            tracing::warn!("GEMINI_API_KEY missing, using fallback parser");
            None
        }
    };

    let state = AppState::new(
        Arc::new(engine),
        IntentParser::new(oracle),
        config.default_subject.clone(),
    );
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
