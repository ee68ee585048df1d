//! Main Entrypoint for the Carelink API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Constructing the generative and records backend clients.
//! 4. Assembling the shared application state and the Axum router.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use carelink_api::{
    config::{Config, Provider},
    router::create_router,
    state::AppState,
    ws::ConnectionRegistry,
};
use carelink_core::{
    context::ContextEnricher,
    generative::{GenerativeClient, OpenAICompatibleClient},
    records::{HttpRecordsClient, InMemoryRecordsClient, RecordsClient},
    turn::{DEFAULT_SYSTEM_PROMPT, TurnProcessor},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

/// Loads the system prompt from the configured file, or falls back to the
/// built-in healthcare preamble.
fn load_system_prompt(config: &Config) -> anyhow::Result<String> {
    match &config.system_prompt_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read system prompt from {}", path.display())),
        None => Ok(DEFAULT_SYSTEM_PROMPT.to_string()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Initialize Backend Clients ---
    let system_prompt = Arc::new(load_system_prompt(&config)?);

    let llm_client: Arc<dyn GenerativeClient> = match &config.provider {
        Provider::OpenAI => {
            info!("Using OpenAI provider.");
            let api_key = config
                .openai_api_key
                .as_ref()
                .context("OPENAI_API_KEY missing after validation")?;
            let openai_config = OpenAIConfig::new()
                .with_api_key(api_key)
                .with_api_base("https://api.openai.com/v1/");
            Arc::new(OpenAICompatibleClient::new(
                openai_config,
                config.chat_model.clone(),
            ))
        }
        Provider::Gemini => {
            info!("Using Gemini provider.");
            let api_key = config
                .gemini_api_key
                .as_ref()
                .context("GEMINI_API_KEY missing after validation")?;
            let openai_config = OpenAIConfig::new()
                .with_api_key(api_key)
                .with_api_base("https://generativelanguage.googleapis.com/v1beta/openai");
            Arc::new(OpenAICompatibleClient::new(
                openai_config,
                config.chat_model.clone(),
            ))
        }
    };

    let records_client: Arc<dyn RecordsClient> = match &config.records_base_url {
        Some(base_url) => {
            info!(base_url = %base_url, "Using HTTP records backend.");
            Arc::new(HttpRecordsClient::new(base_url.clone()))
        }
        None => {
            info!("RECORDS_BASE_URL not set; using in-memory demo records.");
            Arc::new(InMemoryRecordsClient::with_demo_data())
        }
    };

    // --- 4. Assemble Shared State ---
    let app_state = Arc::new(AppState {
        enricher: Arc::new(ContextEnricher::new(records_client)),
        turns: Arc::new(TurnProcessor::new(
            llm_client,
            system_prompt,
            config.generation_timeout,
        )),
        registry: Arc::new(ConnectionRegistry::new()),
    });

    // --- 5. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 6. Start Server ---
    info!(
        provider = ?config.provider,
        model = %config.chat_model,
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
