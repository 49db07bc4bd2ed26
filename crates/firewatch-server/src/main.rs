//! firewatch-server: wildfire-monitoring HTTP backend.
//!
//! Wires the Gemini client, the FIRMS feed client, the tool registry, and
//! the conversation store into an axum service.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use firewatch_ai::{ChatAgent, ConversationStore, GeminiClient, GeminiConfig};
use firewatch_firms::{FirmsClient, FirmsConfig};
use firewatch_server::{app_router, prompt::SYSTEM_PROMPT, AppState, Config};
use firewatch_tools::{FireDataTool, ToolRegistry, WebSearchTool};
use firewatch_vision::{DetectorClient, DetectorConfig};

#[derive(Parser)]
#[command(name = "firewatch-server", about = "Wildfire monitoring backend")]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    /// Log filter directive (e.g. "firewatch=debug").
    #[arg(long)]
    log_level: Option<String>,
}

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let candidates = [
        std::path::PathBuf::from(".env"),
        std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env before reading any configuration
    load_dotenv();

    let args = Args::parse();

    let log_directive = args.log_level.as_deref().unwrap_or("firewatch=info");
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_directive.into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("fatal: {e}");
            std::process::exit(1);
        }
    };

    let mut gemini_config = GeminiConfig::new(config.google_api_key.clone());
    if let Some(ref model) = config.model {
        gemini_config = gemini_config.with_model(model.clone());
    }
    let gemini = Arc::new(GeminiClient::new(gemini_config));

    let firms = Arc::new(FirmsClient::new(FirmsConfig::new(config.map_key.clone())));

    let registry = ToolRegistry::new()
        .register(Arc::new(FireDataTool::new(firms.clone())))
        .register(Arc::new(WebSearchTool::new()));

    let store = ConversationStore::new();
    let agent = ChatAgent::new(gemini, Arc::new(registry), store.clone())
        .with_system_prompt(SYSTEM_PROMPT);

    let detector = config
        .detector_url
        .as_ref()
        .map(|url| DetectorClient::new(DetectorConfig::new(url.clone())));
    if detector.is_none() {
        tracing::warn!("DETECTOR_URL not set; /draw_boxes_fire will report 503");
    }

    let state = AppState::new(agent, store, firms, detector);
    let app = app_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind TCP listener");

    tracing::info!("firewatch-server listening on {}", addr);

    axum::serve(listener, app).await.expect("server error");
}
