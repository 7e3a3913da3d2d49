use std::net::SocketAddr;

use shared::config::ApiConfig;
use shared::gemini::GeminiClient;
use shared::sessions::ChatSessionStore;
use tracing::{error, info};

mod http;

#[tokio::main]
async fn main() {
    // Environment variables win over anything in .env.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "api_server=debug,shared=debug,axum=info".to_string()),
        )
        .init();

    let config = match ApiConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("failed to read config: {err}");
            std::process::exit(1);
        }
    };

    if config.gemini.api_key.is_none() {
        info!("no GOOGLE_API_KEY or GEMINI_API_KEY configured; searches will fail until one is set");
    }

    let gemini = match GeminiClient::new(config.gemini.clone()) {
        Ok(client) => client,
        Err(err) => {
            error!("failed to build gemini client: {err}");
            std::process::exit(1);
        }
    };

    let app = http::build_router(http::AppState {
        sessions: ChatSessionStore::new(),
        gemini,
    });

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .unwrap_or_else(|_| "127.0.0.1:8080".parse().expect("valid default bind addr"));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind should succeed");

    info!(
        "api server listening on {}",
        listener.local_addr().unwrap_or(addr)
    );
    axum::serve(listener, app).await.expect("server should run");
}
