use std::net::SocketAddr;

use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scribble_rs::config::{GameConfig, ServerConfig};
use scribble_rs::game::WordList;
use scribble_rs::{app, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scribble_rs=info,scribble=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server_config = ServerConfig::from_env();

    let words = match WordList::load(&server_config.words_file) {
        Ok(words) => words,
        Err(e) => {
            warn!(
                "Could not use word list {}: {}. Falling back to built-in words",
                server_config.words_file, e
            );
            WordList::builtin()
        }
    };
    info!("Loaded {} words", words.len());

    let state = AppState::new(GameConfig::default(), words);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = app(state)
        .fallback_service(ServeDir::new(&server_config.static_dir))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    info!("Scribble server running on http://localhost:{}", server_config.port);
    info!("   WebSocket endpoint: ws://localhost:{}/ws", server_config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
