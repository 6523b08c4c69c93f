pub mod config;
pub mod drawing;
pub mod error;
pub mod game;
pub mod room;
pub mod websocket;

use axum::{routing::get, Router};

use config::GameConfig;
use game::{spawn_session, SessionTx, WordList};

/// Application state shared across all connections
#[derive(Clone)]
pub struct AppState {
    pub session: SessionTx,
}

impl AppState {
    /// Spawns the session task; must be called inside a tokio runtime.
    pub fn new(config: GameConfig, words: WordList) -> Self {
        Self {
            session: spawn_session(config, words),
        }
    }
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Game routes: the WebSocket endpoint and a health check
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(websocket::ws_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health() {
        let state = AppState::new(GameConfig::default(), WordList::builtin());
        let response = app(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ws_requires_upgrade() {
        let state = AppState::new(GameConfig::default(), WordList::builtin());
        let response = app(state)
            .oneshot(Request::builder().uri("/ws").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}
