use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query as QueryParams, State};
use axum::http::{header, HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::controller::{ChatController, ChatOutcome};
use super::Container;

#[derive(Debug, Deserialize)]
struct ChatParams {
    q: Option<String>,
}

#[derive(Serialize)]
struct Health<'a> {
    ok: bool,
    service: &'static str,
    profile: &'a str,
}

impl IntoResponse for ChatOutcome {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        response.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        response
    }
}

/// HTTP surface of the handler. `GET /` and `GET /chat` take the message in `q`.
pub fn router(container: Arc<Container>) -> axum::Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS]);

    axum::Router::new()
        .route("/", get(chat))
        .route("/chat", get(chat))
        .route("/healthz", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(container)
}

/// A query string that fails to deserialize is answered like any other
/// failure, a 500 with a JSON error body.
async fn chat(
    State(container): State<Arc<Container>>,
    params: Result<QueryParams<ChatParams>, QueryRejection>,
) -> ChatOutcome {
    match params {
        Ok(QueryParams(params)) => {
            ChatController::new(&container)
                .reply(params.q.as_deref())
                .await
        }
        Err(rejection) => {
            let message = rejection.body_text();
            warn!("Rejected query string: {message}");
            ChatOutcome::error(message)
        }
    }
}

async fn health(State(container): State<Arc<Container>>) -> Response {
    Json(Health {
        ok: true,
        service: "chat-relay",
        profile: &container.profile().name,
    })
    .into_response()
}

/// Bind `addr` and serve until Ctrl-C or SIGTERM.
pub async fn serve(container: Arc<Container>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(container))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
