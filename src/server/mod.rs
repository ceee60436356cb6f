//! HTTP surface of the proxy.
//!
//! ```text
//! GET  /ask?q=<question>&model=<model>
//! POST /ask   {"q"|"question": <question>, "model": <model>}
//! ```
//!
//! Every other path is a 404.

mod api;

use std::future::Future;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::info;

use crate::proxy::AnswerProxy;
use crate::{Error, Result};

/// Axum router state injected into every handler.
///
/// Cheap to clone; the proxy is reference-counted and immutable.
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<AnswerProxy>,
}

impl AppState {
    pub fn new(proxy: AnswerProxy) -> Self {
        Self {
            proxy: Arc::new(proxy),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ask", get(api::ask_get).post(api::ask_post))
        .with_state(state)
}

/// Bind `bind_addr` and serve until `shutdown` resolves.
pub async fn serve<F>(bind_addr: &str, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| Error::Server(format!("bind failed on {bind_addr}: {e}")))?;

    serve_listener(listener, state, shutdown).await
}

/// Serve on an already bound listener (tests bind port 0).
pub async fn serve_listener<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local_addr = listener.local_addr()?;
    info!(%local_addr, "answer proxy listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::Server(format!("axum server error: {e}")))?;

    info!("answer proxy shut down");
    Ok(())
}
