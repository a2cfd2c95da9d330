use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{analytics, assistant_api, categories, goals, transactions};
use assistant::Assistant;
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// Absent when no model API key is configured; assistant routes then
    /// answer 503.
    pub assistant: Option<Arc<Assistant>>,
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get_one)
                .patch(transactions::update)
                .delete(transactions::delete),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}/active",
            axum::routing::put(categories::set_active),
        )
        .route("/goals", get(goals::list).post(goals::create))
        .route(
            "/goals/{id}",
            axum::routing::patch(goals::update).delete(goals::delete),
        )
        .route("/goals/{id}/add", post(goals::add_money))
        .route("/analytics/summary", get(analytics::summary))
        .route("/analytics/monthly", get(analytics::monthly))
        .route("/analytics/categories", get(analytics::categories))
        .route("/analytics/weekdays", get(analytics::weekdays))
        .route(
            "/analytics/payment-methods",
            get(analytics::payment_methods),
        )
        .route("/analytics/daily", get(analytics::daily))
        .route("/assistant/parse", post(assistant_api::parse))
        .route("/assistant/categorize", post(assistant_api::categorize))
        .with_state(state)
}

pub async fn run(engine: Engine, assistant: Option<Assistant>) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, assistant, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    assistant: Option<Assistant>,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        assistant: assistant.map(Arc::new),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    assistant: Option<Assistant>,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, assistant, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
