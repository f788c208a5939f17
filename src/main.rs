use std::{net::SocketAddr, sync::Arc};

use axum::{Router, routing::get};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use framegen_backend::{AppState, api, config::Config, openapi};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("bind addr");
    let state = Arc::new(AppState::new(config));

    let api_doc = openapi::ApiDoc::openapi();

    let app = Router::new()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", api_doc))
        .route("/api/framed-avatar/{username}", get(api::framed_avatar))
        .route("/api/themes", get(api::list_themes))
        .route("/api/health", get(api::health))
        .with_state(state);

    info!("Starting framegen-backend on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener");
    axum::serve(listener, app).await.expect("serve");
}
