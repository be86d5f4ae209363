use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::middleware as axum_middleware;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use devshowcase::api;
use devshowcase::config::Config;
use devshowcase::db;
use devshowcase::extract::CriteriaExtractor;
use devshowcase::middleware;
use devshowcase::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devshowcase=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(port = config.port, "devshowcase starting");

    // Database
    let db = db::connect(&config.database_url).await?;

    let extractor = CriteriaExtractor::new(
        config.extractor_url.clone(),
        config.extractor_api_key.clone(),
    )?;

    let state = Arc::new(AppState::new(db, extractor));

    let allowed_origins = config
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(3600));

    let app = api::router()
        .layer(axum_middleware::from_fn_with_state(
            config.request_timeout,
            middleware::request_deadline,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
