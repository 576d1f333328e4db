use axum::{Router, routing::get};
use http::header;
use nexus::api::handlers::{AppService, api_routes, health};
use nexus::api::openapi::ApiDoc;
use nexus::config::CONFIG;
use nexus::infrastructure::{
    cache::in_memory::InMemoryCache, logging::in_memory::InMemoryLogging, optimizer::http::HttpOptimizer,
    storage::in_memory::InMemoryStorage,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&CONFIG.log_level)))
        .init();
    info!("Starting with {:?}", *CONFIG);

    let optimizer = HttpOptimizer::new(&CONFIG.ai_service_url, CONFIG.ai_timeout)?;
    let service: Arc<AppService> = Arc::new(
        AppService::new(
            InMemoryStorage::new(),
            InMemoryLogging::new(),
            InMemoryCache::new(),
            optimizer,
            &CONFIG.jwt_secret,
        )
        .with_account_cache_ttl(CONFIG.account_cache_ttl),
    );

    let app = Router::new()
        .route("/", get(health))
        .nest("/api", api_routes(service))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new()) // Gzip compression
        // Outlives a full optimizer round trip
        .layer(TimeoutLayer::new(CONFIG.ai_timeout + Duration::from_secs(5)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http()); // Request tracing

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
