//! Complaint Desk
//!
//! A municipal complaint desk where citizens file complaints, department staff
//! work through them and administrators keep an overview.
//!
//! ## Features
//!
//! - **Citizen Portal**: File complaints with suggested category and urgency
//! - **Staff Portal**: Department queue with status changes, updates and notes
//! - **Admin Portal**: City-wide overview with per-category statistics

mod classifier;
mod config;
mod handlers;
mod lexicon;
mod models;
mod query;
mod session;
mod state;
mod store;
mod validation;

use classifier::ExternalClassifier;
use handlers::AppState;
use state::Desk;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Largest JSON body accepted by the API
const MAX_BODY_SIZE: usize = 64 * 1024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "complaint_desk=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Starting Complaint Desk");
    tracing::info!("Environment: {:?}", config.environment);

    let classifier = match &config.classifier_url {
        Some(url) => {
            let classifier = ExternalClassifier::new(url.as_str(), config.classifier_timeout)
                .map_err(|e| config::ConfigError::Invalid(format!("classifier client: {}", e)))?;
            tracing::info!(
                "External classifier: {} (timeout {:?})",
                classifier.endpoint(),
                config.classifier_timeout
            );
            Some(classifier)
        }
        None => {
            tracing::info!("No external classifier configured, using keyword inference only");
            None
        }
    };

    let desk = if config.seed_demo_data {
        Desk::with_demo_data()
    } else {
        Desk::default()
    };

    // Create application state
    let state = AppState::new(desk, classifier, config.is_production());

    // Build CORS layer
    let cors = if config.is_production() {
        CorsLayer::new()
            .allow_origin(
                config
                    .cors_origins
                    .iter()
                    .filter_map(|o| o.parse().ok())
                    .collect::<Vec<_>>(),
            )
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::permissive()
    };

    // Build main router
    let app = handlers::app(state)
        .fallback_service(ServeDir::new(&config.frontend_dir))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(cors);

    // Start server
    let addr = config.server_addr();
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Frontend served from: {}", config.frontend_dir);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
