use log::{error, info};
use service::{config::Config, logging::Logger};

use axum::extract::Request;
use axum::middleware::map_request;
use axum::ServiceExt;
use events::SubscriptionManager;
use tower::Layer;
use web::middleware::merge_slashes::merge_slashes;

mod simulator;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    info!("Starting twin gateway in {:?} mode", config.runtime_env());

    let subscriptions = SubscriptionManager::spawn();

    if config.simulated_things > 0 {
        simulator::spawn(subscriptions.clone(), config.simulated_things);
    }

    let address = format!("{}:{}", config.interface, config.port);

    let app_state = web::AppState::new(config, subscriptions.clone());
    // Path normalization wraps the entire router so it runs before routing.
    let app = map_request(merge_slashes).layer(web::router::define_routes(app_state));

    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {address}: {e}");
            std::process::exit(1);
        }
    };

    info!("Server starting... streaming change events on http://{address}/things");

    if let Err(e) = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal(subscriptions))
        .await
    {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}

async fn shutdown_signal(subscriptions: SubscriptionManager) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for the shutdown signal: {e}");
        return;
    }
    info!("Shutdown signal received, closing streams");
    // Open streams never finish on their own, so the connection drain would
    // otherwise wait for every client to leave first.
    let closed = subscriptions.close_all_sessions();
    info!("Closed {closed} streaming session(s)");
}
