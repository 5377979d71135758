use std::sync::Arc;

use panve::server::create_router;

#[tokio::main]
async fn main() {
    panve::env_config::init_tracing();
    let _base = panve::env_config::init_base_path();
    let port = panve::env_config::server_port();

    let catalog = match panve::env_config::catalog_from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        columns = catalog.columns.len(),
        questions = catalog.questions.len(),
        "starting PANVE API server"
    );

    let app = create_router(Arc::new(catalog));

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind port {}: {}", port, e);
            std::process::exit(1);
        }
    };
    tracing::info!(port, "server is running, press Ctrl+C to stop");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("stopping server");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
    }
}
