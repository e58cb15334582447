use std::sync::Arc;
use tokio::sync::Notify;

mod config;
mod handler;
mod http;
mod logger;
mod mock;
mod routing;
mod server;
mod storage;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Config file path without extension, e.g. `mock` for mock.toml
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "mock".to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Create the Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let endpoints = config::load_endpoints(&cfg.endpoints_file())?;
    let router = routing::EndpointRouter::new(&endpoints)?;
    if router.is_empty() {
        logger::log_warning("Endpoint list is empty, every request will get 404");
    }
    for template in router.templates() {
        logger::log_endpoint_registered(template.as_str());
    }

    let store = storage::from_config(&cfg.storage)?;
    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &cfg, store.name(), router.len());

    let state = Arc::new(config::AppState::new(&cfg, router, store));
    let shutdown = Arc::new(Notify::new());
    server::signal::start_signal_handler(Arc::clone(&shutdown))?;

    server::run_server_loop(listener, state, shutdown).await
}
