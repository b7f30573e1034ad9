use std::sync::Arc;

use asset_worker::config::{Config, DEFAULT_CONFIG_PATH};
use asset_worker::server::{self, listener, AppState};
use asset_worker::{build_env, logger};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Worker thread count comes from config, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let env = build_env(&cfg)?;
    let listener = listener::create_reusable_listener(addr, listener::DEFAULT_BACKLOG)?;

    logger::log_server_start(&listener.local_addr()?, &cfg);

    let state = Arc::new(AppState::new(cfg, env));
    server::run(listener, state, server::shutdown_signal()).await;
    Ok(())
}
