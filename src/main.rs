use clap::Parser;
use std::sync::Arc;

mod cli;
mod config;
mod handler;
mod http;
mod logger;
mod preview;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli::Cli::parse();
    let cfg = config::Config::load(&cli)?;
    logger::init(&cfg.logging)?;

    if cfg.photos.path.as_deref().map_or(true, str::is_empty) {
        logger::log_warning("No photos path given (--path / PHOTOS_PATH); serving the working directory");
    }

    // Preview directory is created before anything is bound
    let reuse_previews = cfg.preview_dir().is_some();
    let state = Arc::new(config::AppState::new(cfg)?);
    if !reuse_previews {
        logger::log_info(&format!(
            "Created preview directory {}",
            state.previews.dir().display()
        ));
    }

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = state.config.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(state))
}

async fn async_main(state: Arc<config::AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = state.config.get_socket_addr()?;
    let listener = server::bind_listener(addr)?;

    logger::log_server_start(
        &addr,
        &state.config,
        &state.photos_root,
        state.previews.dir(),
    );

    server::run(listener, state).await;
    Ok(())
}
