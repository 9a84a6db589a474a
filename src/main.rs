use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod app;
mod cli;
mod config;
mod errors;
mod metadata;
mod request_log;
mod storage;
mod suggest;
#[cfg(test)]
mod tests;
mod video_id;
mod web;

use app::App;
use config::Config;

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .init();
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn block_on<F: std::future::Future>(fut: F) -> anyhow::Result<F::Output> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(fut))
}

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    init_logging();

    let mut config = Config::load_with(&config::base_path()?)?;

    match args.command {
        cli::Command::Daemon { listen } => {
            if let Some(listen) = listen {
                config.listen = listen;
            }
            let addr = config.listen_addr()?;
            let app = App::from_config(&config)?;
            web::start_daemon(app, addr, config.static_dir.clone())
        }
        cli::Command::Tags { url } => {
            let app = App::from_config(&config)?;
            print_json(&block_on(app.tags(&url))??)
        }
        cli::Command::Thumbnails { url } => {
            let app = App::from_config(&config)?;
            print_json(&app.thumbnails(&url)?)
        }
        cli::Command::Keywords { keyword, count } => {
            let app = App::from_config(&config)?;
            let suggestions = block_on(app.keywords(&keyword))??;

            if count {
                println!("{} keywords found", suggestions.count);
                return Ok(());
            }

            print_json(&suggestions)
        }
    }
}
