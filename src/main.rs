use std::{fs::OpenOptions, str::FromStr, sync::Mutex};

use color_eyre::eyre::Context;
use dotenvy::dotenv;
use homework_status_bot::{config::Config, Application};
use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    dotenv().ok();
    let config = Config::load().wrap_err("Failed to load configuration")?;
    config_tracing(&config)?;

    let app = match Application::build(&config) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Bot cannot start: {e}");
            return Err(e).wrap_err("Startup check failed");
        }
    };

    tokio::select! {
        _ = app.run() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.wrap_err("Failed to listen for shutdown signal")?;
            tracing::info!("Shutdown signal received, stopping");
        }
    }
    Ok(())
}

fn config_tracing(config: &Config) -> color_eyre::Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "1")
    }
    color_eyre::install()?;

    use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

    let level = Level::from_str(&config.logging.level)
        .wrap_err_with(|| format!("Invalid log level {:?}", config.logging.level))?;

    let writer = match config.log_file() {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .wrap_err_with(|| format!("Failed to open log file {path}"))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stdout),
    };

    let tracing_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(config.log_file().is_none());
    let filter = filter::Targets::new()
        .with_target("hyper_util", Level::INFO)
        .with_target("reqwest", Level::INFO)
        .with_default(level);

    tracing_subscriber::registry()
        .with(tracing_layer)
        .with(filter)
        .init();
    Ok(())
}
