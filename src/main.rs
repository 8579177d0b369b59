mod bot;
mod config;
mod domain;
mod marketplaces;
#[cfg(test)]
mod testing;

use std::env;
use std::process::ExitCode;

use bot::{Bot, BotConfig};
use config::Config;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

fn parse_env_file() -> Option<String> {
    env::args()
        .skip(1)
        .find_map(|arg| arg.strip_prefix("--env-file=").map(str::to_string))
}

fn init_tracing(log_level: Option<&str>) {
    let level = match log_level.map(str::to_lowercase).as_deref() {
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") | Some("warning") => Level::WARN,
        Some("error") | Some("critical") => Level::ERROR,
        Some("trace") => Level::TRACE,
        _ => Level::INFO,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let env_file = parse_env_file();

    let config = match Config::load(env_file.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(Some(&config.log_level));

    let bot = match Bot::new(BotConfig {
        app_config: config,
        version: env!("CARGO_PKG_VERSION").to_string(),
    }) {
        Ok(bot) => bot,
        Err(e) => {
            error!(error = %e, "Failed to create bot");
            return ExitCode::FAILURE;
        }
    };

    info!("Bot initialized (Ctrl+C to exit)");

    tokio::select! {
        result = bot.start() => {
            if let Err(e) = result {
                error!(error = %e, "Bot error");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted by user, exiting");
        }
    }

    if let Err(e) = bot.stop().await {
        error!(error = %e, "Failed to stop bot");
    }

    ExitCode::SUCCESS
}
