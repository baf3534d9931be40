//! Garden Stock - Grow a Garden shop stock notifier
//!
//! Checks the shop stock on a fixed interval and reports changes to Telegram.
//! Runs until the process is stopped.

use clap::Parser;
use garden_stock::config::startup_hint;
use garden_stock::{Args, Config, StockApi, StockWatcher, TelegramNotifier};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the hosting platform sets the environment directly
    let _ = dotenvy::dotenv();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            if let Some(hint) = startup_hint(&e) {
                eprintln!("{}", hint);
            }
            std::process::exit(1);
        }
    };

    log::info!("Starting garden_stock...");
    log::info!("Stock API: {}", config.api_base_url);
    log::info!("Reporting to chat {}", config.chat_id);

    let api = match StockApi::new(&config.api_base_url, config.fetch_timeout) {
        Ok(api) => api,
        Err(e) => {
            log::error!("Failed to create stock API client: {}", e);
            std::process::exit(1);
        }
    };

    let notifier = match TelegramNotifier::new(
        &config.telegram_api_url,
        config.bot_token.clone(),
        config.chat_id.clone(),
        config.send_timeout,
    ) {
        Ok(notifier) => notifier,
        Err(e) => {
            log::error!("Failed to create Telegram client: {}", e);
            std::process::exit(1);
        }
    };

    // Spawn liveness endpoint if a port is configured
    if let Some(port) = config.port {
        tokio::spawn(async move {
            if let Err(e) = garden_stock::web::serve(port).await {
                log::error!("Liveness endpoint error: {}", e);
            }
        });
    }

    log::info!(
        "Running in daemon mode, checking every {} second(s)",
        config.interval.as_secs()
    );

    let mut watcher = StockWatcher::new(config.timezone);
    tokio::select! {
        _ = watcher.run(&api, &notifier, config.interval) => {}
        _ = tokio::signal::ctrl_c() => {
            log::info!("Received interrupt, shutting down");
        }
    }
}
