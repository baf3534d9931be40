//! Command line and environment configuration

use std::time::Duration;

use chrono_tz::Tz;
use clap::Parser;

use crate::error::{Result, StockError};
use crate::notifier::TELEGRAM_API_URL;
use crate::stock_api::GAGAPI_BASE_URL;

/// Grow a Garden stock notifier - reports shop stock changes to Telegram
#[derive(Parser, Debug, Clone)]
#[command(name = "garden_stock")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    /// Telegram chat that receives the reports
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub chat_id: Option<String>,

    /// Serve the liveness endpoint on this port (default: disabled)
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Stock API base URL; category endpoints are appended to it
    #[arg(long, env = "GAGAPI_BASE_URL", default_value = GAGAPI_BASE_URL)]
    pub api_base_url: String,

    /// Telegram Bot API base URL
    #[arg(long, env = "TELEGRAM_API_URL", default_value = TELEGRAM_API_URL)]
    pub telegram_api_url: String,

    /// Seconds to sleep between stock checks
    #[arg(long, env = "CHECK_INTERVAL_SECS", default_value_t = 60)]
    pub interval_secs: u64,

    /// IANA timezone used for report timestamps
    #[arg(long, env = "REPORT_TIMEZONE", default_value = "Asia/Jakarta")]
    pub timezone: String,

    /// Timeout in seconds for each stock API request
    #[arg(long, default_value_t = 20)]
    pub fetch_timeout_secs: u64,

    /// Timeout in seconds for each Telegram request
    #[arg(long, default_value_t = 15)]
    pub send_timeout_secs: u64,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub chat_id: String,
    pub port: Option<u16>,
    pub api_base_url: String,
    pub telegram_api_url: String,
    pub interval: Duration,
    pub timezone: Tz,
    pub fetch_timeout: Duration,
    pub send_timeout: Duration,
}

impl Config {
    /// Validate parsed arguments; the loop must not start without credentials
    pub fn from_args(args: Args) -> Result<Self> {
        let bot_token = required(args.bot_token, "TELEGRAM_BOT_TOKEN")?;
        let chat_id = required(args.chat_id, "TELEGRAM_CHAT_ID")?;

        if args.interval_secs == 0 {
            return Err(StockError::Config(
                "CHECK_INTERVAL_SECS must be at least 1".to_string(),
            ));
        }

        let timezone = args.timezone.parse::<Tz>().map_err(|e| {
            StockError::Config(format!("Invalid REPORT_TIMEZONE '{}': {}", args.timezone, e))
        })?;

        Ok(Self {
            bot_token,
            chat_id,
            port: args.port,
            api_base_url: args.api_base_url,
            telegram_api_url: args.telegram_api_url,
            interval: Duration::from_secs(args.interval_secs),
            timezone,
            fetch_timeout: Duration::from_secs(args.fetch_timeout_secs),
            send_timeout: Duration::from_secs(args.send_timeout_secs),
        })
    }
}

fn required(value: Option<String>, var: &'static str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(StockError::MissingVar(var))
}

/// Follow-up hint printed after a startup error, if the error has one
pub fn startup_hint(err: &StockError) -> Option<&'static str> {
    match err {
        StockError::MissingVar(_) => Some(
            "Set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID (or pass --bot-token/--chat-id).",
        ),
        _ => None,
    }
}
