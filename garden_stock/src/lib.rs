//! Garden Stock - Grow a Garden shop stock notifier
//!
//! Polls the stock API for every tracked category, compares against the stock seen
//! on the previous cycle and posts changed in-stock items to a Telegram chat.

pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod normalize;
pub mod notifier;
pub mod report;
pub mod stock_api;
pub mod watcher;
pub mod web;

pub use config::{Args, Config};
pub use error::{Result, StockError};
pub use model::{Category, CategoryItems, ItemRecord, Snapshot};
pub use notifier::TelegramNotifier;
pub use stock_api::{FetchOutcome, FetchedSnapshot, StockApi};
pub use watcher::{CycleOutcome, StockWatcher};
