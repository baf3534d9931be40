//! Grow a Garden stock API client
//!
//! Every request is bounded by the client timeout. Failures never propagate out of
//! [`StockApi::fetch_snapshot`]: a category that cannot be fetched is recorded as
//! empty so the remaining categories still get checked.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::error::{Result, StockError};
use crate::model::{Category, CategoryItems, Snapshot};
use crate::normalize::RawPayload;

/// Default public stock API
pub const GAGAPI_BASE_URL: &str = "https://gagapi.onrender.com/";

/// Outcome of fetching a single category
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(CategoryItems),
    /// The category is treated as empty for this cycle
    Unavailable { reason: String },
}

impl FetchOutcome {
    pub fn into_items(self) -> CategoryItems {
        match self {
            FetchOutcome::Fetched(items) => items,
            FetchOutcome::Unavailable { .. } => CategoryItems::new(),
        }
    }
}

/// Snapshot of one cycle plus how many categories actually answered
#[derive(Debug, Clone)]
pub struct FetchedSnapshot {
    pub snapshot: Snapshot,
    /// Categories that came back [`FetchOutcome::Fetched`]
    pub available: usize,
}

pub struct StockApi {
    client: Client,
    base_url: String,
}

impl StockApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("garden_stock/0.1")
            .build()?;

        // Endpoints are appended directly, so keep exactly one trailing slash
        let base_url = format!("{}/", base_url.trim_end_matches('/'));

        Ok(Self { client, base_url })
    }

    /// GET the raw JSON payload for one category
    pub async fn fetch_payload(&self, category: Category) -> Result<RawPayload> {
        let url = format!("{}{}", self.base_url, category.endpoint());
        log::debug!("Fetching {} stock from {}", category, url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(StockError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)?;
        Ok(RawPayload::from(value))
    }

    /// Fetch and normalize one category, failing soft
    pub async fn fetch_category(&self, category: Category) -> FetchOutcome {
        match self.fetch_payload(category).await {
            Ok(payload) => {
                let items = payload.normalize();
                log::debug!("{}: {} items", category, items.len());
                FetchOutcome::Fetched(items)
            }
            Err(e) => {
                if e.is_timeout() {
                    log::error!("Timed out fetching {} stock", category);
                } else {
                    log::error!("Error fetching {} stock: {}", category, e);
                }
                FetchOutcome::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Fetch every tracked category; unavailable ones are recorded as empty
    pub async fn fetch_snapshot(&self) -> FetchedSnapshot {
        let mut snapshot = Snapshot::all_empty();
        let mut available = 0;
        for category in Category::ALL {
            let outcome = self.fetch_category(category).await;
            if matches!(outcome, FetchOutcome::Fetched(_)) {
                available += 1;
            }
            snapshot.insert(category, outcome.into_items());
        }
        FetchedSnapshot {
            snapshot,
            available,
        }
    }
}
