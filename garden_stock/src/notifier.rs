//! Telegram Bot API client for delivering stock reports

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::{Result, StockError};

/// Default Telegram Bot API host
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Envelope returned by every Bot API method
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends Markdown messages to a single Telegram chat
pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(api_url: &str, bot_token: String, chat_id: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("garden_stock/0.1")
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            bot_token,
            chat_id,
        })
    }

    /// Post `text` to the configured chat using Markdown parse mode
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.bot_token);
        log::debug!("Sending {} byte message to chat {}", text.len(), self.chat_id);

        let response = self
            .client
            .post(&url)
            .form(&[
                ("chat_id", self.chat_id.as_str()),
                ("text", text),
                ("parse_mode", "Markdown"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        // Telegram reports refusals in the body, with or without an error status
        let parsed = serde_json::from_str::<TelegramResponse>(&body).ok();
        if let Some(TelegramResponse {
            ok: false,
            description,
        }) = parsed
        {
            return Err(StockError::Rejected(
                description.unwrap_or_else(|| status.to_string()),
            ));
        }

        if !status.is_success() {
            return Err(StockError::HttpStatus(status));
        }

        Ok(())
    }

    /// Deliver a report, logging instead of failing
    pub async fn deliver(&self, text: &str) -> bool {
        match self.send_message(text).await {
            Ok(()) => {
                log::info!("Stock report delivered");
                true
            }
            Err(e) => {
                log::error!("Failed to deliver stock report: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notifier(uri: &str) -> TelegramNotifier {
        TelegramNotifier::new(
            uri,
            "123:abc".to_string(),
            "-10042".to_string(),
            Duration::from_secs(2),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn posts_form_to_send_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_string_contains("chat_id=-10042"))
            .and(body_string_contains("parse_mode=Markdown"))
            .and(body_string_contains("text=hello"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "ok": true, "result": {} })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let notifier = notifier(&mock_server.uri());
        notifier.send_message("hello").await.unwrap();
    }

    #[tokio::test]
    async fn http_error_is_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;

        let err = notifier(&mock_server.uri())
            .send_message("hello")
            .await
            .unwrap_err();
        assert!(matches!(err, StockError::HttpStatus(s) if s.as_u16() == 502));
    }

    #[tokio::test]
    async fn telegram_refusal_carries_description() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })))
            .mount(&mock_server)
            .await;

        let err = notifier(&mock_server.uri())
            .send_message("hello")
            .await
            .unwrap_err();
        match err {
            StockError::Rejected(description) => {
                assert_eq!(description, "Bad Request: chat not found")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn deliver_swallows_failures() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        assert!(!notifier(&mock_server.uri()).deliver("hello").await);
    }
}
