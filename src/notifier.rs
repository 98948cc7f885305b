//! Message delivery.
//!
//! [`Notifier`] sends one formatted message to a fixed destination.
//! [`TelegramNotifier`] posts to the Bot API `sendMessage` method.

use crate::error::DeliveryError;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use url::Url;

/// Accepts a message for the configured destination.
pub trait Notifier {
    async fn send(&self, text: &str) -> Result<(), DeliveryError>;
}

/// Bot token and target chat.
#[derive(Clone)]
pub struct TelegramTarget {
    pub bot_token: String,
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramTarget")
            .field("bot_token", &"***")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// [`Notifier`] for a single Telegram chat.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    http: Client,
    api_base: Url,
    target: TelegramTarget,
}

impl TelegramNotifier {
    /// Build a notifier rooted at `api_base` (e.g. `https://api.telegram.org`).
    pub fn new(
        api_base: &Url,
        target: TelegramTarget,
        timeout: Duration,
    ) -> Result<Self, DeliveryError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, api_base, target))
    }

    /// Use an already configured HTTP client.
    pub fn with_client(http: Client, api_base: &Url, target: TelegramTarget) -> Self {
        Self {
            http,
            api_base: api_base.clone(),
            target,
        }
    }

    fn send_message_url(&self) -> Url {
        let mut url = self.api_base.clone();
        let path = format!(
            "{}/bot{}/sendMessage",
            self.api_base.path().trim_end_matches('/'),
            self.target.bot_token
        );
        url.set_path(&path);
        url
    }
}

impl Notifier for TelegramNotifier {
    #[instrument(level = "info", skip_all, fields(chat_id = %self.target.chat_id))]
    async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        let t0 = Instant::now();
        let form = [
            ("chat_id", self.target.chat_id.as_str()),
            ("text", text),
            ("disable_web_page_preview", "false"),
        ];

        let resp = self
            .http
            .post(self.send_message_url())
            .form(&form)
            .send()
            .await
            // reqwest errors carry the URL, which embeds the bot token
            .map_err(|e| e.without_url())?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| e.without_url())?;
        if !status.is_success() {
            warn!(status = status.as_u16(), body = %truncate_for_log(&body, 300), "sendMessage failed");
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body: truncate_for_log(&body, 300),
            });
        }

        match serde_json::from_str::<TelegramResponse>(&body) {
            Ok(TelegramResponse { ok: false, description }) => {
                return Err(DeliveryError::Rejected(
                    description.unwrap_or_else(|| "ok=false".to_string()),
                ));
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "sendMessage returned an unexpected body; treating 2xx as success")
            }
        }

        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            preview = %truncate_for_log(text, 80),
            "Message delivered"
        );
        Ok(())
    }
}
