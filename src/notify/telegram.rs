use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::Notifier;
use crate::{MonitorError, Result};

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Credentials and endpoint for the Telegram Bot API. Built once from
/// CLI/env input and handed to the notifier constructor; nothing is read
/// from process-global state afterwards.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub chat_id: Option<String>,
    pub api_base: String,
}

impl TelegramConfig {
    pub fn new(token: Option<String>, chat_id: Option<String>) -> Self {
        Self {
            token,
            chat_id,
            api_base: TELEGRAM_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Both credentials present. Without them, sends soft-disable.
    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.chat_id.is_some()
    }
}

pub struct TelegramNotifier {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn post_message(
        &self,
        token: &str,
        chat_id: &str,
        text: &str,
    ) -> Result<reqwest::Response> {
        let url = format!("{}/bot{}/sendMessage", self.config.api_base, token);
        let params = [("chat_id", chat_id), ("text", text), ("parse_mode", "HTML")];
        let response = self
            .client
            .post(&url)
            .form(&params)
            .timeout(SEND_TIMEOUT)
            .send()
            .await?;
        Ok(response)
    }

    /// Standalone connectivity check. Unlike [`Notifier::send`], missing
    /// credentials or a rejected message are hard errors here.
    pub async fn send_test(&self) -> Result<()> {
        let (Some(token), Some(chat_id)) = (&self.config.token, &self.config.chat_id) else {
            return Err(MonitorError::Notification(
                "TELEGRAM_TOKEN or TELEGRAM_CHAT_ID not set".into(),
            ));
        };

        let response = self
            .post_message(token, chat_id, "Test: monitor funcionando ✅")
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(MonitorError::Notification(format!(
                "telegram rejected the test message: status={}",
                response.status()
            )))
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> bool {
        let (Some(token), Some(chat_id)) = (&self.config.token, &self.config.chat_id) else {
            warn!("TELEGRAM_TOKEN or TELEGRAM_CHAT_ID not set, skipping telegram");
            return false;
        };

        match self.post_message(token, chat_id, message).await {
            Ok(response) if response.status().is_success() => {
                info!("sent to telegram");
                true
            }
            Ok(response) => {
                error!(status = %response.status(), "telegram send rejected");
                false
            }
            Err(e) => {
                error!(error = %e, "telegram send failed");
                false
            }
        }
    }
}
