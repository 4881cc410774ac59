pub mod telegram;

pub use telegram::{TelegramConfig, TelegramNotifier};

use async_trait::async_trait;

/// Delivery of one composed alert message per run.
///
/// Implementations report success as a boolean and swallow transport
/// errors after logging them; the caller never retries.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> bool;
}
