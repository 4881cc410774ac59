use std::time::Duration;

use tracing::warn;

use crate::Result;

/// Desktop Chrome identification. Several monitored shops reject obvious
/// bot user agents outright; this is a documented workaround, not a
/// security mechanism.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117 Safari/537.36";

/// Plain HTTP GET with a bounded timeout. Rendering and browser automation
/// are out of scope; the monitored pages serve their content server-side.
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Retrieves the raw body for `url`. Network errors, timeouts, and
    /// non-2xx statuses are logged and yield `None`; nothing propagates to
    /// the caller.
    pub async fn fetch(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url, error = %e, "fetch failed");
                return None;
            }
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                warn!(url, error = %e, "fetch returned error status");
                return None;
            }
        };

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(url, error = %e, "failed to read response body");
                None
            }
        }
    }
}
