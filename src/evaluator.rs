use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::Target;
use crate::fetcher::PageFetcher;
use crate::fingerprint::{RegionPolicy, fingerprint};
use crate::normalizer::visible_text;
use crate::price::PriceExtractor;
use crate::state::TargetState;

/// Most keywords named in a single fragment; bounds the message size.
const MAX_REPORTED_KEYWORDS: usize = 6;

/// One triggered condition for one target. Conditions are independent; any
/// subset can fire in the same run.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// Fingerprint differs from the stored one, or no state existed yet.
    Changed,
    /// Extracted price at or below the configured threshold.
    PriceBelow { price: Decimal, threshold: Decimal },
    /// Configured keywords found in the page text, capped and deduplicated.
    Keywords(Vec<String>),
}

/// Result of checking one target.
#[derive(Debug)]
pub enum CheckOutcome {
    /// Fetch failed; the target keeps its previous state this run.
    Skipped,
    /// The pipeline completed. `alert` is present when at least one trigger
    /// fired; `state` is fresh either way so the next run compares against
    /// the latest content.
    Checked {
        state: TargetState,
        alert: Option<String>,
    },
}

/// Runs the per-target pipeline: fetch → normalize → fingerprint → compare
/// → classify → compose.
pub struct TargetEvaluator {
    fetcher: PageFetcher,
    prices: PriceExtractor,
}

impl TargetEvaluator {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self {
            fetcher,
            prices: PriceExtractor::new(),
        }
    }

    pub async fn check(&self, target: &Target, prior: Option<&TargetState>) -> CheckOutcome {
        let Some(body) = self.fetcher.fetch(&target.url).await else {
            warn!(id = %target.id, "skipping target, fetch failed");
            return CheckOutcome::Skipped;
        };

        let text = visible_text(&body);
        let digest = fingerprint(&text, RegionPolicy::from(target.kind));
        let price = self.prices.extract(&text);

        let triggers = classify(target, prior, &digest, price, &text);
        debug!(id = %target.id, triggers = triggers.len(), "classification done");

        let alert = if triggers.is_empty() {
            None
        } else {
            let fragments: Vec<String> = triggers.iter().map(|t| render(target, t)).collect();
            Some(fragments.join("\n\n"))
        };

        CheckOutcome::Checked {
            state: TargetState {
                fingerprint: digest,
                last_checked: Utc::now(),
                last_price: price,
            },
            alert,
        }
    }
}

/// Decides which conditions fired. A target with no prior state always
/// fires [`Trigger::Changed`], seeding the baseline on its first run.
pub fn classify(
    target: &Target,
    prior: Option<&TargetState>,
    digest: &str,
    price: Option<Decimal>,
    text: &str,
) -> Vec<Trigger> {
    let mut triggers = Vec::new();

    if prior.map(|p| p.fingerprint.as_str()) != Some(digest) {
        triggers.push(Trigger::Changed);
    }

    if let (Some(price), Some(threshold)) = (price, target.price_threshold) {
        if price <= threshold {
            triggers.push(Trigger::PriceBelow { price, threshold });
        }
    }

    let found = matching_keywords(&target.keywords, text);
    if !found.is_empty() {
        triggers.push(Trigger::Keywords(found));
    }

    triggers
}

// Case-insensitive substring search. Configured order kept, duplicates
// dropped, capped at MAX_REPORTED_KEYWORDS.
fn matching_keywords(keywords: &[String], text: &str) -> Vec<String> {
    let haystack = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();
    for keyword in keywords {
        if found.len() == MAX_REPORTED_KEYWORDS {
            break;
        }
        if found.contains(keyword) {
            continue;
        }
        if haystack.contains(&keyword.to_lowercase()) {
            found.push(keyword.clone());
        }
    }
    found
}

fn render(target: &Target, trigger: &Trigger) -> String {
    match trigger {
        Trigger::Changed => format!(
            "<b>CAMBIO DETECTADO</b> en <i>{}</i>\n{}",
            target.label(),
            target.url
        ),
        Trigger::PriceBelow { price, threshold } => format!(
            "<b>PRECIO BAJO</b> {} € <= {} € en <i>{}</i>\n{}",
            price,
            threshold,
            target.label(),
            target.url
        ),
        Trigger::Keywords(found) => format!(
            "<b>KEYWORDS:</b> {} encontrados en <i>{}</i>\n{}",
            found.join(", "),
            target.label(),
            target.url
        ),
    }
}
