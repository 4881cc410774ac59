use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{MonitorError, Result};

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// The monitor config document: a handful of knobs plus the target list.
/// Loaded once per run; the core never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    pub targets: Vec<Target>,
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

/// One monitored page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: TargetKind,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Threshold in euros; the extractor only understands European formats.
    #[serde(default, rename = "price_threshold_eur")]
    pub price_threshold: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Fingerprint only the leading region of the page text.
    Section,
    /// Fingerprint the whole page text.
    Full,
}

impl Target {
    /// Display label used in alert fragments; unnamed targets fall back to
    /// their URL.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }
}

impl MonitorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            MonitorError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: MonitorConfig = serde_json::from_str(&raw)
            .map_err(|e| MonitorError::Config(format!("cannot parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(MonitorError::Config("no targets configured".into()));
        }

        if self.fetch_timeout_secs == 0 {
            return Err(MonitorError::Config(
                "fetch_timeout_secs must be greater than 0".into(),
            ));
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            if target.id.is_empty() {
                return Err(MonitorError::Config(format!(
                    "target '{}' has an empty id",
                    target.url
                )));
            }
            if !seen.insert(target.id.as_str()) {
                return Err(MonitorError::Config(format!(
                    "duplicate target id '{}'",
                    target.id
                )));
            }
            if Url::parse(&target.url).is_err() {
                return Err(MonitorError::Config(format!(
                    "target '{}' has an invalid url: {}",
                    target.id, target.url
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn parse(json: &str) -> MonitorConfig {
        serde_json::from_str(json).expect("config should deserialize")
    }

    #[test]
    fn test_parse_full_document() {
        let config = parse(
            r#"{
                "fetch_timeout_secs": 20,
                "targets": [
                    {
                        "id": "shop-offers",
                        "url": "https://shop.example/ofertas",
                        "name": "Ofertas",
                        "type": "section",
                        "keywords": ["oferta", "descuento"],
                        "price_threshold_eur": 99.95
                    },
                    {
                        "id": "landing",
                        "url": "https://example.org/",
                        "type": "full"
                    }
                ]
            }"#,
        );

        assert_eq!(config.fetch_timeout_secs, 20);
        assert_eq!(config.targets.len(), 2);

        let first = &config.targets[0];
        assert_eq!(first.id, "shop-offers");
        assert_eq!(first.kind, TargetKind::Section);
        assert_eq!(first.keywords, vec!["oferta", "descuento"]);
        assert_eq!(
            first.price_threshold,
            Some(Decimal::from_str("99.95").unwrap())
        );

        let second = &config.targets[1];
        assert_eq!(second.kind, TargetKind::Full);
        assert!(second.keywords.is_empty());
        assert!(second.price_threshold.is_none());

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_fetch_timeout() {
        let config = parse(
            r#"{"targets": [{"id": "a", "url": "https://example.org/", "type": "full"}]}"#,
        );
        assert_eq!(config.fetch_timeout_secs, DEFAULT_FETCH_TIMEOUT_SECS);
    }

    #[test]
    fn test_label_falls_back_to_url() {
        let config = parse(
            r#"{"targets": [{"id": "a", "url": "https://example.org/", "type": "full"}]}"#,
        );
        assert_eq!(config.targets[0].label(), "https://example.org/");

        let named = parse(
            r#"{"targets": [{"id": "a", "url": "https://example.org/", "name": "Landing", "type": "full"}]}"#,
        );
        assert_eq!(named.targets[0].label(), "Landing");
    }

    #[test]
    fn test_validate_rejects_empty_target_list() {
        let config = parse(r#"{"targets": []}"#);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("no targets"));
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let config = parse(
            r#"{"targets": [
                {"id": "a", "url": "https://example.org/", "type": "full"},
                {"id": "a", "url": "https://example.com/", "type": "full"}
            ]}"#,
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate target id 'a'"));
    }

    #[test]
    fn test_validate_rejects_empty_id() {
        let config = parse(
            r#"{"targets": [{"id": "", "url": "https://example.org/", "type": "full"}]}"#,
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("empty id"));
    }

    #[test]
    fn test_validate_rejects_invalid_url() {
        let config =
            parse(r#"{"targets": [{"id": "a", "url": "not-a-url", "type": "full"}]}"#);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("invalid url"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = parse(
            r#"{"fetch_timeout_secs": 0, "targets": [{"id": "a", "url": "https://example.org/", "type": "full"}]}"#,
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fetch_timeout_secs"));
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = MonitorConfig::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, MonitorError::Config(_)));
    }
}
