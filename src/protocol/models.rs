// src/protocol/models.rs
use serde::{Deserialize, Serialize};

/// Sentinel reported when the document states no effective timestamp.
pub const DEFAULT_EFFECTIVE: &str = "1970-01-01 00:00";

/// One candidate protocol PDF discovered on the listing page, kept in
/// document order (the production page lists the newest protocol first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolLink {
    pub title: String,
    pub url: String,
}

/// Payload forwarded to the webhook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceReport {
    pub date: String,
    pub price: f64,
}

impl PriceReport {
    pub fn new(effective: Option<String>, price: f64) -> Self {
        Self {
            date: effective.unwrap_or_else(|| DEFAULT_EFFECTIVE.to_string()),
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_sentinel_date_when_effective_unknown() {
        let report = PriceReport::new(None, 761.23);
        assert_eq!(report.date, DEFAULT_EFFECTIVE);
    }

    #[test]
    fn serializes_webhook_fields() {
        let report = PriceReport::new(Some("2024-08-15 10:00".to_string()), 761.23);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["date"], "2024-08-15 10:00");
        assert_eq!(json["price"], 761.23);
    }
}
