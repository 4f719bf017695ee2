//! Telemetry record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One routing decision: which resource served which task category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub resource_id: String,
    #[serde(default)]
    pub provider: String,
    pub category: String,
    pub cost_per_token: f64,
    pub selected_at: DateTime<Utc>,
    /// True when no registered resource satisfied the routing constraints
    #[serde(default)]
    pub fallback: bool,
}

impl UsageRecord {
    pub fn new(
        resource_id: impl Into<String>,
        provider: impl Into<String>,
        category: impl Into<String>,
        cost_per_token: f64,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            provider: provider.into(),
            category: category.into(),
            cost_per_token,
            selected_at: Utc::now(),
            fallback: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_record_json_shape() {
        let record = UsageRecord::new("gpt-4o-mini", "openai", "quick_tasks", 1.5e-7);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["resource_id"], "gpt-4o-mini");
        assert_eq!(value["provider"], "openai");
        assert_eq!(value["category"], "quick_tasks");
        assert_eq!(value["fallback"], false);
        assert!(value["selected_at"].is_string());
    }

    #[test]
    fn test_usage_record_backwards_compatible() {
        let old_json = r#"{"resource_id":"m1","category":"analysis","cost_per_token":0.0,"selected_at":"2025-01-01T00:00:00Z"}"#;
        let parsed: UsageRecord = serde_json::from_str(old_json).unwrap();
        assert_eq!(parsed.resource_id, "m1");
        assert!(parsed.provider.is_empty());
        assert!(!parsed.fallback);
    }
}
