//! Configuration for the context cache

use serde::{Deserialize, Serialize};

/// Importance bonuses added to the base score of a new message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportanceWeights {
    pub base: f64,
    pub code_related: f64,
    pub high_complexity: f64,
    pub medium_complexity: f64,
    pub question: f64,
    pub urgent: f64,
}

impl Default for ImportanceWeights {
    fn default() -> Self {
        Self {
            base: 0.5,
            code_related: 0.2,
            high_complexity: 0.2,
            medium_complexity: 0.1,
            question: 0.1,
            urgent: 0.3,
        }
    }
}

/// Sub-score weights for the coherence score
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoherenceWeights {
    pub topic_consistency: f64,
    pub flow_consistency: f64,
    pub term_repetition: f64,
}

impl Default for CoherenceWeights {
    fn default() -> Self {
        Self {
            topic_consistency: 0.4,
            flow_consistency: 0.3,
            term_repetition: 0.3,
        }
    }
}

/// Eviction policy for an over-full message list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvictionPolicy {
    /// Hard cap on retained messages per conversation
    pub max_messages: usize,
    /// Fraction of the cap kept by blended score
    pub keep_ratio: f64,
    /// Most recent messages that always survive
    pub recent_floor: usize,
    pub importance_weight: f64,
    pub recency_weight: f64,
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self {
            max_messages: 50,
            keep_ratio: 0.8,
            recent_floor: 5,
            importance_weight: 0.7,
            recency_weight: 0.3,
        }
    }
}

/// Context store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub eviction: EvictionPolicy,
    pub importance: ImportanceWeights,
    pub coherence: CoherenceWeights,

    /// Messages considered by the coherence score
    pub coherence_window: usize,

    /// Max prior messages returned in the relevant slice
    pub relevant_window: usize,

    /// Messages above this importance are relevant regardless of topic
    pub relevant_importance: f64,

    /// Idle contexts older than this are recreated
    pub staleness_hours: i64,

    /// Process-wide bound on live conversations
    pub max_conversations: u64,

    pub max_suggestions: usize,
}

impl ContextConfig {
    pub fn new() -> Self {
        Self {
            eviction: EvictionPolicy::default(),
            importance: ImportanceWeights::default(),
            coherence: CoherenceWeights::default(),
            coherence_window: 10,
            relevant_window: 10,
            relevant_importance: 0.7,
            staleness_hours: 24,
            max_conversations: 10_000,
            max_suggestions: 4,
        }
    }

    pub fn staleness_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.staleness_hours)
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ContextConfig::new();
        assert_eq!(config.eviction.max_messages, 50);
        assert_eq!(config.eviction.recent_floor, 5);
        assert_eq!(config.coherence_window, 10);
        assert_eq!(config.staleness_window(), chrono::Duration::hours(24));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ContextConfig =
            serde_json::from_str(r#"{"eviction":{"max_messages":20},"staleness_hours":2}"#)
                .unwrap();
        assert_eq!(config.eviction.max_messages, 20);
        assert_eq!(config.eviction.keep_ratio, 0.8);
        assert_eq!(config.staleness_hours, 2);
        assert_eq!(config.importance.urgent, 0.3);
    }
}
