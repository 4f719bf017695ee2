//! Router configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weights of the four routing score components
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterWeights {
    pub speed: f64,
    pub cost: f64,
    pub capability: f64,
    pub reliability: f64,
    /// Cost per token at which the cost component reaches zero is `1 / cost_scale`
    pub cost_scale: f64,
    /// Selections after which a resource counts as fully reliable
    pub reliability_saturation: f64,
}

impl Default for RouterWeights {
    fn default() -> Self {
        Self {
            speed: 30.0,
            cost: 25.0,
            capability: 25.0,
            reliability: 20.0,
            cost_scale: 1_000_000.0,
            reliability_saturation: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub weights: RouterWeights,

    /// Resource returned when no candidate survives filtering
    pub fallback_resource_id: String,

    /// Fraction of a baseline cost saved by routing to each cheaper resource
    pub savings_multipliers: BTreeMap<String, f64>,
}

impl RouterConfig {
    pub fn new() -> Self {
        let savings_multipliers = [
            ("gpt-4o-mini", 0.94),
            ("claude-3-haiku", 0.92),
            ("gemini-1.5-flash", 0.97),
            ("llama-3-8b-local", 1.0),
        ]
        .into_iter()
        .map(|(id, m)| (id.to_string(), m))
        .collect();

        Self {
            weights: RouterWeights::default(),
            fallback_resource_id: "gpt-4o-mini".to_string(),
            savings_multipliers,
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: RouterConfig =
            serde_json::from_str(r#"{"weights": {"speed": 10.0}}"#).unwrap();
        assert_eq!(config.weights.speed, 10.0);
        assert_eq!(config.weights.cost, 25.0);
        assert_eq!(config.fallback_resource_id, "gpt-4o-mini");
        assert_eq!(config.savings_multipliers.len(), 4);
    }
}
