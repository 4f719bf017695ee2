//! Resource descriptors: the static attributes of a routable model or agent

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Chat,
    Completion,
    Embedding,
    Image,
    Agent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedTier {
    UltraFast,
    Fast,
    Medium,
    Slow,
}

impl SpeedTier {
    /// Contribution to the speed component of the routing score
    pub fn weight(self) -> f64 {
        match self {
            SpeedTier::UltraFast => 1.0,
            SpeedTier::Fast => 0.8,
            SpeedTier::Medium => 0.6,
            SpeedTier::Slow => 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub id: String,
    pub provider: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub cost_per_token: f64,
    pub speed_tier: SpeedTier,
    pub context_length: u64,
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
    /// Owned by the registry; ignored on registration
    #[serde(default)]
    pub usage_count: u64,
}

impl ResourceDescriptor {
    pub fn new(
        id: impl Into<String>,
        provider: impl Into<String>,
        resource_type: ResourceType,
        cost_per_token: f64,
        speed_tier: SpeedTier,
        context_length: u64,
        capabilities: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
            resource_type,
            cost_per_token,
            speed_tier,
            context_length,
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
            usage_count: 0,
        }
    }

    pub fn has_capabilities(&self, required: &BTreeSet<String>) -> bool {
        required.is_subset(&self.capabilities)
    }

    /// Built-in default returned when nothing in the registry qualifies
    pub fn fallback() -> Self {
        Self::new(
            "gpt-4o-mini",
            "openai",
            ResourceType::Chat,
            0.000_000_15,
            SpeedTier::UltraFast,
            128_000,
            &["chat", "code", "analysis", "quick"],
        )
    }
}

/// Well-known chat models with list prices per token
pub fn default_catalog() -> Vec<ResourceDescriptor> {
    use ResourceType::*;
    use SpeedTier::*;

    vec![
        ResourceDescriptor::new(
            "gpt-4o",
            "openai",
            Chat,
            0.000_002_5,
            Fast,
            128_000,
            &["chat", "code", "reasoning", "analysis", "creative", "vision"],
        ),
        ResourceDescriptor::fallback(),
        ResourceDescriptor::new(
            "o1",
            "openai",
            Chat,
            0.000_015,
            Slow,
            128_000,
            &["chat", "code", "reasoning", "analysis"],
        ),
        ResourceDescriptor::new(
            "claude-3-5-sonnet",
            "anthropic",
            Chat,
            0.000_003,
            Fast,
            200_000,
            &["chat", "code", "reasoning", "analysis", "creative", "vision"],
        ),
        ResourceDescriptor::new(
            "claude-3-haiku",
            "anthropic",
            Chat,
            0.000_000_25,
            UltraFast,
            200_000,
            &["chat", "analysis", "quick"],
        ),
        ResourceDescriptor::new(
            "gemini-1.5-pro",
            "google",
            Chat,
            0.000_001_25,
            Medium,
            1_000_000,
            &["chat", "code", "reasoning", "analysis", "vision", "long_context"],
        ),
        ResourceDescriptor::new(
            "gemini-1.5-flash",
            "google",
            Chat,
            0.000_000_075,
            UltraFast,
            1_000_000,
            &["chat", "quick", "vision", "long_context"],
        ),
        ResourceDescriptor::new(
            "llama-3-8b-local",
            "local",
            Completion,
            0.0,
            Medium,
            8_192,
            &["chat", "quick"],
        ),
        ResourceDescriptor::new(
            "text-embedding-3-small",
            "openai",
            Embedding,
            0.000_000_02,
            UltraFast,
            8_191,
            &["embedding"],
        ),
    ]
}
