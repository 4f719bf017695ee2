#![allow(dead_code)]

use rapport_core::{ContextConfig, ContextStore};
use rapport_route::{ResourceDescriptor, ResourceRegistry, ResourceType, Router, RouterConfig, SpeedTier};
use std::sync::Arc;

pub fn sample_store() -> ContextStore {
    ContextStore::new(ContextConfig::default())
}

/// Short, term-free messages: low complexity, unknown intent
pub fn plain_messages(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("note number {i}")).collect()
}

pub fn chat_model(id: &str, cost: f64, speed: SpeedTier) -> ResourceDescriptor {
    ResourceDescriptor::new(id, "acme", ResourceType::Chat, cost, speed, 32_000, &["chat"])
}

pub fn router_over(models: Vec<ResourceDescriptor>) -> Router {
    let registry = Arc::new(ResourceRegistry::with_catalog(models).expect("valid catalog"));
    Router::with_registry(registry, RouterConfig::default())
}
