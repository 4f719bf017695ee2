//! Catalog of routable resources with a lock-free usage counter per entry

use crate::descriptor::ResourceDescriptor;
use crate::error::{Result, RouteError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
struct Entry {
    descriptor: ResourceDescriptor,
    usage: AtomicU64,
}

impl Entry {
    fn view(&self) -> ResourceDescriptor {
        ResourceDescriptor {
            usage_count: self.usage.load(Ordering::Relaxed),
            ..self.descriptor.clone()
        }
    }
}

#[derive(Debug, Default)]
pub struct ResourceRegistry {
    entries: RwLock<HashMap<String, Entry>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded from a catalog
    pub fn with_catalog(catalog: impl IntoIterator<Item = ResourceDescriptor>) -> Result<Self> {
        let registry = Self::new();
        registry.register_all(catalog)?;
        Ok(registry)
    }

    /// Parse a JSON array of descriptors
    pub fn parse_catalog(json: &str) -> Result<Vec<ResourceDescriptor>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Upsert by id. Static attributes are replaced; the usage counter is kept.
    pub fn register(&self, descriptor: ResourceDescriptor) -> Result<()> {
        if descriptor.id.trim().is_empty() {
            return Err(RouteError::EmptyId);
        }
        if !descriptor.cost_per_token.is_finite() || descriptor.cost_per_token < 0.0 {
            return Err(RouteError::InvalidCost {
                id: descriptor.id,
                cost: descriptor.cost_per_token,
            });
        }

        let mut entries = self.entries.write();
        match entries.get_mut(&descriptor.id) {
            Some(entry) => {
                tracing::debug!(id = %descriptor.id, "re-registered resource");
                entry.descriptor = descriptor;
            }
            None => {
                tracing::debug!(id = %descriptor.id, "registered resource");
                entries.insert(
                    descriptor.id.clone(),
                    Entry {
                        descriptor,
                        usage: AtomicU64::new(0),
                    },
                );
            }
        }
        Ok(())
    }

    pub fn register_all(
        &self,
        descriptors: impl IntoIterator<Item = ResourceDescriptor>,
    ) -> Result<usize> {
        let mut count = 0;
        for d in descriptors {
            self.register(d)?;
            count += 1;
        }
        Ok(count)
    }

    pub fn get(&self, id: &str) -> Option<ResourceDescriptor> {
        self.entries.read().get(id).map(Entry::view)
    }

    /// Bump the usage counter; returns the new count if the id is registered
    pub fn increment_usage(&self, id: &str) -> Option<u64> {
        self.entries
            .read()
            .get(id)
            .map(|e| e.usage.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Every descriptor with its current usage count, ordered by id
    pub fn snapshot(&self) -> Vec<ResourceDescriptor> {
        let mut all: Vec<ResourceDescriptor> =
            self.entries.read().values().map(Entry::view).collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
