//! Capability router: filter by hard constraints, rank by weighted score

use crate::config::RouterConfig;
use crate::descriptor::ResourceDescriptor;
use crate::registry::ResourceRegistry;
use crate::rules::{Constraints, Requirements, RuleBook};
use crate::usage::UsageTracker;
use rapport_telemetry::UsageRecord;
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;

/// A candidate that passed the hard filter, with its score
#[derive(Debug, Clone, Serialize)]
pub struct ScoredResource {
    pub descriptor: ResourceDescriptor,
    pub score: f64,
    pub preference_rank: usize,
}

/// Outcome of one routing decision
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Selection {
    Ranked {
        resource: ResourceDescriptor,
        score: f64,
    },
    /// Nothing qualified; the configured default was used
    Fallback { resource: ResourceDescriptor },
}

impl Selection {
    pub fn resource(&self) -> &ResourceDescriptor {
        match self {
            Selection::Ranked { resource, .. } | Selection::Fallback { resource } => resource,
        }
    }

    pub fn into_resource(self) -> ResourceDescriptor {
        match self {
            Selection::Ranked { resource, .. } | Selection::Fallback { resource } => resource,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Selection::Fallback { .. })
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            Selection::Ranked { score, .. } => Some(*score),
            Selection::Fallback { .. } => None,
        }
    }
}

pub struct Router {
    registry: Arc<ResourceRegistry>,
    rules: RuleBook,
    config: RouterConfig,
    tracker: Arc<UsageTracker>,
}

impl Router {
    pub fn new(
        registry: Arc<ResourceRegistry>,
        rules: RuleBook,
        config: RouterConfig,
        tracker: Arc<UsageTracker>,
    ) -> Self {
        Self {
            registry,
            rules,
            config,
            tracker,
        }
    }

    /// Router over `registry` with the default rules and a fresh tracker
    pub fn with_registry(registry: Arc<ResourceRegistry>, config: RouterConfig) -> Self {
        let tracker = Arc::new(UsageTracker::new(config.savings_multipliers.clone()));
        Self::new(registry, RuleBook::default(), config, tracker)
    }

    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    pub fn tracker(&self) -> &Arc<UsageTracker> {
        &self.tracker
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Weighted score of one resource against the wanted capabilities
    pub fn score(&self, d: &ResourceDescriptor, constraints: &Constraints) -> f64 {
        let w = &self.config.weights;

        let speed = d.speed_tier.weight();
        let cost = (1.0 - d.cost_per_token * w.cost_scale).max(0.0);
        let capability = if constraints.wanted.is_empty() {
            1.0
        } else {
            let matched = constraints
                .wanted
                .intersection(&d.capabilities)
                .count();
            matched as f64 / constraints.wanted.len() as f64
        };
        let reliability = if w.reliability_saturation > 0.0 {
            (d.usage_count as f64 / w.reliability_saturation).min(1.0)
        } else {
            1.0
        };

        w.speed * speed + w.cost * cost + w.capability * capability + w.reliability * reliability
    }

    fn passes(d: &ResourceDescriptor, c: &Constraints) -> bool {
        if c.max_cost_per_token.is_some_and(|max| d.cost_per_token > max) {
            return false;
        }
        if c.min_context_length.is_some_and(|min| d.context_length < min) {
            return false;
        }
        d.has_capabilities(&c.required)
    }

    /// Candidates best first, without recording anything
    pub fn rank(&self, category: &str, requirements: &Requirements) -> Vec<ScoredResource> {
        let rule = self.rules.resolve(category);
        let constraints = Constraints::combine(rule, requirements);

        let mut ranked: Vec<ScoredResource> = self
            .registry
            .snapshot()
            .into_iter()
            .filter(|d| Self::passes(d, &constraints))
            .map(|d| ScoredResource {
                score: self.score(&d, &constraints),
                preference_rank: rule.preference_rank(&d.id),
                descriptor: d,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(a.preference_rank.cmp(&b.preference_rank))
                .then_with(|| a.descriptor.id.cmp(&b.descriptor.id))
        });
        ranked
    }

    /// Pick a resource and record the decision. Never fails.
    pub fn route(&self, category: &str, requirements: &Requirements) -> Selection {
        let selection = match self.rank(category, requirements).into_iter().next() {
            Some(best) => {
                let mut resource = best.descriptor;
                if let Some(count) = self.registry.increment_usage(&resource.id) {
                    resource.usage_count = count;
                }
                tracing::debug!(
                    category,
                    resource = %resource.id,
                    score = best.score,
                    "routed"
                );
                Selection::Ranked {
                    resource,
                    score: best.score,
                }
            }
            None => {
                let mut resource = self.fallback_resource();
                if let Some(count) = self.registry.increment_usage(&resource.id) {
                    resource.usage_count = count;
                }
                tracing::warn!(
                    category,
                    resource = %resource.id,
                    "no resource satisfied routing constraints, using fallback"
                );
                Selection::Fallback { resource }
            }
        };

        let resource = selection.resource();
        let mut record = UsageRecord::new(
            &resource.id,
            &resource.provider,
            category,
            resource.cost_per_token,
        );
        record.fallback = selection.is_fallback();
        self.tracker.record(record);

        selection
    }

    pub fn select(&self, category: &str, requirements: &Requirements) -> ResourceDescriptor {
        self.route(category, requirements).into_resource()
    }

    /// Registered entry for the fallback id, else the built-in default
    pub fn fallback_resource(&self) -> ResourceDescriptor {
        self.registry
            .get(&self.config.fallback_resource_id)
            .unwrap_or_else(ResourceDescriptor::fallback)
    }
}
