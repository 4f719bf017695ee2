//! Capability routing: resource registry, routing rules, usage tracking and
//! the chat pipeline that ties them to the context cache

mod classifier;
mod config;
mod descriptor;
mod error;
mod pipeline;
mod registry;
mod router;
mod rules;
mod settings;
mod usage;

pub use classifier::{TaskCategory, TaskClassifier};
pub use config::{RouterConfig, RouterWeights};
pub use descriptor::{default_catalog, ResourceDescriptor, ResourceType, SpeedTier};
pub use error::RouteError;
pub use pipeline::{ChatPipeline, Dispatch};
pub use registry::ResourceRegistry;
pub use router::{Router, ScoredResource, Selection};
pub use rules::{Constraints, Requirements, RoutingRule, RuleBook, DEFAULT_CATEGORY};
pub use settings::Settings;
pub use usage::UsageTracker;
