//! One inbound chat message through context, profile, classification and routing

use crate::classifier::{TaskCategory, TaskClassifier};
use crate::descriptor::ResourceDescriptor;
use crate::error::Result;
use crate::registry::ResourceRegistry;
use crate::router::Router;
use crate::rules::RuleBook;
use crate::settings::Settings;
use crate::usage::UsageTracker;
use rapport_core::{ContextStore, EnhancedContext, UserProfile, UserProfileStore};
use rapport_telemetry::estimate_tokens;
use serde::Serialize;
use std::sync::Arc;

/// Everything a caller needs to invoke the chosen model
#[derive(Debug, Clone, Serialize)]
pub struct Dispatch {
    pub context: EnhancedContext,
    pub profile: UserProfile,
    pub category: TaskCategory,
    pub resource: ResourceDescriptor,
    pub fallback: bool,
}

pub struct ChatPipeline {
    contexts: ContextStore,
    profiles: UserProfileStore,
    classifier: TaskClassifier,
    router: Router,
}

impl ChatPipeline {
    pub fn new(settings: Settings, catalog: Vec<ResourceDescriptor>) -> Result<Self> {
        let registry = Arc::new(ResourceRegistry::with_catalog(catalog)?);
        let tracker = Arc::new(UsageTracker::new(
            settings.router.savings_multipliers.clone(),
        ));
        Ok(Self {
            contexts: ContextStore::new(settings.context),
            profiles: UserProfileStore::new(),
            classifier: TaskClassifier::new(),
            router: Router::new(registry, RuleBook::default(), settings.router, tracker),
        })
    }

    pub fn handle(
        &self,
        conversation_id: &str,
        user_id: &str,
        project_id: Option<&str>,
        message: &str,
    ) -> Dispatch {
        let context = self
            .contexts
            .update(conversation_id, user_id, project_id, message);
        // A rejected update carries no real analysis to learn from
        let rejected = context.degraded && context.message_count == 0;
        let profile = if rejected {
            self.profiles.current(user_id)
        } else {
            self.profiles.observe(user_id, &context.analysis)
        };

        let category = self.classifier.classify(&context.analysis);
        let tokens = context.estimated_tokens + estimate_tokens(message);
        let requirements = self.classifier.requirements_for(&context.analysis, tokens);

        let selection = self.router.route(category.as_str(), &requirements);
        let fallback = selection.is_fallback();
        let resource = selection.into_resource();
        self.contexts.record_agent(conversation_id, &resource.id);

        tracing::debug!(
            conversation_id,
            category = %category,
            resource = %resource.id,
            context_score = context.context_score,
            "dispatched"
        );

        Dispatch {
            context,
            profile,
            category,
            resource,
            fallback,
        }
    }

    pub fn contexts(&self) -> &ContextStore {
        &self.contexts
    }

    pub fn profiles(&self) -> &UserProfileStore {
        &self.profiles
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn tracker(&self) -> &Arc<UsageTracker> {
        self.router.tracker()
    }

    /// Drop all conversation and profile state
    pub fn shutdown(&self) {
        self.contexts.clear();
        self.profiles.clear();
        tracing::info!("pipeline state cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::default_catalog;

    fn pipeline() -> ChatPipeline {
        ChatPipeline::new(Settings::default(), default_catalog()).unwrap()
    }

    #[test]
    fn test_handle_routes_and_records() {
        let p = pipeline();
        let d = p.handle("c1", "u1", None, "write a python function to parse json");

        assert_eq!(d.category, TaskCategory::CodeGeneration);
        assert!(d.resource.capabilities.contains("code"));
        assert!(!d.fallback);
        assert_eq!(d.profile.message_count, 1);
        assert_eq!(d.context.message_count, 1);
        assert_eq!(p.tracker().total_count(), 1);

        let ctx = p.contexts().snapshot("c1").unwrap();
        assert!(ctx.agents_involved.contains(&d.resource.id));
    }

    #[test]
    fn test_empty_message_still_routes() {
        let p = pipeline();
        let d = p.handle("c1", "u1", None, "");
        assert!(d.context.degraded);
        assert_eq!(d.category, TaskCategory::QuickTasks);
        assert_eq!(p.tracker().total_count(), 1);
    }

    #[test]
    fn test_rejected_update_leaves_profile_alone() {
        let p = pipeline();
        let before = p
            .handle("c1", "u1", None, "write a python function with async await and generics")
            .profile;

        let d = p.handle("   ", "u1", None, "hello");
        assert!(d.context.degraded);
        assert_eq!(d.context.message_count, 0);
        assert_eq!(d.profile, before);
        assert_eq!(p.profiles().get("u1").unwrap(), before);
    }

    #[test]
    fn test_shutdown_clears_state() {
        let p = pipeline();
        p.handle("c1", "u1", None, "hello");
        p.shutdown();
        assert!(p.profiles().is_empty());
        assert_eq!(p.contexts().conversation_count(), 0);
        assert!(p.contexts().snapshot("c1").is_none());
    }

    #[test]
    fn test_empty_catalog_falls_back() {
        let p = ChatPipeline::new(Settings::default(), Vec::new()).unwrap();
        let d = p.handle("c1", "u1", None, "hello");
        assert!(d.fallback);
        assert_eq!(d.resource.id, ResourceDescriptor::fallback().id);
    }
}
