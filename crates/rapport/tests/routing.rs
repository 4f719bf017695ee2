mod common;

use common::{chat_model, router_over};
use rapport_route::{
    default_catalog, Requirements, ResourceDescriptor, ResourceRegistry, RuleBook, RoutingRule,
    Router, RouterConfig, SpeedTier, UsageTracker,
};
use std::sync::Arc;

#[test]
fn test_single_free_chat_resource_always_wins() {
    let router = router_over(vec![chat_model("free-chat", 0.0, SpeedTier::UltraFast)]);
    let req = Requirements::new().with_capability("chat");

    for category in ["quick_tasks", "no_such_category"] {
        let selection = router.route(category, &req);
        assert!(!selection.is_fallback(), "{category}");
        assert_eq!(selection.resource().id, "free-chat");
    }
}

#[test]
fn test_idempotent_registration() {
    let registry = ResourceRegistry::new();
    let model = chat_model("m1", 0.000_001, SpeedTier::Fast);
    registry.register(model.clone()).unwrap();
    registry.increment_usage("m1");
    registry.register(model).unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("m1").unwrap().usage_count, 1);
}

#[test]
fn test_routing_is_deterministic() {
    // Two routers over identical state must agree at every step
    let a = router_over(default_catalog());
    let b = router_over(default_catalog());
    let requests = [
        ("code_generation", Requirements::new()),
        ("debugging", Requirements::new().with_preferred("vision")),
        ("analysis", Requirements::new()),
        ("quick_tasks", Requirements::new()),
        ("creative_writing", Requirements::new()),
        ("complex_reasoning", Requirements::new()),
        ("mystery", Requirements::new()),
    ];
    for _ in 0..3 {
        for (category, req) in &requests {
            assert_eq!(a.select(category, req).id, b.select(category, req).id);
        }
    }
}

#[test]
fn test_never_fails() {
    let empty = router_over(Vec::new());
    for category in ["quick_tasks", "debugging", "", "unknown"] {
        let selection = empty.route(category, &Requirements::new().with_capability("telepathy"));
        assert!(selection.is_fallback());
        assert_eq!(selection.resource().id, ResourceDescriptor::fallback().id);
    }
    assert_eq!(empty.tracker().fallback_count(), 4);

    let full = router_over(default_catalog());
    let impossible = Requirements {
        min_context_length: Some(u64::MAX),
        ..Requirements::default()
    };
    let selection = full.route("analysis", &impossible);
    assert!(selection.is_fallback());
    // Registered fallback entry is used, and its counter moves
    assert_eq!(selection.resource().usage_count, 1);
}

#[test]
fn test_custom_rule_book_and_shared_tracker() {
    let registry = Arc::new(ResourceRegistry::with_catalog(vec![
        chat_model("fast", 0.000_000_5, SpeedTier::UltraFast),
        chat_model("local", 0.0, SpeedTier::Slow),
    ])
    .unwrap());
    let mut rules = RuleBook::empty();
    rules.insert(
        RoutingRule::new("private")
            .prefer(&["local"])
            .max_cost(0.0)
            .require(&["chat"]),
    );

    let tracker = Arc::new(UsageTracker::default());
    let router = Router::new(registry, rules, RouterConfig::default(), tracker.clone());

    assert_eq!(router.select("private", &Requirements::new()).id, "local");
    assert_eq!(router.select("anything", &Requirements::new()).id, "fast");
    assert_eq!(tracker.total_count(), 2);
    assert_eq!(tracker.most_used(1).len(), 1);
}

#[test]
fn test_usage_builds_reliability() {
    let router = router_over(vec![
        chat_model("a", 0.0, SpeedTier::Fast),
        chat_model("b", 0.0, SpeedTier::Fast),
    ]);
    // Ties go to "a" by id; each win adds to its reliability
    for _ in 0..5 {
        assert_eq!(router.select("quick_tasks", &Requirements::new()).id, "a");
    }
    let ranked = router.rank("quick_tasks", &Requirements::new());
    assert!(ranked[0].score > ranked[1].score);
}
