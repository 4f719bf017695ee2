use super::{load_catalog, load_settings};
use rapport_route::{Requirements, ResourceRegistry, Router};
use rapport_telemetry::{append_jsonl, Paths};
use std::path::Path;
use std::sync::Arc;

pub fn run(
    category: &str,
    capabilities: Vec<String>,
    max_cost: Option<f64>,
    min_context: Option<u64>,
    catalog: Option<&str>,
) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let settings = load_settings(&paths);
    let registry = Arc::new(ResourceRegistry::with_catalog(load_catalog(catalog, &paths)?)?);
    let router = Router::with_registry(registry, settings.router);

    let requirements = Requirements {
        max_cost_per_token: max_cost,
        min_context_length: min_context,
        capabilities: capabilities.into_iter().collect(),
        ..Requirements::default()
    };

    let candidates = router.rank(category, &requirements);
    let selection = router.route(category, &requirements);
    log_last_decision(&router, &paths.usage_log())?;

    let output = serde_json::json!({
        "category": category,
        "rule": router.rules().resolve(category).category.clone(),
        "selection": selection,
        "candidates": candidates
            .iter()
            .map(|c| serde_json::json!({"id": c.descriptor.id.clone(), "score": c.score}))
            .collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Append the decision just made to the usage log
fn log_last_decision(router: &Router, log: &Path) -> anyhow::Result<bool> {
    match router.tracker().records().last() {
        Some(record) => {
            append_jsonl(log, record)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapport_route::{default_catalog, RouterConfig, UsageTracker};

    #[test]
    fn test_each_decision_appends_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("telemetry").join("usage.jsonl");
        let registry = Arc::new(ResourceRegistry::with_catalog(default_catalog()).unwrap());
        let router = Router::with_registry(registry, RouterConfig::default());

        assert!(!log_last_decision(&router, &log).unwrap());

        router.route("debugging", &Requirements::new());
        assert!(log_last_decision(&router, &log).unwrap());
        router.route("mystery", &Requirements::new());
        assert!(log_last_decision(&router, &log).unwrap());

        let logged = UsageTracker::load_jsonl(&log, Default::default()).unwrap();
        assert_eq!(logged.records(), router.tracker().records());
    }
}
