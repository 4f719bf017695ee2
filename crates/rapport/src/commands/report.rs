use super::load_settings;
use rapport_route::UsageTracker;
use rapport_telemetry::Paths;

pub fn run(top: usize, baseline_cost: f64) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let settings = load_settings(&paths);
    let tracker = UsageTracker::load_jsonl(&paths.usage_log(), settings.router.savings_multipliers)?;
    let report = build_report(&tracker, top, baseline_cost);
    println!("{}", report);
    Ok(())
}

fn build_report(tracker: &UsageTracker, top: usize, baseline_cost: f64) -> String {
    let total = tracker.total_count();
    if total == 0 {
        return "No routing decisions recorded yet.".to_string();
    }

    let mut sections = Vec::new();

    // Section 1: Summary
    let fallbacks = tracker.fallback_count();
    sections.push(format!(
        "Routing Report\n==============\n\
         Total decisions: {}\nFallbacks: {} ({:.1}%)\n\
         Estimated savings: {:.2} (baseline {:.2} per decision)",
        total,
        fallbacks,
        fallbacks as f64 / total as f64 * 100.0,
        tracker.cost_savings(baseline_cost),
        baseline_cost
    ));

    // Section 2: Most used
    let leaderboard = tracker
        .most_used(top)
        .iter()
        .map(|(id, count)| {
            format!(
                "  {} — {} ({:.0}%)",
                id,
                count,
                *count as f64 / total as f64 * 100.0
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    sections.push(format!("\nMost Used\n---------\n{}", leaderboard));

    // Section 3: Providers
    let providers = tracker
        .provider_distribution()
        .iter()
        .map(|(provider, count)| format!("  {}: {}", provider, count))
        .collect::<Vec<_>>()
        .join("\n");
    sections.push(format!("\nProviders\n---------\n{}", providers));

    // Section 4: Categories
    let categories = tracker
        .category_distribution()
        .iter()
        .map(|(category, count)| format!("  {}: {}", category, count))
        .collect::<Vec<_>>()
        .join("\n");
    sections.push(format!("\nCategories\n----------\n{}", categories));

    sections.join("\n")
}
