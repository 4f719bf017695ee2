//! Per-category routing rules and per-call requirements

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Category used when a caller names one the rule book does not know
pub const DEFAULT_CATEGORY: &str = "quick_tasks";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingRule {
    pub category: String,
    #[serde(default)]
    pub preferred_ids: Vec<String>,
    #[serde(default)]
    pub max_cost_per_token: Option<f64>,
    #[serde(default)]
    pub min_context_length: Option<u64>,
    #[serde(default)]
    pub required_capabilities: BTreeSet<String>,
}

impl RoutingRule {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            preferred_ids: Vec::new(),
            max_cost_per_token: None,
            min_context_length: None,
            required_capabilities: BTreeSet::new(),
        }
    }

    pub fn prefer(mut self, ids: &[&str]) -> Self {
        self.preferred_ids = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn max_cost(mut self, cost: f64) -> Self {
        self.max_cost_per_token = Some(cost);
        self
    }

    pub fn min_context(mut self, tokens: u64) -> Self {
        self.min_context_length = Some(tokens);
        self
    }

    pub fn require(mut self, caps: &[&str]) -> Self {
        self.required_capabilities = caps.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Position in `preferred_ids`, or past the end when absent
    pub fn preference_rank(&self, id: &str) -> usize {
        self.preferred_ids
            .iter()
            .position(|p| p == id)
            .unwrap_or(self.preferred_ids.len())
    }
}

/// Caller-side half of a routing request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirements {
    pub max_cost_per_token: Option<f64>,
    pub min_context_length: Option<u64>,
    /// Hard: every one must be present
    pub capabilities: BTreeSet<String>,
    /// Soft: only count toward the capability match
    pub preferred_capabilities: BTreeSet<String>,
}

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capability(mut self, cap: impl Into<String>) -> Self {
        self.capabilities.insert(cap.into());
        self
    }

    pub fn with_preferred(mut self, cap: impl Into<String>) -> Self {
        self.preferred_capabilities.insert(cap.into());
        self
    }
}

/// Effective hard filter after merging a rule with the caller's requirements
#[derive(Debug, Clone, PartialEq)]
pub struct Constraints {
    pub max_cost_per_token: Option<f64>,
    pub min_context_length: Option<u64>,
    pub required: BTreeSet<String>,
    /// Hard and soft capabilities together
    pub wanted: BTreeSet<String>,
}

impl Constraints {
    /// Tighter cost ceiling, larger context floor, union of capabilities
    pub fn combine(rule: &RoutingRule, req: &Requirements) -> Self {
        let max_cost_per_token = match (rule.max_cost_per_token, req.max_cost_per_token) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let min_context_length = match (rule.min_context_length, req.min_context_length) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };

        let required: BTreeSet<String> = rule
            .required_capabilities
            .union(&req.capabilities)
            .cloned()
            .collect();
        let wanted = required
            .union(&req.preferred_capabilities)
            .cloned()
            .collect();

        Self {
            max_cost_per_token,
            min_context_length,
            required,
            wanted,
        }
    }
}

/// Routing rules keyed by task category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleBook {
    rules: HashMap<String, RoutingRule>,
}

impl RuleBook {
    /// Empty book apart from the catch-all rule
    pub fn empty() -> Self {
        let mut book = Self {
            rules: HashMap::new(),
        };
        book.insert(RoutingRule::new(DEFAULT_CATEGORY).require(&["chat"]));
        book
    }

    pub fn new() -> Self {
        let mut book = Self::empty();
        for rule in [
            RoutingRule::new(DEFAULT_CATEGORY)
                .prefer(&["gpt-4o-mini", "claude-3-haiku", "gemini-1.5-flash"])
                .max_cost(0.000_001)
                .require(&["chat"]),
            RoutingRule::new("code_generation")
                .prefer(&["claude-3-5-sonnet", "gpt-4o"])
                .max_cost(0.000_02)
                .min_context(16_000)
                .require(&["code"]),
            RoutingRule::new("debugging")
                .prefer(&["claude-3-5-sonnet", "gpt-4o", "o1"])
                .max_cost(0.000_02)
                .min_context(16_000)
                .require(&["code", "reasoning"]),
            RoutingRule::new("complex_reasoning")
                .prefer(&["o1", "claude-3-5-sonnet", "gpt-4o"])
                .min_context(32_000)
                .require(&["reasoning"]),
            RoutingRule::new("creative_writing")
                .prefer(&["claude-3-5-sonnet", "gpt-4o"])
                .max_cost(0.000_01)
                .require(&["creative"]),
            RoutingRule::new("analysis")
                .prefer(&["gemini-1.5-pro", "claude-3-5-sonnet", "gpt-4o"])
                .max_cost(0.000_01)
                .min_context(32_000)
                .require(&["analysis"]),
        ] {
            book.insert(rule);
        }
        book
    }

    /// Replaces any rule already held for the same category
    pub fn insert(&mut self, rule: RoutingRule) {
        self.rules.insert(rule.category.clone(), rule);
    }

    pub fn get(&self, category: &str) -> Option<&RoutingRule> {
        self.rules.get(category)
    }

    /// Rule for `category`, or the catch-all when unknown
    pub fn resolve(&self, category: &str) -> &RoutingRule {
        self.rules
            .get(category)
            .or_else(|| self.rules.get(DEFAULT_CATEGORY))
            .unwrap_or(&FALLBACK_RULE)
    }

    pub fn categories(&self) -> Vec<&str> {
        let mut cats: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        cats.sort_unstable();
        cats
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::new()
    }
}

// Used only if the catch-all was overwritten out of the map
static FALLBACK_RULE: RoutingRule = RoutingRule {
    category: String::new(),
    preferred_ids: Vec::new(),
    max_cost_per_token: None,
    min_context_length: None,
    required_capabilities: BTreeSet::new(),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_category_resolves_to_catch_all() {
        let book = RuleBook::new();
        assert_eq!(book.resolve("does_not_exist").category, DEFAULT_CATEGORY);
        assert_eq!(book.resolve("debugging").category, "debugging");
    }

    #[test]
    fn test_default_categories() {
        let book = RuleBook::new();
        assert_eq!(
            book.categories(),
            vec![
                "analysis",
                "code_generation",
                "complex_reasoning",
                "creative_writing",
                "debugging",
                "quick_tasks"
            ]
        );
    }

    #[test]
    fn test_combine_takes_tighter_bounds() {
        let rule = RoutingRule::new("x")
            .max_cost(0.00001)
            .min_context(8_000)
            .require(&["code"]);
        let req = Requirements {
            max_cost_per_token: Some(0.000001),
            min_context_length: Some(4_000),
            capabilities: ["reasoning".to_string()].into(),
            preferred_capabilities: ["vision".to_string()].into(),
        };
        let c = Constraints::combine(&rule, &req);
        assert_eq!(c.max_cost_per_token, Some(0.000001));
        assert_eq!(c.min_context_length, Some(8_000));
        assert_eq!(c.required.len(), 2);
        assert_eq!(c.wanted.len(), 3);
        assert!(c.wanted.contains("vision"));
        assert!(!c.required.contains("vision"));
    }

    #[test]
    fn test_combine_with_no_bounds() {
        let c = Constraints::combine(&RoutingRule::new("x"), &Requirements::new());
        assert_eq!(c.max_cost_per_token, None);
        assert_eq!(c.min_context_length, None);
        assert!(c.wanted.is_empty());
    }

    #[test]
    fn test_preference_rank() {
        let rule = RoutingRule::new("x").prefer(&["a", "b"]);
        assert_eq!(rule.preference_rank("a"), 0);
        assert_eq!(rule.preference_rank("b"), 1);
        assert_eq!(rule.preference_rank("z"), 2);
    }

    #[test]
    fn test_insert_replaces() {
        let mut book = RuleBook::new();
        book.insert(RoutingRule::new("debugging").prefer(&["local"]));
        assert_eq!(book.resolve("debugging").preferred_ids, vec!["local"]);
    }
}
