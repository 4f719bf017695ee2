//! Core types for the conversation context cache

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Key in `technical_context` that accumulates code-related terms
pub const PROGRAMMING_LANGUAGES_KEY: &str = "programming_languages";

/// Message complexity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    /// Long messages or term-dense messages rank higher
    pub fn classify(length: usize, technical_terms: usize) -> Self {
        if length > 200 || technical_terms > 3 {
            Complexity::High
        } else if length > 50 || technical_terms > 1 {
            Complexity::Medium
        } else {
            Complexity::Low
        }
    }

    /// Ordinal used by the flow-consistency variance (low=1, medium=2, high=3)
    pub fn level(self) -> u8 {
        match self {
            Complexity::Low => 1,
            Complexity::Medium => 2,
            Complexity::High => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Question,
    Creation,
    ProblemSolving,
    Learning,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    High,
}

/// Structured reading of one message, computed once at append time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAnalysis {
    pub length: usize,
    pub complexity: Complexity,
    pub technical_terms: BTreeSet<String>,
    pub intent: Intent,
    pub topics: BTreeSet<String>,
    pub urgency: Urgency,
    pub code_related: bool,
    pub design_related: bool,
    pub testing_related: bool,
}

impl MessageAnalysis {
    /// Analysis that contributes nothing but the message length
    pub fn neutral(length: usize) -> Self {
        Self {
            length,
            complexity: Complexity::Low,
            technical_terms: BTreeSet::new(),
            intent: Intent::Unknown,
            topics: BTreeSet::new(),
            urgency: Urgency::Normal,
            code_related: false,
            design_related: false,
            testing_related: false,
        }
    }
}

/// One retained message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub analysis: MessageAnalysis,
    pub topics: BTreeSet<String>,
    pub importance: f64,
}

/// Per-conversation state held hot by the context store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    pub conversation_id: String,
    pub user_id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub messages: Vec<MessageEntry>,
    pub topics: BTreeSet<String>,
    pub agents_involved: BTreeSet<String>,
    pub context_score: f64,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub user_preferences: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub technical_context: BTreeMap<String, serde_json::Value>,
}

impl ConversationContext {
    pub fn new(
        conversation_id: impl Into<String>,
        user_id: impl Into<String>,
        project_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            user_id: user_id.into(),
            project_id,
            messages: Vec::new(),
            topics: BTreeSet::new(),
            agents_involved: BTreeSet::new(),
            context_score: 0.5,
            created_at: now,
            last_updated: now,
            user_preferences: BTreeMap::new(),
            technical_context: BTreeMap::new(),
        }
    }

    /// Stale contexts are recreated rather than reused
    pub fn is_stale(&self, now: DateTime<Utc>, window: chrono::Duration) -> bool {
        now - self.last_updated > window
    }

    /// Union new terms into the `programming_languages` accumulator
    pub fn merge_programming_terms(&mut self, terms: &BTreeSet<String>) {
        let entry = self
            .technical_context
            .entry(PROGRAMMING_LANGUAGES_KEY.to_string())
            .or_insert_with(|| serde_json::Value::Array(Vec::new()));

        let mut merged: BTreeSet<String> = entry
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        merged.extend(terms.iter().cloned());

        *entry = serde_json::Value::Array(
            merged.into_iter().map(serde_json::Value::String).collect(),
        );
    }
}

/// Read view handed to the caller after an update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedContext {
    pub conversation_id: String,
    /// Analysis of the message that produced this view
    pub analysis: MessageAnalysis,
    pub relevant_messages: Vec<MessageEntry>,
    pub topics: BTreeSet<String>,
    pub technical_context: BTreeMap<String, serde_json::Value>,
    pub context_score: f64,
    pub suggestions: Vec<String>,
    pub message_count: usize,
    pub estimated_tokens: usize,
    #[serde(default)]
    pub degraded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EnhancedContext {
    /// Minimal context returned when an update could not be applied
    pub fn degraded(conversation_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            analysis: MessageAnalysis::neutral(0),
            relevant_messages: Vec::new(),
            topics: BTreeSet::new(),
            technical_context: BTreeMap::new(),
            context_score: 0.5,
            suggestions: Vec::new(),
            message_count: 0,
            estimated_tokens: 0,
            degraded: true,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complexity_classify() {
        assert_eq!(Complexity::classify(10, 0), Complexity::Low);
        assert_eq!(Complexity::classify(80, 0), Complexity::Medium);
        assert_eq!(Complexity::classify(10, 2), Complexity::Medium);
        assert_eq!(Complexity::classify(250, 0), Complexity::High);
        assert_eq!(Complexity::classify(10, 4), Complexity::High);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&Intent::ProblemSolving).unwrap(),
            "\"problem_solving\""
        );
        assert_eq!(serde_json::to_string(&Complexity::High).unwrap(), "\"high\"");
        assert_eq!(serde_json::to_string(&Urgency::Normal).unwrap(), "\"normal\"");
    }

    #[test]
    fn test_staleness_window() {
        let start = Utc::now();
        let ctx = ConversationContext::new("c1", "u1", None, start);
        let day = chrono::Duration::hours(24);
        assert!(!ctx.is_stale(start + chrono::Duration::hours(23), day));
        assert!(ctx.is_stale(start + chrono::Duration::hours(25), day));
    }

    #[test]
    fn test_merge_programming_terms_is_a_union() {
        let mut ctx = ConversationContext::new("c1", "u1", None, Utc::now());
        ctx.merge_programming_terms(&["rust".to_string(), "async".to_string()].into());
        ctx.merge_programming_terms(&["async".to_string(), "sql".to_string()].into());

        let langs = ctx.technical_context[PROGRAMMING_LANGUAGES_KEY]
            .as_array()
            .unwrap()
            .clone();
        assert_eq!(
            langs,
            vec![
                serde_json::json!("async"),
                serde_json::json!("rust"),
                serde_json::json!("sql")
            ]
        );
    }

    #[test]
    fn test_degraded_view() {
        let view = EnhancedContext::degraded("c9", "boom");
        assert!(view.degraded);
        assert_eq!(view.context_score, 0.5);
        assert!(view.relevant_messages.is_empty());
        assert_eq!(view.error.as_deref(), Some("boom"));
    }
}
