//! Bounded, importance-weighted conversation context cache

use crate::analyzer::MessageAnalyzer;
use crate::coherence::CoherenceScorer;
use crate::config::ContextConfig;
use crate::error::{ContextError, Result};
use crate::eviction::evict;
use crate::suggestions::continuation_suggestions;
use crate::types::{
    Complexity, ConversationContext, EnhancedContext, Intent, MessageAnalysis, MessageEntry,
    Urgency,
};
use chrono::{DateTime, Utc};
use moka::sync::Cache;
use parking_lot::Mutex;
use rapport_telemetry::estimate_tokens;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

type Slot = Arc<Mutex<ConversationContext>>;

/// Owns one [`ConversationContext`] per conversation id.
///
/// Each context sits behind its own lock, so updates to unrelated
/// conversations never contend. The map itself is capacity bounded and
/// forgets conversations idle for longer than the staleness window.
pub struct ContextStore {
    config: ContextConfig,
    analyzer: MessageAnalyzer,
    scorer: CoherenceScorer,
    contexts: Cache<String, Slot>,
}

impl ContextStore {
    pub fn new(config: ContextConfig) -> Self {
        let idle = config
            .staleness_window()
            .to_std()
            .unwrap_or(Duration::from_secs(24 * 60 * 60));

        let contexts = Cache::builder()
            .max_capacity(config.max_conversations)
            // Plain LRU: a new conversation always displaces the coldest one
            .eviction_policy(moka::policy::EvictionPolicy::lru())
            .time_to_idle(idle)
            .eviction_listener(|key: Arc<String>, _slot: Slot, cause| {
                debug!(conversation_id = %key, ?cause, "conversation dropped from cache");
            })
            .build();

        Self {
            scorer: CoherenceScorer::new(config.coherence.clone()),
            analyzer: MessageAnalyzer::new(),
            config,
            contexts,
        }
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Append a message to its conversation and return the enhanced view.
    ///
    /// Never fails: problems are reported through `degraded` / `error` on the
    /// returned view.
    pub fn update(
        &self,
        conversation_id: &str,
        user_id: &str,
        project_id: Option<&str>,
        message: &str,
    ) -> EnhancedContext {
        self.update_at(conversation_id, user_id, project_id, message, Utc::now())
    }

    /// [`ContextStore::update`] with an explicit clock
    pub fn update_at(
        &self,
        conversation_id: &str,
        user_id: &str,
        project_id: Option<&str>,
        message: &str,
        now: DateTime<Utc>,
    ) -> EnhancedContext {
        match self.try_update(conversation_id, user_id, project_id, message, now) {
            Ok(view) => view,
            Err(err) => {
                warn!(conversation_id, error = %err, "context update failed, returning empty context");
                EnhancedContext::degraded(conversation_id, err.to_string())
            }
        }
    }

    fn try_update(
        &self,
        conversation_id: &str,
        user_id: &str,
        project_id: Option<&str>,
        message: &str,
        now: DateTime<Utc>,
    ) -> Result<EnhancedContext> {
        if conversation_id.trim().is_empty() {
            return Err(ContextError::InvalidConversationId);
        }

        let (analysis, analysis_error) = match self.analyzer.analyze(message) {
            Ok(analysis) => (analysis, None),
            Err(err) => {
                warn!(conversation_id, error = %err, "message analysis failed, using neutral analysis");
                (MessageAnalysis::neutral(message.chars().count()), Some(err))
            }
        };

        let fresh = || {
            ConversationContext::new(conversation_id, user_id, project_id.map(str::to_string), now)
        };
        let slot = self
            .contexts
            .get_with(conversation_id.to_string(), || Arc::new(Mutex::new(fresh())));
        let mut ctx = slot.lock();

        // Phase 1: Recreate stale contexts
        if ctx.is_stale(now, self.config.staleness_window()) {
            debug!(conversation_id, last_updated = %ctx.last_updated, "recreating stale context");
            *ctx = fresh();
        }
        if ctx.project_id.is_none() {
            ctx.project_id = project_id.map(str::to_string);
        }

        // Phase 2: Append the scored message, merge topics and technical terms
        let importance = self.importance(&analysis);
        ctx.topics.extend(analysis.topics.iter().cloned());
        if analysis.code_related {
            ctx.merge_programming_terms(&analysis.technical_terms);
        }
        ctx.messages.push(MessageEntry {
            content: message.to_string(),
            timestamp: now,
            analysis: analysis.clone(),
            topics: analysis.topics.clone(),
            importance,
        });
        ctx.last_updated = now;

        // Phase 3: Coherence over the recent window
        let window_start = ctx
            .messages
            .len()
            .saturating_sub(self.config.coherence_window);
        let context_score = self.scorer.score(&ctx.messages[window_start..]);
        ctx.context_score = context_score;

        // Phase 4: Evict past the cap
        let dropped = evict(&mut ctx.messages, &self.config.eviction);
        if dropped > 0 {
            debug!(conversation_id, dropped, kept = ctx.messages.len(), "evicted messages");
        }

        let mut view = self.build_view(&ctx, &analysis);
        if let Some(err) = analysis_error {
            view.degraded = true;
            view.error = Some(err.to_string());
        }

        debug!(
            conversation_id,
            importance,
            context_score = view.context_score,
            relevant = view.relevant_messages.len(),
            "context updated"
        );
        Ok(view)
    }

    /// Importance of a new message, capped at 1.0
    pub fn importance(&self, analysis: &MessageAnalysis) -> f64 {
        let weights = &self.config.importance;
        let mut score = weights.base;
        if analysis.code_related {
            score += weights.code_related;
        }
        score += match analysis.complexity {
            Complexity::High => weights.high_complexity,
            Complexity::Medium => weights.medium_complexity,
            Complexity::Low => 0.0,
        };
        if analysis.intent == Intent::Question {
            score += weights.question;
        }
        if analysis.urgency == Urgency::High {
            score += weights.urgent;
        }
        score.clamp(0.0, 1.0)
    }

    fn build_view(&self, ctx: &ConversationContext, current: &MessageAnalysis) -> EnhancedContext {
        // The newest message is always retained and always last
        let prior = &ctx.messages[..ctx.messages.len().saturating_sub(1)];

        let mut relevant: Vec<MessageEntry> = prior
            .iter()
            .rev()
            .filter(|m| {
                !m.topics.is_disjoint(&current.topics)
                    || m.importance > self.config.relevant_importance
            })
            .take(self.config.relevant_window)
            .cloned()
            .collect();
        relevant.reverse();

        let estimated_tokens = relevant.iter().map(|m| estimate_tokens(&m.content)).sum();

        EnhancedContext {
            conversation_id: ctx.conversation_id.clone(),
            analysis: current.clone(),
            suggestions: continuation_suggestions(
                current,
                ctx.context_score,
                ctx.agents_involved.len(),
                self.config.max_suggestions,
            ),
            relevant_messages: relevant,
            topics: ctx.topics.clone(),
            technical_context: ctx.technical_context.clone(),
            context_score: ctx.context_score,
            message_count: ctx.messages.len(),
            estimated_tokens,
            degraded: false,
            error: None,
        }
    }

    /// Note an agent or model that took part in the conversation
    pub fn record_agent(&self, conversation_id: &str, agent_id: &str) -> bool {
        match self.contexts.get(conversation_id) {
            Some(slot) => {
                slot.lock().agents_involved.insert(agent_id.to_string());
                true
            }
            None => false,
        }
    }

    pub fn set_user_preference(
        &self,
        conversation_id: &str,
        key: &str,
        value: serde_json::Value,
    ) -> bool {
        match self.contexts.get(conversation_id) {
            Some(slot) => {
                slot.lock().user_preferences.insert(key.to_string(), value);
                true
            }
            None => false,
        }
    }

    /// Copy of the current context, if the conversation is live
    pub fn snapshot(&self, conversation_id: &str) -> Option<ConversationContext> {
        self.contexts
            .get(conversation_id)
            .map(|slot| slot.lock().clone())
    }

    /// Apply pending cache evictions and expirations
    pub fn run_maintenance(&self) {
        self.contexts.run_pending_tasks();
    }

    pub fn conversation_count(&self) -> u64 {
        self.run_maintenance();
        self.contexts.entry_count()
    }

    /// Forget every conversation (shutdown)
    pub fn clear(&self) {
        self.contexts.invalidate_all();
        self.run_maintenance();
    }
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new(ContextConfig::default())
    }
}
