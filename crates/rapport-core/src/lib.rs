//! Conversation context cache: message analysis, importance-weighted
//! eviction, coherence scoring and user profiles

mod analyzer;
mod coherence;
mod config;
mod error;
mod eviction;
mod profile;
mod store;
mod suggestions;
mod types;

pub use analyzer::{MessageAnalyzer, LANGUAGE_TERMS};
pub use coherence::{flow_consistency, term_repetition, topic_consistency, CoherenceScorer};
pub use config::{CoherenceWeights, ContextConfig, EvictionPolicy, ImportanceWeights};
pub use error::ContextError;
pub use eviction::{blended_scores, evict};
pub use profile::{InteractionPatterns, TechnicalLevel, UserProfile, UserProfileStore};
pub use store::ContextStore;
pub use suggestions::continuation_suggestions;
pub use types::{
    Complexity, ConversationContext, EnhancedContext, Intent, MessageAnalysis, MessageEntry,
    Urgency, PROGRAMMING_LANGUAGES_KEY,
};
