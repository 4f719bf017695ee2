//! Per-user running statistics used to bias responses

use crate::analyzer::LANGUAGE_TERMS;
use crate::types::{Complexity, MessageAnalysis};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechnicalLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl TechnicalLevel {
    /// >5 terms advanced, >2 intermediate
    pub fn from_term_count(count: usize) -> Self {
        if count > 5 {
            TechnicalLevel::Advanced
        } else if count > 2 {
            TechnicalLevel::Intermediate
        } else {
            TechnicalLevel::Beginner
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionPatterns {
    pub avg_message_length: f64,
    pub prefers_code_examples: bool,
    pub prefers_visual_explanations: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub preferred_complexity: Complexity,
    pub preferred_explanation_style: String,
    pub technical_level: TechnicalLevel,
    pub preferred_languages: BTreeSet<String>,
    pub interaction_patterns: InteractionPatterns,
    pub message_count: u64,
    pub last_seen: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            preferred_complexity: Complexity::Medium,
            preferred_explanation_style: "balanced".to_string(),
            technical_level: TechnicalLevel::Intermediate,
            preferred_languages: BTreeSet::new(),
            interaction_patterns: InteractionPatterns {
                avg_message_length: 0.0,
                prefers_code_examples: false,
                prefers_visual_explanations: false,
            },
            message_count: 0,
            last_seen: now,
        }
    }

    fn apply(&mut self, analysis: &MessageAnalysis, now: DateTime<Utc>) {
        let patterns = &mut self.interaction_patterns;
        let current = analysis.length as f64;
        // Two-point average: cheap, weights the latest message at one half
        patterns.avg_message_length = if self.message_count == 0 {
            current
        } else {
            (patterns.avg_message_length + current) / 2.0
        };
        patterns.prefers_code_examples |= analysis.code_related;
        patterns.prefers_visual_explanations |= analysis.design_related;

        self.technical_level = TechnicalLevel::from_term_count(analysis.technical_terms.len());
        if analysis.code_related {
            self.preferred_languages.extend(
                analysis
                    .technical_terms
                    .iter()
                    .filter(|t| LANGUAGE_TERMS.contains(&t.as_str()))
                    .cloned(),
            );
        }

        self.message_count += 1;
        self.last_seen = now;
    }
}

/// Profiles keyed by user id, created lazily and kept for the process lifetime
#[derive(Debug, Default)]
pub struct UserProfileStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl UserProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one message into the user's profile and return the updated copy
    pub fn observe(&self, user_id: &str, analysis: &MessageAnalysis) -> UserProfile {
        let now = Utc::now();
        let mut profiles = self.profiles.write();
        let profile = profiles
            .entry(user_id.to_string())
            .or_insert_with(|| UserProfile::new(user_id, now));
        profile.apply(analysis, now);
        profile.clone()
    }

    pub fn get(&self, user_id: &str) -> Option<UserProfile> {
        self.profiles.read().get(user_id).cloned()
    }

    /// Stored profile, or unsaved defaults for a user not seen yet
    pub fn current(&self, user_id: &str) -> UserProfile {
        self.get(user_id)
            .unwrap_or_else(|| UserProfile::new(user_id, Utc::now()))
    }

    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }

    /// Drop every profile (shutdown)
    pub fn clear(&self) {
        self.profiles.write().clear();
    }
}
