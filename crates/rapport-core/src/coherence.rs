//! Coherence score over a window of recent messages

use crate::config::CoherenceWeights;
use crate::types::MessageEntry;
use std::collections::HashSet;

/// Score returned for windows too short to compare
pub const NEUTRAL_SCORE: f64 = 0.5;

#[derive(Debug, Clone, Default)]
pub struct CoherenceScorer {
    weights: CoherenceWeights,
}

impl CoherenceScorer {
    pub fn new(weights: CoherenceWeights) -> Self {
        Self { weights }
    }

    /// Weighted blend of topic consistency, flow consistency and term repetition
    pub fn score(&self, window: &[MessageEntry]) -> f64 {
        if window.len() < 2 {
            return NEUTRAL_SCORE;
        }

        let blended = self.weights.topic_consistency * topic_consistency(window)
            + self.weights.flow_consistency * flow_consistency(window)
            + self.weights.term_repetition * term_repetition(window);
        blended.clamp(0.0, 1.0)
    }
}

/// `1 - distinct / occurrences` over message topics
pub fn topic_consistency(window: &[MessageEntry]) -> f64 {
    let occurrences: usize = window.iter().map(|m| m.topics.len()).sum();
    if occurrences == 0 {
        return 0.0;
    }
    let distinct: HashSet<&String> = window.iter().flat_map(|m| m.topics.iter()).collect();
    (1.0 - distinct.len() as f64 / occurrences as f64).clamp(0.0, 1.0)
}

/// `1 - variance(complexity) / 2`, floored at zero
pub fn flow_consistency(window: &[MessageEntry]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let levels: Vec<f64> = window
        .iter()
        .map(|m| f64::from(m.analysis.complexity.level()))
        .collect();
    let n = levels.len() as f64;
    let mean = levels.iter().sum::<f64>() / n;
    let variance = levels.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / n;
    (1.0 - variance / 2.0).clamp(0.0, 1.0)
}

/// Technical term occurrences relative to distinct terms, capped at 1
pub fn term_repetition(window: &[MessageEntry]) -> f64 {
    let occurrences: usize = window
        .iter()
        .map(|m| m.analysis.technical_terms.len())
        .sum();
    let distinct: HashSet<&String> = window
        .iter()
        .flat_map(|m| m.analysis.technical_terms.iter())
        .collect();
    (occurrences as f64 / (distinct.len() as f64 + 1.0)).clamp(0.0, 1.0)
}
