//! Continuation suggestions offered alongside an updated context

use crate::types::{Intent, MessageAnalysis};

const LOW_COHERENCE: f64 = 0.4;
const HIGH_COHERENCE: f64 = 0.8;

fn intent_suggestions(intent: Intent) -> &'static [&'static str] {
    match intent {
        Intent::Question => &[
            "Ask for a concrete example",
            "Ask a follow-up on the same topic",
        ],
        Intent::Creation => &[
            "Review the generated result",
            "Add tests for what was created",
        ],
        Intent::ProblemSolving => &[
            "Share the full error message or logs",
            "Walk through the fix step by step",
        ],
        Intent::Learning => &[
            "Explore a related concept",
            "Try a short hands-on exercise",
        ],
        Intent::Unknown => &["Describe what you want to accomplish"],
    }
}

/// Pick between 1 and `max` suggestions from intent, coherence and agent count
pub fn continuation_suggestions(
    analysis: &MessageAnalysis,
    context_score: f64,
    agents_involved: usize,
    max: usize,
) -> Vec<String> {
    let mut out: Vec<String> = intent_suggestions(analysis.intent)
        .iter()
        .map(|s| s.to_string())
        .collect();

    if context_score < LOW_COHERENCE {
        out.push("Summarize the conversation so far to refocus".to_string());
    } else if context_score > HIGH_COHERENCE {
        out.push("Go deeper on the current topic".to_string());
    }

    if agents_involved >= 2 {
        out.push("Ask another agent to review the answer".to_string());
    } else if analysis.code_related || analysis.design_related {
        out.push("Bring in a specialist agent".to_string());
    }

    out.truncate(max.max(1));
    out
}
