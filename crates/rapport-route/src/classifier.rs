//! Task classification: which routing category a message belongs to

use crate::rules::Requirements;
use rapport_core::{Complexity, Intent, MessageAnalysis};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    CodeGeneration,
    Debugging,
    ComplexReasoning,
    CreativeWriting,
    Analysis,
    QuickTasks,
}

impl TaskCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskCategory::CodeGeneration => "code_generation",
            TaskCategory::Debugging => "debugging",
            TaskCategory::ComplexReasoning => "complex_reasoning",
            TaskCategory::CreativeWriting => "creative_writing",
            TaskCategory::Analysis => "analysis",
            TaskCategory::QuickTasks => "quick_tasks",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct CategoryTopics {
    category: TaskCategory,
    topics: &'static [&'static str],
}

/// Topics that, absent a stronger intent signal, pick a category
const TOPIC_CATEGORY_MAP: &[CategoryTopics] = &[
    CategoryTopics {
        category: TaskCategory::Analysis,
        topics: &["data", "performance", "security"],
    },
    CategoryTopics {
        category: TaskCategory::CodeGeneration,
        topics: &["frontend", "backend", "devops", "testing"],
    },
    CategoryTopics {
        category: TaskCategory::CreativeWriting,
        topics: &["design"],
    },
];

#[derive(Debug, Clone, Default)]
pub struct TaskClassifier;

impl TaskClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, analysis: &MessageAnalysis) -> TaskCategory {
        match analysis.intent {
            Intent::ProblemSolving if analysis.code_related => return TaskCategory::Debugging,
            Intent::Creation if analysis.code_related => return TaskCategory::CodeGeneration,
            Intent::Creation => return TaskCategory::CreativeWriting,
            Intent::Question | Intent::Learning
                if analysis.complexity == Complexity::High =>
            {
                return TaskCategory::ComplexReasoning
            }
            _ => {}
        }

        let mut best_match: Option<(TaskCategory, usize)> = None;
        for entry in TOPIC_CATEGORY_MAP {
            let count = entry
                .topics
                .iter()
                .filter(|t| analysis.topics.contains(**t))
                .count();
            if count > 0 && best_match.map_or(true, |(_, best)| count > best) {
                best_match = Some((entry.category, count));
            }
        }

        match best_match {
            Some((category, _)) => category,
            None if analysis.complexity == Complexity::High => TaskCategory::ComplexReasoning,
            None => TaskCategory::QuickTasks,
        }
    }

    /// Baseline requirements: room for the context plus soft capability hints
    pub fn requirements_for(
        &self,
        analysis: &MessageAnalysis,
        estimated_tokens: usize,
    ) -> Requirements {
        let mut req = Requirements::new();
        if estimated_tokens > 0 {
            req.min_context_length = Some(estimated_tokens as u64);
        }
        if analysis.code_related {
            req = req.with_preferred("code");
        }
        if analysis.design_related {
            req = req.with_preferred("vision");
        }
        req
    }
}
