//! Keyword analysis of a raw chat message

use crate::error::{ContextError, Result};
use crate::types::{Complexity, Intent, MessageAnalysis, Urgency};
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::OnceLock;

static WORD_RE: OnceLock<Regex> = OnceLock::new();
static INLINE_CODE_RE: OnceLock<Regex> = OnceLock::new();

/// Programming languages, runtimes and language keywords
const TECHNICAL_TERMS: &[&str] = &[
    // languages
    "python", "javascript", "typescript", "rust", "java", "golang", "ruby", "php", "swift",
    "kotlin", "c++", "c#", "sql", "html", "css", "bash",
    // keywords
    "async", "await", "function", "const", "var", "class", "import", "export", "return",
    "promise", "callback", "closure", "lambda", "def", "struct", "enum", "trait", "interface",
    "generic", "generics", "module",
    // tooling and platforms
    "api", "rest", "graphql", "json", "yaml", "http", "endpoint", "database", "schema",
    "react", "vue", "angular", "node", "django", "flask", "docker", "kubernetes", "git",
    "regex", "algorithm", "recursion", "array", "variable", "thread", "mutex", "compiler",
    "framework", "library", "component", "microservice", "webpack", "npm", "cargo",
];

/// Subset of technical terms that name a language, tracked on user profiles
pub const LANGUAGE_TERMS: &[&str] = &[
    "python", "javascript", "typescript", "rust", "java", "golang", "ruby", "php", "swift",
    "kotlin", "c++", "c#", "sql", "html", "css", "bash",
];

struct TopicKeywords {
    topic: &'static str,
    keywords: &'static [&'static str],
}

const TOPIC_KEYWORD_MAP: &[TopicKeywords] = &[
    TopicKeywords {
        topic: "frontend",
        keywords: &["react", "vue", "angular", "css", "html", "ui", "component", "frontend", "dom"],
    },
    TopicKeywords {
        topic: "backend",
        keywords: &[
            "api", "server", "backend", "endpoint", "database", "sql", "rest", "graphql",
            "microservice",
        ],
    },
    TopicKeywords {
        topic: "devops",
        keywords: &[
            "docker", "kubernetes", "deploy", "deployment", "ci", "pipeline", "aws", "cloud",
            "terraform",
        ],
    },
    TopicKeywords {
        topic: "ai",
        keywords: &["ai", "llm", "model", "prompt", "embedding", "agent", "gpt", "neural", "ml"],
    },
    TopicKeywords {
        topic: "testing",
        keywords: &["test", "tests", "testing", "jest", "pytest", "coverage", "qa", "e2e"],
    },
    TopicKeywords {
        topic: "design",
        keywords: &[
            "design", "layout", "figma", "ux", "color", "typography", "mockup", "wireframe",
        ],
    },
    TopicKeywords {
        topic: "security",
        keywords: &[
            "auth", "authentication", "security", "encryption", "password", "oauth",
            "vulnerability", "jwt",
        ],
    },
    TopicKeywords {
        topic: "data",
        keywords: &["data", "analytics", "csv", "pandas", "dataset", "etl", "chart", "visualization"],
    },
    TopicKeywords {
        topic: "performance",
        keywords: &["performance", "slow", "latency", "optimize", "optimization", "memory", "speed"],
    },
];

const QUESTION_OPENERS: &[&str] = &[
    "what", "how", "why", "when", "where", "who", "which", "can", "could", "would", "should",
    "is", "are", "does", "do",
];

struct IntentKeywords {
    intent: Intent,
    keywords: &'static [&'static str],
}

/// Checked in order; the first intent with a hit wins
const INTENT_KEYWORD_MAP: &[IntentKeywords] = &[
    IntentKeywords {
        intent: Intent::ProblemSolving,
        keywords: &[
            "error", "bug", "fix", "issue", "broken", "problem", "fail", "failing", "crash",
            "debug", "exception", "not working",
        ],
    },
    IntentKeywords {
        intent: Intent::Creation,
        keywords: &[
            "create", "build", "make", "generate", "write", "implement", "develop", "scaffold",
        ],
    },
    IntentKeywords {
        intent: Intent::Learning,
        keywords: &[
            "learn", "explain", "understand", "teach", "tutorial", "concept", "difference",
            "guide",
        ],
    },
];

const URGENCY_KEYWORDS: &[&str] = &[
    "urgent", "asap", "immediately", "critical", "emergency", "right now", "blocker",
    "production is down",
];

const DESIGN_KEYWORDS: &[&str] = &[
    "design", "ui", "ux", "layout", "figma", "mockup", "wireframe", "color", "style",
    "typography", "visual",
];

const TESTING_KEYWORDS: &[&str] = &[
    "test", "tests", "testing", "unit test", "jest", "pytest", "coverage", "qa", "e2e",
];

/// Turns message text into a [`MessageAnalysis`]
#[derive(Debug, Clone, Default)]
pub struct MessageAnalyzer;

struct Scan {
    lower: String,
    words: HashSet<String>,
}

impl Scan {
    fn new(text: &str) -> Self {
        let lower = text.to_lowercase();
        let re = WORD_RE.get_or_init(|| Regex::new(r"[a-z0-9_][a-z0-9_+#]*").unwrap());
        let words = re.find_iter(&lower).map(|m| m.as_str().to_string()).collect();
        Self { lower, words }
    }

    /// Phrases match as substrings, single words match whole tokens
    fn mentions(&self, keyword: &str) -> bool {
        if keyword.contains(' ') {
            self.lower.contains(keyword)
        } else {
            self.words.contains(keyword)
        }
    }

    fn mentions_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|kw| self.mentions(kw))
    }

    fn first_word(&self) -> Option<&str> {
        self.lower
            .split(|c: char| !c.is_alphanumeric())
            .find(|w| !w.is_empty())
    }
}

impl MessageAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze a message; empty input is an error the caller recovers from
    pub fn analyze(&self, text: &str) -> Result<MessageAnalysis> {
        if text.trim().is_empty() {
            return Err(ContextError::EmptyMessage);
        }

        let scan = Scan::new(text);
        let length = text.chars().count();

        let technical_terms: BTreeSet<String> = TECHNICAL_TERMS
            .iter()
            .filter(|term| scan.mentions(term))
            .map(|term| term.to_string())
            .collect();

        let topics: BTreeSet<String> = TOPIC_KEYWORD_MAP
            .iter()
            .filter(|entry| scan.mentions_any(entry.keywords))
            .map(|entry| entry.topic.to_string())
            .collect();

        let urgency = if scan.mentions_any(URGENCY_KEYWORDS) {
            Urgency::High
        } else {
            Urgency::Normal
        };

        let inline_code = INLINE_CODE_RE.get_or_init(|| Regex::new(r"`[^`\n]+`|\w+\([^)]*\)").unwrap());
        let code_related =
            !technical_terms.is_empty() || text.contains("```") || inline_code.is_match(text);

        Ok(MessageAnalysis {
            length,
            complexity: Complexity::classify(length, technical_terms.len()),
            intent: Self::detect_intent(text, &scan),
            technical_terms,
            topics,
            urgency,
            code_related,
            design_related: scan.mentions_any(DESIGN_KEYWORDS),
            testing_related: scan.mentions_any(TESTING_KEYWORDS),
        })
    }

    fn detect_intent(text: &str, scan: &Scan) -> Intent {
        let opens_with_question = scan
            .first_word()
            .is_some_and(|w| QUESTION_OPENERS.contains(&w));
        if text.contains('?') || opens_with_question {
            return Intent::Question;
        }

        INTENT_KEYWORD_MAP
            .iter()
            .find(|entry| scan.mentions_any(entry.keywords))
            .map(|entry| entry.intent)
            .unwrap_or(Intent::Unknown)
    }
}
