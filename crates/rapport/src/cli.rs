use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rapport")]
#[command(version)]
#[command(about = "Conversation context cache and capability router for multi-model chat")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run chat events (JSONL) through the pipeline and print one dispatch per line
    Chat {
        /// Path to events JSONL (reads stdin if omitted)
        #[arg(short, long)]
        file: Option<String>,

        /// Resource catalog JSON (defaults to ~/.rapport/catalog.json, then built-in)
        #[arg(long)]
        catalog: Option<String>,
    },

    /// Make one routing decision and print it
    Route {
        /// Task category, e.g. code_generation or quick_tasks
        category: String,

        /// Required capability (repeatable)
        #[arg(short = 'c', long = "capability")]
        capabilities: Vec<String>,

        /// Maximum cost per token
        #[arg(long)]
        max_cost: Option<f64>,

        /// Minimum context length in tokens
        #[arg(long)]
        min_context: Option<u64>,

        #[arg(long)]
        catalog: Option<String>,
    },

    /// List the resource catalog
    Models {
        #[arg(long)]
        catalog: Option<String>,

        /// Save the listed catalog to ~/.rapport/catalog.json
        #[arg(long)]
        save: bool,
    },

    /// Summarize the usage log
    Report {
        /// Number of most-used resources to show
        #[arg(long, default_value_t = 5)]
        top: usize,

        /// Per-decision baseline cost used for the savings estimate
        #[arg(long, default_value_t = 1.0)]
        baseline_cost: f64,
    },

    /// Print version information
    Version,
}
