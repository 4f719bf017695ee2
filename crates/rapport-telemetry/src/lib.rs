//! Usage records, JSONL persistence and token estimation for routing telemetry

mod io;
mod paths;
mod tokens;
mod types;

pub use io::{append_jsonl, append_jsonl_all, atomic_write, read_jsonl};
pub use paths::Paths;
pub use tokens::estimate_tokens;
pub use types::UsageRecord;
