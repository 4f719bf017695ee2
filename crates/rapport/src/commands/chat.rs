use super::{load_catalog, load_settings};
use rapport_route::ChatPipeline;
use rapport_telemetry::Paths;
use serde::Deserialize;
use std::io::{self, BufRead, BufReader, Write};

/// One inbound chat message
#[derive(Debug, Deserialize)]
struct ChatEvent {
    conversation_id: String,
    user_id: String,
    #[serde(default)]
    project_id: Option<String>,
    message: String,
}

pub fn run(file: Option<&str>, catalog: Option<&str>) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let settings = load_settings(&paths);
    let pipeline = ChatPipeline::new(settings, load_catalog(catalog, &paths)?)?;

    let reader: Box<dyn BufRead> = match file {
        Some(path) => Box::new(BufReader::new(std::fs::File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let handled = process(&pipeline, reader, stdout.lock())?;

    let written = pipeline.tracker().export_jsonl(&paths.usage_log())?;
    tracing::info!(handled, written, log = %paths.usage_log().display(), "chat run complete");

    pipeline.shutdown();
    Ok(())
}

/// Dispatch every event line; malformed lines are skipped with a warning
fn process<R: BufRead, W: Write>(
    pipeline: &ChatPipeline,
    reader: R,
    mut out: W,
) -> anyhow::Result<usize> {
    let mut handled = 0;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let event: ChatEvent = match serde_json::from_str(&line) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(line = line_no + 1, error = %e, "skipping malformed event");
                continue;
            }
        };

        let dispatch = pipeline.handle(
            &event.conversation_id,
            &event.user_id,
            event.project_id.as_deref(),
            &event.message,
        );
        serde_json::to_writer(&mut out, &dispatch)?;
        out.write_all(b"\n")?;
        handled += 1;
    }
    out.flush()?;
    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapport_route::{default_catalog, Settings};

    #[test]
    fn test_process_events() {
        let pipeline = ChatPipeline::new(Settings::default(), default_catalog()).unwrap();
        let input = concat!(
            r#"{"conversation_id":"c1","user_id":"u1","message":"write a rust function"}"#,
            "\n\n",
            "not json\n",
            r#"{"conversation_id":"c1","user_id":"u1","project_id":"p1","message":"thanks"}"#,
            "\n"
        );

        let mut out = Vec::new();
        let handled = process(&pipeline, input.as_bytes(), &mut out).unwrap();
        assert_eq!(handled, 2);

        let lines: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["category"], "code_generation");
        assert_eq!(lines[1]["context"]["message_count"], 2);
        assert!(lines[1]["resource"]["id"].is_string());
        assert_eq!(pipeline.tracker().total_count(), 2);
    }
}
