//! JSONL log persistence and atomic file writes

use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

fn open_for_append(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Append one record as a single write so concurrent appenders keep whole lines
pub fn append_jsonl<T: Serialize>(path: &Path, record: &T) -> std::io::Result<()> {
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    open_for_append(path)?.write_all(&line)
}

/// Append a batch of records with a single open; returns how many were written
pub fn append_jsonl_all<'a, T, I>(path: &Path, records: I) -> std::io::Result<usize>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut writer = BufWriter::new(open_for_append(path)?);
    let mut written = 0;
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Read every record from a JSONL file; a missing file reads as empty
pub fn read_jsonl<T: for<'de> Deserialize<'de>>(path: &Path) -> std::io::Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(record) => records.push(record),
            Err(_) => continue, // Skip malformed lines
        }
    }

    Ok(records)
}

/// Replace `path` in one rename so readers never see a half-written file.
///
/// The staging file sits next to the target and carries the process id, so
/// two processes saving the same file do not clobber each other's staging copy.
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "target has no file name")
    })?;
    let staging = parent.join(format!(
        ".{}.{}.partial",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let mut file = File::create(&staging)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    if let Err(e) = std::fs::rename(&staging, path) {
        let _ = std::fs::remove_file(&staging);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UsageRecord;

    #[test]
    fn test_append_then_read_usage_log() {
        let dir = tempfile::TempDir::new().unwrap();
        let log = dir.path().join("nested").join("usage.jsonl");

        append_jsonl(&log, &UsageRecord::new("a", "openai", "analysis", 0.0)).unwrap();
        let batch = vec![
            UsageRecord::new("b", "anthropic", "debugging", 3e-6),
            UsageRecord::new("c", "local", "quick_tasks", 0.0),
        ];
        assert_eq!(append_jsonl_all(&log, &batch).unwrap(), 2);

        let read: Vec<UsageRecord> = read_jsonl(&log).unwrap();
        let ids: Vec<&str> = read.iter().map(|r| r.resource_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_read_skips_malformed_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let log = dir.path().join("usage.jsonl");
        let good = serde_json::to_string(&UsageRecord::new("ok", "p", "c", 0.0)).unwrap();
        std::fs::write(&log, format!("{good}\nnot json\n\n{good}\n")).unwrap();

        let read: Vec<UsageRecord> = read_jsonl(&log).unwrap();
        assert_eq!(read.len(), 2);
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let read: Vec<UsageRecord> = read_jsonl(&dir.path().join("absent.jsonl")).unwrap();
        assert!(read.is_empty());
    }

    #[test]
    fn test_atomic_write_replaces_and_cleans_up() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("nested").join("catalog.json");

        atomic_write(&target, b"[1]").unwrap();
        atomic_write(&target, b"[]").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"[]");

        let leftovers: Vec<_> = std::fs::read_dir(target.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".partial"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_atomic_write_rejects_directory_target() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(atomic_write(&dir.path().join(".."), b"x").is_err());
    }
}
