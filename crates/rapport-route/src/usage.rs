//! Append-only log of routing decisions and its aggregates

use parking_lot::Mutex;
use rapport_telemetry::{append_jsonl_all, read_jsonl, UsageRecord};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

#[derive(Debug, Default)]
pub struct UsageTracker {
    records: Mutex<Vec<UsageRecord>>,
    savings_multipliers: BTreeMap<String, f64>,
}

impl UsageTracker {
    pub fn new(savings_multipliers: BTreeMap<String, f64>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            savings_multipliers,
        }
    }

    /// Rebuild a tracker from a persisted log
    pub fn from_records(
        records: Vec<UsageRecord>,
        savings_multipliers: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            records: Mutex::new(records),
            savings_multipliers,
        }
    }

    /// Load a JSONL usage log; a missing file gives an empty tracker
    pub fn load_jsonl(
        path: &Path,
        savings_multipliers: BTreeMap<String, f64>,
    ) -> anyhow::Result<Self> {
        let records = read_jsonl(path)?;
        Ok(Self::from_records(records, savings_multipliers))
    }

    pub fn record(&self, record: UsageRecord) {
        self.records.lock().push(record);
    }

    pub fn total_count(&self) -> usize {
        self.records.lock().len()
    }

    /// Top `k` resource ids by selection count; ties by id
    pub fn most_used(&self, k: usize) -> Vec<(String, usize)> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for r in self.records.lock().iter() {
            *counts.entry(r.resource_id.clone()).or_default() += 1;
        }

        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(k);
        ranked
    }

    pub fn provider_distribution(&self) -> BTreeMap<String, usize> {
        let mut dist = BTreeMap::new();
        for r in self.records.lock().iter() {
            *dist.entry(r.provider.clone()).or_default() += 1;
        }
        dist
    }

    pub fn category_distribution(&self) -> BTreeMap<String, usize> {
        let mut dist = BTreeMap::new();
        for r in self.records.lock().iter() {
            *dist.entry(r.category.clone()).or_default() += 1;
        }
        dist
    }

    pub fn fallback_count(&self) -> usize {
        self.records.lock().iter().filter(|r| r.fallback).count()
    }

    /// Estimated spend avoided against `baseline_cost` per decision
    pub fn cost_savings(&self, baseline_cost: f64) -> f64 {
        self.records
            .lock()
            .iter()
            .filter_map(|r| self.savings_multipliers.get(&r.resource_id))
            .map(|m| m * baseline_cost)
            .sum()
    }

    pub fn records(&self) -> Vec<UsageRecord> {
        self.records.lock().clone()
    }

    /// Append every held record to a JSONL file
    pub fn export_jsonl(&self, path: &Path) -> anyhow::Result<usize> {
        let records = self.records.lock();
        Ok(append_jsonl_all(path, records.iter())?)
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}
