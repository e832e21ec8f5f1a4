use metrics::counter;
use std::collections::BTreeMap;
use tracing::info;

/// Outcome counts for one pass over the table.
#[derive(Debug, Clone, PartialEq)]
pub struct StageReport {
    pub stage: &'static str,
    pub succeeded: usize,
    /// Misses keyed by category label.
    pub missed: BTreeMap<&'static str, usize>,
}

impl StageReport {
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            succeeded: 0,
            missed: BTreeMap::new(),
        }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_miss(&mut self, category: &'static str) {
        *self.missed.entry(category).or_insert(0) += 1;
    }

    pub fn total_missed(&self) -> usize {
        self.missed.values().sum()
    }

    pub fn attempted(&self) -> usize {
        self.succeeded + self.total_missed()
    }

    pub fn missed_with(&self, category: &str) -> usize {
        self.missed.get(category).copied().unwrap_or(0)
    }

    /// Log the counts and publish them as `airport_lookups_total{stage, outcome}`.
    pub fn emit(&self) {
        info!(
            stage = self.stage,
            attempted = self.attempted(),
            succeeded = self.succeeded,
            missed = self.total_missed(),
            breakdown = ?self.missed,
            "Stage finished"
        );
        counter!("airport_lookups_total", "stage" => self.stage, "outcome" => "ok")
            .increment(self.succeeded as u64);
        for (category, count) in &self.missed {
            counter!("airport_lookups_total", "stage" => self.stage, "outcome" => *category)
                .increment(*count as u64);
        }
    }
}
