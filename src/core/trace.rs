//! Step-by-step trace of a machine's public calls.
//!
//! Every `input`/`reset` appends one record: the symbol fed, the active set
//! before and after, how many internal passes the engine ran, and when. The
//! trace is immutable; `record` returns a new trace with the entry added.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::state::StateId;

/// Record of a single public step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepRecord {
    /// The symbol fed to the machine (empty for epsilon / reset).
    pub symbol: String,
    /// The active set before the step, in insertion order.
    pub from: Vec<StateId>,
    /// The active set after the step, in first-discovery order.
    pub to: Vec<StateId>,
    /// Internal passes the engine ran, epsilon-closure passes included.
    pub passes: usize,
    /// When the step completed.
    pub timestamp: DateTime<Utc>,
}

/// Ordered trace of the steps a machine has taken.
///
/// # Example
///
/// ```rust
/// use superpose::{StepRecord, StepTrace};
/// use chrono::Utc;
///
/// let trace = StepTrace::new();
/// let trace = trace.record(StepRecord {
///     symbol: "d".to_string(),
///     from: vec!["E".to_string()],
///     to: vec!["D".to_string()],
///     passes: 1,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(trace.records().len(), 1);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StepTrace {
    records: Vec<StepRecord>,
}

impl StepTrace {
    /// Create an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, returning a new trace. The original is unchanged.
    pub fn record(&self, record: StepRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    /// All records in order.
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// The most recent record, if any step has run.
    pub fn last(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    /// The sequence of active sets traversed: the first record's `from`
    /// followed by every record's `to`.
    pub fn sets(&self) -> Vec<&[StateId]> {
        let mut sets: Vec<&[StateId]> = Vec::new();
        if let Some(first) = self.records.first() {
            sets.push(&first.from);
        }
        for record in &self.records {
            sets.push(&record.to);
        }
        sets
    }

    /// Elapsed time between the first and last recorded step, or `None` if
    /// nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no step has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(symbol: &str, from: &[&str], to: &[&str]) -> StepRecord {
        StepRecord {
            symbol: symbol.to_string(),
            from: from.iter().map(|s| s.to_string()).collect(),
            to: to.iter().map(|s| s.to_string()).collect(),
            passes: 1,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_trace_is_empty() {
        let trace = StepTrace::new();
        assert!(trace.is_empty());
        assert!(trace.last().is_none());
        assert!(trace.sets().is_empty());
        assert!(trace.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let trace = StepTrace::new();
        let recorded = trace.record(step("d", &["E"], &["D"]));

        assert_eq!(trace.len(), 0);
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded.last().unwrap().symbol, "d");
    }

    #[test]
    fn sets_returns_the_traversal_path() {
        let trace = StepTrace::new()
            .record(step("d", &["E"], &["D"]))
            .record(step("c", &["D"], &["B", "D"]));

        let sets = trace.sets();
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[0], ["E".to_string()]);
        assert_eq!(sets[1], ["D".to_string()]);
        assert_eq!(sets[2], ["B".to_string(), "D".to_string()]);
    }

    #[test]
    fn duration_spans_first_to_last() {
        let trace = StepTrace::new().record(step("d", &["E"], &["D"]));
        assert_eq!(trace.duration(), Some(Duration::from_secs(0)));

        std::thread::sleep(Duration::from_millis(5));
        let trace = trace.record(step("c", &["D"], &["B", "D"]));
        assert!(trace.duration().unwrap() >= Duration::from_millis(5));
    }

    #[test]
    fn trace_serializes_roundtrip() {
        let trace = StepTrace::new().record(step("d", &["E"], &["D"]));

        let json = serde_json::to_string(&trace).unwrap();
        let parsed: StepTrace = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.len(), trace.len());
        assert_eq!(parsed.last().unwrap().to, trace.last().unwrap().to);
    }
}
