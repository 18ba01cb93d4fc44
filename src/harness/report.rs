//! Result table for one comparison run
//!
//! Durations are kept in seconds. Rows are aligned by trial group: column `i`
//! of every row belongs to the group whose label is `labels[i]`.

use serde::Serialize;
use std::time::Duration;

use crate::parallel::Strategy;

/// Width of every rendered column
pub const COLUMN_WIDTH: usize = 12;

/// Prefix of the header line, as wide as a row label plus its separator
const HEADER_PREFIX: &str = "    ";

/// One timed trial, in execution order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialRecord {
    pub ordinal: usize,
    pub group: Option<usize>,
    pub strategy: Strategy,
    pub seconds: f64,
}

/// Durations of one concurrent strategy, one entry per trial group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyRow {
    pub strategy: Strategy,
    pub seconds: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    labels: Vec<String>,
    baselines: Vec<f64>,
    rows: Vec<StrategyRow>,
    trials: Vec<TrialRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self {
            labels: Vec::new(),
            baselines: Vec::new(),
            rows: Strategy::CONCURRENT
                .into_iter()
                .map(|strategy| StrategyRow {
                    strategy,
                    seconds: Vec::new(),
                })
                .collect(),
            trials: Vec::new(),
        }
    }

    /// Open a new column
    pub fn begin_group(&mut self, label: impl Into<String>) {
        self.labels.push(label.into());
    }

    /// Record one trial and return its duration in seconds.
    ///
    /// Sequential trials become baselines; the others are appended to their row.
    pub fn record(&mut self, group: Option<usize>, strategy: Strategy, elapsed: Duration) -> f64 {
        let seconds = elapsed.as_secs_f64();

        match strategy {
            Strategy::Sequential => self.baselines.push(seconds),
            _ => {
                if let Some(row) = self.rows.iter_mut().find(|r| r.strategy == strategy) {
                    row.seconds.push(seconds);
                }
            }
        }

        self.trials.push(TrialRecord {
            ordinal: self.trials.len(),
            group,
            strategy,
            seconds,
        });

        seconds
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Sequential baselines in the order they ran (first, last)
    pub fn baselines(&self) -> &[f64] {
        &self.baselines
    }

    pub fn rows(&self) -> &[StrategyRow] {
        &self.rows
    }

    pub fn row(&self, strategy: Strategy) -> Option<&[f64]> {
        self.rows
            .iter()
            .find(|r| r.strategy == strategy)
            .map(|r| r.seconds.as_slice())
    }

    pub fn trials(&self) -> &[TrialRecord] {
        &self.trials
    }

    /// True when every row has exactly one entry per label
    pub fn is_complete(&self) -> bool {
        self.rows.iter().all(|r| r.seconds.len() == self.labels.len())
    }

    /// Fixed-width text: a header of group labels, then one line per strategy
    pub fn render(&self) -> Vec<String> {
        let header: Vec<String> = self
            .labels
            .iter()
            .map(|label| format!("{label:>width$}", width = COLUMN_WIDTH))
            .collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(format!("{HEADER_PREFIX}{}", header.join(" ")));

        for row in &self.rows {
            let cells: Vec<String> = row
                .seconds
                .iter()
                .map(|secs| format!("{secs:>width$.2}", width = COLUMN_WIDTH))
                .collect();
            lines.push(format!("{} {}", row.strategy.row_label(), cells.join(" ")));
        }

        lines
    }
}

impl Default for ResultTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fixed_width() {
        let mut table = ResultTable::new();
        table.begin_group("1(a->t->m)");
        table.record(Some(1), Strategy::CooperativeAsync, Duration::from_millis(1620));
        table.record(Some(1), Strategy::Threaded, Duration::from_millis(6660));
        table.record(Some(1), Strategy::Multiprocess, Duration::from_millis(8700));

        let lines = table.render();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "      1(a->t->m)");
        assert_eq!(lines[1], "asy         1.62");
        assert_eq!(lines[2], "thr         6.66");
        assert_eq!(lines[3], "mul         8.70");
    }

    #[test]
    fn test_columns_joined_by_single_space() {
        let mut table = ResultTable::new();
        for group in 1..=2 {
            table.begin_group(format!("{group}(a->t->m)"));
            for strategy in Strategy::CONCURRENT {
                table.record(Some(group), strategy, Duration::from_secs(group as u64));
            }
        }

        let lines = table.render();
        assert_eq!(lines[1], format!("asy {:>12} {:>12}", "1.00", "2.00"));
        for line in &lines {
            assert_eq!(line.len(), 4 + 2 * COLUMN_WIDTH + 1);
        }
    }

    #[test]
    fn test_baselines_are_kept_out_of_rows() {
        let mut table = ResultTable::new();
        let first = table.record(None, Strategy::Sequential, Duration::from_millis(4640));
        let last = table.record(None, Strategy::Sequential, Duration::from_millis(4070));

        assert!((first - 4.64).abs() < 1e-9);
        assert_eq!(table.baselines(), &[first, last]);
        assert!(table.rows().iter().all(|r| r.seconds.is_empty()));
        assert_eq!(table.trials().len(), 2);
        assert_eq!(table.trials()[1].ordinal, 1);
    }

    #[test]
    fn test_completeness() {
        let mut table = ResultTable::new();
        table.begin_group("1(a->t->m)");
        table.record(Some(1), Strategy::CooperativeAsync, Duration::ZERO);
        assert!(!table.is_complete());

        table.record(Some(1), Strategy::Threaded, Duration::ZERO);
        table.record(Some(1), Strategy::Multiprocess, Duration::ZERO);
        assert!(table.is_complete());
    }

    #[test]
    fn test_serializes_strategy_names() {
        let mut table = ResultTable::new();
        table.record(None, Strategy::Sequential, Duration::from_secs(1));
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["trials"][0]["strategy"], "sequential");
        assert_eq!(json["rows"][0]["strategy"], "cooperative_async");
    }
}
