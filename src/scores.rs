//! Per-goal confidence time series.
//!
//! Every tracked goal receives exactly one entry per processed frame, so the
//! resulting table is dense: frames are rows, goals are columns. An entry is
//! the score parsed from the first report line naming the goal, `-1` when the
//! recognizer printed something non-numeric, or missing when no usable line
//! named the goal.

use std::path::Path;

use crate::error::OutputError;

/// Score recorded when the recognizer reports a non-numeric value.
pub const NON_NUMERIC: f64 = -1.0;

/// Separator between a candidate goal and its score in a report line.
const SCORE_SEPARATOR: &str = ": ";

/// Score for `goal` in one candidate report.
///
/// Lines without the separator are skipped; the value after the last
/// separator of the first usable line is parsed. NaN and anything that does
/// not parse as a number map to [`NON_NUMERIC`].
pub fn goal_score(goal: &str, report: &[String]) -> Option<f64> {
    report
        .iter()
        .filter(|line| line.contains(goal))
        .find_map(|line| line.rsplit_once(SCORE_SEPARATOR))
        .map(|(_, value)| match value.trim().parse::<f64>() {
            Ok(score) if !score.is_nan() => score,
            _ => NON_NUMERIC,
        })
}

/// Accumulates one score entry per tracked goal per frame.
#[derive(Debug, Clone)]
pub struct ScoreAccumulator {
    goals: Vec<String>,
    frames: Vec<u64>,
    series: Vec<Vec<Option<f64>>>,
}

impl ScoreAccumulator {
    pub fn new(goals: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let goals: Vec<String> = goals.into_iter().map(Into::into).collect();
        let series = vec![Vec::new(); goals.len()];
        Self {
            goals,
            frames: Vec::new(),
            series,
        }
    }

    /// Record the report in effect at `frame`, reused or fresh.
    pub fn record(&mut self, frame: u64, report: &[String]) {
        self.frames.push(frame);
        for (goal, series) in self.goals.iter().zip(&mut self.series) {
            series.push(goal_score(goal, report));
        }
    }

    pub fn goals(&self) -> &[String] {
        &self.goals
    }

    /// Score sequence of one goal.
    pub fn series(&self, goal: &str) -> Option<&[Option<f64>]> {
        self.goals
            .iter()
            .position(|g| g == goal)
            .map(|i| self.series[i].as_slice())
    }

    pub fn frames(&self) -> usize {
        self.frames.len()
    }

    /// Assemble the rectangular table. Every series holds one entry per
    /// recorded frame.
    pub fn into_table(self) -> ScoreTable {
        debug_assert!(self.series.iter().all(|s| s.len() == self.frames.len()));
        ScoreTable {
            goals: self.goals,
            frames: self.frames,
            columns: self.series,
        }
    }
}

/// Frames x goals score table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    goals: Vec<String>,
    frames: Vec<u64>,
    columns: Vec<Vec<Option<f64>>>,
}

impl ScoreTable {
    pub fn rows(&self) -> usize {
        self.frames.len()
    }

    pub fn columns(&self) -> usize {
        self.goals.len()
    }

    pub fn goals(&self) -> &[String] {
        &self.goals
    }

    /// Cell at (row, column); `None` for a missing score.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.columns.get(column)?.get(row).copied().flatten()
    }

    /// Write as CSV: `frame,<goal>...` header, empty cells for missing scores.
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(std::iter::once("frame").chain(self.goals.iter().map(String::as_str)))?;
        for (row, frame) in self.frames.iter().enumerate() {
            let mut record = Vec::with_capacity(self.goals.len() + 1);
            record.push(frame.to_string());
            for column in &self.columns {
                record.push(column[row].map(|v| v.to_string()).unwrap_or_default());
            }
            out.write_record(&record)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Persist the table to `path`.
    pub fn save(&self, path: &Path) -> Result<(), OutputError> {
        tracing::info!(path = %path.display(), rows = self.rows(), "saving scores");
        let file = std::fs::File::create(path).map_err(|e| OutputError::Write {
            path: path.display().to_string(),
            source: e,
        })?;
        self.write_csv(file).map_err(|e| OutputError::Csv {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn parses_value_after_last_separator() {
        let r = report(&["(on egg1 plate1): boiledegg: 0.75", "omelette: 0.1"]);
        assert_eq!(goal_score("boiledegg", &r), Some(0.75));
        assert_eq!(goal_score("omelette", &r), Some(0.1));
        assert_eq!(goal_score("salad", &r), None);
    }

    #[test]
    fn non_numeric_maps_to_sentinel() {
        let r = report(&["boiledegg: NaN", "omelette: unknown"]);
        assert_eq!(goal_score("boiledegg", &r), Some(NON_NUMERIC));
        assert_eq!(goal_score("omelette", &r), Some(NON_NUMERIC));
    }

    #[test]
    fn malformed_line_is_skipped() {
        let r = report(&["boiledegg pending", "boiledegg: 0.5"]);
        assert_eq!(goal_score("boiledegg", &r), Some(0.5));
        assert_eq!(goal_score("boiledegg", &report(&["boiledegg"])), None);
    }

    #[test]
    fn every_goal_gets_one_entry_per_frame() {
        let mut acc = ScoreAccumulator::new(["boiledegg", "omelette"]);
        acc.record(0, &report(&[]));
        acc.record(1, &report(&["boiledegg: 0.5"]));
        acc.record(2, &report(&["boiledegg: 0.5", "omelette: 0.2"]));

        assert_eq!(acc.series("boiledegg").unwrap(), &[None, Some(0.5), Some(0.5)]);
        assert_eq!(acc.series("omelette").unwrap(), &[None, None, Some(0.2)]);
        assert!(acc.series("salad").is_none());
    }

    #[test]
    fn table_is_frames_by_goals() {
        let mut acc = ScoreAccumulator::new(["a", "b", "c"]);
        for frame in 0..5 {
            acc.record(frame, &report(&["b: 0.25"]));
        }
        let table = acc.into_table();
        assert_eq!(table.rows(), 5);
        assert_eq!(table.columns(), 3);
        assert_eq!(table.get(4, 1), Some(0.25));
        assert_eq!(table.get(4, 0), None);
        assert_eq!(table.get(9, 0), None);
    }

    #[test]
    fn csv_has_goal_header_and_empty_missing_cells() {
        let mut acc = ScoreAccumulator::new(["boiledegg", "omelette"]);
        acc.record(3, &report(&["boiledegg: 0.5"]));
        acc.record(4, &report(&["boiledegg: NaN", "omelette: 1"]));
        let mut buf = Vec::new();
        acc.into_table().write_csv(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "frame,boiledegg,omelette\n3,0.5,\n4,-1,1\n"
        );
    }

    #[test]
    fn no_goals_still_counts_frames() {
        let mut acc = ScoreAccumulator::new(Vec::<String>::new());
        acc.record(0, &[]);
        acc.record(1, &[]);
        let table = acc.into_table();
        assert_eq!(table.rows(), 2);
        assert_eq!(table.columns(), 0);
    }
}
