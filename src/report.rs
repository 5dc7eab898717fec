//! Text and JSON rendering of the change log.

use std::fmt::Write as _;

use serde::Serialize;

use ipwatch::changelog::{ObservationRecord, SeriesTable, TIMESTAMP_FORMAT, aggregate, newest_first};

/// Width of a rendered `%Y-%m-%d %H:%M:%S` timestamp.
const TIMESTAMP_WIDTH: usize = 19;

/// Column gap in text tables.
const GAP: &str = "  ";

/// Both views of the change log, as printed by `ipwatch show --json`.
#[derive(Debug, Serialize)]
pub struct Report {
    /// Records, most recent first.
    pub records: Vec<ObservationRecord>,
    /// Occurrences per timestamp and address.
    pub series: SeriesTable,
}

impl Report {
    /// Builds both views from records in file order.
    #[must_use]
    pub fn new(records: &[ObservationRecord]) -> Self {
        Self {
            records: newest_first(records),
            series: aggregate(records),
        }
    }

    /// Returns true if the log holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Renders the history table followed by the per-address table.
    #[must_use]
    pub fn to_text(&self) -> String {
        if self.is_empty() {
            return "No IP changes recorded.\n".to_string();
        }

        let mut out = String::new();
        out.push_str("IP history (most recent first)\n");
        let _ = writeln!(out, "{:<TIMESTAMP_WIDTH$}{GAP}ip", "timestamp");
        for record in &self.records {
            let _ = writeln!(
                out,
                "{}{GAP}{}",
                record.timestamp.format(TIMESTAMP_FORMAT),
                record.address
            );
        }

        out.push_str("\nObservations per address\n");
        let widths: Vec<usize> = self.series.addresses.iter().map(String::len).collect();
        let _ = write!(out, "{:<TIMESTAMP_WIDTH$}", "timestamp");
        for address in &self.series.addresses {
            let _ = write!(out, "{GAP}{address}");
        }
        out.push('\n');
        for row in &self.series.rows {
            let _ = write!(out, "{}", row.timestamp.format(TIMESTAMP_FORMAT));
            for (count, width) in row.counts.iter().zip(widths.iter().copied()) {
                let _ = write!(out, "{GAP}{count:>width$}");
            }
            out.push('\n');
        }

        out
    }

    /// Renders the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, m, 0)
            .unwrap()
    }

    fn sample() -> Vec<ObservationRecord> {
        vec![
            ObservationRecord::new(ts(0), "198.51.100.7"),
            ObservationRecord::new(ts(5), "203.0.113.5"),
            ObservationRecord::new(ts(9), "198.51.100.7"),
        ]
    }

    #[test]
    fn empty_log_renders_placeholder() {
        let report = Report::new(&[]);

        assert!(report.is_empty());
        assert_eq!(report.to_text(), "No IP changes recorded.\n");
    }

    #[test]
    fn history_is_most_recent_first() {
        let text = Report::new(&sample()).to_text();
        let history: Vec<&str> = text.lines().skip(2).take(3).collect();

        assert_eq!(
            history,
            vec![
                "2024-01-01 12:09:00  198.51.100.7",
                "2024-01-01 12:05:00  203.0.113.5",
                "2024-01-01 12:00:00  198.51.100.7",
            ]
        );
    }

    #[test]
    fn series_table_has_a_column_per_address() {
        let text = Report::new(&sample()).to_text();
        let series: Vec<&str> = text
            .lines()
            .skip_while(|line| !line.starts_with("Observations"))
            .skip(1)
            .collect();

        assert_eq!(
            series,
            vec![
                "timestamp            198.51.100.7  203.0.113.5",
                "2024-01-01 12:00:00             1            0",
                "2024-01-01 12:05:00             0            1",
                "2024-01-01 12:09:00             1            0",
            ]
        );
    }

    #[test]
    fn json_contains_both_views() {
        let json = Report::new(&sample()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["records"][0]["timestamp"], "2024-01-01 12:09:00");
        assert_eq!(value["records"][0]["address"], "198.51.100.7");
        assert_eq!(value["series"]["addresses"][1], "203.0.113.5");
        assert_eq!(value["series"]["rows"][1]["counts"], serde_json::json!([0, 1]));
    }
}
