//! Aggregation of the change history for time-series display.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::Serialize;

use super::ObservationRecord;
use super::record::serialize_timestamp;

/// Occurrence counts pivoted into one series per address.
///
/// Rows are distinct timestamps in ascending order; columns are distinct
/// addresses in lexical order. Every (timestamp, address) pair has a
/// count, zero when it was never observed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeriesTable {
    /// Column labels.
    pub addresses: Vec<String>,
    /// One row per distinct timestamp.
    pub rows: Vec<SeriesRow>,
}

/// A single timestamp row of a [`SeriesTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesRow {
    /// Row timestamp.
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    /// Counts aligned with [`SeriesTable::addresses`].
    pub counts: Vec<usize>,
}

impl SeriesTable {
    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the count for a pair, or `None` if either key is unknown.
    #[must_use]
    pub fn count(&self, timestamp: NaiveDateTime, address: &str) -> Option<usize> {
        let column = self.column(address)?;
        self.rows
            .iter()
            .find(|row| row.timestamp == timestamp)
            .map(|row| row.counts[column])
    }

    /// Returns the full series of one address, one point per row.
    #[must_use]
    pub fn series(&self, address: &str) -> Option<Vec<(NaiveDateTime, usize)>> {
        let column = self.column(address)?;
        Some(
            self.rows
                .iter()
                .map(|row| (row.timestamp, row.counts[column]))
                .collect(),
        )
    }

    fn column(&self, address: &str) -> Option<usize> {
        self.addresses.iter().position(|a| a == address)
    }
}

/// Groups records by (timestamp, address) and pivots them into series.
///
/// Duplicate pairs are counted, so a count may exceed one if the log
/// holds repeated lines.
#[must_use]
pub fn aggregate(records: &[ObservationRecord]) -> SeriesTable {
    let addresses: BTreeSet<&str> = records.iter().map(|r| r.address.as_str()).collect();
    let addresses: Vec<&str> = addresses.into_iter().collect();

    let mut grouped: BTreeMap<NaiveDateTime, Vec<usize>> = BTreeMap::new();
    for record in records {
        // Present by construction: `addresses` was built from these records.
        let Ok(column) = addresses.binary_search(&record.address.as_str()) else {
            continue;
        };
        grouped
            .entry(record.timestamp)
            .or_insert_with(|| vec![0; addresses.len()])[column] += 1;
    }

    SeriesTable {
        addresses: addresses.into_iter().map(str::to_string).collect(),
        rows: grouped
            .into_iter()
            .map(|(timestamp, counts)| SeriesRow { timestamp, counts })
            .collect(),
    }
}

/// Returns the records ordered most recent first.
///
/// Records sharing a timestamp keep reverse append order, so the latest
/// written line still comes first.
#[must_use]
pub fn newest_first(records: &[ObservationRecord]) -> Vec<ObservationRecord> {
    let mut sorted: Vec<_> = records.iter().rev().cloned().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, m, 0)
            .unwrap()
    }

    fn rec(m: u32, address: &str) -> ObservationRecord {
        ObservationRecord::new(ts(m), address)
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = aggregate(&[]);

        assert!(table.is_empty());
        assert!(table.addresses.is_empty());
    }

    #[test]
    fn pivots_one_series_per_address() {
        let records = [
            rec(0, "203.0.113.5"),
            rec(5, "203.0.113.9"),
            rec(10, "203.0.113.5"),
        ];

        let table = aggregate(&records);

        assert_eq!(table.addresses, vec!["203.0.113.5", "203.0.113.9"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(
            table.series("203.0.113.5").unwrap(),
            vec![(ts(0), 1), (ts(5), 0), (ts(10), 1)]
        );
        assert_eq!(
            table.series("203.0.113.9").unwrap(),
            vec![(ts(0), 0), (ts(5), 1), (ts(10), 0)]
        );
    }

    #[test]
    fn zero_fills_unobserved_pairs() {
        let table = aggregate(&[rec(0, "a"), rec(1, "b")]);

        assert_eq!(table.count(ts(0), "b"), Some(0));
        assert_eq!(table.count(ts(1), "a"), Some(0));
    }

    #[test]
    fn counts_duplicate_pairs() {
        let records = [rec(0, "a"), rec(0, "a"), rec(0, "b")];

        let table = aggregate(&records);

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.count(ts(0), "a"), Some(2));
        assert_eq!(table.count(ts(0), "b"), Some(1));
    }

    #[test]
    fn rows_are_sorted_by_timestamp() {
        let table = aggregate(&[rec(30, "a"), rec(10, "b"), rec(20, "a")]);

        let stamps: Vec<_> = table.rows.iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps, vec![ts(10), ts(20), ts(30)]);
    }

    #[test]
    fn unknown_keys_return_none() {
        let table = aggregate(&[rec(0, "a")]);

        assert_eq!(table.count(ts(0), "zzz"), None);
        assert_eq!(table.count(ts(59), "a"), None);
        assert!(table.series("zzz").is_none());
    }

    #[test]
    fn newest_first_orders_descending() {
        let records = [rec(0, "a"), rec(10, "b"), rec(5, "c")];

        let sorted = newest_first(&records);

        let stamps: Vec<_> = sorted.iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps, vec![ts(10), ts(5), ts(0)]);
    }

    #[test]
    fn newest_first_puts_later_line_first_on_ties() {
        let records = [rec(0, "first"), rec(0, "second")];

        let sorted = newest_first(&records);

        assert_eq!(sorted[0].address, "second");
        assert_eq!(sorted[1].address, "first");
    }

    #[test]
    fn table_serializes_with_text_timestamps() {
        let table = aggregate(&[rec(0, "a")]);
        let json = serde_json::to_value(&table).unwrap();

        assert_eq!(json["addresses"][0], "a");
        assert_eq!(json["rows"][0]["timestamp"], "2024-01-01 12:00:00");
        assert_eq!(json["rows"][0]["counts"][0], 1);
    }
}
