// src/tables/mod.rs

mod load;

pub use load::{load_monthly_ridership, load_station_shares, DataLoadError};

use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Canonical form of a station key: surrounding whitespace stripped,
/// lowercased. Applied on both the load path and the query path so that
/// `"  BALDERAS "` and `"balderas"` resolve to the same row.
pub fn canonical_station(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// System-wide passenger totals, one entry per calendar month.
///
/// Months are opaque `YYYY-MM` string keys; the zero-padded format makes
/// lexical order chronological, and the `BTreeMap` keeps iteration in that
/// order. Built once at startup, never mutated afterwards.
#[derive(Debug)]
pub struct MonthlyRidership {
    totals: BTreeMap<String, f64>,
}

impl MonthlyRidership {
    /// Build the table from `(month, total)` rows. On a duplicate month the
    /// first occurrence wins and the duplicate is logged.
    pub fn new(rows: impl IntoIterator<Item = (String, f64)>) -> Self {
        let mut totals = BTreeMap::new();
        for (month, total) in rows {
            if totals.contains_key(&month) {
                warn!("duplicate month `{month}` in ridership table; keeping first row");
                continue;
            }
            totals.insert(month, total);
        }
        Self { totals }
    }

    /// Exact-string lookup; no normalization is applied to `month`.
    pub fn total_for(&self, month: &str) -> Option<f64> {
        self.totals.get(month).copied()
    }

    /// All `(month, total)` entries, ascending by month string.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.totals.iter().map(|(m, t)| (m.as_str(), *t))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// Per-station historical share of system-wide ridership, keyed by the
/// canonical (trimmed, lowercased) station name.
#[derive(Debug)]
pub struct StationShares {
    shares: HashMap<String, f64>,
}

impl StationShares {
    /// Build the table from `(station, proportion)` rows. Keys are
    /// canonicalized here, so callers may pass display-cased names. On a
    /// duplicate station the first occurrence wins.
    pub fn new(rows: impl IntoIterator<Item = (String, f64)>) -> Self {
        let mut shares = HashMap::new();
        for (station, proportion) in rows {
            let key = canonical_station(&station);
            if shares.contains_key(&key) {
                warn!("duplicate station `{key}` in shares table; keeping first row");
                continue;
            }
            shares.insert(key, proportion);
        }
        Self { shares }
    }

    /// Lookup by canonical key. Callers canonicalize query input first.
    pub fn proportion_for(&self, canonical: &str) -> Option<f64> {
        self.shares.get(canonical).copied()
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_station_trims_and_lowercases() {
        assert_eq!(canonical_station("  BALDERAS "), "balderas");
        assert_eq!(canonical_station("Pino Suárez"), "pino suárez");
        assert_eq!(canonical_station("balderas"), "balderas");
    }

    #[test]
    fn monthly_ridership_first_row_wins_on_duplicate() {
        let table = MonthlyRidership::new(vec![
            ("2026-01".to_string(), 1_000_000.0),
            ("2026-01".to_string(), 999.0),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.total_for("2026-01"), Some(1_000_000.0));
    }

    #[test]
    fn monthly_ridership_iterates_in_month_order() {
        let table = MonthlyRidership::new(vec![
            ("2026-03".to_string(), 3.0),
            ("2026-01".to_string(), 1.0),
            ("2026-02".to_string(), 2.0),
        ]);
        let months: Vec<&str> = table.iter().map(|(m, _)| m).collect();
        assert_eq!(months, vec!["2026-01", "2026-02", "2026-03"]);
    }

    #[test]
    fn station_shares_canonicalizes_keys_on_load() {
        let table = StationShares::new(vec![("  Balderas ".to_string(), 0.05)]);
        assert_eq!(table.proportion_for("balderas"), Some(0.05));
        assert_eq!(table.proportion_for("Balderas"), None);
    }

    #[test]
    fn station_shares_first_row_wins_on_duplicate() {
        let table = StationShares::new(vec![
            ("balderas".to_string(), 0.05),
            ("BALDERAS".to_string(), 0.09),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.proportion_for("balderas"), Some(0.05));
    }
}
