// src/engine/mod.rs
//
// The estimation engine: answers "how many passengers at station S in
// month M" from the two loaded tables, and projects a station's estimated
// ridership across every known month. No statistics here — the estimate is
// the month's system-wide total times the station's fixed historical share.

use crate::tables::{canonical_station, MonthlyRidership, StationShares};
use serde::Serialize;
use std::fmt;

/// Outcome of a single estimate query. `MissingInput` and `NotFound` are
/// routine user-input states, not faults: the first asks the caller to
/// complete the form, the second reports that one of the keys matched
/// nothing in the loaded data.
#[derive(Debug, Clone, PartialEq)]
pub enum Estimate {
    MissingInput,
    NotFound,
    Found {
        /// Truncated product of the month total and the station share.
        /// Always less than or equal to the exact product.
        passengers: u64,
        month: String,
        /// Station name in display (title) case.
        station: String,
    },
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Estimate::MissingInput => {
                write!(f, "Please provide both a month and a station.")
            }
            Estimate::NotFound => {
                write!(f, "No match for that month or station in the data.")
            }
            Estimate::Found {
                passengers,
                month,
                station,
            } => write!(
                f,
                "In {month}, an estimated {} passengers at {station}.",
                group_thousands(*passengers)
            ),
        }
    }
}

/// One point of a projected series: a month and the estimated ridership for
/// it. Kept as the exact (un-truncated) product so a charting consumer can
/// round or scale as it sees fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub month: String,
    pub estimated: f64,
}

/// Owns the two reference tables and answers queries against them. All
/// state is immutable after construction, so concurrent calls need no
/// synchronization.
pub struct Estimator {
    months: MonthlyRidership,
    shares: StationShares,
}

impl Estimator {
    pub fn new(months: MonthlyRidership, shares: StationShares) -> Self {
        Self { months, shares }
    }

    /// Estimate ridership for one `(month, station)` pair.
    ///
    /// The station is trimmed and lowercased before lookup. The month is
    /// looked up as-is: it must match the stored `YYYY-MM` string exactly
    /// (only the emptiness precondition uses a trimmed view of it).
    pub fn estimate(&self, month: &str, station: &str) -> Estimate {
        if month.trim().is_empty() || station.trim().is_empty() {
            return Estimate::MissingInput;
        }
        let station_key = canonical_station(station);

        let total = match self.months.total_for(month) {
            Some(t) => t,
            None => return Estimate::NotFound,
        };
        let proportion = match self.shares.proportion_for(&station_key) {
            Some(p) => p,
            None => return Estimate::NotFound,
        };

        // Truncation toward zero, matching the original integer cast.
        let passengers = (total * proportion) as u64;
        Estimate::Found {
            passengers,
            month: month.to_string(),
            station: title_case(&station_key),
        }
    }

    /// Project the station's estimated ridership across every known month,
    /// ascending by month string. An unknown or blank station yields an
    /// empty vector.
    pub fn project_series(&self, station: &str) -> Vec<SeriesPoint> {
        let station_key = canonical_station(station);
        let proportion = match self.shares.proportion_for(&station_key) {
            Some(p) => p,
            None => return Vec::new(),
        };
        self.months
            .iter()
            .map(|(month, total)| SeriesPoint {
                month: month.to_string(),
                estimated: total * proportion,
            })
            .collect()
    }

    /// Months known to the ridership table, ascending. Lets a front end
    /// constrain its month input to values that cannot `NotFound`.
    pub fn known_months(&self) -> Vec<&str> {
        self.months.iter().map(|(m, _)| m).collect()
    }
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest
/// ("pino suárez" → "Pino Suárez").
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alphabetic = false;
    for ch in s.chars() {
        if prev_alphabetic {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        prev_alphabetic = ch.is_alphabetic();
    }
    out
}

/// Group a count with comma thousands separators (60000 → "60,000").
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_estimator() -> Estimator {
        let months = MonthlyRidership::new(vec![
            ("2026-01".to_string(), 1_000_000.0),
            ("2026-02".to_string(), 1_200_000.0),
        ]);
        let shares = StationShares::new(vec![
            ("balderas".to_string(), 0.05),
            ("pino suárez".to_string(), 0.04),
        ]);
        Estimator::new(months, shares)
    }

    #[test]
    fn worked_example_from_the_source_data() {
        let estimator = sample_estimator();
        assert_eq!(
            estimator.estimate("2026-02", "Balderas"),
            Estimate::Found {
                passengers: 60_000,
                month: "2026-02".to_string(),
                station: "Balderas".to_string(),
            }
        );
    }

    #[test]
    fn empty_inputs_are_missing_input() {
        let estimator = sample_estimator();
        assert_eq!(estimator.estimate("", "Balderas"), Estimate::MissingInput);
        assert_eq!(estimator.estimate("2026-02", ""), Estimate::MissingInput);
        assert_eq!(estimator.estimate("   ", "  "), Estimate::MissingInput);
    }

    #[test]
    fn unknown_month_or_station_is_not_found() {
        let estimator = sample_estimator();
        assert_eq!(
            estimator.estimate("2099-12", "Balderas"),
            Estimate::NotFound
        );
        assert_eq!(
            estimator.estimate("2026-02", "nonexistent station"),
            Estimate::NotFound
        );
    }

    #[test]
    fn missing_input_and_not_found_are_distinct() {
        let estimator = sample_estimator();
        assert_ne!(
            estimator.estimate("", "Balderas"),
            estimator.estimate("2099-12", "Balderas")
        );
    }

    #[test]
    fn station_lookup_ignores_case_and_whitespace() {
        let estimator = sample_estimator();
        assert_eq!(
            estimator.estimate("2026-02", "  BALDERAS "),
            estimator.estimate("2026-02", "balderas")
        );
    }

    #[test]
    fn month_lookup_is_exact() {
        // The month key is not trimmed before lookup; it must match the
        // stored string exactly.
        let estimator = sample_estimator();
        assert_eq!(estimator.estimate(" 2026-02", "balderas"), Estimate::NotFound);
    }

    #[test]
    fn estimate_truncates_toward_zero() {
        let months = MonthlyRidership::new(vec![("2026-01".to_string(), 999_999.0)]);
        let shares = StationShares::new(vec![("balderas".to_string(), 0.0333)]);
        let estimator = Estimator::new(months, shares);
        // exact product is 33299.9667
        match estimator.estimate("2026-01", "balderas") {
            Estimate::Found { passengers, .. } => {
                assert_eq!(passengers, 33_299);
                assert!((passengers as f64) <= 999_999.0 * 0.0333);
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn series_covers_every_month_in_order() {
        let estimator = sample_estimator();
        let series = estimator.project_series("balderas");
        assert_eq!(
            series,
            vec![
                SeriesPoint {
                    month: "2026-01".to_string(),
                    estimated: 50_000.0,
                },
                SeriesPoint {
                    month: "2026-02".to_string(),
                    estimated: 60_000.0,
                },
            ]
        );
    }

    #[test]
    fn series_for_unknown_station_is_empty() {
        let estimator = sample_estimator();
        assert!(estimator.project_series("nowhere").is_empty());
        assert!(estimator.project_series("").is_empty());
    }

    #[test]
    fn series_matches_query_canonicalization() {
        let estimator = sample_estimator();
        assert_eq!(
            estimator.project_series("  BALDERAS "),
            estimator.project_series("balderas")
        );
    }

    #[test]
    fn known_months_are_ascending() {
        let estimator = sample_estimator();
        assert_eq!(estimator.known_months(), vec!["2026-01", "2026-02"]);
    }

    #[test]
    fn display_renders_user_facing_sentences() {
        let estimator = sample_estimator();
        assert_eq!(
            estimator.estimate("2026-02", "balderas").to_string(),
            "In 2026-02, an estimated 60,000 passengers at Balderas."
        );
        assert_eq!(
            Estimate::MissingInput.to_string(),
            "Please provide both a month and a station."
        );
        assert_eq!(
            Estimate::NotFound.to_string(),
            "No match for that month or station in the data."
        );
    }

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("balderas"), "Balderas");
        assert_eq!(title_case("pino suárez"), "Pino Suárez");
        assert_eq!(title_case("barranca del muerto"), "Barranca Del Muerto");
    }

    #[test]
    fn group_thousands_inserts_separators() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(60_000), "60,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
