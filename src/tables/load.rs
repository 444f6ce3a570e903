// src/tables/load.rs
//
// CSV loading and normalization for the two reference tables. Both loads
// happen once at startup; any malformed input is a `DataLoadError`, which
// the caller treats as fatal.

use super::{MonthlyRidership, StationShares};
use csv::StringRecord;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

// Header aliases accepted for each column. The production pipeline emits
// Spanish headers; English names are accepted for locally built fixtures.
const MONTH_COLUMNS: &[&str] = &["Mes", "month"];
const TOTAL_COLUMNS: &[&str] = &["Pasajeros_Totales", "total_passengers"];
const STATION_COLUMNS: &[&str] = &["Estacion", "station_name"];
const PROPORTION_COLUMNS: &[&str] = &["Proporcion_Promedio", "average_proportion"];

/// Fatal table-loading errors. The engine must not start serving queries
/// without both tables fully loaded and valid.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: required column `{column}` not found (headers: {headers:?})", path.display())]
    MissingColumn {
        path: PathBuf,
        column: &'static str,
        headers: Vec<String>,
    },

    #[error("{} line {line}: invalid value {value:?} for `{column}`", path.display())]
    InvalidValue {
        path: PathBuf,
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("{}: no data rows", path.display())]
    Empty { path: PathBuf },
}

/// Load the monthly system-wide ridership table. Months are kept as trimmed
/// strings in their source `YYYY-MM` form; totals must parse as
/// non-negative numbers.
pub fn load_monthly_ridership(path: impl AsRef<Path>) -> Result<MonthlyRidership, DataLoadError> {
    let path = path.as_ref();
    let mut reader = open_csv(path)?;
    let headers = read_headers(&mut reader, path)?;
    let month_idx = resolve_column(&headers, MONTH_COLUMNS, path)?;
    let total_idx = resolve_column(&headers, TOTAL_COLUMNS, path)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let line = i + 2; // data starts on the line after the header
        let record = record.map_err(|source| DataLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let month = field(&record, month_idx);
        if month.is_empty() {
            return Err(invalid(path, line, MONTH_COLUMNS[0], month));
        }
        let total = parse_number(&record, total_idx, path, line, TOTAL_COLUMNS[0])?;
        if total < 0.0 {
            return Err(invalid(path, line, TOTAL_COLUMNS[0], field(&record, total_idx)));
        }
        rows.push((month.to_string(), total));
    }
    if rows.is_empty() {
        return Err(DataLoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    debug!("loaded {} monthly ridership rows from {}", rows.len(), path.display());
    Ok(MonthlyRidership::new(rows))
}

/// Load the per-station share table. Station names are canonicalized by
/// `StationShares::new`; proportions must be in `[0, 1]`.
pub fn load_station_shares(path: impl AsRef<Path>) -> Result<StationShares, DataLoadError> {
    let path = path.as_ref();
    let mut reader = open_csv(path)?;
    let headers = read_headers(&mut reader, path)?;
    let station_idx = resolve_column(&headers, STATION_COLUMNS, path)?;
    let proportion_idx = resolve_column(&headers, PROPORTION_COLUMNS, path)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let line = i + 2;
        let record = record.map_err(|source| DataLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let station = field(&record, station_idx);
        if station.is_empty() {
            return Err(invalid(path, line, STATION_COLUMNS[0], station));
        }
        let proportion = parse_number(&record, proportion_idx, path, line, PROPORTION_COLUMNS[0])?;
        if !(0.0..=1.0).contains(&proportion) {
            return Err(invalid(
                path,
                line,
                PROPORTION_COLUMNS[0],
                field(&record, proportion_idx),
            ));
        }
        rows.push((station.to_string(), proportion));
    }
    if rows.is_empty() {
        return Err(DataLoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    debug!("loaded {} station share rows from {}", rows.len(), path.display());
    Ok(StationShares::new(rows))
}

fn open_csv(path: &Path) -> Result<csv::Reader<File>, DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file))
}

fn read_headers(
    reader: &mut csv::Reader<File>,
    path: &Path,
) -> Result<StringRecord, DataLoadError> {
    reader
        .headers()
        .map(|h| h.clone())
        .map_err(|source| DataLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Find the index of the first header matching any accepted alias,
/// case-insensitively.
fn resolve_column(
    headers: &StringRecord,
    aliases: &'static [&'static str],
    path: &Path,
) -> Result<usize, DataLoadError> {
    headers
        .iter()
        .position(|h| aliases.iter().any(|a| h.eq_ignore_ascii_case(a)))
        .ok_or_else(|| DataLoadError::MissingColumn {
            path: path.to_path_buf(),
            column: aliases[0],
            headers: headers.iter().map(str::to_string).collect(),
        })
}

fn field<'r>(record: &'r StringRecord, idx: usize) -> &'r str {
    record.get(idx).unwrap_or("")
}

fn parse_number(
    record: &StringRecord,
    idx: usize,
    path: &Path,
    line: usize,
    column: &'static str,
) -> Result<f64, DataLoadError> {
    let raw = field(record, idx);
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(invalid(path, line, column, raw)),
    }
}

fn invalid(path: &Path, line: usize, column: &'static str, value: &str) -> DataLoadError {
    DataLoadError::InvalidValue {
        path: path.to_path_buf(),
        line,
        column,
        value: value.to_string(),
    }
}
