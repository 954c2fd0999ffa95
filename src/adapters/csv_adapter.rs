//! CSV file data adapter.
//!
//! Reads intraday bars from `{symbol}.csv` under a base directory. Expected
//! columns: timestamp, open, high, low, close, volume, with timestamps in
//! `%Y-%m-%d %H:%M:%S` format.

use crate::domain::bar::{validate_series, Bar};
use crate::domain::error::GoldtrendError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDateTime;
use std::fs;
use std::path::PathBuf;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<Bar>, GoldtrendError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| GoldtrendError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| GoldtrendError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let ts_str = record.get(0).ok_or_else(|| GoldtrendError::Data {
                reason: "missing timestamp column".into(),
            })?;
            let timestamp =
                NaiveDateTime::parse_from_str(ts_str, TIMESTAMP_FORMAT).map_err(|e| {
                    GoldtrendError::Data {
                        reason: format!("invalid timestamp {:?}: {}", ts_str, e),
                    }
                })?;

            let field = |index: usize, name: &str| -> Result<f64, GoldtrendError> {
                record
                    .get(index)
                    .ok_or_else(|| GoldtrendError::Data {
                        reason: format!("missing {} column", name),
                    })?
                    .parse()
                    .map_err(|e| GoldtrendError::Data {
                        reason: format!("invalid {} value: {}", name, e),
                    })
            };

            let open = field(1, "open")?;
            let high = field(2, "high")?;
            let low = field(3, "low")?;
            let close = field(4, "close")?;

            let volume: i64 = record
                .get(5)
                .ok_or_else(|| GoldtrendError::Data {
                    reason: "missing volume column".into(),
                })?
                .parse()
                .map_err(|e| GoldtrendError::Data {
                    reason: format!("invalid volume value: {}", e),
                })?;

            bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        // No sorting: out-of-order rows are corrupted input and must fail
        // loudly, not be silently normalized.
        validate_series(&bars)?;
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Bar>, GoldtrendError> {
        let mut bars = self.read_all(symbol)?;
        bars.retain(|b| b.timestamp >= start && b.timestamp <= end);

        if bars.is_empty() {
            return Err(GoldtrendError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, GoldtrendError> {
        let bars = match self.read_all(symbol) {
            Ok(bars) => bars,
            Err(GoldtrendError::Data { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => {
                Ok(Some((first.timestamp, last.timestamp, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn setup_test_data() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "timestamp,open,high,low,close,volume\n\
            2024-01-15 00:00:00,2030.0,2035.0,2028.0,2033.0,5000\n\
            2024-01-15 01:00:00,2033.0,2040.0,2031.0,2038.0,6000\n\
            2024-01-15 02:00:00,2038.0,2042.0,2036.0,2040.0,5500\n";

        fs::write(path.join("XAUUSD.csv"), csv_content).unwrap();
        (dir, path)
    }

    #[test]
    fn fetch_bars_returns_parsed_rows() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_bars("XAUUSD", ts(15, 0), ts(15, 2)).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].timestamp, ts(15, 0));
        assert_eq!(bars[0].open, 2030.0);
        assert_eq!(bars[0].high, 2035.0);
        assert_eq!(bars[0].low, 2028.0);
        assert_eq!(bars[0].close, 2033.0);
        assert_eq!(bars[0].volume, 5000);
    }

    #[test]
    fn fetch_bars_filters_by_range() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_bars("XAUUSD", ts(15, 1), ts(15, 1)).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 2038.0);
    }

    #[test]
    fn empty_range_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let result = adapter.fetch_bars("XAUUSD", ts(20, 0), ts(21, 0));
        assert!(matches!(result, Err(GoldtrendError::NoData { .. })));
    }

    #[test]
    fn missing_file_is_data_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let result = adapter.fetch_bars("EURUSD", ts(15, 0), ts(15, 2));
        assert!(matches!(result, Err(GoldtrendError::Data { .. })));
    }

    #[test]
    fn malformed_row_is_data_error() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join("BAD.csv"),
            "timestamp,open,high,low,close,volume\n\
             2024-01-15 00:00:00,abc,2035.0,2028.0,2033.0,5000\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let result = adapter.fetch_bars("BAD", ts(15, 0), ts(15, 2));
        assert!(matches!(result, Err(GoldtrendError::Data { .. })));
    }

    #[test]
    fn duplicate_timestamps_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join("DUP.csv"),
            "timestamp,open,high,low,close,volume\n\
             2024-01-15 00:00:00,2030.0,2035.0,2028.0,2033.0,5000\n\
             2024-01-15 00:00:00,2033.0,2040.0,2031.0,2038.0,6000\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let result = adapter.fetch_bars("DUP", ts(15, 0), ts(15, 2));
        assert!(matches!(result, Err(GoldtrendError::InvalidSeries { .. })));
    }

    #[test]
    fn get_data_range_reports_bounds() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let range = adapter.get_data_range("XAUUSD").unwrap();
        assert_eq!(range, Some((ts(15, 0), ts(15, 2), 3)));
    }

    #[test]
    fn get_data_range_none_for_missing_symbol() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert_eq!(adapter.get_data_range("EURUSD").unwrap(), None);
    }

    #[test]
    fn out_of_order_rows_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join("UNSORTED.csv"),
            "timestamp,open,high,low,close,volume\n\
             2024-01-15 02:00:00,2038.0,2042.0,2036.0,2040.0,5500\n\
             2024-01-15 00:00:00,2030.0,2035.0,2028.0,2033.0,5000\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let result = adapter.fetch_bars("UNSORTED", ts(15, 0), ts(15, 2));
        assert!(matches!(result, Err(GoldtrendError::InvalidSeries { .. })));
    }
}
