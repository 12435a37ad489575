//! Price table assembly.
//!
//! Turns per-ticker histories into one polars DataFrame: one f64 column per
//! ticker (input order) plus a `Date` string column acting as the row key.
//!
//! The date axis comes from the FIRST ticker's history and is applied to
//! every column by position. Nothing checks that the other tickers report
//! the same dates — that is the documented contract of the source data, and
//! silently "fixing" it would change observable output. Columns shorter than
//! the axis are padded with NaN, longer ones truncated, since a DataFrame
//! needs equal column lengths.

use crate::data::StockHistory;
use polars::prelude::*;
use std::fmt;
use thiserror::Error;

/// Name of the row-key column.
pub const DATE_COLUMN: &str = "Date";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("no ticker histories in response (missing or empty historicalStockList)")]
    EmptyHistory,

    #[error("no column for ticker '{0}'")]
    MissingColumn(String),

    #[error("dataframe error: {0}")]
    Polars(String),
}

/// Date-keyed table of closing prices, one column per ticker.
#[derive(Debug, Clone)]
pub struct PriceTable {
    frame: DataFrame,
    tickers: Vec<String>,
}

impl PriceTable {
    /// Build the table from fetched histories.
    ///
    /// Fails with [`TableError::EmptyHistory`] when the history list is empty
    /// — an empty table would render an empty dashboard, which is worse than
    /// failing loudly.
    pub fn from_histories(histories: &[StockHistory]) -> Result<Self, TableError> {
        let first = histories.first().ok_or(TableError::EmptyHistory)?;

        // Shared date axis, verbatim from the first ticker.
        let dates: Vec<String> = first.historical.iter().map(|bar| bar.date.clone()).collect();
        let rows = dates.len();

        let mut columns: Vec<Column> = Vec::with_capacity(histories.len() + 1);
        let mut tickers = Vec::with_capacity(histories.len());

        for history in histories {
            let mut closes: Vec<f64> = history
                .historical
                .iter()
                .take(rows)
                .map(|bar| bar.close)
                .collect();
            closes.resize(rows, f64::NAN);

            columns.push(Series::new(history.symbol.as_str().into(), closes).into_column());
            tickers.push(history.symbol.clone());
        }

        columns.push(Series::new(DATE_COLUMN.into(), dates).into_column());

        let frame = DataFrame::new(columns).map_err(|e| TableError::Polars(e.to_string()))?;
        Ok(Self { frame, tickers })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Ticker symbols in column order.
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Number of rows (length of the date axis).
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// The date axis as `YYYY-MM-DD` strings.
    pub fn dates(&self) -> Result<Vec<String>, TableError> {
        let column = self
            .frame
            .column(DATE_COLUMN)
            .map_err(|e| TableError::Polars(e.to_string()))?;
        let values = column
            .as_materialized_series()
            .str()
            .map_err(|e| TableError::Polars(e.to_string()))?;
        Ok(values
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect())
    }

    /// Closing prices for one ticker, positionally aligned to the date axis.
    pub fn closes(&self, ticker: &str) -> Result<Vec<f64>, TableError> {
        if !self.tickers.iter().any(|t| t == ticker) {
            return Err(TableError::MissingColumn(ticker.to_string()));
        }
        let column = self
            .frame
            .column(ticker)
            .map_err(|e| TableError::Polars(e.to_string()))?;
        let values = column
            .as_materialized_series()
            .f64()
            .map_err(|e| TableError::Polars(e.to_string()))?;
        Ok(values
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect())
    }
}

impl fmt::Display for PriceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DailyBar, StockHistory};

    fn bar(date: &str, close: f64) -> DailyBar {
        DailyBar {
            date: date.to_string(),
            close,
        }
    }

    fn fixture() -> Vec<StockHistory> {
        vec![
            StockHistory {
                symbol: "JPM".into(),
                historical: vec![
                    bar("2024-01-05", 171.2),
                    bar("2024-01-04", 170.5),
                    bar("2024-01-03", 169.8),
                    bar("2024-01-02", 168.9),
                    bar("2024-01-01", 168.0),
                ],
            },
            StockHistory {
                symbol: "BAC".into(),
                historical: vec![
                    bar("2024-01-05", 33.4),
                    bar("2024-01-04", 33.1),
                    bar("2024-01-03", 32.9),
                    bar("2024-01-02", 32.7),
                    bar("2024-01-01", 32.5),
                ],
            },
            StockHistory {
                symbol: "GS".into(),
                historical: vec![
                    bar("2024-01-05", 385.0),
                    bar("2024-01-04", 383.3),
                    bar("2024-01-03", 381.9),
                    bar("2024-01-02", 380.2),
                    bar("2024-01-01", 379.5),
                ],
            },
        ]
    }

    #[test]
    fn three_tickers_five_dates_gives_expected_shape() {
        let table = PriceTable::from_histories(&fixture()).unwrap();
        assert_eq!(table.height(), 5);
        assert_eq!(table.tickers(), &["JPM", "BAC", "GS"]);
        // Three value columns plus the Date key
        assert_eq!(table.frame().width(), 4);
    }

    #[test]
    fn column_order_matches_input_and_date_is_last() {
        let table = PriceTable::from_histories(&fixture()).unwrap();
        let names: Vec<String> = table
            .frame()
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["JPM", "BAC", "GS", "Date"]);
    }

    #[test]
    fn cell_values_match_the_fixture_exactly() {
        let table = PriceTable::from_histories(&fixture()).unwrap();
        assert_eq!(
            table.closes("JPM").unwrap(),
            vec![171.2, 170.5, 169.8, 168.9, 168.0]
        );
        assert_eq!(
            table.closes("BAC").unwrap(),
            vec![33.4, 33.1, 32.9, 32.7, 32.5]
        );
    }

    #[test]
    fn date_axis_is_first_ticker_sequence_verbatim() {
        let table = PriceTable::from_histories(&fixture()).unwrap();
        assert_eq!(
            table.dates().unwrap(),
            vec![
                "2024-01-05",
                "2024-01-04",
                "2024-01-03",
                "2024-01-02",
                "2024-01-01"
            ]
        );
    }

    #[test]
    fn divergent_dates_are_not_validated() {
        // Second ticker reports different dates; the first ticker's axis
        // still wins and values align by position.
        let histories = vec![
            StockHistory {
                symbol: "JPM".into(),
                historical: vec![bar("2024-01-03", 170.0), bar("2024-01-02", 169.0)],
            },
            StockHistory {
                symbol: "BAC".into(),
                historical: vec![bar("2023-06-01", 30.0), bar("2023-05-31", 29.5)],
            },
        ];

        let table = PriceTable::from_histories(&histories).unwrap();
        assert_eq!(table.dates().unwrap(), vec!["2024-01-03", "2024-01-02"]);
        assert_eq!(table.closes("BAC").unwrap(), vec![30.0, 29.5]);
    }

    #[test]
    fn shorter_history_is_nan_padded_longer_is_truncated() {
        let histories = vec![
            StockHistory {
                symbol: "JPM".into(),
                historical: vec![
                    bar("2024-01-03", 170.0),
                    bar("2024-01-02", 169.0),
                    bar("2024-01-01", 168.0),
                ],
            },
            StockHistory {
                symbol: "BAC".into(),
                historical: vec![bar("2024-01-03", 33.0)],
            },
            StockHistory {
                symbol: "GS".into(),
                historical: vec![
                    bar("2024-01-03", 385.0),
                    bar("2024-01-02", 383.0),
                    bar("2024-01-01", 381.0),
                    bar("2023-12-29", 379.0),
                ],
            },
        ];

        let table = PriceTable::from_histories(&histories).unwrap();
        assert_eq!(table.height(), 3);

        let bac = table.closes("BAC").unwrap();
        assert_eq!(bac[0], 33.0);
        assert!(bac[1].is_nan());
        assert!(bac[2].is_nan());

        let gs = table.closes("GS").unwrap();
        assert_eq!(gs, vec![385.0, 383.0, 381.0]);
    }

    #[test]
    fn empty_history_list_fails_deterministically() {
        let result = PriceTable::from_histories(&[]);
        assert!(matches!(result, Err(TableError::EmptyHistory)));
    }

    #[test]
    fn unknown_ticker_lookup_is_an_error() {
        let table = PriceTable::from_histories(&fixture()).unwrap();
        let result = table.closes("WFC");
        assert!(matches!(result, Err(TableError::MissingColumn(t)) if t == "WFC"));
    }
}
