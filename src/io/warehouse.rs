//! DuckDB warehouse.
//!
//! Tables live under schema `bronze` and are created on open if absent.
//! Warehouse sinks take row-level inserts inside one transaction per run;
//! destructive rewrites happen only where a job explicitly asks for a full
//! reload (the fuel-price table, where synthesized rows must yield to real
//! observations, and the currency table, which mirrors its sheet sink).

use std::path::Path;

use chrono::NaiveDate;
use duckdb::Connection;

use crate::config::WarehouseConfig;
use crate::domain::{AnalysisRow, FieldValue, Series};
use crate::error::AppError;

const DDL: &str = "
CREATE SCHEMA IF NOT EXISTS bronze;
CREATE TABLE IF NOT EXISTS bronze.gulf (
    sales_date DATE,
    super DOUBLE,
    premium DOUBLE,
    g_force_regular DOUBLE,
    regular DOUBLE
);
CREATE TABLE IF NOT EXISTS bronze.brent_oil (
    trade_date DATE,
    price DOUBLE,
    open DOUBLE,
    high DOUBLE,
    low DOUBLE,
    vol VARCHAR,
    change_pct DOUBLE
);
CREATE TABLE IF NOT EXISTS bronze.currency_rates (
    trade_date DATE,
    rate DOUBLE
);
";

pub struct Warehouse {
    conn: Connection,
}

fn db_err(context: &str) -> impl Fn(duckdb::Error) -> AppError + '_ {
    move |e| AppError::persist(format!("{context}: {e}"))
}

fn number_at(record_values: &[FieldValue], index: usize) -> Option<f64> {
    record_values.get(index).and_then(FieldValue::as_number)
}

impl Warehouse {
    pub fn open(config: &WarehouseConfig) -> Result<Self, AppError> {
        let conn = Connection::open(&config.database).map_err(|e| {
            AppError::persist(format!(
                "Failed to open warehouse '{}': {e}",
                config.database.display()
            ))
        })?;
        conn.execute_batch(DDL)
            .map_err(db_err("Failed to create warehouse schema"))?;
        Ok(Self { conn })
    }

    /// Full reload of `bronze.gulf` from a dense fuel-price series.
    ///
    /// Truncate-and-reload on purpose: the series contains synthesized rows,
    /// and the next scrape's real observations must replace them.
    pub fn replace_gulf(&mut self, series: &Series) -> Result<usize, AppError> {
        let tx = self
            .conn
            .transaction()
            .map_err(db_err("Failed to start transaction"))?;
        tx.execute("DELETE FROM bronze.gulf", [])
            .map_err(db_err("Failed to clear bronze.gulf"))?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO bronze.gulf \
                     (sales_date, super, premium, g_force_regular, regular) \
                     VALUES (CAST(? AS DATE), ?, ?, ?, ?)",
                )
                .map_err(db_err("Failed to prepare bronze.gulf insert"))?;
            for record in &series.records {
                stmt.execute(duckdb::params![
                    record.date.to_string(),
                    number_at(&record.values, 0),
                    number_at(&record.values, 1),
                    number_at(&record.values, 2),
                    number_at(&record.values, 3),
                ])
                .map_err(db_err("Failed to insert into bronze.gulf"))?;
            }
        }
        tx.commit().map_err(db_err("Failed to commit bronze.gulf"))?;
        Ok(series.records.len())
    }

    /// Reload `bronze.currency_rates` so the table mirrors the sheet sink.
    pub fn replace_currency_rates(&mut self, series: &Series) -> Result<usize, AppError> {
        let tx = self
            .conn
            .transaction()
            .map_err(db_err("Failed to start transaction"))?;
        tx.execute("DELETE FROM bronze.currency_rates", [])
            .map_err(db_err("Failed to clear bronze.currency_rates"))?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO bronze.currency_rates (trade_date, rate) \
                     VALUES (CAST(? AS DATE), ?)",
                )
                .map_err(db_err("Failed to prepare bronze.currency_rates insert"))?;
            for record in &series.records {
                stmt.execute(duckdb::params![
                    record.date.to_string(),
                    number_at(&record.values, 0),
                ])
                .map_err(db_err("Failed to insert into bronze.currency_rates"))?;
            }
        }
        tx.commit()
            .map_err(db_err("Failed to commit bronze.currency_rates"))?;
        Ok(series.records.len())
    }

    /// The warehouse load routine for Brent oil: reload `bronze.brent_oil`
    /// from the CSV sink in one transaction.
    pub fn load_brent_oil(&mut self, csv_path: &Path) -> Result<usize, AppError> {
        let path_literal = csv_path.to_string_lossy().replace('\'', "''");
        let tx = self
            .conn
            .transaction()
            .map_err(db_err("Failed to start transaction"))?;
        tx.execute("DELETE FROM bronze.brent_oil", [])
            .map_err(db_err("Failed to clear bronze.brent_oil"))?;
        let inserted = tx
            .execute(
                &format!(
                    // TRY_CAST: empty cells are missing values, not zeros.
                    "INSERT INTO bronze.brent_oil \
                     SELECT CAST(\"Date\" AS DATE), \
                            TRY_CAST(\"Price\" AS DOUBLE), \
                            TRY_CAST(\"Open\" AS DOUBLE), \
                            TRY_CAST(\"High\" AS DOUBLE), \
                            TRY_CAST(\"Low\" AS DOUBLE), \
                            CAST(\"Vol.\" AS VARCHAR), \
                            TRY_CAST(\"Change %\" AS DOUBLE) \
                     FROM read_csv('{path_literal}', header = true, all_varchar = true)"
                ),
                [],
            )
            .map_err(db_err("Failed to load bronze.brent_oil from CSV"))?;
        tx.commit()
            .map_err(db_err("Failed to commit bronze.brent_oil"))?;
        Ok(inserted)
    }

    /// The analysis join: fuel price against same-day oil price and currency
    /// rate, restricted to days with an oil observation.
    pub fn analysis_rows(&self) -> Result<Vec<AnalysisRow>, AppError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT CAST(g.sales_date AS VARCHAR), g.premium, bo.price, cr.rate \
                 FROM bronze.gulf g \
                 LEFT JOIN bronze.brent_oil bo ON bo.trade_date = g.sales_date \
                 LEFT JOIN bronze.currency_rates cr ON cr.trade_date = g.sales_date \
                 WHERE bo.price IS NOT NULL \
                 ORDER BY g.sales_date",
            )
            .map_err(db_err("Failed to prepare analysis query"))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<f64>>(1)?,
                    row.get::<_, Option<f64>>(2)?,
                    row.get::<_, Option<f64>>(3)?,
                ))
            })
            .map_err(db_err("Failed to run analysis query"))?;

        let mut out = Vec::new();
        for row in rows {
            let (date_text, fuel, oil, rate) =
                row.map_err(db_err("Failed to read analysis row"))?;
            let date = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d").map_err(|e| {
                AppError::persist(format!("Invalid date '{date_text}' in warehouse: {e}"))
            })?;
            out.push(AnalysisRow {
                date,
                fuel,
                oil,
                rate,
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeSeriesRecord;
    use crate::io::csv_sink;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn warehouse(dir: &tempfile::TempDir) -> Warehouse {
        Warehouse::open(&WarehouseConfig {
            database: dir.path().join("test.duckdb"),
        })
        .unwrap()
    }

    fn gulf_series(rows: &[(NaiveDate, f64)]) -> Series {
        Series {
            columns: ["Super", "Premium", "G-Force Regular", "Regular"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            records: rows
                .iter()
                .map(|&(d, premium)| TimeSeriesRecord {
                    date: d,
                    values: vec![
                        FieldValue::Number(premium + 0.1),
                        FieldValue::Number(premium),
                        FieldValue::Missing(crate::domain::MissingReason::Empty),
                        FieldValue::Number(premium - 0.2),
                    ],
                })
                .collect(),
        }
    }

    #[test]
    fn replace_gulf_is_a_full_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut wh = warehouse(&dir);

        wh.replace_gulf(&gulf_series(&[(date(2024, 1, 2), 2.95)]))
            .unwrap();
        let n = wh
            .replace_gulf(&gulf_series(&[
                (date(2024, 1, 2), 2.95),
                (date(2024, 1, 3), 3.00),
            ]))
            .unwrap();
        assert_eq!(n, 2);

        // Second reload replaced, not appended.
        let count: i64 = wh
            .conn
            .query_row("SELECT count(*) FROM bronze.gulf", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn analysis_join_matches_same_day_observations() {
        let dir = tempfile::tempdir().unwrap();
        let mut wh = warehouse(&dir);

        wh.replace_gulf(&gulf_series(&[
            (date(2024, 1, 2), 2.95),
            (date(2024, 1, 3), 3.00),
        ]))
        .unwrap();
        wh.replace_currency_rates(&Series {
            columns: vec!["rate".to_string()],
            records: vec![TimeSeriesRecord {
                date: date(2024, 1, 2),
                values: vec![FieldValue::Number(2.70)],
            }],
        })
        .unwrap();

        // Oil CSV for one of the two fuel days.
        let csv_path = dir.path().join("brent.csv");
        let oil = Series {
            columns: ["Price", "Open", "High", "Low", "Vol.", "Change %"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            records: vec![TimeSeriesRecord {
                date: date(2024, 1, 2),
                values: vec![
                    FieldValue::Number(76.24),
                    FieldValue::Number(76.0),
                    FieldValue::Number(76.5),
                    FieldValue::Number(75.8),
                    FieldValue::Text("278.40K".to_string()),
                    FieldValue::Number(0.35),
                ],
            }],
        };
        csv_sink::write_sink(&csv_path, &oil, "%Y-%m-%d").unwrap();
        let loaded = wh.load_brent_oil(&csv_path).unwrap();
        assert_eq!(loaded, 1);

        let rows = wh.analysis_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, date(2024, 1, 2));
        assert_eq!(rows[0].fuel, Some(2.95));
        assert_eq!(rows[0].oil, Some(76.24));
        assert_eq!(rows[0].rate, Some(2.70));
    }

    #[test]
    fn missing_numeric_fields_persist_as_null_not_zero() {
        let dir = tempfile::tempdir().unwrap();
        let mut wh = warehouse(&dir);
        wh.replace_gulf(&gulf_series(&[(date(2024, 1, 2), 2.95)]))
            .unwrap();

        let g_force: Option<f64> = wh
            .conn
            .query_row(
                "SELECT g_force_regular FROM bronze.gulf",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(g_force, None);
    }
}
