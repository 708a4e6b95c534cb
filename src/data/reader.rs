//! Read path for the daily record tables
//!
//! [`DataReader::get_data`] never fails from the caller's point of view:
//! invalid input, connection and execution failures are logged and answered
//! with an empty [`DataFrame`]. [`DataReader::try_get_data`] is the same read
//! with the error kept.

use crate::config::Config;
use crate::data::query::SelectQuery;
use crate::db::Database;
use crate::error::{Result, StoreError};
use crate::schema::{ColumnKind, RecordShape};
use crate::types::{DateRange, EntityType, SymbolSelector};
use chrono::NaiveDate;
use polars::prelude::*;
use rusqlite::{params_from_iter, Row};

/// Per-column accumulator for query results
enum ColumnBuffer {
    Text(Vec<Option<String>>),
    Date(Vec<Option<NaiveDate>>),
    Float(Vec<Option<f64>>),
}

impl ColumnBuffer {
    fn for_kind(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Text => ColumnBuffer::Text(Vec::new()),
            ColumnKind::Date => ColumnBuffer::Date(Vec::new()),
            ColumnKind::Float => ColumnBuffer::Float(Vec::new()),
        }
    }

    fn push(&mut self, row: &Row<'_>, idx: usize) -> rusqlite::Result<()> {
        match self {
            ColumnBuffer::Text(values) => values.push(row.get(idx)?),
            ColumnBuffer::Date(values) => values.push(row.get(idx)?),
            ColumnBuffer::Float(values) => values.push(row.get(idx)?),
        }
        Ok(())
    }

    fn into_series(self, name: &str) -> Series {
        match self {
            ColumnBuffer::Text(values) => Series::new(name, values),
            ColumnBuffer::Date(values) => Series::new(name, values),
            ColumnBuffer::Float(values) => Series::new(name, values),
        }
    }
}

/// Reads stock, index and concept-board bars
#[derive(Debug, Clone)]
pub struct DataReader {
    db: Database,
}

impl DataReader {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Build a reader for the configured database URL
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Database::from_url(&config.database_url)?))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Read rows of `entity_type` for `symbol` between `start_date` and
    /// `end_date` inclusive.
    ///
    /// `symbol` may be `"all"`, a single symbol, or a list of symbols. Dates
    /// are `YYYY-MM-DD` or `YYYYMMDD`. Returns an empty frame when nothing
    /// matches or anything goes wrong; the cause is logged.
    pub fn get_data(
        &self,
        entity_type: &str,
        symbol: impl Into<SymbolSelector>,
        start_date: &str,
        end_date: &str,
    ) -> DataFrame {
        match self.try_get_data(entity_type, symbol, start_date, end_date) {
            Ok(df) => df,
            Err(StoreError::InvalidEntityType(tag)) => {
                log::error!("Invalid data type: {}", tag);
                DataFrame::empty()
            }
            Err(e) => {
                log::error!("Failed to read data: {}", e);
                DataFrame::empty()
            }
        }
    }

    /// Same read as [`get_data`](Self::get_data), keeping the error.
    ///
    /// A query that matches nothing is `Ok` with a zero-row frame carrying
    /// the shape's columns.
    pub fn try_get_data(
        &self,
        entity_type: &str,
        symbol: impl Into<SymbolSelector>,
        start_date: &str,
        end_date: &str,
    ) -> Result<DataFrame> {
        let entity: EntityType = entity_type.parse()?;
        let selector = symbol.into();
        let range = DateRange::parse(start_date, end_date)?;

        let df = self.read(entity, &selector, &range)?;
        if df.height() == 0 {
            log::info!(
                "No {} data for {} between {} and {}",
                entity,
                selector,
                range.start,
                range.end
            );
        }
        Ok(df)
    }

    /// Typed read path
    pub fn read(
        &self,
        entity: EntityType,
        selector: &SymbolSelector,
        range: &DateRange,
    ) -> Result<DataFrame> {
        let shape = RecordShape::for_entity(entity);
        let query = SelectQuery::new(shape, selector, range);

        let mut session = self.db.session()?;
        let tx = session.read_transaction()?;

        match selector {
            SymbolSelector::All => {
                log::info!("Running full query over {}", shape.table);
                let count: i64 = tx
                    .query_row(&query.count_sql(), params_from_iter(query.params()), |row| {
                        row.get(0)
                    })
                    .map_err(|e| StoreError::DatabaseError(format!("Failed to count rows: {}", e)))?;
                log::info!("Rows in date range: {}", count);
            }
            SymbolSelector::Many(symbols) => {
                log::info!("Querying symbol list: {} symbols", symbols.len());
            }
            SymbolSelector::One(symbol) => {
                log::info!("Querying single symbol: {}", symbol);
            }
        }

        log::debug!("Executing SQL: {}", query);

        let mut buffers: Vec<ColumnBuffer> = shape
            .columns
            .iter()
            .map(|c| ColumnBuffer::for_kind(c.kind))
            .collect();

        let mut stmt = tx
            .prepare(&query.sql())
            .map_err(|e| StoreError::DatabaseError(format!("Failed to prepare query: {}", e)))?;
        let mut rows = stmt
            .query(params_from_iter(query.params()))
            .map_err(|e| StoreError::DatabaseError(format!("Failed to execute query: {}", e)))?;

        while let Some(row) = rows
            .next()
            .map_err(|e| StoreError::DatabaseError(format!("Failed to fetch row: {}", e)))?
        {
            for (idx, buffer) in buffers.iter_mut().enumerate() {
                buffer.push(row, idx).map_err(|e| {
                    StoreError::DatabaseError(format!(
                        "Failed to decode column {}: {}",
                        shape.columns[idx].name, e
                    ))
                })?;
            }
        }

        let series: Vec<Series> = buffers
            .into_iter()
            .zip(shape.columns)
            .map(|(buffer, column)| buffer.into_series(column.name))
            .collect();
        let df = DataFrame::new(series)?;

        log::info!("Query returned {} rows", df.height());
        Ok(df)
    }
}
