//! # market_db
//!
//! Read access to daily stock, index and concept-board bars kept in a
//! SQLite store. Each table is keyed by `(symbol, date)`; reads filter by
//! entity type, symbol selector and an inclusive date range and come back as
//! a polars `DataFrame`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use market_db::prelude::*;
//!
//! let reader = DataReader::new(Database::from_path("market.db"));
//!
//! // Every stock between two dates
//! let all = reader.get_data("stock", "all", "2024-01-01", "2024-03-31");
//!
//! // A handful of symbols
//! let some = reader.get_data("stock", vec!["600519", "000001"], "20240101", "20240331");
//!
//! // One index
//! let csi300 = reader.get_data("index", "000300", "2024-01-01", "2024-03-31");
//! # let _ = (all, some, csi300);
//! ```

pub mod config;
pub mod data;
pub mod db;
pub mod error;
pub mod schema;
pub mod types;

pub mod prelude {
    //! Commonly used types
    pub use crate::config::Config;
    pub use crate::data::{DataReader, SelectQuery};
    pub use crate::db::Database;
    pub use crate::error::{Result, StoreError};
    pub use crate::schema::RecordShape;
    pub use crate::types::{DateRange, EntityType, SymbolSelector};
}
