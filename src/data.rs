//! Query construction and the read path

pub mod query;
pub mod reader;

pub use query::SelectQuery;
pub use reader::DataReader;
