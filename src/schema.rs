//! Table definitions for the daily record shapes
//!
//! Every shape is keyed by `(symbol, date)`. Dates are stored as ISO
//! `YYYY-MM-DD` text, prices and volumes as nullable `REAL`.

use crate::types::EntityType;

/// Storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Date,
    Float,
}

impl ColumnKind {
    fn sql_type(&self) -> &'static str {
        match self {
            ColumnKind::Text => "TEXT",
            ColumnKind::Date => "DATE",
            ColumnKind::Float => "REAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
}

const fn key(name: &'static str, kind: ColumnKind) -> ColumnDef {
    ColumnDef { name, kind, nullable: false }
}

const fn field(name: &'static str, kind: ColumnKind) -> ColumnDef {
    ColumnDef { name, kind, nullable: true }
}

/// Column set and primary key of one table
#[derive(Debug, PartialEq, Eq)]
pub struct RecordShape {
    pub table: &'static str,
    pub columns: &'static [ColumnDef],
}

/// Columns forming the composite primary key
pub const PRIMARY_KEY: [&str; 2] = ["symbol", "date"];

const STOCK_COLUMNS: &[ColumnDef] = &[
    key("symbol", ColumnKind::Text),
    key("date", ColumnKind::Date),
    field("open", ColumnKind::Float),
    field("close", ColumnKind::Float),
    field("high", ColumnKind::Float),
    field("low", ColumnKind::Float),
    field("volume", ColumnKind::Float),
    field("amount", ColumnKind::Float),
    field("outstanding_share", ColumnKind::Float),
    field("turnover", ColumnKind::Float),
];

pub static STOCK_DAILY: RecordShape = RecordShape {
    table: "stock_daily_data",
    columns: STOCK_COLUMNS,
};

/// Same layout as [`STOCK_DAILY`], holding the 2020-2025 snapshot
pub static STOCK_TEMP: RecordShape = RecordShape {
    table: "stock_data_20_25",
    columns: STOCK_COLUMNS,
};

pub static INDEX_DAILY: RecordShape = RecordShape {
    table: "index_daily_data",
    columns: &[
        key("symbol", ColumnKind::Text),
        key("date", ColumnKind::Date),
        field("name", ColumnKind::Text),
        field("open", ColumnKind::Float),
        field("close", ColumnKind::Float),
        field("high", ColumnKind::Float),
        field("low", ColumnKind::Float),
        field("volume", ColumnKind::Float),
        field("amount", ColumnKind::Float),
    ],
};

pub static CONCEPT_BOARD: RecordShape = RecordShape {
    table: "concept_board_data",
    columns: &[
        key("symbol", ColumnKind::Text),
        key("date", ColumnKind::Date),
        field("name", ColumnKind::Text),
        field("open", ColumnKind::Float),
        field("close", ColumnKind::Float),
        field("high", ColumnKind::Float),
        field("low", ColumnKind::Float),
        field("volume", ColumnKind::Float),
        field("amount", ColumnKind::Float),
        field("turnover", ColumnKind::Float),
    ],
};

impl RecordShape {
    /// Resolve the shape backing an entity type
    pub fn for_entity(entity: EntityType) -> &'static RecordShape {
        match entity {
            EntityType::Stock => &STOCK_DAILY,
            EntityType::Index => &INDEX_DAILY,
            EntityType::Concept => &CONCEPT_BOARD,
            EntityType::Temp => &STOCK_TEMP,
        }
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// DDL creating the table when it does not exist yet
    pub fn create_table_sql(&self) -> String {
        let mut defs: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                if c.nullable {
                    format!("{} {}", c.name, c.kind.sql_type())
                } else {
                    format!("{} {} NOT NULL", c.name, c.kind.sql_type())
                }
            })
            .collect();
        defs.push(format!("PRIMARY KEY ({})", PRIMARY_KEY.join(", ")));

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.table,
            defs.join(",\n    ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shape_has_key_and_bar_columns() {
        for entity in EntityType::ALL {
            let shape = RecordShape::for_entity(entity);
            for name in ["symbol", "date", "open", "close", "high", "low", "volume", "amount"] {
                assert!(shape.column(name).is_some(), "{} lacks {}", shape.table, name);
            }
            assert!(!shape.column("symbol").unwrap().nullable);
            assert!(!shape.column("date").unwrap().nullable);
        }
    }

    #[test]
    fn test_temp_shape_mirrors_stock() {
        assert_eq!(STOCK_TEMP.column_names(), STOCK_DAILY.column_names());
        assert_ne!(STOCK_TEMP.table, STOCK_DAILY.table);
        assert!(STOCK_TEMP.column("outstanding_share").is_some());
        assert!(STOCK_TEMP.column("turnover").is_some());
    }

    #[test]
    fn test_create_table_sql() {
        let sql = STOCK_TEMP.create_table_sql();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS stock_data_20_25"));
        assert!(sql.contains("symbol TEXT NOT NULL"));
        assert!(sql.contains("date DATE NOT NULL"));
        assert!(sql.contains("turnover REAL"));
        assert!(sql.contains("PRIMARY KEY (symbol, date)"));
    }

    #[test]
    fn test_tables_are_distinct() {
        let mut tables: Vec<_> = EntityType::ALL
            .iter()
            .map(|e| RecordShape::for_entity(*e).table)
            .collect();
        tables.sort();
        tables.dedup();
        assert_eq!(tables.len(), 4);
    }
}
