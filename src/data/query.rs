//! Filtered SELECT construction

use crate::schema::RecordShape;
use crate::types::{DateRange, SymbolSelector};
use rusqlite::types::Value;
use std::fmt;

/// Longest symbol list bound one parameter per symbol. Longer lists are bound
/// as a single JSON array so the query stays under SQLite's variable limit.
pub const MAX_BOUND_SYMBOLS: usize = 999;

/// A date-range + symbol filter over one record shape
#[derive(Debug, Clone)]
pub struct SelectQuery {
    shape: &'static RecordShape,
    predicate: String,
    params: Vec<Value>,
}

impl SelectQuery {
    pub fn new(shape: &'static RecordShape, selector: &SymbolSelector, range: &DateRange) -> Self {
        let mut predicate = String::from("date >= ?1 AND date <= ?2");
        let mut params = vec![
            Value::Text(range.start.format("%Y-%m-%d").to_string()),
            Value::Text(range.end.format("%Y-%m-%d").to_string()),
        ];

        match selector {
            SymbolSelector::All => {}
            SymbolSelector::One(symbol) => {
                predicate.push_str(" AND symbol = ?3");
                params.push(Value::Text(symbol.clone()));
            }
            SymbolSelector::Many(symbols) if symbols.is_empty() => {
                predicate.push_str(" AND 1 = 0");
            }
            SymbolSelector::Many(symbols) if symbols.len() > MAX_BOUND_SYMBOLS => {
                predicate.push_str(" AND symbol IN (SELECT value FROM json_each(?3))");
                params.push(Value::Text(serde_json::Value::from(symbols.clone()).to_string()));
            }
            SymbolSelector::Many(symbols) => {
                let placeholders: Vec<String> = (0..symbols.len())
                    .map(|i| format!("?{}", params.len() + i + 1))
                    .collect();
                predicate.push_str(&format!(" AND symbol IN ({})", placeholders.join(", ")));
                params.extend(symbols.iter().cloned().map(Value::Text));
            }
        }

        Self {
            shape,
            predicate,
            params,
        }
    }

    pub fn shape(&self) -> &'static RecordShape {
        self.shape
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Row query, ordered by the primary key
    pub fn sql(&self) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} ORDER BY symbol, date",
            self.shape.column_names().join(", "),
            self.shape.table,
            self.predicate
        )
    }

    /// Row count under the same filter
    pub fn count_sql(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            self.shape.table, self.predicate
        )
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql())?;
        let shown: Vec<String> = self
            .params
            .iter()
            .map(|p| match p {
                Value::Text(s) => format!("'{}'", s),
                other => format!("{:?}", other),
            })
            .collect();
        write!(f, " -- params: [{}]", shown.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{INDEX_DAILY, STOCK_DAILY};

    fn january() -> DateRange {
        DateRange::parse("2024-01-01", "20240131").unwrap()
    }

    #[test]
    fn test_all_selector_has_only_date_bounds() {
        let query = SelectQuery::new(&STOCK_DAILY, &SymbolSelector::All, &january());
        assert_eq!(
            query.sql(),
            "SELECT symbol, date, open, close, high, low, volume, amount, outstanding_share, turnover \
             FROM stock_daily_data WHERE date >= ?1 AND date <= ?2 ORDER BY symbol, date"
        );
        assert_eq!(
            query.params(),
            &[
                Value::Text("2024-01-01".into()),
                Value::Text("2024-01-31".into())
            ]
        );
    }

    #[test]
    fn test_single_symbol() {
        let query = SelectQuery::new(&INDEX_DAILY, &SymbolSelector::from("000300"), &january());
        assert!(query.sql().contains("AND symbol = ?3"));
        assert_eq!(query.params()[2], Value::Text("000300".into()));
        assert_eq!(
            query.count_sql(),
            "SELECT COUNT(*) FROM index_daily_data WHERE date >= ?1 AND date <= ?2 AND symbol = ?3"
        );
    }

    #[test]
    fn test_symbol_list() {
        let selector = SymbolSelector::from(vec!["600519", "000001", "300750"]);
        let query = SelectQuery::new(&STOCK_DAILY, &selector, &january());
        assert!(query.sql().contains("AND symbol IN (?3, ?4, ?5)"));
        assert_eq!(query.params().len(), 5);
    }

    #[test]
    fn test_long_symbol_list_binds_one_array() {
        let symbols: Vec<String> = (0..=MAX_BOUND_SYMBOLS).map(|i| format!("{:06}", i)).collect();
        let query = SelectQuery::new(&STOCK_DAILY, &SymbolSelector::Many(symbols), &january());

        assert!(query
            .sql()
            .contains("AND symbol IN (SELECT value FROM json_each(?3))"));
        assert_eq!(query.params().len(), 3);
        match &query.params()[2] {
            Value::Text(json) => {
                assert!(json.starts_with("[\"000000\",\"000001\""));
                assert!(json.ends_with("\"000999\"]"));
            }
            other => panic!("expected text param, got {:?}", other),
        }
    }

    #[test]
    fn test_list_at_limit_binds_each_symbol() {
        let symbols: Vec<String> = (0..MAX_BOUND_SYMBOLS).map(|i| format!("{:06}", i)).collect();
        let query = SelectQuery::new(&STOCK_DAILY, &SymbolSelector::Many(symbols), &january());
        assert!(!query.sql().contains("json_each"));
        assert_eq!(query.params().len(), MAX_BOUND_SYMBOLS + 2);
    }

    #[test]
    fn test_empty_symbol_list_matches_nothing() {
        let selector = SymbolSelector::Many(Vec::new());
        let query = SelectQuery::new(&STOCK_DAILY, &selector, &january());
        assert!(query.sql().contains("AND 1 = 0"));
        assert_eq!(query.params().len(), 2);
    }

    #[test]
    fn test_display_shows_params() {
        let query = SelectQuery::new(&STOCK_DAILY, &SymbolSelector::from("600519"), &january());
        let shown = query.to_string();
        assert!(shown.contains("FROM stock_daily_data"));
        assert!(shown.contains("'600519'"));
    }
}
