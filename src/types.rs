//! Core types for selecting what to read

use crate::error::{Result, StoreError};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Symbol identifier (stock code, index code or board code)
pub type Symbol = String;

/// Which family of records a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Stock,
    Index,
    Concept,
    Temp,
}

impl EntityType {
    pub const ALL: [EntityType; 4] = [
        EntityType::Stock,
        EntityType::Index,
        EntityType::Concept,
        EntityType::Temp,
    ];

    /// Tag used on the call boundary
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Stock => "stock",
            EntityType::Index => "index",
            EntityType::Concept => "concept",
            EntityType::Temp => "temp",
        }
    }
}

impl FromStr for EntityType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stock" => Ok(EntityType::Stock),
            "index" => Ok(EntityType::Index),
            "concept" => Ok(EntityType::Concept),
            "temp" => Ok(EntityType::Temp),
            other => Err(StoreError::InvalidEntityType(other.to_string())),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Chooses which symbols' rows are included in a read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolSelector {
    /// No symbol filter
    All,
    /// Membership filter
    Many(Vec<Symbol>),
    /// Equality filter
    One(Symbol),
}

impl SymbolSelector {
    /// Keyword that selects every symbol
    pub const ALL_KEYWORD: &'static str = "all";

    /// Whether a row with `symbol` passes this selector
    pub fn matches(&self, symbol: &str) -> bool {
        match self {
            SymbolSelector::All => true,
            SymbolSelector::Many(symbols) => symbols.iter().any(|s| s == symbol),
            SymbolSelector::One(s) => s == symbol,
        }
    }
}

impl From<&str> for SymbolSelector {
    fn from(s: &str) -> Self {
        if s == Self::ALL_KEYWORD {
            SymbolSelector::All
        } else {
            SymbolSelector::One(s.to_string())
        }
    }
}

impl From<String> for SymbolSelector {
    fn from(s: String) -> Self {
        if s == Self::ALL_KEYWORD {
            SymbolSelector::All
        } else {
            SymbolSelector::One(s)
        }
    }
}

impl From<Vec<String>> for SymbolSelector {
    fn from(symbols: Vec<String>) -> Self {
        SymbolSelector::Many(symbols)
    }
}

impl From<Vec<&str>> for SymbolSelector {
    fn from(symbols: Vec<&str>) -> Self {
        SymbolSelector::Many(symbols.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for SymbolSelector {
    fn from(symbols: &[&str]) -> Self {
        SymbolSelector::Many(symbols.iter().map(|s| s.to_string()).collect())
    }
}

impl fmt::Display for SymbolSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolSelector::All => f.write_str(Self::ALL_KEYWORD),
            SymbolSelector::Many(symbols) => write!(f, "[{}]", symbols.join(", ")),
            SymbolSelector::One(s) => f.write_str(s),
        }
    }
}

/// Parse a calendar date given as `YYYY-MM-DD` or `YYYYMMDD`
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
        .map_err(|_| StoreError::InvalidDate(s.to_string()))
}

/// Inclusive date bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(StoreError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Build from string-encoded bounds
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
