//! Property-based tests for the symbol and date filters.
//!
//! A single database is seeded with a fixed grid of bars; proptest then picks
//! selectors and date bounds and checks the rows returned against the grid.

use chrono::{Duration, NaiveDate};
use market_db::prelude::{DataReader, Database, DateRange, EntityType, SymbolSelector};
use proptest::prelude::*;
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::sync::OnceLock;
use tempfile::TempDir;

const SYMBOLS: [&str; 5] = ["000001", "000002", "600000", "600519", "300750"];
const DAYS: i64 = 30;

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

struct Fixture {
    _dir: TempDir,
    reader: DataReader,
}

fn fixture() -> &'static Fixture {
    static FIXTURE: OnceLock<Fixture> = OnceLock::new();
    FIXTURE.get_or_init(|| {
        let dir = TempDir::new().unwrap();
        let db = Database::from_path(dir.path().join("grid.db"));
        db.create_tables().unwrap();

        let mut conn = Connection::open(db.path()).unwrap();
        let tx = conn.transaction().unwrap();
        for symbol in SYMBOLS {
            // symbols on the 6xxxxx board skip every seventh day
            for d in 0..DAYS {
                if symbol.starts_with('6') && d % 7 == 5 {
                    continue;
                }
                tx.execute(
                    "INSERT INTO stock_daily_data (symbol, date, open, close, high, low, volume, amount)
                     VALUES (?1, ?2, 1.0, 1.0, 1.0, 1.0, 100.0, 100.0)",
                    params![symbol, (base() + Duration::days(d)).format("%Y-%m-%d").to_string()],
                )
                .unwrap();
            }
        }
        tx.commit().unwrap();

        Fixture {
            _dir: dir,
            reader: DataReader::new(db),
        }
    })
}

/// Rows the grid holds for `selector` within `range`
fn expected_rows(selector: &SymbolSelector, range: &DateRange) -> usize {
    let mut count = 0;
    for symbol in SYMBOLS {
        if !selector.matches(symbol) {
            continue;
        }
        for d in 0..DAYS {
            if symbol.starts_with('6') && d % 7 == 5 {
                continue;
            }
            if range.contains(base() + Duration::days(d)) {
                count += 1;
            }
        }
    }
    count
}

fn arb_symbol() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::sample::select(SYMBOLS.to_vec()).prop_map(String::from),
        "[0-9]{6}",
    ]
}

fn arb_selector() -> impl Strategy<Value = SymbolSelector> {
    prop_oneof![
        Just(SymbolSelector::All),
        arb_symbol().prop_map(SymbolSelector::One),
        proptest::collection::vec(arb_symbol(), 0..6).prop_map(SymbolSelector::Many),
    ]
}

/// Date bounds around the seeded window, start <= end
fn arb_range() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (-5i64..DAYS + 5, 0i64..DAYS + 5).prop_map(|(offset, len)| {
        let start = base() + Duration::days(offset);
        (start, start + Duration::days(len))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_rows_respect_selector_and_bounds(selector in arb_selector(), (start, end) in arb_range()) {
        let reader = &fixture().reader;
        let df = reader.get_data(
            "stock",
            selector.clone(),
            &start.format("%Y-%m-%d").to_string(),
            &end.format("%Y%m%d").to_string(),
        );

        let range = DateRange::new(start, end).unwrap();
        prop_assert_eq!(df.height(), expected_rows(&selector, &range));

        if df.height() > 0 {
            let symbols = df.column("symbol").unwrap().str().unwrap();
            for symbol in symbols.into_iter() {
                prop_assert!(selector.matches(symbol.unwrap()));
            }

            let dates = df.column("date").unwrap().date().unwrap();
            for date in dates.as_date_iter() {
                prop_assert!(range.contains(date.unwrap()));
            }
        }
    }

    #[test]
    fn prop_list_result_is_subset_of_list(symbols in proptest::collection::vec(arb_symbol(), 1..6)) {
        let reader = &fixture().reader;
        let df = reader.get_data("stock", symbols.clone(), "2024-03-01", "2024-03-31");

        let allowed: HashSet<&str> = symbols.iter().map(String::as_str).collect();
        if df.height() > 0 {
            for symbol in df.column("symbol").unwrap().str().unwrap().into_iter() {
                prop_assert!(allowed.contains(symbol.unwrap()));
            }
        }
    }

    #[test]
    fn prop_repeated_reads_are_identical(selector in arb_selector(), (start, end) in arb_range()) {
        let reader = &fixture().reader;
        let range = DateRange::new(start, end).unwrap();

        let first = reader.read(EntityType::Stock, &selector, &range).unwrap();
        let second = reader.read(EntityType::Stock, &selector, &range).unwrap();
        prop_assert!(first.equals_missing(&second));
    }
}
