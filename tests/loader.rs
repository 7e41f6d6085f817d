mod common;

use common::init_logging;
use phonepe_insights::reports::{statewise_transaction_totals, transactions_by_quarter_and_type};
use phonepe_insights::{
    CsvDirectoryProvider, Dataset, FactTable, FactTableProvider, InMemoryProvider, InsightsError,
};
use std::fs;

const USER_COLUMNS: &[&str] = &["state", "year", "brand", "registered_users_count", "app_opens"];
const TXN_COLUMNS: &[&str] = &[
    "state",
    "year",
    "quarter",
    "transaction_type",
    "transaction_amount",
];
const INSURANCE_COLUMNS: &[&str] = &["state", "year", "transaction_count", "transaction_amount"];

fn provider() -> InMemoryProvider {
    InMemoryProvider::new()
        .with_table(
            FactTable::UserActivity,
            USER_COLUMNS,
            &[
                &["goa", "2022", "Xiaomi", "1,200", "300"],
                &["goa", "2022.0", "Samsung", "800", "100"],
            ],
        )
        .with_table(
            FactTable::TransactionMap,
            TXN_COLUMNS,
            &[
                &["goa", "2022", "1", "Recharge", "100.5"],
                &["goa", "2022", "1", "Recharge", "49.5"],
                &["goa", "2022", "5", "Recharge", "10"],
                &["goa", "2022", "2", "Recharge", "-3"],
                &["goa", "2022", "2", "Recharge", "lots"],
                &["", "2022", "2", "Recharge", "7"],
            ],
        )
        .with_table(
            FactTable::Insurance,
            INSURANCE_COLUMNS,
            &[&["goa", "2022", "4", "400"]],
        )
}

#[test]
fn loads_and_cleans_in_memory_tables() {
    init_logging();
    let (data, report) = Dataset::load(&provider()).unwrap();
    assert_eq!(data.user_activity.len(), 2);
    assert_eq!(data.user_activity[0].registered_users_count, 1200);
    assert_eq!(data.user_activity[1].year, 2022);
    assert_eq!(data.transaction_map.len(), 2);
    assert_eq!(data.insurance.len(), 1);

    assert_eq!(report.transaction_map.total_rows, 6);
    assert_eq!(report.transaction_map.loaded_rows, 2);
    assert_eq!(report.transaction_map.skipped_rows, 4);
    assert_eq!(report.skipped_rows(), 4);

    let pivot = transactions_by_quarter_and_type(&data, "goa", 2022);
    assert_eq!(pivot.amount(1, "Recharge"), 150.0);
}

#[test]
fn missing_column_is_a_schema_error() {
    let provider = provider().with_table(
        FactTable::Insurance,
        &["state", "year", "count", "amount"],
        &[&["goa", "2022", "4", "400"]],
    );
    match Dataset::load(&provider) {
        Err(InsightsError::Schema { table, column }) => {
            assert_eq!(table, "insurance");
            assert_eq!(column, "transaction_count");
        }
        other => panic!("expected schema error, got {:?}", other),
    }
}

#[test]
fn header_matching_ignores_case_and_padding() {
    let provider = provider().with_table(
        FactTable::Insurance,
        &[" State", "YEAR", "Transaction_Count ", "transaction_amount"],
        &[&["goa", "2022", "4", "400"]],
    );
    let (data, _) = Dataset::load(&provider).unwrap();
    assert_eq!(data.insurance[0].transaction_count, 4);
}

#[test]
fn absent_table_is_data_unavailable() {
    let provider = InMemoryProvider::new().with_table(FactTable::UserActivity, USER_COLUMNS, &[]);
    let err = Dataset::load(&provider).unwrap_err();
    assert!(matches!(
        err,
        InsightsError::DataUnavailable { ref table, .. } if table == "transaction_map"
    ));
}

#[test]
fn reads_tables_from_csv_directory() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("user_activity.csv"),
        "state,year,brand,registered_users_count,app_opens\ngoa,2022,Xiaomi,10,5\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("transaction_map.csv"),
        "state,year,quarter,transaction_type,transaction_amount,extra\n\
         maharashtra,2022,1,Recharge,100,x\n\
         KARNATAKA,2022,2,Recharge,\"1,000\",y\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("insurance.csv"),
        "state,year,transaction_count,transaction_amount\ngoa,2022,3,300\n",
    )
    .unwrap();

    let provider = CsvDirectoryProvider::new(dir.path());
    let raw = provider.read_table(FactTable::TransactionMap).unwrap();
    assert!(raw.has_column("extra"));
    assert_eq!(raw.records().len(), 2);

    let (data, report) = Dataset::load(&provider).unwrap();
    assert_eq!(report.skipped_rows(), 0);
    let totals = statewise_transaction_totals(&data);
    let states: Vec<&str> = totals.iter().map(|r| r.state.as_str()).collect();
    assert_eq!(states, vec!["Karnataka", "Maharashtra"]);
    assert_eq!(totals[0].transaction_amount, 1000.0);
}

#[test]
fn missing_csv_file_is_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let provider = CsvDirectoryProvider::new(dir.path());
    let err = provider.read_table(FactTable::Insurance).unwrap_err();
    assert!(matches!(err, InsightsError::DataUnavailable { .. }));
    assert!(err.to_string().contains("insurance"));
}

#[test]
fn invalid_utf8_row_is_skipped_not_fatal() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("user_activity.csv"),
        "state,year,brand,registered_users_count,app_opens\ngoa,2022,Xiaomi,10,5\n",
    )
    .unwrap();
    let mut transactions =
        b"state,year,quarter,transaction_type,transaction_amount\ngoa,2022,1,Recharge,100\n".to_vec();
    transactions.extend_from_slice(b"goa,2022,2,Rech\xffarge,50\n");
    transactions.extend_from_slice(b"goa,2022,3,Recharge,25\n");
    fs::write(dir.path().join("transaction_map.csv"), transactions).unwrap();
    fs::write(
        dir.path().join("insurance.csv"),
        "state,year,transaction_count,transaction_amount\ngoa,2022,3,300\n",
    )
    .unwrap();

    let provider = CsvDirectoryProvider::new(dir.path());
    let raw = provider.read_table(FactTable::TransactionMap).unwrap();
    assert_eq!(raw.records().len(), 2);
    assert_eq!(raw.unreadable_rows(), 1);

    let (data, report) = Dataset::load(&provider).unwrap();
    assert_eq!(data.transaction_map.len(), 2);
    assert_eq!(report.transaction_map.total_rows, 3);
    assert_eq!(report.transaction_map.loaded_rows, 2);
    assert_eq!(report.transaction_map.skipped_rows, 1);
    let pivot = transactions_by_quarter_and_type(&data, "goa", 2022);
    assert_eq!(pivot.amount(1, "Recharge"), 100.0);
    assert_eq!(pivot.amount(3, "Recharge"), 25.0);
}
