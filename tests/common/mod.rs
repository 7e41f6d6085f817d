#![allow(dead_code)]

use phonepe_insights::types::{InsuranceRecord, TransactionMapRecord, UserActivityRecord};
use phonepe_insights::Dataset;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn user(state: &str, year: i32, brand: &str, users: u64, opens: u64) -> UserActivityRecord {
    UserActivityRecord {
        state: state.to_string(),
        year,
        brand: brand.to_string(),
        registered_users_count: users,
        app_opens: opens,
    }
}

pub fn txn(state: &str, year: i32, quarter: u8, kind: &str, amount: f64) -> TransactionMapRecord {
    TransactionMapRecord {
        state: state.to_string(),
        year,
        quarter,
        transaction_type: kind.to_string(),
        transaction_amount: amount,
    }
}

pub fn policy(state: &str, year: i32, count: u64, amount: f64) -> InsuranceRecord {
    InsuranceRecord {
        state: state.to_string(),
        year,
        transaction_count: count,
        transaction_amount: amount,
    }
}

/// A small dataset with the casing quirks seen in real exports.
pub fn sample_dataset() -> Dataset {
    Dataset::from_rows(
        vec![
            user("goa", 2021, "Xiaomi", 100, 40),
            user("goa", 2022, "Xiaomi", 150, 60),
            user("goa", 2022, "Samsung", 300, 20),
            user("kerala", 2022, "Vivo", 500, 90),
        ],
        vec![
            txn("goa", 2022, 1, "Recharge", 100.0),
            txn("goa", 2022, 1, "Recharge", 50.0),
            txn("goa", 2022, 2, "Recharge", 30.0),
            txn("goa", 2022, 2, "Merchant payments", 70.0),
            txn("goa", 2021, 4, "Recharge", 10.0),
            txn("maharashtra", 2022, 1, "Peer-to-peer payments", 900.0),
            txn("KARNATAKA", 2022, 3, "Recharge", 400.0),
            txn("Karnataka", 2021, 3, "Recharge", 100.0),
        ],
        vec![
            policy("goa", 2021, 5, 500.0),
            policy("goa", 2022, 7, 700.0),
            policy("goa", 2022, 1, 100.0),
            policy("kerala", 2022, 20, 2000.0),
            policy("assam", 2022, 3, 1300.0),
            policy("bihar", 2021, 4, 1300.0),
        ],
    )
}
