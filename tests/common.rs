#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rexpenses::core::{AuthLogic, ExpenseLogic};
use rexpenses::db::initialize::init_db;
use rexpenses::db::pool::DbPool;
use rexpenses::models::ExpenseInput;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Binary under test, with its config directory pointed at a private temp dir.
pub fn rx() -> Command {
    let home = env::temp_dir().join("rexpenses_test_home");
    fs::create_dir_all(&home).ok();
    let mut cmd = cargo_bin_cmd!("rexpenses");
    cmd.env("REXPENSES_HOME", home);
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{name}_rexpenses.sqlite"));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{name}_out.{ext}"));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn expense(title: &str, category: &str, amount: f64, date: &str) -> ExpenseInput {
    ExpenseInput {
        title: title.into(),
        category: category.into(),
        amount,
        date: date.into(),
    }
}

/// Migrated DB with user `ana` (password `pw`) and three expenses
/// across September and October 2025.
pub fn init_db_with_data(db_path: &str) -> i64 {
    let mut pool = DbPool::new(db_path).expect("open db");
    init_db(&pool.conn).expect("init db");
    let user = AuthLogic::register(&mut pool, "ana", "pw").expect("register");
    for input in [
        expense("Rent", "Home", 500.0, "2025-09-01"),
        expense("Lunch", "Food", 12.5, "2025-10-03"),
        expense("Train", "Travel", 30.0, "2025-10-20"),
    ] {
        ExpenseLogic::add(&mut pool, user, &input).expect("add expense");
    }
    user
}
