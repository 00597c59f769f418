use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use std::path::Path;

mod common;
use common::{init_db_with_data, rx, setup_test_db, temp_out};

#[test]
fn test_init_creates_schema_and_logs() {
    let db_path = setup_test_db("cli_init");

    rx().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"))
        .stdout(contains("Created users table").not())
        .stdout(contains("created table").not());

    assert!(Path::new(&db_path).exists());

    rx().args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied"))
        .stdout(contains("init"));
}

#[test]
fn test_db_info_and_check() {
    let db_path = setup_test_db("cli_db_info");
    init_db_with_data(&db_path);

    rx().args(["--db", &db_path, "db", "--info", "--check"])
        .assert()
        .success()
        .stdout(contains("expenses"))
        .stdout(contains("542.50"))
        .stdout(contains("2025-09-01"))
        .stdout(contains("Integrity check passed"));
}

#[test]
fn test_export_csv_for_month() {
    let db_path = setup_test_db("cli_export_month");
    init_db_with_data(&db_path);
    let out = temp_out("cli_export_month", "csv");

    rx().args([
        "--db", &db_path, "export", "--user", "ana", "--format", "csv", "--file", &out,
        "--range", "2025-10",
    ])
    .assert()
    .success()
    .stdout(contains("export completed (2 expenses)"));

    let content = fs::read_to_string(&out).expect("csv written");
    assert!(content.starts_with("Title,Category,Amount,Date"));
    assert!(content.contains("Lunch,Food,12.5,2025-10-03"));
    assert!(content.contains("Train,Travel,30,2025-10-20"));
    assert!(!content.contains("Rent"));
}

#[test]
fn test_export_pdf_and_xlsx_write_files() {
    let db_path = setup_test_db("cli_export_binary");
    init_db_with_data(&db_path);

    let pdf = temp_out("cli_export_binary", "pdf");
    rx().args([
        "--db", &db_path, "export", "--user", "ana", "--format", "pdf", "--file", &pdf,
    ])
    .assert()
    .success();
    let bytes = fs::read(&pdf).expect("pdf written");
    assert!(bytes.starts_with(b"%PDF"));

    let xlsx = temp_out("cli_export_binary", "xlsx");
    rx().args([
        "--db", &db_path, "export", "--user", "ana", "--format", "xlsx", "--file", &xlsx,
        "--range", "2025",
    ])
    .assert()
    .success();
    let bytes = fs::read(&xlsx).expect("xlsx written");
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_export_rejects_relative_path_and_unknown_user() {
    let db_path = setup_test_db("cli_export_errors");
    init_db_with_data(&db_path);

    rx().args([
        "--db", &db_path, "export", "--user", "ana", "--file", "relative.csv",
    ])
    .assert()
    .failure()
    .stderr(contains("must be absolute"));

    let out = temp_out("cli_export_errors", "csv");
    rx().args(["--db", &db_path, "export", "--user", "bob", "--file", &out])
        .assert()
        .failure()
        .stderr(contains("Unknown user: bob"));

    rx().args([
        "--db", &db_path, "export", "--user", "ana", "--file", &out, "--range", "2025-13",
    ])
    .assert()
    .failure()
    .stderr(contains("invalid --range"));
}

#[test]
fn test_import_csv_then_export_json() {
    let db_path = setup_test_db("cli_import");
    init_db_with_data(&db_path);

    let input = temp_out("cli_import_input", "csv");
    fs::write(
        &input,
        "Title,Category,Amount,Date (YYYY-MM-DD)\nCoffee,Food,3.20,2025-10-05\nBook,Leisure,18,2025-10-06\n",
    )
    .unwrap();

    rx().args(["--db", &db_path, "import", "--user", "ana", "--file", &input])
        .assert()
        .success()
        .stdout(contains("Imported 2 expenses for ana."));

    let out = temp_out("cli_import", "json");
    rx().args([
        "--db", &db_path, "export", "--user", "ana", "--format", "json", "--file", &out,
        "--range", "2025-10-05:2025-10-06",
    ])
    .assert()
    .success();

    let json = fs::read_to_string(&out).unwrap();
    assert!(json.contains("\"Coffee\""));
    assert!(json.contains("\"Book\""));
    assert!(!json.contains("\"Lunch\""));

    rx().args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("import").and(contains("export")));
}

#[test]
fn test_import_rejects_unknown_layout() {
    let db_path = setup_test_db("cli_import_bad");
    init_db_with_data(&db_path);

    let input = temp_out("cli_import_bad_input", "csv");
    fs::write(&input, "name,price\nCoffee,3\n").unwrap();

    rx().args(["--db", &db_path, "import", "--user", "ana", "--file", &input])
        .assert()
        .failure()
        .stderr(contains("Invalid Excel format"));
}

#[test]
fn test_backup_compressed() {
    let db_path = setup_test_db("cli_backup");
    init_db_with_data(&db_path);
    let out = temp_out("cli_backup", "sqlite");
    let zip = out.replace(".sqlite", ".zip");
    fs::remove_file(&zip).ok();

    rx().args([
        "--db", &db_path, "backup", "--file", &out, "--compress", "--force",
    ])
    .assert()
    .success()
    .stdout(contains("Compressed"));

    assert!(Path::new(&zip).exists());
    assert!(!Path::new(&out).exists());
}

#[test]
fn test_config_print_shows_overridden_database() {
    let db_path = setup_test_db("cli_config_print");

    rx().args(["--db", &db_path, "config", "--print"])
        .assert()
        .success()
        .stdout(contains(db_path.as_str()))
        .stdout(contains("currency_symbol"));
}
