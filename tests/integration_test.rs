use anyhow::Result;
use employee_etl::{Config, EtlError, Pipeline, RecordStore, SqliteStore};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const SAMPLE: &str = "Alice Smith | alice@x.com | 555-1234 | 1 Main St | 90210
Bob Jones | bob@x.com | 555-9876 | 22 Oak Ave, Apt 4 | 10001
Carol \"CJ\" White | carol@x.com | 555-0000 |
    3 Pine Rd | 60601
Dan Brown | dan@x.com | 555-1111 | 4 Elm St | 9A210
Eve Black | eve@x.com | 555-2222 | 5 Birch Ln | 73301
";

fn setup(dir: &Path, input: &str) -> Result<Config> {
    let mut config = Config::default();
    config.input.path = dir.join("employees_data.txt");
    config.output.path = dir.join("out").join("output.csv");
    config.database.path = dir.join("usersdata.db");
    fs::write(&config.input.path, input)?;
    SqliteStore::create(&config.database.path, &config.database.table)?;
    Ok(config)
}

fn read_csv(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::Reader::from_path(path)?;
    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok((header, rows))
}

fn open_store(config: &Config) -> employee_etl::Result<SqliteStore> {
    SqliteStore::open(&config.database.path, &config.database.table)
}

#[test]
fn test_full_pipeline_counts_agree() -> Result<()> {
    let dir = tempdir()?;
    let config = setup(dir.path(), SAMPLE)?;
    let pipeline = Pipeline::new(config.clone())?;

    let result = pipeline.run(open_store)?;

    // Dan's record has a non-numeric postal code and is skipped
    assert_eq!(result.records_found, 4);
    assert_eq!(result.csv_rows_written, 4);
    assert_eq!(result.rows_inserted, 4);

    let (header, rows) = read_csv(&config.output.path)?;
    assert_eq!(header, vec!["Name", "Email", "Phone", "Address", "PostalCode"]);
    assert_eq!(rows.len(), result.records_found);

    let store = open_store(&config)?;
    assert_eq!(store.count_rows()?, 4);
    Ok(())
}

#[test]
fn test_csv_round_trip_matches_store_rows() -> Result<()> {
    let dir = tempdir()?;
    let config = setup(dir.path(), SAMPLE)?;
    Pipeline::new(config.clone())?.run(open_store)?;

    let (_, csv_rows) = read_csv(&config.output.path)?;
    let expected: Vec<Vec<&str>> = vec![
        vec!["Alice Smith", "alice@x.com", "555-1234", "1 Main St", "90210"],
        vec!["Bob Jones", "bob@x.com", "555-9876", "22 Oak Ave, Apt 4", "10001"],
        vec!["Carol \"CJ\" White", "carol@x.com", "555-0000", "3 Pine Rd", "60601"],
        vec!["Eve Black", "eve@x.com", "555-2222", "5 Birch Ln", "73301"],
    ];
    assert_eq!(csv_rows, expected);

    let stored = open_store(&config)?.fetch_all()?;
    let stored: Vec<Vec<String>> = stored.into_iter().map(|row| row.to_vec()).collect();
    assert_eq!(stored, csv_rows);
    Ok(())
}

#[test]
fn test_single_record_scenario() -> Result<()> {
    let dir = tempdir()?;
    let config = setup(
        dir.path(),
        "Alice Smith | alice@x.com | 555-1234 | 1 Main St | 90210\n",
    )?;

    let result = Pipeline::new(config.clone())?.run(open_store)?;

    assert_eq!(result.records_found, 1);
    assert_eq!(result.rows_inserted, 1);
    assert_eq!(
        fs::read_to_string(&config.output.path)?,
        "Name,Email,Phone,Address,PostalCode\nAlice Smith,alice@x.com,555-1234,1 Main St,90210\n"
    );
    Ok(())
}

#[test]
fn test_no_matches_writes_header_only() -> Result<()> {
    let dir = tempdir()?;
    let config = setup(dir.path(), "nothing to see here\njust | one | pipe-ish | line\n")?;

    let result = Pipeline::new(config.clone())?.run(open_store)?;

    assert_eq!(result.records_found, 0);
    assert_eq!(result.rows_inserted, 0);
    assert_eq!(
        fs::read_to_string(&config.output.path)?,
        "Name,Email,Phone,Address,PostalCode\n"
    );
    assert_eq!(open_store(&config)?.count_rows()?, 0);
    Ok(())
}

#[test]
fn test_second_run_duplicates_rows() -> Result<()> {
    let dir = tempdir()?;
    let config = setup(dir.path(), SAMPLE)?;
    let pipeline = Pipeline::new(config.clone())?;

    pipeline.run(open_store)?;
    let second = pipeline.run(open_store)?;

    assert_eq!(second.rows_inserted, 4);
    assert_eq!(open_store(&config)?.count_rows()?, 8);
    Ok(())
}

#[test]
fn test_constraint_violation_commits_nothing() -> Result<()> {
    let dir = tempdir()?;
    let config = setup(
        dir.path(),
        "Alice | same@x.com | 555 | 1 Main St | 90210\nBob | same@x.com | 556 | 2 Main St | 90211\n",
    )?;
    open_store(&config)?
        .connection()
        .execute_batch("CREATE UNIQUE INDEX users_email ON users (email);")?;

    let err = Pipeline::new(config.clone())?.run(open_store).unwrap_err();

    assert!(matches!(err, EtlError::StoreConstraint(_)), "got {err:?}");
    assert_eq!(open_store(&config)?.count_rows()?, 0);
    // The CSV is written before the insert and stays behind
    assert_eq!(read_csv(&config.output.path)?.1.len(), 2);
    Ok(())
}

#[test]
fn test_missing_database_is_connection_error() -> Result<()> {
    let dir = tempdir()?;
    let mut config = setup(dir.path(), SAMPLE)?;
    config.database.path = dir.path().join("elsewhere.db");

    let err = Pipeline::new(config.clone())?.run(open_store).unwrap_err();

    assert!(matches!(err, EtlError::StoreConnection(_)));
    assert!(!config.database.path.exists());
    Ok(())
}

#[test]
fn test_run_with_store_reuses_open_connection() -> Result<()> {
    let dir = tempdir()?;
    let config = setup(dir.path(), SAMPLE)?;
    let mut store = open_store(&config)?;

    let result = Pipeline::new(config)?.run_with_store(&mut store)?;

    assert_eq!(result.rows_inserted, store.count_rows()?);
    assert!(store.describe().starts_with("users"));
    Ok(())
}
