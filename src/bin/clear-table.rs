use employee_etl::{Config, SqliteStore};

// Re-running the pipeline appends duplicate rows; this empties the target
// table so a load can be repeated from scratch.
fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = Config::load(None)?;

    let mut store = SqliteStore::open(&config.database.path, &config.database.table)?;
    let rows = store.count_rows()?;

    println!(
        "⚠️  WARNING: This will delete all {} rows from {} in {}!",
        rows,
        store.table(),
        store.location().display()
    );
    println!("Press Enter to continue or Ctrl+C to cancel...");
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    println!("🗑️  Clearing table...");
    let removed = store.clear()?;

    println!("✅ Removed {} rows", removed);
    Ok(())
}
