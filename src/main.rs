use clap::{Parser, Subcommand};
use employee_etl::{logging, Config, Pipeline, PipelineResult, SqliteStore};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "employee_etl")]
#[command(about = "Extract employee records from delimited text into CSV and SQLite")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./employee_etl.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Source text file
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// CSV file to write
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Target table name
    #[arg(long, global = true)]
    table: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract records, write the CSV and insert into the database (default)
    Run {
        /// Stop after writing the CSV; the database is not opened
        #[arg(long)]
        dry_run: bool,
        /// Print the run report as JSON instead of status lines
        #[arg(long)]
        json: bool,
    },
    /// Create the database file and target table if they do not exist
    InitDb,
}

impl Cli {
    fn resolve_config(&self) -> employee_etl::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(input) = &self.input {
            config.input.path = input.clone();
        }
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if let Some(database) = &self.database {
            config.database.path = database.clone();
        }
        if let Some(table) = &self.table {
            config.database.table = table.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn print_status(result: &PipelineResult) {
    println!("Total records found: {}", result.records_found);
    println!("CSV file created successfully");
    match &result.store {
        Some(store) => println!("{} rows inserted into {}", result.rows_inserted, store),
        None => println!("Dry run: database not modified"),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.resolve_config()?;
    let command = cli.command.unwrap_or(Commands::Run {
        dry_run: false,
        json: false,
    });

    match command {
        Commands::Run { dry_run, json } => {
            let pipeline = Pipeline::new(config)?;
            let result = if dry_run {
                pipeline.extract_only()?
            } else {
                pipeline.run(|config| SqliteStore::open(&config.database.path, &config.database.table))?
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_status(&result);
            }
        }
        Commands::InitDb => {
            let store = SqliteStore::create(&config.database.path, &config.database.table)?;
            info!("Database ready");
            println!(
                "Table {} ready in {} ({} rows)",
                store.table(),
                store.location().display(),
                store.count_rows()?
            );
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("Run failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}
