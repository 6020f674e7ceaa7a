//! Defaults and fixed names shared across the pipeline stages.

// Input
pub const DEFAULT_INPUT_FILE: &str = "employees_data.txt";
pub const DEFAULT_DELIMITER: char = '|';

// Output
pub const DEFAULT_CSV_FILE: &str = "output.csv";
pub const CSV_HEADER: [&str; 5] = ["Name", "Email", "Phone", "Address", "PostalCode"];

// Store
pub const DEFAULT_DATABASE_FILE: &str = "usersdata.db";
pub const DEFAULT_TABLE: &str = "users";
pub const TABLE_COLUMNS: [&str; 5] = ["name", "email", "phone", "address", "postal_code"];

// Configuration
pub const DEFAULT_CONFIG_FILE: &str = "employee_etl.toml";
pub const ENV_INPUT: &str = "EMPLOYEE_ETL_INPUT";
pub const ENV_OUTPUT: &str = "EMPLOYEE_ETL_OUTPUT";
pub const ENV_DATABASE: &str = "EMPLOYEE_ETL_DATABASE";
pub const ENV_TABLE: &str = "EMPLOYEE_ETL_TABLE";

// Logging
pub const LOG_DIR: &str = "logs";
pub const LOG_FILE_PREFIX: &str = "employee_etl.log";
pub const DEFAULT_LOG_FILTER: &str = "employee_etl=info,warn";
