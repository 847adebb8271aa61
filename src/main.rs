//! Transaction Report CLI
//!
//! Validates a CSV of bank transactions and prints per-customer balances,
//! the average transaction amount, and any rejected records.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- [--no-clear] [--balances-csv balances.csv] [bank_data_copy.csv]
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use log::info;
use std::env;
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::process;
use transaction_report::{report, run, Config, Result};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

fn main() {
    env_logger::init();

    if let Err(e) = try_main() {
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let config = Config::from_args(env::args().skip(1))?;

    let stdout = io::stdout();
    if config.clear_console && stdout.is_terminal() {
        let mut handle = stdout.lock();
        handle.write_all(CLEAR_SCREEN.as_bytes())?;
        handle.flush()?;
    }

    let mut result = run(&config.input_path);
    if let Some(err) = result.error.take() {
        return Err(err);
    }

    let mut handle = BufWriter::new(stdout.lock());
    report::write_report(&mut handle, &result)?;
    report::write_rejected(&mut handle, &result.rejected)?;
    handle.flush()?;

    if let Some(path) = &config.balances_csv {
        let file = File::create(path)?;
        result.write_balances(BufWriter::new(file))?;
        info!(
            "Wrote balances for {} customers to {}",
            result.customers.len(),
            path.display()
        );
    }

    Ok(())
}
