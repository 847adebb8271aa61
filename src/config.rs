//! Command-line configuration.

use crate::error::{ReportError, Result};
use std::path::PathBuf;

/// Input file read when no path is given.
pub const DEFAULT_INPUT_PATH: &str = "bank_data_copy.csv";

/// Settings for one run of the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_path: PathBuf,

    /// Clear the terminal before printing. Only honoured when stdout is a terminal.
    pub clear_console: bool,

    /// Where to write the balances CSV, if anywhere.
    pub balances_csv: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            clear_console: true,
            balances_csv: None,
        }
    }
}

impl Config {
    /// Parses arguments, excluding the program name.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Config::default();
        let mut input_path: Option<PathBuf> = None;
        let mut args = args.into_iter().map(Into::<String>::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--no-clear" => config.clear_console = false,
                "--balances-csv" => {
                    let path = args.next().ok_or_else(|| {
                        ReportError::Config("Missing value for --balances-csv".to_string())
                    })?;
                    config.balances_csv = Some(PathBuf::from(path));
                }
                flag if flag.starts_with("--") => {
                    return Err(ReportError::Config(format!("Unknown option '{}'", flag)));
                }
                _ if input_path.is_some() => {
                    return Err(ReportError::Config(format!(
                        "Unexpected extra argument '{}'",
                        arg
                    )));
                }
                _ => input_path = Some(PathBuf::from(arg)),
            }
        }

        if let Some(path) = input_path {
            config.input_path = path;
        }
        Ok(config)
    }
}
