use crate::domain::{DEFAULT_COLUMN_COUNT, MAX_COLUMN_COUNT};
use clap::Parser;
use std::path::PathBuf;

/// Environment variable holding the log filter, e.g. `TCALC_LOG=debug`.
pub const LOG_FILTER_ENV: &str = "TCALC_LOG";

/// Command line configuration.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "tcalc", version, about = "Terminal calculation sheet with row labels and column totals")]
pub struct Config {
    /// JSON sheet to open at start; also the default save target
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Number of numeric columns
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_COLUMN_COUNT,
        value_parser = parse_column_count
    )]
    pub columns: usize,

    /// Write logs to this file (filter with the TCALC_LOG environment variable)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

fn parse_column_count(raw: &str) -> Result<usize, String> {
    let count: usize = raw
        .parse()
        .map_err(|_| format!("`{}` is not a number", raw))?;
    if (1..=MAX_COLUMN_COUNT).contains(&count) {
        Ok(count)
    } else {
        Err(format!("column count must be between 1 and {}", MAX_COLUMN_COUNT))
    }
}

impl Config {
    /// The configured sheet file as a string, if one was given.
    pub fn filename(&self) -> Option<String> {
        self.file
            .as_ref()
            .map(|path| path.to_string_lossy().into_owned())
    }
}
