use crate::reports::DEFAULT_TOP_STATES;
use std::env;
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "PHONEPE_DATA_DIR";
pub const OUT_DIR_ENV: &str = "PHONEPE_OUT_DIR";

/// Runtime settings for the CLI. Where the fact tables live is all the
/// binary needs to know about the data source; no credentials pass through
/// here.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub top_states: usize,
    pub state: Option<String>,
    pub year: Option<i32>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("./data"),
            out_dir: PathBuf::from("."),
            top_states: DEFAULT_TOP_STATES,
            state: None,
            year: None,
        }
    }
}

impl Config {
    /// Flags win over environment variables, which win over defaults.
    ///
    ///   phonepe_insights --data-dir ./data --out-dir ./out --top 10 --state goa --year 2022
    pub fn from_args(args: &[String]) -> Self {
        let defaults = Config::default();
        let data_dir = flag(args, "--data-dir")
            .or_else(|| env::var(DATA_DIR_ENV).ok())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let out_dir = flag(args, "--out-dir")
            .or_else(|| env::var(OUT_DIR_ENV).ok())
            .map(PathBuf::from)
            .unwrap_or(defaults.out_dir);
        let top_states = flag(args, "--top")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.top_states);
        Config {
            data_dir,
            out_dir,
            top_states,
            state: flag(args, "--state"),
            year: flag(args, "--year").and_then(|v| v.parse().ok()),
        }
    }
}

fn flag(args: &[String], name: &str) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].clone())
}
