//! Command-line interface definitions and argument parsing

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Interactive EDA dashboard for travel package purchase data
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file
    #[arg(short, long, default_value = "Traveling_Dataset.csv")]
    pub input: PathBuf,

    /// Address the dashboard listens on
    #[arg(short, long, default_value = "127.0.0.1:8501")]
    pub bind: SocketAddr,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Default log directive when `RUST_LOG` is not set
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["tourlens"]).unwrap();
        assert_eq!(args.input, PathBuf::from("Traveling_Dataset.csv"));
        assert_eq!(args.bind, "127.0.0.1:8501".parse::<SocketAddr>().unwrap());
        assert_eq!(args.log_level(), "info");
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from(["tourlens", "-i", "trips.csv", "--bind", "0.0.0.0:9000", "-v"]).unwrap();
        assert_eq!(args.input, PathBuf::from("trips.csv"));
        assert_eq!(args.bind.port(), 9000);
        assert_eq!(args.log_level(), "debug");

        assert!(Args::try_parse_from(["tourlens", "--bind", "not-an-address"]).is_err());
    }
}
