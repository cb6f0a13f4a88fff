//! CLI argument definitions

use clap::Parser;
use ngxdigest_core::ReportDate;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ngxdigest")]
#[command(version, about = "Daily digest of nginx error logs, grouped per project")]
pub struct Cli {
    /// Server the digest is produced for (must be listed in `servers`)
    pub server: String,

    /// Config file (default: ./ngxdigest.{toml,yaml,yml,json}, then ~/.ngxdigest/config.toml)
    #[arg(short, long, env = "NGXDIGEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Day to report on, YYYY/MM/DD (default: yesterday)
    #[arg(long, value_parser = parse_date, conflicts_with = "all_dates")]
    pub date: Option<ReportDate>,

    /// Report every day present in the logs instead of a single day
    #[arg(long)]
    pub all_dates: bool,

    /// Print the digest without delivering it
    #[arg(long)]
    pub dry_run: bool,

    /// Print a per-project summary table after the digest
    #[arg(long)]
    pub summary: bool,

    /// Output in JSON format instead of text
    #[arg(long)]
    pub json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_date(s: &str) -> Result<ReportDate, String> {
    s.parse().map_err(|e: ngxdigest_core::Error| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["ngxdigest", "web1"]).unwrap();
        assert_eq!(cli.server, "web1");
        assert!(cli.date.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_parse_date() {
        let cli = Cli::try_parse_from(["ngxdigest", "web1", "--date", "2018/03/18"]).unwrap();
        assert_eq!(cli.date.unwrap().token(), "2018/03/18");

        assert!(Cli::try_parse_from(["ngxdigest", "web1", "--date", "yesterday"]).is_err());
    }

    #[test]
    fn test_date_conflicts_with_all_dates() {
        let result = Cli::try_parse_from(["ngxdigest", "web1", "--date", "2018/03/18", "--all-dates"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_server_required() {
        assert!(Cli::try_parse_from(["ngxdigest"]).is_err());
    }
}
