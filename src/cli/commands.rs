//! CLI commands and argument parsing

use crate::types::{QueryValue, Resource, TimeFilter};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// MDS Provider API client
#[derive(Parser, Debug)]
#[command(name = "mds-client")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Provider registry file (YAML)
    #[arg(short, long, global = true)]
    pub registry: Option<PathBuf>,

    /// Provider name or id from the registry
    #[arg(short, long, global = true)]
    pub provider: Option<String>,

    /// MDS version to request (defaults to the minimum supported)
    #[arg(long = "mds-version", global = true)]
    pub mds_version: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch status changes
    StatusChanges {
        /// Events at or after this time (RFC 3339 or unix timestamp)
        #[arg(long, value_parser = parse_time)]
        start_time: Option<TimeFilter>,

        /// Events before this time (RFC 3339 or unix timestamp)
        #[arg(long, value_parser = parse_time)]
        end_time: Option<TimeFilter>,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Fetch trips
    Trips {
        /// Trips taken by this device
        #[arg(long)]
        device_id: Option<String>,

        /// Trips taken by this vehicle
        #[arg(long)]
        vehicle_id: Option<String>,

        /// Trips ending at or after this time (RFC 3339 or unix timestamp)
        #[arg(long, value_parser = parse_time)]
        min_end_time: Option<TimeFilter>,

        /// Trips ending before this time (RFC 3339 or unix timestamp)
        #[arg(long, value_parser = parse_time)]
        max_end_time: Option<TimeFilter>,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Print an INSERT ... SELECT statement for a staging table
    Sql {
        /// Destination resource
        #[arg(value_parser = parse_resource)]
        resource: Resource,

        /// Staging table to read from
        #[arg(long)]
        source: String,

        /// Destination table (defaults to the resource name)
        #[arg(long)]
        dest: Option<String>,

        /// Conflict target, e.g. "(provider_id, trip_id)"
        #[arg(long)]
        on_conflict: Option<String>,

        /// Update assignment on conflict (repeatable)
        #[arg(long = "set", value_name = "COL=EXPR", value_parser = parse_assignment, requires = "on_conflict")]
        assignments: Vec<(String, String)>,
    },

    /// List registered providers
    Providers,
}

/// Paging options shared by the fetch commands
#[derive(Args, Debug, Clone, Default)]
pub struct FetchArgs {
    /// Request only the first page
    #[arg(long)]
    pub no_paging: bool,

    /// Seconds to wait between page requests
    #[arg(long, default_value = "0")]
    pub rate_limit: u64,

    /// Extra query parameter (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, QueryValue)>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}

fn parse_time(s: &str) -> Result<TimeFilter, String> {
    s.parse().map_err(|e: crate::error::Error| e.to_string())
}

fn parse_resource(s: &str) -> Result<Resource, String> {
    s.parse().map_err(|e: crate::error::Error| e.to_string())
}

fn split_pair(s: &str) -> Result<(&str, &str), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))
}

pub(crate) fn parse_param(s: &str) -> Result<(String, QueryValue), String> {
    let (key, value) = split_pair(s)?;
    let value = match value.parse::<i64>() {
        Ok(n) => QueryValue::Int(n),
        Err(_) => QueryValue::from(value),
    };
    Ok((key.to_string(), value))
}

pub(crate) fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (column, expr) = split_pair(s)?;
    Ok((column.to_string(), expr.to_string()))
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
    fn test_parse_trips_command() {
        let cli = Cli::try_parse_from([
            "mds-client",
            "--provider",
            "lime",
            "trips",
            "--min-end-time",
            "2018-08-01T00:00:00Z",
            "--device-id",
            "abc",
            "--param",
            "limit=100",
            "--no-paging",
        ])
        .unwrap();

        assert_eq!(cli.provider.as_deref(), Some("lime"));
        match cli.command {
            Commands::Trips {
                device_id,
                min_end_time,
                fetch,
                ..
            } => {
                assert_eq!(device_id.as_deref(), Some("abc"));
                assert!(matches!(min_end_time, Some(TimeFilter::At(_))));
                assert!(fetch.no_paging);
                assert_eq!(
                    fetch.params,
                    vec![("limit".to_string(), QueryValue::Int(100))]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_sql_command() {
        let cli = Cli::try_parse_from([
            "mds-client",
            "sql",
            "status-changes",
            "--source",
            "staging",
            "--on-conflict",
            "(device_id, event_time)",
            "--set",
            "battery_pct=EXCLUDED.battery_pct",
        ])
        .unwrap();

        match cli.command {
            Commands::Sql {
                resource,
                source,
                assignments,
                ..
            } => {
                assert_eq!(resource, Resource::StatusChanges);
                assert_eq!(source, "staging");
                assert_eq!(
                    assignments,
                    vec![(
                        "battery_pct".to_string(),
                        "EXCLUDED.battery_pct".to_string()
                    )]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_set_requires_on_conflict() {
        let result = Cli::try_parse_from([
            "mds-client",
            "sql",
            "trips",
            "--source",
            "staging",
            "--set",
            "a=b",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_param_values() {
        assert_eq!(
            parse_param("event_type=available").unwrap(),
            ("event_type".to_string(), QueryValue::from("available"))
        );
        assert_eq!(
            parse_param("limit = 5").unwrap(),
            ("limit".to_string(), QueryValue::Int(5))
        );
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }
}
