//! CLI runner - executes commands

use crate::auth::AuthMode;
use crate::cli::commands::{Cli, Commands, FetchArgs, OutputFormat};
use crate::client::{ProviderClient, StatusChangesQuery, TripsQuery};
use crate::error::{Error, Result};
use crate::pagination::{FetchOptions, PageStream};
use crate::provider::{load_registry, Provider, ProviderRegistry};
use crate::sql::{insert_from, OnConflict};
use crate::types::QueryParams;
use futures::TryStreamExt;
use serde_json::{json, Value};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::StatusChanges {
                start_time,
                end_time,
                fetch,
            } => {
                let mut query = StatusChangesQuery::new();
                query.start_time = *start_time;
                query.end_time = *end_time;
                (query.options, query.extra) = fetch_settings(fetch);

                let client = self.client()?;
                self.emit_pages(client.status_changes(&query)?).await
            }
            Commands::Trips {
                device_id,
                vehicle_id,
                min_end_time,
                max_end_time,
                fetch,
            } => {
                let mut query = TripsQuery::new();
                query.device_id.clone_from(device_id);
                query.vehicle_id.clone_from(vehicle_id);
                query.min_end_time = *min_end_time;
                query.max_end_time = *max_end_time;
                (query.options, query.extra) = fetch_settings(fetch);

                let client = self.client()?;
                self.emit_pages(client.trips(&query)?).await
            }
            Commands::Sql {
                resource,
                source,
                dest,
                on_conflict,
                assignments,
            } => {
                let directive = build_on_conflict(on_conflict.as_deref(), assignments)?;
                println!(
                    "{}",
                    insert_from(*resource, source, dest.as_deref(), directive.as_ref())
                );
                Ok(())
            }
            Commands::Providers => self.list_providers(),
        }
    }

    /// Load the provider registry
    fn load_registry(&self) -> Result<ProviderRegistry> {
        let path = self
            .cli
            .registry
            .as_ref()
            .ok_or_else(|| Error::config("Provider registry not specified (use -r flag)"))?;
        load_registry(path)
    }

    /// Resolve the provider selected with `--provider`
    fn selected_provider(&self) -> Result<Provider> {
        let name = self
            .cli
            .provider
            .as_deref()
            .ok_or_else(|| Error::config("Provider not specified (use -p flag)"))?;
        let registry = self.load_registry()?;
        registry.get(name).cloned()
    }

    /// Build a client for the selected provider and version
    fn client(&self) -> Result<ProviderClient> {
        let mut builder = ProviderClient::builder().provider(self.selected_provider()?);
        if let Some(version) = &self.cli.mds_version {
            builder = builder.version(version);
        }
        builder.build()
    }

    /// Print each page as it arrives
    async fn emit_pages(&self, mut pages: PageStream) -> Result<()> {
        let mut count = 0usize;
        while let Some(page) = pages.try_next().await? {
            self.output_message(page.as_value());
            count += 1;
        }
        info!("Wrote {} pages", count);
        Ok(())
    }

    /// List registered providers, without credentials
    fn list_providers(&self) -> Result<()> {
        let registry = self.load_registry()?;

        let providers: Vec<Value> = registry
            .providers
            .iter()
            .map(|provider| {
                json!({
                    "name": provider.name,
                    "provider_id": provider.provider_id,
                    "mds_api_url": provider.api_url,
                    "mds_api_suffix": provider.api_suffix,
                    "auth": AuthMode::from(&provider.auth),
                })
            })
            .collect();

        self.output_message(&json!({ "providers": providers }));
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Paging options and passthrough parameters from the shared flags
fn fetch_settings(fetch: &FetchArgs) -> (FetchOptions, QueryParams) {
    let options = FetchOptions::new()
        .paging(!fetch.no_paging)
        .rate_limit_secs(fetch.rate_limit);
    let params = fetch.params.iter().cloned().collect();
    (options, params)
}

/// Combine `--on-conflict` and `--set` into a directive
fn build_on_conflict(
    condition: Option<&str>,
    assignments: &[(String, String)],
) -> Result<Option<OnConflict>> {
    match condition {
        None => Ok(None),
        Some(_) if assignments.is_empty() => Err(Error::config(
            "--on-conflict needs at least one --set assignment",
        )),
        Some(condition) => Ok(Some(OnConflict::with_assignments(
            condition,
            assignments.iter().cloned(),
        ))),
    }
}
