use anyhow::Context;
use auth_identity::RestIdentityProvider;
use auth_permissions::{PermissionAuthority, PostgresDataSource};
use clap::Parser;
use database_layer::DataSourceRegistry;
use ops_cli::{commands, logging, Cli, CliConfig};
use std::sync::Arc;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    logging::init_tracing(cli.verbose, cli.json_logs)
        .context("Failed to initialize logging")?;

    info!("permctl {}", env!("CARGO_PKG_VERSION"));

    let config = CliConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let (authority, registry) = build_authority(&config, &cli).await?;

    let result = commands::execute(&authority, &cli.command).await;
    registry.close_all().await;
    let outcome = result?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", outcome);
    }

    Ok(())
}

async fn build_authority(
    config: &CliConfig,
    cli: &Cli,
) -> anyhow::Result<(PermissionAuthority, DataSourceRegistry)> {
    debug!("Configured data sources: {}", config.datasources.len());
    let registry = DataSourceRegistry::from_configs(&config.datasources)
        .await
        .context("Failed to open data sources")?;

    let mut builder = PermissionAuthority::builder()
        .data_source(Arc::new(PostgresDataSource::new(registry.clone())))
        .config(config.permissions.clone());

    if cli.command.resolves_users() {
        let identity = config
            .identity
            .as_ref()
            .context("`check` requires an `identity` section in the configuration")?;
        let provider = RestIdentityProvider::new(identity)?;
        builder = builder.identity_provider(Arc::new(provider));
    }

    Ok((builder.build(), registry))
}
