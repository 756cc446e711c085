//! # RESO Seed Entry Point
//!
//! Command-line front end for the seeding routines. Each subcommand runs one
//! routine against the configured local database; `all` runs them in order.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reso_seed::{
    config::{AppConfig, ConfigLoader},
    db, schema,
    seeds::{self, lookup_backfill},
    sync::{COPY_ORDER, CollectionCopier, connect_source},
    telemetry,
    tenants::TenantDirectory,
};
use sea_orm::DatabaseConnection;

#[derive(Debug, Parser)]
#[command(name = "reso-seed", version, about = "Seed a RESO reference dataset")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create every catalog collection and its unique key index
    InitSchema,
    /// Replace the tenant configuration collection with the built-in tenants
    SeedTenants,
    /// Copy reference collections from the remote source or blob fallback
    Copy {
        /// Copy only these collections (repeatable); defaults to all
        #[arg(long = "collection", value_name = "NAME")]
        collections: Vec<String>,
    },
    /// Load lookup values from a metadata report
    LoadLookups {
        /// Metadata report to read; overrides the tenant's report
        #[arg(long, value_name = "PATH")]
        metadata_report: Option<PathBuf>,
        /// Tenant whose metadata report should be used
        #[arg(long, value_name = "ID")]
        tenant: Option<String>,
    },
    /// Add placeholder lookups for names with no lookup values
    BackfillLookups {
        /// Report what would be created without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// List the active tenant configurations
    Tenants,
    /// Initialize schema, seed tenants, copy collections, and load lookups
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::new()
        .load()
        .context("loading configuration")?;
    telemetry::init_tracing(&config).context("initializing telemetry")?;

    log::info!("Loaded configuration for profile: {}", config.profile);
    if let Ok(redacted_json) = config.redacted_json() {
        log::debug!("Configuration: {}", redacted_json);
    }

    let db = db::init_pool(&config)
        .await
        .context("initializing database connection pool")?;

    match cli.command {
        Command::InitSchema => init_schema(&db).await,
        Command::SeedTenants => seed_tenants(&db).await,
        Command::Copy { collections } => copy(&db, &config, &collections).await,
        Command::LoadLookups {
            metadata_report,
            tenant,
        } => load_lookups(&db, &config, metadata_report, tenant.as_deref()).await,
        Command::BackfillLookups { dry_run } => backfill_lookups(&db, &config, dry_run).await,
        Command::Tenants => list_tenants(&db, &config).await,
        Command::All => {
            init_schema(&db).await?;
            seed_tenants(&db).await?;
            copy(&db, &config, &[]).await?;
            load_lookups(&db, &config, None, None).await
        }
    }
}

async fn init_schema(db: &DatabaseConnection) -> Result<()> {
    let collections = schema::initialize_schema(db)
        .await
        .context("initializing schema")?;
    let gaps = schema::verify_schema(db)
        .await
        .context("verifying schema")?;
    if !gaps.is_empty() {
        anyhow::bail!("schema incomplete after initialization: {:?}", gaps);
    }
    println!("Initialized {} collections.", collections.len());
    Ok(())
}

async fn seed_tenants(db: &DatabaseConnection) -> Result<()> {
    let created = seeds::seed_tenant_configs(db)
        .await
        .context("seeding tenant configurations")?;
    println!("Created {} tenant configuration(s).", created);
    Ok(())
}

async fn copy(db: &DatabaseConnection, config: &AppConfig, collections: &[String]) -> Result<()> {
    let connection = connect_source(config).await;
    let copier = CollectionCopier::from_config(Arc::new(db.clone()), connection, config)
        .context("building fallback HTTP client")?;

    let names: Vec<&str> = if collections.is_empty() {
        COPY_ORDER.to_vec()
    } else {
        collections.iter().map(String::as_str).collect()
    };

    let outcomes = copier
        .copy_all(&names)
        .await
        .context("copying reference collections")?;
    for outcome in &outcomes {
        println!(
            "{:<32} {:>8} fetched {:>8} inserted ({:?})",
            outcome.collection, outcome.fetched, outcome.inserted, outcome.origin
        );
    }
    Ok(())
}

async fn load_lookups(
    db: &DatabaseConnection,
    config: &AppConfig,
    metadata_report: Option<PathBuf>,
    tenant: Option<&str>,
) -> Result<()> {
    let path = match (metadata_report, tenant) {
        (Some(path), _) => path,
        (None, Some(_)) => {
            let directory = TenantDirectory::load(db, config).await;
            PathBuf::from(&directory.resolve(tenant).metadata_file_path)
        }
        (None, None) => config.metadata_report_path.clone(),
    };

    let summary = seeds::load_lookups(db, &path, &config.certification_report_ids)
        .await
        .with_context(|| format!("loading lookups from {}", path.display()))?;
    println!(
        "Inserted {} lookup document(s) from {} entries in {}.",
        summary.inserted,
        summary.entries,
        summary.report_path.display()
    );
    Ok(())
}

async fn backfill_lookups(db: &DatabaseConnection, config: &AppConfig, dry_run: bool) -> Result<()> {
    let placeholders =
        lookup_backfill::bundled_placeholders().context("reading bundled placeholder lookups")?;
    let summary = seeds::backfill_missing_lookups(
        db,
        &placeholders,
        &config.certification_report_ids,
        dry_run,
    )
    .await
    .context("backfilling missing lookups")?;

    for (name, values) in &summary.created {
        println!("{}: {}", name, values.join(", "));
    }
    if dry_run {
        println!(
            "Dry run: {} lookup name(s) would be added, {} already present.",
            summary.created.len(),
            summary.skipped.len()
        );
    } else {
        println!(
            "Added {} lookup name(s) with {} document(s); {} already present.",
            summary.created.len(),
            summary.inserted,
            summary.skipped.len()
        );
    }
    Ok(())
}

async fn list_tenants(db: &DatabaseConnection, config: &AppConfig) -> Result<()> {
    let directory = TenantDirectory::load(db, config).await;
    for tenant in directory.all() {
        println!(
            "{:<14} {:<16} {:<48} {}",
            tenant.tenant_id,
            tenant.lookup_type.as_str(),
            tenant.metadata_file_path,
            tenant.friendly_name
        );
    }
    Ok(())
}
