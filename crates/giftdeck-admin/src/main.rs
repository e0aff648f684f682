//! Giftdeck Admin - Referral rank provisioning and maintenance
//!
//! One-shot administrative runs against the Firestore document store, or
//! against a local JSON snapshot with `--snapshot`.

mod adapters;
mod application;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use giftdeck::{AccountRepository, RankRepository};

use adapters::{
    FirestoreAccountRepository, FirestoreClient, FirestoreRankRepository, InMemoryStore, Snapshot,
};
use application::{
    AuditReport, LinkSummary, ProvisionSummary, ReferralAuditor, ReferralLinkService,
    ReferralProvisioner,
};
use config::{Config, ENV_APP_BASE_URL};

#[derive(Parser)]
#[command(name = "giftdeck-admin")]
#[command(about = "Giftdeck admin - referral rank provisioning", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.config/giftdeck/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Run against a local JSON snapshot instead of Firestore
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ensure every business account has a referral rank
    Provision {
        /// Report what would be created without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Report missing, duplicated and orphaned referral ranks
    Audit,

    /// Fill empty signup links and QR code URLs on referral ranks
    Links {
        /// Portal base URL (overrides app_base_url from config)
        #[arg(long)]
        base_url: Option<String>,
        /// Report what would be updated without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Show effective configuration
    Config,
}

impl Commands {
    fn writes(&self) -> bool {
        match self {
            Commands::Provision { dry_run } | Commands::Links { dry_run, .. } => !dry_run,
            Commands::Audit | Commands::Config => false,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    let config = Config::load(&config_path)?;

    if let Commands::Config = cli.command {
        return cmd_config(&config, &config_path);
    }

    match &cli.snapshot {
        Some(path) => {
            let store = Arc::new(InMemoryStore::from_snapshot(Snapshot::load(path)?));
            tracing::info!("Using snapshot store {:?}", path);

            dispatch(&cli.command, &config, &config_path, store.clone(), store.clone()).await?;

            if cli.command.writes() {
                store.snapshot().await.save(path)?;
                println!("{} Snapshot saved to {:?}", "✓".green(), path);
            }
        }
        None => {
            let client = Arc::new(
                FirestoreClient::new(&config.firestore)
                    .context("Firestore is not configured (set firestore.project_id)")?,
            );
            let accounts = Arc::new(FirestoreAccountRepository::new(
                client.clone(),
                &config.collections.accounts,
            ));
            let ranks = Arc::new(FirestoreRankRepository::new(
                client,
                &config.collections.ranks,
            ));
            tracing::info!(
                "Using Firestore collections '{}' and '{}'",
                config.collections.accounts,
                config.collections.ranks
            );

            dispatch(&cli.command, &config, &config_path, accounts, ranks).await?;
        }
    }

    Ok(())
}

async fn dispatch<A, R>(
    command: &Commands,
    config: &Config,
    config_path: &Path,
    accounts: Arc<A>,
    ranks: Arc<R>,
) -> Result<()>
where
    A: AccountRepository,
    R: RankRepository,
{
    match command {
        Commands::Provision { dry_run } => cmd_provision(accounts, ranks, *dry_run).await,
        Commands::Audit => cmd_audit(accounts, ranks).await,
        Commands::Links { base_url, dry_run } => {
            let base_url = base_url
                .clone()
                .or_else(|| config.app_base_url.clone())
                .with_context(|| {
                    format!(
                        "No portal URL. Pass --base-url, set app_base_url or {}",
                        ENV_APP_BASE_URL
                    )
                })?;
            cmd_links(ranks, &base_url, *dry_run).await
        }
        Commands::Config => cmd_config(config, config_path),
    }
}

async fn cmd_provision<A, R>(accounts: Arc<A>, ranks: Arc<R>, dry_run: bool) -> Result<()>
where
    A: AccountRepository,
    R: RankRepository,
{
    let summary = ReferralProvisioner::new(accounts, ranks)
        .with_dry_run(dry_run)
        .provision_all()
        .await
        .context("Could not list business accounts")?;

    print_provision_summary(&summary);
    Ok(())
}

async fn cmd_audit<A, R>(accounts: Arc<A>, ranks: Arc<R>) -> Result<()>
where
    A: AccountRepository,
    R: RankRepository,
{
    let report = ReferralAuditor::new(accounts, ranks)
        .audit()
        .await
        .context("Audit failed")?;

    print_audit_report(&report);
    Ok(())
}

async fn cmd_links<R: RankRepository>(ranks: Arc<R>, base_url: &str, dry_run: bool) -> Result<()> {
    let summary = ReferralLinkService::new(ranks)
        .with_dry_run(dry_run)
        .fill_links(base_url)
        .await
        .context("Link fill failed")?;

    print_link_summary(&summary);
    Ok(())
}

fn cmd_config(config: &Config, path: &Path) -> Result<()> {
    let rendered =
        toml::to_string_pretty(&config.masked()).context("Failed to serialize config")?;

    let status = if path.exists() { "" } else { " (not found, defaults)" };
    println!("{} {:?}{}", "Config file:".bold(), path, status.dimmed());
    println!("{}", rendered);
    Ok(())
}

fn print_provision_summary(summary: &ProvisionSummary) {
    let title = if summary.dry_run {
        "Referral provisioning (dry run):"
    } else {
        "Referral provisioning:"
    };
    let created_label = if summary.dry_run { "would create" } else { "created" };

    println!("{}", title.bold());
    println!("  {:<14} {}", "businesses", summary.total);
    println!(
        "  {:<14} {}",
        created_label,
        summary.created.to_string().green()
    );
    println!("  {:<14} {}", "skipped", summary.skipped.to_string().dimmed());

    let failed = summary.failed();
    if failed > 0 {
        println!("  {:<14} {}", "failed", failed.to_string().red());
        for failure in &summary.failures {
            println!(
                "    {} {}",
                failure.business_id.cyan(),
                failure.error.dimmed()
            );
        }
    } else {
        println!("  {:<14} {}", "failed", "0".green());
    }
}

fn print_audit_report(report: &AuditReport) {
    println!("{}", "Referral audit:".bold());
    println!(
        "  {} business accounts, {} referral ranks",
        report.business_count, report.rank_count
    );

    if report.is_clean() {
        println!("{} Every business has exactly one referral rank", "✓".green());
        return;
    }

    if !report.missing.is_empty() {
        println!("\n{}", "Missing referral rank:".yellow());
        for business_id in &report.missing {
            println!("  {}", business_id.cyan());
        }
    }

    if !report.duplicates.is_empty() {
        println!("\n{}", "Duplicate referral ranks:".red());
        for dup in &report.duplicates {
            println!("  {} {}", dup.business_id.cyan(), dup.rank_ids.join(", ").dimmed());
        }
    }

    if !report.orphaned.is_empty() {
        println!("\n{}", "Ranks without a business account:".yellow());
        for rank_id in &report.orphaned {
            println!("  {}", rank_id.dimmed());
        }
    }

    if !report.missing.is_empty() {
        println!("\n{}", "Fix missing ranks with:".dimmed());
        println!("  giftdeck-admin provision");
    }
}

fn print_link_summary(summary: &LinkSummary) {
    let title = if summary.dry_run {
        "Referral links (dry run):"
    } else {
        "Referral links:"
    };

    println!("{}", title.bold());
    println!("  {:<12} {}", "ranks", summary.total);
    println!("  {:<12} {}", "updated", summary.updated.to_string().green());
    println!(
        "  {:<12} {}",
        "already set",
        summary.already_set.to_string().dimmed()
    );

    if summary.failures.is_empty() {
        println!("  {:<12} {}", "failed", "0".green());
    } else {
        println!("  {:<12} {}", "failed", summary.failures.len().to_string().red());
        for failure in &summary.failures {
            println!(
                "    {} ({}) {}",
                failure.rank_id.cyan(),
                failure.business_id,
                failure.error.dimmed()
            );
        }
    }
}
