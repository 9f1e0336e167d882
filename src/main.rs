//! ebs-sweeper: unused EBS snapshot and volume cleanup
//!
//! Scans the snapshots owned by an account and deletes the ones (and their
//! source volumes) that are no longer backed by an attached volume.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ebs_sweeper::aws::{AwsContext, Ec2Client};
use ebs_sweeper::config::ReconcileConfig;
use ebs_sweeper::reconcile::{classify, resolve, Action, Reconciler, Summary};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ebs-sweeper")]
#[command(about = "Reconcile and clean up unused EBS snapshots and volumes")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify snapshots without deleting anything
    Scan {
        /// AWS region
        #[arg(long, default_value = "us-east-2")]
        region: String,

        /// AWS profile to use (overrides AWS_PROFILE env var)
        #[arg(long)]
        aws_profile: Option<String>,

        /// Snapshot owner filter ("self" = current account)
        #[arg(long, default_value = "self")]
        owner: String,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Delete unused snapshots and volumes
    Cleanup {
        /// AWS region
        #[arg(long, default_value = "us-east-2")]
        region: String,

        /// AWS profile to use (overrides AWS_PROFILE env var)
        #[arg(long)]
        aws_profile: Option<String>,

        /// Snapshot owner filter ("self" = current account)
        #[arg(long, default_value = "self")]
        owner: String,

        /// Actually delete resources (default is dry-run)
        #[arg(long)]
        execute: bool,

        /// Maximum in-flight snapshot reconciliations
        #[arg(long, default_value = "1")]
        concurrency: usize,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print error in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();

    let _ = writeln!(stderr, "\n\x1b[1;31mError:\x1b[0m {e}");

    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  \x1b[33mCaused by:\x1b[0m {cause}");
        source = cause.source();
    }

    if std::env::var("RUST_BACKTRACE").is_err() {
        let _ = writeln!(
            stderr,
            "\n\x1b[2mSet RUST_BACKTRACE=1 for a detailed backtrace\x1b[0m"
        );
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Scan {
            region,
            aws_profile,
            owner,
            format,
        } => {
            handle_scan(region, aws_profile, owner, format).await?;
        }

        Command::Cleanup {
            region,
            aws_profile,
            owner,
            execute,
            concurrency,
            format,
        } => {
            handle_cleanup(region, aws_profile, owner, execute, concurrency, format).await?;
        }
    }

    Ok(())
}

/// Handle the scan command: classify every snapshot, mutate nothing
async fn handle_scan(
    region: String,
    aws_profile: Option<String>,
    owner: String,
    format: String,
) -> Result<()> {
    info!(region = %region, owner = %owner, "Scanning snapshots");

    let ctx = AwsContext::with_profile(&region, aws_profile.as_deref()).await;
    let ec2 = Ec2Client::from_context(&ctx);

    let snapshots = ec2.list_snapshots(&owner).await?;

    if snapshots.is_empty() {
        println!("No snapshots found owned by this account.");
        return Ok(());
    }

    let mut rows = Vec::new();
    for snapshot in &snapshots {
        let decision = match resolve(&ec2, snapshot).await {
            Ok(chain) => match classify(&chain) {
                Action::DeleteSnapshot => "delete (orphaned snapshot)".to_string(),
                Action::DeleteSnapshotAndVolume { .. } => {
                    "delete (unused snapshot and volume)".to_string()
                }
                Action::Keep { instance_id, .. } => format!("keep (attached to {instance_id})"),
            },
            Err(e) => format!("error: {e:#}"),
        };
        rows.push((snapshot, decision));
    }

    if format == "json" {
        let json_rows: Vec<_> = rows
            .iter()
            .map(|(snapshot, decision)| {
                serde_json::json!({
                    "snapshot_id": snapshot.snapshot_id,
                    "volume_id": snapshot.volume_id,
                    "start_time": snapshot.start_time.map(|t| t.to_rfc3339()),
                    "decision": decision,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json_rows)?);
    } else {
        println!(
            "{:<24} {:<24} {:<20} {}",
            "SNAPSHOT", "VOLUME", "STARTED", "DECISION"
        );
        println!("{}", "-".repeat(100));
        for (snapshot, decision) in &rows {
            println!(
                "{:<24} {:<24} {:<20} {}",
                snapshot.snapshot_id,
                snapshot.volume_id.as_deref().unwrap_or("-"),
                snapshot
                    .start_time
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                decision,
            );
        }
        println!("\nTotal: {} snapshots", rows.len());
    }

    Ok(())
}

/// Handle the cleanup command
async fn handle_cleanup(
    region: String,
    aws_profile: Option<String>,
    owner: String,
    execute: bool,
    concurrency: usize,
    format: String,
) -> Result<()> {
    let mode = if execute { "EXECUTE" } else { "DRY-RUN" };
    info!(
        region = %region,
        owner = %owner,
        mode,
        concurrency,
        "Reconciling snapshots"
    );

    let ctx = AwsContext::with_profile(&region, aws_profile.as_deref()).await;
    let ec2 = Ec2Client::from_context(&ctx);

    let config = ReconcileConfig {
        owner,
        dry_run: !execute,
        concurrency: concurrency.max(1),
    };

    let summary = Reconciler::new(ec2, config).reconcile().await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, &region, mode);
    }

    Ok(())
}

/// Print the run summary block
fn print_summary(summary: &Summary, region: &str, mode: &str) {
    println!("\n=== Cleanup Summary ===");
    println!("Mode: {}", mode);
    println!("Region: {}", region);
    println!();
    println!("Snapshots deleted: {}", summary.deleted_snapshots.len());
    println!("Volumes deleted:   {}", summary.deleted_volumes.len());
    println!("Resources kept:    {}", summary.kept.len());
    println!("Failures:          {}", summary.failures.len());

    if !summary.kept.is_empty() {
        println!();
        for kept in &summary.kept {
            println!(
                "  kept: {} -> {} (attached to {})",
                kept.snapshot_id, kept.volume_id, kept.instance_id
            );
        }
    }

    if !summary.failures.is_empty() {
        println!();
        for failure in &summary.failures {
            println!(
                "  failed: {}{}: {}",
                failure.snapshot_id,
                failure
                    .volume_id
                    .as_deref()
                    .map(|v| format!(" (volume {v})"))
                    .unwrap_or_default(),
                failure.error
            );
        }
    }

    if summary.dry_run {
        println!();
        println!("Run with --execute to actually delete resources.");
    }
}
