use crate::cli::{Command, ContainerDeleteArgs, MqCreateArgs, VersionCreateArgs};
use crate::output::{Outcome, Output};
use anyhow::Context;
use mqf::Fabric;
use mqf::domain::{DecommissionResult, ProvisioningResult};
use serde_json::json;
use tracing::info;

/// Runs one command against `fabric` and prints its result.
///
/// # Errors
/// Whole-command failures (invalid input, profile or registry errors). Per-target
/// failures are printed and reported as [`Outcome::Partial`].
pub(crate) async fn execute(fabric: &Fabric, command: &Command, out: &mut Output) -> anyhow::Result<Outcome> {
    match command {
        Command::MqCreate(args) => mq_create(fabric, args, out).await,
        Command::ContainerDelete(args) => container_delete(fabric, args, out).await,
        Command::VersionCreate(args) => version_create(fabric, args, out).await,
        Command::Shell => {
            out.note("Already in a shell")?;
            Ok(Outcome::Clean)
        },
    }
}

async fn mq_create(fabric: &Fabric, args: &MqCreateArgs, out: &mut Output) -> anyhow::Result<Outcome> {
    let cfg = args.to_config()?;
    let result = fabric
        .provision(&cfg)
        .await
        .with_context(|| format!("Failed to provision broker '{}'", cfg.broker_name()))?;
    info!(profile = %result.profile_id, created = result.created.len(), "mq-create finished");

    if out.is_json() {
        out.json(&result)?;
    } else {
        print_provisioning(&result, cfg.version_or(fabric.default_version()), out)?;
    }
    Ok(if result.is_success() { Outcome::Clean } else { Outcome::Partial })
}

fn print_provisioning(result: &ProvisioningResult, version: &str, out: &mut Output) -> anyhow::Result<()> {
    out.line(format!("MQ profile {} ready in version {version}", result.profile_id))?;
    if !result.created.is_empty() {
        out.line(format!("Containers: {}", result.created.join(", ")))?;
    }
    for failure in &result.failures {
        out.line(format!("Failed: {failure}"))?;
    }
    Ok(())
}

async fn container_delete(
    fabric: &Fabric,
    args: &ContainerDeleteArgs,
    out: &mut Output,
) -> anyhow::Result<Outcome> {
    let result = if args.versions.is_empty() {
        fabric.destroy_everywhere(&args.id).await
    } else {
        fabric.destroy(&args.id, &args.versions).await
    }
    .with_context(|| format!("Failed to delete container '{}'", args.id))?;

    if out.is_json() {
        out.json(&result)?;
    } else {
        print_decommission(&result, out)?;
    }
    Ok(if result.is_clean() { Outcome::Clean } else { Outcome::Partial })
}

fn print_decommission(result: &DecommissionResult, out: &mut Output) -> anyhow::Result<()> {
    if let Some(stop) = &result.stop_failure {
        out.line(format!("Stop failed: {stop}"))?;
    }
    for path in &result.removed_paths {
        out.line(format!("Removed {path}"))?;
    }
    for failure in &result.failures {
        out.line(format!("Failed: {failure}"))?;
    }
    if result.is_clean() {
        out.line(format!("Container {} deleted", result.container_id))?;
    }
    Ok(())
}

async fn version_create(
    fabric: &Fabric,
    args: &VersionCreateArgs,
    out: &mut Output,
) -> anyhow::Result<Outcome> {
    fabric
        .create_version(&args.version, args.parent.as_deref())
        .await
        .with_context(|| format!("Failed to create version '{}'", args.version))?;

    if out.is_json() {
        out.json(&json!({ "version": args.version, "parent": args.parent }))?;
    } else {
        out.line(format!("Version {} created", args.version))?;
    }
    Ok(Outcome::Clean)
}
