//! Implementation of the `poolctl delete` command.

use anyhow::Result;
use clap::Args;

use crate::cli::output::output;
use crate::domain::models::{PoolSpec, TargetState};

use super::{build_reconciler, load_settings, resolve_token, ConnectionArgs, ReportOutput, WaitArgs};

/// Identity of the pool to remove.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Connection and identity flags.
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Pool name, the identity used to locate the live resource
    #[arg(long)]
    pub name: String,

    /// Convergence wait flags.
    #[command(flatten)]
    pub wait: WaitArgs,

    /// Report whether the pool exists without deleting anything
    #[arg(long)]
    pub check: bool,
}

/// Remove the named pool and wait for it to disappear.
pub async fn execute(args: DeleteArgs, json_mode: bool) -> Result<()> {
    let settings = load_settings(&args.connection)?;
    let token = resolve_token(&args.connection, &settings)?;

    // Deletion only needs the pool's identity; sizing fields never reach
    // the backend on this path.
    let mut spec = PoolSpec::new(
        args.connection.region.clone(),
        String::new(),
        args.connection.cluster_id.clone(),
        args.name.clone(),
        String::new(),
    );
    spec.wait = args.wait.resolve(&settings);

    let reconciler = build_reconciler(&settings, token)?;
    let report = reconciler
        .reconcile(&spec, TargetState::Absent, args.check)
        .await?;

    output(&ReportOutput::new(spec.name, report), json_mode);
    Ok(())
}
