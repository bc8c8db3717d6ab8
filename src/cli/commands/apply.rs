//! Implementation of the `poolctl apply` command.

use anyhow::Result;
use clap::Args;

use crate::cli::output::output;
use crate::domain::models::{PoolSpec, Scaling, TargetState};
use crate::infrastructure::config::Settings;

use super::{build_reconciler, load_settings, resolve_token, ConnectionArgs, ReportOutput, WaitArgs};

/// Declarative spec for one node pool, as flags.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Connection and identity flags.
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Pool name, the identity used to locate the live resource
    #[arg(long)]
    pub name: String,

    /// Project owning the pool
    #[arg(long)]
    pub project_id: String,

    /// Commercial node type, e.g. DEV1-M
    #[arg(long)]
    pub node_type: String,

    /// Fixed node count (incompatible with --autoscaling)
    #[arg(long, conflicts_with = "autoscaling")]
    pub size: Option<u64>,

    /// Delegate sizing to the cluster autoscaler
    #[arg(long)]
    pub autoscaling: bool,

    /// Autoscaler lower bound (requires --autoscaling)
    #[arg(long, requires = "autoscaling")]
    pub min_size: Option<u64>,

    /// Autoscaler upper bound (requires --autoscaling)
    #[arg(long, requires = "autoscaling")]
    pub max_size: Option<u64>,

    /// Container runtime for the nodes
    #[arg(long, default_value = "containerd")]
    pub container_runtime: String,

    /// Root volume class
    #[arg(long, default_value = "l_ssd")]
    pub root_volume_type: String,

    /// Root volume size in gigabytes
    #[arg(long)]
    pub root_volume_size: Option<u64>,

    /// Replace unhealthy nodes automatically
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub autohealing: bool,

    /// Create nodes without a public IP
    #[arg(long)]
    pub public_ip_disabled: bool,

    /// Labels attached to the pool (comma separated or repeated)
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Convergence wait flags.
    #[command(flatten)]
    pub wait: WaitArgs,

    /// Report what would change without mutating anything
    #[arg(long)]
    pub check: bool,
}

impl ApplyArgs {
    /// Assemble the declarative spec from flags and loaded settings.
    fn to_spec(&self, settings: &Settings) -> PoolSpec {
        let mut spec = PoolSpec::new(
            self.connection.region.clone(),
            self.project_id.clone(),
            self.connection.cluster_id.clone(),
            self.name.clone(),
            self.node_type.clone(),
        );
        spec.scaling = if self.autoscaling {
            Scaling::Autoscaling {
                min_size: self.min_size,
                max_size: self.max_size,
            }
        } else {
            Scaling::Fixed { size: self.size }
        };
        spec.container_runtime = self.container_runtime.clone();
        spec.root_volume_type = self.root_volume_type.clone();
        spec.root_volume_size = self.root_volume_size;
        spec.autohealing = self.autohealing;
        spec.public_ip_disabled = self.public_ip_disabled;
        spec.tags = self.tags.clone();
        spec.wait = self.wait.resolve(settings);
        spec
    }
}

/// Converge the named pool toward the declared spec.
pub async fn execute(args: ApplyArgs, json_mode: bool) -> Result<()> {
    let settings = load_settings(&args.connection)?;
    let token = resolve_token(&args.connection, &settings)?;
    let spec = args.to_spec(&settings);

    let reconciler = build_reconciler(&settings, token)?;
    let report = reconciler
        .reconcile(&spec, TargetState::Present, args.check)
        .await?;

    output(&ReportOutput::new(spec.name, report), json_mode);
    Ok(())
}
