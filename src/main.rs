//! poolctl CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use poolctl::cli::{Cli, Commands};

// One reconciliation per invocation, strictly sequential; a single thread
// is all the runtime this needs.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Apply(args) => poolctl::cli::commands::apply::execute(args, cli.json).await,
        Commands::Delete(args) => poolctl::cli::commands::delete::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        poolctl::cli::handle_error(err, cli.json);
    }
}
