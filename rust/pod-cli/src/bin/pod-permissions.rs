use anyhow::Result;
use clap::Parser;
use pod_cli::{PermissionsCli, run};
use pod_fetch::HttpFetch;
use tracing_subscriber::EnvFilter;

#[tokio::main]
pub async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = PermissionsCli::parse();
    let fetch = HttpFetch::new(cli.fetch_config());

    run(
        &cli.command,
        cli.policies_container()?,
        fetch,
        &mut std::io::stdout(),
    )
    .await
}
