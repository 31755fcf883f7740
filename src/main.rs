use std::sync::Arc;

use clap::Parser;
use log::{debug, info};
use tokio::net::TcpListener;

use github_repositories::{
    ConcurrentAggregator, GITHUB_API_ENDPOINT, GITHUB_API_VERSION, GitHubRestClient,
    RepositoryAggregator, StdResult, serve,
};

/// Command line arguments for the GitHub repositories service
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Address the HTTP server listens on
    #[arg(short, long, env = "LISTEN_ADDRESS", default_value = "0.0.0.0:8080")]
    listen_address: String,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = GITHUB_API_ENDPOINT)]
    github_api_url: String,

    /// Value of the X-GitHub-Api-Version header sent upstream
    #[arg(long, env = "GITHUB_API_VERSION", default_value = GITHUB_API_VERSION)]
    github_api_version: String,
}

#[tokio::main]
async fn main() -> StdResult<()> {
    env_logger::init();
    info!("Starting GitHub repositories service");
    let args = Args::parse();
    debug!("Arguments: {args:?}");

    let aggregator = build_aggregator(&args)?;
    let listener = TcpListener::bind(&args.listen_address).await?;
    serve(listener, aggregator).await?;
    info!("Service stopped");

    Ok(())
}

fn build_aggregator(args: &Args) -> StdResult<Arc<dyn RepositoryAggregator>> {
    let upstream = Arc::new(GitHubRestClient::try_new(
        &args.github_api_url,
        &args.github_api_version,
    )?);

    Ok(Arc::new(ConcurrentAggregator::new(upstream)))
}
