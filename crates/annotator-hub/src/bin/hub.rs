use annotator_hub::{server, CliArgs, HubConfig};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let args = CliArgs::parse();
    let verbose = args.verbose;

    let config = match HubConfig::resolve(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("annotator-hub: {err}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let default_level = if verbose { "annotator_hub=debug" } else { "annotator_hub=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if let Err(err) = server::run(&config).await {
        error!(%err, "hub server exited");
        return std::process::ExitCode::FAILURE;
    }

    std::process::ExitCode::SUCCESS
}
