use std::path::PathBuf;

use anyhow::{Context, Result};
use blobthumb_function::{host, init_tracing, run_events, HostState, ThumbnailPipeline};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "blobthumb")]
#[command(about = "Create thumbnails for images uploaded to Azure Blob Storage", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the Azure Functions custom handler protocol
    Serve {
        /// Port assigned by the functions host
        #[arg(long, env = "FUNCTIONS_CUSTOMHANDLER_PORT", default_value_t = 3000)]
        port: u16,
    },
    /// Handle the events in a JSON file (one event or an array) and exit
    Run {
        #[arg(long)]
        event: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => host::serve(HostState::from_env(), port).await,
        Commands::Run { event } => run(event).await,
    }
}

async fn run(path: PathBuf) -> Result<()> {
    let json = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let pipeline = ThumbnailPipeline::from_env()?;

    run_events(&pipeline, &json, &mut std::io::stdout()).await?;
    Ok(())
}
