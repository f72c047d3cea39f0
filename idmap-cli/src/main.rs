use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(
    name = "idmap",
    about = "Affiliation search and PMID to PMCID conversion for NCBI",
    long_about = "Find every PubMed paper affiliated with an institution, then map the PubMed IDs to PubMed Central IDs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// API key for NCBI E-utilities (required for search)
    #[arg(long, env = "NCBI_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Contact email for NCBI requests (required for search)
    #[arg(long, env = "NCBI_EMAIL", global = true)]
    email: Option<String>,

    /// Tool name for NCBI requests
    #[arg(long, env = "NCBI_TOOL", default_value = "idmap", global = true)]
    tool: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Search PubMed for papers matching the approved affiliation variants
    Search(commands::search::Search),
    /// Convert a file of PMIDs to PMCIDs
    Convert(commands::convert::Convert),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Credentials may live in a local .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing with indicatif layer for progress spinners
    let filter = if cli.verbose { "debug" } else { "info" };

    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(indicatif_layer.get_stderr_writer()),
        )
        .with(indicatif_layer)
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let api_key = cli.api_key.as_deref();
    let email = cli.email.as_deref();
    let tool = &cli.tool;

    match &cli.command {
        Commands::Search(cmd) => cmd.execute_with_config(api_key, email, tool).await,
        Commands::Convert(cmd) => cmd.execute_with_config(api_key, email, tool).await,
    }
}
