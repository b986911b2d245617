use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hta_harvester::config::{DEFAULT_MAX_RESPONSE_SIZE, HTTP_TIMEOUT_SECS};
use hta_harvester::extract::install_panic_hook;
use hta_harvester::HarvestOptions;
use hta_pipeline::{execute_summary, OpenAiClient, PipelineError, SummaryConfig, SummaryResult};

/// Summarize NICE, G-BA or HAS guidance with a chat completion service.
#[derive(Parser)]
#[command(name = "hta-summarize")]
#[command(version, about, long_about = None)]
struct Args {
    /// Guidance code (e.g., ta1044) or guidance page URL
    input: String,

    /// Print the summary and its provenance as JSON
    #[arg(long)]
    json: bool,

    /// Maximum response size in MB
    #[arg(long, default_value_t = DEFAULT_MAX_RESPONSE_SIZE / (1024 * 1024))]
    max_size: u64,

    /// HTTP timeout in seconds for guidance downloads
    #[arg(long, default_value_t = HTTP_TIMEOUT_SECS)]
    timeout: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    install_panic_hook();

    let args = Args::parse();

    match run(&args).await {
        Ok(result) => print_result(&result, args.json),
        Err(e) => {
            tracing::error!(error = %e, stage = e.stage(), "summarize failed");
            eprintln!("Error ({}): {e}", e.stage());
            std::process::exit(1);
        }
    }
}

async fn run(args: &Args) -> Result<SummaryResult, PipelineError> {
    let config = SummaryConfig::from_env()?;
    let client = OpenAiClient::new(&config)?;
    let options = HarvestOptions::default()
        .with_max_response_size(args.max_size * 1024 * 1024)
        .with_timeout(Duration::from_secs(args.timeout));

    execute_summary(&args.input, &client, &config, &options).await
}

fn print_result(result: &SummaryResult, json: bool) {
    if json {
        match serde_json::to_string_pretty(result) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error (output): {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    for warning in &result.warnings {
        eprintln!("Warning: {warning}");
    }
    println!("{}", result.summary);
}
