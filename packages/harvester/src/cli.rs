//! Command-line interface for the harvester.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{HarvestOptions, DEFAULT_MAX_RESPONSE_SIZE, HTTP_TIMEOUT_SECS};
use crate::error::Result;
use crate::harvester::{harvest_with_options, retrieve, save_documents};
use crate::router::classify;
use crate::types::{Confidence, RequestTarget};

/// HTA Harvester - Fetch guidance PDFs from NICE, G-BA and HAS.
#[derive(Parser)]
#[command(name = "hta-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Maximum response size in MB
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_RESPONSE_SIZE / (1024 * 1024))]
    pub max_size: u64,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value_t = HTTP_TIMEOUT_SECS)]
    pub timeout: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show which authority an input belongs to.
    Classify {
        /// Guidance code (e.g., ta1044) or guidance page URL
        input: String,
    },

    /// Download the guidance PDFs for an input.
    Fetch {
        /// Guidance code (e.g., ta1044) or guidance page URL
        input: String,

        /// Output directory (default: downloads/)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the bounded text corpus for an input.
    Corpus {
        /// Guidance code (e.g., ta1044) or guidance page URL
        input: String,
    },
}

impl Cli {
    fn options(&self) -> HarvestOptions {
        HarvestOptions::default()
            .with_max_response_size(self.max_size * 1024 * 1024)
            .with_timeout(Duration::from_secs(self.timeout))
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let options = cli.options();

    match cli.command {
        Commands::Classify { input } => classify_command(&input),
        Commands::Fetch { input, output } => fetch_command(&input, output, &options),
        Commands::Corpus { input } => corpus_command(&input, &options),
    }
}

fn classify_command(input: &str) -> Result<()> {
    let request = classify(input)?;
    let kind = match request.target {
        RequestTarget::Code(_) => "code",
        RequestTarget::Page(_) => "page",
    };

    println!(
        "{} {} ({})",
        style("Authority:").bold(),
        style(request.jurisdiction.authority()).cyan(),
        request.jurisdiction.as_str()
    );
    println!("{} {} {}", style("Target:").bold(), kind, request.target);
    Ok(())
}

fn fetch_command(input: &str, output: Option<PathBuf>, options: &HarvestOptions) -> Result<()> {
    let request = classify(input)?;
    let output_dir = output.unwrap_or_else(|| PathBuf::from("downloads"));

    println!(
        "{} {} from {}",
        style("Fetching").bold(),
        style(&request.target).cyan(),
        style(request.jurisdiction.authority()).green()
    );
    println!();

    let pb = spinner("Discovering documents...");
    let documents = match retrieve(&request, options) {
        Ok(documents) => documents,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.set_message("Saving documents...");
    let paths = match save_documents(&documents, &output_dir) {
        Ok(paths) => paths,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    for (document, path) in documents.iter().zip(&paths) {
        let marker = match document.link.confidence {
            Confidence::Primary => style("✓").green(),
            Confidence::Fallback => style("?").yellow(),
        };
        println!("  {marker} {}", document.link.url);
        println!("    {} {}", style("→").dim(), path.display());
    }

    if documents
        .iter()
        .any(|d| d.link.confidence == Confidence::Fallback)
    {
        println!();
        println!(
            "{}",
            style("Documents marked ? come from a best-effort rule and may be unrelated.")
                .yellow()
        );
    }

    Ok(())
}

fn corpus_command(input: &str, options: &HarvestOptions) -> Result<()> {
    let pb = spinner("Harvesting...");
    let harvest = match harvest_with_options(input, options) {
        Ok(harvest) => harvest,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    for warning in &harvest.corpus.warnings {
        eprintln!("{} {warning}", style("Warning:").yellow().bold());
    }
    eprintln!(
        "{} {} document(s), {} characters{}",
        style(harvest.source_label()).cyan(),
        harvest.documents.len(),
        harvest.corpus.char_count(),
        if harvest.corpus.truncated {
            " (truncated)"
        } else {
            ""
        }
    );

    println!("{}", harvest.corpus.text);
    Ok(())
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_fetch() {
        let cli = Cli::parse_from(["hta-harvester", "fetch", "ta1044"]);

        let Commands::Fetch { input, output } = cli.command else {
            panic!("expected fetch command");
        };
        assert_eq!(input, "ta1044");
        assert!(output.is_none());
        assert_eq!(cli.timeout, HTTP_TIMEOUT_SECS);
    }

    #[test]
    fn test_cli_parse_fetch_with_output() {
        let cli = Cli::parse_from([
            "hta-harvester",
            "fetch",
            "https://www.g-ba.de/beschluesse/6001/",
            "--output",
            "out",
            "--max-size",
            "10",
        ]);

        let options = cli.options();
        assert_eq!(options.max_response_size, 10 * 1024 * 1024);

        let Commands::Fetch { input, output } = cli.command else {
            panic!("expected fetch command");
        };
        assert_eq!(input, "https://www.g-ba.de/beschluesse/6001/");
        assert_eq!(output, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_cli_parse_corpus() {
        let cli = Cli::parse_from(["hta-harvester", "corpus", "ta1044", "--timeout", "5"]);
        assert!(matches!(cli.command, Commands::Corpus { .. }));
        assert_eq!(cli.options().timeout, Duration::from_secs(5));
    }
}
