//! CLI binary for deepresearch.

use clap::Parser;
use deepresearch::render::render_links_text;
use deepresearch::{ResearchConfig, ResearchPipeline, Retriever, SummarizerHandle, Synthesizer};
use research_search::WebSearch;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Answer a question with a short summary of web search results and their sources.
#[derive(Parser)]
#[command(name = "deepresearch", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the sources as HTML markup instead of plain text.
    #[arg(long)]
    html: bool,

    /// The question to research.
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Logs go to stderr so the summary on stdout can be piped.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.filter_or_default())),
        )
        .init();

    let model = SummarizerHandle::initialize(&config.summarizer).await;
    let provider = WebSearch::new(config.search)?;
    let pipeline = ResearchPipeline::new(Retriever::new(provider), Synthesizer::new(model));

    let query = cli.query.join(" ");
    let rendered = pipeline.run(&query).await;

    println!("{}", rendered.summary);
    if cli.html {
        if !rendered.links_html.is_empty() {
            println!("\n{}", rendered.links_html);
        }
    } else if !rendered.links_html.is_empty() {
        println!("\nSources:\n{}", render_links_text(&rendered.links));
    }
    Ok(())
}

/// Explicit `--config` path, else the default path if present, else defaults.
fn load_config(cli: &Cli) -> anyhow::Result<ResearchConfig> {
    if let Some(path) = &cli.config {
        return Ok(ResearchConfig::from_file(path)?);
    }
    let default_path = ResearchConfig::default_config_path();
    if default_path.is_file() {
        Ok(ResearchConfig::from_file(&default_path)?)
    } else {
        Ok(ResearchConfig::default())
    }
}
