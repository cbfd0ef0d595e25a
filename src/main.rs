use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use llmr::config::Config;
use llmr::embeddings::EmbeddingProviderKind;
use llmr::generator::{generate_remote, generate_site};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "llmr",
    version,
    about = "Summarize a directory of HTML pages into a compact JSON document for language models"
)]
struct Cli {
    /// Directory or HTML file to scan, or an http(s) URL to fetch a single page
    #[arg(default_value = ".")]
    input: String,

    /// Base URL recorded in the output
    base_url: Option<String>,

    /// Output file for directory scans (defaults to LLMR_OUTPUT_FILENAME or site.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory that receives `<domain>.json` in URL mode
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Embedding provider (hash, auto)
    #[arg(long)]
    embedding_method: Option<String>,

    /// Embedding vector length
    #[arg(long)]
    dimensions: Option<usize>,

    /// Maximum keywords per page
    #[arg(long)]
    max_keywords: Option<usize>,

    /// Write single-line JSON
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Include full per-page analysis under `debug`
    #[arg(long, default_value_t = false)]
    debug_data: bool,

    /// Detect page language from text when the page does not declare one
    #[arg(long, default_value_t = false)]
    detect_language: bool,

    /// Emit logs as JSON
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

impl Cli {
    fn is_remote(&self) -> bool {
        self.input.starts_with("http://") || self.input.starts_with("https://")
    }

    /// Flags win over environment variables.
    fn apply(&self, mut config: Config) -> Result<Config> {
        if let Some(method) = &self.embedding_method {
            let kind: EmbeddingProviderKind = method.parse()?;
            config = config.with_embedding_provider(kind);
        }
        if let Some(dimensions) = self.dimensions {
            config = config.with_embedding_dimensions(dimensions)?;
        }
        if let Some(max) = self.max_keywords {
            config = config.with_max_keywords(max)?;
        }
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.as_str());
        }
        if self.compact {
            config = config.with_pretty(false);
        }
        if self.debug_data {
            config = config.with_include_debug_data(true);
        }
        if self.detect_language {
            config = config.with_detect_language(true);
        }
        Ok(config)
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = cli.apply(Config::from_env().context("failed to load configuration")?)?;
    info!(
        embedding = %config.embedding_provider(),
        dimensions = config.embedding_dimensions(),
        "starting"
    );

    let report = if cli.is_remote() {
        generate_remote(&cli.input, &cli.out_dir, &config)
            .await
            .with_context(|| format!("failed to summarize {}", cli.input))?
    } else {
        let output = cli
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(config.output_filename()));
        generate_site(Path::new(&cli.input), &output, &config)
            .with_context(|| format!("failed to summarize {}", cli.input))?
    };

    report.log();
    if cli.is_remote()
        && let Some(name) = report.output_path.file_name()
    {
        info!(
            "add to <head>: <link rel=\"llm-index\" type=\"application/json\" href=\"/{}\">",
            name.to_string_lossy()
        );
    }
    Ok(())
}
