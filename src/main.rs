use anyhow::Result;
use clap::{Parser, Subcommand};
use dialscore_rs::config::{self, GenerationConfig, RunConfig};
use dialscore_rs::llm::ollama::OllamaClient;
use dialscore_rs::{dataset, demographics, evaluate, relationships, report};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dialscore", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
    /// Dataset root holding one folder per movie
    #[arg(long, global = true, default_value = config::DEFAULT_ROOT)]
    root: PathBuf,
    /// Only process this movie folder
    #[arg(long, global = true)]
    movie: Option<String>,
    #[arg(long, global = true, env = "DIALSCORE_OLLAMA_URL", default_value = config::DEFAULT_OLLAMA_URL)]
    ollama_url: String,
    #[arg(long, global = true, env = "DIALSCORE_MODEL", default_value = config::DEFAULT_MODEL)]
    model: String,
    /// Character budget for the flattened age/sex transcript
    #[arg(long, global = true, default_value_t = config::DEFAULT_MAX_CONTEXT_CHARS)]
    max_context_chars: usize,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Classify the relationship in every interaction and cite evidence lines
    Relationships,
    /// Infer age class and sex of the two main participants of every file
    Agesex,
    /// Score generated relationships against ground truth
    Evaluate,
    /// Score generated age/sex entries against ground truth
    EvaluateAgesex,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        RunConfig { root_dir: self.root.clone(), movie: self.movie.clone(), max_context_chars: self.max_context_chars }
    }

    fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            base_url: self.ollama_url.clone(),
            model: self.model.clone(),
            timeout_secs: self.timeout_secs,
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let run = cli.run_config();

    match &cli.cmd {
        Cmd::Relationships | Cmd::Agesex => {
            let client = OllamaClient::new(cli.generation_config())?;
            for movie in dataset::movies(&run.root_dir)? {
                if !run.includes(&movie.name) {
                    continue;
                }
                let written = if matches!(cli.cmd, Cmd::Relationships) {
                    relationships::process_movie(&client, &movie).await?
                } else {
                    demographics::process_movie(&client, &movie, run.max_context_chars).await?
                };
                info!(movie = %movie.name, files = written.len(), "movie done");
            }
        }
        Cmd::Evaluate => {
            let board = evaluate::evaluate_relationships(&run)?;
            print!("{}", report::render_relationship_report(&board));
        }
        Cmd::EvaluateAgesex => {
            let board = evaluate::evaluate_demographics(&run)?;
            print!("{}", report::render_demographic_report(&board));
        }
    }
    Ok(())
}
