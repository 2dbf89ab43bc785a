//! Code inspection CLI
//!
//! Usage:
//!   ij-inspect code.py                  Inspect a file, language from its extension
//!   ij-inspect -l kotlin Main.txt       Inspect a file with an explicit language
//!   ij-inspect -l python -              Read the source from stdin
//!
//! The result is printed as JSON on stdout. Failures print a single line on
//! stderr and exit with status 1.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, anyhow};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use inspect_client::{ClientConfig, Code, InspectionClient, LanguageId};

/// Submit source code to a code inspection service
#[derive(Parser, Debug)]
#[command(name = "ij-inspect")]
#[command(about = "Submit source code to a code inspection service")]
struct Args {
    /// Path to the source file ("-" reads stdin)
    path: PathBuf,

    /// Source language (e.g. python, kotlin); inferred from the file extension if omitted
    #[arg(short, long)]
    language: Option<String>,

    /// Service host
    #[arg(long)]
    host: Option<String>,

    /// Service port
    #[arg(long)]
    port: Option<u16>,

    /// Seconds to wait for the service to become ready
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// JSON client configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the result
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")))
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ij-inspect: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let language = resolve_language(args.language.as_deref(), &args.path)?;
    let text = read_source(&args.path)?;
    tracing::debug!("Inspecting {} as {}", args.path.display(), language);

    let client = InspectionClient::connect(config)
        .await
        .context("could not reach inspection service")?;
    let result = client.inspect(Code::new(text, language)).await;
    client.close();
    let result = result.context("inspection failed")?;

    let json = serde_json::to_string_pretty(&result)?;
    println!("{json}");
    Ok(())
}

/// Defaults, then the config file, then command-line overrides.
fn load_config(args: &Args) -> anyhow::Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ClientConfig::default(),
    };

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(secs) = args.timeout {
        config.connect_timeout = Duration::from_secs(secs);
    }
    Ok(config)
}

fn resolve_language(language: Option<&str>, path: &Path) -> anyhow::Result<LanguageId> {
    match language {
        Some(lang) => Ok(lang.parse()?),
        None => path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(LanguageId::from_extension)
            .ok_or_else(|| {
                anyhow!(
                    "cannot infer language of {}; pass --language",
                    path.display()
                )
            }),
    }
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}
