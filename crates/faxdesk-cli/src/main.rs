mod display;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use faxdesk_ai::{OllamaClient, OllamaConfig, Pipeline, build_analyze_prompt, build_reply_prompt};
use faxdesk_core::{FaxMessage, ReplyDecision};
use faxdesk_server::{BufferedRequest, DEFAULT_BODY_LIMIT, DEFAULT_LISTEN_ADDR, ServerConfig};
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "qwen3:4b-instruct-2507-q4_K_M";

#[derive(Parser)]
#[command(name = "faxdesk", version, about = "Fax triage and reply drafting backend for a local LLM")]
struct Cli {
    /// Ollama server base URL.
    #[arg(long, env = "OLLAMA_URL", default_value = DEFAULT_OLLAMA_URL, global = true)]
    ollama_url: String,

    /// Model to run on the Ollama server.
    #[arg(long, env = "OLLAMA_MODEL", default_value = DEFAULT_MODEL, global = true)]
    model: String,

    /// Upper bound on a single inference call.
    #[arg(long, env = "INFERENCE_TIMEOUT_SECS", default_value_t = 120, global = true)]
    timeout_secs: u64,

    /// Address to listen on; a bare `:port` binds all interfaces.
    #[arg(long, env = "LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR, global = true)]
    listen: String,

    /// Maximum accepted request body, in bytes.
    #[arg(long, env = "FAXDESK_BODY_LIMIT", default_value_t = DEFAULT_BODY_LIMIT, global = true)]
    body_limit: usize,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (default).
    Serve,
    /// Triage one fax read from a file (`-` for stdin).
    Analyze { input: PathBuf },
    /// Draft a reply for one decision read from a file (`-` for stdin).
    Reply { input: PathBuf },
    /// Print the assembled prompt without calling the model.
    Prompt {
        #[command(subcommand)]
        kind: PromptKind,
    },
}

#[derive(Subcommand)]
enum PromptKind {
    Analyze { input: PathBuf },
    Reply { input: PathBuf },
}

impl Cli {
    fn pipeline(&self) -> anyhow::Result<Pipeline> {
        let config = OllamaConfig::new(&self.ollama_url, &self.model)
            .with_timeout(Duration::from_secs(self.timeout_secs));
        let client = OllamaClient::new(config).context("building Ollama client")?;
        Ok(Pipeline::new(Arc::new(client)))
    }

    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            listen: self.listen.clone(),
            body_limit: self.body_limit,
        }
    }
}

/// Read a request document. Accepts the same encodings as the HTTP
/// endpoints: raw JSON or `data=<urlencoded json>`.
fn read_request<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };

    let req = BufferedRequest {
        body: text.trim().to_owned().into(),
        ..Default::default()
    };
    faxdesk_server::decode(&req).with_context(|| format!("decoding {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut cli = Cli::parse();

    match cli.command.take().unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                model = %cli.model,
                ollama_url = %cli.ollama_url,
                listen = %cli.listen,
                "faxdesk backend started"
            );
            let pipeline = cli.pipeline()?;
            faxdesk_server::serve(&cli.server_config(), pipeline)
                .await
                .context("serving HTTP")?;
        }
        Command::Analyze { input } => {
            let fax: FaxMessage = read_request(&input)?;
            let result = cli.pipeline()?.analyze(&fax).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Reply { input } => {
            let decision: ReplyDecision = read_request(&input)?;
            let draft = cli.pipeline()?.reply(&decision).await?;
            println!("{}", serde_json::to_string_pretty(&draft)?);
        }
        Command::Prompt { kind } => {
            let prompt = match kind {
                PromptKind::Analyze { input } => build_analyze_prompt(&read_request(&input)?),
                PromptKind::Reply { input } => build_reply_prompt(&read_request(&input)?),
            };
            print!("{}", display::render_prompt(&prompt));
        }
    }

    Ok(())
}
