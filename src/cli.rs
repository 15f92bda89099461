//! Command line interface

use crate::client::{AuthError, DocumentError, RagClient, Transport, TransportErrorKind};
use crate::config::{ClientConfig, ConfigError};
use crate::render::TerminalRenderer;
use crate::runtime::{ConversationRuntime, RuntimeError, StreamOutcome};
use clap::{Parser, Subcommand};
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

/// Chat with your private PDFs through a RAG service
#[derive(Debug, Parser)]
#[command(name = "rag-chat", version)]
pub struct Cli {
    /// Base URL of the RAG service (default: $RAG_SERVER_URL or http://localhost:8000)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Account name (default: $RAG_USERNAME)
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Account password (default: $RAG_PASSWORD)
    #[arg(long, global = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive conversation (default)
    Chat,
    /// Ask a single question and exit
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// Check credentials against the service
    Login,
    /// Create an account
    Register,
    /// Upload documents for later ingest
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Load and index the uploaded PDFs
    Ingest,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Cannot create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("Username and password are required (--username/--password or RAG_USERNAME/RAG_PASSWORD)")]
    MissingCredentials,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Documents(#[from] DocumentError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl Cli {
    /// Environment configuration overridden by command line flags
    pub fn config(&self) -> Result<ClientConfig, CliError> {
        let mut config = ClientConfig::from_env()?;
        if let Some(server) = &self.server {
            config = config.with_server_url(server)?;
        }
        if let Some(username) = &self.username {
            config.username = Some(username.clone());
        }
        if let Some(password) = &self.password {
            config.password = Some(password.clone());
        }
        Ok(config)
    }
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.config()?;
    let client = Arc::new(RagClient::new(&config)?);

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => {
            if let Some((username, password)) = config.credentials() {
                client.login(username, password).await?;
            }
            chat(client).await
        }
        Command::Ask { question } => {
            if let Some((username, password)) = config.credentials() {
                client.login(username, password).await?;
            }
            let mut runtime = ConversationRuntime::new(Arc::clone(&client));
            let mut renderer = TerminalRenderer::new(client.base_url().clone());
            ask(
                &mut runtime,
                &mut renderer,
                &question.join(" "),
                tokio::signal::ctrl_c(),
            )
            .await?;
            Ok(())
        }
        Command::Login => {
            let (username, password) = config.credentials().ok_or(CliError::MissingCredentials)?;
            client.login(username, password).await?;
            println!("Logged in as {username}.");
            Ok(())
        }
        Command::Register => {
            let (username, password) = config.credentials().ok_or(CliError::MissingCredentials)?;
            client.register(username, password).await?;
            println!("Registered {username}.");
            Ok(())
        }
        Command::Upload { files } => {
            let uploaded = client.upload(&files).await?;
            println!("{}", uploaded.message);
            for name in &uploaded.filenames {
                println!("  {name}");
            }
            Ok(())
        }
        Command::Ingest => {
            println!("{}", client.ingest().await?);
            Ok(())
        }
    }
}

async fn chat(client: Arc<RagClient>) -> Result<(), CliError> {
    let mut runtime = ConversationRuntime::new(Arc::clone(&client));
    let mut renderer = TerminalRenderer::new(client.base_url().clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!(
        "Ask a question. /reset starts a new conversation, /quit or Ctrl-C at the prompt exits, Ctrl-C during an answer stops it."
    );
    prompt()?;
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };
        let Some(line) = line else {
            break;
        };
        match line.trim() {
            "" => {}
            "/quit" | "/exit" => break,
            "/reset" => {
                runtime.reset();
                renderer.render(&runtime.snapshot(), &mut std::io::stdout())?;
                eprintln!("Started a new conversation ({}).", runtime.session_id());
            }
            question => match ask(&mut runtime, &mut renderer, question, tokio::signal::ctrl_c())
                .await
            {
                Ok(_) => {}
                // A failed stream ends that answer, not the session
                Err(CliError::Runtime(RuntimeError::Transport(e)))
                    if e.kind == TransportErrorKind::Auth =>
                {
                    eprintln!("error: {e} (log in with --username and --password)");
                }
                Err(CliError::Runtime(e)) => eprintln!("error: {e}"),
                Err(e) => return Err(e),
            },
        }
        prompt()?;
    }
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}

/// Submit one question, rendering the reply while it streams in.
///
/// The answer stops when `interrupt` completes (Ctrl-C in the terminal).
async fn ask<T, I>(
    runtime: &mut ConversationRuntime<T>,
    renderer: &mut TerminalRenderer,
    question: &str,
    interrupt: I,
) -> Result<StreamOutcome, CliError>
where
    T: Transport,
    I: Future<Output = std::io::Result<()>>,
{
    let mut snapshots = runtime.subscribe();
    let cancel = CancellationToken::new();
    let mut stdout = std::io::stdout();

    let result = {
        let submit = runtime.submit(question, &cancel);
        tokio::pin!(submit);
        tokio::pin!(interrupt);
        loop {
            tokio::select! {
                result = &mut submit => break result,
                Ok(()) = snapshots.changed() => {
                    let snapshot = snapshots.borrow_and_update().clone();
                    tracing::trace!(state = %snapshot.state, turns = snapshot.transcript.len(), "Rendering snapshot");
                    renderer.render(&snapshot, &mut stdout)?;
                }
                _ = &mut interrupt, if !cancel.is_cancelled() => cancel.cancel(),
            }
        }
    };
    renderer.finish(&runtime.snapshot(), &mut stdout)?;

    let outcome = result?;
    if outcome.cancelled {
        eprintln!("(answer stopped)");
    }
    if outcome.malformed_events > 0 {
        eprintln!(
            "warning: {} malformed event(s) skipped",
            outcome.malformed_events
        );
    }
    Ok(outcome)
}
