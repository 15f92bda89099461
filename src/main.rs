//! rag-chat - streaming client for a retrieval-augmented-generation service
//!
//! Asks questions over a server-sent-events stream and renders the answer
//! as it arrives, together with the source documents it was built from.

mod cli;
mod client;
mod config;
mod decoder;
mod render;
mod runtime;
mod session;
mod state_machine;
mod transcript;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging; stdout is reserved for the conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rag_chat=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = cli::Cli::parse();
    cli::run(cli).await?;

    Ok(())
}
