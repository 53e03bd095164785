//! Seer Language Server binary entry point
//!
//! Run with: seer-lsp
//!
//! The LSP communicates via stdin/stdout using the Language Server Protocol, so logs go to stderr.

use std::sync::Arc;

use seer::lsp::SeerLanguageServer;
use seer_syntax::Grammar;
use tower_lsp::{LspService, Server};

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    // The grammar is built once and shared by every request.
    let grammar = match Grammar::python() {
        Ok(grammar) => Arc::new(grammar),
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            std::process::exit(1);
        }
    };

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| SeerLanguageServer::new(client, grammar));

    Server::new(stdin, stdout, socket).serve(service).await;
}
