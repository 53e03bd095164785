//! LSP (Language Server Protocol) backend implementation for seer

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use seer_syntax::parser::Module;
use seer_syntax::{Grammar, parse_module};

use crate::config::CompletionConfig;
use crate::engine::{self, context_results};
use crate::evaluate::{Definition, DefinitionKind, ScopeEvaluator};
use crate::lsp::diagnostics::{module_diagnostics, to_lsp_range, to_source_position};

/// Document state stored by the LSP
#[derive(Debug, Clone)]
pub struct DocumentState {
    pub source: String,
    /// `None` when the parser gave up on the document.
    pub module: Option<Module>,
    pub version: i32,
}

/// Seer Language Server
pub struct SeerLanguageServer {
    client: Client,
    grammar: Arc<Grammar>,
    documents: Arc<RwLock<HashMap<Url, DocumentState>>>,
    config: CompletionConfig,
}

impl SeerLanguageServer {
    pub fn new(client: Client, grammar: Arc<Grammar>) -> Self {
        Self {
            client,
            grammar,
            documents: Arc::new(RwLock::new(HashMap::new())),
            config: CompletionConfig::default(),
        }
    }

    /// Parse a document, store it and publish diagnostics
    async fn analyze_document(&self, uri: &Url, source: &str, version: i32) {
        let (module, diagnostics) = match parse_module(&self.grammar, source) {
            Ok(module) => {
                let diagnostics = module_diagnostics(&module);
                (Some(module), diagnostics)
            }
            Err(err) => {
                tracing::warn!(%uri, error = %err, "document could not be parsed");
                let diagnostic = Diagnostic {
                    range: Range::default(),
                    severity: Some(DiagnosticSeverity::ERROR),
                    source: Some("seer".to_string()),
                    message: err.to_string(),
                    ..Default::default()
                };
                (None, vec![diagnostic])
            }
        };

        {
            let mut docs = self.documents.write().await;
            docs.insert(
                uri.clone(),
                DocumentState {
                    source: source.to_string(),
                    module,
                    version,
                },
            );
        }

        // Publish diagnostics (even if empty, to clear old ones)
        self.client
            .publish_diagnostics(uri.clone(), diagnostics, Some(version))
            .await;
    }

    fn evaluator(uri: &Url) -> ScopeEvaluator {
        match uri.to_file_path() {
            Ok(path) => ScopeEvaluator::new().with_module_path(path.to_string_lossy()),
            Err(()) => ScopeEvaluator::new(),
        }
    }
}

fn definition_location(uri: &Url, definition: &Definition) -> Location {
    Location {
        uri: uri.clone(),
        range: to_lsp_range(definition.start, definition.end),
    }
}

fn item_kind(kind: DefinitionKind) -> CompletionItemKind {
    match kind {
        DefinitionKind::Function => CompletionItemKind::FUNCTION,
        DefinitionKind::Class => CompletionItemKind::CLASS,
        DefinitionKind::Import => CompletionItemKind::MODULE,
        DefinitionKind::Literal => CompletionItemKind::VALUE,
        _ => CompletionItemKind::VARIABLE,
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for SeerLanguageServer {
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                // Real-time diagnostics via text sync
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
                definition_provider: Some(OneOf::Left(true)),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![".".to_string(), " ".to_string()]),
                    ..Default::default()
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "seer-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client.log_message(MessageType::INFO, "Seer LSP initialized").await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let source = params.text_document.text;
        let version = params.text_document.version;

        self.analyze_document(&uri, &source, version).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        // We use FULL sync, so there's only one change with the full content
        if let Some(change) = params.content_changes.into_iter().next() {
            self.analyze_document(&uri, &change.text, version).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        let mut docs = self.documents.write().await;
        docs.remove(&uri);

        // Clear diagnostics
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn goto_definition(&self, params: GotoDefinitionParams) -> Result<Option<GotoDefinitionResponse>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = to_source_position(params.text_document_position_params.position);

        let docs = self.documents.read().await;
        let Some(module) = docs.get(uri).and_then(|doc| doc.module.as_ref()) else {
            return Ok(None);
        };

        let definitions = context_results(&Self::evaluator(uri), module, position);
        let locations: Vec<Location> = definitions
            .iter()
            .map(|definition| definition_location(uri, definition))
            .collect();

        Ok(match locations.len() {
            0 => None,
            1 => locations.into_iter().next().map(GotoDefinitionResponse::Scalar),
            _ => Some(GotoDefinitionResponse::Array(locations)),
        })
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = to_source_position(params.text_document_position.position);

        let docs = self.documents.read().await;
        let Some(doc) = docs.get(uri) else {
            return Ok(None);
        };
        let Some(module) = doc.module.as_ref() else {
            return Ok(None);
        };

        let evaluator = Self::evaluator(uri);
        let report = match engine::complete(&self.grammar, module, &doc.source, position, &evaluator, &self.config) {
            Ok(report) => report,
            Err(err) => {
                tracing::error!(%uri, version = doc.version, error = %err, "completion failed");
                return Ok(None);
            }
        };

        // Kinds for the names come from this document's bindings.
        let kinds: HashMap<String, DefinitionKind> = evaluator
            .definitions(module)
            .into_iter()
            .map(|definition| (definition.name, definition.kind))
            .collect();
        let keywords = report
            .types
            .as_ref()
            .map(|types| types.keyword_strings())
            .unwrap_or_default();

        let items: Vec<CompletionItem> = report
            .candidates
            .into_iter()
            .map(|label| {
                let (kind, detail) = if keywords.contains(&label.as_str()) {
                    (CompletionItemKind::KEYWORD, None)
                } else {
                    match kinds.get(&label) {
                        Some(kind) => (item_kind(*kind), Some(kind.as_str().to_string())),
                        None => (CompletionItemKind::VARIABLE, None),
                    }
                };
                CompletionItem {
                    label,
                    kind: Some(kind),
                    detail,
                    ..Default::default()
                }
            })
            .collect();

        Ok(Some(CompletionResponse::Array(items)))
    }
}
