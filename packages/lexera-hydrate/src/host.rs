/// Host collaborators that hydration depends on.
///
/// The markdown renderer and the query host are asynchronous; search text
/// extraction and link resolution are plain lookups.
use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::{HydrateError, QueryError, RenderError};
use crate::types::{FileHandle, FileMetadata, Fragment, ViewContext};

/// Renders raw markdown for a view.
#[async_trait]
pub trait MarkdownRenderer: Send + Sync {
    async fn render(&self, view: &ViewContext, markdown: &str) -> Result<Fragment, RenderError>;
}

/// Builds the string an item is matched against when filtering the board.
pub trait SearchTextExtractor: Send + Sync {
    fn extract(&self, fragment: &Fragment, tags: &[String], file_metadata: Option<&FileMetadata>) -> String;
}

/// Resolves a link target to a file in the vault.
pub trait LinkResolver: Send + Sync {
    /// `source_path` is the file the link appears in; `None` when nothing matches.
    fn resolve_link(&self, target: &str, source_path: &str) -> Option<FileHandle>;
}

/// An optional query engine (dataview) that embedded queries run against.
#[async_trait]
pub trait QueryHost: Send + Sync {
    /// Whether the engine is installed and enabled right now.
    fn is_enabled(&self) -> bool;

    /// Run a script, writing its output into `target`.
    async fn run_script(
        &self,
        code: &str,
        target: &mut Fragment,
        view: &ViewContext,
        source_path: &str,
    ) -> Result<(), QueryError>;

    async fn query(&self, query: &str) -> Result<serde_json::Value, QueryError>;
}

/// Receives hydration failures for display to the user.
pub trait ErrorSink: Send + Sync {
    fn report(&self, error: &HydrateError);
}

impl ErrorSink for broadcast::Sender<HydrateError> {
    fn report(&self, error: &HydrateError) {
        if let Err(e) = self.send(error.clone()) {
            log::warn!("[lexera.hydrate.error] No receivers: {}", e);
        }
    }
}

impl<F> ErrorSink for F
where
    F: Fn(&HydrateError) + Send + Sync,
{
    fn report(&self, error: &HydrateError) {
        self(error)
    }
}

/// Sink that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorSink;

impl ErrorSink for LogErrorSink {
    fn report(&self, error: &HydrateError) {
        log::error!("[lexera.hydrate.error] {}", error);
    }
}
