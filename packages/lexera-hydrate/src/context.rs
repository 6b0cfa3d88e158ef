use std::sync::Arc;

use crate::config::{BoardSettings, HydrateSettings};
use crate::error::HydrateError;
use crate::host::{ErrorSink, LinkResolver, LogErrorSink, MarkdownRenderer, QueryHost, SearchTextExtractor};
use crate::links::VaultLinkResolver;
use crate::search::PlainTextExtractor;
use crate::types::ViewContext;

/// Everything a hydration pass needs from the host: collaborators, settings,
/// the view renders target, and the path of the board file.
#[derive(Clone)]
pub struct HydrationContext {
    renderer: Arc<dyn MarkdownRenderer>,
    search: Arc<dyn SearchTextExtractor>,
    links: Arc<dyn LinkResolver>,
    query_host: Option<Arc<dyn QueryHost>>,
    errors: Arc<dyn ErrorSink>,
    settings: HydrateSettings,
    view: ViewContext,
}

impl HydrationContext {
    /// A context with the default search extractor, an empty vault, no query
    /// host, and errors going to the log.
    pub fn new(renderer: Arc<dyn MarkdownRenderer>, view: ViewContext) -> Self {
        Self {
            renderer,
            search: Arc::new(PlainTextExtractor),
            links: Arc::new(VaultLinkResolver::default()),
            query_host: None,
            errors: Arc::new(LogErrorSink),
            settings: HydrateSettings::default(),
            view,
        }
    }

    pub fn with_search(mut self, search: Arc<dyn SearchTextExtractor>) -> Self {
        self.search = search;
        self
    }

    pub fn with_links(mut self, links: Arc<dyn LinkResolver>) -> Self {
        self.links = links;
        self
    }

    pub fn with_query_host(mut self, host: Arc<dyn QueryHost>) -> Self {
        self.query_host = Some(host);
        self
    }

    pub fn with_error_sink(mut self, errors: Arc<dyn ErrorSink>) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_settings(mut self, settings: HydrateSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Copy of this context with a board's setting overrides applied.
    pub fn scoped(&self, board: Option<&BoardSettings>) -> HydrationContext {
        match board {
            Some(overrides) => {
                let mut scoped = self.clone();
                scoped.settings = self.settings.overlay(overrides);
                scoped
            }
            None => self.clone(),
        }
    }

    pub fn renderer(&self) -> &dyn MarkdownRenderer {
        self.renderer.as_ref()
    }

    pub fn search(&self) -> &dyn SearchTextExtractor {
        self.search.as_ref()
    }

    pub fn links(&self) -> &dyn LinkResolver {
        self.links.as_ref()
    }

    /// The query host, only if one is installed and currently enabled.
    pub fn query_host(&self) -> Option<&dyn QueryHost> {
        self.query_host
            .as_deref()
            .filter(|host| host.is_enabled())
    }

    pub fn settings(&self) -> &HydrateSettings {
        &self.settings
    }

    pub fn setting(&self, key: &str) -> Option<String> {
        self.settings.get_by_key(key)
    }

    pub fn view(&self) -> &ViewContext {
        &self.view
    }

    /// Path of the board file, used as the source for link resolution.
    pub fn source_path(&self) -> &str {
        &self.view.file_path
    }

    pub fn report(&self, error: &HydrateError) {
        self.errors.report(error);
    }
}
