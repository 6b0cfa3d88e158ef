#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lexera_hydrate::host::{ErrorSink, QueryHost, MarkdownRenderer};
use lexera_hydrate::types::{Board, Fragment, Item, Lane, ViewContext};
use lexera_hydrate::{HydrateError, HydrationContext, QueryError, RenderError};

pub const FAIL_MARKER: &str = "!fail";

/// Wraps markdown in `<p>`, failing on titles containing `!fail`.
#[derive(Default)]
pub struct FakeRenderer {
    pub rendered: Mutex<Vec<String>>,
}

impl FakeRenderer {
    pub fn rendered(&self) -> Vec<String> {
        self.rendered.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarkdownRenderer for FakeRenderer {
    async fn render(&self, _view: &ViewContext, markdown: &str) -> Result<Fragment, RenderError> {
        tokio::task::yield_now().await;
        self.rendered.lock().unwrap().push(markdown.to_string());
        if markdown.contains(FAIL_MARKER) {
            return Err(RenderError::new(format!("cannot render '{}'", markdown)));
        }
        Ok(Fragment::new(format!("<p>{}</p>", markdown)))
    }
}

/// Records scripts and queries; queries containing `FAIL` are rejected.
pub struct FakeQueryHost {
    pub enabled: bool,
    pub scripts: Mutex<Vec<(String, String)>>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeQueryHost {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            scripts: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.scripts.lock().unwrap().len() + self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl QueryHost for FakeQueryHost {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn run_script(
        &self,
        code: &str,
        target: &mut Fragment,
        _view: &ViewContext,
        source_path: &str,
    ) -> Result<(), QueryError> {
        self.scripts
            .lock()
            .unwrap()
            .push((code.to_string(), source_path.to_string()));
        if code.contains("FAIL") {
            return Err(QueryError::new("script threw"));
        }
        target.append_html("<div class=\"dv\">output</div>");
        Ok(())
    }

    async fn query(&self, query: &str) -> Result<serde_json::Value, QueryError> {
        self.queries.lock().unwrap().push(query.to_string());
        if query.contains("FAIL") {
            return Err(QueryError::new("bad query"));
        }
        Ok(serde_json::json!({ "type": "list", "values": ["a", "b"] }))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub errors: Mutex<Vec<HydrateError>>,
}

impl RecordingSink {
    pub fn errors(&self) -> Vec<HydrateError> {
        self.errors.lock().unwrap().clone()
    }
}

impl ErrorSink for RecordingSink {
    fn report(&self, error: &HydrateError) {
        self.errors.lock().unwrap().push(error.clone());
    }
}

pub struct Harness {
    pub renderer: Arc<FakeRenderer>,
    pub sink: Arc<RecordingSink>,
    pub ctx: HydrationContext,
}

pub fn harness() -> Harness {
    let renderer = Arc::new(FakeRenderer::default());
    let sink = Arc::new(RecordingSink::default());
    let view = ViewContext {
        id: "view-1".into(),
        file_path: "Boards/Sprint.md".into(),
    };
    let ctx = HydrationContext::new(renderer.clone(), view).with_error_sink(sink.clone());
    Harness { renderer, sink, ctx }
}

pub fn sample_board() -> Board {
    Board::new(
        "board-1",
        vec![
            Lane::new(
                "lane-0",
                "Todo",
                vec![Item::new("item-0-0", "Write **docs**"), Item::new("item-0-1", "Plan")],
            ),
            Lane::new("lane-1", "Doing", vec![Item::new("item-1-0", "Ship #release")]),
            Lane::new("lane-2", "Done", Vec::new()),
        ],
    )
}
