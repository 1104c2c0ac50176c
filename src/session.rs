use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::controller::{InputController, InputState, Transition};
use crate::dom::Page;
use crate::error::{InitError, QueryError};
use crate::loader::{ResourceFetcher, load_bundle};
use crate::render::ResultRenderer;
use crate::search::{EngineFactory, SearchEngineAdapter, SearchResult};
use crate::url_params::query_param;

enum Phase {
    Loading,
    Ready(Arc<SearchEngineAdapter>),
    Failed,
}

/// Result of handling one content-change event.
#[derive(Debug)]
pub enum InputOutcome {
    /// Search is not ready yet (or failed to start); the event was ignored
    Rejected,
    /// The field is empty; results cleared and the explanation shown
    Idle,
    /// Results for the latest query were rendered
    Rendered { results: usize },
    /// A newer event superseded this query; its results were dropped
    Stale,
    /// The query failed and rendered as zero results
    Failed(QueryError),
}

/// First half of an input event, before the query runs.
#[derive(Debug)]
pub enum InputStep {
    Rejected,
    Idle,
    Pending(PendingQuery),
}

/// A query issued for one event. Running it does not touch the page.
#[derive(Debug)]
pub struct PendingQuery {
    ticket: u64,
    query: String,
    adapter: Arc<SearchEngineAdapter>,
}

impl PendingQuery {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub async fn run(self) -> QueryResponse {
        let outcome = self.adapter.search(&self.query).await;
        QueryResponse {
            ticket: self.ticket,
            query: self.query,
            outcome,
        }
    }
}

#[derive(Debug)]
pub struct QueryResponse {
    pub ticket: u64,
    pub query: String,
    pub outcome: Result<Vec<SearchResult>, QueryError>,
}

/// The single front-end session: page surface, engine and input state.
pub struct Session {
    config: Config,
    page: Page,
    phase: Phase,
    controller: InputController,
    renderer: ResultRenderer,
    reserved_query: Option<String>,
}

impl Session {
    /// A session still loading: entry disabled, explanation visible.
    pub fn new(config: Config) -> Self {
        let page = Page::new(config.explanation.clone());
        let renderer = ResultRenderer::new(config.labels.clone(), config.highlight_case);
        Self {
            config,
            page,
            phase: Phase::Loading,
            controller: InputController::new(),
            renderer,
            reserved_query: None,
        }
    }

    /// Remember the `q` parameter of the page URL.
    pub fn with_page_url(mut self, page_url: &str) -> Self {
        self.reserved_query = query_param(page_url);
        if let Some(query) = &self.reserved_query {
            info!("Page requested query '{}'", query);
        }
        self
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn state(&self) -> InputState {
        self.controller.state()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready(_))
    }

    pub fn reserved_query(&self) -> Option<&str> {
        self.reserved_query.as_deref()
    }

    /// Load the resources, construct the engine, then enable the entry.
    ///
    /// On failure the status banner is shown and the entry stays disabled
    /// for the rest of the session. Calls after the first are ignored.
    pub async fn initialize(
        &mut self,
        fetcher: &dyn ResourceFetcher,
        factory: &dyn EngineFactory,
    ) -> Result<(), InitError> {
        if !matches!(self.phase, Phase::Loading) {
            warn!("Session already initialized; ignoring");
            return Ok(());
        }

        match self.start_engine(fetcher, factory).await {
            Ok(adapter) => {
                self.phase = Phase::Ready(Arc::new(adapter));
                self.page.enable_entry(&self.config.placeholder);
                info!("Search ready");
                Ok(())
            }
            Err(e) => {
                error!("Search initialization failed: {}", e);
                self.phase = Phase::Failed;
                self.page.show_error(e.banner_message());
                Err(e)
            }
        }
    }

    async fn start_engine(
        &self,
        fetcher: &dyn ResourceFetcher,
        factory: &dyn EngineFactory,
    ) -> Result<SearchEngineAdapter, InitError> {
        let bundle = load_bundle(
            fetcher,
            &self.config.resources,
            self.config.fetch_timeout(),
        )
        .await?;

        let adapter = SearchEngineAdapter::construct(
            factory,
            &bundle,
            self.config.engine_timeout(),
            self.config.query_timeout(),
        )
        .await?;

        Ok(adapter)
    }

    /// Handle a content-change event up to the point where a query is needed.
    pub fn begin_input(&mut self, value: &str) -> InputStep {
        let Phase::Ready(adapter) = &self.phase else {
            debug!("Input ignored before search is ready");
            return InputStep::Rejected;
        };
        let adapter = Arc::clone(adapter);

        self.page.set_entry_value(value);
        match self.controller.on_change(value) {
            Transition::StayIdle | Transition::EnterIdle => {
                self.page.clear_results();
                self.page.clear_hint();
                self.page.show_explanation();
                InputStep::Idle
            }
            Transition::Query { ticket } => {
                self.page.clear_results();
                self.page.hide_explanation();
                self.page.set_hint(format!("Completions for “{value}”"));
                InputStep::Pending(PendingQuery {
                    ticket,
                    query: value.to_string(),
                    adapter,
                })
            }
        }
    }

    /// Render a query's response unless a newer event superseded it.
    pub fn finish_query(&mut self, response: QueryResponse) -> InputOutcome {
        if !self.controller.is_current(response.ticket) {
            debug!("Discarding stale results for '{}'", response.query);
            return InputOutcome::Stale;
        }

        self.page.clear_results();
        match response.outcome {
            Ok(results) => {
                if let Some(list) = self.renderer.render(&response.query, &results) {
                    self.page.append_results(list);
                }
                InputOutcome::Rendered {
                    results: results.len(),
                }
            }
            Err(err) => {
                match &err {
                    QueryError::Parse(e) => {
                        warn!("Malformed results for '{}': {}", response.query, e)
                    }
                    other => warn!("Query '{}' failed: {}", response.query, other),
                }
                InputOutcome::Failed(err)
            }
        }
    }

    /// Handle one content-change event to completion.
    pub async fn input(&mut self, value: &str) -> InputOutcome {
        match self.begin_input(value) {
            InputStep::Rejected => InputOutcome::Rejected,
            InputStep::Idle => InputOutcome::Idle,
            InputStep::Pending(pending) => {
                let response = pending.run().await;
                self.finish_query(response)
            }
        }
    }

    /// Run the reserved page query when `prefill_from_url` is enabled.
    pub async fn prefill(&mut self) -> Option<InputOutcome> {
        if !self.config.prefill_from_url || !self.is_ready() {
            return None;
        }
        let query = self.reserved_query.clone().filter(|q| !q.is_empty())?;
        info!("Prefilling query '{}' from page URL", query);
        Some(self.input(&query).await)
    }
}
