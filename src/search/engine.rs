use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;
use tracing::{debug, info};

use super::result::{SearchResult, parse_results};
use crate::error::{EngineError, QueryError};
use crate::loader::ResourceBundle;

/// What an engine hands back for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOutput {
    /// Serialized result list, for engines behind a serialization boundary
    Json(String),
    /// Already typed results, for in-process engines
    Results(Vec<SearchResult>),
}

/// The external search/ranking engine
#[async_trait]
pub trait SearchEngine: Send + Sync + Debug {
    /// Look up completions for the typed prefix, best first
    async fn search(&self, query: &str) -> Result<EngineOutput>;
}

/// Builds an engine from the four loaded resources
#[async_trait]
pub trait EngineFactory: Send + Sync {
    async fn construct(&self, bundle: &ResourceBundle) -> Result<Box<dyn SearchEngine>>;
}

/// Owns the single engine instance of a session and turns its answers into
/// typed result lists.
#[derive(Debug)]
pub struct SearchEngineAdapter {
    engine: Box<dyn SearchEngine>,
    query_timeout: Duration,
}

impl SearchEngineAdapter {
    /// Construct the engine once from a complete resource bundle
    pub async fn construct(
        factory: &dyn EngineFactory,
        bundle: &ResourceBundle,
        timeout: Duration,
        query_timeout: Duration,
    ) -> Result<Self, EngineError> {
        info!("Constructing search engine ({} bytes of data)", bundle.total_len());

        let engine = tokio::time::timeout(timeout, factory.construct(bundle))
            .await
            .map_err(|_| EngineError::Timeout(timeout))?
            .map_err(|e| EngineError::Construction(format!("{e:#}")))?;

        info!("Finished search init");
        Ok(Self::from_engine(engine, query_timeout))
    }

    pub fn from_engine(engine: Box<dyn SearchEngine>, query_timeout: Duration) -> Self {
        Self {
            engine,
            query_timeout,
        }
    }

    /// Run one query. A malformed payload is reported as `QueryError::Parse`,
    /// which is distinct from an empty result list.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, QueryError> {
        let output = tokio::time::timeout(self.query_timeout, self.engine.search(query))
            .await
            .map_err(|_| QueryError::Timeout(self.query_timeout))?
            .map_err(|e| QueryError::Engine(format!("{e:#}")))?;

        let results = match output {
            EngineOutput::Json(json) => parse_results(&json)?,
            EngineOutput::Results(results) => results,
        };
        debug!("Query '{}' returned {} results", query, results.len());
        Ok(results)
    }
}
