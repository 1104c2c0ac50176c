use std::time::Duration;

use thiserror::Error;

/// Failure while retrieving the four static resources.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load resource '{path}': {reason}")]
    Fetch { path: String, reason: String },

    #[error("resource loading timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure while constructing the search engine from a loaded bundle.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("search engine construction failed: {0}")]
    Construction(String),

    #[error("search engine construction timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure of a single query. Never fatal to the session.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The engine answered but its payload was not a valid result list.
    #[error("malformed search payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("search engine error: {0}")]
    Engine(String),

    #[error("query timed out after {0:?}")]
    Timeout(Duration),
}

/// Fatal initialization failure. The entry field stays disabled.
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl InitError {
    /// Short message shown in the page's status banner.
    pub fn banner_message(&self) -> String {
        match self {
            InitError::Load(_) => format!("Could not load dictionary data. {self}"),
            InitError::Engine(_) => format!("Could not start the search engine. {self}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_is_distinct_from_engine_error() {
        let parse_err = serde_json::from_str::<Vec<u32>>("[1,").unwrap_err();
        let err = QueryError::from(parse_err);
        assert!(matches!(err, QueryError::Parse(_)));
        assert!(err.to_string().starts_with("malformed search payload"));
    }

    #[test]
    fn test_banner_message_names_failed_stage() {
        let err = InitError::from(LoadError::Fetch {
            path: "pu.csv".to_string(),
            reason: "HTTP 404".to_string(),
        });
        let message = err.banner_message();
        assert!(message.starts_with("Could not load dictionary data."));
        assert!(message.contains("pu.csv"));

        let err = InitError::from(EngineError::Construction("bad model".to_string()));
        assert!(err.banner_message().contains("bad model"));
    }
}
