// Module declarations
pub mod engine;
pub mod framing;
pub mod process;
pub mod result;

// Re-export public APIs
pub use engine::{EngineFactory, EngineOutput, SearchEngine, SearchEngineAdapter};
pub use process::{FramedEngine, ProcessEngineFactory};
pub use result::{SearchResult, SimilarEntry, parse_results};
