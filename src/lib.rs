pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod highlight;
pub mod loader;
pub mod render;
pub mod search;
pub mod session;
pub mod url_params;

pub use config::Config;
pub use session::{InputOutcome, Session};
