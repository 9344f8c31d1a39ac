pub mod config;
pub mod init;
pub mod service;
pub mod types;

pub use config::QuickFilingsConfig;
pub use service::SearchService;
pub use types::{SearchRequest, SearchResult};
