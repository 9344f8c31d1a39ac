pub mod aggregate;
pub mod api;
pub mod core;
pub mod document;
pub mod edgar;
pub mod eligibility;
pub mod error;
pub mod ir;
pub mod relay;
pub mod utils;

// Re-exports
pub use crate::core::init;
pub use crate::core::{QuickFilingsConfig, SearchRequest, SearchResult, SearchService};
pub use error::FilingsError;
