pub mod client;
pub mod filing;
pub mod names;
pub mod report;
pub mod resolver;
pub mod tickers;
pub mod utils;

pub use client::{EdgarClient, FilingFeed};
pub use resolver::IdentifierResolver;
pub use tickers::{Exchange, FilerIdentity, Ticker};
