pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod pager;
pub mod prompt;
pub mod record;
pub mod session;
pub mod stats;
