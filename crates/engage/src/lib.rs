#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod models;
pub mod ordering;
pub mod report;
pub mod scoring;
pub mod store;
pub mod utils;

pub use cli::app::{Cli, Command};
pub use report::{QueryExecutionError, QueryStage, load_page, run_engagement_report};
