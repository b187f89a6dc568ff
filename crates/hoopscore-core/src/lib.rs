// Library root: tabular data model, run configuration, ranking pipeline and
// CSV output shared by the fetcher and CLI crates.

pub mod config;
pub mod dataset;
pub mod output;
pub mod valuation;
