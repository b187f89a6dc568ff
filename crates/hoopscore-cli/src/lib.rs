// Library root for the CLI: argument handling and the run orchestration,
// exposed so integration tests can drive them with an in-memory fetcher.

pub mod app;
pub mod args;
