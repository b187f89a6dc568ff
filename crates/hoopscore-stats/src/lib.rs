// Stats sources: the remote league dashboard endpoint and on-disk snapshots.

pub mod client;
pub mod fetcher;
pub mod snapshot;

pub use client::NbaStatsClient;
pub use fetcher::{FetchError, FetchRequest, PerMode, StatsFetcher};
pub use snapshot::SnapshotFetcher;
