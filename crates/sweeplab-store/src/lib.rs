//! Filesystem persistence and aggregation exports for run results.

mod export;
mod store;

pub use export::export_metrics_csv;
pub use store::{
    CollectionReport, LoadFailure, ResultStore, SaveReport, StorageFormat, LEGACY_FILE,
    PRIMARY_FILE,
};
