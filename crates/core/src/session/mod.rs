pub mod aggregator;
pub mod export;
pub mod recorder;
pub mod session;
pub mod summary;
pub mod summary_store;
