pub mod annotator;
pub mod snapshot_writer;
