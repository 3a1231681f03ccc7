pub mod models;
pub mod reader;

pub use reader::SnapshotReader;
