//! Archive creation: source traversal, ZIP writing and result metadata.

pub mod config;
pub mod filters;
pub mod metadata;
pub mod walker;
pub mod writer;

pub use config::CreateOptions;
pub use metadata::ArchiveMetadata;
pub use metadata::compression_ratio;
pub use writer::ArchiveWriter;
