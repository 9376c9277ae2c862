//! Archive extraction: password gate, path guard and streaming to disk.

pub mod config;
pub mod reader;

pub use config::ExtractOptions;
pub use config::ExtractionLimits;
pub use reader::ArchiveReader;
