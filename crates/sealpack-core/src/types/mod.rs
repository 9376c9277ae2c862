//! Value types shared by the writer and the reader.

pub mod dest_dir;
pub mod entry;

pub use dest_dir::DestDir;
pub use entry::ArchiveEntry;
pub use entry::EntryKind;
