//! ZIP container access shared by the writer, the reader and listing.

use std::fs::File;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Seek;
use std::path::Path;

use zip::ZipArchive;
use zip::read::ZipFile;

use crate::ArchiveError;
use crate::Result;
use crate::crypto::is_credential;
use crate::types::ArchiveEntry;
use crate::types::EntryKind;

const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

/// Opens an archive file, mapping a missing file to `NotFound`.
pub(crate) fn open(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ArchiveError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ArchiveError::Io(e),
    })?;
    Ok(ZipArchive::new(file)?)
}

/// Returns the archive comment if it carries a credential marker.
pub(crate) fn credential_comment<R: Read + Seek>(archive: &ZipArchive<R>) -> Option<&str> {
    std::str::from_utf8(archive.comment())
        .ok()
        .filter(|comment| is_credential(comment))
}

/// Classifies a container entry.
pub(crate) fn entry_kind<R: Read + Seek>(file: &ZipFile<'_, R>) -> EntryKind {
    if file.is_dir() {
        EntryKind::Directory
    } else if file
        .unix_mode()
        .is_some_and(|mode| mode & S_IFMT == S_IFLNK)
    {
        EntryKind::Symlink
    } else {
        EntryKind::File
    }
}

/// Reads every entry record from the central directory without
/// decompressing anything.
pub(crate) fn entries<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<ArchiveEntry>> {
    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let file = archive.by_index_raw(index)?;
        let kind = entry_kind(&file);
        let name = file.name();
        let path = match kind {
            EntryKind::Directory => name.trim_end_matches('/'),
            EntryKind::File | EntryKind::Symlink => name,
        };
        entries.push(ArchiveEntry {
            path: path.to_string(),
            kind,
            size: file.size(),
            compressed_size: file.compressed_size(),
        });
    }
    Ok(entries)
}
