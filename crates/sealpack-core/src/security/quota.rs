//! Extraction limit tracking and zip bomb detection.

use crate::ArchiveError;
use crate::ExtractionLimits;
use crate::Result;
use crate::error::QuotaResource;

/// Tracks resource usage during extraction against `ExtractionLimits`.
#[derive(Debug)]
pub struct QuotaTracker<'a> {
    limits: &'a ExtractionLimits,
    entries_seen: usize,
    bytes_written: u64,
}

impl<'a> QuotaTracker<'a> {
    /// Creates a tracker with zero usage.
    #[must_use]
    pub fn new(limits: &'a ExtractionLimits) -> Self {
        Self {
            limits,
            entries_seen: 0,
            bytes_written: 0,
        }
    }

    /// Records one more entry.
    pub fn record_entry(&mut self) -> Result<()> {
        self.entries_seen += 1;
        if let Some(max) = self.limits.max_file_count
            && self.entries_seen > max
        {
            return Err(ArchiveError::QuotaExceeded {
                resource: QuotaResource::FileCount {
                    current: self.entries_seen,
                    max,
                },
            });
        }
        Ok(())
    }

    /// Records bytes actually written to disk.
    pub fn record_bytes(&mut self, bytes: u64) -> Result<()> {
        self.bytes_written =
            self.bytes_written
                .checked_add(bytes)
                .ok_or(ArchiveError::QuotaExceeded {
                    resource: QuotaResource::IntegerOverflow,
                })?;

        if let Some(max) = self.limits.max_total_size
            && self.bytes_written > max
        {
            return Err(ArchiveError::QuotaExceeded {
                resource: QuotaResource::TotalSize {
                    current: self.bytes_written,
                    max,
                },
            });
        }
        Ok(())
    }

    /// Returns the total bytes recorded.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

/// Validates an entry's declared compression ratio.
///
/// Entries with a zero compressed size are not judged here; their real
/// output is still bounded by the total size limit.
pub fn validate_compression_ratio(
    entry: &str,
    compressed_size: u64,
    uncompressed_size: u64,
    limits: &ExtractionLimits,
) -> Result<()> {
    let Some(max) = limits.max_compression_ratio else {
        return Ok(());
    };
    if compressed_size == 0 {
        return Ok(());
    }

    let ratio = uncompressed_size as f64 / compressed_size as f64;
    if ratio > max {
        return Err(ArchiveError::QuotaExceeded {
            resource: QuotaResource::CompressionRatio {
                entry: entry.to_string(),
                ratio,
                max,
            },
        });
    }
    Ok(())
}
