//! Cooperative cancellation for long-running archive operations.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use crate::ArchiveError;
use crate::Result;

/// Shared flag checked between entries by the writer and the reader.
///
/// Clones observe the same flag, so a token handed to an operation can be
/// cancelled from another thread.
///
/// # Examples
///
/// ```
/// use sealpack_core::CancelToken;
///
/// let token = CancelToken::new();
/// let handle = token.clone();
/// assert!(!token.is_cancelled());
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once `cancel` has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Returns `Err(Cancelled)` if an optional token has been cancelled.
pub(crate) fn check(token: Option<&CancelToken>) -> Result<()> {
    if token.is_some_and(CancelToken::is_cancelled) {
        return Err(ArchiveError::Cancelled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_without_token() {
        assert!(check(None).is_ok());
    }

    #[test]
    fn test_check_cancelled_token() {
        let token = CancelToken::new();
        assert!(check(Some(&token)).is_ok());
        token.clone().cancel();
        assert!(matches!(check(Some(&token)), Err(ArchiveError::Cancelled)));
    }
}
