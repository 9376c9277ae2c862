//! Security checks: entry-name screening, path containment, extraction
//! limits and password strength hints.

pub mod names;
pub mod password;
pub mod path;
pub mod quota;

pub use names::UnsafeReason;
pub use names::check_entry_name;
pub use password::PasswordStrength;
pub use password::assess;
pub use path::resolve_entry;
pub use path::validate;
pub use quota::QuotaTracker;
pub use quota::validate_compression_ratio;
