//! Password credentials stored in the archive comment.

pub mod credential;

pub use credential::Credential;
pub use credential::derive;
pub use credential::encode;
pub use credential::is_credential;
pub use credential::verify;
