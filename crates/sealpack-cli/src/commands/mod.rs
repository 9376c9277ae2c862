//! Subcommand implementations.

pub mod check;
pub mod completion;
pub mod create;
pub mod extract;
pub mod hash;
pub mod list;
