//! Streaming content digests.

mod algorithm;
mod engine;

pub use algorithm::HashAlgorithm;
pub use algorithm::Hasher;
pub use engine::DEFAULT_CHUNK_SIZE;
pub use engine::DigestProgress;
pub use engine::DigestResult;
pub use engine::HashEngine;
