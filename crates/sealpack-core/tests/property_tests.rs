//! Property-based tests for the path guard, credentials and digests.
//!
//! These tests use proptest to generate arbitrary inputs and check that the
//! security properties hold across a wide range of cases.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Cursor;
use std::path::Path;
use std::path::PathBuf;

use proptest::prelude::*;
use sealpack_core::HashAlgorithm;
use sealpack_core::HashEngine;
use sealpack_core::crypto;
use sealpack_core::security::UnsafeReason;
use sealpack_core::security::resolve_entry;
use sealpack_core::security::validate;
use sha2::Digest;

fn root() -> PathBuf {
    PathBuf::from(if cfg!(windows) { r"C:\srv\out" } else { "/srv/out" })
}

proptest! {
    /// Anything that climbs above its own depth escapes the root.
    #[test]
    fn prop_parent_traversal_rejected(
        depth in 0usize..4,
        extra in 1usize..4,
        tail in prop::collection::vec("x[a-z]{0,7}", 0..3),
    ) {
        let mut parts: Vec<String> = (0..depth).map(|i| format!("d{i}")).collect();
        parts.extend(std::iter::repeat_n("..".to_string(), depth + extra));
        parts.extend(tail);
        let name = parts.join("/");
        prop_assert_eq!(resolve_entry(&root(), &name), Err(UnsafeReason::EscapesRoot));
    }

    /// Plain relative names always stay below the root.
    #[test]
    fn prop_plain_names_accepted(
        components in prop::collection::vec("[a-zA-Z0-9_-]{1,20}", 1..6)
    ) {
        let name = components.join("/");
        let resolved = resolve_entry(&root(), &name).unwrap();
        prop_assert!(resolved.starts_with(root()));
        prop_assert!(validate(&resolved, &root()));
    }

    /// Whatever the name, an accepted resolution is contained.
    #[test]
    fn prop_resolution_is_contained(name in "[a-z./]{0,30}") {
        if let Ok(resolved) = resolve_entry(&root(), &name) {
            prop_assert!(validate(&resolved, &root()), "{} escaped", resolved.display());
        }
    }

    /// A sibling directory sharing the root's prefix is never inside it.
    #[test]
    fn prop_shared_prefix_sibling_rejected(suffix in "[a-z0-9-]{1,10}") {
        let sibling = format!("{}{suffix}", root().display());
        prop_assert!(!validate(Path::new(&sibling), &root()));
    }

    /// Streaming in any chunk size gives the one-shot digest.
    #[test]
    fn prop_chunked_digest_matches_reference(
        data in prop::collection::vec(any::<u8>(), 0..4096),
        chunk in 1usize..512,
    ) {
        let result = HashEngine::new()
            .with_chunk_size(chunk)
            .digest(Cursor::new(&data), HashAlgorithm::Sha256, None, None)
            .unwrap();
        prop_assert_eq!(result.hex, hex::encode(sha2::Sha256::digest(&data)));
        prop_assert_eq!(result.byte_len, data.len() as u64);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    /// Only the password that produced a credential verifies against it.
    #[test]
    fn prop_credential_round_trip(
        password in "[ -~]{1,24}",
        other in "[ -~]{1,24}",
        salt in prop::collection::vec(any::<u8>(), 8..32),
    ) {
        let digest = crypto::derive(&password, 1, &salt).unwrap();
        let encoded = crypto::encode(1, &salt, &digest);
        prop_assert!(crypto::is_credential(&encoded));
        prop_assert!(crypto::verify(&password, &encoded));
        if other != password {
            prop_assert!(!crypto::verify(&other, &encoded));
        }
    }

    /// Arbitrary comments never verify and never panic.
    #[test]
    fn prop_garbage_credentials_fail_closed(
        comment in ".{0,120}",
        password in ".{0,16}",
    ) {
        prop_assert!(!crypto::verify(&password, &comment));
    }
}
