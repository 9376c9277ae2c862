//! Password credential derivation, encoding and verification.
//!
//! A credential is stored as `tag$iterations$salt-hex$digest-hex`. The tag
//! pins every derivation parameter not carried in the string (Argon2id,
//! version 0x13, memory cost, one lane, 32-byte output), so a future scheme
//! gets a new tag and old archives keep verifying under the old one.
//!
//! Hex fields must be lowercase and the iteration count must be canonical
//! decimal. Accepting alternative spellings would let a tampered string
//! still verify.

use std::fmt;

use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;
use rand::RngCore;
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;

use crate::error::CredentialError;

/// Tag of the current derivation scheme.
pub const ALGORITHM_TAG: &str = "argon2id-m19456-p1";

/// Field separator. Never appears in any encoded field.
pub const SEPARATOR: char = '$';

/// Argon2 time cost used for new archives.
pub const DEFAULT_ITERATIONS: u32 = 2;

/// Highest time cost accepted from a stored credential.
///
/// Bounds the work an attacker-supplied archive can force on `verify`.
pub const MAX_ITERATIONS: u32 = 64;

/// Salt length for new credentials, in bytes.
pub const SALT_LEN: usize = 16;

/// Derived digest length, in bytes.
pub const DIGEST_LEN: usize = 32;

const MEMORY_COST_KIB: u32 = 19_456;
const LANES: u32 = 1;
const MIN_SALT_LEN: usize = 8;
const MAX_SALT_LEN: usize = 64;

/// Derives a digest from a password.
///
/// Deterministic for identical inputs.
///
/// # Errors
///
/// Returns `CredentialError::InvalidIterations` if `iterations` is outside
/// `1..=MAX_ITERATIONS`, `InvalidSalt` if the salt length is out of range,
/// and `Derivation` if Argon2 rejects the parameters.
pub fn derive(
    password: &str,
    iterations: u32,
    salt: &[u8],
) -> Result<[u8; DIGEST_LEN], CredentialError> {
    if iterations == 0 || iterations > MAX_ITERATIONS {
        return Err(CredentialError::InvalidIterations(u64::from(iterations)));
    }
    if !(MIN_SALT_LEN..=MAX_SALT_LEN).contains(&salt.len()) {
        return Err(CredentialError::InvalidSalt);
    }

    let params = Params::new(MEMORY_COST_KIB, iterations, LANES, Some(DIGEST_LEN))
        .map_err(|e| CredentialError::Derivation(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut digest = [0u8; DIGEST_LEN];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut digest)
        .map_err(|e| CredentialError::Derivation(e.to_string()))?;
    Ok(digest)
}

/// Serializes a credential as `tag$iterations$salt-hex$digest-hex`.
#[must_use]
pub fn encode(iterations: u32, salt: &[u8], digest: &[u8]) -> String {
    format!(
        "{ALGORITHM_TAG}{SEPARATOR}{iterations}{SEPARATOR}{}{SEPARATOR}{}",
        hex::encode(salt),
        hex::encode(digest)
    )
}

/// Checks `password` against an encoded credential.
///
/// Returns `false` for a wrong password and for any malformed, tampered or
/// unrecognised credential string. Never panics.
///
/// # Examples
///
/// ```
/// use sealpack_core::crypto::Credential;
/// use sealpack_core::crypto::verify;
///
/// let stored = Credential::create("p@ss", 1).unwrap().to_string();
/// assert!(verify("p@ss", &stored));
/// assert!(!verify("wrong", &stored));
/// assert!(!verify("p@ss", "not a credential"));
/// ```
#[must_use]
pub fn verify(password: &str, credential: &str) -> bool {
    Credential::parse(credential).is_ok_and(|credential| credential.verify(password))
}

/// Returns `true` if a container comment carries a credential marker.
///
/// Any comment with exactly four `$`-delimited fields counts, including
/// ones with an unknown tag, so that unrecognised schemes fail closed
/// instead of being treated as unprotected.
#[must_use]
pub fn is_credential(comment: &str) -> bool {
    comment.split(SEPARATOR).count() == 4
}

/// Fills a fresh random salt from the operating system RNG.
#[must_use]
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// A parsed password credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    iterations: u32,
    salt: Vec<u8>,
    digest: [u8; DIGEST_LEN],
}

impl Credential {
    /// Derives a credential for `password` with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Propagates derivation failures from [`derive`].
    pub fn create(password: &str, iterations: u32) -> Result<Self, CredentialError> {
        let salt = generate_salt();
        let digest = derive(password, iterations, &salt)?;
        Ok(Self {
            iterations,
            salt: salt.to_vec(),
            digest,
        })
    }

    /// Parses an encoded credential string.
    ///
    /// # Errors
    ///
    /// - `Malformed`: wrong field count, non-canonical fields or wrong
    ///   digest length
    /// - `UnsupportedAlgorithm`: tag is not [`ALGORITHM_TAG`]
    /// - `InvalidIterations`: count is zero or above [`MAX_ITERATIONS`]
    /// - `InvalidSalt`: salt is not lowercase hex or has a bad length
    pub fn parse(encoded: &str) -> Result<Self, CredentialError> {
        let fields: Vec<&str> = encoded.split(SEPARATOR).collect();
        let [tag, iterations, salt, digest] = fields.as_slice() else {
            return Err(CredentialError::Malformed);
        };

        if *tag != ALGORITHM_TAG {
            return Err(CredentialError::UnsupportedAlgorithm((*tag).to_string()));
        }

        let iterations = parse_iterations(iterations)?;
        let salt = decode_lower_hex(salt).ok_or(CredentialError::InvalidSalt)?;
        if !(MIN_SALT_LEN..=MAX_SALT_LEN).contains(&salt.len()) {
            return Err(CredentialError::InvalidSalt);
        }

        let digest: [u8; DIGEST_LEN] = decode_lower_hex(digest)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(CredentialError::Malformed)?;

        Ok(Self {
            iterations,
            salt,
            digest,
        })
    }

    /// Re-derives from `password` and compares in constant time.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        match derive(password, self.iterations, &self.salt) {
            Ok(candidate) => candidate.as_slice().ct_eq(self.digest.as_slice()).into(),
            Err(_) => false,
        }
    }

    /// Returns the work factor.
    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Returns the salt bytes.
    #[must_use]
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self.iterations, &self.salt, &self.digest))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("algorithm", &ALGORITHM_TAG)
            .field("iterations", &self.iterations)
            .field("salt", &hex::encode(&self.salt))
            .finish_non_exhaustive()
    }
}

fn parse_iterations(field: &str) -> Result<u32, CredentialError> {
    let canonical = !field.is_empty()
        && field.bytes().all(|b| b.is_ascii_digit())
        && !field.starts_with('0');
    if !canonical {
        return Err(CredentialError::Malformed);
    }

    let value: u64 = field.parse().map_err(|_| CredentialError::Malformed)?;
    u32::try_from(value)
        .ok()
        .filter(|n| (1..=MAX_ITERATIONS).contains(n))
        .ok_or(CredentialError::InvalidIterations(value))
}

fn decode_lower_hex(field: &str) -> Option<Vec<u8>> {
    if !field.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return None;
    }
    hex::decode(field).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SALT: [u8; SALT_LEN] = [7u8; SALT_LEN];

    #[test]
    fn test_derive_is_deterministic() {
        let a = derive("correct horse", 1, &SALT).unwrap();
        let b = derive("correct horse", 1, &SALT).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_derive_depends_on_every_input() {
        let base = derive("password", 1, &SALT).unwrap();
        assert_ne!(base, derive("passwore", 1, &SALT).unwrap());
        assert_ne!(base, derive("password", 2, &SALT).unwrap());

        let mut other_salt = SALT;
        other_salt[0] ^= 1;
        assert_ne!(base, derive("password", 1, &other_salt).unwrap());
    }

    #[test]
    fn test_derive_rejects_bad_parameters() {
        assert_eq!(
            derive("pw", 0, &SALT),
            Err(CredentialError::InvalidIterations(0))
        );
        assert_eq!(
            derive("pw", MAX_ITERATIONS + 1, &SALT),
            Err(CredentialError::InvalidIterations(u64::from(MAX_ITERATIONS) + 1))
        );
        assert_eq!(derive("pw", 1, &[1, 2, 3]), Err(CredentialError::InvalidSalt));
    }

    #[test]
    fn test_encode_format() {
        let encoded = encode(3, &[0xab, 0xcd], &[0x01, 0xff]);
        assert_eq!(encoded, format!("{ALGORITHM_TAG}$3$abcd$01ff"));
        assert!(is_credential(&encoded));
    }

    #[test]
    fn test_round_trip() {
        let digest = derive("p@ss", 1, &SALT).unwrap();
        let encoded = encode(1, &SALT, &digest);
        assert!(verify("p@ss", &encoded));
        for wrong in ["", "p@s", "p@ss ", "P@SS", "wrong"] {
            assert!(!verify(wrong, &encoded), "{wrong:?} must not verify");
        }
    }

    #[test]
    fn test_fresh_salt_per_credential() {
        let a = Credential::create("same", 1).unwrap();
        let b = Credential::create("same", 1).unwrap();
        assert_ne!(a.salt(), b.salt());
        assert_ne!(a.to_string(), b.to_string());
        assert!(a.verify("same"));
        assert!(b.verify("same"));
    }

    #[test]
    fn test_parse_display_round_trip() {
        let credential = Credential::create("pw", 1).unwrap();
        let parsed = Credential::parse(&credential.to_string()).unwrap();
        assert_eq!(parsed, credential);
        assert_eq!(parsed.iterations(), 1);
    }

    #[test]
    fn test_unknown_tag_fails_closed() {
        let digest = derive("pw", 1, &SALT).unwrap();
        let forged = format!(
            "plaintext$1${}${}",
            hex::encode(SALT),
            hex::encode(digest)
        );
        assert!(is_credential(&forged));
        assert!(matches!(
            Credential::parse(&forged),
            Err(CredentialError::UnsupportedAlgorithm(_))
        ));
        assert!(!verify("pw", &forged));
    }

    #[test]
    fn test_non_canonical_fields_rejected() {
        let digest = derive("pw", 1, &SALT).unwrap();
        let salt_hex = hex::encode(SALT);
        let digest_hex = hex::encode(digest);

        let upper = format!(
            "{ALGORITHM_TAG}$1${salt_hex}${}",
            digest_hex.to_uppercase()
        );
        assert!(!verify("pw", &upper));

        let leading_zero = format!("{ALGORITHM_TAG}$01${salt_hex}${digest_hex}");
        assert!(!verify("pw", &leading_zero));

        let signed = format!("{ALGORITHM_TAG}$+1${salt_hex}${digest_hex}");
        assert!(!verify("pw", &signed));
    }

    #[test]
    fn test_malformed_inputs_return_false() {
        let inputs = [
            String::new(),
            "$$$".to_string(),
            "a$b$c".to_string(),
            "a$b$c$d$e".to_string(),
            format!("{ALGORITHM_TAG}$1$zz$00"),
            format!("{ALGORITHM_TAG}$99999999999$00112233445566778899$00"),
            format!("{ALGORITHM_TAG}$1$0011223344556677$0011"),
        ];
        for input in &inputs {
            assert!(!verify("pw", input), "{input:?}");
        }
    }

    #[test]
    fn test_excessive_iterations_rejected_before_derivation() {
        let encoded = format!(
            "{ALGORITHM_TAG}$4294967295${}${}",
            hex::encode(SALT),
            hex::encode([0u8; DIGEST_LEN])
        );
        assert_eq!(
            Credential::parse(&encoded),
            Err(CredentialError::InvalidIterations(u64::from(u32::MAX)))
        );
    }

    #[test]
    fn test_single_character_tamper_fails_closed() {
        let encoded = encode(1, &SALT, &derive("secret", 1, &SALT).unwrap());

        for (index, original) in encoded.char_indices() {
            let replacement = match original {
                '0' => '1',
                '$' => '#',
                _ => '0',
            };
            let mut tampered = encoded.clone();
            tampered.replace_range(index..index + original.len_utf8(), &replacement.to_string());
            assert!(
                !verify("secret", &tampered),
                "tamper at {index} still verified: {tampered}"
            );
        }
    }

    #[test]
    fn test_debug_hides_digest() {
        let credential = Credential::create("pw", 1).unwrap();
        let digest_hex = credential
            .to_string()
            .rsplit(SEPARATOR)
            .next()
            .unwrap()
            .to_string();
        assert!(!format!("{credential:?}").contains(&digest_hex));
    }
}
