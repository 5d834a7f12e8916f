//! Keyed MAC generation over ordered parts.
//!
//! Every signature the client produces goes through [`HashGenerator`]:
//!
//! ```text
//! api sign      = HEX(HMAC(secret, data))
//! client token  = HEX(HMAC(secret, user || timestamp || info))
//! channel sign  = HEX(HMAC(secret, client || channel || info))
//! ```
//!
//! Parts are concatenated with no separator, so callers must keep fields
//! unambiguous (fixed-format timestamps, ids without embedded ambiguity).

use std::fmt;

use centrifuge_core::{CentrifugeError, CentrifugeResult, DEFAULT_SECRET, HashAlgorithm};
use hmac::{Hmac, KeyInit, Mac};
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;
use tracing::debug;

type HmacMd5 = Hmac<Md5>;
type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

/// A MAC already keyed with the secret. Each signature starts from a clone,
/// so no state leaks between calls.
#[derive(Clone)]
enum KeyedMac {
    Md5(HmacMd5),
    Sha1(HmacSha1),
    Sha256(HmacSha256),
    Sha384(HmacSha384),
    Sha512(HmacSha512),
}

impl KeyedMac {
    fn new(algorithm: HashAlgorithm, secret: &[u8]) -> CentrifugeResult<Self> {
        let keyed = match algorithm {
            HashAlgorithm::Md5 => HmacMd5::new_from_slice(secret).map(Self::Md5),
            HashAlgorithm::Sha1 => HmacSha1::new_from_slice(secret).map(Self::Sha1),
            HashAlgorithm::Sha256 => HmacSha256::new_from_slice(secret).map(Self::Sha256),
            HashAlgorithm::Sha384 => HmacSha384::new_from_slice(secret).map(Self::Sha384),
            HashAlgorithm::Sha512 => HmacSha512::new_from_slice(secret).map(Self::Sha512),
        };
        keyed.map_err(|e| CentrifugeError::Config(format!("invalid {algorithm} key: {e}")))
    }
}

/// Computes lower-case hex HMAC digests with a secret bound at construction.
///
/// `HashGenerator` is immutable and `Send + Sync`; share it freely.
///
/// # Examples
///
/// ```
/// use centrifuge_auth::HashGenerator;
///
/// let generator = HashGenerator::new("bar").unwrap();
/// assert_eq!(
///     generator.generate(["foo"]),
///     "147933218aaabc0b8b10a2b3a5c34684c8d94341bcf10a4736dc7270f7741851",
/// );
/// ```
#[derive(Clone)]
pub struct HashGenerator {
    algorithm: HashAlgorithm,
    mac: KeyedMac,
}

impl HashGenerator {
    /// Create a generator using HMAC-SHA256.
    ///
    /// # Errors
    ///
    /// Returns [`CentrifugeError::Config`] if the MAC rejects the key.
    pub fn new(secret: &str) -> CentrifugeResult<Self> {
        Self::with_algorithm(secret, HashAlgorithm::default())
    }

    /// Create a generator for a specific digest algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`CentrifugeError::Config`] if the MAC rejects the key.
    pub fn with_algorithm(secret: &str, algorithm: HashAlgorithm) -> CentrifugeResult<Self> {
        let mac = KeyedMac::new(algorithm, secret.as_bytes())?;
        Ok(Self { algorithm, mac })
    }

    /// The digest algorithm in use.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Feed `parts` into a fresh MAC in order and return the hex digest.
    pub fn generate<I, T>(&self, parts: I) -> String
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        match &self.mac {
            KeyedMac::Md5(mac) => digest_hex(mac, parts),
            KeyedMac::Sha1(mac) => digest_hex(mac, parts),
            KeyedMac::Sha256(mac) => digest_hex(mac, parts),
            KeyedMac::Sha384(mac) => digest_hex(mac, parts),
            KeyedMac::Sha512(mac) => digest_hex(mac, parts),
        }
    }

    /// Check a hex signature against the one recomputed from `parts`.
    ///
    /// The comparison runs in constant time; hex case is ignored.
    pub fn verify<I, T>(&self, parts: I, signature: &str) -> bool
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let expected = self.generate(parts);
        let provided = signature.to_ascii_lowercase();
        let matched: bool = provided.as_bytes().ct_eq(expected.as_bytes()).into();
        if !matched {
            debug!(algorithm = %self.algorithm, "signature mismatch");
        }
        matched
    }

    /// Sign a serialized API request body.
    #[must_use]
    pub fn api_sign(&self, data: &str) -> String {
        self.generate([data])
    }

    /// Token an end-user client presents when connecting.
    ///
    /// `timestamp` must be the exact string the client sends in its handshake.
    #[must_use]
    pub fn client_token(&self, user: &str, timestamp: &str, info: &str) -> String {
        self.generate([user, timestamp, info])
    }

    /// Sign a private-channel subscription for connection `client`.
    #[must_use]
    pub fn channel_sign(&self, client: &str, channel: &str, info: &str) -> String {
        self.generate([client, channel, info])
    }
}

impl Default for HashGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET).expect("HMAC can accept keys of any length")
    }
}

impl fmt::Debug for HashGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashGenerator")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

fn digest_hex<M, I, T>(template: &M, parts: I) -> String
where
    M: Mac + Clone,
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut mac = template.clone();
    for part in parts {
        mac.update(part.as_ref());
    }
    hex::encode(mac.finalize().into_bytes())
}
