use crate::difficulty::DigestEncoding;
use crate::error::{Error, GenerationError, VerifyError};
use crate::hash::{HashAlgorithm, HashFunction};
use crate::nonce::{NanoidGenerator, NonceGenerator, DEFAULT_NONCE_LENGTH};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Partially filled settings for [`Pow::new`]. Unset fields fall back to
/// defaults at construction time.
#[derive(Builder, Clone, Default)]
#[builder(
    pattern = "owned",
    default,
    build_fn(private, name = "build_options")
)]
pub struct PowOptions {
    /// Keying material mixed into nonce signatures.
    #[builder(setter(into))]
    pub secret: Vec<u8>,
    /// Length hint for the nonce generator; 0 means the default of 10.
    pub nonce_length: usize,
    /// Sign issued nonces and require signatures on verification.
    pub check: bool,
    /// Required leading zeros, in bits or hex characters depending on `encoding`.
    pub difficulty: u32,
    pub encoding: DigestEncoding,
    #[builder(setter(strip_option))]
    pub nonce_generator: Option<Arc<dyn NonceGenerator>>,
    #[builder(setter(strip_option))]
    pub hasher: Option<Arc<dyn HashFunction>>,
}

impl Debug for PowOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowOptions")
            .field("secret", &"<redacted>")
            .field("nonce_length", &self.nonce_length)
            .field("check", &self.check)
            .field("difficulty", &self.difficulty)
            .field("encoding", &self.encoding)
            .field("nonce_generator", &self.nonce_generator)
            .field("hasher", &self.hasher)
            .finish()
    }
}

impl PowOptionsBuilder {
    /// Build a [`Pow`] from the collected options.
    pub fn build(self) -> Result<Pow, Error> {
        self.build_options()
            .map(Pow::new)
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

/// A nonce handed to a requester, with its signature when signing is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Challenge {
    pub nonce: Vec<u8>,
    pub signature: Option<Vec<u8>>,
}

impl Challenge {
    /// Signature bytes, empty when the challenge is unsigned.
    pub fn signature_bytes(&self) -> &[u8] {
        self.signature.as_deref().unwrap_or_default()
    }
}

/// Issues nonces and verifies proofs of work computed over them.
///
/// Immutable once built; every method is a function of its fields and
/// arguments, so one instance can be shared across threads.
#[derive(Clone)]
pub struct Pow {
    secret: Vec<u8>,
    nonce_length: usize,
    check: bool,
    difficulty: u32,
    encoding: DigestEncoding,
    nonce_generator: Arc<dyn NonceGenerator>,
    hasher: Arc<dyn HashFunction>,
}

impl Debug for Pow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pow")
            .field("secret", &"<redacted>")
            .field("nonce_length", &self.nonce_length)
            .field("check", &self.check)
            .field("difficulty", &self.difficulty)
            .field("encoding", &self.encoding)
            .field("nonce_generator", &self.nonce_generator)
            .field("hasher", &self.hasher)
            .finish()
    }
}

impl Default for Pow {
    fn default() -> Self {
        Self::new(PowOptions::default())
    }
}

impl Pow {
    /// Create a verifier, filling unset options with defaults.
    pub fn new(options: PowOptions) -> Self {
        let nonce_length = if options.nonce_length == 0 {
            DEFAULT_NONCE_LENGTH
        } else {
            options.nonce_length
        };
        Pow {
            secret: options.secret,
            nonce_length,
            check: options.check,
            difficulty: options.difficulty,
            encoding: options.encoding,
            nonce_generator: options
                .nonce_generator
                .unwrap_or_else(|| Arc::new(NanoidGenerator)),
            hasher: options
                .hasher
                .unwrap_or_else(|| Arc::new(HashAlgorithm::Sha2_256)),
        }
    }

    pub fn builder() -> PowOptionsBuilder {
        PowOptionsBuilder::default()
    }

    pub fn nonce_length(&self) -> usize {
        self.nonce_length
    }

    pub fn check(&self) -> bool {
        self.check
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn encoding(&self) -> DigestEncoding {
        self.encoding
    }

    pub fn nonce_generator(&self) -> &dyn NonceGenerator {
        self.nonce_generator.as_ref()
    }

    pub fn hasher(&self) -> &dyn HashFunction {
        self.hasher.as_ref()
    }

    /// Generate a fresh nonce, signed when `check` is enabled.
    pub fn issue(&self) -> Result<Challenge, GenerationError> {
        let nonce = match self.nonce_generator.generate(self.nonce_length) {
            Ok(nonce) => nonce,
            Err(err) => {
                tracing::warn!(%err, length = self.nonce_length, "nonce generator failed");
                return Err(err);
            }
        };
        let signature = self.check.then(|| self.sign(&nonce));
        tracing::debug!(
            nonce_len = nonce.len(),
            signed = signature.is_some(),
            "issued nonce"
        );
        Ok(Challenge { nonce, signature })
    }

    /// Signature binding `nonce` to the secret: `hash(nonce || secret)`.
    pub fn sign(&self, nonce: &[u8]) -> Vec<u8> {
        self.render_hash(&[nonce, self.secret.as_slice()])
    }

    /// Digest a requester submits for `data`: `hash(data || nonce)`.
    pub fn digest(&self, data: &[u8], nonce: &[u8]) -> Vec<u8> {
        self.render_hash(&[data, nonce])
    }

    /// Check the nonce signature (when enabled), then that `digest` is the
    /// hash of `data || nonce`.
    pub fn verify_hash(
        &self,
        nonce: &[u8],
        data: &[u8],
        digest: &[u8],
        signature: &[u8],
    ) -> Result<(), VerifyError> {
        if self.check {
            if signature.is_empty() {
                return Err(VerifyError::EmptySignature);
            }
            let expected = self.sign(nonce);
            if expected != signature {
                return Err(VerifyError::SignatureMismatch {
                    provided: self.to_text(signature),
                    expected: self.to_text(&expected),
                });
            }
        }

        if self.digest(data, nonce) != digest {
            return Err(VerifyError::DigestMismatch);
        }
        Ok(())
    }

    /// Whether `digest` carries at least `difficulty` leading zeros under
    /// this instance's encoding.
    pub fn verify_difficulty(&self, digest: &[u8]) -> bool {
        self.encoding.meets(digest, self.difficulty)
    }

    /// Difficulty first, then [`Pow::verify_hash`].
    pub fn verify_hash_at_difficulty(
        &self,
        nonce: &[u8],
        data: &[u8],
        digest: &[u8],
        signature: &[u8],
    ) -> Result<(), VerifyError> {
        if !self.verify_difficulty(digest) {
            return Err(VerifyError::DifficultyNotMet {
                difficulty: self.difficulty,
            });
        }
        self.verify_hash(nonce, data, digest, signature)
    }

    fn render_hash(&self, parts: &[&[u8]]) -> Vec<u8> {
        self.encoding.render(self.hasher.hash(&parts.concat()))
    }

    fn to_text(&self, bytes: &[u8]) -> String {
        match self.encoding {
            DigestEncoding::Raw => hex::encode(bytes),
            DigestEncoding::Hex => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}
