use crate::error::GenerationError;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt::Debug;

/// Default nonce length, in generator units.
pub const DEFAULT_NONCE_LENGTH: usize = 10;

/// URL-safe alphabet used by [`NanoidGenerator`]. 64 symbols, so each random
/// byte maps onto it without bias after masking.
pub const URL_ALPHABET: &[u8; 64] =
    b"_-0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Source of fresh nonces.
///
/// `length` is a hint; implementations may return a different length and the
/// caller does not re-validate it.
pub trait NonceGenerator: Debug + Send + Sync {
    fn generate(&self, length: usize) -> Result<Vec<u8>, GenerationError>;
}

/// Random URL-safe identifier backed by the OS entropy source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NanoidGenerator;

impl NonceGenerator for NanoidGenerator {
    fn generate(&self, length: usize) -> Result<Vec<u8>, GenerationError> {
        let mut bytes = vec![0u8; length];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| GenerationError::new(e.to_string()))?;
        Ok(bytes
            .into_iter()
            .map(|b| URL_ALPHABET[(b & 63) as usize])
            .collect())
    }
}
