use ripemd::Ripemd320;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use std::fmt::Debug;

/// One-way function from arbitrary bytes to a fixed-size digest.
pub trait HashFunction: Debug + Send + Sync {
    fn hash(&self, input: &[u8]) -> Vec<u8>;
}

/// Built-in hash functions.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    #[default]
    Sha2_256,
    Sha2_512,
    #[serde(rename = "ripemd_320")]
    RIPEMD_320,
    Blake3,
}

impl HashAlgorithm {
    /// Calculates SHA-256 hash of the input.
    pub fn calculate_sha2_256(input: &[u8]) -> Vec<u8> {
        Sha256::digest(input).to_vec()
    }

    /// Calculates SHA-512 hash of the input.
    pub fn calculate_sha2_512(input: &[u8]) -> Vec<u8> {
        Sha512::digest(input).to_vec()
    }

    /// Calculates RIPEMD-320 hash of the input.
    pub fn calculate_ripemd_320(input: &[u8]) -> Vec<u8> {
        Ripemd320::digest(input).to_vec()
    }

    /// Calculates BLAKE3 hash of the input.
    pub fn calculate_blake3(input: &[u8]) -> Vec<u8> {
        blake3::hash(input).as_bytes().to_vec()
    }

    /// Digest size in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            Self::Sha2_256 | Self::Blake3 => 32,
            Self::Sha2_512 => 64,
            Self::RIPEMD_320 => 40,
        }
    }
}

impl HashFunction for HashAlgorithm {
    fn hash(&self, input: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha2_256 => Self::calculate_sha2_256(input),
            Self::Sha2_512 => Self::calculate_sha2_512(input),
            Self::RIPEMD_320 => Self::calculate_ripemd_320(input),
            Self::Blake3 => Self::calculate_blake3(input),
        }
    }
}
