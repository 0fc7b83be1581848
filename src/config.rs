use crate::difficulty::DigestEncoding;
use crate::error::Error;
use crate::hash::HashAlgorithm;
use crate::pow::{Pow, PowOptions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Serializable verifier settings.
///
/// Covers everything except custom nonce generators and hash functions,
/// which can only be supplied through [`PowOptionsBuilder`](crate::PowOptionsBuilder).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PowConfig {
    pub secret: String,
    pub nonce_length: usize,
    pub check: bool,
    pub difficulty: u32,
    pub encoding: DigestEncoding,
    pub hash: HashAlgorithm,
}

impl PowConfig {
    pub fn from_json(s: &str) -> Result<Self, Error> {
        serde_json::from_str(s).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    pub fn into_options(self) -> PowOptions {
        PowOptions {
            secret: self.secret.into_bytes(),
            nonce_length: self.nonce_length,
            check: self.check,
            difficulty: self.difficulty,
            encoding: self.encoding,
            nonce_generator: None,
            hasher: Some(Arc::new(self.hash)),
        }
    }

    pub fn build(self) -> Pow {
        Pow::new(self.into_options())
    }
}
