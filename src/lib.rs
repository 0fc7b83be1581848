//! Signed-nonce proof of work.
//!
//! An issuer hands out a random nonce, optionally signed as
//! `hash(nonce || secret)`. The requester searches for data whose digest
//! `hash(data || nonce)` has enough leading zeros, and the issuer checks the
//! difficulty, the signature and the digest.
//!
//! ```
//! use sigpow::{Pow, SolverBuilder};
//!
//! let pow = Pow::builder()
//!     .secret("secret")
//!     .check(true)
//!     .difficulty(4)
//!     .build()?;
//! let challenge = pow.issue()?;
//!
//! let solver = SolverBuilder::default().threads(1).build_validated()?;
//! let solution = solver.solve(&pow, &challenge.nonce, b"hello")?;
//!
//! pow.verify_hash_at_difficulty(
//!     &challenge.nonce,
//!     &solution.data,
//!     &solution.digest,
//!     challenge.signature_bytes(),
//! )?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod config;
pub mod difficulty;
pub mod error;
pub mod hash;
pub mod nonce;
pub mod pow;
pub mod solver;
pub mod stream;

pub use config::PowConfig;
pub use difficulty::{
    leading_zero_bits, meets_leading_zero_bits, meets_leading_zero_chars, DigestEncoding,
};
pub use error::{Error, GenerationError, VerifyError};
pub use hash::{HashAlgorithm, HashFunction};
pub use nonce::{NanoidGenerator, NonceGenerator, DEFAULT_NONCE_LENGTH};
pub use pow::{Challenge, Pow, PowOptions, PowOptionsBuilder};
pub use solver::{candidate_data, Solution, Solver, SolverBuilder};
