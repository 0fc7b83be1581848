//! Leading-zero difficulty policies.
//!
//! A raw digest is scored in bits; a hex-rendered digest is scored in
//! characters (4 bits each). The two scales are not interchangeable, so a
//! [`Pow`](crate::Pow) picks exactly one through its [`DigestEncoding`].
use serde::{Deserialize, Serialize};

/// How digests and signatures are represented on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestEncoding {
    /// Raw digest bytes; difficulty counts leading zero bits.
    #[default]
    Raw,
    /// Lowercase hex text; difficulty counts leading `'0'` characters.
    Hex,
}

impl DigestEncoding {
    /// Render a raw hash output in this encoding.
    pub fn render(self, raw: Vec<u8>) -> Vec<u8> {
        match self {
            Self::Raw => raw,
            Self::Hex => hex::encode(raw).into_bytes(),
        }
    }

    /// Check `digest` against `difficulty` using this encoding's policy.
    pub fn meets(self, digest: &[u8], difficulty: u32) -> bool {
        match self {
            Self::Raw => meets_leading_zero_bits(digest, difficulty),
            Self::Hex => meets_leading_zero_chars(digest, difficulty),
        }
    }
}

/// Count the consecutive leading zero bits of `digest`.
pub fn leading_zero_bits(digest: &[u8]) -> u32 {
    let mut count = 0u32;
    for byte in digest {
        if *byte == 0 {
            count += 8;
            continue;
        }
        count += (*byte).leading_zeros();
        break;
    }
    count
}

/// Bit-exact policy for raw digests.
///
/// Stops at the first byte that is not all zeros, or as soon as the running
/// total reaches `bits`. Running out of bytes before that is a failure.
pub fn meets_leading_zero_bits(digest: &[u8], bits: u32) -> bool {
    if bits == 0 {
        return true;
    }
    let mut total = 0u32;
    for byte in digest {
        let lead = byte.leading_zeros();
        total += lead;
        if total >= bits {
            return true;
        }
        if lead < 8 {
            return false;
        }
    }
    false
}

/// Character-prefix policy for hex-rendered digests.
pub fn meets_leading_zero_chars(digest: &[u8], chars: u32) -> bool {
    let Ok(chars) = usize::try_from(chars) else {
        return false;
    };
    digest.len() >= chars && digest[..chars].iter().all(|c| *c == b'0')
}
