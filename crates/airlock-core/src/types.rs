use serde::{Deserialize, Serialize};
use std::fmt;

/// Token balance in base units. u128 leaves ample headroom above any
/// realistic allocation table.
pub type Balance = u128;

/// Unix timestamp (seconds, UTC).
pub type Timestamp = i64;

/// Discrete operation/block counter. Strictly increasing; supplied by the
/// substrate, never read from a clock.
pub type Height = u64;

/// Opaque per-allocation voucher identifier assigned off-chain.
pub type VoucherId = u64;

/// 32-byte secret salt bound into a claim commitment.
pub type Salt = [u8; 32];

// ── AccountId ────────────────────────────────────────────────────────────────

/// 32-byte account identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    pub fn from_bytes(b: [u8; 32]) -> Self {
        Self(b)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Base-58 encoded string representation.
    pub fn to_b58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }

    pub fn from_b58(s: &str) -> Result<Self, bs58::decode::Error> {
        let bytes = bs58::decode(s).into_vec()?;
        if bytes.len() != 32 {
            return Err(bs58::decode::Error::BufferTooSmall);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_b58())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", &self.to_b58()[..8])
    }
}

// ── Hash32 ───────────────────────────────────────────────────────────────────

/// 32-byte BLAKE3 digest. Used for claim commitments, eligibility leaves,
/// and the Merkle root of the eligibility set.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hash32(pub [u8; 32]);

impl Hash32 {
    pub const ZERO: Hash32 = Hash32([0u8; 32]);

    pub fn from_bytes(b: [u8; 32]) -> Self {
        Self(b)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({}…)", &self.to_hex()[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_b58_round_trip() {
        let id = AccountId::from_bytes([7u8; 32]);
        let s = id.to_b58();
        assert_eq!(AccountId::from_b58(&s).unwrap(), id);
    }

    #[test]
    fn account_id_b58_wrong_length_rejected() {
        let s = bs58::encode(&[1u8; 16]).into_string();
        assert!(AccountId::from_b58(&s).is_err());
    }

    #[test]
    fn hash32_hex_round_trip() {
        let h = Hash32::from_bytes([0xab; 32]);
        assert_eq!(Hash32::from_hex(&h.to_hex()).unwrap(), h);
    }

    #[test]
    fn zero_digest_detected() {
        assert!(Hash32::ZERO.is_zero());
        assert!(!Hash32::from_bytes([1u8; 32]).is_zero());
    }
}
