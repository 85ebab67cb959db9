use airlock_core::types::{AccountId, Balance, Hash32, Salt, VoucherId};

/// Domain tag for claim commitments. Keeps commitment preimages disjoint
/// from leaf preimages even for adversarially chosen inputs.
const COMMITMENT_DOMAIN: &[u8] = b"airlock_claim_commit_v1";

/// Compute BLAKE3 hash of arbitrary bytes → 32-byte array.
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// Commitment hash posted in the commit phase:
///
///   blake3(domain ‖ voucher_id_le8 ‖ account_32 ‖ amount_le16 ‖ salt_32)
///
/// The claimant account is bound into the preimage, so revealing from a
/// different account reconstructs a hash with no stored record — observed
/// as `NoCommitmentFound`, never as an authorization failure.
pub fn commitment_hash(
    voucher_id: VoucherId,
    account: &AccountId,
    amount: Balance,
    salt: &Salt,
) -> Hash32 {
    let mut h = blake3::Hasher::new();
    h.update(COMMITMENT_DOMAIN);
    h.update(&voucher_id.to_le_bytes());
    h.update(account.as_bytes());
    h.update(&amount.to_le_bytes());
    h.update(salt);
    Hash32::from_bytes(*h.finalize().as_bytes())
}

/// Eligibility leaf: blake3(blake3(voucher_id_le8 ‖ amount_le16)).
///
/// The double hash keeps single-hash preimages from ever being valid leaves,
/// which closes the classic second-preimage/leaf-forging hole where an
/// interior node is presented as a leaf.
pub fn claim_leaf(voucher_id: VoucherId, amount: Balance) -> Hash32 {
    let mut inner = blake3::Hasher::new();
    inner.update(&voucher_id.to_le_bytes());
    inner.update(&amount.to_le_bytes());
    let inner = inner.finalize();
    Hash32::from_bytes(blake3_hash(inner.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commitment_binds_the_account() {
        let salt = [3u8; 32];
        let a = AccountId::from_bytes([1u8; 32]);
        let b = AccountId::from_bytes([2u8; 32]);
        assert_ne!(
            commitment_hash(7, &a, 1_000, &salt),
            commitment_hash(7, &b, 1_000, &salt)
        );
    }

    #[test]
    fn commitment_binds_every_field() {
        let base = commitment_hash(7, &AccountId::from_bytes([1u8; 32]), 1_000, &[3u8; 32]);
        assert_ne!(
            base,
            commitment_hash(8, &AccountId::from_bytes([1u8; 32]), 1_000, &[3u8; 32])
        );
        assert_ne!(
            base,
            commitment_hash(7, &AccountId::from_bytes([1u8; 32]), 1_001, &[3u8; 32])
        );
        assert_ne!(
            base,
            commitment_hash(7, &AccountId::from_bytes([1u8; 32]), 1_000, &[4u8; 32])
        );
    }

    #[test]
    fn leaf_is_double_hashed() {
        let mut inner = blake3::Hasher::new();
        inner.update(&7u64.to_le_bytes());
        inner.update(&1_000u128.to_le_bytes());
        let single = Hash32::from_bytes(*inner.finalize().as_bytes());
        assert_ne!(claim_leaf(7, 1_000), single);
    }

    #[test]
    fn leaf_is_deterministic() {
        assert_eq!(claim_leaf(42, 5), claim_leaf(42, 5));
        assert_ne!(claim_leaf(42, 5), claim_leaf(42, 6));
    }
}
