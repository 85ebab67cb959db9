//! Sorted-pair Merkle tree.
//!
//! At every level the pair is combined as blake3(min(a,b) ‖ max(a,b)), so a
//! proof is just the sibling path — no left/right position flags. The
//! eligibility digest stored on the distribution is the root; verification
//! is the stateless `verify_proof` function, and `MerkleTree` exists so that
//! operators and tests can build roots and proofs from an allocation list.

use airlock_core::constants::MAX_PROOF_DEPTH;
use airlock_core::error::AirlockError;
use airlock_core::types::{Balance, Hash32, VoucherId};

use crate::hash::claim_leaf;

/// Combine two nodes, byte-lexicographically smaller first.
fn combine(a: &Hash32, b: &Hash32) -> Hash32 {
    let mut h = blake3::Hasher::new();
    if a.as_bytes() <= b.as_bytes() {
        h.update(a.as_bytes());
        h.update(b.as_bytes());
    } else {
        h.update(b.as_bytes());
        h.update(a.as_bytes());
    }
    Hash32::from_bytes(*h.finalize().as_bytes())
}

/// Verify a membership proof: fold the leaf up the sibling path and compare
/// with the root. Stateless; the only inputs are `(leaf, proof, root)`.
pub fn verify_proof(leaf: Hash32, proof: &[Hash32], root: Hash32) -> Result<(), AirlockError> {
    if proof.len() > MAX_PROOF_DEPTH {
        return Err(AirlockError::ProofTooDeep {
            got: proof.len(),
            max: MAX_PROOF_DEPTH,
        });
    }
    let mut node = leaf;
    for sibling in proof {
        node = combine(&node, sibling);
    }
    if node == root {
        Ok(())
    } else {
        Err(AirlockError::InvalidProof)
    }
}

// ── Tree builder ─────────────────────────────────────────────────────────────

/// Dense binary tree over claim leaves. Odd nodes at any level are promoted
/// unpaired (no duplication), matching what `verify_proof` expects.
pub struct MerkleTree {
    /// levels[0] is the leaf layer; the last level holds the single root.
    levels: Vec<Vec<Hash32>>,
}

impl MerkleTree {
    /// Build a tree from `(voucher_id, amount)` allocations. Leaf order is
    /// the input order; callers wanting a canonical tree should sort first.
    pub fn from_allocations(allocations: &[(VoucherId, Balance)]) -> Self {
        let leaves: Vec<Hash32> = allocations
            .iter()
            .map(|(id, amount)| claim_leaf(*id, *amount))
            .collect();
        Self::from_leaves(leaves)
    }

    pub fn from_leaves(leaves: Vec<Hash32>) -> Self {
        let mut levels = vec![leaves];
        loop {
            let prev = match levels.last() {
                Some(l) if l.len() > 1 => l,
                _ => break,
            };
            let mut next = Vec::with_capacity((prev.len() + 1) / 2);
            for pair in prev.chunks(2) {
                match pair {
                    [a, b] => next.push(combine(a, b)),
                    [a] => next.push(*a),
                    _ => unreachable!(),
                }
            }
            levels.push(next);
        }
        Self { levels }
    }

    pub fn len(&self) -> usize {
        self.levels.first().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Root digest, or `None` for an empty tree. An empty allocation list
    /// has no meaningful digest and cannot be used to configure a
    /// distribution (the zero-digest check upstream catches it).
    pub fn root(&self) -> Option<Hash32> {
        let top = self.levels.last()?;
        top.first().copied()
    }

    /// Sibling path for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Option<Vec<Hash32>> {
        if index >= self.len() {
            return None;
        }
        let mut proof = Vec::new();
        let mut idx = index;
        for level in &self.levels[..self.levels.len().saturating_sub(1)] {
            let sibling = if idx % 2 == 0 { idx + 1 } else { idx - 1 };
            if let Some(s) = level.get(sibling) {
                proof.push(*s);
            }
            // Unpaired nodes are promoted as-is; nothing to push.
            idx /= 2;
        }
        Some(proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocations(n: u64) -> Vec<(VoucherId, Balance)> {
        (0..n).map(|i| (i, 100 + i as Balance)).collect()
    }

    #[test]
    fn every_leaf_verifies_for_various_sizes() {
        for n in [1u64, 2, 3, 4, 5, 7, 8, 33] {
            let allocs = allocations(n);
            let tree = MerkleTree::from_allocations(&allocs);
            let root = tree.root().unwrap();
            for (i, (id, amount)) in allocs.iter().enumerate() {
                let proof = tree.proof(i).unwrap();
                verify_proof(claim_leaf(*id, *amount), &proof, root)
                    .unwrap_or_else(|e| panic!("leaf {i} of {n} failed: {e}"));
            }
        }
    }

    #[test]
    fn wrong_amount_fails() {
        let allocs = allocations(8);
        let tree = MerkleTree::from_allocations(&allocs);
        let root = tree.root().unwrap();
        let proof = tree.proof(2).unwrap();
        assert!(matches!(
            verify_proof(claim_leaf(2, 999_999), &proof, root),
            Err(AirlockError::InvalidProof)
        ));
    }

    #[test]
    fn tampered_sibling_fails() {
        let allocs = allocations(8);
        let tree = MerkleTree::from_allocations(&allocs);
        let root = tree.root().unwrap();
        let mut proof = tree.proof(0).unwrap();
        proof[1] = Hash32::from_bytes([0xff; 32]);
        assert!(verify_proof(claim_leaf(0, 100), &proof, root).is_err());
    }

    #[test]
    fn proof_against_wrong_root_fails() {
        let tree_a = MerkleTree::from_allocations(&allocations(8));
        let tree_b = MerkleTree::from_allocations(&allocations(9));
        let proof = tree_a.proof(0).unwrap();
        assert!(verify_proof(claim_leaf(0, 100), &proof, tree_b.root().unwrap()).is_err());
    }

    #[test]
    fn single_leaf_tree_has_empty_proof() {
        let tree = MerkleTree::from_allocations(&allocations(1));
        let proof = tree.proof(0).unwrap();
        assert!(proof.is_empty());
        verify_proof(claim_leaf(0, 100), &proof, tree.root().unwrap()).unwrap();
        assert_eq!(tree.root().unwrap(), claim_leaf(0, 100));
    }

    #[test]
    fn superset_tree_still_proves_old_leaves() {
        // Digest rotation: the rotated tree contains the original
        // allocations plus new ones; old vouchers prove against the new root.
        let old = allocations(4);
        let mut superset = old.clone();
        superset.extend(allocations(8).into_iter().skip(4));
        let tree = MerkleTree::from_allocations(&superset);
        let root = tree.root().unwrap();
        for (i, (id, amount)) in old.iter().enumerate() {
            verify_proof(claim_leaf(*id, *amount), &tree.proof(i).unwrap(), root).unwrap();
        }
    }

    #[test]
    fn oversized_proof_rejected() {
        let proof = vec![Hash32::from_bytes([1u8; 32]); MAX_PROOF_DEPTH + 1];
        assert!(matches!(
            verify_proof(claim_leaf(0, 1), &proof, Hash32::from_bytes([2u8; 32])),
            Err(AirlockError::ProofTooDeep { .. })
        ));
    }

    #[test]
    fn empty_tree_has_no_root() {
        let tree = MerkleTree::from_leaves(vec![]);
        assert!(tree.root().is_none());
        assert!(tree.is_empty());
    }
}
