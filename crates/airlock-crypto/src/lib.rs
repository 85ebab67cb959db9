//! airlock-crypto
//!
//! BLAKE3 hashing for the claim protocol: commitment hashes, eligibility
//! leaf hashes, and sorted-pair Merkle proof verification against the
//! distribution's root digest. Also a small in-memory tree builder used by
//! operators and tests to produce roots and proofs.

pub mod hash;
pub mod merkle;

pub use hash::{blake3_hash, claim_leaf, commitment_hash};
pub use merkle::{verify_proof, MerkleTree};
