//! airlock-state
//!
//! Persistent distribution state and the engine that mutates it. Every
//! mutating operation validates against current state, then stages its
//! writes and commits them, serialized by a single engine-level lock — the
//! whole distribution is one serialization domain because the claim-set
//! invariants (voucher/leaf uniqueness, single digest) span accounts.

pub mod db;
pub mod engine;
pub mod ledger;
pub mod query;

pub use db::StateDb;
pub use engine::StateEngine;
pub use ledger::{AdminPolicy, Ledger, SingleAdmin, VaultLedger};
pub use query::DistributionQuery;
