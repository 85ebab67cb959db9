//! airlock-vesting
//!
//! The deterministic vesting-accounting engine: given a schedule, the
//! write-once distribution parameters, and a timestamp, compute exactly how
//! much is releasable. Pure functions only — persistence and payouts live in
//! airlock-state.

pub mod engine;
pub mod gate;

pub use engine::{releasable_amount, tranche_split, vesting_info, TrancheSplit, VestingInfo};
pub use gate::check_withdrawal;
