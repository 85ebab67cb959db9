//! Persistent records: claim commitments and vesting schedules.

use serde::{Deserialize, Serialize};

use crate::types::{AccountId, Balance, Height, Timestamp};

// ── Commitment ───────────────────────────────────────────────────────────────

/// One claim commitment, keyed in storage by its commitment hash.
///
/// Immutable after creation except for `revealed`, which flips false→true
/// exactly once. Never deleted: the permanent record is what prevents
/// replays. A commitment never revealed inside its window simply stays
/// unrevealed forever — there is no expiry or cancellation transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    /// Account that posted the commitment. Informational: the reveal binds
    /// the caller through the hash preimage, not through this field.
    pub committer: AccountId,
    /// Height at which the commitment was stored.
    pub created_at_height: Height,
    /// Whether a successful reveal has consumed this commitment.
    pub revealed: bool,
}

impl Commitment {
    pub fn new(committer: AccountId, created_at_height: Height) -> Self {
        Self {
            committer,
            created_at_height,
            revealed: false,
        }
    }
}

// ── VestingSchedule ──────────────────────────────────────────────────────────

/// A recipient's vesting position, created once at successful reveal and
/// mutated only by withdrawals. At most one per account, ever — no top-ups
/// and no replacement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSchedule {
    pub account: AccountId,
    /// Copied from the distribution parameters at claim time.
    pub start_time: Timestamp,
    /// Length of the linear vesting tail, copied at claim time.
    pub duration_secs: i64,
    /// Full allocation proven by the claim.
    pub total_amount: Balance,
    /// Immediate tranche computed at claim time (floor of bps share).
    pub immediate_amount: Balance,
    /// Sum of everything paid out so far. Monotonically non-decreasing,
    /// never exceeds `total_amount`.
    pub released_amount: Balance,
    /// Timestamp of the most recent payout (the claim itself counts).
    pub last_withdraw_time: Timestamp,
}

impl VestingSchedule {
    pub fn new(
        account: AccountId,
        start_time: Timestamp,
        duration_secs: i64,
        total_amount: Balance,
        immediate_amount: Balance,
        created_at: Timestamp,
    ) -> Self {
        Self {
            account,
            start_time,
            duration_secs,
            total_amount,
            immediate_amount,
            released_amount: 0,
            last_withdraw_time: created_at,
        }
    }

    /// Remaining unreleased balance.
    pub fn outstanding(&self) -> Balance {
        self.total_amount - self.released_amount
    }
}
