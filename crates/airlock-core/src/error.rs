use thiserror::Error;

use crate::types::{Balance, Height, Timestamp};

#[derive(Debug, Error)]
pub enum AirlockError {
    // ── Configuration validation ─────────────────────────────────────────────
    #[error("release ratios exceed 100%: immediate + cliff = {got} bps (max 10000)")]
    RatioSumExceeds { got: u64 },

    #[error("vesting duration must be greater than zero")]
    ZeroVestingDuration,

    #[error("vesting duration {duration}s is not a whole multiple of the {unit}s release unit")]
    DurationNotUnitAligned { duration: i64, unit: i64 },

    #[error("eligibility digest must be non-zero")]
    ZeroDigest,

    #[error("reveal window invalid: min {min} must be positive and <= max {max}")]
    InvalidRevealWindow { min: u64, max: u64 },

    #[error("amount must be greater than zero")]
    ZeroAmount,

    // ── Protocol sequence ────────────────────────────────────────────────────
    #[error("a commitment already exists for this hash")]
    AlreadyCommitted,

    #[error("no commitment found for the reconstructed hash")]
    NoCommitmentFound,

    #[error("commitment already revealed")]
    AlreadyRevealed,

    #[error("reveal too early: permitted from height {earliest}")]
    RevealTooEarly { earliest: Height },

    #[error("reveal window expired: last permitted height was {latest}")]
    RevealWindowExpired { latest: Height },

    // ── Eligibility ──────────────────────────────────────────────────────────
    #[error("Merkle proof does not verify against the eligibility digest")]
    InvalidProof,

    #[error("proof depth {got} exceeds maximum {max}")]
    ProofTooDeep { got: usize, max: usize },

    #[error("voucher {0} already claimed")]
    VoucherAlreadyClaimed(u64),

    #[error("eligibility leaf already claimed")]
    LeafAlreadyClaimed,

    // ── State conflicts ──────────────────────────────────────────────────────
    #[error("account already holds a vesting schedule")]
    ScheduleAlreadyExists,

    #[error("no vesting schedule for account {0}")]
    ScheduleNotFound(String),

    #[error("distribution already configured")]
    AlreadyConfigured,

    #[error("distribution not configured")]
    NotConfigured,

    // ── Funds ────────────────────────────────────────────────────────────────
    #[error("no tokens currently releasable")]
    NoTokensAvailable,

    #[error("withdrawal restricted: {releasable} releasable is below the {min_amount} minimum and {interval_secs}s interval has not elapsed")]
    WithdrawalRestricted {
        releasable: Balance,
        min_amount: Balance,
        interval_secs: i64,
    },

    #[error("vault transfer of {amount} failed — administrator must replenish the vault")]
    TransferFailed { amount: Balance },

    // ── Authorization / circuit breaker ──────────────────────────────────────
    #[error("caller is not an administrator")]
    NotAdmin,

    #[error("distribution is paused")]
    Paused,

    // ── Serialization / storage ──────────────────────────────────────────────
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),

    // ── General ──────────────────────────────────────────────────────────────
    #[error("timestamp {0} is invalid for this operation")]
    InvalidTimestamp(Timestamp),

    #[error("{0}")]
    Other(String),
}
