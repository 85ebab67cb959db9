/// ─── Airlock Protocol Constants ─────────────────────────────────────────────
///
/// Merkle-gated token distribution with three-stage vesting:
/// an immediate tranche at claim, a cliff tranche, and a linear tail.

// ── Ratios ───────────────────────────────────────────────────────────────────

/// Basis-point denominator: 10_000 == 100%.
pub const BPS_DENOMINATOR: u32 = 10_000;

// ── Release-frequency units (seconds) ────────────────────────────────────────

/// One whole day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// One vesting "month" — fixed 30-day unit, not calendar months.
pub const SECONDS_PER_MONTH: i64 = 30 * SECONDS_PER_DAY;

// ── Commit/reveal window (heights, not seconds) ──────────────────────────────

/// Default minimum heights between commit and reveal. Counting discrete
/// state-transition opportunities is what blunts front-running; wall-clock
/// time is irrelevant here.
pub const DEFAULT_MIN_REVEAL_DELAY: u64 = 3;

/// Default maximum heights between commit and reveal. A commitment revealed
/// later than this is dead forever.
pub const DEFAULT_MAX_REVEAL_DELAY: u64 = 255;

// ── Merkle proofs ────────────────────────────────────────────────────────────

/// Proofs longer than this are rejected outright (2^64 leaves is already
/// beyond any allocation table).
pub const MAX_PROOF_DEPTH: usize = 64;

// ── Events ───────────────────────────────────────────────────────────────────

/// Hard cap on events returned by a single journal query.
pub const MAX_EVENT_PAGE: usize = 200;
