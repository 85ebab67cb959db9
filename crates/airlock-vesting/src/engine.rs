//! Releasable-amount computation.
//!
//! Three-stage model: an immediate tranche paid at claim, a cliff tranche
//! paid as a lump once the cliff elapses, and a linear tail released at the
//! configured frequency. All division truncates — rounding never favors the
//! recipient — and because configured durations are exact multiples of the
//! release unit, the final vesting instant releases the remaining balance
//! exactly, with no residual dust.

use serde::{Deserialize, Serialize};

use airlock_core::config::{ReleaseFrequency, VestingParams};
use airlock_core::constants::BPS_DENOMINATOR;
use airlock_core::schedule::VestingSchedule;
use airlock_core::types::{Balance, Timestamp};

// ── Tranche split ────────────────────────────────────────────────────────────

/// The three-way split of an allocation. `immediate + cliff + linear_base`
/// equals the total exactly: both bps shares floor, and the linear base
/// absorbs the remainder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrancheSplit {
    pub immediate: Balance,
    pub cliff: Balance,
    pub linear_base: Balance,
}

/// Split `total` by the configured basis-point ratios.
pub fn tranche_split(total: Balance, params: &VestingParams) -> TrancheSplit {
    let immediate = total * params.immediate_release_bps as Balance / BPS_DENOMINATOR as Balance;
    let cliff = total * params.cliff_release_bps as Balance / BPS_DENOMINATOR as Balance;
    // Never underflows: bps sum <= 10000 is enforced at configuration time,
    // and each floored share is <= its exact share.
    let linear_base = total - immediate - cliff;
    TrancheSplit {
        immediate,
        cliff,
        linear_base,
    }
}

// ── Linear tail ──────────────────────────────────────────────────────────────

/// Amount of the linear base released after `vesting_elapsed` seconds of a
/// `duration`-second tail, quantized to the frequency unit.
fn linear_released(
    base: Balance,
    vesting_elapsed: i64,
    duration: i64,
    frequency: ReleaseFrequency,
) -> Balance {
    if vesting_elapsed >= duration {
        return base;
    }
    let unit = frequency.unit_seconds();
    let elapsed_units = (vesting_elapsed / unit) as Balance;
    let duration_units = (duration / unit) as Balance;
    if duration_units == 0 {
        return base;
    }
    base * elapsed_units / duration_units
}

/// Vested amount beyond the immediate tranche at `now`: zero before the
/// cliff elapses, then the cliff lump plus the linear tail.
fn vested_beyond_immediate(
    split: &TrancheSplit,
    schedule: &VestingSchedule,
    params: &VestingParams,
    now: Timestamp,
) -> Balance {
    if now < schedule.start_time {
        return 0;
    }
    let elapsed = now - schedule.start_time;
    if elapsed < params.cliff_duration_secs {
        return 0;
    }
    let vesting_elapsed = elapsed - params.cliff_duration_secs;
    split.cliff
        + linear_released(
            split.linear_base,
            vesting_elapsed,
            schedule.duration_secs,
            params.frequency,
        )
}

// ── Releasable ───────────────────────────────────────────────────────────────

/// How much the schedule's account may withdraw at `now`. Pure function of
/// its inputs; never exceeds `total_amount - released_amount`.
pub fn releasable_amount(
    schedule: &VestingSchedule,
    params: &VestingParams,
    now: Timestamp,
) -> Balance {
    let split = tranche_split(schedule.total_amount, params);
    let entitled = split.immediate + vested_beyond_immediate(&split, schedule, params, now);
    entitled.saturating_sub(schedule.released_amount)
}

// ── Info view ────────────────────────────────────────────────────────────────

/// Snapshot of an account's vesting position at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingInfo {
    pub total: Balance,
    pub immediate: Balance,
    pub cliff: Balance,
    pub vesting_base: Balance,
    pub released: Balance,
    pub releasable: Balance,
}

pub fn vesting_info(schedule: &VestingSchedule, params: &VestingParams, now: Timestamp) -> VestingInfo {
    let split = tranche_split(schedule.total_amount, params);
    VestingInfo {
        total: schedule.total_amount,
        immediate: split.immediate,
        cliff: split.cliff,
        vesting_base: split.linear_base,
        released: schedule.released_amount,
        releasable: releasable_amount(schedule, params, now),
    }
}
