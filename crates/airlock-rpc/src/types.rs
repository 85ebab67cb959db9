use serde::{Deserialize, Serialize};

use airlock_core::config::{RevealWindow, VestingParams, WithdrawalRestrictions};
use airlock_core::events::EventRecord;
use airlock_core::schedule::{Commitment, VestingSchedule};
use airlock_vesting::VestingInfo;

/// Distribution status returned by `airlock_getInfo`. Balances and amounts
/// are u128 and travel as decimal strings throughout the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcDistributionInfo {
    pub configured: bool,
    pub paused: bool,
    /// Eligibility digest hex, empty string while unconfigured.
    pub digest: String,
    pub params: Option<RpcVestingParams>,
    pub min_withdrawal_interval_secs: i64,
    pub min_withdrawal_amount: String,
    pub reveal_min_delay: u64,
    pub reveal_max_delay: u64,
    pub vault_balance: String,
    pub schedule_count: u64,
    pub height: u64,
}

/// The six write-once vesting parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcVestingParams {
    pub start_time: i64,
    pub vesting_duration_secs: i64,
    pub cliff_duration_secs: i64,
    pub immediate_release_bps: u32,
    pub cliff_release_bps: u32,
    /// "per_second", "per_day" or "per_month".
    pub frequency: String,
}

impl From<&VestingParams> for RpcVestingParams {
    fn from(p: &VestingParams) -> Self {
        use airlock_core::config::ReleaseFrequency::*;
        Self {
            start_time: p.start_time,
            vesting_duration_secs: p.vesting_duration_secs,
            cliff_duration_secs: p.cliff_duration_secs,
            immediate_release_bps: p.immediate_release_bps,
            cliff_release_bps: p.cliff_release_bps,
            frequency: match p.frequency {
                PerSecond => "per_second".into(),
                PerDay => "per_day".into(),
                PerMonth => "per_month".into(),
            },
        }
    }
}

/// JSON summary of a vesting schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcSchedule {
    pub account: String,
    pub start_time: i64,
    pub duration_secs: i64,
    pub total_amount: String,
    pub immediate_amount: String,
    pub released_amount: String,
    pub last_withdraw_time: i64,
}

impl From<&VestingSchedule> for RpcSchedule {
    fn from(s: &VestingSchedule) -> Self {
        Self {
            account: s.account.to_b58(),
            start_time: s.start_time,
            duration_secs: s.duration_secs,
            total_amount: s.total_amount.to_string(),
            immediate_amount: s.immediate_amount.to_string(),
            released_amount: s.released_amount.to_string(),
            last_withdraw_time: s.last_withdraw_time,
        }
    }
}

/// Tranche breakdown at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcVestingInfo {
    pub total: String,
    pub immediate: String,
    pub cliff: String,
    pub vesting_base: String,
    pub released: String,
    pub releasable: String,
}

impl From<&VestingInfo> for RpcVestingInfo {
    fn from(i: &VestingInfo) -> Self {
        Self {
            total: i.total.to_string(),
            immediate: i.immediate.to_string(),
            cliff: i.cliff.to_string(),
            vesting_base: i.vesting_base.to_string(),
            released: i.released.to_string(),
            releasable: i.releasable.to_string(),
        }
    }
}

/// Stored claim commitment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcCommitment {
    pub committer: String,
    pub created_at_height: u64,
    pub revealed: bool,
}

impl From<&Commitment> for RpcCommitment {
    fn from(c: &Commitment) -> Self {
        Self {
            committer: c.committer.to_b58(),
            created_at_height: c.created_at_height,
            revealed: c.revealed,
        }
    }
}

/// Journal entry; the event payload travels as tagged JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcEvent {
    pub seq: u64,
    pub at: i64,
    pub event: serde_json::Value,
}

impl RpcEvent {
    pub fn from_record(r: &EventRecord) -> Self {
        Self {
            seq: r.seq,
            at: r.at,
            event: serde_json::to_value(&r.event).unwrap_or(serde_json::Value::Null),
        }
    }
}

/// Receipt for a submitted commitment: the height it was recorded at and
/// the earliest/latest heights at which the reveal will be accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcCommitReceipt {
    pub height: u64,
    pub reveal_earliest: u64,
    pub reveal_latest: u64,
}

/// Outcome of a successful reveal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRevealOutcome {
    pub voucher_id: u64,
    pub total_amount: String,
    /// Amount paid out at reveal time (immediate tranche plus any vesting
    /// already elapsed); "0" when the vault was short.
    pub paid: String,
}

/// Mutable restriction parameters, used for both reads and admin updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRestrictions {
    pub min_interval_secs: i64,
    pub min_amount: String,
}

impl From<&WithdrawalRestrictions> for RpcRestrictions {
    fn from(r: &WithdrawalRestrictions) -> Self {
        Self {
            min_interval_secs: r.min_interval_secs,
            min_amount: r.min_amount.to_string(),
        }
    }
}

/// Reveal delay window, in heights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRevealWindow {
    pub min_delay: u64,
    pub max_delay: u64,
}

impl From<&RevealWindow> for RpcRevealWindow {
    fn from(w: &RevealWindow) -> Self {
        Self {
            min_delay: w.min_delay,
            max_delay: w.max_delay,
        }
    }
}
