//! Distribution configuration.
//!
//! Two groups with different mutability:
//! - `VestingParams` + the eligibility digest are write-once. The digest may
//!   later be *replaced* (rotated to a superset tree), never cleared.
//! - `WithdrawalRestrictions` and `RevealWindow` are operational knobs the
//!   administrator can tighten or loosen at any time; they are always
//!   evaluated against their current values.
//!
//! `DistributionConfig` is a tagged state rather than a bag of nullable
//! fields, so reconfiguring an already-configured distribution is
//! unrepresentable instead of merely checked.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BPS_DENOMINATOR, DEFAULT_MAX_REVEAL_DELAY, DEFAULT_MIN_REVEAL_DELAY, SECONDS_PER_DAY,
    SECONDS_PER_MONTH,
};
use crate::error::AirlockError;
use crate::types::{Balance, Hash32, Timestamp};

// ── Release frequency ────────────────────────────────────────────────────────

/// Granularity at which the linear tail releases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseFrequency {
    /// Maximum precision; releasable grows every second.
    PerSecond,
    /// Whole 86400-second days; partial days never count.
    PerDay,
    /// Whole 30-day units; partial units never count.
    PerMonth,
}

impl ReleaseFrequency {
    /// Quantization unit in seconds. PerSecond is the identity unit.
    pub fn unit_seconds(&self) -> i64 {
        match self {
            ReleaseFrequency::PerSecond => 1,
            ReleaseFrequency::PerDay => SECONDS_PER_DAY,
            ReleaseFrequency::PerMonth => SECONDS_PER_MONTH,
        }
    }
}

// ── Vesting parameters (write-once group) ────────────────────────────────────

/// The six write-once vesting parameters. Frozen the moment the eligibility
/// digest becomes non-zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingParams {
    /// When vesting time starts counting (may be in the past at configure
    /// time, in which case claims immediately see elapsed vesting).
    pub start_time: Timestamp,
    /// Length of the linear vesting tail, in seconds.
    pub vesting_duration_secs: i64,
    /// Cliff length in seconds, counted from `start_time`. Zero means no cliff.
    pub cliff_duration_secs: i64,
    /// Share released the moment a claim succeeds, in basis points.
    pub immediate_release_bps: u32,
    /// Share released when the cliff elapses, in basis points.
    pub cliff_release_bps: u32,
    /// Granularity of the linear tail.
    pub frequency: ReleaseFrequency,
}

impl VestingParams {
    /// Validate the parameter group. Called before any state is written.
    ///
    /// For PerDay/PerMonth the vesting duration must be an exact multiple of
    /// the unit — that is what guarantees the final vesting instant releases
    /// the remaining balance exactly, with no fractional-unit dust.
    pub fn validate(&self) -> Result<(), AirlockError> {
        // Sum in u64: the bps fields arrive unchecked from the outside, and
        // an out-of-range pair must report its real sum, not wrap.
        let sum = self.immediate_release_bps as u64 + self.cliff_release_bps as u64;
        if sum > BPS_DENOMINATOR as u64 {
            return Err(AirlockError::RatioSumExceeds { got: sum });
        }
        if self.vesting_duration_secs <= 0 {
            return Err(AirlockError::ZeroVestingDuration);
        }
        if self.cliff_duration_secs < 0 {
            return Err(AirlockError::InvalidTimestamp(self.cliff_duration_secs));
        }
        let unit = self.frequency.unit_seconds();
        if unit > 1 && self.vesting_duration_secs % unit != 0 {
            return Err(AirlockError::DurationNotUnitAligned {
                duration: self.vesting_duration_secs,
                unit,
            });
        }
        Ok(())
    }

    /// Timestamp after which every schedule is fully matured and withdrawal
    /// restrictions no longer apply.
    pub fn full_maturity(&self) -> Timestamp {
        self.start_time + self.cliff_duration_secs + self.vesting_duration_secs
    }
}

// ── Operational parameters (mutable group) ───────────────────────────────────

/// Withdrawal throttling thresholds. Mutable at will; a pending withdrawal
/// is always judged against the values in force when it executes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRestrictions {
    /// Minimum seconds between withdrawals for one account.
    pub min_interval_secs: i64,
    /// Withdrawals at or above this amount bypass the interval.
    pub min_amount: Balance,
}

impl Default for WithdrawalRestrictions {
    fn default() -> Self {
        Self {
            min_interval_secs: 0,
            min_amount: 0,
        }
    }
}

/// Commit→reveal delay window, measured in heights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealWindow {
    /// Minimum heights that must pass between commit and reveal.
    pub min_delay: u64,
    /// Maximum heights; beyond this the commitment is permanently dead.
    pub max_delay: u64,
}

impl Default for RevealWindow {
    fn default() -> Self {
        Self {
            min_delay: DEFAULT_MIN_REVEAL_DELAY,
            max_delay: DEFAULT_MAX_REVEAL_DELAY,
        }
    }
}

impl RevealWindow {
    pub fn validate(&self) -> Result<(), AirlockError> {
        if self.min_delay == 0 || self.min_delay > self.max_delay {
            return Err(AirlockError::InvalidRevealWindow {
                min: self.min_delay,
                max: self.max_delay,
            });
        }
        Ok(())
    }
}

// ── Configuration state machine ──────────────────────────────────────────────

/// `Unconfigured → Configured` is the only transition. Once configured, the
/// digest alone may be replaced (rotation to a superset eligibility tree).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionConfig {
    Unconfigured,
    Configured {
        /// Merkle root of the eligibility set. Non-zero by construction.
        digest: Hash32,
        params: VestingParams,
    },
}

impl DistributionConfig {
    /// Transition `Unconfigured → Configured`, validating everything first.
    pub fn configure(
        &self,
        digest: Hash32,
        params: VestingParams,
    ) -> Result<DistributionConfig, AirlockError> {
        if let DistributionConfig::Configured { .. } = self {
            return Err(AirlockError::AlreadyConfigured);
        }
        if digest.is_zero() {
            return Err(AirlockError::ZeroDigest);
        }
        params.validate()?;
        Ok(DistributionConfig::Configured { digest, params })
    }

    /// Replace the digest within the `Configured` state.
    pub fn rotate_digest(&self, new_digest: Hash32) -> Result<DistributionConfig, AirlockError> {
        if new_digest.is_zero() {
            return Err(AirlockError::ZeroDigest);
        }
        match self {
            DistributionConfig::Unconfigured => Err(AirlockError::NotConfigured),
            DistributionConfig::Configured { params, .. } => Ok(DistributionConfig::Configured {
                digest: new_digest,
                params: params.clone(),
            }),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, DistributionConfig::Configured { .. })
    }

    pub fn digest(&self) -> Option<Hash32> {
        match self {
            DistributionConfig::Unconfigured => None,
            DistributionConfig::Configured { digest, .. } => Some(*digest),
        }
    }

    pub fn params(&self) -> Option<&VestingParams> {
        match self {
            DistributionConfig::Unconfigured => None,
            DistributionConfig::Configured { params, .. } => Some(params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> VestingParams {
        VestingParams {
            start_time: 1_000,
            vesting_duration_secs: 30,
            cliff_duration_secs: 6,
            immediate_release_bps: 1_000,
            cliff_release_bps: 2_000,
            frequency: ReleaseFrequency::PerSecond,
        }
    }

    #[test]
    fn ratio_sum_over_100_percent_rejected() {
        let mut p = params();
        p.immediate_release_bps = 6_000;
        p.cliff_release_bps = 5_000;
        assert!(matches!(
            p.validate().unwrap_err(),
            AirlockError::RatioSumExceeds { got: 11_000 }
        ));
    }

    #[test]
    fn huge_bps_values_rejected_not_wrapped() {
        // A pair whose u32 sum would overflow must still come back as a
        // validation error with the true sum.
        let mut p = params();
        p.immediate_release_bps = 4_000_000_000;
        p.cliff_release_bps = 300_000_000;
        assert!(matches!(
            p.validate().unwrap_err(),
            AirlockError::RatioSumExceeds { got: 4_300_000_000 }
        ));
        // A single out-of-range field is enough.
        let mut p = params();
        p.immediate_release_bps = 20_000;
        p.cliff_release_bps = 0;
        assert!(matches!(
            p.validate().unwrap_err(),
            AirlockError::RatioSumExceeds { got: 20_000 }
        ));
    }

    #[test]
    fn ratio_sum_exactly_100_percent_allowed() {
        let mut p = params();
        p.immediate_release_bps = 4_000;
        p.cliff_release_bps = 6_000;
        p.validate().unwrap();
    }

    #[test]
    fn per_day_duration_must_be_whole_days() {
        let mut p = params();
        p.frequency = ReleaseFrequency::PerDay;
        p.vesting_duration_secs = 100 * SECONDS_PER_DAY + 1;
        assert!(matches!(
            p.validate().unwrap_err(),
            AirlockError::DurationNotUnitAligned { .. }
        ));
        p.vesting_duration_secs = 100 * SECONDS_PER_DAY;
        p.validate().unwrap();
    }

    #[test]
    fn per_month_duration_must_be_whole_units() {
        let mut p = params();
        p.frequency = ReleaseFrequency::PerMonth;
        p.vesting_duration_secs = SECONDS_PER_MONTH + SECONDS_PER_DAY;
        assert!(p.validate().is_err());
        p.vesting_duration_secs = 12 * SECONDS_PER_MONTH;
        p.validate().unwrap();
    }

    #[test]
    fn configure_then_reconfigure_rejected() {
        let digest = Hash32::from_bytes([9u8; 32]);
        let cfg = DistributionConfig::Unconfigured
            .configure(digest, params())
            .unwrap();
        assert!(cfg.is_configured());
        assert!(matches!(
            cfg.configure(digest, params()).unwrap_err(),
            AirlockError::AlreadyConfigured
        ));
    }

    #[test]
    fn zero_digest_rejected_everywhere() {
        assert!(matches!(
            DistributionConfig::Unconfigured
                .configure(Hash32::ZERO, params())
                .unwrap_err(),
            AirlockError::ZeroDigest
        ));
        let cfg = DistributionConfig::Unconfigured
            .configure(Hash32::from_bytes([1u8; 32]), params())
            .unwrap();
        assert!(matches!(
            cfg.rotate_digest(Hash32::ZERO).unwrap_err(),
            AirlockError::ZeroDigest
        ));
    }

    #[test]
    fn rotate_keeps_params() {
        let cfg = DistributionConfig::Unconfigured
            .configure(Hash32::from_bytes([1u8; 32]), params())
            .unwrap();
        let rotated = cfg.rotate_digest(Hash32::from_bytes([2u8; 32])).unwrap();
        assert_eq!(rotated.digest().unwrap(), Hash32::from_bytes([2u8; 32]));
        assert_eq!(rotated.params(), cfg.params());
    }

    #[test]
    fn rotate_before_configure_rejected() {
        assert!(matches!(
            DistributionConfig::Unconfigured
                .rotate_digest(Hash32::from_bytes([1u8; 32]))
                .unwrap_err(),
            AirlockError::NotConfigured
        ));
    }

    #[test]
    fn reveal_window_bounds() {
        RevealWindow::default().validate().unwrap();
        assert!(RevealWindow { min_delay: 0, max_delay: 10 }.validate().is_err());
        assert!(RevealWindow { min_delay: 11, max_delay: 10 }.validate().is_err());
        RevealWindow { min_delay: 1, max_delay: 1 }.validate().unwrap();
    }
}
