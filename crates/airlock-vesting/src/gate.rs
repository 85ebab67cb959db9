//! Withdrawal gating policy.
//!
//! A payout is permitted when ANY of the following holds:
//!   (a) the configured interval has elapsed since the last withdrawal,
//!   (b) the releasable amount meets the configured minimum,
//!   (c) the schedule is fully matured — once everything has vested, the
//!       throttles lift unconditionally so that tightening restrictions can
//!       never permanently strand a balance.
//!
//! Thresholds are always the *current* configuration, not the values in
//! force when the schedule was created.

use airlock_core::config::{VestingParams, WithdrawalRestrictions};
use airlock_core::error::AirlockError;
use airlock_core::schedule::VestingSchedule;
use airlock_core::types::{Balance, Timestamp};

/// Decide whether a withdrawal of `releasable` may proceed at `now`.
pub fn check_withdrawal(
    schedule: &VestingSchedule,
    params: &VestingParams,
    restrictions: &WithdrawalRestrictions,
    releasable: Balance,
    now: Timestamp,
) -> Result<(), AirlockError> {
    if releasable == 0 {
        return Err(AirlockError::NoTokensAvailable);
    }
    if now >= params.full_maturity() {
        return Ok(());
    }
    if now - schedule.last_withdraw_time >= restrictions.min_interval_secs {
        return Ok(());
    }
    if releasable >= restrictions.min_amount {
        return Ok(());
    }
    Err(AirlockError::WithdrawalRestricted {
        releasable,
        min_amount: restrictions.min_amount,
        interval_secs: restrictions.min_interval_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use airlock_core::config::ReleaseFrequency;
    use airlock_core::types::AccountId;

    const START: Timestamp = 1_700_000_000;

    fn params() -> VestingParams {
        VestingParams {
            start_time: START,
            vesting_duration_secs: 30,
            cliff_duration_secs: 6,
            immediate_release_bps: 1_000,
            cliff_release_bps: 2_000,
            frequency: ReleaseFrequency::PerSecond,
        }
    }

    fn schedule(last_withdraw: Timestamp) -> VestingSchedule {
        let mut s = VestingSchedule::new(
            AccountId::from_bytes([1u8; 32]),
            START,
            30,
            1_000,
            100,
            START,
        );
        s.last_withdraw_time = last_withdraw;
        s
    }

    fn restrictions(interval: i64, min_amount: Balance) -> WithdrawalRestrictions {
        WithdrawalRestrictions {
            min_interval_secs: interval,
            min_amount,
        }
    }

    #[test]
    fn zero_releasable_always_fails() {
        let r = restrictions(0, 0);
        assert!(matches!(
            check_withdrawal(&schedule(START), &params(), &r, 0, START + 100),
            Err(AirlockError::NoTokensAvailable)
        ));
    }

    #[test]
    fn interval_elapsed_permits() {
        let r = restrictions(10, 1_000_000);
        check_withdrawal(&schedule(START), &params(), &r, 1, START + 10).unwrap();
    }

    #[test]
    fn amount_threshold_permits_inside_interval() {
        let r = restrictions(1_000, 200);
        check_withdrawal(&schedule(START), &params(), &r, 200, START + 1).unwrap();
    }

    #[test]
    fn neither_condition_blocks() {
        let r = restrictions(1_000, 500);
        assert!(matches!(
            check_withdrawal(&schedule(START), &params(), &r, 200, START + 1),
            Err(AirlockError::WithdrawalRestricted { .. })
        ));
    }

    #[test]
    fn full_maturity_overrides_everything() {
        // Even absurd restrictions cannot block a matured schedule.
        let r = restrictions(i64::MAX / 2, Balance::MAX);
        let end = params().full_maturity();
        check_withdrawal(&schedule(end - 1), &params(), &r, 1, end).unwrap();
        assert!(check_withdrawal(&schedule(end - 1), &params(), &r, 1, end - 1).is_err());
    }

    #[test]
    fn default_restrictions_never_block() {
        let r = WithdrawalRestrictions::default();
        check_withdrawal(&schedule(START), &params(), &r, 1, START).unwrap();
    }
}
