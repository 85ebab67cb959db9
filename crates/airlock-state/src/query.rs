use airlock_core::config::{DistributionConfig, RevealWindow, WithdrawalRestrictions};
use airlock_core::error::AirlockError;
use airlock_core::events::EventRecord;
use airlock_core::schedule::{Commitment, VestingSchedule};
use airlock_core::types::{AccountId, Balance, Hash32, Timestamp, VoucherId};
use airlock_vesting::{releasable_amount, vesting_info, VestingInfo};

use crate::db::StateDb;

/// Read-only query surface over the distribution state. Queries never take
/// the engine lock — each one reads a consistent snapshot of the keys it
/// touches, which is enough for inspection and RPC serving.
pub struct DistributionQuery<'a> {
    db: &'a StateDb,
}

impl<'a> DistributionQuery<'a> {
    pub fn new(db: &'a StateDb) -> Self {
        Self { db }
    }

    pub fn is_configured(&self) -> Result<bool, AirlockError> {
        Ok(self.db.get_config()?.is_configured())
    }

    pub fn configuration(&self) -> Result<DistributionConfig, AirlockError> {
        self.db.get_config()
    }

    pub fn restrictions(&self) -> Result<WithdrawalRestrictions, AirlockError> {
        self.db.get_restrictions()
    }

    pub fn reveal_window(&self) -> Result<RevealWindow, AirlockError> {
        self.db.get_reveal_window()
    }

    pub fn is_paused(&self) -> Result<bool, AirlockError> {
        self.db.is_paused()
    }

    pub fn schedule(&self, account: &AccountId) -> Result<Option<VestingSchedule>, AirlockError> {
        self.db.get_schedule(account)
    }

    pub fn commitment(&self, hash: &Hash32) -> Result<Option<Commitment>, AirlockError> {
        self.db.get_commitment(hash)
    }

    pub fn is_voucher_claimed(&self, id: VoucherId) -> bool {
        self.db.is_voucher_claimed(id)
    }

    pub fn vault_balance(&self) -> Result<Balance, AirlockError> {
        self.db.vault_balance()
    }

    pub fn account_balance(&self, account: &AccountId) -> Result<Balance, AirlockError> {
        self.db.get_balance(account)
    }

    pub fn recent_events(&self, limit: usize) -> Result<Vec<EventRecord>, AirlockError> {
        self.db.recent_events(limit)
    }

    /// Releasable amount for `account` at `now`. Accounts with no schedule
    /// simply have nothing releasable.
    pub fn releasable(&self, account: &AccountId, now: Timestamp) -> Result<Balance, AirlockError> {
        let config = self.db.get_config()?;
        let params = match config.params() {
            Some(p) => p,
            None => return Ok(0),
        };
        match self.db.get_schedule(account)? {
            Some(schedule) => Ok(releasable_amount(&schedule, params, now)),
            None => Ok(0),
        }
    }

    /// Full tranche breakdown for `account` at `now`.
    pub fn vesting_info(
        &self,
        account: &AccountId,
        now: Timestamp,
    ) -> Result<VestingInfo, AirlockError> {
        let config = self.db.get_config()?;
        let params = config.params().ok_or(AirlockError::NotConfigured)?;
        let schedule = self
            .db
            .get_schedule(account)?
            .ok_or_else(|| AirlockError::ScheduleNotFound(account.to_b58()))?;
        Ok(vesting_info(&schedule, params, now))
    }

    /// Human-readable summary of an account's position.
    pub fn describe(&self, account: &AccountId, now: Timestamp) -> Result<String, AirlockError> {
        let config = self.db.get_config()?;
        let params = config.params().ok_or(AirlockError::NotConfigured)?;
        let schedule = self
            .db
            .get_schedule(account)?
            .ok_or_else(|| AirlockError::ScheduleNotFound(account.to_b58()))?;
        let info = vesting_info(&schedule, params, now);

        let status_str = if schedule.released_amount >= schedule.total_amount {
            "fully withdrawn".to_string()
        } else if now >= params.full_maturity() {
            format!("matured — {} withdrawable", info.releasable)
        } else if now < params.start_time + params.cliff_duration_secs {
            let secs_remaining = params.start_time + params.cliff_duration_secs - now;
            format!(
                "in cliff — {} days until cliff release",
                secs_remaining / 86_400
            )
        } else {
            format!("vesting — {} currently withdrawable", info.releasable)
        };

        Ok(format!(
            "Schedule for {} | total {} | released {} | {}",
            account, schedule.total_amount, schedule.released_amount, status_str
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airlock_core::config::{ReleaseFrequency, VestingParams};

    fn temp_db(name: &str) -> StateDb {
        let dir = std::env::temp_dir().join(format!("airlock_query_test_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        StateDb::open(&dir).expect("open temp db")
    }

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
    fn releasable_is_zero_without_schedule_or_config() {
        let db = temp_db("zero");
        let q = DistributionQuery::new(&db);
        let who = AccountId::from_bytes([1u8; 32]);
        assert_eq!(q.releasable(&who, 5_000).unwrap(), 0);

        let cfg = DistributionConfig::Unconfigured
            .configure(Hash32::from_bytes([9u8; 32]), params())
            .unwrap();
        db.put_config(&cfg).unwrap();
        assert_eq!(q.releasable(&who, 5_000).unwrap(), 0);
    }

    #[test]
    fn describe_reports_lifecycle_phases() {
        let db = temp_db("describe");
        let cfg = DistributionConfig::Unconfigured
            .configure(Hash32::from_bytes([9u8; 32]), params())
            .unwrap();
        db.put_config(&cfg).unwrap();

        let who = AccountId::from_bytes([1u8; 32]);
        let schedule = VestingSchedule::new(who.clone(), 1_000, 30, 1_000, 100, 1_000);
        db.put_schedule(&schedule).unwrap();

        let q = DistributionQuery::new(&db);
        assert!(q.describe(&who, 1_002).unwrap().contains("in cliff"));
        assert!(q.describe(&who, 1_020).unwrap().contains("vesting"));
        assert!(q.describe(&who, 2_000).unwrap().contains("matured"));
    }

    #[test]
    fn vesting_info_requires_schedule() {
        let db = temp_db("info_missing");
        let cfg = DistributionConfig::Unconfigured
            .configure(Hash32::from_bytes([9u8; 32]), params())
            .unwrap();
        db.put_config(&cfg).unwrap();
        let q = DistributionQuery::new(&db);
        assert!(matches!(
            q.vesting_info(&AccountId::from_bytes([1u8; 32]), 2_000)
                .unwrap_err(),
            AirlockError::ScheduleNotFound(_)
        ));
    }
}
