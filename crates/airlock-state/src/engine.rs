use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use airlock_core::config::{RevealWindow, VestingParams, WithdrawalRestrictions};
use airlock_core::error::AirlockError;
use airlock_core::events::{Event, EventRecord};
use airlock_core::schedule::{Commitment, VestingSchedule};
use airlock_core::types::{AccountId, Balance, Hash32, Height, Salt, Timestamp, VoucherId};
use airlock_crypto::{claim_leaf, commitment_hash, verify_proof};
use airlock_vesting::{check_withdrawal, releasable_amount, tranche_split};

use crate::db::StateDb;
use crate::ledger::{AdminPolicy, Ledger};

/// The distribution state engine.
///
/// Validates and applies every mutating operation against the persistent
/// database. Each call is atomic — all checks run before any write — and all
/// mutating calls are serialized by one lock, because the claim-uniqueness
/// invariants span accounts and admit no finer serialization domain.
///
/// `now` and `height` are always explicit parameters: the engine never reads
/// a clock or counter itself.
pub struct StateEngine<L, A> {
    pub db: Arc<StateDb>,
    ledger: L,
    admin: A,
    op_lock: Mutex<()>,
}

impl<L: Ledger, A: AdminPolicy> StateEngine<L, A> {
    pub fn new(db: Arc<StateDb>, ledger: L, admin: A) -> Self {
        Self {
            db,
            ledger,
            admin,
            op_lock: Mutex::new(()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // A poisoned lock means a prior panic mid-operation; continuing is
        // still sound because writes only happen after validation.
        self.op_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn require_admin(&self, caller: &AccountId) -> Result<(), AirlockError> {
        if self.admin.is_admin(caller) {
            Ok(())
        } else {
            Err(AirlockError::NotAdmin)
        }
    }

    fn require_live(&self) -> Result<(), AirlockError> {
        if self.db.is_paused()? {
            Err(AirlockError::Paused)
        } else {
            Ok(())
        }
    }

    fn journal(&self, at: Timestamp, event: Event) -> Result<(), AirlockError> {
        self.db.append_event(EventRecord { seq: 0, at, event })?;
        Ok(())
    }

    // ── Configuration ────────────────────────────────────────────────────────

    /// One-shot configuration: sets the eligibility digest and all six
    /// write-once vesting parameters atomically. Only callable while
    /// unconfigured.
    pub fn configure(
        &self,
        caller: &AccountId,
        digest: Hash32,
        params: VestingParams,
        now: Timestamp,
    ) -> Result<(), AirlockError> {
        let _g = self.lock();
        self.require_admin(caller)?;
        let next = self.db.get_config()?.configure(digest, params)?;
        self.db.put_config(&next)?;
        self.journal(now, Event::Configured { digest })?;
        info!(digest = %digest, "distribution configured");
        Ok(())
    }

    /// Replace the eligibility digest with a superset tree's root. The six
    /// vesting parameters are untouched.
    pub fn rotate_digest(
        &self,
        caller: &AccountId,
        new_digest: Hash32,
        now: Timestamp,
    ) -> Result<(), AirlockError> {
        let _g = self.lock();
        self.require_admin(caller)?;
        let config = self.db.get_config()?;
        let old = config.digest().ok_or(AirlockError::NotConfigured)?;
        let next = config.rotate_digest(new_digest)?;
        self.db.put_config(&next)?;
        self.journal(now, Event::DigestRotated { old, new: new_digest })?;
        info!(old = %old, new = %new_digest, "eligibility digest rotated");
        Ok(())
    }

    /// Update withdrawal throttles. Callable at any time; takes effect for
    /// every subsequent withdrawal, including schedules created earlier.
    pub fn update_restrictions(
        &self,
        caller: &AccountId,
        restrictions: WithdrawalRestrictions,
        now: Timestamp,
    ) -> Result<(), AirlockError> {
        let _g = self.lock();
        self.require_admin(caller)?;
        self.db.put_restrictions(&restrictions)?;
        self.journal(now, Event::RestrictionsUpdated { restrictions })?;
        Ok(())
    }

    /// Update the commit→reveal delay window (heights).
    pub fn update_reveal_window(
        &self,
        caller: &AccountId,
        window: RevealWindow,
        now: Timestamp,
    ) -> Result<(), AirlockError> {
        let _g = self.lock();
        self.require_admin(caller)?;
        window.validate()?;
        self.db.put_reveal_window(&window)?;
        self.journal(now, Event::RevealWindowUpdated { window })?;
        Ok(())
    }

    // ── Circuit breaker ──────────────────────────────────────────────────────

    pub fn pause(&self, caller: &AccountId, now: Timestamp) -> Result<(), AirlockError> {
        let _g = self.lock();
        self.require_admin(caller)?;
        self.db.put_paused(true)?;
        self.journal(now, Event::Paused)?;
        warn!("distribution paused");
        Ok(())
    }

    pub fn unpause(&self, caller: &AccountId, now: Timestamp) -> Result<(), AirlockError> {
        let _g = self.lock();
        self.require_admin(caller)?;
        self.db.put_paused(false)?;
        self.journal(now, Event::Unpaused)?;
        info!("distribution unpaused");
        Ok(())
    }

    // ── Vault funding ────────────────────────────────────────────────────────

    /// Stage tokens into the distributable pool. Deposits are independent of
    /// claims: claims revealed while the vault was short become payable once
    /// funds arrive.
    pub fn deposit(
        &self,
        caller: &AccountId,
        amount: Balance,
        now: Timestamp,
    ) -> Result<(), AirlockError> {
        let _g = self.lock();
        self.require_admin(caller)?;
        if amount == 0 {
            return Err(AirlockError::ZeroAmount);
        }
        let vault_balance = self.ledger.deposit(amount)?;
        self.journal(now, Event::Deposited { amount, vault_balance })?;
        info!(amount, vault_balance, "vault deposit");
        Ok(())
    }

    /// Admin escape hatch: move vault funds out, bypassing all schedules.
    pub fn emergency_withdraw(
        &self,
        caller: &AccountId,
        to: &AccountId,
        amount: Balance,
        now: Timestamp,
    ) -> Result<(), AirlockError> {
        let _g = self.lock();
        self.require_admin(caller)?;
        if amount == 0 {
            return Err(AirlockError::ZeroAmount);
        }
        if !self.ledger.transfer(to, amount)? {
            return Err(AirlockError::TransferFailed { amount });
        }
        self.journal(now, Event::EmergencyWithdrawal { to: to.clone(), amount })?;
        warn!(to = %to, amount, "emergency withdrawal");
        Ok(())
    }

    // ── Claim protocol ───────────────────────────────────────────────────────

    /// Phase one: post an opaque commitment hash. The hash itself is the
    /// scarce resource — a second commit of the same hash fails no matter
    /// who sends it.
    pub fn commit(
        &self,
        caller: &AccountId,
        commit_hash: Hash32,
        height: Height,
        now: Timestamp,
    ) -> Result<(), AirlockError> {
        let _g = self.lock();
        self.require_live()?;
        if !self.db.get_config()?.is_configured() {
            return Err(AirlockError::NotConfigured);
        }
        if self.db.commitment_exists(&commit_hash) {
            return Err(AirlockError::AlreadyCommitted);
        }
        self.db
            .put_commitment(&commit_hash, &Commitment::new(caller.clone(), height))?;
        self.journal(
            now,
            Event::Committed {
                commit_hash,
                committer: caller.clone(),
                height,
            },
        )?;
        info!(hash = %commit_hash, committer = %caller, height, "claim committed");
        Ok(())
    }

    /// Phase two: disclose the committed claim and prove eligibility.
    ///
    /// The commitment is looked up under the *reconstructed* hash, so a
    /// reveal from the wrong account simply finds nothing — the caller is
    /// bound by the preimage, not by an ownership check. On success the
    /// vesting schedule is created and the currently releasable amount
    /// (the immediate tranche, plus any vesting already elapsed when
    /// `start_time` lies in the past) is paid out. A short vault does not
    /// fail the reveal: the schedule still exists and the tranche stays
    /// releasable for a later withdrawal.
    ///
    /// Returns the amount actually paid.
    pub fn reveal(
        &self,
        caller: &AccountId,
        voucher_id: VoucherId,
        amount: Balance,
        salt: &Salt,
        proof: &[Hash32],
        height: Height,
        now: Timestamp,
    ) -> Result<Balance, AirlockError> {
        let _g = self.lock();
        self.require_live()?;

        let config = self.db.get_config()?;
        let digest = config.digest().ok_or(AirlockError::NotConfigured)?;
        let params = config.params().ok_or(AirlockError::NotConfigured)?;
        if amount == 0 {
            return Err(AirlockError::ZeroAmount);
        }

        let hash = commitment_hash(voucher_id, caller, amount, salt);
        let mut record = self
            .db
            .get_commitment(&hash)?
            .ok_or(AirlockError::NoCommitmentFound)?;
        if record.revealed {
            return Err(AirlockError::AlreadyRevealed);
        }

        let window = self.db.get_reveal_window()?;
        let elapsed = height.saturating_sub(record.created_at_height);
        if elapsed < window.min_delay {
            return Err(AirlockError::RevealTooEarly {
                earliest: record.created_at_height + window.min_delay,
            });
        }
        if elapsed > window.max_delay {
            return Err(AirlockError::RevealWindowExpired {
                latest: record.created_at_height + window.max_delay,
            });
        }

        if self.db.is_voucher_claimed(voucher_id) {
            return Err(AirlockError::VoucherAlreadyClaimed(voucher_id));
        }
        let leaf = claim_leaf(voucher_id, amount);
        if self.db.is_leaf_claimed(&leaf) {
            return Err(AirlockError::LeafAlreadyClaimed);
        }
        if self.db.schedule_exists(caller) {
            return Err(AirlockError::ScheduleAlreadyExists);
        }

        verify_proof(leaf, proof, digest)?;

        // All checks passed — build the schedule and attempt the payout.
        let split = tranche_split(amount, params);
        let mut schedule = VestingSchedule::new(
            caller.clone(),
            params.start_time,
            params.vesting_duration_secs,
            amount,
            split.immediate,
            now,
        );
        let payable = releasable_amount(&schedule, params, now);

        let mut paid = 0;
        if payable > 0 {
            if self.ledger.transfer(caller, payable)? {
                schedule.released_amount = payable;
                schedule.last_withdraw_time = now;
                paid = payable;
            } else {
                self.journal(
                    now,
                    Event::VaultShort {
                        account: caller.clone(),
                        needed: payable,
                    },
                )?;
                warn!(account = %caller, needed = payable, "vault short at reveal — tranche stays releasable");
            }
        }

        record.revealed = true;
        self.db.put_commitment(&hash, &record)?;
        self.db.mark_voucher_claimed(voucher_id)?;
        self.db.mark_leaf_claimed(&leaf)?;
        self.db.put_schedule(&schedule)?;
        self.journal(
            now,
            Event::Revealed {
                account: caller.clone(),
                voucher_id,
                total_amount: amount,
                paid,
            },
        )?;
        info!(account = %caller, voucher_id, total = amount, paid, "claim revealed");
        Ok(paid)
    }

    // ── Withdrawal ───────────────────────────────────────────────────────────

    /// Pay out everything currently releasable for `account`, subject to the
    /// gating policy evaluated against *current* restriction values.
    ///
    /// Returns the amount paid.
    pub fn withdraw(&self, account: &AccountId, now: Timestamp) -> Result<Balance, AirlockError> {
        let _g = self.lock();
        self.require_live()?;

        let config = self.db.get_config()?;
        let params = config.params().ok_or(AirlockError::NotConfigured)?;
        let mut schedule = self
            .db
            .get_schedule(account)?
            .ok_or_else(|| AirlockError::ScheduleNotFound(account.to_b58()))?;

        let releasable = releasable_amount(&schedule, params, now);
        let restrictions = self.db.get_restrictions()?;
        check_withdrawal(&schedule, params, &restrictions, releasable, now)?;

        if !self.ledger.transfer(account, releasable)? {
            return Err(AirlockError::TransferFailed { amount: releasable });
        }

        schedule.released_amount += releasable;
        schedule.last_withdraw_time = now;
        self.db.put_schedule(&schedule)?;
        self.journal(
            now,
            Event::Withdrawn {
                account: account.clone(),
                amount: releasable,
                released_total: schedule.released_amount,
            },
        )?;
        info!(account = %account, amount = releasable, released = schedule.released_amount, "withdrawal");
        Ok(releasable)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
