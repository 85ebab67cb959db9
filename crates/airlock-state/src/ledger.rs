//! Boundary traits for the external collaborators the engine depends on:
//! the value-transfer service and the administrative capability check. The
//! engine never implements authorization policy or token bookkeeping
//! itself — it only calls these narrow surfaces.

use std::sync::Arc;

use airlock_core::error::AirlockError;
use airlock_core::types::{AccountId, Balance};

use crate::db::StateDb;

/// Value-transfer service. `transfer` returns `Ok(false)` when the
/// distributable pool cannot cover the amount — the caller decides whether
/// that is fatal (withdrawal) or tolerated (reveal payout).
pub trait Ledger {
    fn transfer(&self, to: &AccountId, amount: Balance) -> Result<bool, AirlockError>;

    /// Credit the distributable pool; returns the pool balance afterwards.
    fn deposit(&self, amount: Balance) -> Result<Balance, AirlockError>;
}

/// Administrative capability check gating configuration, pause, deposit,
/// and emergency operations.
pub trait AdminPolicy {
    fn is_admin(&self, caller: &AccountId) -> bool;
}

// ── Implementations ──────────────────────────────────────────────────────────

/// Sled-backed vault: a single distributable pool funded by admin deposits,
/// paying out into per-account balances. Deposits are staged independently
/// of claims — an underfunded vault makes `transfer` report `false`, it
/// never makes it panic or error.
pub struct VaultLedger {
    db: Arc<StateDb>,
}

impl VaultLedger {
    pub fn new(db: Arc<StateDb>) -> Self {
        Self { db }
    }
}

impl Ledger for VaultLedger {
    fn transfer(&self, to: &AccountId, amount: Balance) -> Result<bool, AirlockError> {
        let vault = self.db.vault_balance()?;
        if vault < amount {
            return Ok(false);
        }
        self.db.put_vault_balance(vault - amount)?;
        let credited = self.db.get_balance(to)? + amount;
        self.db.put_balance(to, credited)?;
        Ok(true)
    }

    /// Admin gating happens in the engine; the ledger only does arithmetic.
    fn deposit(&self, amount: Balance) -> Result<Balance, AirlockError> {
        let vault = self.db.vault_balance()? + amount;
        self.db.put_vault_balance(vault)?;
        Ok(vault)
    }
}

/// One fixed administrator account.
pub struct SingleAdmin(pub AccountId);

impl AdminPolicy for SingleAdmin {
    fn is_admin(&self, caller: &AccountId) -> bool {
        caller == &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db(name: &str) -> Arc<StateDb> {
        let dir = std::env::temp_dir().join(format!("airlock_ledger_test_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        Arc::new(StateDb::open(&dir).expect("open temp db"))
    }

    #[test]
    fn transfer_debits_vault_and_credits_account() {
        let db = temp_db("transfer");
        let ledger = VaultLedger::new(Arc::clone(&db));
        ledger.deposit(1_000).unwrap();

        let to = AccountId::from_bytes([5u8; 32]);
        assert!(ledger.transfer(&to, 400).unwrap());
        assert_eq!(db.vault_balance().unwrap(), 600);
        assert_eq!(db.get_balance(&to).unwrap(), 400);
    }

    #[test]
    fn short_vault_reports_false_without_mutation() {
        let db = temp_db("short");
        let ledger = VaultLedger::new(Arc::clone(&db));
        ledger.deposit(100).unwrap();

        let to = AccountId::from_bytes([5u8; 32]);
        assert!(!ledger.transfer(&to, 400).unwrap());
        assert_eq!(db.vault_balance().unwrap(), 100);
        assert_eq!(db.get_balance(&to).unwrap(), 0);
    }

    #[test]
    fn single_admin_matches_only_itself() {
        let admin = SingleAdmin(AccountId::from_bytes([1u8; 32]));
        assert!(admin.is_admin(&AccountId::from_bytes([1u8; 32])));
        assert!(!admin.is_admin(&AccountId::from_bytes([2u8; 32])));
    }
}
