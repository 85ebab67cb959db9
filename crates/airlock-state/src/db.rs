use std::path::Path;

use airlock_core::config::{DistributionConfig, RevealWindow, WithdrawalRestrictions};
use airlock_core::error::AirlockError;
use airlock_core::events::EventRecord;
use airlock_core::schedule::{Commitment, VestingSchedule};
use airlock_core::types::{AccountId, Balance, Hash32, Height, VoucherId};

/// Persistent distribution database backed by sled (pure-Rust, no C deps).
///
/// Named trees (analogous to column families):
///   commitments      — commitment hash bytes → bincode(Commitment)
///   schedules        — AccountId bytes       → bincode(VestingSchedule)
///   claimed_vouchers — voucher id BE bytes   → [] (membership set)
///   claimed_leaves   — leaf hash bytes       → [] (membership set)
///   balances         — AccountId bytes       → bincode(Balance)
///   events           — seq BE bytes          → bincode(EventRecord)
///   meta             — utf8 key bytes        → bincode values
///
/// Commitments and the claimed sets are append-only: records are never
/// deleted, because the permanent record is the anti-replay guarantee. The
/// voucher-id and leaf-hash sets are deliberately both kept — a rotated
/// superset digest may pair an existing voucher with a new amount, and only
/// the voucher-id set enforces one claim per voucher across rotations.
pub struct StateDb {
    _db: sled::Db,
    commitments: sled::Tree,
    schedules: sled::Tree,
    claimed_vouchers: sled::Tree,
    claimed_leaves: sled::Tree,
    balances: sled::Tree,
    events: sled::Tree,
    meta: sled::Tree,
}

fn storage_err(e: sled::Error) -> AirlockError {
    AirlockError::Storage(e.to_string())
}

fn ser_err(e: bincode::Error) -> AirlockError {
    AirlockError::Serialization(e.to_string())
}

impl StateDb {
    /// Open or create the state database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AirlockError> {
        let db = sled::open(path).map_err(storage_err)?;
        let commitments      = db.open_tree("commitments").map_err(storage_err)?;
        let schedules        = db.open_tree("schedules").map_err(storage_err)?;
        let claimed_vouchers = db.open_tree("claimed_vouchers").map_err(storage_err)?;
        let claimed_leaves   = db.open_tree("claimed_leaves").map_err(storage_err)?;
        let balances         = db.open_tree("balances").map_err(storage_err)?;
        let events           = db.open_tree("events").map_err(storage_err)?;
        let meta             = db.open_tree("meta").map_err(storage_err)?;
        Ok(Self {
            _db: db,
            commitments,
            schedules,
            claimed_vouchers,
            claimed_leaves,
            balances,
            events,
            meta,
        })
    }

    // ── Commitments ──────────────────────────────────────────────────────────

    pub fn get_commitment(&self, hash: &Hash32) -> Result<Option<Commitment>, AirlockError> {
        match self.commitments.get(hash.as_bytes()).map_err(storage_err)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes).map_err(ser_err)?)),
            None => Ok(None),
        }
    }

    pub fn put_commitment(&self, hash: &Hash32, c: &Commitment) -> Result<(), AirlockError> {
        let bytes = bincode::serialize(c).map_err(ser_err)?;
        self.commitments
            .insert(hash.as_bytes(), bytes)
            .map_err(storage_err)?;
        Ok(())
    }

    pub fn commitment_exists(&self, hash: &Hash32) -> bool {
        self.commitments
            .contains_key(hash.as_bytes())
            .unwrap_or(false)
    }

    // ── Schedules ────────────────────────────────────────────────────────────

    pub fn get_schedule(&self, account: &AccountId) -> Result<Option<VestingSchedule>, AirlockError> {
        match self.schedules.get(account.as_bytes()).map_err(storage_err)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes).map_err(ser_err)?)),
            None => Ok(None),
        }
    }

    pub fn put_schedule(&self, s: &VestingSchedule) -> Result<(), AirlockError> {
        let bytes = bincode::serialize(s).map_err(ser_err)?;
        self.schedules
            .insert(s.account.as_bytes(), bytes)
            .map_err(storage_err)?;
        Ok(())
    }

    pub fn schedule_exists(&self, account: &AccountId) -> bool {
        self.schedules
            .contains_key(account.as_bytes())
            .unwrap_or(false)
    }

    pub fn schedule_count(&self) -> usize {
        self.schedules.len()
    }

    // ── Claimed sets ─────────────────────────────────────────────────────────

    pub fn is_voucher_claimed(&self, id: VoucherId) -> bool {
        self.claimed_vouchers
            .contains_key(id.to_be_bytes())
            .unwrap_or(false)
    }

    pub fn mark_voucher_claimed(&self, id: VoucherId) -> Result<(), AirlockError> {
        self.claimed_vouchers
            .insert(id.to_be_bytes(), b"".as_ref())
            .map_err(storage_err)?;
        Ok(())
    }

    pub fn is_leaf_claimed(&self, leaf: &Hash32) -> bool {
        self.claimed_leaves
            .contains_key(leaf.as_bytes())
            .unwrap_or(false)
    }

    pub fn mark_leaf_claimed(&self, leaf: &Hash32) -> Result<(), AirlockError> {
        self.claimed_leaves
            .insert(leaf.as_bytes(), b"".as_ref())
            .map_err(storage_err)?;
        Ok(())
    }

    // ── Balances (vault ledger backing) ──────────────────────────────────────

    pub fn get_balance(&self, account: &AccountId) -> Result<Balance, AirlockError> {
        match self.balances.get(account.as_bytes()).map_err(storage_err)? {
            Some(bytes) => Ok(bincode::deserialize(&bytes).map_err(ser_err)?),
            None => Ok(0),
        }
    }

    pub fn put_balance(&self, account: &AccountId, balance: Balance) -> Result<(), AirlockError> {
        let bytes = bincode::serialize(&balance).map_err(ser_err)?;
        self.balances
            .insert(account.as_bytes(), bytes)
            .map_err(storage_err)?;
        Ok(())
    }

    pub fn vault_balance(&self) -> Result<Balance, AirlockError> {
        match self.meta.get(b"vault_balance").map_err(storage_err)? {
            Some(bytes) => Ok(bincode::deserialize(&bytes).map_err(ser_err)?),
            None => Ok(0),
        }
    }

    pub fn put_vault_balance(&self, balance: Balance) -> Result<(), AirlockError> {
        let bytes = bincode::serialize(&balance).map_err(ser_err)?;
        self.meta
            .insert(b"vault_balance", bytes)
            .map_err(storage_err)?;
        Ok(())
    }

    // ── Configuration ────────────────────────────────────────────────────────

    pub fn get_config(&self) -> Result<DistributionConfig, AirlockError> {
        match self.meta.get(b"config").map_err(storage_err)? {
            Some(bytes) => Ok(bincode::deserialize(&bytes).map_err(ser_err)?),
            None => Ok(DistributionConfig::Unconfigured),
        }
    }

    pub fn put_config(&self, config: &DistributionConfig) -> Result<(), AirlockError> {
        let bytes = bincode::serialize(config).map_err(ser_err)?;
        self.meta.insert(b"config", bytes).map_err(storage_err)?;
        Ok(())
    }

    pub fn get_restrictions(&self) -> Result<WithdrawalRestrictions, AirlockError> {
        match self.meta.get(b"restrictions").map_err(storage_err)? {
            Some(bytes) => Ok(bincode::deserialize(&bytes).map_err(ser_err)?),
            None => Ok(WithdrawalRestrictions::default()),
        }
    }

    pub fn put_restrictions(&self, r: &WithdrawalRestrictions) -> Result<(), AirlockError> {
        let bytes = bincode::serialize(r).map_err(ser_err)?;
        self.meta
            .insert(b"restrictions", bytes)
            .map_err(storage_err)?;
        Ok(())
    }

    pub fn get_reveal_window(&self) -> Result<RevealWindow, AirlockError> {
        match self.meta.get(b"reveal_window").map_err(storage_err)? {
            Some(bytes) => Ok(bincode::deserialize(&bytes).map_err(ser_err)?),
            None => Ok(RevealWindow::default()),
        }
    }

    pub fn put_reveal_window(&self, w: &RevealWindow) -> Result<(), AirlockError> {
        let bytes = bincode::serialize(w).map_err(ser_err)?;
        self.meta
            .insert(b"reveal_window", bytes)
            .map_err(storage_err)?;
        Ok(())
    }

    /// Whether the circuit breaker is engaged. Storage faults propagate so
    /// that a failing read aborts the operation rather than reading as
    /// unpaused.
    pub fn is_paused(&self) -> Result<bool, AirlockError> {
        match self.meta.get(b"paused").map_err(storage_err)? {
            Some(v) => Ok(v.as_ref() == [1u8]),
            None => Ok(false),
        }
    }

    pub fn put_paused(&self, paused: bool) -> Result<(), AirlockError> {
        let v: &[u8] = if paused { &[1u8] } else { &[0u8] };
        self.meta.insert(b"paused", v).map_err(storage_err)?;
        Ok(())
    }

    // ── Height counter ───────────────────────────────────────────────────────

    /// Current operation height. The node bumps this once per admitted
    /// mutating operation; it is the discrete counter commit/reveal timing
    /// is measured in.
    pub fn current_height(&self) -> Result<Height, AirlockError> {
        match self.meta.get(b"height").map_err(storage_err)? {
            Some(bytes) => {
                let mut arr = [0u8; 8];
                arr.copy_from_slice(&bytes);
                Ok(u64::from_be_bytes(arr))
            }
            None => Ok(0),
        }
    }

    pub fn put_height(&self, height: Height) -> Result<(), AirlockError> {
        self.meta
            .insert(b"height", &height.to_be_bytes())
            .map_err(storage_err)?;
        Ok(())
    }

    /// Atomically advance the height and return the new value. Concurrent
    /// callers each get a distinct height: the read-modify-write runs as a
    /// single sled compare-and-swap loop, never as a racy get-then-put.
    pub fn bump_height(&self) -> Result<Height, AirlockError> {
        let ivec = self
            .meta
            .update_and_fetch(b"height", |old| {
                let next = match old {
                    Some(bytes) => {
                        let mut arr = [0u8; 8];
                        arr.copy_from_slice(bytes);
                        u64::from_be_bytes(arr) + 1
                    }
                    None => 1,
                };
                Some(next.to_be_bytes().to_vec())
            })
            .map_err(storage_err)?;
        match ivec {
            Some(bytes) => {
                let mut arr = [0u8; 8];
                arr.copy_from_slice(&bytes);
                Ok(u64::from_be_bytes(arr))
            }
            // The closure always returns Some; sled still types this as an
            // Option.
            None => Ok(0),
        }
    }

    // ── Event journal ────────────────────────────────────────────────────────

    /// Append an event record; assigns and returns the next sequence number.
    pub fn append_event(&self, mut record: EventRecord) -> Result<u64, AirlockError> {
        let seq = match self.events.last().map_err(storage_err)? {
            Some((key, _)) => {
                let mut arr = [0u8; 8];
                arr.copy_from_slice(&key);
                u64::from_be_bytes(arr) + 1
            }
            None => 0,
        };
        record.seq = seq;
        let bytes = bincode::serialize(&record).map_err(ser_err)?;
        self.events
            .insert(seq.to_be_bytes(), bytes)
            .map_err(storage_err)?;
        Ok(seq)
    }

    /// The most recent `limit` events, newest first.
    pub fn recent_events(&self, limit: usize) -> Result<Vec<EventRecord>, AirlockError> {
        let mut out = Vec::new();
        for item in self.events.iter().rev().take(limit) {
            let (_, bytes) = item.map_err(storage_err)?;
            out.push(bincode::deserialize(&bytes).map_err(ser_err)?);
        }
        Ok(out)
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), AirlockError> {
        self._db.flush().map_err(storage_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn temp_db(name: &str) -> Arc<StateDb> {
        let dir = std::env::temp_dir().join(format!("airlock_db_test_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        Arc::new(StateDb::open(&dir).expect("open temp db"))
    }

    #[test]
    fn bump_height_is_unique_under_concurrency() {
        // Concurrent mutating submissions must each observe a distinct
        // height, or the commit→reveal delay counting falls apart.
        let db = temp_db("height_concurrency");
        let threads = 8;
        let bumps_per_thread = 50;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let db = Arc::clone(&db);
                std::thread::spawn(move || {
                    (0..bumps_per_thread)
                        .map(|_| db.bump_height().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for height in handle.join().unwrap() {
                assert!(seen.insert(height), "height {height} assigned twice");
            }
        }
        let total = (threads * bumps_per_thread) as u64;
        assert_eq!(seen.len() as u64, total);
        assert_eq!(db.current_height().unwrap(), total);
    }

    #[test]
    fn bump_height_starts_after_persisted_height() {
        let db = temp_db("height_resume");
        db.put_height(41).unwrap();
        assert_eq!(db.bump_height().unwrap(), 42);
        assert_eq!(db.current_height().unwrap(), 42);
    }
}
