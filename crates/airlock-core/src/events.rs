//! Event journal model.
//!
//! Every state transition appends one event. Off-chain observers replay the
//! journal to reconstruct distribution state without polling every record.

use serde::{Deserialize, Serialize};

use crate::config::{RevealWindow, WithdrawalRestrictions};
use crate::types::{AccountId, Balance, Hash32, Height, Timestamp, VoucherId};

/// One journaled state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Configured {
        digest: Hash32,
    },
    DigestRotated {
        old: Hash32,
        new: Hash32,
    },
    RestrictionsUpdated {
        restrictions: WithdrawalRestrictions,
    },
    RevealWindowUpdated {
        window: RevealWindow,
    },
    Committed {
        commit_hash: Hash32,
        committer: AccountId,
        height: Height,
    },
    Revealed {
        account: AccountId,
        voucher_id: VoucherId,
        total_amount: Balance,
        /// Amount actually paid at claim (zero when the vault was short).
        paid: Balance,
    },
    /// The vault could not cover a reveal's immediate tranche; the schedule
    /// was still created and the tranche remains releasable.
    VaultShort {
        account: AccountId,
        needed: Balance,
    },
    Withdrawn {
        account: AccountId,
        amount: Balance,
        released_total: Balance,
    },
    Deposited {
        amount: Balance,
        vault_balance: Balance,
    },
    EmergencyWithdrawal {
        to: AccountId,
        amount: Balance,
    },
    Paused,
    Unpaused,
}

/// Journal entry: a sequence number, the wall-clock time the operation ran,
/// and the event itself. Sequence numbers are strictly increasing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub seq: u64,
    pub at: Timestamp,
    pub event: Event,
}
