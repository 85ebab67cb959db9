//! airlock-rpc
//!
//! JSON-RPC 2.0 server for the airlock distribution node.
//!
//! Namespace: "airlock"
//! Reads:
//!   airlock_getInfo            — configuration, knobs, vault balance, height
//!   airlock_getSchedule        — vesting schedule for an account
//!   airlock_getVestingInfo     — tranche breakdown at the current time
//!   airlock_getReleasable      — currently withdrawable amount
//!   airlock_getBalance         — paid-out balance
//!   airlock_isVoucherClaimed   — voucher consumption check
//!   airlock_getCommitment      — stored commitment by hash
//!   airlock_getRecentEvents    — journal page, newest first
//!   airlock_describeAccount    — one-line position summary
//! Claim protocol:
//!   airlock_commit             — phase one: post a commitment hash
//!   airlock_reveal             — phase two: disclose and prove the claim
//!   airlock_withdraw           — pay out everything releasable
//! Administration (admin account only):
//!   airlock_configure, airlock_rotateDigest, airlock_updateRestrictions,
//!   airlock_updateRevealWindow, airlock_deposit, airlock_emergencyWithdraw,
//!   airlock_pause, airlock_unpause

pub mod api;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerState};
pub use types::{
    RpcCommitReceipt, RpcCommitment, RpcDistributionInfo, RpcEvent, RpcRestrictions,
    RpcRevealOutcome, RpcRevealWindow, RpcSchedule, RpcVestingInfo, RpcVestingParams,
};
