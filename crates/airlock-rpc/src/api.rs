use jsonrpsee::core::RpcResult;
use jsonrpsee::proc_macros::rpc;

use crate::types::{
    RpcCommitReceipt, RpcCommitment, RpcDistributionInfo, RpcEvent, RpcRestrictions,
    RpcRevealOutcome, RpcRevealWindow, RpcSchedule, RpcVestingInfo, RpcVestingParams,
};

/// Airlock JSON-RPC 2.0 API definition.
///
/// All method names are prefixed with "airlock_" via `namespace = "airlock"`.
/// Amounts are u128 and travel as decimal strings; hashes and salts as hex;
/// account ids as base-58.
#[rpc(server, namespace = "airlock")]
pub trait AirlockApi {
    // ── Reads ─────────────────────────────────────────────────────────────────

    /// Distribution status: configuration, operational knobs, vault balance.
    #[method(name = "getInfo")]
    async fn get_info(&self) -> RpcResult<RpcDistributionInfo>;

    /// Vesting schedule for a base-58 account id, or null.
    #[method(name = "getSchedule")]
    async fn get_schedule(&self, account_id: String) -> RpcResult<Option<RpcSchedule>>;

    /// Tranche breakdown for an account at the current time.
    #[method(name = "getVestingInfo")]
    async fn get_vesting_info(&self, account_id: String) -> RpcResult<RpcVestingInfo>;

    /// Currently releasable amount; "0" when the account has no schedule.
    #[method(name = "getReleasable")]
    async fn get_releasable(&self, account_id: String) -> RpcResult<String>;

    /// Paid-out token balance of an account.
    #[method(name = "getBalance")]
    async fn get_balance(&self, account_id: String) -> RpcResult<String>;

    /// Whether a voucher id has already been consumed by a claim.
    #[method(name = "isVoucherClaimed")]
    async fn is_voucher_claimed(&self, voucher_id: u64) -> RpcResult<bool>;

    /// Stored commitment for a hex hash, or null.
    #[method(name = "getCommitment")]
    async fn get_commitment(&self, commit_hash: String) -> RpcResult<Option<RpcCommitment>>;

    /// The most recent `limit` journal events (capped), newest first.
    #[method(name = "getRecentEvents")]
    async fn get_recent_events(&self, limit: u32) -> RpcResult<Vec<RpcEvent>>;

    /// Human-readable one-line summary of an account's position.
    #[method(name = "describeAccount")]
    async fn describe_account(&self, account_id: String) -> RpcResult<String>;

    // ── Claim protocol ────────────────────────────────────────────────────────

    /// Post a commitment hash (hex). Returns the recorded height and the
    /// reveal window bounds for it.
    #[method(name = "commit")]
    async fn commit(&self, account_id: String, commit_hash: String) -> RpcResult<RpcCommitReceipt>;

    /// Disclose a committed claim: voucher id, amount (decimal string),
    /// salt (hex, 32 bytes) and Merkle proof (hex hashes, leaf-to-root).
    #[method(name = "reveal")]
    async fn reveal(
        &self,
        account_id: String,
        voucher_id: u64,
        amount: String,
        salt: String,
        proof: Vec<String>,
    ) -> RpcResult<RpcRevealOutcome>;

    /// Withdraw everything currently releasable. Returns the amount paid.
    #[method(name = "withdraw")]
    async fn withdraw(&self, account_id: String) -> RpcResult<String>;

    // ── Administration ────────────────────────────────────────────────────────

    /// One-shot configuration: eligibility digest (hex) plus the six
    /// write-once vesting parameters. Admin only.
    #[method(name = "configure")]
    async fn configure(
        &self,
        account_id: String,
        digest: String,
        params: RpcVestingParams,
    ) -> RpcResult<bool>;

    /// Replace the eligibility digest with a superset tree root. Admin only.
    #[method(name = "rotateDigest")]
    async fn rotate_digest(&self, account_id: String, digest: String) -> RpcResult<bool>;

    /// Update withdrawal throttles. Admin only.
    #[method(name = "updateRestrictions")]
    async fn update_restrictions(
        &self,
        account_id: String,
        restrictions: RpcRestrictions,
    ) -> RpcResult<bool>;

    /// Update the commit→reveal delay window. Admin only.
    #[method(name = "updateRevealWindow")]
    async fn update_reveal_window(
        &self,
        account_id: String,
        window: RpcRevealWindow,
    ) -> RpcResult<bool>;

    /// Stage tokens into the distributable vault. Admin only.
    #[method(name = "deposit")]
    async fn deposit(&self, account_id: String, amount: String) -> RpcResult<bool>;

    /// Move vault funds out, bypassing schedules. Admin only.
    #[method(name = "emergencyWithdraw")]
    async fn emergency_withdraw(
        &self,
        account_id: String,
        to: String,
        amount: String,
    ) -> RpcResult<bool>;

    /// Halt public operations. Admin only.
    #[method(name = "pause")]
    async fn pause(&self, account_id: String) -> RpcResult<bool>;

    /// Resume public operations. Admin only.
    #[method(name = "unpause")]
    async fn unpause(&self, account_id: String) -> RpcResult<bool>;
}
