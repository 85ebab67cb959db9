use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonrpsee::core::{async_trait, RpcResult};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::ErrorObject;
use tracing::info;

use airlock_core::config::{
    ReleaseFrequency, RevealWindow, VestingParams, WithdrawalRestrictions,
};
use airlock_core::constants::MAX_EVENT_PAGE;
use airlock_core::error::AirlockError;
use airlock_core::types::{AccountId, Balance, Hash32, Height, Salt, Timestamp};
use airlock_state::{DistributionQuery, SingleAdmin, StateEngine, VaultLedger};

use crate::api::AirlockApiServer;
use crate::types::{
    RpcCommitReceipt, RpcCommitment, RpcDistributionInfo, RpcEvent, RpcRestrictions,
    RpcRevealOutcome, RpcRevealWindow, RpcSchedule, RpcVestingInfo, RpcVestingParams,
};

fn rpc_err(code: i32, msg: impl Into<String>) -> ErrorObject<'static> {
    ErrorObject::owned(code, msg.into(), None::<()>)
}

/// Map an engine error to a JSON-RPC error: storage and serialization
/// failures are internal (-32603), everything else is a domain rejection
/// (-32000) whose message carries the reason.
fn engine_err(e: AirlockError) -> ErrorObject<'static> {
    match e {
        AirlockError::Storage(_) | AirlockError::Serialization(_) => rpc_err(-32603, e.to_string()),
        other => rpc_err(-32000, other.to_string()),
    }
}

fn parse_account(s: &str) -> Result<AccountId, ErrorObject<'static>> {
    AccountId::from_b58(s).map_err(|e| rpc_err(-32602, format!("invalid account id: {e}")))
}

fn parse_hash(s: &str) -> Result<Hash32, ErrorObject<'static>> {
    Hash32::from_hex(s).map_err(|e| rpc_err(-32602, format!("invalid hash: {e}")))
}

fn parse_amount(s: &str) -> Result<Balance, ErrorObject<'static>> {
    s.parse::<Balance>()
        .map_err(|e| rpc_err(-32602, format!("invalid amount: {e}")))
}

fn parse_salt(s: &str) -> Result<Salt, ErrorObject<'static>> {
    let bytes = hex::decode(s).map_err(|e| rpc_err(-32602, format!("invalid salt hex: {e}")))?;
    let arr: Salt = bytes
        .try_into()
        .map_err(|_| rpc_err(-32602, "salt must be 32 bytes"))?;
    Ok(arr)
}

fn parse_params(p: &RpcVestingParams) -> Result<VestingParams, ErrorObject<'static>> {
    let frequency = match p.frequency.as_str() {
        "per_second" => ReleaseFrequency::PerSecond,
        "per_day" => ReleaseFrequency::PerDay,
        "per_month" => ReleaseFrequency::PerMonth,
        other => return Err(rpc_err(-32602, format!("unknown frequency: {other}"))),
    };
    Ok(VestingParams {
        start_time: p.start_time,
        vesting_duration_secs: p.vesting_duration_secs,
        cliff_duration_secs: p.cliff_duration_secs,
        immediate_release_bps: p.immediate_release_bps,
        cliff_release_bps: p.cliff_release_bps,
        frequency,
    })
}

/// Shared state passed to the RPC server.
pub struct RpcServerState {
    pub engine: Arc<StateEngine<VaultLedger, SingleAdmin>>,
}

/// The RPC server implementation.
pub struct RpcServer {
    state: Arc<RpcServerState>,
}

impl RpcServer {
    pub fn new(state: Arc<RpcServerState>) -> Self {
        Self { state }
    }

    /// Start the JSON-RPC server on `addr`. Returns a handle to stop it.
    pub async fn start(self, addr: SocketAddr) -> anyhow::Result<ServerHandle> {
        let server = Server::builder().build(addr).await?;
        let module = self.into_rpc();
        let handle = server.start(module);
        info!(%addr, "RPC server started");
        Ok(handle)
    }

    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }

    /// Advance and persist the operation height. Called once per mutating
    /// request; commit/reveal timing is measured in this counter. The bump
    /// is atomic in the database, so concurrently dispatched requests never
    /// share a height.
    fn tick_height(&self) -> Result<Height, ErrorObject<'static>> {
        self.state.engine.db.bump_height().map_err(engine_err)
    }
}

#[async_trait]
impl AirlockApiServer for RpcServer {
    // ── Reads ─────────────────────────────────────────────────────────────────

    async fn get_info(&self) -> RpcResult<RpcDistributionInfo> {
        let db = &self.state.engine.db;
        let q = DistributionQuery::new(db);
        let config = q.configuration().map_err(engine_err)?;
        let restrictions = q.restrictions().map_err(engine_err)?;
        let window = q.reveal_window().map_err(engine_err)?;
        Ok(RpcDistributionInfo {
            configured: config.is_configured(),
            paused: q.is_paused().map_err(engine_err)?,
            digest: config.digest().map(|d| d.to_hex()).unwrap_or_default(),
            params: config.params().map(RpcVestingParams::from),
            min_withdrawal_interval_secs: restrictions.min_interval_secs,
            min_withdrawal_amount: restrictions.min_amount.to_string(),
            reveal_min_delay: window.min_delay,
            reveal_max_delay: window.max_delay,
            vault_balance: q.vault_balance().map_err(engine_err)?.to_string(),
            schedule_count: db.schedule_count() as u64,
            height: db.current_height().map_err(engine_err)?,
        })
    }

    async fn get_schedule(&self, account_id: String) -> RpcResult<Option<RpcSchedule>> {
        let id = parse_account(&account_id)?;
        let q = DistributionQuery::new(&self.state.engine.db);
        Ok(q.schedule(&id).map_err(engine_err)?.map(|s| RpcSchedule::from(&s)))
    }

    async fn get_vesting_info(&self, account_id: String) -> RpcResult<RpcVestingInfo> {
        let id = parse_account(&account_id)?;
        let q = DistributionQuery::new(&self.state.engine.db);
        let info = q.vesting_info(&id, self.now()).map_err(engine_err)?;
        Ok(RpcVestingInfo::from(&info))
    }

    async fn get_releasable(&self, account_id: String) -> RpcResult<String> {
        let id = parse_account(&account_id)?;
        let q = DistributionQuery::new(&self.state.engine.db);
        Ok(q.releasable(&id, self.now()).map_err(engine_err)?.to_string())
    }

    async fn get_balance(&self, account_id: String) -> RpcResult<String> {
        let id = parse_account(&account_id)?;
        let q = DistributionQuery::new(&self.state.engine.db);
        Ok(q.account_balance(&id).map_err(engine_err)?.to_string())
    }

    async fn is_voucher_claimed(&self, voucher_id: u64) -> RpcResult<bool> {
        let q = DistributionQuery::new(&self.state.engine.db);
        Ok(q.is_voucher_claimed(voucher_id))
    }

    async fn get_commitment(&self, commit_hash: String) -> RpcResult<Option<RpcCommitment>> {
        let hash = parse_hash(&commit_hash)?;
        let q = DistributionQuery::new(&self.state.engine.db);
        Ok(q.commitment(&hash)
            .map_err(engine_err)?
            .map(|c| RpcCommitment::from(&c)))
    }

    async fn get_recent_events(&self, limit: u32) -> RpcResult<Vec<RpcEvent>> {
        let capped = (limit as usize).min(MAX_EVENT_PAGE);
        let q = DistributionQuery::new(&self.state.engine.db);
        let records = q.recent_events(capped).map_err(engine_err)?;
        Ok(records.iter().map(RpcEvent::from_record).collect())
    }

    async fn describe_account(&self, account_id: String) -> RpcResult<String> {
        let id = parse_account(&account_id)?;
        let q = DistributionQuery::new(&self.state.engine.db);
        q.describe(&id, self.now()).map_err(engine_err)
    }

    // ── Claim protocol ────────────────────────────────────────────────────────

    async fn commit(&self, account_id: String, commit_hash: String) -> RpcResult<RpcCommitReceipt> {
        let id = parse_account(&account_id)?;
        let hash = parse_hash(&commit_hash)?;
        let height = self.tick_height()?;
        self.state
            .engine
            .commit(&id, hash, height, self.now())
            .map_err(engine_err)?;
        let window = self
            .state
            .engine
            .db
            .get_reveal_window()
            .map_err(engine_err)?;
        Ok(RpcCommitReceipt {
            height,
            reveal_earliest: height + window.min_delay,
            reveal_latest: height + window.max_delay,
        })
    }

    async fn reveal(
        &self,
        account_id: String,
        voucher_id: u64,
        amount: String,
        salt: String,
        proof: Vec<String>,
    ) -> RpcResult<RpcRevealOutcome> {
        let id = parse_account(&account_id)?;
        let amount = parse_amount(&amount)?;
        let salt = parse_salt(&salt)?;
        let proof: Vec<Hash32> = proof
            .iter()
            .map(|h| parse_hash(h))
            .collect::<Result<_, _>>()?;
        let height = self.tick_height()?;
        let paid = self
            .state
            .engine
            .reveal(&id, voucher_id, amount, &salt, &proof, height, self.now())
            .map_err(engine_err)?;
        Ok(RpcRevealOutcome {
            voucher_id,
            total_amount: amount.to_string(),
            paid: paid.to_string(),
        })
    }

    async fn withdraw(&self, account_id: String) -> RpcResult<String> {
        let id = parse_account(&account_id)?;
        self.tick_height()?;
        let paid = self
            .state
            .engine
            .withdraw(&id, self.now())
            .map_err(engine_err)?;
        Ok(paid.to_string())
    }

    // ── Administration ────────────────────────────────────────────────────────

    async fn configure(
        &self,
        account_id: String,
        digest: String,
        params: RpcVestingParams,
    ) -> RpcResult<bool> {
        let id = parse_account(&account_id)?;
        let digest = parse_hash(&digest)?;
        let params = parse_params(&params)?;
        self.tick_height()?;
        self.state
            .engine
            .configure(&id, digest, params, self.now())
            .map_err(engine_err)?;
        Ok(true)
    }

    async fn rotate_digest(&self, account_id: String, digest: String) -> RpcResult<bool> {
        let id = parse_account(&account_id)?;
        let digest = parse_hash(&digest)?;
        self.tick_height()?;
        self.state
            .engine
            .rotate_digest(&id, digest, self.now())
            .map_err(engine_err)?;
        Ok(true)
    }

    async fn update_restrictions(
        &self,
        account_id: String,
        restrictions: RpcRestrictions,
    ) -> RpcResult<bool> {
        let id = parse_account(&account_id)?;
        let restrictions = WithdrawalRestrictions {
            min_interval_secs: restrictions.min_interval_secs,
            min_amount: parse_amount(&restrictions.min_amount)?,
        };
        self.tick_height()?;
        self.state
            .engine
            .update_restrictions(&id, restrictions, self.now())
            .map_err(engine_err)?;
        Ok(true)
    }

    async fn update_reveal_window(
        &self,
        account_id: String,
        window: RpcRevealWindow,
    ) -> RpcResult<bool> {
        let id = parse_account(&account_id)?;
        let window = RevealWindow {
            min_delay: window.min_delay,
            max_delay: window.max_delay,
        };
        self.tick_height()?;
        self.state
            .engine
            .update_reveal_window(&id, window, self.now())
            .map_err(engine_err)?;
        Ok(true)
    }

    async fn deposit(&self, account_id: String, amount: String) -> RpcResult<bool> {
        let id = parse_account(&account_id)?;
        let amount = parse_amount(&amount)?;
        self.tick_height()?;
        self.state
            .engine
            .deposit(&id, amount, self.now())
            .map_err(engine_err)?;
        Ok(true)
    }

    async fn emergency_withdraw(
        &self,
        account_id: String,
        to: String,
        amount: String,
    ) -> RpcResult<bool> {
        let id = parse_account(&account_id)?;
        let to = parse_account(&to)?;
        let amount = parse_amount(&amount)?;
        self.tick_height()?;
        self.state
            .engine
            .emergency_withdraw(&id, &to, amount, self.now())
            .map_err(engine_err)?;
        Ok(true)
    }

    async fn pause(&self, account_id: String) -> RpcResult<bool> {
        let id = parse_account(&account_id)?;
        self.tick_height()?;
        self.state.engine.pause(&id, self.now()).map_err(engine_err)?;
        Ok(true)
    }

    async fn unpause(&self, account_id: String) -> RpcResult<bool> {
        let id = parse_account(&account_id)?;
        self.tick_height()?;
        self.state
            .engine
            .unpause(&id, self.now())
            .map_err(engine_err)?;
        Ok(true)
    }
}
