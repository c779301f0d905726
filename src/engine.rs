//! Reputation engine
//!
//! Entry point for every ledger operation. Each call reads the clock once, then
//! runs its whole state transition inside one store transaction: either every
//! slot it touches is updated, or none is.

use crate::address;
use crate::agent::{self, AgentProfile};
use crate::clock::Clock;
use crate::custody::{AssetCustody, SlotCustody};
use crate::error::LedgerError;
use crate::ledger::{self, ScorePolicy, StakeWeightedPolicy, TaskRecord};
use crate::protocol::{self, ParameterSource, ProtocolConfig, ProtocolParams, StoredParameters};
use crate::store::{atomically, fetch, SlotStore};
use crate::types::Identity;
use crate::vouch::{self, StakeVault, VouchReceipt, VouchRecord, VouchResolver};
use std::sync::Arc;
use tracing::{debug, info};

pub struct ReputationEngine {
    store: Arc<dyn SlotStore>,
    clock: Arc<dyn Clock>,
    custody: Arc<dyn AssetCustody>,
    params: Arc<dyn ParameterSource>,
    policy: Arc<dyn ScorePolicy>,
}

impl ReputationEngine {
    /// Engine with slot custody, stored parameters and the stake-weighted policy
    pub fn new(store: Arc<dyn SlotStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            custody: Arc::new(SlotCustody),
            params: Arc::new(StoredParameters),
            policy: Arc::new(StakeWeightedPolicy),
        }
    }

    pub fn with_custody(mut self, custody: Arc<dyn AssetCustody>) -> Self {
        self.custody = custody;
        self
    }

    pub fn with_parameter_source(mut self, params: Arc<dyn ParameterSource>) -> Self {
        self.params = params;
        self
    }

    pub fn with_policy(mut self, policy: Arc<dyn ScorePolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Create the protocol config; `authority` becomes the protocol authority
    pub fn initialize(
        &self,
        authority: &Identity,
        params: ProtocolParams,
    ) -> Result<ProtocolConfig, LedgerError> {
        let now = self.clock.now();
        let result = atomically(self.store.as_ref(), |slots| {
            protocol::initialize(slots, authority, params, now)
        });
        match &result {
            Ok(config) => info!(
                authority = %authority.short(),
                min_stake = config.min_stake,
                decay_rate = config.decay_rate,
                reward_amount = config.reward_amount,
                "Protocol initialized"
            ),
            Err(e) => debug!(error = %e, "Initialize rejected"),
        }
        result
    }

    pub fn config(&self) -> Result<Option<ProtocolConfig>, LedgerError> {
        let (address, _) = address::config_address()?;
        fetch(self.store.as_ref(), &address)
    }

    pub fn register_agent(
        &self,
        identity: &Identity,
        name: &str,
        metadata_uri: &str,
    ) -> Result<AgentProfile, LedgerError> {
        let now = self.clock.now();
        let result = atomically(self.store.as_ref(), |slots| {
            agent::register_agent(slots, identity, name, metadata_uri, now)
        });
        match &result {
            Ok(profile) => info!(agent = %identity.short(), name = %profile.name, "Agent registered"),
            Err(e) => debug!(agent = %identity.short(), error = %e, "Registration rejected"),
        }
        result
    }

    pub fn complete_task(
        &self,
        identity: &Identity,
        task_id: &str,
        proof_uri: &str,
    ) -> Result<AgentProfile, LedgerError> {
        let now = self.clock.now();
        let result = atomically(self.store.as_ref(), |slots| {
            let params = self.params.params(slots)?;
            ledger::complete_task(
                slots,
                self.policy.as_ref(),
                &params,
                identity,
                task_id,
                proof_uri,
                now,
            )
        });
        match result {
            Ok((profile, record)) => {
                info!(
                    agent = %identity.short(),
                    task_id,
                    earned = record.reputation_earned,
                    score = profile.reputation_score,
                    "Task completed"
                );
                Ok(profile)
            }
            Err(e) => {
                debug!(agent = %identity.short(), task_id, error = %e, "Task completion rejected");
                Err(e)
            }
        }
    }

    /// Stake `amount` for (`is_positive`) or against `target`
    pub fn vouch(
        &self,
        voucher: &Identity,
        target: &Identity,
        amount: u64,
        is_positive: bool,
    ) -> Result<VouchReceipt, LedgerError> {
        let now = self.clock.now();
        let result = atomically(self.store.as_ref(), |slots| {
            let params = self.params.params(slots)?;
            vouch::vouch(
                slots,
                self.custody.as_ref(),
                self.policy.as_ref(),
                &params,
                voucher,
                target,
                amount,
                is_positive,
                now,
            )
        });
        match &result {
            Ok(receipt) => info!(
                voucher = %voucher.short(),
                target = %target.short(),
                amount,
                is_positive,
                delta = receipt.record.score_delta,
                score = receipt.target.reputation_score,
                "Vouch recorded"
            ),
            Err(e) => debug!(
                voucher = %voucher.short(),
                target = %target.short(),
                amount,
                error = %e,
                "Vouch rejected"
            ),
        }
        result
    }

    /// Apply one decay cycle to `target`; any caller may trigger it
    pub fn decay(&self, caller: &Identity, target: &Identity) -> Result<AgentProfile, LedgerError> {
        let now = self.clock.now();
        let result = atomically(self.store.as_ref(), |slots| {
            let params = self.params.params(slots)?;
            ledger::decay(slots, self.policy.as_ref(), &params, target, now)
        });
        match &result {
            Ok(profile) => info!(
                caller = %caller.short(),
                target = %target.short(),
                score = profile.reputation_score,
                "Decay applied"
            ),
            Err(e) => debug!(caller = %caller.short(), target = %target.short(), error = %e, "Decay rejected"),
        }
        result
    }

    /// Resolve an active vouch through `resolver`
    pub fn resolve_vouch(
        &self,
        caller: &Identity,
        voucher: &Identity,
        target: &Identity,
        resolver: &dyn VouchResolver,
    ) -> Result<VouchRecord, LedgerError> {
        let now = self.clock.now();
        let result = atomically(self.store.as_ref(), |slots| {
            vouch::resolve_vouch(
                slots,
                self.custody.as_ref(),
                resolver,
                caller,
                voucher,
                target,
                now,
            )
        });
        match &result {
            Ok(record) => info!(
                caller = %caller.short(),
                voucher = %voucher.short(),
                target = %target.short(),
                status = ?record.status,
                "Vouch resolved"
            ),
            Err(e) => debug!(caller = %caller.short(), error = %e, "Vouch resolution rejected"),
        }
        result
    }

    /// Mint `amount` of the staking asset to `owner`. Authority only.
    pub fn fund(&self, caller: &Identity, owner: &Identity, amount: u64) -> Result<u64, LedgerError> {
        let result = atomically(self.store.as_ref(), |slots| {
            let config = protocol::get(slots)?;
            if !config.is_authority(caller) {
                return Err(LedgerError::InvalidAuthority(format!(
                    "{} is not the protocol authority",
                    caller.short()
                )));
            }
            self.custody.credit(slots, owner, amount)
        });
        match &result {
            Ok(balance) => info!(owner = %owner.short(), amount, balance, "Account funded"),
            Err(e) => debug!(caller = %caller.short(), error = %e, "Funding rejected"),
        }
        result
    }

    pub fn query_reputation(&self, identity: &Identity) -> Result<Option<AgentProfile>, LedgerError> {
        let (address, _) = address::agent_address(identity)?;
        fetch(self.store.as_ref(), &address)
    }

    pub fn query_task(
        &self,
        identity: &Identity,
        task_id: &str,
    ) -> Result<Option<TaskRecord>, LedgerError> {
        let (address, _) = address::task_address(identity, task_id)?;
        fetch(self.store.as_ref(), &address)
    }

    pub fn query_vouch(
        &self,
        voucher: &Identity,
        target: &Identity,
    ) -> Result<Option<VouchRecord>, LedgerError> {
        let (address, _) = address::vouch_address(voucher, target)?;
        fetch(self.store.as_ref(), &address)
    }

    pub fn query_vault(
        &self,
        voucher: &Identity,
        target: &Identity,
    ) -> Result<Option<StakeVault>, LedgerError> {
        let (address, _) = address::stake_address(voucher, target)?;
        fetch(self.store.as_ref(), &address)
    }

    pub fn balance_of(&self, owner: &Identity) -> Result<u64, LedgerError> {
        atomically(self.store.as_ref(), |slots| self.custody.balance(slots, owner))
    }
}
