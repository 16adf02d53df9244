//! In-memory host
//!
//! Implements every host trait over plain collections with a settable
//! clock. Used by the simulator and by tests; serializable so a whole
//! session can be snapshotted next to the contract state.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::asset::{Asset, Symbol};
use crate::error::HostError;
use crate::global::BlockchainParameters;
use crate::host::{
    Chain, Clock, DeferredAction, FeatureDigest, HostResult, ProducerKey, ResourceLimit,
    ResourceLimits, Scheduler, TokenLedger,
};
use crate::name::Name;
use crate::time::TimePoint;

/// Deferred action waiting for its due time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAction {
    pub action: DeferredAction,
    pub due: TimePoint,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryHost {
    now: TimePoint,
    supplies: BTreeMap<Symbol, i64>,
    balances: BTreeMap<Name, BTreeMap<Symbol, i64>>,
    limits: BTreeMap<Name, ResourceLimit>,
    ram_usage: BTreeMap<Name, i64>,
    deferred: Vec<ScheduledAction>,
    accounts: BTreeSet<Name>,
    privileged: BTreeSet<Name>,
    proposed_producers: Vec<ProducerKey>,
    schedule_version: u64,
    parameters: Option<BlockchainParameters>,
    activated_features: BTreeSet<FeatureDigest>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host starting at the given time
    pub fn at(now: TimePoint) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    pub fn set_time(&mut self, now: TimePoint) {
        self.now = now;
    }

    pub fn advance_secs(&mut self, secs: i64) {
        self.now = self.now.add_secs(secs);
    }

    /// Register a token with zero supply
    pub fn create_token(&mut self, symbol: Symbol) {
        self.supplies.entry(symbol).or_insert(0);
    }

    pub fn set_ram_usage(&mut self, account: Name, bytes: i64) {
        self.ram_usage.insert(account, bytes);
    }

    pub fn pending_deferred(&self) -> &[ScheduledAction] {
        &self.deferred
    }

    pub fn proposed_producers(&self) -> &[ProducerKey] {
        &self.proposed_producers
    }

    pub fn schedule_version(&self) -> u64 {
        self.schedule_version
    }

    pub fn is_privileged(&self, account: Name) -> bool {
        self.privileged.contains(&account)
    }

    pub fn parameters(&self) -> Option<&BlockchainParameters> {
        self.parameters.as_ref()
    }

    pub fn is_feature_activated(&self, digest: &FeatureDigest) -> bool {
        self.activated_features.contains(digest)
    }

    /// Sum of every balance held in `symbol`
    pub fn total_balances(&self, symbol: Symbol) -> i64 {
        self.balances
            .values()
            .filter_map(|b| b.get(&symbol))
            .sum()
    }

    fn token_symbol(&self, quantity: &Asset) -> HostResult<()> {
        if self.supplies.contains_key(&quantity.symbol) {
            Ok(())
        } else {
            Err(HostError::UnknownToken(quantity.symbol.to_string()))
        }
    }
}

impl TokenLedger for MemoryHost {
    fn supply(&self, symbol: &Symbol) -> Option<Asset> {
        self.supplies
            .iter()
            .find(|(sym, _)| sym.same_code(symbol))
            .map(|(sym, amount)| Asset::new(*amount, *sym))
    }

    fn balance(&self, owner: Name, symbol: Symbol) -> Asset {
        let amount = self
            .balances
            .get(&owner)
            .and_then(|b| b.get(&symbol))
            .copied()
            .unwrap_or(0);
        Asset::new(amount, symbol)
    }

    fn transfer(&mut self, from: Name, to: Name, quantity: Asset, memo: &str) -> HostResult<()> {
        if !quantity.is_positive() {
            return Err(HostError::NonPositiveTransfer(quantity));
        }
        if from == to {
            return Err(HostError::TransferToSelf(from));
        }
        self.token_symbol(&quantity)?;

        let available = self.balance(from, quantity.symbol);
        if available.amount < quantity.amount {
            return Err(HostError::Overdrawn {
                owner: from,
                needed: quantity,
                available,
            });
        }
        let credited = self
            .balance(to, quantity.symbol)
            .checked_add(&quantity)?;

        self.balances
            .entry(from)
            .or_default()
            .insert(quantity.symbol, available.amount - quantity.amount);
        self.balances
            .entry(to)
            .or_default()
            .insert(quantity.symbol, credited.amount);

        debug!("transfer {} -> {}: {} ({})", from, to, quantity, memo);
        Ok(())
    }

    fn issue(&mut self, to: Name, quantity: Asset, memo: &str) -> HostResult<()> {
        if !quantity.is_positive() {
            return Err(HostError::NonPositiveTransfer(quantity));
        }
        self.token_symbol(&quantity)?;

        let current = self.supplies.get(&quantity.symbol).copied().unwrap_or(0);
        let supply = Asset::new(current, quantity.symbol).checked_add(&quantity)?;
        let credited = self.balance(to, quantity.symbol).checked_add(&quantity)?;
        self.supplies.insert(quantity.symbol, supply.amount);
        self.balances
            .entry(to)
            .or_default()
            .insert(quantity.symbol, credited.amount);

        debug!("issue {} to {} ({})", quantity, to, memo);
        Ok(())
    }
}

impl ResourceLimits for MemoryHost {
    fn resource_limits(&self, account: Name) -> ResourceLimit {
        self.limits
            .get(&account)
            .copied()
            .unwrap_or(ResourceLimit::new(-1, -1, -1))
    }

    fn set_resource_limits(&mut self, account: Name, limits: ResourceLimit) -> HostResult<()> {
        let usage = self.ram_usage(account);
        if limits.ram_bytes >= 0 && usage > limits.ram_bytes {
            return Err(HostError::RamUsageExceeded {
                account,
                usage,
                limit: limits.ram_bytes,
            });
        }
        self.limits.insert(account, limits);
        Ok(())
    }

    fn ram_usage(&self, account: Name) -> i64 {
        self.ram_usage.get(&account).copied().unwrap_or(0)
    }
}

impl Scheduler for MemoryHost {
    fn schedule(&mut self, action: DeferredAction, due: TimePoint) {
        let id = action.sender_id();
        self.deferred.retain(|s| s.action.sender_id() != id);
        debug!("schedule {:?} at {}", action, due);
        self.deferred.push(ScheduledAction { action, due });
    }

    fn cancel(&mut self, sender_id: u128) -> bool {
        let before = self.deferred.len();
        self.deferred.retain(|s| s.action.sender_id() != sender_id);
        before != self.deferred.len()
    }

    fn take_due(&mut self, now: TimePoint) -> Vec<DeferredAction> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.deferred.drain(..).partition(|s| s.due <= now);
        self.deferred = pending;
        due.sort_by_key(|s| s.due);
        due.into_iter().map(|s| s.action).collect()
    }
}

impl Chain for MemoryHost {
    fn is_account(&self, name: Name) -> bool {
        self.accounts.contains(&name)
    }

    fn create_account(&mut self, name: Name) -> HostResult<()> {
        if !self.accounts.insert(name) {
            return Err(HostError::AccountExists(name));
        }
        Ok(())
    }

    fn set_privileged(&mut self, account: Name, privileged: bool) -> HostResult<()> {
        if !self.accounts.contains(&account) {
            return Err(HostError::AccountNotFound(account));
        }
        if privileged {
            self.privileged.insert(account);
        } else {
            self.privileged.remove(&account);
        }
        Ok(())
    }

    fn set_proposed_producers(&mut self, producers: Vec<ProducerKey>) -> Option<u64> {
        if producers.is_empty() || producers == self.proposed_producers {
            return None;
        }
        self.proposed_producers = producers;
        self.schedule_version += 1;
        Some(self.schedule_version)
    }

    fn set_blockchain_parameters(&mut self, params: &BlockchainParameters) -> HostResult<()> {
        self.parameters = Some(params.clone());
        Ok(())
    }

    fn preactivate_feature(&mut self, digest: FeatureDigest) -> HostResult<()> {
        self.activated_features.insert(digest);
        Ok(())
    }
}

impl Clock for MemoryHost {
    fn now(&self) -> TimePoint {
        self.now
    }
}
