//! Resource ledger: staking, unstaking and refunds
//!
//! Stake is recorded twice: per (staker, receiver) pair in the delegation
//! table and per receiver in the resource totals. Unstaked tokens sit in a
//! single refund request per owner until the refund delay has passed. The
//! stake pool always holds exactly the delegated plus the refunding amount.

use log::{debug, info};

use sys_core::constants::STAKE_ACCOUNT;
use sys_core::{Asset, DeferredAction, Host, Name, ResourceLimit, Symbol};

use crate::context::Context;
use crate::error::{ContractError, Result};
use crate::records::{DelegatedBandwidth, RefundRequest, UserResources};

impl<'a, H: Host> Context<'a, H> {
    /// Stake `net`, `cpu` and `vote` from `from` for `receiver`. With
    /// `transfer` the receiver becomes the owner of the stake.
    pub fn delegate(
        &mut self,
        from: Name,
        receiver: Name,
        net: Asset,
        cpu: Asset,
        vote: Asset,
        transfer: bool,
    ) -> Result<()> {
        self.check_stake_quantities(&[net, cpu, vote])?;
        if transfer && from == receiver {
            return Err(ContractError::TransferToSelf);
        }
        self.change_bandwidth(from, receiver, net, cpu, vote, transfer)
    }

    /// Unstake from `receiver`; the amounts move into `from`'s refund request
    pub fn undelegate(
        &mut self,
        from: Name,
        receiver: Name,
        net: Asset,
        cpu: Asset,
        vote: Asset,
    ) -> Result<()> {
        self.check_stake_quantities(&[net, cpu, vote])?;
        if !self.state.global.is_activated() {
            return Err(ContractError::NotActivated);
        }
        self.change_bandwidth(
            from,
            receiver,
            net.checked_neg()?,
            cpu.checked_neg()?,
            vote.checked_neg()?,
            false,
        )
    }

    fn check_stake_quantities(&self, quantities: &[Asset]) -> Result<()> {
        let core = self.core_symbol()?;
        let mut total: i128 = 0;
        for q in quantities {
            if q.symbol != core {
                return Err(ContractError::WrongSymbol {
                    expected: core,
                    got: q.symbol,
                });
            }
            if q.is_negative() {
                return Err(ContractError::NegativeQuantity(*q));
            }
            total += q.amount as i128;
        }
        if total <= 0 {
            return Err(ContractError::ZeroStake);
        }
        Ok(())
    }

    /// Apply signed stake deltas. All deltas carry the same sign.
    pub fn change_bandwidth(
        &mut self,
        from: Name,
        receiver: Name,
        net_delta: Asset,
        cpu_delta: Asset,
        vote_delta: Asset,
        transfer: bool,
    ) -> Result<()> {
        let core = self.core_symbol()?;
        let now = self.now();
        let source = from;
        let owner = if transfer { receiver } else { from };

        let mut row = self
            .state
            .delegations
            .get(&owner, &receiver)
            .cloned()
            .unwrap_or_else(|| DelegatedBandwidth::new(owner, receiver, core));
        row.net_weight = row.net_weight.checked_add(&net_delta)?;
        row.cpu_weight = row.cpu_weight.checked_add(&cpu_delta)?;
        row.vote_weight = row.vote_weight.checked_add(&vote_delta)?;
        check_non_negative(&row.net_weight, "net bandwidth")?;
        check_non_negative(&row.cpu_weight, "cpu bandwidth")?;
        check_non_negative(&row.vote_weight, "vote weight")?;
        if row.is_empty() {
            self.state.delegations.remove(&owner, &receiver);
        } else {
            self.state.delegations.upsert(owner, row);
        }

        let mut totals = self
            .state
            .resources
            .get(&receiver)
            .cloned()
            .unwrap_or_else(|| UserResources::new(receiver, core));
        totals.net_weight = totals.net_weight.checked_add(&net_delta)?;
        totals.cpu_weight = totals.cpu_weight.checked_add(&cpu_delta)?;
        totals.vote_weight = totals.vote_weight.checked_add(&vote_delta)?;
        check_non_negative(&totals.net_weight, "total net bandwidth")?;
        check_non_negative(&totals.cpu_weight, "total cpu bandwidth")?;
        check_non_negative(&totals.vote_weight, "total vote weight")?;

        let current = self.host.resource_limits(receiver);
        let ram = (totals.ram_bytes + self.config.ram.ram_gift_bytes).max(current.ram_bytes);
        self.host.set_resource_limits(
            receiver,
            ResourceLimit::new(ram, totals.net_weight.amount, totals.cpu_weight.amount),
        )?;
        if totals.is_empty() {
            self.state.resources.remove(&receiver);
        } else {
            self.state.resources.upsert(totals);
        }

        // The stake pool never pays itself or holds refunds
        if source != STAKE_ACCOUNT {
            let to_self = !transfer && owner == receiver;
            let residual =
                self.settle_refund(owner, to_self, core, [net_delta, cpu_delta, vote_delta])?;
            if residual > 0 {
                self.host.transfer(
                    source,
                    STAKE_ACCOUNT,
                    Asset::new(residual, core),
                    "stake bandwidth",
                )?;
            }
        }

        debug!(
            "{} -> {}: net {} cpu {} vote {}",
            owner, receiver, net_delta, cpu_delta, vote_delta
        );

        self.state.voting.update_voting_power(
            &mut self.state.global,
            &self.config.voting,
            now,
            owner,
            vote_delta.amount,
        )?;
        Ok(())
    }

    /// Fold the deltas into `owner`'s refund request and reschedule its
    /// deferred claim. Returns the amount still to be paid into the pool.
    fn settle_refund(
        &mut self,
        owner: Name,
        to_self: bool,
        core: Symbol,
        mut balances: [Asset; 3],
    ) -> Result<i64> {
        let now = self.now();
        let undelegating = balances.iter().any(Asset::is_negative);

        if undelegating || to_self {
            let request = match self.state.refunds.get(&owner).cloned() {
                Some(mut req) => {
                    if undelegating {
                        req.request_time = now;
                    }
                    let amounts = [&mut req.net_amount, &mut req.cpu_amount, &mut req.vote_amount];
                    for (amount, balance) in amounts.into_iter().zip(balances.iter_mut()) {
                        *amount = amount.checked_sub(balance)?;
                        if amount.is_negative() {
                            *balance = amount.checked_neg()?;
                            amount.amount = 0;
                        } else {
                            balance.amount = 0;
                        }
                    }
                    Some(req)
                }
                None if undelegating => {
                    let mut req = RefundRequest::new(owner, now, core);
                    let amounts = [&mut req.net_amount, &mut req.cpu_amount, &mut req.vote_amount];
                    for (amount, balance) in amounts.into_iter().zip(balances.iter_mut()) {
                        if balance.is_negative() {
                            *amount = balance.checked_neg()?;
                            balance.amount = 0;
                        }
                    }
                    Some(req)
                }
                None => None,
            };

            if let Some(req) = request {
                let deferred = DeferredAction::Refund { owner };
                if req.is_empty() {
                    self.state.refunds.remove(&owner);
                    self.host.cancel(deferred.sender_id());
                } else {
                    let due = req
                        .request_time
                        .add_secs(self.config.staking.refund_delay_sec);
                    self.state.refunds.upsert(req);
                    self.host.schedule(deferred, due);
                }
            }
        }

        let mut residual = Asset::zero(core);
        for balance in balances.iter().filter(|b| b.is_positive()) {
            residual = residual.checked_add(balance)?;
        }
        Ok(residual.amount)
    }

    /// Pay out `owner`'s matured refund request
    pub fn refund(&mut self, owner: Name) -> Result<Asset> {
        let core = self.core_symbol()?;
        let req = self
            .state
            .refunds
            .get(&owner)
            .cloned()
            .ok_or(ContractError::RefundNotFound(owner))?;

        let available = req.request_time.add_secs(self.config.staking.refund_delay_sec);
        if available > self.now() {
            return Err(ContractError::RefundNotAvailable { owner, available });
        }

        let amount = req
            .net_amount
            .checked_add(&req.cpu_amount)?
            .checked_add(&req.vote_amount)?;
        self.state.refunds.remove(&owner);
        self.host.cancel(DeferredAction::Refund { owner }.sender_id());
        if amount.is_positive() {
            self.host.transfer(STAKE_ACCOUNT, owner, Asset::new(amount.amount, core), "unstake")?;
        }

        info!("refunded {} to {}", amount, owner);
        Ok(amount)
    }
}

fn check_non_negative(amount: &Asset, what: &'static str) -> Result<()> {
    if amount.is_negative() {
        return Err(ContractError::InsufficientStake(what));
    }
    Ok(())
}
