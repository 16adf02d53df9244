//! RAM trading against the bonding-curve market

use log::{debug, info};

use economics::{RamPricing, RamSupply};
use sys_core::constants::{RAMFEE_ACCOUNT, RAM_ACCOUNT, RAM_SYMBOL};
use sys_core::{Asset, Host, Name, ResourceLimit};

use crate::context::Context;
use crate::error::{ContractError, Result};
use crate::records::UserResources;

impl<'a, H: Host> Context<'a, H> {
    /// Grow the RAM supply by the bytes accrued since the last increase
    pub fn update_ram_supply(&mut self) -> Result<u64> {
        let block_time = self.block_time();
        let market = self
            .state
            .market
            .as_mut()
            .ok_or(ContractError::NotInitialized)?;
        Ok(RamSupply::update(&mut self.state.global, market, block_time)?)
    }

    /// Spend `quant` of `payer`'s core tokens on RAM for `receiver`.
    /// Returns the bytes bought.
    pub fn buy_ram(&mut self, payer: Name, receiver: Name, quant: Asset) -> Result<i64> {
        self.update_ram_supply()?;
        let core = self.core_symbol()?;
        if quant.symbol != core {
            return Err(ContractError::WrongSymbol {
                expected: core,
                got: quant.symbol,
            });
        }
        if !quant.is_positive() {
            return Err(ContractError::NonPositivePurchase(quant));
        }

        let fee = Asset::new(RamPricing::fee(quant.amount), core);
        let after_fee = quant.checked_sub(&fee)?;

        let market = self
            .state
            .market
            .as_mut()
            .ok_or(ContractError::NotInitialized)?;
        let bytes_out = market.convert(&after_fee, RAM_SYMBOL)?.amount;
        if bytes_out <= 0 {
            return Err(ContractError::NothingReserved);
        }

        self.host.transfer(payer, RAM_ACCOUNT, after_fee, "buy ram")?;
        if fee.is_positive() {
            self.host.transfer(payer, RAMFEE_ACCOUNT, fee, "ram fee")?;
        }

        let global = &mut self.state.global.v1;
        global.total_ram_bytes_reserved += bytes_out as u64;
        global.total_ram_stake += after_fee.amount;

        let mut res = self
            .state
            .resources
            .get(&receiver)
            .cloned()
            .unwrap_or_else(|| UserResources::new(receiver, core));
        res.ram_bytes += bytes_out;
        self.host.set_resource_limits(
            receiver,
            ResourceLimit::new(
                res.ram_bytes + self.config.ram.ram_gift_bytes,
                res.net_weight.amount,
                res.cpu_weight.amount,
            ),
        )?;
        self.state.resources.upsert(res);

        debug!("{} bought {} bytes for {} with {}", payer, bytes_out, receiver, quant);
        Ok(bytes_out)
    }

    /// Buy exactly `bytes` of RAM, quoting the cost against the current
    /// reserves and grossing it up by the fee
    pub fn buy_ram_bytes(&mut self, payer: Name, receiver: Name, bytes: u32) -> Result<i64> {
        self.update_ram_supply()?;
        let core = self.core_symbol()?;
        let market = self.state.market()?;
        let cost = RamPricing::bancor_input(
            market.ram_reserve(),
            market.core_reserve(),
            bytes as i64,
        )?;
        self.buy_ram(payer, receiver, Asset::new(RamPricing::with_fee(cost), core))
    }

    /// Sell `bytes` of `account`'s RAM back to the market. Returns the
    /// proceeds before the fee.
    pub fn sell_ram(&mut self, account: Name, bytes: i64) -> Result<Asset> {
        self.update_ram_supply()?;
        let core = self.core_symbol()?;
        if bytes <= 0 {
            return Err(ContractError::NonPositiveBytes(bytes));
        }

        let mut res = self
            .state
            .resources
            .get(&account)
            .cloned()
            .ok_or(ContractError::NoResourceRow(account))?;
        if res.ram_bytes < bytes {
            return Err(ContractError::InsufficientQuota {
                account,
                available: res.ram_bytes,
                requested: bytes,
            });
        }
        res.ram_bytes -= bytes;

        let quota = res.ram_bytes + self.config.ram.ram_gift_bytes;
        let usage = self.host.ram_usage(account);
        if usage > quota {
            return Err(ContractError::RamInUse {
                account,
                usage,
                quota,
            });
        }

        let market = self
            .state
            .market
            .as_mut()
            .ok_or(ContractError::NotInitialized)?;
        let tokens_out = market.convert(&Asset::new(bytes, RAM_SYMBOL), core)?;
        if tokens_out.amount <= 1 {
            return Err(ContractError::SaleTooSmall(tokens_out));
        }

        let global = &mut self.state.global.v1;
        global.total_ram_bytes_reserved -= bytes as u64;
        global.total_ram_stake -= tokens_out.amount;
        if global.total_ram_stake < 0 {
            return Err(ContractError::RamStakeUnderflow);
        }

        self.host.set_resource_limits(
            account,
            ResourceLimit::new(quota, res.net_weight.amount, res.cpu_weight.amount),
        )?;
        self.state.resources.upsert(res);

        self.host.transfer(RAM_ACCOUNT, account, tokens_out, "sell ram")?;
        let fee = RamPricing::fee(tokens_out.amount);
        if fee > 0 {
            self.host
                .transfer(account, RAMFEE_ACCOUNT, Asset::new(fee, core), "sell ram fee")?;
        }

        debug!("{} sold {} bytes for {}", account, bytes, tokens_out);
        Ok(tokens_out)
    }

    /// Raise the RAM supply to `max_ram_size` bytes
    pub fn set_ram_supply(&mut self, max_ram_size: u64) -> Result<()> {
        let market = self
            .state
            .market
            .as_mut()
            .ok_or(ContractError::NotInitialized)?;
        RamSupply::set_max(&mut self.state.global, market, max_ram_size)?;
        info!("RAM supply set to {} bytes", max_ram_size);
        Ok(())
    }

    /// Change the per-block RAM growth, settling growth at the old rate
    pub fn set_ram_growth_rate(&mut self, bytes_per_block: u16) -> Result<()> {
        let block_time = self.block_time();
        let market = self
            .state
            .market
            .as_mut()
            .ok_or(ContractError::NotInitialized)?;
        RamSupply::set_rate(&mut self.state.global, market, block_time, bytes_per_block)?;
        info!("RAM growth set to {} bytes per block", bytes_per_block);
        Ok(())
    }
}
