//! Privileged actions: initialization, limits, parameters, features

use log::info;

use economics::ExchangeState;
use sys_core::{BlockchainParameters, FeatureDigest, Host, Name, ResourceLimit, Symbol};

use crate::context::Context;
use crate::error::{ContractError, Result};

/// Highest schema revision this code understands
pub const MAX_SCHEMA_REVISION: u8 = 1;

/// Lowest accepted `max_authority_depth`
pub const MIN_AUTHORITY_DEPTH: u16 = 3;

impl<'a, H: Host> Context<'a, H> {
    /// Bind the contract to the core token and open the RAM market
    pub fn init(&mut self, version: u32, core: Symbol) -> Result<()> {
        if version != 0 {
            return Err(ContractError::UnsupportedVersion(version));
        }
        if self.state.is_initialized() {
            return Err(ContractError::AlreadyInitialized);
        }

        let supply = self
            .host
            .supply(&core)
            .ok_or(ContractError::TokenNotFound(core))?;
        if supply.symbol != core {
            return Err(ContractError::PrecisionMismatch {
                expected: core,
                actual: supply.symbol,
            });
        }
        if !supply.is_positive() {
            return Err(ContractError::EmptySupply);
        }

        let block_time = self.block_time();
        let global = &mut self.state.global;
        global.v1.max_ram_size = self.config.ram.max_ram_size;
        global.v2.new_ram_per_block = self.config.ram.new_ram_per_block;
        global.v2.last_ram_increase = block_time;

        self.state.market = Some(ExchangeState::new_ram_market(global.free_ram(), &supply));
        self.state.core_symbol = Some(core);

        info!("system contract initialized with core token {}", core);
        Ok(())
    }

    /// Set explicit limits for an account that holds no resource row
    pub fn set_resource_limits(
        &mut self,
        account: Name,
        ram_bytes: i64,
        net_weight: i64,
        cpu_weight: i64,
    ) -> Result<()> {
        if self.state.resources.contains(&account) {
            return Err(ContractError::LimitedAccount(account));
        }
        self.host.set_resource_limits(
            account,
            ResourceLimit::new(ram_bytes, net_weight, cpu_weight),
        )?;
        Ok(())
    }

    pub fn set_parameters(&mut self, params: BlockchainParameters) -> Result<()> {
        if params.max_authority_depth < MIN_AUTHORITY_DEPTH {
            return Err(ContractError::AuthorityDepthTooLow(params.max_authority_depth));
        }
        self.host.set_blockchain_parameters(&params)?;
        self.state.global.v1.parameters = params;
        Ok(())
    }

    pub fn set_privileged(&mut self, account: Name, is_privileged: bool) -> Result<()> {
        self.host.set_privileged(account, is_privileged)?;
        Ok(())
    }

    /// Advance the global schema revision by exactly one
    pub fn bump_schema_revision(&mut self, revision: u8) -> Result<()> {
        let current = self.state.global.v2.revision;
        if current.checked_add(1) != Some(revision) {
            return Err(ContractError::InvalidRevision {
                expected: current.saturating_add(1),
                requested: revision,
            });
        }
        if revision > MAX_SCHEMA_REVISION {
            return Err(ContractError::RevisionTooHigh(revision));
        }
        self.state.global.v2.revision = revision;
        info!("schema revision bumped to {}", revision);
        Ok(())
    }

    pub fn activate_feature(&mut self, digest: FeatureDigest) -> Result<()> {
        self.host.preactivate_feature(digest)?;
        info!("feature {} pre-activated", digest);
        Ok(())
    }
}
