//! Execution context of a single action

use sys_core::{BlockTimestamp, Host, Symbol, TimePoint};

use crate::config::SystemConfig;
use crate::error::{ContractError, Result};
use crate::state::SystemState;

/// Mutable view over the contract state and the host for one action.
/// Action handlers are implemented on this type across the crate's modules.
pub struct Context<'a, H: Host> {
    pub state: &'a mut SystemState,
    pub host: &'a mut H,
    pub config: &'a SystemConfig,
}

impl<'a, H: Host> Context<'a, H> {
    pub fn new(state: &'a mut SystemState, host: &'a mut H, config: &'a SystemConfig) -> Self {
        Self { state, host, config }
    }

    pub fn now(&self) -> TimePoint {
        self.host.now()
    }

    pub fn block_time(&self) -> BlockTimestamp {
        self.host.block_time()
    }

    pub fn core_symbol(&self) -> Result<Symbol> {
        self.state.core_symbol()
    }

    pub(crate) fn require_initialized(&self) -> Result<()> {
        if self.state.is_initialized() {
            Ok(())
        } else {
            Err(ContractError::NotInitialized)
        }
    }
}
