//! Transactional front end of the system contract

use log::{debug, warn};

use sys_core::Host;

use crate::action::Action;
use crate::config::SystemConfig;
use crate::context::Context;
use crate::error::Result;
use crate::state::SystemState;

/// Contract state, host and configuration. Every action runs against
/// copies of the state and host; the copies replace the originals only
/// when the action succeeds, so a failed action leaves no trace.
#[derive(Debug, Clone)]
pub struct SystemContract<H: Host + Clone> {
    state: SystemState,
    host: H,
    config: SystemConfig,
}

impl<H: Host + Clone> SystemContract<H> {
    pub fn new(host: H, config: SystemConfig) -> Self {
        Self::with_state(SystemState::new(), host, config)
    }

    /// Resume from a previously saved state
    pub fn with_state(state: SystemState, host: H, config: SystemConfig) -> Self {
        Self {
            state,
            host,
            config,
        }
    }

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Direct host access for clock control and token setup
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn into_parts(self) -> (SystemState, H) {
        (self.state, self.host)
    }

    /// Run `f` atomically against the contract
    pub fn transact<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Context<'_, H>) -> Result<T>,
    {
        let mut state = self.state.clone();
        let mut host = self.host.clone();
        let out = f(&mut Context::new(&mut state, &mut host, &self.config))?;
        self.state = state;
        self.host = host;
        Ok(out)
    }

    pub fn apply(&mut self, action: &Action) -> Result<()> {
        debug!("apply {}", action.name());
        self.transact(|ctx| ctx.dispatch(action))
    }

    /// Execute every deferred action that is due. Either all of them take
    /// effect or none does; a failure here means the state is inconsistent.
    pub fn run_deferred(&mut self) -> Result<usize> {
        let result = self.transact(|ctx| {
            let now = ctx.now();
            let due = ctx.host.take_due(now);
            for deferred in &due {
                ctx.run_deferred_action(deferred)?;
            }
            Ok(due.len())
        });
        if let Err(e) = &result {
            warn!("deferred execution failed: {}", e);
        }
        result
    }
}
