//! Producer registration and voting actions

use sys_core::{Host, Name};

use crate::context::Context;
use crate::error::Result;

impl<'a, H: Host> Context<'a, H> {
    pub fn register_producer(
        &mut self,
        producer: Name,
        producer_key: &str,
        url: &str,
        location: u16,
    ) -> Result<()> {
        let now = self.now();
        self.state.voting.register_producer(
            &mut self.state.global,
            now,
            producer,
            producer_key,
            url,
            location,
        )?;
        Ok(())
    }

    pub fn unregister_producer(&mut self, producer: Name) -> Result<()> {
        self.state.voting.deactivate_producer(producer)?;
        Ok(())
    }

    /// Privileged counterpart of `unregister_producer`
    pub fn remove_producer(&mut self, producer: Name) -> Result<()> {
        self.state.voting.deactivate_producer(producer)?;
        Ok(())
    }

    /// Vote for `producers` directly or through `proxy`
    pub fn vote(&mut self, voter: Name, proxy: Option<Name>, producers: &[Name]) -> Result<()> {
        self.require_initialized()?;
        let now = self.now();
        self.state.voting.update_votes(
            &mut self.state.global,
            &self.config.voting,
            now,
            voter,
            proxy,
            producers,
            true,
        )?;
        Ok(())
    }

    pub fn register_proxy(&mut self, proxy: Name, is_proxy: bool) -> Result<()> {
        let now = self.now();
        self.state.voting.register_proxy(
            &mut self.state.global,
            &self.config.voting,
            now,
            proxy,
            is_proxy,
        )?;
        Ok(())
    }
}
