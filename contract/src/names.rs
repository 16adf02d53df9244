//! Name bidding and account creation

use log::info;

use sys_core::constants::SYSTEM_ACCOUNT;
use sys_core::{Asset, Host, Name, ResourceLimit};

use crate::context::Context;
use crate::error::Result;
use crate::records::UserResources;

impl<'a, H: Host> Context<'a, H> {
    pub fn bid_name(&mut self, bidder: Name, newname: Name, bid: Asset) -> Result<()> {
        let core = self.core_symbol()?;
        let now = self.now();
        self.state.auction.bid(
            &mut self.state.global,
            &self.config.auction,
            &mut *self.host,
            now,
            bidder,
            newname,
            bid,
            core,
        )?;
        Ok(())
    }

    pub fn refund_bid(&mut self, bidder: Name, newname: Name) -> Result<Asset> {
        Ok(self.state.auction.refund_bid(&mut *self.host, bidder, newname)?)
    }

    /// Create `newname` on behalf of `creator`. Names won at auction and
    /// dotted names are checked against the auction unless the system
    /// account creates them.
    pub fn new_account(&mut self, creator: Name, newname: Name) -> Result<()> {
        let core = self.core_symbol()?;
        if creator != SYSTEM_ACCOUNT {
            self.state.auction.claim_name(creator, newname)?;
        }

        self.host.create_account(newname)?;
        self.state.resources.upsert(UserResources::new(newname, core));
        self.host
            .set_resource_limits(newname, ResourceLimit::new(0, 0, 0))?;

        info!("{} created account {}", creator, newname);
        Ok(())
    }
}
