//! Protocol constants

use crate::asset::Symbol;
use crate::name::Name;

pub const USECONDS_PER_SECOND: i64 = 1_000_000;
pub const SECONDS_PER_DAY: i64 = 24 * 3600;
pub const SECONDS_PER_HOUR: i64 = 3600;
/// A protocol year is 52 weeks
pub const SECONDS_PER_YEAR: i64 = 52 * 7 * SECONDS_PER_DAY;
pub const USECONDS_PER_DAY: i64 = SECONDS_PER_DAY * USECONDS_PER_SECOND;
pub const USECONDS_PER_YEAR: i64 = SECONDS_PER_YEAR * USECONDS_PER_SECOND;

/// Half-second block slots in one day
pub const BLOCKS_PER_DAY: u32 = 2 * 24 * 3600;

/// Slots between producer schedule re-elections
pub const SCHEDULE_UPDATE_INTERVAL_SLOTS: u32 = 120;

/// RAM granted to every account on top of purchased bytes
pub const RAM_GIFT_BYTES: i64 = 1400;

/// Stake lock-up before undelegated funds may be claimed (two weeks)
pub const REFUND_DELAY_SEC: i64 = 14 * SECONDS_PER_DAY;

/// Activation threshold: 15% of the initial supply
pub const MIN_ACTIVATED_STAKE: i64 = 25_090_624_0000;

/// Per-vote payouts below this are left in the bucket
pub const MIN_PERVOTE_DAILY_PAY: i64 = 100_0000;

/// Default RAM supply: 64 GiB
pub const DEFAULT_MAX_RAM_SIZE: u64 = 64 * 1024 * 1024 * 1024;

/// Hard ceiling for the RAM supply: 1 PiB
pub const MAX_RAM_SIZE_CEILING: u64 = 1024 * 1024 * 1024 * 1024 * 1024;

pub const SYSTEM_ACCOUNT: Name = Name::constant("sys");
pub const TOKEN_ACCOUNT: Name = Name::constant("sys.token");
pub const RAM_ACCOUNT: Name = Name::constant("sys.ram");
pub const RAMFEE_ACCOUNT: Name = Name::constant("sys.ramfee");
pub const STAKE_ACCOUNT: Name = Name::constant("sys.stake");
pub const BPAY_ACCOUNT: Name = Name::constant("sys.bpay");
pub const VPAY_ACCOUNT: Name = Name::constant("sys.vpay");
pub const NAMES_ACCOUNT: Name = Name::constant("sys.names");
pub const SAVING_ACCOUNT: Name = Name::constant("sys.saving");

/// System accounts that hold core tokens
pub const SYSTEM_TOKEN_HOLDERS: [Name; 7] = [
    RAM_ACCOUNT,
    RAMFEE_ACCOUNT,
    STAKE_ACCOUNT,
    BPAY_ACCOUNT,
    VPAY_ACCOUNT,
    NAMES_ACCOUNT,
    SAVING_ACCOUNT,
];

/// Balancing token of the RAM market
pub const RAMCORE_SYMBOL: Symbol = Symbol::from_parts(b"RAMCORE", 4);

/// Storage resource unit (bytes)
pub const RAM_SYMBOL: Symbol = Symbol::from_parts(b"RAM", 0);
