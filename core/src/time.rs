//! Time points and block timestamps

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::USECONDS_PER_SECOND;

/// Block timestamps count half-second slots from this point (ms since Unix epoch)
pub const BLOCK_TIMESTAMP_EPOCH_MS: i64 = 946_684_800_000;

/// Milliseconds per block slot
pub const BLOCK_INTERVAL_MS: i64 = 500;

/// Microseconds since the Unix epoch. Zero means "never".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimePoint(i64);

impl TimePoint {
    pub const fn from_micros(micros: i64) -> Self {
        TimePoint(micros)
    }

    pub const fn from_secs(secs: i64) -> Self {
        TimePoint(secs * USECONDS_PER_SECOND)
    }

    pub const fn micros(&self) -> i64 {
        self.0
    }

    pub const fn sec_since_epoch(&self) -> i64 {
        self.0 / USECONDS_PER_SECOND
    }

    pub const fn is_set(&self) -> bool {
        self.0 != 0
    }

    pub const fn add_micros(&self, micros: i64) -> Self {
        TimePoint(self.0.saturating_add(micros))
    }

    pub const fn add_secs(&self, secs: i64) -> Self {
        self.add_micros(secs.saturating_mul(USECONDS_PER_SECOND))
    }

    /// Signed distance from `earlier` to `self`
    pub const fn micros_since(&self, earlier: TimePoint) -> i64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::from_timestamp_micros(self.0) {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3f")),
            None => write!(f, "{}us", self.0),
        }
    }
}

/// Half-second slot count since 2000-01-01T00:00:00Z
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockTimestamp {
    pub slot: u32,
}

impl BlockTimestamp {
    pub const fn from_slot(slot: u32) -> Self {
        Self { slot }
    }

    pub fn to_time_point(&self) -> TimePoint {
        let ms = self.slot as i64 * BLOCK_INTERVAL_MS + BLOCK_TIMESTAMP_EPOCH_MS;
        TimePoint::from_micros(ms * 1000)
    }

    /// Slots elapsed from `earlier`, zero when `earlier` is later
    pub fn slots_since(&self, earlier: BlockTimestamp) -> u32 {
        self.slot.saturating_sub(earlier.slot)
    }
}

impl From<TimePoint> for BlockTimestamp {
    fn from(tp: TimePoint) -> Self {
        let ms = tp.micros() / 1000 - BLOCK_TIMESTAMP_EPOCH_MS;
        let slot = (ms / BLOCK_INTERVAL_MS).clamp(0, u32::MAX as i64);
        BlockTimestamp { slot: slot as u32 }
    }
}

impl fmt::Display for BlockTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_time_point())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_timestamp_epoch() {
        let epoch = TimePoint::from_secs(946_684_800);
        assert_eq!(BlockTimestamp::from(epoch).slot, 0);
        assert_eq!(BlockTimestamp::from(epoch.add_secs(60)).slot, 120);
        assert_eq!(BlockTimestamp::from_slot(120).to_time_point(), epoch.add_secs(60));
        assert_eq!(BlockTimestamp::from(TimePoint::default()).slot, 0);
    }

    #[test]
    fn test_time_point_arithmetic() {
        let t = TimePoint::from_secs(100);
        assert_eq!(t.add_secs(5).sec_since_epoch(), 105);
        assert_eq!(t.add_secs(5).micros_since(t), 5_000_000);
        assert!(!TimePoint::default().is_set());
        assert!(t.is_set());
    }

    #[test]
    fn test_display() {
        let t = TimePoint::from_secs(946_684_800);
        assert_eq!(t.to_string(), "2000-01-01T00:00:00.000");
    }
}
