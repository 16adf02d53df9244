//! Account names
//!
//! A name packs up to 13 characters from the alphabet `.12345a-z` into a
//! `u64`: five bits per character for the first twelve, four bits for the
//! thirteenth. Ordering follows the packed value, which is also the table
//! primary-key order.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::NameError;

const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

/// Maximum number of characters in a name
pub const MAX_NAME_LENGTH: usize = 13;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(u64);

const fn char_to_value(c: u8) -> u64 {
    match c {
        b'a'..=b'z' => (c - b'a') as u64 + 6,
        b'1'..=b'5' => (c - b'1') as u64 + 1,
        _ => 0,
    }
}

impl Name {
    /// Build a name from a literal. Characters outside the alphabet encode
    /// as `.`; use `FromStr` for untrusted input.
    pub const fn constant(s: &str) -> Name {
        let bytes = s.as_bytes();
        let mut value = 0u64;
        let mut i = 0;
        while i < bytes.len() && i < MAX_NAME_LENGTH {
            let c = char_to_value(bytes[i]);
            if i < 12 {
                value |= (c & 0x1f) << (64 - 5 * (i + 1));
            } else {
                value |= c & 0x0f;
            }
            i += 1;
        }
        Name(value)
    }

    pub const fn from_raw(value: u64) -> Self {
        Name(value)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of characters up to and including the last non-dot character
    pub fn length(&self) -> usize {
        const MASK: u64 = 0xF800_0000_0000_0000;
        if self.0 == 0 {
            return 0;
        }
        let mut len = 0;
        let mut v = self.0;
        for i in 0..MAX_NAME_LENGTH {
            if v & MASK > 0 {
                len = i;
            }
            v <<= 5;
        }
        len + 1
    }

    /// The part after the last dot, or the name itself when it has none
    pub fn suffix(&self) -> Name {
        let s = self.to_string();
        match s.rfind('.') {
            Some(pos) => Name::constant(&s[pos + 1..]),
            None => *self,
        }
    }

    /// True when the twelve leading characters contain a dot, which also
    /// covers every name shorter than twelve characters.
    pub fn has_dot_in_prefix(&self) -> bool {
        let mut tmp = self.0 >> 4;
        for _ in 0..12 {
            if tmp & 0x1f == 0 {
                return true;
            }
            tmp >>= 5;
        }
        false
    }

    /// True when the thirteenth character is set
    pub fn has_thirteenth_char(&self) -> bool {
        self.0 & 0x0f != 0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = [b'.'; MAX_NAME_LENGTH];
        let mut tmp = self.0;
        for i in 0..MAX_NAME_LENGTH {
            let (mask, shift) = if i == 0 { (0x0f, 4) } else { (0x1f, 5) };
            out[12 - i] = CHARMAP[(tmp & mask) as usize];
            tmp >>= shift;
        }
        let end = out
            .iter()
            .rposition(|c| *c != b'.')
            .map(|p| p + 1)
            .unwrap_or(0);
        f.write_str(std::str::from_utf8(&out[..end]).map_err(|_| fmt::Error)?)
    }
}

impl FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > MAX_NAME_LENGTH {
            return Err(NameError::TooLong(s.to_string()));
        }
        for (i, c) in s.bytes().enumerate() {
            let valid = match i {
                12 => matches!(c, b'.' | b'1'..=b'5' | b'a'..=b'j'),
                _ => matches!(c, b'.' | b'1'..=b'5' | b'a'..=b'z'),
            };
            if !valid {
                return Err(NameError::InvalidCharacter {
                    name: s.to_string(),
                    position: i,
                });
            }
        }
        Ok(Name::constant(s))
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
