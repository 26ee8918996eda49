//! Domain finding flags packed into a single integer.
//!
//! The scanner writes one bitmask per domain node. Each finding owns a
//! disjoint power-of-two bit; new findings must take a fresh bit.

pub mod presentation;

use serde::{Deserialize, Serialize};

pub use presentation::{Badge, BadgeTone, DomainDetails, TakeoverIndication, TakeoverPlatform};

pub const HAS_EXPIRED: u64 = 1;
pub const IS_RECENT: u64 = 2;
pub const POSSIBLE_TAKEOVER: u64 = 4;

/// True iff any bit of `flag` is set in `mask`.
pub fn check_flag(mask: u64, flag: u64) -> bool {
    (mask & flag) != 0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainFlag {
    HasExpired,
    IsRecent,
    PossibleTakeover,
}

impl DomainFlag {
    pub const ALL: [DomainFlag; 3] = [
        DomainFlag::HasExpired,
        DomainFlag::IsRecent,
        DomainFlag::PossibleTakeover,
    ];

    pub const fn bit(self) -> u64 {
        match self {
            DomainFlag::HasExpired => HAS_EXPIRED,
            DomainFlag::IsRecent => IS_RECENT,
            DomainFlag::PossibleTakeover => POSSIBLE_TAKEOVER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DomainFlag::HasExpired => "HAS_EXPIRED",
            DomainFlag::IsRecent => "IS_RECENT",
            DomainFlag::PossibleTakeover => "POSSIBLE_TAKEOVER",
        }
    }
}

impl std::fmt::Display for DomainFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Wire-compatible bitset over [`DomainFlag`]. Serializes as the raw integer,
/// unknown bits included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainFlags(u64);

impl DomainFlags {
    pub const EMPTY: DomainFlags = DomainFlags(0);

    pub const fn from_bits(bits: u64) -> Self {
        DomainFlags(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub fn contains(self, flag: DomainFlag) -> bool {
        check_flag(self.0, flag.bit())
    }

    pub fn with(self, flag: DomainFlag) -> Self {
        DomainFlags(self.0 | flag.bit())
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn has_expired(self) -> bool {
        self.contains(DomainFlag::HasExpired)
    }

    pub fn is_recent(self) -> bool {
        self.contains(DomainFlag::IsRecent)
    }

    pub fn possible_takeover(self) -> bool {
        self.contains(DomainFlag::PossibleTakeover)
    }

    /// Known flags that are set, in bit order.
    pub fn iter(self) -> impl Iterator<Item = DomainFlag> {
        DomainFlag::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl From<u64> for DomainFlags {
    fn from(bits: u64) -> Self {
        DomainFlags(bits)
    }
}

impl FromIterator<DomainFlag> for DomainFlags {
    fn from_iter<I: IntoIterator<Item = DomainFlag>>(iter: I) -> Self {
        iter.into_iter().fold(DomainFlags::EMPTY, DomainFlags::with)
    }
}
