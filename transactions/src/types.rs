//! Transaction type identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace of transaction types. `1` is the core group; custom groups start
/// at [`TypeGroup::RESERVED`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeGroup(pub u32);

impl TypeGroup {
    pub const TEST: Self = Self(0);
    pub const CORE: Self = Self(1);
    pub const RESERVED: Self = Self(1000);

    pub fn is_core(self) -> bool {
        self == Self::CORE
    }
}

impl Default for TypeGroup {
    fn default() -> Self {
        Self::CORE
    }
}

impl fmt::Display for TypeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The eleven built-in types of the core group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CoreType {
    Transfer = 0,
    SecondSignature = 1,
    DelegateRegistration = 2,
    Vote = 3,
    MultiSignature = 4,
    Ipfs = 5,
    MultiPayment = 6,
    DelegateResignation = 7,
    HtlcLock = 8,
    HtlcClaim = 9,
    HtlcRefund = 10,
}

impl CoreType {
    pub const ALL: [CoreType; 11] = [
        Self::Transfer,
        Self::SecondSignature,
        Self::DelegateRegistration,
        Self::Vote,
        Self::MultiSignature,
        Self::Ipfs,
        Self::MultiPayment,
        Self::DelegateResignation,
        Self::HtlcLock,
        Self::HtlcClaim,
        Self::HtlcRefund,
    ];

    pub fn from_u16(value: u16) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Key used in the static fee table and in log output.
    pub fn key(self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::SecondSignature => "secondSignature",
            Self::DelegateRegistration => "delegateRegistration",
            Self::Vote => "vote",
            Self::MultiSignature => "multiSignature",
            Self::Ipfs => "ipfs",
            Self::MultiPayment => "multiPayment",
            Self::DelegateResignation => "delegateResignation",
            Self::HtlcLock => "htlcLock",
            Self::HtlcClaim => "htlcClaim",
            Self::HtlcRefund => "htlcRefund",
        }
    }
}

/// Full identity of a registered transaction structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeKey {
    pub type_group: TypeGroup,
    pub type_id: u16,
    pub version: u8,
}

impl TypeKey {
    pub fn new(type_group: TypeGroup, type_id: u16, version: u8) -> Self {
        Self { type_group, type_id, version }
    }

    pub fn core(core: CoreType, version: u8) -> Self {
        Self::new(TypeGroup::CORE, core.as_u16(), version)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/v{}", self.type_group, self.type_id, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_type_ids_are_stable() {
        assert_eq!(CoreType::Transfer.as_u16(), 0);
        assert_eq!(CoreType::HtlcRefund.as_u16(), 10);
        for core in CoreType::ALL {
            assert_eq!(CoreType::from_u16(core.as_u16()), Some(core));
        }
        assert_eq!(CoreType::from_u16(11), None);
    }

    #[test]
    fn type_group_defaults_to_core() {
        assert_eq!(TypeGroup::default(), TypeGroup::CORE);
        assert!(!TypeGroup::RESERVED.is_core());
    }
}
