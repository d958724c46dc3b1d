//! Arbitrary precision amounts for balances, fees, nonces and payments.
//!
//! On the wire every amount is an unsigned 64-bit integer, but wallet balances may
//! go negative through the configured exception table, and sums of many amounts must
//! not silently wrap. `BigNumber` wraps a signed big integer and converts to the wire
//! width only at the codec boundary.

use crate::TypesError;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Signed arbitrary precision integer, serialized as a decimal string.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BigNumber(BigInt);

impl BigNumber {
    pub fn zero() -> Self {
        Self(BigInt::zero())
    }

    pub fn one() -> Self {
        Self(BigInt::from(1u8))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Narrow to the 64-bit unsigned wire representation.
    pub fn to_u64(&self) -> Result<u64, TypesError> {
        self.0
            .to_u64()
            .ok_or_else(|| TypesError::OutOfRange(self.0.to_string()))
    }

    /// Narrow to the 64-bit signed representation used by the legacy byte form.
    pub fn to_i64(&self) -> Result<i64, TypesError> {
        self.0
            .to_i64()
            .ok_or_else(|| TypesError::OutOfRange(self.0.to_string()))
    }

    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }
}

impl From<u64> for BigNumber {
    fn from(v: u64) -> Self {
        Self(BigInt::from(v))
    }
}

impl From<u32> for BigNumber {
    fn from(v: u32) -> Self {
        Self(BigInt::from(v))
    }
}

impl From<i64> for BigNumber {
    fn from(v: i64) -> Self {
        Self(BigInt::from(v))
    }
}

impl From<usize> for BigNumber {
    fn from(v: usize) -> Self {
        Self(BigInt::from(v))
    }
}

impl From<BigInt> for BigNumber {
    fn from(v: BigInt) -> Self {
        Self(v)
    }
}

impl FromStr for BigNumber {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigInt::from_str(s.trim())
            .map(Self)
            .map_err(|_| TypesError::InvalidNumber(s.to_string()))
    }
}

impl fmt::Display for BigNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for BigNumber {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a BigNumber> for &'a BigNumber {
    type Output = BigNumber;
    fn add(self, rhs: &'a BigNumber) -> BigNumber {
        BigNumber(&self.0 + &rhs.0)
    }
}

impl Sub for BigNumber {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl<'a> Sub<&'a BigNumber> for &'a BigNumber {
    type Output = BigNumber;
    fn sub(self, rhs: &'a BigNumber) -> BigNumber {
        BigNumber(&self.0 - &rhs.0)
    }
}

impl Mul for BigNumber {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Neg for BigNumber {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl AddAssign<&BigNumber> for BigNumber {
    fn add_assign(&mut self, rhs: &BigNumber) {
        self.0 += &rhs.0;
    }
}

impl SubAssign<&BigNumber> for BigNumber {
    fn sub_assign(&mut self, rhs: &BigNumber) {
        self.0 -= &rhs.0;
    }
}

impl Sum for BigNumber {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, v| acc + v)
    }
}

impl<'a> Sum<&'a BigNumber> for BigNumber {
    fn sum<I: Iterator<Item = &'a BigNumber>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, v| &acc + v)
    }
}

impl Serialize for BigNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BigNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NumberVisitor;

        impl<'de> serde::de::Visitor<'de> for NumberVisitor {
            type Value = BigNumber;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "an integer or a decimal string")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(BigNumber::from(v))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(BigNumber::from(v))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_goes_below_zero() {
        let balance = BigNumber::from(100u64);
        let spent = &balance - &BigNumber::from(250u64);
        assert!(spent.is_negative());
        assert_eq!(spent.to_string(), "-150");
        assert!(spent.to_u64().is_err());
    }

    #[test]
    fn parses_decimal_strings() {
        let n: BigNumber = "18446744073709551616".parse().unwrap();
        assert!(n.to_u64().is_err());
        assert_eq!(n.to_string(), "18446744073709551616");
        assert!("12a".parse::<BigNumber>().is_err());
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let a: BigNumber = serde_json::from_str("10000").unwrap();
        let b: BigNumber = serde_json::from_str("\"10000\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"10000\"");
    }

    #[test]
    fn sums_references() {
        let values = [BigNumber::from(1u64), BigNumber::from(2u64), BigNumber::from(3u64)];
        let total: BigNumber = values.iter().sum();
        assert_eq!(total, BigNumber::from(6u64));
    }
}
