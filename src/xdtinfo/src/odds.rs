//! Exact drop probabilities
//!
//! Drop chances are chained across several container levels with factors as
//! small as 1/10000, so every probability is kept as an arbitrary-precision
//! rational and only turned into `f64` when serialized.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

/// An exact probability
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Odds(BigRational);

impl Odds {
    pub fn zero() -> Self {
        Self(BigRational::zero())
    }

    pub fn one() -> Self {
        Self(BigRational::one())
    }

    /// `num / den`, or `None` for a zero denominator
    pub fn checked(num: i64, den: i64) -> Option<Self> {
        (den != 0).then(|| Self(BigRational::new(BigInt::from(num), BigInt::from(den))))
    }

    /// `num / den`, substituting zero when the denominator is zero
    pub fn ratio_or_zero(num: i64, den: i64) -> Self {
        Self::checked(num, den).unwrap_or_else(Self::zero)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn as_ratio(&self) -> &BigRational {
        &self.0
    }

    /// Nearest `f64`; only meant for display and export.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }
}

impl Default for Odds {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<BigRational> for Odds {
    fn from(ratio: BigRational) -> Self {
        Self(ratio)
    }
}

/// Renders like a fraction literal: `"3/40"`, or `"1"` for whole numbers.
impl fmt::Display for Odds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.denom().is_one() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

impl Serialize for Odds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Odds", 2)?;
        state.serialize_field("exact", &self.to_string())?;
        state.serialize_field("probability", &self.to_f64())?;
        state.end()
    }
}

impl Mul for Odds {
    type Output = Odds;

    fn mul(self, rhs: Odds) -> Odds {
        Odds(self.0 * rhs.0)
    }
}

impl<'a> Mul<&'a Odds> for &'a Odds {
    type Output = Odds;

    fn mul(self, rhs: &'a Odds) -> Odds {
        Odds(&self.0 * &rhs.0)
    }
}

impl Add for Odds {
    type Output = Odds;

    fn add(self, rhs: Odds) -> Odds {
        Odds(self.0 + rhs.0)
    }
}

impl AddAssign<&Odds> for Odds {
    fn add_assign(&mut self, rhs: &Odds) {
        self.0 += &rhs.0;
    }
}

impl Sum for Odds {
    fn sum<I: Iterator<Item = Odds>>(iter: I) -> Odds {
        iter.fold(Odds::zero(), |acc, o| acc + o)
    }
}

impl<'a> Sum<&'a Odds> for Odds {
    fn sum<I: Iterator<Item = &'a Odds>>(iter: I) -> Odds {
        iter.fold(Odds::zero(), |mut acc, o| {
            acc += o;
            acc
        })
    }
}

/// Per-gender probabilities; item sets filter candidates by gender, so a
/// boy and a girl opening the same crate see different odds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GenderedOdds {
    pub male: Odds,
    pub female: Odds,
}

impl GenderedOdds {
    pub fn new(male: Odds, female: Odds) -> Self {
        Self { male, female }
    }

    pub fn uniform(odds: Odds) -> Self {
        Self {
            male: odds.clone(),
            female: odds,
        }
    }

    pub fn one() -> Self {
        Self::uniform(Odds::one())
    }

    /// Component-wise product
    pub fn scale(&self, other: &GenderedOdds) -> GenderedOdds {
        GenderedOdds {
            male: &self.male * &other.male,
            female: &self.female * &other.female,
        }
    }
}

impl Add for GenderedOdds {
    type Output = GenderedOdds;

    fn add(self, rhs: GenderedOdds) -> GenderedOdds {
        GenderedOdds {
            male: self.male + rhs.male,
            female: self.female + rhs.female,
        }
    }
}

impl Sum for GenderedOdds {
    fn sum<I: Iterator<Item = GenderedOdds>>(iter: I) -> GenderedOdds {
        iter.fold(GenderedOdds::uniform(Odds::zero()), |acc, o| acc + o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_display_matches_fraction_literals() {
        assert_eq!(Odds::ratio_or_zero(2, 4).to_string(), "1/2");
        assert_eq!(Odds::ratio_or_zero(5, 5).to_string(), "1");
        assert_eq!(Odds::zero().to_string(), "0");
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(Odds::checked(1, 0), None);
        assert!(Odds::ratio_or_zero(1, 0).is_zero());
    }

    #[test]
    fn test_deep_chain_stays_exact() {
        let chain = [
            Odds::ratio_or_zero(1, 10_000),
            Odds::ratio_or_zero(3, 7),
            Odds::ratio_or_zero(1, 3),
            Odds::ratio_or_zero(9, 11),
        ];
        let product = chain.iter().cloned().fold(Odds::one(), |acc, o| acc * o);
        assert_eq!(product, Odds::ratio_or_zero(27, 2_310_000));

        let expected = 27.0 / 2_310_000.0;
        assert!((product.to_f64() - expected).abs() <= f64::EPSILON * expected);
    }

    #[test]
    fn test_serializes_exact_and_float() {
        let json = serde_json::to_value(Odds::ratio_or_zero(1, 4)).unwrap();
        assert_eq!(json["exact"], "1/4");
        assert_eq!(json["probability"], 0.25);
    }

    #[test]
    fn test_gendered_scale() {
        let a = GenderedOdds::new(Odds::ratio_or_zero(1, 2), Odds::zero());
        let b = GenderedOdds::uniform(Odds::ratio_or_zero(1, 3));
        let c = a.scale(&b);
        assert_eq!(c.male, Odds::ratio_or_zero(1, 6));
        assert!(c.female.is_zero());
    }

    proptest! {
        #[test]
        fn prop_sum_is_order_independent(
            parts in proptest::collection::vec((0i64..1000, 1i64..1000), 1..12)
        ) {
            let odds: Vec<Odds> = parts.iter().map(|&(n, d)| Odds::ratio_or_zero(n, d)).collect();
            let forward: Odds = odds.iter().sum();
            let backward: Odds = odds.iter().rev().sum();
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn prop_float_rendering_matches_exact(n in 0i64..10_000, d in 1i64..10_000) {
            let odds = Odds::ratio_or_zero(n, d);
            let expected = n as f64 / d as f64;
            prop_assert!((odds.to_f64() - expected).abs() <= f64::EPSILON * expected.max(1.0));
        }
    }
}
