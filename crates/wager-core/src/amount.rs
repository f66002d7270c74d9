//! # Amounts
//!
//! [`Amount`] counts the smallest unit of the staked asset. The protocol
//! never interprets decimals: a wager of "1 unit" at six decimals is
//! `Amount::new(1_000_000)`.
//!
//! Fee math uses integer basis points and rounds down, so the fee taken
//! from a payout is never more than the configured fraction.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// 100% expressed in basis points.
pub const BASIS_POINTS_DENOMINATOR: u32 = 10_000;

/// A non-negative quantity of base units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Wrap a raw base-unit count.
    pub const fn new(units: u64) -> Self {
        Self(units)
    }

    /// The raw base-unit count.
    pub const fn units(&self) -> u64 {
        self.0
    }

    /// Whether this amount is zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    pub fn checked_add(self, other: Amount) -> Result<Amount, ValidationError> {
        self.0.checked_add(other.0).map(Amount).ok_or_else(|| {
            ValidationError::AmountOutOfRange(format!("{} + {} overflows", self.0, other.0))
        })
    }

    /// Checked subtraction.
    pub fn checked_sub(self, other: Amount) -> Result<Amount, ValidationError> {
        self.0.checked_sub(other.0).map(Amount).ok_or_else(|| {
            ValidationError::AmountOutOfRange(format!("{} - {} underflows", self.0, other.0))
        })
    }

    /// `floor(self * bps / 10000)`.
    ///
    /// Computed in 128-bit space so it cannot overflow for any `u64` amount.
    pub fn basis_points(self, bps: u32) -> Result<Amount, ValidationError> {
        if bps > BASIS_POINTS_DENOMINATOR {
            return Err(ValidationError::BasisPointsOutOfRange(bps));
        }
        let scaled = u128::from(self.0) * u128::from(bps) / u128::from(BASIS_POINTS_DENOMINATOR);
        // scaled <= self.0 because bps <= denominator.
        Ok(Amount(scaled as u64))
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Self(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_add_and_sub() {
        let a = Amount::new(7);
        let b = Amount::new(5);
        assert_eq!(a.checked_add(b).unwrap(), Amount::new(12));
        assert_eq!(a.checked_sub(b).unwrap(), Amount::new(2));
        assert!(b.checked_sub(a).is_err());
        assert!(Amount::new(u64::MAX).checked_add(Amount::new(1)).is_err());
    }

    #[test]
    fn five_percent_of_ten_units() {
        // 10 units at 6 decimals, 500 bps => 0.5 units.
        let pot = Amount::new(10_000_000);
        assert_eq!(pot.basis_points(500).unwrap(), Amount::new(500_000));
    }

    #[test]
    fn basis_points_round_down() {
        assert_eq!(Amount::new(199).basis_points(50).unwrap(), Amount::new(0));
        assert_eq!(Amount::new(201).basis_points(50).unwrap(), Amount::new(1));
    }

    #[test]
    fn basis_points_full_and_zero() {
        let a = Amount::new(12345);
        assert_eq!(a.basis_points(10_000).unwrap(), a);
        assert_eq!(a.basis_points(0).unwrap(), Amount::ZERO);
    }

    #[test]
    fn basis_points_reject_above_denominator() {
        assert!(matches!(
            Amount::new(1).basis_points(10_001),
            Err(ValidationError::BasisPointsOutOfRange(10_001))
        ));
    }

    #[test]
    fn basis_points_do_not_overflow_at_max() {
        let fee = Amount::new(u64::MAX).basis_points(9_999).unwrap();
        assert!(fee < Amount::new(u64::MAX));
    }

    #[test]
    fn serializes_as_bare_integer() {
        assert_eq!(serde_json::to_string(&Amount::new(42)).unwrap(), "42");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Fee plus remainder always reconstitutes the original amount.
            #[test]
            fn fee_split_conserves(units in any::<u64>(), bps in 0u32..=10_000) {
                let total = Amount::new(units);
                let fee = total.basis_points(bps).unwrap();
                let rest = total.checked_sub(fee).unwrap();
                prop_assert_eq!(fee.checked_add(rest).unwrap(), total);
            }
        }
    }
}
