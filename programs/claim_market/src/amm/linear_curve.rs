//! # Linear Probability Curve
//!
//! This module implements pricing for binary claim markets where the
//! market-implied probability of a side is its share of all units sold:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │         P(side) = sold_side / (sold_yes + sold_no)          │
//! │                                                              │
//! │   Where:                                                     │
//! │   • sold = supply - reserve (units not held by the market)  │
//! │   • P(yes) + P(no) = 1                                      │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bootstrap-locked units count as sold, so a fresh market already quotes
//! its configured initial probability before the first trade.
//!
//! ## Trade Pricing
//!
//! A trade moves `sold_side` and `sold_total` together, so the curve is
//! sampled before and after the trade and the two probabilities averaged:
//!
//! ```text
//! cost = unit_value × quantity × (P_before + P_after) / 2
//! ```
//!
//! The sold fraction along a buy path is concave in the traded quantity,
//! which gives the curve its volume discount: one large buy never costs
//! more than the same units bought across sequential smaller calls, and
//! the per-unit cost of a buy always lands between the pre-trade and
//! post-trade unit price. Selling walks the same interval in reverse, so
//! a buy immediately unwound returns at most what it cost.
//!
//! All divisions truncate. Probabilities are fixed-point with [`SCALE`].

use anchor_lang::prelude::*;

/// Errors specific to the linear probability curve
#[error_code]
pub enum CurveError {
    #[msg("No units sold on either side")]
    NothingSold,
    #[msg("Reserve cannot cover the requested quantity")]
    InsufficientLiquidity,
    #[msg("Quantity exceeds units sold")]
    ExcessiveQuantity,
    #[msg("Quantity must be greater than zero")]
    ZeroQuantity,
    #[msg("Reserve exceeds supply")]
    InvalidReserve,
    #[msg("Arithmetic overflow")]
    Overflow,
}

/// Fixed-point scale for probabilities: 1.0 == 10^18
pub const SCALE: u128 = 1_000_000_000_000_000_000;

/// Linear probability curve with trapezoidal trade pricing
///
/// Prices every quote from `(supply, reserve_side, reserve_other)` as read
/// off the claim ledger; the curve itself holds no state.
pub struct LinearCurve;

impl LinearCurve {
    /// Market-implied probability of a side, scaled by [`SCALE`].
    ///
    /// Callers must guarantee at least the bootstrap-locked units have
    /// been sold; `sold_total == 0` is an error, not a 50% default.
    pub fn probability(sold_side: u64, sold_total: u64) -> Result<u128> {
        require!(sold_total > 0, CurveError::NothingSold);
        Ok((sold_side as u128)
            .checked_mul(SCALE)
            .ok_or(CurveError::Overflow)?
            / sold_total as u128)
    }

    /// Currency cost of buying `quantity` units of one side.
    ///
    /// # Arguments
    /// * `unit_value` - collateral base units per fully-redeemed claim
    /// * `supply` - claim supply (equal on both sides while trading)
    /// * `reserve_side` - market-held units of the side being bought
    /// * `reserve_other` - market-held units of the opposite side
    /// * `quantity` - units requested
    pub fn buy_cost(
        unit_value: u64,
        supply: u64,
        reserve_side: u64,
        reserve_other: u64,
        quantity: u64,
    ) -> Result<u64> {
        require!(quantity > 0, CurveError::ZeroQuantity);
        require!(quantity <= reserve_side, CurveError::InsufficientLiquidity);

        let (sold_side, sold_total) = sold_state(supply, reserve_side, reserve_other)?;

        let sold_side_after = sold_side
            .checked_add(quantity)
            .ok_or(CurveError::Overflow)?;
        let sold_total_after = sold_total
            .checked_add(quantity)
            .ok_or(CurveError::Overflow)?;

        let p_before = Self::probability(sold_side, sold_total)?;
        let p_after = Self::probability(sold_side_after, sold_total_after)?;

        trapezoid_value(unit_value, quantity, p_before, p_after)
    }

    /// Currency owed for selling `quantity` units of one side back to the
    /// market reserve.
    pub fn sell_proceeds(
        unit_value: u64,
        supply: u64,
        reserve_side: u64,
        reserve_other: u64,
        quantity: u64,
    ) -> Result<u64> {
        require!(quantity > 0, CurveError::ZeroQuantity);

        let (sold_side, sold_total) = sold_state(supply, reserve_side, reserve_other)?;

        // A holder can never own more than the circulating (non-locked)
        // units of a side, so a legitimate sell keeps sold_side positive.
        let sold_side_after = sold_side
            .checked_sub(quantity)
            .ok_or(CurveError::ExcessiveQuantity)?;
        let sold_total_after = sold_total
            .checked_sub(quantity)
            .ok_or(CurveError::ExcessiveQuantity)?;

        let p_before = Self::probability(sold_side, sold_total)?;
        let p_after = Self::probability(sold_side_after, sold_total_after)?;

        trapezoid_value(unit_value, quantity, p_before, p_after)
    }
}

/// Sold units of the traded side and of both sides combined.
fn sold_state(supply: u64, reserve_side: u64, reserve_other: u64) -> Result<(u64, u64)> {
    let sold_side = supply
        .checked_sub(reserve_side)
        .ok_or(CurveError::InvalidReserve)?;
    let sold_other = supply
        .checked_sub(reserve_other)
        .ok_or(CurveError::InvalidReserve)?;
    let sold_total = sold_side
        .checked_add(sold_other)
        .ok_or(CurveError::Overflow)?;
    Ok((sold_side, sold_total))
}

/// `unit_value × quantity × avg(p_before, p_after)`, descaled and truncated.
fn trapezoid_value(unit_value: u64, quantity: u64, p_before: u128, p_after: u128) -> Result<u64> {
    // Both probabilities are <= SCALE, so the sum cannot overflow.
    let avg = (p_before + p_after) / 2;

    let value = (quantity as u128)
        .checked_mul(avg)
        .ok_or(CurveError::Overflow)?
        .checked_mul(unit_value as u128)
        .ok_or(CurveError::Overflow)?
        / SCALE;

    u64::try_from(value).map_err(|_| error!(CurveError::Overflow))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Bootstrap state from a 100-unit market created at 60% with a 10%
    // lock fraction: 12 YES and 8 NO locked, reserves 88 / 92.
    const UNIT_VALUE: u64 = 1_000_000;
    const SUPPLY: u64 = 100;
    const YES_RESERVE: u64 = 88;
    const NO_RESERVE: u64 = 92;

    #[test]
    fn test_probability_basic() {
        assert_eq!(
            LinearCurve::probability(12, 20).unwrap(),
            600_000_000_000_000_000
        );
        assert_eq!(LinearCurve::probability(0, 20).unwrap(), 0);
        assert_eq!(LinearCurve::probability(20, 20).unwrap(), SCALE);
    }

    #[test]
    fn test_probability_requires_sales() {
        assert!(LinearCurve::probability(5, 0).is_err());
    }

    #[test]
    fn test_bootstrap_probability_matches_target() {
        // sold = 12 YES / 8 NO before any trade
        let p = LinearCurve::probability(SUPPLY - YES_RESERVE, 20).unwrap();
        assert_eq!(p, 600_000_000_000_000_000); // exactly 60%
    }

    #[test]
    fn test_buy_cost_concrete() {
        // Buy 10 YES: P moves 12/20 -> 22/30, average 2/3.
        let cost =
            LinearCurve::buy_cost(UNIT_VALUE, SUPPLY, YES_RESERVE, NO_RESERVE, 10).unwrap();
        assert_eq!(cost, 6_666_666);
    }

    #[test]
    fn test_sell_proceeds_concrete() {
        // Unwind of the 10-unit buy above: same interval, walked backwards.
        let proceeds =
            LinearCurve::sell_proceeds(UNIT_VALUE, SUPPLY, YES_RESERVE - 10, NO_RESERVE, 10)
                .unwrap();
        assert_eq!(proceeds, 6_666_666);
    }

    #[test]
    fn test_round_trip_never_profits() {
        for quantity in [1u64, 5, 10, 40] {
            let cost =
                LinearCurve::buy_cost(UNIT_VALUE, SUPPLY, YES_RESERVE, NO_RESERVE, quantity)
                    .unwrap();
            let proceeds = LinearCurve::sell_proceeds(
                UNIT_VALUE,
                SUPPLY,
                YES_RESERVE - quantity,
                NO_RESERVE,
                quantity,
            )
            .unwrap();
            assert!(proceeds <= cost);
        }
    }

    #[test]
    fn test_volume_discount() {
        // One 10-unit buy vs a 1-unit buy followed by a 9-unit buy.
        let single =
            LinearCurve::buy_cost(UNIT_VALUE, SUPPLY, YES_RESERVE, NO_RESERVE, 10).unwrap();

        let first =
            LinearCurve::buy_cost(UNIT_VALUE, SUPPLY, YES_RESERVE, NO_RESERVE, 1).unwrap();
        let rest =
            LinearCurve::buy_cost(UNIT_VALUE, SUPPLY, YES_RESERVE - 1, NO_RESERVE, 9).unwrap();

        assert_eq!(first, 609_523);
        assert_eq!(rest, 6_085_714);
        assert!(single <= first + rest);

        // The first unit alone is cheaper than the 10-unit average...
        assert!(first * 10 < single);
        // ...and the average sits below the post-trade marginal price.
        let marginal_after =
            LinearCurve::buy_cost(UNIT_VALUE, SUPPLY, YES_RESERVE - 10, NO_RESERVE, 1).unwrap();
        assert!(single < marginal_after * 10);
    }

    #[test]
    fn test_buy_requires_reserve() {
        assert!(
            LinearCurve::buy_cost(UNIT_VALUE, SUPPLY, YES_RESERVE, NO_RESERVE, YES_RESERVE + 1)
                .is_err()
        );
    }

    #[test]
    fn test_sell_bounded_by_sold() {
        // Only 12 YES sold; selling 13 is unrepresentable.
        assert!(
            LinearCurve::sell_proceeds(UNIT_VALUE, SUPPLY, YES_RESERVE, NO_RESERVE, 13).is_err()
        );
    }

    #[test]
    fn test_zero_quantity_rejected() {
        assert!(LinearCurve::buy_cost(UNIT_VALUE, SUPPLY, YES_RESERVE, NO_RESERVE, 0).is_err());
        assert!(
            LinearCurve::sell_proceeds(UNIT_VALUE, SUPPLY, YES_RESERVE, NO_RESERVE, 0).is_err()
        );
    }

    #[test]
    fn test_reserve_above_supply_rejected() {
        assert!(LinearCurve::buy_cost(UNIT_VALUE, 50, 88, 92, 1).is_err());
    }

    #[test]
    fn test_overflow_is_an_error() {
        let half = u64::MAX / 2;
        assert!(LinearCurve::buy_cost(u64::MAX, u64::MAX, half, half, half).is_err());
    }
}
