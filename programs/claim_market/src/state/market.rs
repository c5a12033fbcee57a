//! Claim Market State
//!
//! Each market settles one binary question against its own collateral pool.
//! Markets are fully independent: operator, adjudicator, pricing parameters
//! and balances all live on the market account.

use anchor_lang::prelude::*;

#[error_code]
pub enum MarketError {
    #[msg("Arithmetic overflow")]
    Overflow,
}

/// One binary claim market
///
/// Seeds: ["market", operator, market_id.to_le_bytes()]
#[account]
#[derive(InitSpace)]
pub struct Market {
    /// Operator-chosen identifier, part of the PDA seeds
    pub market_id: u64,

    /// Market creator; funds the market, may manage liquidity before the
    /// outcome is reported and withdraws at resolution. Barred from
    /// trading and redemption.
    pub operator: Pubkey,

    /// Identity authorized to report the outcome, exactly once
    pub adjudicator: Pubkey,

    /// The question this market settles
    #[max_len(256)]
    pub question: String,

    /// Collateral base units paid per winning claim unit at redemption
    pub unit_value: u64,

    /// Target YES probability at creation, percent in [1, 99]
    pub initial_probability_pct: u8,

    /// Fraction of the bootstrap supply withheld from circulation to
    /// anchor the initial probability, percent in [1, 99]
    pub locked_fraction_pct: u8,

    /// When set, remove_liquidity pre-checks the withdrawal against
    /// `collateral` before anything moves
    pub strict_collateral_check: bool,

    /// YES claim mint
    pub yes_mint: Pubkey,
    /// NO claim mint
    pub no_mint: Pubkey,
    /// Currency the market is collateralized in
    pub collateral_mint: Pubkey,

    /// Units the market can still sell, per side
    pub yes_reserve: Pubkey,
    pub no_reserve: Pubkey,

    /// Bootstrap-locked units held on the operator's behalf, per side.
    /// Nothing ever transfers out of a lock vault.
    pub yes_lock: Pubkey,
    pub no_lock: Pubkey,

    /// Currency reserved to back outstanding claims
    pub collateral: u64,

    /// Currency collected from the pricing spread. Funds sell-side
    /// buy-backs and is withdrawn by the operator at resolution; never
    /// mixed with `collateral`.
    pub trading_revenue: u64,

    /// Set exactly once by the adjudicator
    pub reported: bool,

    /// Only meaningful once `reported` is set
    pub winning_side: Side,

    /// PDA bump seed
    pub bump: u8,
}

impl Market {
    pub const SEED: &'static [u8] = b"market";

    /// Bootstrap units withheld per side for a freshly funded market.
    ///
    /// Returns `(locked_yes, locked_no)`. The ratio of the two seeds the
    /// initial probability: locked units count as sold, so the curve
    /// quotes `locked_yes / (locked_yes + locked_no)` before any trade.
    pub fn locked_allocation(&self, supply: u64) -> Result<(u64, u64)> {
        let locked_yes = lock_units(supply, self.initial_probability_pct, self.locked_fraction_pct)?;
        let locked_no = lock_units(
            supply,
            100 - self.initial_probability_pct,
            self.locked_fraction_pct,
        )?;
        Ok((locked_yes, locked_no))
    }

    /// Winning side, if the adjudicator has reported
    pub fn winner(&self) -> Option<Side> {
        self.reported.then_some(self.winning_side)
    }

    pub fn mint_of(&self, side: Side) -> Pubkey {
        match side {
            Side::Yes => self.yes_mint,
            Side::No => self.no_mint,
        }
    }

    pub fn reserve_of(&self, side: Side) -> Pubkey {
        match side {
            Side::Yes => self.yes_reserve,
            Side::No => self.no_reserve,
        }
    }

    /// Resolution payout for `held` market-owned winning units, capped at
    /// the collateral still in the pool.
    pub fn resolution_payout(&self, held: u64) -> Result<u64> {
        let gross = (held as u128)
            .checked_mul(self.unit_value as u128)
            .ok_or(MarketError::Overflow)?;
        Ok(gross.min(self.collateral as u128) as u64)
    }
}

/// `supply * probability_pct * fraction_pct * 2 / 10000`, truncating
fn lock_units(supply: u64, probability_pct: u8, fraction_pct: u8) -> Result<u64> {
    let units = (supply as u128)
        .checked_mul(probability_pct as u128)
        .ok_or(MarketError::Overflow)?
        .checked_mul(fraction_pct as u128)
        .ok_or(MarketError::Overflow)?
        .checked_mul(2)
        .ok_or(MarketError::Overflow)?
        / 10_000;
    u64::try_from(units).map_err(|_| error!(MarketError::Overflow))
}

/// Claim side of a binary market
///
/// All side-dependent logic is parameterized by this tag; there are no
/// duplicated YES/NO code paths.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub enum Side {
    #[default]
    Yes,
    No,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Yes => Side::No,
            Side::No => Side::Yes,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn market(initial_probability_pct: u8, locked_fraction_pct: u8) -> Market {
        Market {
            market_id: 1,
            operator: Pubkey::default(),
            adjudicator: Pubkey::default(),
            question: "Will it settle?".to_string(),
            unit_value: 1,
            initial_probability_pct,
            locked_fraction_pct,
            strict_collateral_check: true,
            yes_mint: Pubkey::default(),
            no_mint: Pubkey::default(),
            collateral_mint: Pubkey::default(),
            yes_reserve: Pubkey::default(),
            no_reserve: Pubkey::default(),
            yes_lock: Pubkey::default(),
            no_lock: Pubkey::default(),
            collateral: 0,
            trading_revenue: 0,
            reported: false,
            winning_side: Side::Yes,
            bump: 255,
        }
    }

    #[test]
    fn test_locked_allocation_concrete() {
        // 100-unit bootstrap at 60% with a 10% lock fraction.
        let (yes, no) = market(60, 10).locked_allocation(100).unwrap();
        assert_eq!(yes, 12);
        assert_eq!(no, 8);
    }

    #[test]
    fn test_locked_allocation_seeds_target() {
        for pct in [1u8, 25, 50, 60, 75, 99] {
            let (yes, no) = market(pct, 10).locked_allocation(1_000_000).unwrap();
            assert_eq!(yes * 100 / (yes + no), pct as u64);
        }
    }

    #[test]
    fn test_locked_allocation_truncates_to_zero_when_tiny() {
        // 1% at 1% of a 100-unit supply rounds the YES lock to nothing;
        // funding rejects markets where either side locks zero units.
        let (yes, no) = market(1, 1).locked_allocation(100).unwrap();
        assert_eq!(yes, 0);
        assert_eq!(no, 1);
    }

    #[test]
    fn test_locked_allocation_can_exceed_supply() {
        // 99% at 99% asks for ~1.96x the per-side supply; funding must
        // reject the parameterization rather than fail inside a transfer.
        let (yes, _) = market(99, 99).locked_allocation(1_000).unwrap();
        assert!(yes > 1_000);
    }

    #[test]
    fn test_resolution_payout_caps_at_collateral() {
        let mut m = market(60, 10);
        m.unit_value = 10;
        m.collateral = 1_000;
        assert_eq!(m.resolution_payout(50).unwrap(), 500);
        assert_eq!(m.resolution_payout(100).unwrap(), 1_000);
        assert_eq!(m.resolution_payout(200).unwrap(), 1_000);
        assert_eq!(m.resolution_payout(0).unwrap(), 0);
    }

    #[test]
    fn test_winner_gated_by_report() {
        let mut m = market(60, 10);
        assert_eq!(m.winner(), None);
        m.reported = true;
        m.winning_side = Side::No;
        assert_eq!(m.winner(), Some(Side::No));
    }

    #[test]
    fn test_side_other() {
        assert_eq!(Side::Yes.other(), Side::No);
        assert_eq!(Side::No.other(), Side::Yes);
    }
}
