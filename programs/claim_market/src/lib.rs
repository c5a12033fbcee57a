//! # Claim Market
//!
//! Collateral-backed binary claim markets with curve-priced settlement.
//!
//! ## Overview
//!
//! Each market sells two complementary claim types ("YES" and "NO") whose
//! combined value is fully backed by a pooled currency reserve. Quotes
//! come from a linear probability curve (a side's price is its share of
//! all units sold), so no external price feed is involved anywhere.
//!
//! ## How it works
//! - The operator funds the market; equal claim supply is minted on both
//!   sides and a locked fraction anchors the initial probability.
//! - Traders buy and sell units against the market reserve at the curve
//!   price; the spread accumulates as trading revenue.
//! - The adjudicator reports the winning side exactly once, after which
//!   holders redeem winning units at the fixed unit value and the
//!   operator withdraws the remainder through resolution.

use anchor_lang::prelude::*;

pub mod amm;
pub mod instructions;
pub mod state;

pub use amm::*;
pub use instructions::*;

use state::Side;

declare_id!("9QfFkxhPMV5AnZ8o5ksjPhqsHwkWXdvGCGyHmEt6tJTn");

/// Main claim market program
#[program]
pub mod claim_market {
    use super::*;

    /// Initialize the market account (Step 1)
    pub fn create_market_state(
        ctx: Context<CreateMarketState>,
        params: CreateMarketParams,
    ) -> Result<()> {
        ctx.accounts.create_market_state(params, &ctx.bumps)
    }

    /// Create the YES/NO claim mints (Step 2)
    pub fn create_market_mints(ctx: Context<CreateMarketMints>) -> Result<()> {
        ctx.accounts.create_market_mints()
    }

    /// Create the collateral vault and per-side reserve/lock vaults (Step 3)
    pub fn create_market_vaults(ctx: Context<CreateMarketVaults>) -> Result<()> {
        ctx.accounts.create_market_vaults()
    }

    /// Deposit collateral and mint the bootstrap claim supply (Step 4)
    pub fn fund_market(ctx: Context<FundMarket>, deposit: u64) -> Result<()> {
        ctx.accounts.fund_market(deposit)
    }

    /// Deposit additional backing collateral (operator only)
    pub fn add_liquidity(ctx: Context<ManageLiquidity>, amount: u64) -> Result<()> {
        ctx.accounts.add_liquidity(amount)
    }

    /// Withdraw backing collateral (operator only)
    pub fn remove_liquidity(ctx: Context<ManageLiquidity>, amount: u64) -> Result<()> {
        ctx.accounts.remove_liquidity(amount)
    }

    /// Buy claim units out of the market reserve
    pub fn buy_claims(
        ctx: Context<Trade>,
        side: Side,
        quantity: u64,
        max_cost: u64,
    ) -> Result<u64> {
        ctx.accounts.buy_claims(side, quantity, max_cost)
    }

    /// Sell claim units back into the market reserve
    pub fn sell_claims(
        ctx: Context<Trade>,
        side: Side,
        quantity: u64,
        min_proceeds: u64,
    ) -> Result<u64> {
        ctx.accounts.sell_claims(side, quantity, min_proceeds)
    }

    /// Report the winning side (adjudicator only, exactly once)
    pub fn report_outcome(ctx: Context<ReportOutcome>, winning_side: Side) -> Result<()> {
        ctx.accounts.report_outcome(winning_side)
    }

    /// Redeem winning claim units for currency
    pub fn redeem(ctx: Context<Redeem>, quantity: u64) -> Result<u64> {
        ctx.accounts.redeem(quantity)
    }

    /// Burn the market's remaining winning reserve and withdraw residual
    /// collateral plus trading revenue (operator only)
    pub fn resolve_and_withdraw(ctx: Context<ResolveAndWithdraw>) -> Result<u64> {
        ctx.accounts.resolve_and_withdraw()
    }
}
