//! Final Resolution
//!
//! Operator settlement after the outcome is reported. The market burns its
//! own remaining winning-side reserve and pays the operator the collateral
//! those units were backing, capped at what is left in the pool, plus all
//! accumulated trading revenue:
//!
//! ```text
//! payout = min(held_winning × unit_value, collateral) + trading_revenue
//! ```
//!
//! Resolution is repeatable: a later call finds no held winning units and
//! no revenue, and pays nothing. Collateral already withdrawn is never
//! paid again. Holders can keep redeeming before and after each call.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    burn, transfer_checked, Burn, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::state::Market;

/// Event emitted when the operator resolves the market
#[event]
pub struct MarketResolved {
    pub market: Pubkey,
    pub operator: Pubkey,
    pub units_burned: u64,
    pub collateral_withdrawn: u64,
    pub revenue_withdrawn: u64,
}

/// Accounts for resolution
#[derive(Accounts)]
pub struct ResolveAndWithdraw<'info> {
    #[account(
        mut,
        constraint = operator.key() == market.operator @ ResolveError::UnauthorizedOperator,
    )]
    pub operator: Signer<'info>,

    #[account(
        mut,
        constraint = market.reported @ ResolveError::NotReported,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(
        mut,
        constraint = winning_mint.key() == market.mint_of(market.winning_side)
            @ ResolveError::NotWinningMint,
    )]
    pub winning_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(constraint = collateral_mint.key() == market.collateral_mint)]
    pub collateral_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Reserve vault of the winning side; the lock vaults stay untouched.
    #[account(
        mut,
        constraint = winning_reserve.key() == market.reserve_of(market.winning_side)
            @ ResolveError::NotWinningReserve,
    )]
    pub winning_reserve: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = operator,
    )]
    pub operator_collateral: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = market,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> ResolveAndWithdraw<'info> {
    pub fn resolve_and_withdraw(&mut self) -> Result<u64> {
        let held = self.winning_reserve.amount;
        let collateral_payout = self.market.resolution_payout(held)?;
        let revenue = self.market.trading_revenue;
        let total = collateral_payout
            .checked_add(revenue)
            .ok_or(ResolveError::Overflow)?;

        self.market.collateral -= collateral_payout;
        self.market.trading_revenue = 0;

        let operator_key = self.market.operator;
        let market_id = self.market.market_id.to_le_bytes();
        let market_seeds = &[
            Market::SEED,
            operator_key.as_ref(),
            market_id.as_ref(),
            &[self.market.bump],
        ];
        let market_signer = &[&market_seeds[..]];

        if held > 0 {
            burn(
                CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    Burn {
                        mint: self.winning_mint.to_account_info(),
                        from: self.winning_reserve.to_account_info(),
                        authority: self.market.to_account_info(),
                    },
                    market_signer,
                ),
                held,
            )?;
        }

        if total > 0 {
            transfer_checked(
                CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    TransferChecked {
                        from: self.vault.to_account_info(),
                        mint: self.collateral_mint.to_account_info(),
                        to: self.operator_collateral.to_account_info(),
                        authority: self.market.to_account_info(),
                    },
                    market_signer,
                ),
                total,
                self.collateral_mint.decimals,
            )?;
        }

        emit!(MarketResolved {
            market: self.market.key(),
            operator: self.operator.key(),
            units_burned: held,
            collateral_withdrawn: collateral_payout,
            revenue_withdrawn: revenue,
        });

        msg!(
            "Market {} resolved: burned {}, withdrew {} collateral + {} revenue",
            self.market.key(),
            held,
            collateral_payout,
            revenue,
        );

        Ok(total)
    }
}

#[error_code]
pub enum ResolveError {
    #[msg("Only the market operator may resolve")]
    UnauthorizedOperator,
    #[msg("Market outcome not reported yet")]
    NotReported,
    #[msg("Not the winning claim mint")]
    NotWinningMint,
    #[msg("Not the winning side's reserve vault")]
    NotWinningReserve,
    #[msg("Arithmetic overflow")]
    Overflow,
}
