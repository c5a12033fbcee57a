//! Winning Claim Redemption
//!
//! After the outcome is reported, holders exchange winning units for
//! currency at the fixed unit value:
//!
//! ```text
//! payout = quantity × unit_value
//! ```
//!
//! The units are burned in the same transaction that pays out, so a unit
//! can never be redeemed twice, and payouts are capped by the collateral
//! still in the pool: an oversized redemption fails outright rather than
//! paying partially.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{burn, transfer_checked, Burn, Mint, TokenAccount, TokenInterface, TransferChecked},
};

use crate::state::Market;

/// Event emitted when winning claims are redeemed
#[event]
pub struct ClaimsRedeemed {
    pub market: Pubkey,
    pub redeemer: Pubkey,
    pub quantity: u64,
    pub payout: u64,
}

/// Accounts for redemption
#[derive(Accounts)]
pub struct Redeem<'info> {
    /// Redeeming holder; the operator settles through resolution instead.
    #[account(
        mut,
        constraint = redeemer.key() != market.operator @ RedeemError::OperatorMayNotRedeem,
    )]
    pub redeemer: Signer<'info>,

    #[account(
        mut,
        constraint = market.reported @ RedeemError::NotReported,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(
        mut,
        constraint = winning_mint.key() == market.mint_of(market.winning_side)
            @ RedeemError::NotWinningMint,
    )]
    pub winning_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(constraint = collateral_mint.key() == market.collateral_mint)]
    pub collateral_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = winning_mint,
        associated_token::authority = redeemer,
    )]
    pub redeemer_claims: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = redeemer,
    )]
    pub redeemer_collateral: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = market,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
}

impl<'info> Redeem<'info> {
    pub fn redeem(&mut self, quantity: u64) -> Result<u64> {
        require!(quantity > 0, RedeemError::ZeroQuantity);
        require!(
            self.redeemer_claims.amount >= quantity,
            RedeemError::InsufficientClaims
        );

        let payout = (quantity as u128)
            .checked_mul(self.market.unit_value as u128)
            .ok_or(RedeemError::Overflow)?;
        let payout = u64::try_from(payout).map_err(|_| error!(RedeemError::Overflow))?;
        require!(
            payout <= self.market.collateral,
            RedeemError::InsufficientCollateral
        );

        self.market.collateral -= payout;

        burn(
            CpiContext::new(
                self.token_program.to_account_info(),
                Burn {
                    mint: self.winning_mint.to_account_info(),
                    from: self.redeemer_claims.to_account_info(),
                    authority: self.redeemer.to_account_info(),
                },
            ),
            quantity,
        )?;

        let operator_key = self.market.operator;
        let market_id = self.market.market_id.to_le_bytes();
        let market_seeds = &[
            Market::SEED,
            operator_key.as_ref(),
            market_id.as_ref(),
            &[self.market.bump],
        ];
        let market_signer = &[&market_seeds[..]];

        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.vault.to_account_info(),
                    mint: self.collateral_mint.to_account_info(),
                    to: self.redeemer_collateral.to_account_info(),
                    authority: self.market.to_account_info(),
                },
                market_signer,
            ),
            payout,
            self.collateral_mint.decimals,
        )?;

        emit!(ClaimsRedeemed {
            market: self.market.key(),
            redeemer: self.redeemer.key(),
            quantity,
            payout,
        });

        msg!("Redeemed {} winning units for {}", quantity, payout);

        Ok(payout)
    }
}

#[error_code]
pub enum RedeemError {
    #[msg("The market operator settles through resolution, not redemption")]
    OperatorMayNotRedeem,
    #[msg("Market outcome not reported yet")]
    NotReported,
    #[msg("Not the winning claim mint")]
    NotWinningMint,
    #[msg("Quantity must be greater than zero")]
    ZeroQuantity,
    #[msg("Caller holds fewer winning units than requested")]
    InsufficientClaims,
    #[msg("Redemption exceeds remaining collateral")]
    InsufficientCollateral,
    #[msg("Arithmetic overflow")]
    Overflow,
}
