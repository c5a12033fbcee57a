//! Liquidity Management
//!
//! Operator-only deposits and withdrawals of backing collateral while the
//! market is still trading. Claim units are minted and burned in equal
//! amounts on both sides, so the two supplies stay in lockstep for the
//! whole trading phase.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    burn, mint_to, transfer_checked, Burn, Mint, MintTo, TokenAccount, TokenInterface,
    TransferChecked,
};

use crate::state::Market;

/// Event emitted when the operator deposits collateral
#[event]
pub struct LiquidityAdded {
    pub market: Pubkey,
    pub operator: Pubkey,
    pub amount: u64,
    pub units_minted: u64,
}

/// Event emitted when the operator withdraws collateral
#[event]
pub struct LiquidityRemoved {
    pub market: Pubkey,
    pub operator: Pubkey,
    pub amount: u64,
    pub units_burned: u64,
}

/// Accounts for liquidity operations
#[derive(Accounts)]
pub struct ManageLiquidity<'info> {
    #[account(
        mut,
        constraint = operator.key() == market.operator @ LiquidityError::UnauthorizedOperator,
    )]
    pub operator: Signer<'info>,

    #[account(
        mut,
        constraint = !market.reported @ LiquidityError::MarketReported,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(mut, constraint = yes_mint.key() == market.yes_mint)]
    pub yes_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, constraint = no_mint.key() == market.no_mint)]
    pub no_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(constraint = collateral_mint.key() == market.collateral_mint)]
    pub collateral_mint: Box<InterfaceAccount<'info, Mint>>,

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

    #[account(mut, constraint = yes_reserve.key() == market.yes_reserve)]
    pub yes_reserve: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, constraint = no_reserve.key() == market.no_reserve)]
    pub no_reserve: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> ManageLiquidity<'info> {
    /// Deposit `amount` currency as additional backing and mint the
    /// corresponding claim units into both reserves.
    pub fn add_liquidity(&mut self, amount: u64) -> Result<()> {
        require!(amount > 0, LiquidityError::ZeroAmount);

        let units = amount / self.market.unit_value;

        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.operator_collateral.to_account_info(),
                    mint: self.collateral_mint.to_account_info(),
                    to: self.vault.to_account_info(),
                    authority: self.operator.to_account_info(),
                },
            ),
            amount,
            self.collateral_mint.decimals,
        )?;

        if units > 0 {
            let operator_key = self.market.operator;
            let market_id = self.market.market_id.to_le_bytes();
            let market_seeds = &[
                Market::SEED,
                operator_key.as_ref(),
                market_id.as_ref(),
                &[self.market.bump],
            ];
            let market_signer = &[&market_seeds[..]];

            for (mint, reserve) in [
                (&self.yes_mint, &self.yes_reserve),
                (&self.no_mint, &self.no_reserve),
            ] {
                mint_to(
                    CpiContext::new_with_signer(
                        self.token_program.to_account_info(),
                        MintTo {
                            mint: mint.to_account_info(),
                            to: reserve.to_account_info(),
                            authority: self.market.to_account_info(),
                        },
                        market_signer,
                    ),
                    units,
                )?;
            }
        }

        self.market.collateral = self
            .market
            .collateral
            .checked_add(amount)
            .ok_or(LiquidityError::Overflow)?;

        emit!(LiquidityAdded {
            market: self.market.key(),
            operator: self.operator.key(),
            amount,
            units_minted: units,
        });

        msg!("Liquidity added: {} currency, {} units per side", amount, units);

        Ok(())
    }

    /// Withdraw `amount` currency of backing and burn the corresponding
    /// claim units from both reserves.
    ///
    /// Withdrawing backing for already-sold claims is an accepted operator
    /// risk; `strict_collateral_check` only controls whether the amount is
    /// pre-checked against `collateral`. The checked subtraction refuses
    /// to drive `collateral` negative either way.
    pub fn remove_liquidity(&mut self, amount: u64) -> Result<()> {
        require!(amount > 0, LiquidityError::ZeroAmount);

        let units = amount / self.market.unit_value;
        require!(
            self.yes_reserve.amount >= units && self.no_reserve.amount >= units,
            LiquidityError::InsufficientTokenReserve
        );
        if self.market.strict_collateral_check {
            require!(
                amount <= self.market.collateral,
                LiquidityError::InsufficientCollateral
            );
        }

        self.market.collateral = self
            .market
            .collateral
            .checked_sub(amount)
            .ok_or(LiquidityError::InsufficientCollateral)?;

        let operator_key = self.market.operator;
        let market_id = self.market.market_id.to_le_bytes();
        let market_seeds = &[
            Market::SEED,
            operator_key.as_ref(),
            market_id.as_ref(),
            &[self.market.bump],
        ];
        let market_signer = &[&market_seeds[..]];

        if units > 0 {
            for (mint, reserve) in [
                (&self.yes_mint, &self.yes_reserve),
                (&self.no_mint, &self.no_reserve),
            ] {
                burn(
                    CpiContext::new_with_signer(
                        self.token_program.to_account_info(),
                        Burn {
                            mint: mint.to_account_info(),
                            from: reserve.to_account_info(),
                            authority: self.market.to_account_info(),
                        },
                        market_signer,
                    ),
                    units,
                )?;
            }
        }

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
            amount,
            self.collateral_mint.decimals,
        )?;

        emit!(LiquidityRemoved {
            market: self.market.key(),
            operator: self.operator.key(),
            amount,
            units_burned: units,
        });

        msg!("Liquidity removed: {} currency, {} units per side", amount, units);

        Ok(())
    }
}

#[error_code]
pub enum LiquidityError {
    #[msg("Only the market operator may manage liquidity")]
    UnauthorizedOperator,
    #[msg("Market outcome already reported")]
    MarketReported,
    #[msg("Amount must be greater than zero")]
    ZeroAmount,
    #[msg("Reserve holds fewer claim units than the withdrawal burns")]
    InsufficientTokenReserve,
    #[msg("Withdrawal exceeds remaining collateral")]
    InsufficientCollateral,
    #[msg("Arithmetic overflow")]
    Overflow,
}
