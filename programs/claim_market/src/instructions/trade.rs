//! Claim Trading
//!
//! Buying and selling YES/NO claim units against the market reserve,
//! priced by the linear probability curve.
//!
//! Trades never mint or burn: units move between the reserve vaults and
//! the trader, because the circulating supply is fixed by the collateral
//! backing it. Everything a buyer pays lands in `trading_revenue` (the
//! spread pool), and sells are funded from that pool alone; collateral
//! is never spent on a buy-back.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
    },
};

use crate::amm::LinearCurve;
use crate::state::{Market, Side};

/// Event emitted when claim units are bought
#[event]
pub struct ClaimsPurchased {
    pub market: Pubkey,
    pub trader: Pubkey,
    pub side: Side,
    pub quantity: u64,
    pub cost: u64,
}

/// Event emitted when claim units are sold back
#[event]
pub struct ClaimsSold {
    pub market: Pubkey,
    pub trader: Pubkey,
    pub side: Side,
    pub quantity: u64,
    pub proceeds: u64,
}

/// Accounts for trading operations
#[derive(Accounts)]
pub struct Trade<'info> {
    /// Trader; the operator is barred from its own market.
    #[account(
        mut,
        constraint = trader.key() != market.operator @ TradeError::OperatorMayNotTrade,
    )]
    pub trader: Signer<'info>,

    #[account(
        mut,
        constraint = !market.reported @ TradeError::MarketReported,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(constraint = yes_mint.key() == market.yes_mint)]
    pub yes_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(constraint = no_mint.key() == market.no_mint)]
    pub no_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(constraint = collateral_mint.key() == market.collateral_mint)]
    pub collateral_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = trader,
    )]
    pub trader_collateral: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = trader,
        associated_token::mint = yes_mint,
        associated_token::authority = trader,
    )]
    pub trader_yes: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = trader,
        associated_token::mint = no_mint,
        associated_token::authority = trader,
    )]
    pub trader_no: Box<InterfaceAccount<'info, TokenAccount>>,

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
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> Trade<'info> {
    /// Buy `quantity` units of `side` out of the market reserve.
    ///
    /// The trader pays exactly the curve price; `max_cost` only guards
    /// against state drift between quoting and execution.
    pub fn buy_claims(&mut self, side: Side, quantity: u64, max_cost: u64) -> Result<u64> {
        let (supply, reserve_side, reserve_other) = self.curve_inputs(side);

        let cost = LinearCurve::buy_cost(
            self.market.unit_value,
            supply,
            reserve_side,
            reserve_other,
            quantity,
        )?;
        require!(cost <= max_cost, TradeError::SlippageExceeded);

        // Buyer's payment is spread revenue, not collateral: the sold
        // units were already backed when they were minted.
        self.market.trading_revenue = self
            .market
            .trading_revenue
            .checked_add(cost)
            .ok_or(TradeError::Overflow)?;

        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.trader_collateral.to_account_info(),
                    mint: self.collateral_mint.to_account_info(),
                    to: self.vault.to_account_info(),
                    authority: self.trader.to_account_info(),
                },
            ),
            cost,
            self.collateral_mint.decimals,
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

        let (claim_mint, reserve, destination) = match side {
            Side::Yes => (&self.yes_mint, &self.yes_reserve, &self.trader_yes),
            Side::No => (&self.no_mint, &self.no_reserve, &self.trader_no),
        };

        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: reserve.to_account_info(),
                    mint: claim_mint.to_account_info(),
                    to: destination.to_account_info(),
                    authority: self.market.to_account_info(),
                },
                market_signer,
            ),
            quantity,
            claim_mint.decimals,
        )?;

        emit!(ClaimsPurchased {
            market: self.market.key(),
            trader: self.trader.key(),
            side,
            quantity,
            cost,
        });

        msg!("Bought {} {:?} units for {}", quantity, side, cost);

        Ok(cost)
    }

    /// Sell `quantity` units of `side` back into the market reserve.
    pub fn sell_claims(&mut self, side: Side, quantity: u64, min_proceeds: u64) -> Result<u64> {
        let (supply, reserve_side, reserve_other) = self.curve_inputs(side);

        let proceeds = LinearCurve::sell_proceeds(
            self.market.unit_value,
            supply,
            reserve_side,
            reserve_other,
            quantity,
        )?;
        require!(proceeds >= min_proceeds, TradeError::SlippageExceeded);
        require!(
            self.market.trading_revenue >= proceeds,
            TradeError::InsufficientRevenue
        );

        self.market.trading_revenue -= proceeds;

        // Pull the units back into the reserve; the trader signs, which
        // covers both balance and authorization.
        let (claim_mint, reserve, source) = match side {
            Side::Yes => (&self.yes_mint, &self.yes_reserve, &self.trader_yes),
            Side::No => (&self.no_mint, &self.no_reserve, &self.trader_no),
        };

        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: source.to_account_info(),
                    mint: claim_mint.to_account_info(),
                    to: reserve.to_account_info(),
                    authority: self.trader.to_account_info(),
                },
            ),
            quantity,
            claim_mint.decimals,
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
                    to: self.trader_collateral.to_account_info(),
                    authority: self.market.to_account_info(),
                },
                market_signer,
            ),
            proceeds,
            self.collateral_mint.decimals,
        )?;

        emit!(ClaimsSold {
            market: self.market.key(),
            trader: self.trader.key(),
            side,
            quantity,
            proceeds,
        });

        msg!("Sold {} {:?} units for {}", quantity, side, proceeds);

        Ok(proceeds)
    }

    /// Ledger state the curve prices from. Both mints carry the same
    /// supply while trading is open.
    fn curve_inputs(&self, side: Side) -> (u64, u64, u64) {
        match side {
            Side::Yes => (
                self.yes_mint.supply,
                self.yes_reserve.amount,
                self.no_reserve.amount,
            ),
            Side::No => (
                self.no_mint.supply,
                self.no_reserve.amount,
                self.yes_reserve.amount,
            ),
        }
    }
}

#[error_code]
pub enum TradeError {
    #[msg("The market operator may not trade its own market")]
    OperatorMayNotTrade,
    #[msg("Market outcome already reported")]
    MarketReported,
    #[msg("Price moved beyond the caller's bound")]
    SlippageExceeded,
    #[msg("Trading revenue cannot fund this sale")]
    InsufficientRevenue,
    #[msg("Arithmetic overflow")]
    Overflow,
}
