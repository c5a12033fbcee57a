//! Market Creation Pipeline
//!
//! Creating a market is split into 4 atomic steps that must be called in
//! sequence, keeping each instruction well under Solana's 4KB stack limit:
//!
//! Step 1: CreateMarketState - Initializes the market account.
//! Step 2: CreateMarketMints - Creates the YES and NO claim mints.
//! Step 3: CreateMarketVaults - Creates the collateral vault plus the
//!         per-side reserve and lock vaults.
//! Step 4: FundMarket - Deposits collateral, mints the bootstrap supply
//!         and routes the locked fraction out of circulation.
//!
//! Until step 4 completes the market holds no balances and no instruction
//! outside this pipeline accepts it; each step validates that the previous
//! one ran.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        mint_to, transfer_checked, Mint, MintTo, TokenAccount, TokenInterface, TransferChecked,
    },
};

use crate::state::{Market, Side};

#[error_code]
pub enum CreateMarketError {
    #[msg("Unit value must be greater than zero")]
    InvalidUnitValue,
    #[msg("Initial probability must be between 1 and 99 percent")]
    InvalidProbability,
    #[msg("Locked fraction must be between 1 and 99 percent")]
    InvalidLockFraction,
    #[msg("Question exceeds maximum length")]
    QuestionTooLong,
    #[msg("Only the market operator may run the creation pipeline")]
    UnauthorizedOperator,
    #[msg("Claim mints already created")]
    MintsAlreadyCreated,
    #[msg("Claim mints not created yet")]
    MintsNotCreated,
    #[msg("Market vaults already created")]
    VaultsAlreadyCreated,
    #[msg("Market vaults not created yet")]
    VaultsNotCreated,
    #[msg("Market already funded")]
    AlreadyFunded,
    #[msg("Deposit must be greater than zero")]
    ZeroDeposit,
    #[msg("Deposit buys less than one claim unit")]
    DepositTooSmall,
    #[msg("Bootstrap lock rounds to zero units")]
    LockTooSmall,
    #[msg("Bootstrap lock exceeds the per-side supply")]
    LockExceedsSupply,
}

/// Parameters fixed at market creation, immutable afterwards.
#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct CreateMarketParams {
    /// Operator-chosen identifier, part of the market PDA seeds.
    pub market_id: u64,

    /// The question this market settles (max 256 bytes).
    pub question: String,

    /// Identity authorized to report the outcome.
    pub adjudicator: Pubkey,

    /// Collateral base units per winning claim unit.
    pub unit_value: u64,

    /// Target YES probability at creation, percent in [1, 99].
    pub initial_probability_pct: u8,

    /// Fraction of the bootstrap supply withheld from circulation,
    /// percent in [1, 99].
    pub locked_fraction_pct: u8,

    /// Whether remove_liquidity pre-checks withdrawals against collateral.
    pub strict_collateral_check: bool,
}

// =============================================================================
// STEP 1: CREATE MARKET STATE
// =============================================================================

/// Event emitted when market state is created
#[event]
pub struct MarketStateCreated {
    pub market: Pubkey,
    pub operator: Pubkey,
    pub adjudicator: Pubkey,
    pub unit_value: u64,
    pub initial_probability_pct: u8,
    pub locked_fraction_pct: u8,
}

#[derive(Accounts)]
#[instruction(params: CreateMarketParams)]
pub struct CreateMarketState<'info> {
    #[account(mut)]
    pub operator: Signer<'info>,

    #[account(
        init,
        payer = operator,
        space = 8 + Market::INIT_SPACE,
        seeds = [
            Market::SEED,
            operator.key().as_ref(),
            params.market_id.to_le_bytes().as_ref(),
        ],
        bump,
    )]
    pub market: Account<'info, Market>,

    /// CHECK: Recorded now, validated as a mint in later steps
    pub collateral_mint: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

impl<'info> CreateMarketState<'info> {
    pub fn create_market_state(
        &mut self,
        params: CreateMarketParams,
        bumps: &CreateMarketStateBumps,
    ) -> Result<()> {
        require!(params.unit_value > 0, CreateMarketError::InvalidUnitValue);
        require!(
            (1..=99).contains(&params.initial_probability_pct),
            CreateMarketError::InvalidProbability
        );
        require!(
            (1..=99).contains(&params.locked_fraction_pct),
            CreateMarketError::InvalidLockFraction
        );
        require!(
            params.question.len() <= 256,
            CreateMarketError::QuestionTooLong
        );

        self.market.set_inner(Market {
            market_id: params.market_id,
            operator: self.operator.key(),
            adjudicator: params.adjudicator,
            question: params.question,
            unit_value: params.unit_value,
            initial_probability_pct: params.initial_probability_pct,
            locked_fraction_pct: params.locked_fraction_pct,
            strict_collateral_check: params.strict_collateral_check,
            yes_mint: Pubkey::default(),
            no_mint: Pubkey::default(),
            collateral_mint: self.collateral_mint.key(),
            yes_reserve: Pubkey::default(),
            no_reserve: Pubkey::default(),
            yes_lock: Pubkey::default(),
            no_lock: Pubkey::default(),
            collateral: 0,
            trading_revenue: 0,
            reported: false,
            winning_side: Side::default(),
            bump: bumps.market,
        });

        emit!(MarketStateCreated {
            market: self.market.key(),
            operator: self.operator.key(),
            adjudicator: self.market.adjudicator,
            unit_value: self.market.unit_value,
            initial_probability_pct: self.market.initial_probability_pct,
            locked_fraction_pct: self.market.locked_fraction_pct,
        });

        Ok(())
    }
}

// =============================================================================
// STEP 2: CREATE MARKET MINTS
// =============================================================================

/// Event emitted when the claim mints are created
#[event]
pub struct MarketMintsCreated {
    pub market: Pubkey,
    pub yes_mint: Pubkey,
    pub no_mint: Pubkey,
}

#[derive(Accounts)]
pub struct CreateMarketMints<'info> {
    #[account(mut)]
    pub operator: Signer<'info>,

    #[account(
        mut,
        constraint = market.operator == operator.key() @ CreateMarketError::UnauthorizedOperator,
        constraint = market.yes_mint == Pubkey::default() @ CreateMarketError::MintsAlreadyCreated,
    )]
    pub market: Account<'info, Market>,

    #[account(constraint = collateral_mint.key() == market.collateral_mint)]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    #[account(
        init,
        payer = operator,
        mint::decimals = collateral_mint.decimals,
        mint::authority = market,
        seeds = [b"yes_mint", market.key().as_ref()],
        bump,
    )]
    pub yes_mint: InterfaceAccount<'info, Mint>,

    #[account(
        init,
        payer = operator,
        mint::decimals = collateral_mint.decimals,
        mint::authority = market,
        seeds = [b"no_mint", market.key().as_ref()],
        bump,
    )]
    pub no_mint: InterfaceAccount<'info, Mint>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

impl<'info> CreateMarketMints<'info> {
    pub fn create_market_mints(&mut self) -> Result<()> {
        self.market.yes_mint = self.yes_mint.key();
        self.market.no_mint = self.no_mint.key();

        emit!(MarketMintsCreated {
            market: self.market.key(),
            yes_mint: self.yes_mint.key(),
            no_mint: self.no_mint.key(),
        });

        Ok(())
    }
}

// =============================================================================
// STEP 3: CREATE MARKET VAULTS
// =============================================================================

/// Event emitted when the market vaults are created
#[event]
pub struct MarketVaultsCreated {
    pub market: Pubkey,
}

#[derive(Accounts)]
pub struct CreateMarketVaults<'info> {
    #[account(mut)]
    pub operator: Signer<'info>,

    #[account(
        mut,
        constraint = market.operator == operator.key() @ CreateMarketError::UnauthorizedOperator,
        constraint = market.yes_mint != Pubkey::default() @ CreateMarketError::MintsNotCreated,
        constraint = market.yes_reserve == Pubkey::default() @ CreateMarketError::VaultsAlreadyCreated,
    )]
    pub market: Box<Account<'info, Market>>,

    /// CHECK: Manual validation to save stack
    #[account(constraint = yes_mint.key() == market.yes_mint)]
    pub yes_mint: AccountInfo<'info>,

    /// CHECK: Manual validation to save stack
    #[account(constraint = no_mint.key() == market.no_mint)]
    pub no_mint: AccountInfo<'info>,

    /// CHECK: Manual validation to save stack
    #[account(constraint = collateral_mint.key() == market.collateral_mint)]
    pub collateral_mint: AccountInfo<'info>,

    /// Currency custody for the whole market; its amount always equals
    /// collateral + trading_revenue.
    #[account(
        init,
        payer = operator,
        associated_token::mint = collateral_mint,
        associated_token::authority = market,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        payer = operator,
        token::mint = yes_mint,
        token::authority = market,
        token::token_program = token_program,
        seeds = [b"yes_reserve", market.key().as_ref()],
        bump,
    )]
    pub yes_reserve: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        payer = operator,
        token::mint = no_mint,
        token::authority = market,
        token::token_program = token_program,
        seeds = [b"no_reserve", market.key().as_ref()],
        bump,
    )]
    pub no_reserve: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        payer = operator,
        token::mint = yes_mint,
        token::authority = market,
        token::token_program = token_program,
        seeds = [b"yes_lock", market.key().as_ref()],
        bump,
    )]
    pub yes_lock: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        payer = operator,
        token::mint = no_mint,
        token::authority = market,
        token::token_program = token_program,
        seeds = [b"no_lock", market.key().as_ref()],
        bump,
    )]
    pub no_lock: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> CreateMarketVaults<'info> {
    pub fn create_market_vaults(&mut self) -> Result<()> {
        self.market.yes_reserve = self.yes_reserve.key();
        self.market.no_reserve = self.no_reserve.key();
        self.market.yes_lock = self.yes_lock.key();
        self.market.no_lock = self.no_lock.key();

        emit!(MarketVaultsCreated {
            market: self.market.key(),
        });

        Ok(())
    }
}

// =============================================================================
// STEP 4: FUND MARKET
// =============================================================================

/// Event emitted when the market is funded
#[event]
pub struct MarketFunded {
    pub market: Pubkey,
    pub operator: Pubkey,
    pub deposit: u64,
    pub bootstrap_supply: u64,
    pub locked_yes: u64,
    pub locked_no: u64,
}

#[derive(Accounts)]
pub struct FundMarket<'info> {
    #[account(mut)]
    pub operator: Signer<'info>,

    #[account(
        mut,
        constraint = market.operator == operator.key() @ CreateMarketError::UnauthorizedOperator,
        constraint = market.yes_reserve != Pubkey::default() @ CreateMarketError::VaultsNotCreated,
        constraint = market.collateral == 0 @ CreateMarketError::AlreadyFunded,
    )]
    pub market: Box<Account<'info, Market>>,

    /// CHECK: Manual validation to save stack
    #[account(mut, constraint = yes_mint.key() == market.yes_mint)]
    pub yes_mint: AccountInfo<'info>,

    /// CHECK: Manual validation to save stack
    #[account(mut, constraint = no_mint.key() == market.no_mint)]
    pub no_mint: AccountInfo<'info>,

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

    #[account(mut, constraint = yes_lock.key() == market.yes_lock)]
    pub yes_lock: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, constraint = no_lock.key() == market.no_lock)]
    pub no_lock: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> FundMarket<'info> {
    pub fn fund_market(&mut self, deposit: u64) -> Result<()> {
        require!(deposit > 0, CreateMarketError::ZeroDeposit);

        let supply = deposit / self.market.unit_value;
        require!(supply > 0, CreateMarketError::DepositTooSmall);

        let (locked_yes, locked_no) = self.market.locked_allocation(supply)?;
        require!(locked_yes > 0 && locked_no > 0, CreateMarketError::LockTooSmall);
        require!(
            locked_yes <= supply && locked_no <= supply,
            CreateMarketError::LockExceedsSupply
        );

        let decimals = self.collateral_mint.decimals;

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
            deposit,
            decimals,
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

        // Equal bootstrap supply on both sides, straight into the reserve.
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
                supply,
            )?;
        }

        // Route the locked fraction out of circulation. Locked units count
        // as sold, which is what seeds the initial probability. The claim
        // mints share the collateral mint's decimals.
        for (mint, reserve, lock, locked) in [
            (&self.yes_mint, &self.yes_reserve, &self.yes_lock, locked_yes),
            (&self.no_mint, &self.no_reserve, &self.no_lock, locked_no),
        ] {
            transfer_checked(
                CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    TransferChecked {
                        from: reserve.to_account_info(),
                        mint: mint.to_account_info(),
                        to: lock.to_account_info(),
                        authority: self.market.to_account_info(),
                    },
                    market_signer,
                ),
                locked,
                decimals,
            )?;
        }

        self.market.collateral = deposit;

        emit!(MarketFunded {
            market: self.market.key(),
            operator: self.operator.key(),
            deposit,
            bootstrap_supply: supply,
            locked_yes,
            locked_no,
        });

        msg!(
            "Market {} funded: {} collateral, {} units per side, locked {}/{}",
            self.market.key(),
            deposit,
            supply,
            locked_yes,
            locked_no,
        );

        Ok(())
    }
}
