//! Outcome Reporting
//!
//! The adjudicator declares the winning side exactly once. Reporting is
//! irreversible: it permanently closes trading and liquidity management
//! and opens redemption and resolution.

use anchor_lang::prelude::*;

use crate::state::{Market, Side};

/// Event emitted when the outcome is reported
#[event]
pub struct MarketReported {
    pub market: Pubkey,
    pub adjudicator: Pubkey,
    pub winning_side: Side,
}

/// Accounts for outcome reporting
#[derive(Accounts)]
pub struct ReportOutcome<'info> {
    #[account(
        constraint = adjudicator.key() == market.adjudicator @ ReportError::UnauthorizedAdjudicator,
    )]
    pub adjudicator: Signer<'info>,

    #[account(
        mut,
        constraint = !market.reported @ ReportError::AlreadyReported,
    )]
    pub market: Account<'info, Market>,
}

impl<'info> ReportOutcome<'info> {
    pub fn report_outcome(&mut self, winning_side: Side) -> Result<()> {
        self.market.reported = true;
        self.market.winning_side = winning_side;

        emit!(MarketReported {
            market: self.market.key(),
            adjudicator: self.adjudicator.key(),
            winning_side,
        });

        msg!("Market {} reported: {:?} wins", self.market.key(), winning_side);

        Ok(())
    }
}

#[error_code]
pub enum ReportError {
    #[msg("Only the designated adjudicator may report the outcome")]
    UnauthorizedAdjudicator,
    #[msg("Outcome already reported")]
    AlreadyReported,
}
