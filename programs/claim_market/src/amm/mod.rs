//! # Pricing Module
//!
//! Implements the **linear probability curve** used to price YES/NO claim
//! units sold out of the market reserve.
//!
//! Unlike constant-product AMMs (x * y = k), a claim market quotes a side
//! directly at its market-implied probability:
//!
//! ```text
//!            P(side) = sold_side / sold_total
//!
//!   ┌────────────────────────────────────────┐
//!   │          Probability Space             │
//!   │                                        │
//!   │   P  ▲                                 │
//!   │  1.0 ┤ · · · · · · · · · · · · · ·     │
//!   │      │              ●  P after         │
//!   │      │         ●  average charged      │
//!   │      │    ●  P before                  │
//!   │      └───┬─────────┬─────▶ sold_side   │
//!   │        trade     trade                 │
//!   │        start      end                  │
//!   └────────────────────────────────────────┘
//! ```
//!
//! A trade is charged `unit_value × quantity` times the average of the
//! pre- and post-trade probability, so the whole system needs no external
//! price feed: the curve state alone determines every quote.

pub mod linear_curve;

pub use linear_curve::*;
