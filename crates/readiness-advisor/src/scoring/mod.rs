//! Readiness Scoring
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Readiness Score (0-100)                                     │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Emergency fund   ████████████████████  40%  months covered  │
//! │  Savings rate     ██████████            20%  % of income     │
//! │  Debt-to-income   ██████████            20%  % of income     │
//! │  Market risk      █████                 10%  LOW/MEDIUM/HIGH │
//! │  Risk alignment   █████                 10%  profile fit     │
//! └──────────────────────────────────────────────────────────────┘
//!   ≥80 READY   ≥60 ALMOST_READY   ≥40 GETTING_THERE   else NOT_READY
//! ```

pub mod components;
mod engine;

pub use engine::ReadinessEngine;
