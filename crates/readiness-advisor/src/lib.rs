//! # readiness-advisor
//!
//! Investment readiness scoring and market mood for beginner investors,
//! with AI-written daily guidance on top.
//!
//! ## Philosophy
//!
//! - **Safety net first** - Emergency savings carry the most weight
//! - **Deterministic scores** - The same inputs always give the same score
//! - **Advice degrades, scores don't** - A failed text generation never
//!   blocks a readiness result
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐   index Δ%   ┌──────────────────────┐
//! │ Market data  │─────────────►│ MarketRiskClassifier │
//! └──────┬───────┘              └──────────┬───────────┘
//!        │                                 │ LOW / MEDIUM / HIGH
//!        │       ┌────────────────┐        ▼
//!        │       │ Financials +   │  ┌─────────────────┐
//!        │       │ risk profile   │─►│ ReadinessEngine │──► snapshot history
//!        │       └────────────────┘  └────────┬────────┘
//!        │                                    │ ReadinessResult
//!        ▼                                    ▼
//! ┌─────────────────────────────────────────────────────┐
//! │ AdviceEngine: templates ─► LlmProvider ─► parser    │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod advice;
pub mod config;
pub mod error;
pub mod history;
pub mod market;
pub mod model;
pub mod notifications;
pub mod scoring;

pub use advice::{AdviceEngine, PromptParams, PromptTemplate, parse_personalized_advice, render_prompt};
pub use config::{MarketDataSettings, MarketRiskThresholds, ReadinessConfig, ScoreWeights, Settings};
pub use error::{AdvisorError, Result};
pub use history::{MemorySnapshotStore, ReadinessSnapshot, SnapshotStore};
pub use market::{MarketDataService, MarketRiskAssessment, MarketRiskClassifier};
pub use model::{
    AdviceResult, FinancialMetrics, MarketRiskLevel, ReadinessResult, ReadinessStatus, RiskLevel,
    RiskProfile,
};
pub use notifications::{Notification, preview_notifications};
pub use scoring::ReadinessEngine;
