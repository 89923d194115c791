//! Advice
//!
//! Prompt templates, the orchestration that feeds them to a text-generation
//! provider, and the parser that splits replies into advice fields.
//!
//! ```text
//!   ReadinessResult ─┐
//!   MarketSummary ───┼──► PromptTemplate::render ──► LlmProvider ──► parse / fallback
//!   topic / context ─┘
//! ```

mod engine;
mod parser;
mod templates;

pub use engine::{
    AdviceEngine, BeginnerExplanation, EducationCard, MarketExplanation, PatternInsight,
    SectorInsights,
};
pub use parser::parse_personalized_advice;
pub use templates::{render_prompt, PromptParams, PromptTemplate};
