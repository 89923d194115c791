//! Error Types for the Readiness Advisor

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Template '{template}' is missing field '{field}'")]
    MissingTemplateField { template: String, field: String },

    #[error("Unknown prompt template: {0}")]
    UnknownTemplate(String),

    #[error("Market data error: {0}")]
    MarketData(String),

    #[error("Symbol not supported: {0}")]
    UnsupportedSymbol(String),

    #[error("Invalid score weights: {0}")]
    InvalidWeights(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AdvisorError {
    /// Whether the error came from an external market-data collaborator,
    /// in which case a fallback provider may be tried.
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MarketData(_) | Self::UnsupportedSymbol(_) | Self::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_error_message() {
        let err = AdvisorError::MissingTemplateField {
            template: "education".into(),
            field: "topic".into(),
        };
        assert_eq!(err.to_string(), "Template 'education' is missing field 'topic'");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_market_errors_are_recoverable() {
        assert!(AdvisorError::MarketData("empty quote".into()).is_recoverable());
        assert!(!AdvisorError::Storage("poisoned".into()).is_recoverable());
    }
}
