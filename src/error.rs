use thiserror::Error;

/// Errors raised by the cost engine
///
/// Every variant is deterministic: the same input always produces the same
/// error, and nothing is retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostError {
    /// A workload field or invocation domain is outside its declared range
    #[error("Validation error: {field} {constraint}")]
    Validation { field: String, constraint: String },
    /// Provider id not present in the pricing catalog
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
    /// Instance type not offered by a known provider
    #[error("Unknown instance type '{instance_type}' for provider '{provider}'")]
    UnknownInstanceType {
        provider: String,
        instance_type: String,
    },
    /// Exchange rate is zero, negative or not a number
    #[error("Invalid exchange rate: {0}")]
    InvalidExchangeRate(f64),
    /// Pricing catalog could not be loaded or is inconsistent
    #[error("Catalog error: {0}")]
    Catalog(String),
}

impl CostError {
    pub fn validation(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    /// Stable machine-readable name, for collaborators mapping errors to
    /// exit codes or response bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::UnknownProvider(_) => "unknown_provider",
            Self::UnknownInstanceType { .. } => "unknown_instance_type",
            Self::InvalidExchangeRate(_) => "invalid_exchange_rate",
            Self::Catalog(_) => "catalog_error",
        }
    }

    /// Whether the caller can fix the error by correcting its input
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::Catalog(_))
    }
}

pub type Result<T> = std::result::Result<T, CostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CostError::UnknownProvider("oracle".to_string());
        assert_eq!(error.to_string(), "Unknown provider: oracle");

        let error = CostError::validation("memory_mb", "must be between 128 and 10240");
        assert_eq!(
            error.to_string(),
            "Validation error: memory_mb must be between 128 and 10240"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(CostError::InvalidExchangeRate(0.0).kind(), "invalid_exchange_rate");
        assert_eq!(
            CostError::UnknownInstanceType {
                provider: "aws".to_string(),
                instance_type: "x1.huge".to_string(),
            }
            .kind(),
            "unknown_instance_type"
        );
    }

    #[test]
    fn test_catalog_errors_are_not_input_errors() {
        assert!(!CostError::Catalog("bad file".to_string()).is_input_error());
        assert!(CostError::UnknownProvider("x".to_string()).is_input_error());
    }
}
