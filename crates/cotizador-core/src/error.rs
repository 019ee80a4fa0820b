//! # Error Types
//!
//! Domain-specific error types for cotizador-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cotizador-core (this file)                                            │
//! │  └── ValidationError   - Bad input, nothing was mutated                │
//! │                                                                         │
//! │  cotizador-db                                                          │
//! │  ├── DbError           - Store failures                                │
//! │  └── PersistenceError  - Counter could not be read/advanced            │
//! │                                                                         │
//! │  cotizador-render                                                      │
//! │  └── RenderError       - Artifact could not be produced                │
//! │                                                                         │
//! │  Flow: ValidationError / PersistenceError / RenderError                │
//! │          → GenerationError → AppError → user                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every validation failure is recoverable locally: the message is shown to
//! the user and the working state is left exactly as it was.

use thiserror::Error;

/// Input validation errors.
///
/// Raised before any state changes, both by the line item store and by the
/// document composer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A line item description is empty or whitespace only.
    #[error("Description is required")]
    EmptyDescription,

    /// A line item value was supplied but is not an acceptable amount.
    ///
    /// ## When This Occurs
    /// - Not a number at all (`"abc"`)
    /// - Negative
    /// - Larger than the maximum accepted amount
    #[error("'{input}' is not a valid amount: {reason}")]
    InvalidNumber { input: String, reason: String },

    /// The client name is empty.
    #[error("Client name is required")]
    MissingClientName,

    /// The client identification number (C.C. or NIT) is empty.
    #[error("Client identification number is required")]
    MissingClientId,

    /// A quotation needs at least one line item.
    #[error("At least one line item is required")]
    EmptyLineItems,

    /// Removal targeted a position that does not exist.
    #[error("Line item {index} does not exist (there are {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl ValidationError {
    /// Creates an InvalidNumber error.
    pub fn invalid_number(input: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidNumber {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::invalid_number("abc", "not a number");
        assert_eq!(err.to_string(), "'abc' is not a valid amount: not a number");

        let err = ValidationError::IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "Line item 4 does not exist (there are 2)");

        assert_eq!(
            ValidationError::MissingClientName.to_string(),
            "Client name is required"
        );
    }
}
