//! # Validation Module
//!
//! Boundary checks for form input.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Line item entry                                              │
//! │  ├── validate_description   (non-blank)                                │
//! │  └── parse_optional_amount  (blank → None, else Money::parse)          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Before a number is issued                                    │
//! │  ├── validate_client        (name, C.C./NIT)                           │
//! │  └── validate_items         (at least one)                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: DocumentComposer                                             │
//! │  └── name + items re-checked, no partial document                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{ClientRecord, LineItem};

/// Validates a line item description.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(())
}

/// Parses the optional value field of a line item.
///
/// ## Rules
/// - Blank (or whitespace only) → `Ok(None)`: the price is hidden
/// - Anything else must parse with [`Money::parse`]
///
/// ## Example
/// ```rust
/// use cotizador_core::validation::parse_optional_amount;
///
/// assert_eq!(parse_optional_amount("").unwrap(), None);
/// assert!(parse_optional_amount("50000").unwrap().is_some());
/// assert!(parse_optional_amount("abc").is_err());
/// ```
pub fn parse_optional_amount(raw: &str) -> ValidationResult<Option<Money>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    Money::parse(raw).map(Some)
}

/// Validates the client fields required before issuing a number.
///
/// Checks the name first, so a completely empty form reports the name.
pub fn validate_client(client: &ClientRecord) -> ValidationResult<()> {
    if client.name.trim().is_empty() {
        return Err(ValidationError::MissingClientName);
    }

    if client.id_number.trim().is_empty() {
        return Err(ValidationError::MissingClientId);
    }

    Ok(())
}

/// Validates that a quotation has something to quote.
pub fn validate_items(items: &[LineItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::EmptyLineItems);
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_description() {
        assert!(validate_description("Pintura").is_ok());
        assert_eq!(validate_description(""), Err(ValidationError::EmptyDescription));
        assert_eq!(validate_description(" \t"), Err(ValidationError::EmptyDescription));
    }

    #[test]
    fn test_parse_optional_amount() {
        assert_eq!(parse_optional_amount("   ").unwrap(), None);
        assert_eq!(
            parse_optional_amount("1500").unwrap(),
            Some(Money::from_units(1500))
        );
        assert!(matches!(
            parse_optional_amount("abc"),
            Err(ValidationError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_validate_client() {
        assert!(validate_client(&ClientRecord::new("Juan", "", "123")).is_ok());
        assert_eq!(
            validate_client(&ClientRecord::new("", "", "")),
            Err(ValidationError::MissingClientName)
        );
        assert_eq!(
            validate_client(&ClientRecord::new("Juan", "Calle 1", " ")),
            Err(ValidationError::MissingClientId)
        );
    }

    #[test]
    fn test_validate_items() {
        assert_eq!(validate_items(&[]), Err(ValidationError::EmptyLineItems));
        let items = [LineItem::new("x", None).unwrap()];
        assert!(validate_items(&items).is_ok());
    }
}
