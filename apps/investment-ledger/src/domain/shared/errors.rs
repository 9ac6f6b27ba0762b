//! Domain errors shared by value objects.

use std::fmt;

/// Domain-level errors raised by shared value objects.
///
/// These errors are independent of any bounded context and get mapped into
/// context-specific errors at the aggregate boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid value for a field.
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Checked arithmetic overflowed.
    Overflow {
        /// Operation that overflowed.
        operation: String,
    },
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
            Self::Overflow { operation } => {
                write!(f, "Arithmetic overflow in {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
