//! Share class directory errors.

use std::fmt;

/// Errors raised by the share class directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareClassError {
    /// Name is empty or exceeds 128 characters.
    InvalidMetadataName {
        /// Offending length in characters.
        length: usize,
    },

    /// Symbol is empty or exceeds 32 characters.
    InvalidMetadataSymbol {
        /// Offending length in characters.
        length: usize,
    },

    /// Salt is zero.
    InvalidSalt,

    /// Salt was already used by a share class anywhere in the directory.
    AlreadyUsedSalt {
        /// Hex rendering of the salt.
        salt: String,
    },

    /// Share class does not exist.
    NotFound {
        /// Share class id.
        id: String,
    },

    /// Issuance decrease exceeds currently issued shares.
    DecreaseMoreThanIssued {
        /// Requested decrease in share atoms.
        requested: String,
        /// Currently issued share atoms.
        issued: String,
    },

    /// Arithmetic overflow while updating issuance.
    IssuanceOverflow {
        /// Operation that overflowed.
        operation: String,
    },

    /// Pushed NAV per share is zero or negative.
    InvalidSharePrice,
}

impl fmt::Display for ShareClassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMetadataName { length } => {
                write!(f, "Invalid share class name: length {length} not in 1..=128")
            }
            Self::InvalidMetadataSymbol { length } => {
                write!(
                    f,
                    "Invalid share class symbol: length {length} not in 1..=32"
                )
            }
            Self::InvalidSalt => write!(f, "Share class salt must be non-zero"),
            Self::AlreadyUsedSalt { salt } => {
                write!(f, "Share class salt already used: {salt}")
            }
            Self::NotFound { id } => write!(f, "Share class not found: {id}"),
            Self::DecreaseMoreThanIssued { requested, issued } => {
                write!(
                    f,
                    "Issuance decrease {requested} exceeds issued total {issued}"
                )
            }
            Self::IssuanceOverflow { operation } => {
                write!(f, "Issuance arithmetic overflow in {operation}")
            }
            Self::InvalidSharePrice => write!(f, "NAV per share must be positive"),
        }
    }
}

impl std::error::Error for ShareClassError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = ShareClassError::NotFound {
            id: "pool-1-sc-1".to_string(),
        };
        assert!(format!("{err}").contains("pool-1-sc-1"));
    }

    #[test]
    fn decrease_more_than_issued_display() {
        let err = ShareClassError::DecreaseMoreThanIssued {
            requested: "100".to_string(),
            issued: "50".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn already_used_salt_display() {
        let err = ShareClassError::AlreadyUsedSalt {
            salt: "ff".to_string(),
        };
        assert!(format!("{err}").contains("ff"));
    }

    #[test]
    fn is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(ShareClassError::InvalidSalt);
        assert!(!err.to_string().is_empty());
    }
}
