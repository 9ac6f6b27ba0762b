//! Share class metadata with validated name and symbol.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::share_class::errors::ShareClassError;

/// Maximum name length in characters.
pub const MAX_NAME_LEN: usize = 128;

/// Maximum symbol length in characters.
pub const MAX_SYMBOL_LEN: usize = 32;

/// Validated name + symbol pair for a share class token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareClassMetadata {
    name: String,
    symbol: String,
}

impl ShareClassMetadata {
    /// Create validated metadata.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMetadataName` if the name is empty or longer than 128
    /// characters, `InvalidMetadataSymbol` if the symbol is empty or longer
    /// than 32 characters.
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Result<Self, ShareClassError> {
        let name = name.into();
        let symbol = symbol.into();

        let name_chars = name.chars().count();
        if name_chars == 0 || name_chars > MAX_NAME_LEN {
            return Err(ShareClassError::InvalidMetadataName { length: name_chars });
        }
        let symbol_chars = symbol.chars().count();
        if symbol_chars == 0 || symbol_chars > MAX_SYMBOL_LEN {
            return Err(ShareClassError::InvalidMetadataSymbol {
                length: symbol_chars,
            });
        }

        Ok(Self { name, symbol })
    }

    /// The share class token name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The share class token symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl fmt::Display for ShareClassMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.symbol)
    }
}
