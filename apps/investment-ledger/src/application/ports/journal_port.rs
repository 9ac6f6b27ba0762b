//! Accounting Journal Port (Driven Port)
//!
//! Interface for double-entry bookkeeping around money-moving operations.
//! Each operation opens a scope, posts its entries and closes the scope;
//! closing fails unless debits equal credits. A failed operation leaves its
//! scope open so the imbalance stays visible for reconciliation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Handle of an open journal scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JournalScopeId(u64);

impl JournalScopeId {
    /// Create a scope id from its raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw scope id.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// One posting line. Amounts are atoms of whatever unit the account carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Account the entry posts to.
    pub account: String,
    /// Debit atoms.
    pub debit: u128,
    /// Credit atoms.
    pub credit: u128,
}

impl JournalEntry {
    /// A debit posting.
    #[must_use]
    pub fn debit(account: impl Into<String>, atoms: u128) -> Self {
        Self {
            account: account.into(),
            debit: atoms,
            credit: 0,
        }
    }

    /// A credit posting.
    #[must_use]
    pub fn credit(account: impl Into<String>, atoms: u128) -> Self {
        Self {
            account: account.into(),
            debit: 0,
            credit: atoms,
        }
    }
}

/// Journal error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JournalError {
    /// Scope id does not refer to an open scope.
    #[error("Journal scope not open: {scope}")]
    ScopeNotFound {
        /// Scope id.
        scope: u64,
    },

    /// Scope closed with unequal debits and credits.
    #[error("Journal scope {scope} unbalanced: debits {debits}, credits {credits}")]
    Unbalanced {
        /// Scope id.
        scope: u64,
        /// Total debit atoms.
        debits: u128,
        /// Total credit atoms.
        credits: u128,
    },

    /// Journal backend failure.
    #[error("Journal storage error: {message}")]
    Storage {
        /// Error message.
        message: String,
    },
}

/// Port for the double-entry journal.
#[async_trait]
pub trait AccountingJournalPort: Send + Sync {
    /// Open a scope for one operation.
    async fn open(&self, description: &str) -> Result<JournalScopeId, JournalError>;

    /// Post an entry into an open scope.
    async fn post(&self, scope: JournalScopeId, entry: JournalEntry) -> Result<(), JournalError>;

    /// Close a scope, validating that it balances.
    async fn close(&self, scope: JournalScopeId) -> Result<(), JournalError>;
}

/// Journal that accepts everything and records nothing. For tests.
#[derive(Debug, Clone, Default)]
pub struct NoOpJournal;

#[async_trait]
impl AccountingJournalPort for NoOpJournal {
    async fn open(&self, _description: &str) -> Result<JournalScopeId, JournalError> {
        Ok(JournalScopeId::new(0))
    }

    async fn post(&self, _scope: JournalScopeId, _entry: JournalEntry) -> Result<(), JournalError> {
        Ok(())
    }

    async fn close(&self, _scope: JournalScopeId) -> Result<(), JournalError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_constructors() {
        let d = JournalEntry::debit("investor:alice", 100);
        assert_eq!(d.debit, 100);
        assert_eq!(d.credit, 0);

        let c = JournalEntry::credit("lane:pending", 100);
        assert_eq!(c.credit, 100);
        assert_eq!(c.debit, 0);
    }

    #[tokio::test]
    async fn no_op_journal_accepts_everything() {
        let journal = NoOpJournal;
        let scope = journal.open("test").await.unwrap();
        journal
            .post(scope, JournalEntry::debit("a", 1))
            .await
            .unwrap();
        journal.close(scope).await.unwrap();
    }
}
