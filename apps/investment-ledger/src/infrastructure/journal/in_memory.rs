//! In-memory double-entry journal.
//!
//! Keeps every scope and its postings. A scope that fails to balance stays
//! open, so tests and reconciliation can inspect what was posted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::application::ports::{
    AccountingJournalPort, JournalEntry, JournalError, JournalScopeId,
};

#[derive(Debug, Clone)]
struct Scope {
    description: String,
    entries: Vec<JournalEntry>,
    closed: bool,
}

/// In-memory implementation of `AccountingJournalPort`.
#[derive(Debug, Default)]
pub struct InMemoryJournal {
    next_id: AtomicU64,
    scopes: RwLock<HashMap<u64, Scope>>,
}

impl InMemoryJournal {
    /// Create a new empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            scopes: RwLock::new(HashMap::new()),
        }
    }

    /// Number of scopes that were opened but never closed.
    #[must_use]
    pub fn open_scopes(&self) -> usize {
        let scopes = self.scopes.read().unwrap_or_else(PoisonError::into_inner);
        scopes.values().filter(|s| !s.closed).count()
    }

    /// Entries posted into a scope, in posting order.
    #[must_use]
    pub fn entries(&self, scope: JournalScopeId) -> Vec<JournalEntry> {
        let scopes = self.scopes.read().unwrap_or_else(PoisonError::into_inner);
        scopes
            .get(&scope.value())
            .map(|s| s.entries.clone())
            .unwrap_or_default()
    }

    /// Net balance of an account across all closed scopes, as
    /// (debits, credits).
    #[must_use]
    pub fn account_totals(&self, account: &str) -> (u128, u128) {
        let scopes = self.scopes.read().unwrap_or_else(PoisonError::into_inner);
        scopes
            .values()
            .filter(|s| s.closed)
            .flat_map(|s| s.entries.iter())
            .filter(|e| e.account == account)
            .fold((0, 0), |(d, c), e| (d + e.debit, c + e.credit))
    }
}

#[async_trait]
impl AccountingJournalPort for InMemoryJournal {
    async fn open(&self, description: &str) -> Result<JournalScopeId, JournalError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut scopes = self.scopes.write().unwrap_or_else(PoisonError::into_inner);
        scopes.insert(
            id,
            Scope {
                description: description.to_string(),
                entries: Vec::new(),
                closed: false,
            },
        );
        Ok(JournalScopeId::new(id))
    }

    async fn post(&self, scope: JournalScopeId, entry: JournalEntry) -> Result<(), JournalError> {
        let mut scopes = self.scopes.write().unwrap_or_else(PoisonError::into_inner);
        let state = scopes
            .get_mut(&scope.value())
            .filter(|s| !s.closed)
            .ok_or(JournalError::ScopeNotFound {
                scope: scope.value(),
            })?;
        state.entries.push(entry);
        Ok(())
    }

    async fn close(&self, scope: JournalScopeId) -> Result<(), JournalError> {
        let mut scopes = self.scopes.write().unwrap_or_else(PoisonError::into_inner);
        let state = scopes
            .get_mut(&scope.value())
            .filter(|s| !s.closed)
            .ok_or(JournalError::ScopeNotFound {
                scope: scope.value(),
            })?;

        let debits: u128 = state.entries.iter().map(|e| e.debit).sum();
        let credits: u128 = state.entries.iter().map(|e| e.credit).sum();
        if debits != credits {
            tracing::warn!(
                scope = scope.value(),
                description = %state.description,
                debits,
                credits,
                "journal scope does not balance"
            );
            return Err(JournalError::Unbalanced {
                scope: scope.value(),
                debits,
                credits,
            });
        }
        state.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn balanced_scope_closes() {
        let journal = InMemoryJournal::new();
        let scope = journal.open("transfer").await.unwrap();
        journal
            .post(scope, JournalEntry::debit("a", 100))
            .await
            .unwrap();
        journal
            .post(scope, JournalEntry::credit("b", 100))
            .await
            .unwrap();

        journal.close(scope).await.unwrap();
        assert_eq!(journal.open_scopes(), 0);
        assert_eq!(journal.account_totals("a"), (100, 0));
        assert_eq!(journal.account_totals("b"), (0, 100));
    }

    #[tokio::test]
    async fn unbalanced_scope_stays_open() {
        let journal = InMemoryJournal::new();
        let scope = journal.open("bad transfer").await.unwrap();
        journal
            .post(scope, JournalEntry::debit("a", 100))
            .await
            .unwrap();
        journal
            .post(scope, JournalEntry::credit("b", 99))
            .await
            .unwrap();

        let err = journal.close(scope).await.unwrap_err();
        assert!(matches!(err, JournalError::Unbalanced { .. }));
        assert_eq!(journal.open_scopes(), 1);
    }

    #[tokio::test]
    async fn post_to_closed_scope_fails() {
        let journal = InMemoryJournal::new();
        let scope = journal.open("empty").await.unwrap();
        journal.close(scope).await.unwrap();

        let err = journal
            .post(scope, JournalEntry::debit("a", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::ScopeNotFound { .. }));
    }

    #[tokio::test]
    async fn unknown_scope_fails() {
        let journal = InMemoryJournal::new();
        let err = journal.close(JournalScopeId::new(42)).await.unwrap_err();
        assert!(matches!(err, JournalError::ScopeNotFound { .. }));
    }
}
