// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credit ledger

use chrono::{DateTime, Utc};
use revo_core::{IdGen, UuidIdGen};
use revo_storage::{JsonStore, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur in ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("amount must be >= 1")]
    InvalidAmount,
    #[error("insufficient credits: balance={balance}, required={required}")]
    InsufficientCredits { balance: i64, required: i64 },
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Kind of a ledger transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnKind {
    Topup,
    Reserve,
    Refund,
}

/// An immutable ledger entry; the signed amount is the balance delta
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub amount: i64,
    pub kind: TxnKind,
    pub reason: String,
    pub ref_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Persisted snapshot shape: `{balances, transactions}`
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerSnapshot {
    balances: BTreeMap<String, i64>,
    transactions: Vec<Transaction>,
}

/// Credit ledger with a single lock over balances and the transaction log.
///
/// Every mutation appends a transaction and rewrites the snapshot while
/// still holding the lock. Refunds are not deduplicated here; issuing a
/// refund at most once per reservation is the orchestrator's job.
pub struct CreditLedger<I: IdGen = UuidIdGen> {
    store: JsonStore,
    id_gen: I,
    inner: Mutex<LedgerSnapshot>,
}

impl CreditLedger<UuidIdGen> {
    /// Open a ledger at the given snapshot store
    pub fn open(store: JsonStore) -> Self {
        Self::open_with_ids(store, UuidIdGen)
    }
}

impl<I: IdGen> CreditLedger<I> {
    /// Open a ledger with a custom ID generator (tests)
    pub fn open_with_ids(store: JsonStore, id_gen: I) -> Self {
        let inner = Mutex::new(store.load());
        Self {
            store,
            id_gen,
            inner,
        }
    }

    /// Current balance; unknown users have balance 0
    pub fn get_balance(&self, user_id: &str) -> i64 {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.balances.get(user_id).copied().unwrap_or(0)
    }

    /// Add credits to a user's balance
    pub fn topup(
        &self,
        user_id: &str,
        amount: i64,
        reason: &str,
    ) -> Result<Transaction, LedgerError> {
        if amount < 1 {
            return Err(LedgerError::InvalidAmount);
        }
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *inner.balances.entry(user_id.to_string()).or_insert(0) += amount;
        let txn = self.append(&mut inner, user_id, amount, TxnKind::Topup, reason, None)?;
        tracing::info!(user_id, amount, "credits topped up");
        Ok(txn)
    }

    /// Reserve credits against a job.
    ///
    /// Fails without touching the balance when the user cannot cover the
    /// amount. The appended transaction carries a negative amount.
    pub fn reserve(
        &self,
        user_id: &str,
        amount: i64,
        ref_id: &str,
    ) -> Result<Transaction, LedgerError> {
        if amount < 1 {
            return Err(LedgerError::InvalidAmount);
        }
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let balance = inner.balances.get(user_id).copied().unwrap_or(0);
        if balance < amount {
            return Err(LedgerError::InsufficientCredits {
                balance,
                required: amount,
            });
        }
        inner.balances.insert(user_id.to_string(), balance - amount);
        let txn = self.append(
            &mut inner,
            user_id,
            -amount,
            TxnKind::Reserve,
            "job_reserve",
            Some(ref_id),
        )?;
        tracing::info!(user_id, amount, ref_id, "credits reserved");
        Ok(txn)
    }

    /// Return previously reserved credits to the user
    pub fn refund(
        &self,
        user_id: &str,
        amount: i64,
        ref_id: &str,
    ) -> Result<Transaction, LedgerError> {
        if amount < 1 {
            return Err(LedgerError::InvalidAmount);
        }
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *inner.balances.entry(user_id.to_string()).or_insert(0) += amount;
        let txn = self.append(
            &mut inner,
            user_id,
            amount,
            TxnKind::Refund,
            "job_refund",
            Some(ref_id),
        )?;
        tracing::info!(user_id, amount, ref_id, "credits refunded");
        Ok(txn)
    }

    /// Transactions in insertion order, optionally filtered by user
    pub fn list_transactions(&self, user_id: Option<&str>) -> Vec<Transaction> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .transactions
            .iter()
            .filter(|t| user_id.is_none_or(|u| t.user_id == u))
            .cloned()
            .collect()
    }

    fn append(
        &self,
        inner: &mut LedgerSnapshot,
        user_id: &str,
        amount: i64,
        kind: TxnKind,
        reason: &str,
        ref_id: Option<&str>,
    ) -> Result<Transaction, LedgerError> {
        let txn = Transaction {
            id: self.id_gen.next(),
            user_id: user_id.to_string(),
            amount,
            kind,
            reason: reason.to_string(),
            ref_id: ref_id.map(str::to_string),
            created_at: Utc::now(),
        };
        inner.transactions.push(txn.clone());
        self.store.save(inner)?;
        Ok(txn)
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
