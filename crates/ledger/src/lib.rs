// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! revo-ledger: per-user credit balances with an append-only transaction log
//!
//! Balances and the transaction log are guarded by a single mutex and
//! persisted as one snapshot inside that lock, so a user's balance always
//! equals the sum of their transaction amounts on disk.

pub mod ledger;

pub use ledger::{CreditLedger, LedgerError, Transaction, TxnKind};
