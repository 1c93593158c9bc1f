// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! revo-storage: JSON snapshot persistence
//!
//! A named snapshot is a single JSON document replaced atomically on every
//! save (write to a temp sibling, fsync, rename). The ledger and the
//! profile store both persist through the same [`JsonStore`] contract.

pub mod profiles;
pub mod snapshot;

pub use profiles::{Profile, ProfileStore};
pub use snapshot::{JsonStore, StoreError};
