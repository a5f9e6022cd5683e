//! `loomledger-engine` — the inventory–outbound ledger engine.
//!
//! Owns both record collections in memory, enforces the conservation
//! invariant between them, and persists through a [`loomledger_store::LedgerStore`]
//! as the terminal step of every mutator.

pub mod engine;

pub use engine::LedgerEngine;
