//! Domain layer: the ledger's data model, money arithmetic and storage ports.
//!
//! Nothing here computes balances; it only describes what a project snapshot
//! contains and how amounts are represented and rounded.

pub mod money;
pub mod ports;
pub mod project;
