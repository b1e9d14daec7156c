//! Application layer: the ledger computations.
//!
//! Data flows one way. [`allocator`] splits each expense, [`balances`] folds
//! allocations and adjustments into per-member totals, and [`settlement`] and
//! [`netting`] turn those into transfer lists. [`engine::Ledger`] ties them
//! together over a borrowed project snapshot.

pub mod allocator;
pub mod balances;
pub mod engine;
pub mod netting;
pub mod settlement;
