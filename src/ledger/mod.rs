//! Settlement layer client.
//!
//! Game actions taken by the protagonist are submitted to a ledger, which records them
//! and returns a receipt. The game engine never waits on these calls directly.

pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use client::{Ledger, OfflineLedger};
pub use error::LedgerError;
pub use retry::RetryingLedger;
pub use types::{LedgerAction, LedgerSnapshot, Receipt};
