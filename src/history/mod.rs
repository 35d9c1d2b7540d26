//! Calculation history.
//!
//! Best-effort JSON persistence of past inputs and results, one file per
//! tool. The calculators do not depend on it.

mod store;

// Re-export public types
pub use store::{HistoryEntry, HistoryStore};
