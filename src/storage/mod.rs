//! This module defines where the console keeps data between runs.
pub mod history;

pub use history::{HistoryStore, MemoryHistoryStore, SledHistoryStore};
