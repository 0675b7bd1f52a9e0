//! History store.
//!
//! Repetition statistics carried across annealing runs within one
//! scenario. Each scenario owns its own [`HistoryStore`]; nothing here
//! is global.

mod store;

pub(crate) use store::{visit_subsets, Subset};
pub use store::{FoldOutcome, HistoryStore, HorizonPolicy};
