//! The index: a single JSON file listing every work and its chapters, and
//! the source of truth for what exists in a quire library.

pub mod error;
pub mod models;
mod store;

pub use crate::models::{Chapter, Work};
pub use crate::store::IndexStore;
