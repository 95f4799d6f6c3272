//! Errors for structural dictionary tree operations.

use thiserror::Error;

use crate::store::arena::DictionaryId;

/// Defines errors that may occur when re-linking the dictionary tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictionaryError {
    /// The two dictionaries belong to different arenas.
    #[error("dictionary {child} belongs to a different arena than {parent}")]
    ArenaMismatch {
        /// Dictionary the child was being attached to.
        parent: DictionaryId,
        /// Dictionary that was being attached.
        child: DictionaryId,
    },
    /// Attaching the child would make a dictionary its own ancestor.
    #[error("attaching {child} to {parent} would create a cycle")]
    Cycle {
        /// Dictionary the child was being attached to.
        parent: DictionaryId,
        /// Dictionary that was being attached.
        child: DictionaryId,
    },
}
