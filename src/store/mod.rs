//! Dictionary tree storage and locale resolution.

pub mod arena;
pub mod dictionary;
pub mod error;
pub mod fit;
pub(crate) mod node;
pub mod record;

pub use arena::{
    DictionaryArena,
    DictionaryId,
};
pub use dictionary::Dictionary;
pub use error::DictionaryError;
pub use record::{
    Record,
    TranslationInfo,
    Value,
};
