//! Bulk (de)serialization of dictionary trees.

pub mod document;

pub use document::{
    DictionaryDocument,
    LoadError,
    load_path,
    load_reader,
    load_str,
};
