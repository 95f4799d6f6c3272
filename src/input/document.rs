//! External JSON document schema for dictionary trees.
//!
//! The schema maps one-to-one onto the in-memory model: a root element with
//! optional name/prefix attributes, repeated record elements, repeated
//! nested dictionaries and an optional translations block.
//!
//! ```json
//! {
//!   "prefix": "app",
//!   "records": [
//!     { "key": "title", "values": [{ "locale": "en", "text": "Title" }] }
//!   ],
//!   "dictionaries": [{ "prefix": "menu", "records": [] }],
//!   "translations": [{ "locale": "en", "name": "English", "source": "team" }]
//! }
//! ```

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::store::arena::DictionaryArena;
use crate::store::dictionary::Dictionary;
use crate::store::node::Node;
use crate::store::record::{
    Record,
    TranslationInfo,
};

/// Defines errors that may occur while loading a dictionary document.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Error when the document source cannot be read.
    #[error("Failed to read dictionary document: {0}")]
    Io(#[from] std::io::Error),
    /// Error when the document content cannot be parsed.
    #[error("Failed to parse dictionary document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One dictionary element of the external document tree.
///
/// Deserialization and materialization are separate steps: a load either
/// parses the whole document successfully or no dictionary is constructed
/// at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DictionaryDocument {
    /// Optional display label.
    pub name: Option<String>,
    /// Optional key prefix.
    pub prefix: Option<String>,
    /// Records of this element.
    pub records: Vec<Record>,
    /// Nested dictionary elements.
    pub dictionaries: Vec<DictionaryDocument>,
    /// Explicit translation metadata.
    pub translations: Vec<TranslationInfo>,
}

impl DictionaryDocument {
    /// Materializes this document into a dictionary tree in the arena.
    #[must_use]
    pub fn build(&self, arena: &DictionaryArena) -> Dictionary {
        let mut node = Node::new(self.prefix.as_deref(), self.name.as_deref());
        node.records = self.records.iter().cloned().map(Arc::new).collect();
        node.translations = self.translations.clone();
        node.children =
            self.dictionaries.iter().map(|document| document.build(arena).id()).collect();
        Dictionary::register(arena, node)
    }

    /// Exports a dictionary subtree back into document form.
    #[must_use]
    pub fn from_dictionary(dictionary: &Dictionary) -> Self {
        Self {
            name: dictionary.name(),
            prefix: dictionary.prefix(),
            records: dictionary.records().iter().map(|record| (**record).clone()).collect(),
            dictionaries: dictionary.children().iter().map(Self::from_dictionary).collect(),
            translations: dictionary.translations(),
        }
    }
}

/// Loads a dictionary tree from a JSON document string.
pub fn load_str(arena: &DictionaryArena, json: &str) -> Result<Dictionary, LoadError> {
    let document: DictionaryDocument = serde_json::from_str(json)?;
    let dictionary = document.build(arena);
    tracing::debug!(dictionary = %dictionary, "Loaded dictionary document");
    Ok(dictionary)
}

/// Loads a dictionary tree from a JSON document byte stream.
pub fn load_reader(arena: &DictionaryArena, reader: impl Read) -> Result<Dictionary, LoadError> {
    let document: DictionaryDocument = serde_json::from_reader(reader)?;
    let dictionary = document.build(arena);
    tracing::debug!(dictionary = %dictionary, "Loaded dictionary document");
    Ok(dictionary)
}

/// Loads a dictionary tree from a JSON document file.
pub fn load_path(arena: &DictionaryArena, path: &Path) -> Result<Dictionary, LoadError> {
    tracing::debug!("Loading dictionary from: {:?}", path);
    let content = std::fs::read_to_string(path)?;
    load_str(arena, &content)
}
