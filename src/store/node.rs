//! Internal dictionary node state and its transient caches.

use std::collections::{
    HashMap,
    HashSet,
};
use std::sync::Arc;

use crate::locale::Locale;
use crate::store::arena::DictionaryId;
use crate::store::record::{
    Record,
    TranslationInfo,
};

/// State of one dictionary tree node. Access is serialized by the per-node
/// mutex the arena wraps around it.
#[derive(Debug)]
pub(crate) struct Node {
    /// Process-unique identifier of this node.
    pub(crate) id: DictionaryId,
    /// Optional display label.
    pub(crate) name: Option<String>,
    /// Optional dot-segment prepended to all contained keys.
    pub(crate) prefix: Option<String>,
    /// Records of this node, in insertion order.
    pub(crate) records: Vec<Arc<Record>>,
    /// Child dictionaries, in insertion order.
    pub(crate) children: Vec<DictionaryId>,
    /// Explicit translation metadata, in insertion order.
    pub(crate) translations: Vec<TranslationInfo>,
    /// Lazily built lookup and aggregation caches.
    pub(crate) caches: Caches,
}

/// Transient caches of a node. Never persisted, rebuilt lazily after
/// structural mutation tears them down.
#[derive(Debug, Default)]
pub(crate) struct Caches {
    /// Resolved records by `full_key + "." + locale`. A cached `None` means
    /// the miss itself was confirmed and cached.
    pub(crate) records: Option<HashMap<String, Option<Arc<Record>>>>,
    /// Child that owned the match, by `full_key + "." + locale`.
    pub(crate) children: Option<HashMap<String, DictionaryId>>,
    /// Memoized result of the all-locales aggregation.
    pub(crate) all_locales: Option<Vec<Locale>>,
    /// Memoized result of the supported-locales aggregation.
    pub(crate) supported_locales: Option<Vec<Locale>>,
}

impl Node {
    /// Creates a node with a fresh process-unique identifier.
    pub(crate) fn new(prefix: Option<&str>, name: Option<&str>) -> Self {
        Self {
            id: DictionaryId::next(),
            name: name.map(str::to_string),
            prefix: prefix.map(str::to_string),
            records: Vec::new(),
            children: Vec::new(),
            translations: Vec::new(),
            caches: Caches::default(),
        }
    }

    /// Returns the effective lookup prefix: `prefix + "."` when the prefix
    /// is non-blank, the empty string otherwise.
    pub(crate) fn usable_prefix(&self) -> String {
        match &self.prefix {
            Some(prefix) if !prefix.trim().is_empty() => format!("{prefix}."),
            _ => String::new(),
        }
    }

    /// Caches a resolution owned by this node (including confirmed misses).
    pub(crate) fn cache_record(&mut self, cache_key: String, result: Option<Arc<Record>>) {
        self.caches.records.get_or_insert_with(HashMap::new).insert(cache_key, result);
    }

    /// Caches the child that owned a resolution.
    pub(crate) fn cache_child(&mut self, cache_key: String, child: DictionaryId) {
        self.caches.children.get_or_insert_with(HashMap::new).insert(cache_key, child);
    }

    /// Tears down the locale aggregation caches.
    pub(crate) fn clear_locale_caches(&mut self) {
        self.caches.all_locales = None;
        self.caches.supported_locales = None;
    }

    /// Tears down every cache of this node.
    pub(crate) fn flush_caches(&mut self) {
        self.caches = Caches::default();
    }

    /// Prunes cache entries belonging to a record with the given local key.
    ///
    /// Entries are matched by prefix against the fully-qualified key, so a
    /// mutation only evicts resolutions it could have affected. Locale
    /// aggregation caches are always torn down.
    pub(crate) fn invalidate_record_key(&mut self, local_key: &str) {
        let full_key = format!("{}{local_key}", self.usable_prefix());
        self.invalidate_key_space(&HashSet::from([full_key]));
    }

    /// Prunes cache entries whose key starts with any of the given
    /// fully-qualified keys and tears down the locale aggregation caches.
    pub(crate) fn invalidate_key_space(&mut self, full_keys: &HashSet<String>) {
        self.clear_locale_caches();
        let hits_key_space =
            |cached: &str| full_keys.iter().any(|full_key| cached.starts_with(full_key));
        if let Some(records) = &mut self.caches.records {
            records.retain(|cached, _| !hits_key_space(cached));
        }
        if let Some(children) = &mut self.caches.children {
            children.retain(|cached, _| !hits_key_space(cached));
        }
        tracing::trace!(node = %self.id, keys = full_keys.len(), "pruned resolution caches");
    }
}
