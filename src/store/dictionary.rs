//! Public dictionary handle: resolution, mutation and locale aggregation.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::locale::Locale;
use crate::store::arena::{
    DictionaryArena,
    DictionaryId,
};
use crate::store::error::DictionaryError;
use crate::store::fit::{
    self,
    LocaleFit,
};
use crate::store::node::Node;
use crate::store::record::{
    Record,
    TranslationInfo,
};

/// Source label put on synthesized translation metadata.
const GENERATED_SOURCE: &str = "generated";

/// A node in a tree of translation containers.
///
/// A dictionary holds localized [`Record`]s and child dictionaries, resolves
/// fully-qualified keys across its subtree with locale fallback, and caches
/// resolutions per (key, locale) pair. Handles are cheap to clone; all
/// handles to the same node observe the same state.
///
/// Every operation serializes on the node's own lock. Recursive operations
/// lock each visited descendant independently, so a tree-wide lookup is not
/// atomic with respect to concurrent mutation of other nodes.
///
/// # Examples
/// ```
/// use i18n_dictionary::{Dictionary, DictionaryArena, Locale, Record, Value};
///
/// let arena = DictionaryArena::new();
/// let dictionary = Dictionary::new(&arena, Some("app"), None);
/// dictionary.add_record(Record::new(
///     "title",
///     vec![Value::new(Locale::new("en"), "Title")],
/// ));
///
/// let record = dictionary.record("app.title", &Locale::new("en")).unwrap();
/// assert_eq!(record.value(&Locale::new("en")).unwrap().text(), "Title");
/// ```
#[derive(Debug, Clone)]
pub struct Dictionary {
    /// Arena the node lives in.
    arena: DictionaryArena,
    /// Identifier of the node this handle addresses.
    id: DictionaryId,
}

impl PartialEq for Dictionary {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Dictionary {}

impl std::hash::Hash for Dictionary {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Dictionary {
    /// Creates an empty dictionary in the given arena.
    #[must_use]
    pub fn new(arena: &DictionaryArena, prefix: Option<&str>, name: Option<&str>) -> Self {
        Self::register(arena, Node::new(prefix, name))
    }

    /// Creates an empty dictionary with only a key prefix.
    #[must_use]
    pub fn with_prefix(arena: &DictionaryArena, prefix: &str) -> Self {
        Self::new(arena, Some(prefix), None)
    }

    /// Registers a pre-built node and returns a handle to it.
    pub(crate) fn register(arena: &DictionaryArena, node: Node) -> Self {
        let id = arena.insert(node);
        Self { arena: arena.clone(), id }
    }

    /// Returns the process-unique identifier of this dictionary.
    #[must_use]
    pub fn id(&self) -> DictionaryId {
        self.id
    }

    /// Returns the arena this dictionary lives in.
    #[must_use]
    pub fn arena(&self) -> &DictionaryArena {
        &self.arena
    }

    /// Resolves this handle's node in the arena.
    fn node(&self) -> Option<Arc<Mutex<Node>>> {
        self.arena.node(self.id)
    }

    /// Builds a sibling handle for another node of the same arena.
    fn handle(&self, id: DictionaryId) -> Self {
        Self { arena: self.arena.clone(), id }
    }

    /// Returns the dictionary name, if any.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.node().and_then(|node| node.lock().name.clone())
    }

    /// Sets the dictionary name.
    pub fn set_name(&self, name: Option<&str>) {
        if let Some(node) = self.node() {
            node.lock().name = name.map(str::to_string);
        }
    }

    /// Returns the dictionary key prefix, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<String> {
        self.node().and_then(|node| node.lock().prefix.clone())
    }

    /// Sets the dictionary key prefix.
    ///
    /// Every cached resolution of this node keys on the old prefix, so all
    /// caches of the node are torn down.
    pub fn set_prefix(&self, prefix: Option<&str>) {
        if let Some(node) = self.node() {
            let mut guard = node.lock();
            guard.prefix = prefix.map(str::to_string);
            guard.flush_caches();
        }
    }

    // ---------------------------------------------------------------- records

    /// Returns the records of this dictionary, not counting children.
    #[must_use]
    pub fn records(&self) -> Vec<Arc<Record>> {
        self.node().map(|node| node.lock().records.clone()).unwrap_or_default()
    }

    /// Returns the number of records in this dictionary, not counting
    /// children.
    #[must_use]
    pub fn records_count(&self) -> usize {
        self.node().map(|node| node.lock().records.len()).unwrap_or_default()
    }

    /// Returns the total number of records in this dictionary and all of
    /// its children.
    #[must_use]
    pub fn total_records_count(&self) -> usize {
        let Some(node) = self.node() else { return 0 };
        let guard = node.lock();
        let mut count = guard.records.len();
        for child_id in guard.children.clone() {
            count += self.handle(child_id).total_records_count();
        }
        count
    }

    /// Adds a record to this dictionary and returns its shared handle.
    ///
    /// Cached resolutions within the record's key space are evicted; locale
    /// aggregations are recomputed on next use.
    pub fn add_record(&self, record: Record) -> Arc<Record> {
        let record = Arc::new(record);
        if let Some(node) = self.node() {
            let mut guard = node.lock();
            guard.records.push(Arc::clone(&record));
            guard.invalidate_record_key(record.key());
        }
        record
    }

    /// Removes the first record with the given local key, returning it.
    pub fn remove_record(&self, key: &str) -> Option<Arc<Record>> {
        let node = self.node()?;
        let mut guard = node.lock();
        let index = guard.records.iter().position(|record| record.key() == key)?;
        let removed = guard.records.remove(index);
        guard.invalidate_record_key(key);
        Some(removed)
    }

    /// Removes all records of this dictionary, discarding the record cache
    /// entirely.
    pub fn clear_records(&self) {
        if let Some(node) = self.node() {
            let mut guard = node.lock();
            if !guard.records.is_empty() {
                guard.records.clear();
                guard.clear_locale_caches();
                guard.caches.records = None;
            }
        }
    }

    // ------------------------------------------------------------- resolution

    /// Resolves the most locale-fitting record for a fully-qualified key,
    /// searching this dictionary and all descendants.
    ///
    /// A key that does not start with this dictionary's effective prefix
    /// resolves to `None` without being cached. Resolved hits and confirmed
    /// misses are cached per (key, locale) pair; when the winning record
    /// came from a child, the child itself is cached so later lookups for
    /// the same pair skip the sibling scan.
    #[must_use]
    pub fn record(&self, key: &str, locale: &Locale) -> Option<Arc<Record>> {
        let node = self.node()?;
        let mut guard = node.lock();

        let cache_key = format!("{key}.{locale}");
        if let Some(cached) = guard.caches.records.as_ref().and_then(|cache| cache.get(&cache_key))
        {
            return cached.clone();
        }

        let sub_key = key.strip_prefix(&guard.usable_prefix())?.to_string();

        let cached_child =
            guard.caches.children.as_ref().and_then(|cache| cache.get(&cache_key)).copied();
        if let Some(child_id) = cached_child {
            return self.handle(child_id).record(&sub_key, locale);
        }

        // Most fitting record within this dictionary
        let mut best: Option<Arc<Record>> = None;
        let mut best_fit = LocaleFit::None;
        let mut source: Option<DictionaryId> = None;
        for record in &guard.records {
            if record.key() == sub_key {
                let record_fit = fit::record_fit(record, locale);
                if best.is_none() || record_fit > best_fit {
                    best = Some(Arc::clone(record));
                    best_fit = record_fit;
                }
            }
        }

        // Most fitting record within the children; a child only displaces
        // the running best on a strictly better fit
        for child_id in guard.children.clone() {
            if let Some(candidate) = self.handle(child_id).record(&sub_key, locale) {
                let record_fit = fit::record_fit(&candidate, locale);
                if best.is_none() || record_fit > best_fit {
                    best = Some(candidate);
                    best_fit = record_fit;
                    source = Some(child_id);
                }
            }
        }

        match source {
            None => guard.cache_record(cache_key, best.clone()),
            Some(child_id) => guard.cache_child(cache_key, child_id),
        }
        best
    }

    /// Returns every fully-qualified record key of this subtree.
    #[must_use]
    pub fn keys(&self) -> HashSet<String> {
        let mut keys = HashSet::new();
        self.collect_keys("", &mut keys);
        keys
    }

    /// Collects the subtree's fully-qualified keys under an outer prefix.
    pub(crate) fn collect_keys(&self, prefix: &str, keys: &mut HashSet<String>) {
        if let Some(node) = self.node() {
            let guard = node.lock();
            self.collect_keys_locked(&guard, prefix, keys);
        }
    }

    /// [`Self::collect_keys`] with this node's lock already held.
    fn collect_keys_locked(&self, node: &Node, prefix: &str, keys: &mut HashSet<String>) {
        let local_prefix = format!("{prefix}{}", node.usable_prefix());
        for record in &node.records {
            keys.insert(format!("{local_prefix}{}", record.key()));
        }
        for child_id in node.children.clone() {
            self.handle(child_id).collect_keys(&local_prefix, keys);
        }
    }

    /// Collects every record of the subtree carrying the given full key.
    fn records_for_key(&self, key: &str, results: &mut Vec<Arc<Record>>) {
        if let Some(node) = self.node() {
            let guard = node.lock();
            self.records_for_key_locked(&guard, key, results);
        }
    }

    /// [`Self::records_for_key`] with this node's lock already held.
    fn records_for_key_locked(&self, node: &Node, key: &str, results: &mut Vec<Arc<Record>>) {
        let Some(sub_key) = key.strip_prefix(&node.usable_prefix()) else {
            return;
        };
        for record in &node.records {
            if record.key() == sub_key {
                results.push(Arc::clone(record));
            }
        }
        for child_id in node.children.clone() {
            self.handle(child_id).records_for_key(sub_key, results);
        }
    }

    // --------------------------------------------------------------- children

    /// Returns handles to the child dictionaries, in insertion order.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        self.node()
            .map(|node| node.lock().children.iter().map(|id| self.handle(*id)).collect())
            .unwrap_or_default()
    }

    /// Returns the number of child dictionaries.
    #[must_use]
    pub fn children_count(&self) -> usize {
        self.node().map(|node| node.lock().children.len()).unwrap_or_default()
    }

    /// Attaches a child dictionary.
    ///
    /// The child must live in the same arena, and the attach is rejected if
    /// it would make this dictionary its own ancestor. Cached resolutions
    /// falling into the child's key space are evicted.
    pub fn add_child(&self, child: &Self) -> Result<(), DictionaryError> {
        if !self.arena.same_as(&child.arena) {
            return Err(DictionaryError::ArenaMismatch { parent: self.id, child: child.id });
        }
        let _topology = self.arena.lock_topology();
        if child.id == self.id || child.subtree_contains(self.id) {
            return Err(DictionaryError::Cycle { parent: self.id, child: child.id });
        }

        let Some(node) = self.node() else { return Ok(()) };
        let prefix = node.lock().usable_prefix();
        let mut child_keys = HashSet::new();
        child.collect_keys(&prefix, &mut child_keys);

        let mut guard = node.lock();
        guard.children.push(child.id);
        guard.invalidate_key_space(&child_keys);
        Ok(())
    }

    /// Detaches a child dictionary, returning whether it was attached.
    ///
    /// The detached subtree stays alive and usable through its own handles.
    pub fn remove_child(&self, child: &Self) -> bool {
        let Some(node) = self.node() else { return false };
        let _topology = self.arena.lock_topology();
        if !node.lock().children.contains(&child.id) {
            return false;
        }

        let prefix = node.lock().usable_prefix();
        let mut child_keys = HashSet::new();
        child.collect_keys(&prefix, &mut child_keys);

        let mut guard = node.lock();
        guard.children.retain(|id| *id != child.id);
        guard.invalidate_key_space(&child_keys);
        true
    }

    /// Detaches all child dictionaries, discarding the child cache entirely.
    pub fn clear_children(&self) {
        if let Some(node) = self.node() {
            let _topology = self.arena.lock_topology();
            let mut guard = node.lock();
            if !guard.children.is_empty() {
                guard.children.clear();
                guard.clear_locale_caches();
                guard.caches.children = None;
            }
        }
    }

    /// Checks whether `target` is this node or any of its descendants.
    ///
    /// Locks one node at a time, never nesting, so it can run while other
    /// threads traverse the tree.
    fn subtree_contains(&self, target: DictionaryId) -> bool {
        if self.id == target {
            return true;
        }
        let children = self.node().map(|node| node.lock().children.clone()).unwrap_or_default();
        children.into_iter().any(|child_id| self.handle(child_id).subtree_contains(target))
    }

    // ----------------------------------------------------------- translations

    /// Returns the explicit translation metadata of this dictionary.
    #[must_use]
    pub fn translations(&self) -> Vec<TranslationInfo> {
        self.node().map(|node| node.lock().translations.clone()).unwrap_or_default()
    }

    /// Adds explicit translation metadata to this dictionary.
    pub fn add_translation(&self, translation: TranslationInfo) {
        if let Some(node) = self.node() {
            node.lock().translations.push(translation);
        }
    }

    /// Returns the translation metadata fitting the requested locale best.
    ///
    /// Explicit metadata entries of the subtree matching the locale's
    /// language are preferred. When none exist, entries are synthesized
    /// from the first locale-bearing record found in the subtree, on the
    /// assumption that locale coverage is uniform across the tree. Returns
    /// `None` only when the subtree carries neither metadata nor any
    /// locale-bearing record.
    #[must_use]
    pub fn translation(&self, locale: &Locale) -> Option<TranslationInfo> {
        let node = self.node()?;
        let guard = node.lock();

        let mut candidates = Vec::new();
        self.collect_translations_locked(&guard, locale, &mut candidates);

        // Auto-generated metadata when none is provided anywhere in the tree
        if candidates.is_empty() {
            let mut locales = Vec::new();
            self.collect_first_locales_locked(&guard, &mut locales);
            for first_locale in locales {
                let name = first_locale.to_string();
                candidates.push(TranslationInfo::new(first_locale, name, GENERATED_SOURCE));
            }
        }

        let mut best: Option<(TranslationInfo, LocaleFit)> = None;
        for info in candidates {
            let info_fit = fit::translation_fit(&info, locale);
            if best.as_ref().is_none_or(|(_, best_fit)| info_fit > *best_fit) {
                best = Some((info, info_fit));
            }
        }
        best.map(|(info, _)| info)
    }

    /// Collects explicit metadata entries matching the locale's language.
    fn collect_translations(&self, locale: &Locale, results: &mut Vec<TranslationInfo>) {
        if let Some(node) = self.node() {
            let guard = node.lock();
            self.collect_translations_locked(&guard, locale, results);
        }
    }

    /// [`Self::collect_translations`] with this node's lock already held.
    fn collect_translations_locked(
        &self,
        node: &Node,
        locale: &Locale,
        results: &mut Vec<TranslationInfo>,
    ) {
        for translation in &node.translations {
            if translation.locale().matches_language(locale) {
                results.push(translation.clone());
            }
        }
        for child_id in node.children.clone() {
            self.handle(child_id).collect_translations(locale, results);
        }
    }

    /// Collects the locale set of the first locale-bearing record found in
    /// the subtree (own records first, then children), stopping there.
    fn collect_first_locales(&self, locales: &mut Vec<Locale>) {
        if let Some(node) = self.node() {
            let guard = node.lock();
            self.collect_first_locales_locked(&guard, locales);
        }
    }

    /// [`Self::collect_first_locales`] with this node's lock already held.
    fn collect_first_locales_locked(&self, node: &Node, locales: &mut Vec<Locale>) {
        for record in &node.records {
            record.collect_locales(locales);
            if !locales.is_empty() {
                break;
            }
        }
        if locales.is_empty() {
            for child_id in node.children.clone() {
                self.handle(child_id).collect_first_locales(locales);
                if !locales.is_empty() {
                    break;
                }
            }
        }
    }

    // --------------------------------------------------------------- locales

    /// Returns every locale appearing on any value in this subtree.
    ///
    /// Depth-first, own records before children, memoized until the next
    /// structural mutation. The result is intentionally not deduplicated: a
    /// locale carried by several records appears once per value.
    #[must_use]
    pub fn all_locales(&self) -> Vec<Locale> {
        let Some(node) = self.node() else { return Vec::new() };
        let mut guard = node.lock();
        self.all_locales_locked(&mut guard)
    }

    /// [`Self::all_locales`] with this node's lock already held.
    fn all_locales_locked(&self, node: &mut Node) -> Vec<Locale> {
        if let Some(cached) = &node.caches.all_locales {
            return cached.clone();
        }
        let mut locales = Vec::new();
        for record in &node.records {
            record.collect_locales(&mut locales);
        }
        for child_id in node.children.clone() {
            locales.extend(self.handle(child_id).all_locales());
        }
        node.caches.all_locales = Some(locales.clone());
        locales
    }

    /// Returns the locales supported across the whole subtree.
    ///
    /// A locale is supported only when every distinct key of the subtree
    /// has at least one record covering the locale's language code. Merely
    /// appearing somewhere ([`Self::all_locales`]) is not enough: a tree
    /// where most keys only carry German and French must not claim `en_US`
    /// support because of a single English record.
    #[must_use]
    pub fn supported_locales(&self) -> Vec<Locale> {
        let Some(node) = self.node() else { return Vec::new() };
        let mut guard = node.lock();
        if let Some(cached) = &guard.caches.supported_locales {
            return cached.clone();
        }

        let all_locales = self.all_locales_locked(&mut guard);

        let mut keys = HashSet::new();
        self.collect_keys_locked(&guard, "", &mut keys);

        // Intersect the language codes covered by each key
        let mut supported_codes: Option<HashSet<String>> = None;
        for key in &keys {
            let mut key_records = Vec::new();
            self.records_for_key_locked(&guard, key, &mut key_records);

            let mut key_codes = HashSet::new();
            for record in &key_records {
                let mut key_locales = Vec::new();
                record.collect_locales(&mut key_locales);
                for key_locale in key_locales {
                    key_codes.insert(key_locale.language().to_string());
                }
            }

            match &mut supported_codes {
                Some(codes) => codes.retain(|code| key_codes.contains(code)),
                None => supported_codes = Some(key_codes),
            }
        }

        let supported_codes = supported_codes.unwrap_or_default();
        let supported: Vec<Locale> = all_locales
            .into_iter()
            .filter(|locale| supported_codes.contains(locale.language()))
            .collect();
        guard.caches.supported_locales = Some(supported.clone());
        supported
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(node) = self.arena.node(self.id) else {
            return write!(f, "{}", self.id);
        };
        let guard = node.lock();
        if let Some(name) = &guard.name {
            write!(f, "{name} ")?;
        }
        if let Some(prefix) = &guard.prefix {
            write!(f, "[{prefix}] ")?;
        }
        write!(f, "[R:{}] [D:{}]", guard.records.len(), guard.children.len())
    }
}
