//! Arena that owns every dictionary node of a tree.
//!
//! Dictionaries are plain handles (arena + id); parent→child links and the
//! child-resolution cache store [`DictionaryId`]s and resolve them through
//! the arena. Nodes stay registered for the lifetime of the arena, so a
//! subtree detached from its parent remains addressable through its own
//! handles.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{
    AtomicU64,
    Ordering,
};

use parking_lot::{
    Mutex,
    MutexGuard,
    RwLock,
};

use crate::store::node::Node;

/// Process-unique dictionary identifier.
///
/// Generated at node construction, immutable, and used for dictionary
/// equality. Identifiers are unique across all arenas in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DictionaryId(u64);

/// Source of process-unique identifiers.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl DictionaryId {
    /// Allocates the next process-unique identifier.
    pub(crate) fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for DictionaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DIC{}", self.0)
    }
}

/// Owned registry of dictionary nodes.
///
/// Every [`Dictionary`](crate::store::dictionary::Dictionary) is created
/// against an arena and resolves its node, and the nodes of its subtree,
/// through it. Cloning the arena is cheap and yields a handle to the same
/// registry.
#[derive(Debug, Clone, Default)]
pub struct DictionaryArena {
    /// Shared registry state.
    inner: Arc<ArenaInner>,
}

/// Shared state behind [`DictionaryArena`] handles.
#[derive(Debug, Default)]
struct ArenaInner {
    /// All nodes ever created in this arena. Entries are never removed.
    nodes: RwLock<HashMap<DictionaryId, Arc<Mutex<Node>>>>,
    /// Serializes structural re-linking so the acyclicity check cannot race.
    topology: Mutex<()>,
}

impl DictionaryArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node and returns its identifier.
    pub(crate) fn insert(&self, node: Node) -> DictionaryId {
        let id = node.id;
        self.inner.nodes.write().insert(id, Arc::new(Mutex::new(node)));
        id
    }

    /// Returns the node registered under `id`, if any.
    pub(crate) fn node(&self, id: DictionaryId) -> Option<Arc<Mutex<Node>>> {
        self.inner.nodes.read().get(&id).cloned()
    }

    /// Acquires the lock serializing structural re-linking.
    pub(crate) fn lock_topology(&self) -> MutexGuard<'_, ()> {
        self.inner.topology.lock()
    }

    /// Checks whether two arena handles share the same registry.
    pub(crate) fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns the number of nodes registered in this arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.nodes.read().len()
    }

    /// Checks whether no node has been created in this arena yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.nodes.read().is_empty()
    }
}
