//! Queue store: the nested namespace-to-queue mapping owned by a bus.
//!
//! Keyed first by main namespace, then by [`SubKey`]. Every main namespace
//! that holds any handler also holds a queue under [`SubKey::Primary`] — the
//! superset of every handler bound under that main namespace via any path.
//!
//! This is a pure data holder; all policy (dual binding, removal semantics,
//! emission order) lives in the dispatcher.

use std::collections::HashMap;

use crate::bus::Handler;

/// Key of a queue under a main namespace.
///
/// `Primary` is the reserved always-present queue. User segments parse to
/// `Named`, so no literal segment can ever collide with the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum SubKey {
    /// The reserved primary queue for a main namespace.
    Primary,
    /// A user-supplied sub-namespace segment.
    Named(String),
}

/// A single registration: the handler plus its advisory async flag.
///
/// Keeping the flag next to its handler makes the two survive filtering
/// together; there is no parallel list to hold in lockstep.
#[derive(Clone)]
pub(crate) struct HandlerEntry {
    pub handler: Handler,
    pub is_async: bool,
}

/// Ordered handler queue for one `(main, sub)` pair.
///
/// Insertion order is registration order; duplicates are allowed.
#[derive(Default)]
pub(crate) struct Queue {
    pub entries: Vec<HandlerEntry>,
}

/// All queues of one main namespace.
pub(crate) type MainEntry = HashMap<SubKey, Queue>;

/// Registry root: main namespace name to its queues.
///
/// Cleared slots are removed outright, so a cleared namespace reads back as
/// "not found" rather than as an emptied container. Re-registering after a
/// clear is indistinguishable from first-ever registration.
#[derive(Default)]
pub(crate) struct Registry {
    mains: HashMap<String, MainEntry>,
}

impl Registry {
    /// Return the entry for `name`, creating an empty one if absent.
    pub fn ensure_main(&mut self, name: &str) -> &mut MainEntry {
        self.mains.entry(name.to_string()).or_default()
    }

    /// Return the queue under `(main, sub)`, creating it (and the main
    /// entry) if absent.
    pub fn ensure_queue(&mut self, main: &str, sub: &SubKey) -> &mut Queue {
        self.ensure_main(main).entry(sub.clone()).or_default()
    }

    /// Remove an entire main namespace, all sub-namespaces included.
    pub fn clear_main(&mut self, name: &str) {
        self.mains.remove(name);
    }

    /// Remove a single queue under `main`. The main entry itself stays.
    pub fn clear_sub(&mut self, main: &str, sub: &SubKey) {
        if let Some(entry) = self.mains.get_mut(main) {
            entry.remove(sub);
        }
    }

    pub fn main_exists(&self, name: &str) -> bool {
        self.mains.contains_key(name)
    }

    pub fn queue(&self, main: &str, sub: &SubKey) -> Option<&Queue> {
        self.mains.get(main)?.get(sub)
    }

    pub fn queue_mut(&mut self, main: &str, sub: &SubKey) -> Option<&mut Queue> {
        self.mains.get_mut(main)?.get_mut(sub)
    }
}
