//! Two-phase reference resolution.
//!
//! During the build, declarations are [registered](ReferenceTable::register)
//! and type usages are [enqueued](ReferenceTable::enqueue) as
//! [`PendingReference`]s. Once every source unit has been visited,
//! [`ReferenceTable::finalize`] fills each pending slot whose qualified name
//! was registered. Finalize consumes the table, so it runs exactly once and
//! nothing can be registered afterwards.

use std::{
    collections::HashMap,
    sync::{Arc, OnceLock},
};

use log::{debug, trace};

use crate::{element::ElementId, identity::Identity};

/// A queued usage: the name to look up and the slot to fill.
#[derive(Debug)]
pub struct PendingReference {
    qualified_name: String,
    slot: Arc<OnceLock<ElementId>>,
}

impl PendingReference {
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }
}

/// Outcome of [`ReferenceTable::finalize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    pub declarations: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

/// Global name table plus the deferred-resolution queue.
#[derive(Debug, Default)]
pub struct ReferenceTable {
    declarations: HashMap<String, ElementId>,
    pending: Vec<PendingReference>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps the qualified name of `identity` to `element`.
    ///
    /// The first registration of a name wins; later ones are ignored.
    /// Returns `true` if the name was newly registered.
    pub fn register(&mut self, identity: &Identity, element: ElementId) -> bool {
        let Some(qualified_name) = identity.qualified_name() else {
            return false;
        };
        if self.declarations.contains_key(qualified_name) {
            debug!(qualified_name; "Duplicate declaration ignored");
            return false;
        }
        self.declarations.insert(qualified_name.to_string(), element);
        true
    }

    /// Queues `identity` and, for generic identities, every type argument.
    ///
    /// Identities without a qualified name cannot be resolved and are not
    /// queued.
    pub fn enqueue(&mut self, identity: &Identity) {
        if let Some(qualified_name) = identity.qualified_name() {
            self.pending.push(PendingReference {
                qualified_name: qualified_name.to_string(),
                slot: identity.main().slot(),
            });
        }
        for sub_type in identity.sub_types() {
            self.enqueue(sub_type);
        }
    }

    pub fn lookup(&self, qualified_name: &str) -> Option<ElementId> {
        self.declarations.get(qualified_name).copied()
    }

    pub fn pending(&self) -> &[PendingReference] {
        &self.pending
    }

    /// Resolves every pending reference against the registered declarations.
    pub fn finalize(self) -> ResolutionStats {
        let mut stats = ResolutionStats {
            declarations: self.declarations.len(),
            ..ResolutionStats::default()
        };

        for pending in self.pending {
            match self.declarations.get(&pending.qualified_name) {
                Some(&target) => {
                    // A slot shared by two queue entries keeps its first value.
                    let _ = pending.slot.set(target);
                    stats.resolved += 1;
                }
                None => {
                    trace!(qualified_name = pending.qualified_name; "Reference left unresolved");
                    stats.unresolved += 1;
                }
            }
        }

        stats
    }
}
