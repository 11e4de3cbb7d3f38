//! The [`Document`] trait.

use serde::Serialize;

/// An entity that can be bulk-inserted.
///
/// The identifier is owned by the store: it is `None` on a fresh entity,
/// filled in by the bulk-insert session when the entity is stored, and
/// cleared by the caller before the same instance is stored again.
pub trait Document: Serialize {
    /// Collection (table) the entity is written to.
    const COLLECTION: &'static str;

    /// Current identifier, if one has been assigned.
    fn id(&self) -> Option<&str>;

    /// Assign the identifier.
    fn set_id(&mut self, id: String);

    /// Clear the identifier so the next insert creates a new document.
    fn clear_id(&mut self);
}
