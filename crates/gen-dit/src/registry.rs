//! In-memory registries keyed by each entry's identifying attribute.
//!
//! A registry keeps entries in insertion order so bulk passes (manager
//! assignment, group membership) visit people in a reproducible order for a
//! given seed.

use std::collections::HashMap;

use crate::entry::{Entry, EntryKind};
use crate::error::RegistryError;

/// Entries of one kind, unique by identifier.
///
/// # Example
///
/// ```
/// use gen_dit::{Attribute, Entry, EntryKind, Registry, RegistryError};
///
/// let mut people = Registry::new(EntryKind::PERSON);
/// let mut ada = Entry::new(EntryKind::PERSON);
/// ada.push(Attribute::new("uid", "adalovelace"));
/// people.register(ada.clone()).expect("first registration");
///
/// let result = people.register(ada);
/// assert!(matches!(result, Err(RegistryError::DuplicateIdentifier { .. })));
/// assert_eq!(people.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    kind: EntryKind,
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Creates an empty registry for entries of `kind`.
    #[must_use]
    pub fn new(kind: EntryKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Returns the entry kind this registry holds.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Adds `entry` under its identifier.
    ///
    /// The first entry registered under an identifier is kept; later ones
    /// are rejected and dropped.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingIdentifier`] if the entry lacks its
    /// RDN attribute and [`RegistryError::DuplicateIdentifier`] if the
    /// identifier is already taken.
    pub fn register(&mut self, entry: Entry) -> Result<(), RegistryError> {
        let identifier = entry
            .identifier()
            .map_err(|_| RegistryError::MissingIdentifier {
                kind: self.kind.label().to_owned(),
                attribute: self.kind.rdn().to_owned(),
            })?
            .to_owned();
        if self.index.contains_key(&identifier) {
            return Err(RegistryError::DuplicateIdentifier {
                kind: self.kind.label().to_owned(),
                identifier,
            });
        }
        self.index.insert(identifier, self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Looks up an entry by identifier.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&Entry> {
        self.index
            .get(identifier)
            .and_then(|position| self.entries.get(*position))
    }

    /// Looks up an entry by identifier for appending attributes.
    ///
    /// Callers must not change the identifying attribute.
    pub fn get_mut(&mut self, identifier: &str) -> Option<&mut Entry> {
        let position = *self.index.get(identifier)?;
        self.entries.get_mut(position)
    }

    /// Iterates entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Iterates entries mutably in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.entries.iter_mut()
    }

    /// Returns identifiers in registration order.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| entry.identifier().ok())
            .collect()
    }

    /// Returns the number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::attribute::Attribute;

    fn person(uid: &str, given_name: &str) -> Entry {
        let mut entry = Entry::new(EntryKind::PERSON);
        entry.push(Attribute::new("givenName", given_name));
        entry.push(Attribute::new("uid", uid));
        entry
    }

    #[test]
    fn duplicate_identifier_keeps_first_entry() {
        let mut registry = Registry::new(EntryKind::PERSON);
        registry.register(person("ada", "Ada")).expect("first");

        let result = registry.register(person("ada", "Adaline"));

        assert_eq!(
            result,
            Err(RegistryError::DuplicateIdentifier {
                kind: "person".to_owned(),
                identifier: "ada".to_owned(),
            })
        );
        assert_eq!(registry.len(), 1);
        let kept = registry.get("ada").expect("kept");
        assert_eq!(kept.first("givenName").expect("given name").value(), "Ada");
    }

    #[test]
    fn entry_without_rdn_is_rejected() {
        let mut registry = Registry::new(EntryKind::GROUP);
        let result = registry.register(Entry::new(EntryKind::GROUP));
        assert_eq!(
            result,
            Err(RegistryError::MissingIdentifier {
                kind: "group".to_owned(),
                attribute: "cn".to_owned(),
            })
        );
        assert!(registry.is_empty());
    }

    #[rstest]
    #[case(&["c", "a", "b"])]
    #[case(&["z"])]
    fn iteration_follows_registration_order(#[case] uids: &[&str]) {
        let mut registry = Registry::new(EntryKind::PERSON);
        for uid in uids {
            registry.register(person(uid, "Name")).expect("register");
        }
        assert_eq!(registry.identifiers(), uids);
        let iterated: Vec<&str> = registry
            .iter()
            .map(|entry| entry.identifier().expect("uid"))
            .collect();
        assert_eq!(iterated, uids);
    }

    #[test]
    fn get_mut_appends_to_registered_entry() {
        let mut registry = Registry::new(EntryKind::PERSON);
        registry.register(person("grace", "Grace")).expect("register");

        registry
            .get_mut("grace")
            .expect("registered")
            .push(Attribute::new("manager", "uid=ada,ou=People,dc=example,dc=com"));

        let entry = registry.get("grace").expect("registered");
        assert!(entry.contains("manager"));
        assert!(registry.get_mut("missing").is_none());
    }
}
