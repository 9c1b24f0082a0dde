//! Directory entries stored as ordered multimaps of attributes.
//!
//! An [`Entry`] keeps its attributes in insertion order and allows several
//! values under the same name. Lookups always return a sequence so callers
//! never have to guess whether an attribute is single- or multi-valued.

use crate::attribute::Attribute;
use crate::error::GenerationError;

/// Static description of one kind of entry and where it sits in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryKind {
    label: &'static str,
    rdn: &'static str,
    container: Option<&'static str>,
    is_root: bool,
}

impl EntryKind {
    /// A person under `ou=People`, named by `uid`.
    pub const PERSON: Self = Self::new("person", "uid", Some("ou=People"));
    /// A group under `ou=Groups`, named by `cn`.
    pub const GROUP: Self = Self::new("group", "cn", Some("ou=Groups"));
    /// An organisational unit directly below the suffix, named by `ou`.
    pub const ORGANIZATIONAL_UNIT: Self = Self::new("organizationalUnit", "ou", None);
    /// A domain component directly below the suffix, named by `dc`.
    pub const DOMAIN: Self = Self::new("domain", "dc", None);
    /// The root domain entry whose DN is the suffix itself.
    pub const ROOT_DOMAIN: Self = Self {
        label: "domain",
        rdn: "dc",
        container: None,
        is_root: true,
    };

    /// Describes a non-root entry kind.
    #[must_use]
    pub const fn new(label: &'static str, rdn: &'static str, container: Option<&'static str>) -> Self {
        Self {
            label,
            rdn,
            container,
            is_root: false,
        }
    }

    /// Returns the human-readable kind label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Returns the name of the attribute used as the RDN.
    #[must_use]
    pub const fn rdn(&self) -> &'static str {
        self.rdn
    }

    /// Returns the intermediate container placed between RDN and suffix.
    #[must_use]
    pub const fn container(&self) -> Option<&'static str> {
        self.container
    }

    /// Returns `true` when the entry's DN is the global suffix itself.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.is_root
    }
}

/// A directory entry: an ordered list of attributes plus its kind.
///
/// # Example
///
/// ```
/// use gen_dit::{Attribute, Entry, EntryKind};
///
/// let mut entry = Entry::new(EntryKind::GROUP);
/// entry.push(Attribute::new("cn", "wheel"));
/// entry.push(Attribute::new("memberUid", "adaa"));
/// entry.push(Attribute::new("memberUid", "grace"));
///
/// assert_eq!(entry.values("memberUid").len(), 2);
/// assert_eq!(entry.dn("dc=example,dc=com"), "cn=wheel,ou=Groups,dc=example,dc=com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    kind: EntryKind,
    attributes: Vec<Attribute>,
}

impl Entry {
    /// Creates an empty entry of the given kind.
    #[must_use]
    pub const fn new(kind: EntryKind) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
        }
    }

    /// Returns the entry kind.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Appends an attribute, keeping any existing values of the same name.
    pub fn push(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    /// Returns every value stored under `name`, in insertion order.
    #[must_use]
    pub fn values(&self, name: &str) -> Vec<&Attribute> {
        self.attributes
            .iter()
            .filter(|attr| attr.name() == name)
            .collect()
    }

    /// Returns the first value stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::MissingAttribute`] when the entry has no
    /// attribute of that name.
    pub fn first(&self, name: &str) -> Result<&Attribute, GenerationError> {
        self.attributes
            .iter()
            .find(|attr| attr.name() == name)
            .ok_or_else(|| GenerationError::MissingAttribute {
                name: name.to_owned(),
            })
    }

    /// Returns `true` when at least one value is stored under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr.name() == name)
    }

    /// Returns the distinct attribute names in first-seen order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for attr in &self.attributes {
            if !names.contains(&attr.name()) {
                names.push(attr.name());
            }
        }
        names
    }

    /// Returns all attributes in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Returns the value of the entry's RDN attribute.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::MissingAttribute`] when the RDN attribute
    /// has not been set yet.
    pub fn identifier(&self) -> Result<&str, GenerationError> {
        self.first(self.kind.rdn).map(Attribute::value)
    }

    /// Computes the distinguished name below `suffix`.
    ///
    /// Root entries return the suffix verbatim. An entry whose RDN attribute
    /// is not set yet gets a `(new <kind>)` placeholder value.
    #[must_use]
    pub fn dn(&self, suffix: &str) -> String {
        if self.kind.is_root {
            return suffix.to_owned();
        }
        let rdn_value = self
            .identifier()
            .map_or_else(|_| format!("(new {})", self.kind.label), ToOwned::to_owned);
        let mut dn = format!("{}={rdn_value},", self.kind.rdn);
        if let Some(container) = self.kind.container {
            dn.push_str(container);
            dn.push(',');
        }
        dn.push_str(suffix);
        dn
    }
}
