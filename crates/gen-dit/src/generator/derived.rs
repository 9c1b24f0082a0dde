//! Values computed from attributes already present on an entry.
//!
//! These run in the derived pass, after every object class has filled its
//! primary attributes.

use rand::Rng;

use crate::entry::Entry;
use crate::error::GenerationError;

const PLACEHOLDER: &str = "%s";
const USERNAME_GIVEN_PREFIX: usize = 3;

/// A `%s` template filled from named attributes of the entry.
///
/// # Example
///
/// ```
/// use gen_dit::{Attribute, CompositeTemplate, Entry, EntryKind};
///
/// let template = CompositeTemplate::new("%s %s", &["givenName", "sn"]).expect("valid");
/// let mut entry = Entry::new(EntryKind::PERSON);
/// entry.push(Attribute::new("givenName", "Elvis"));
/// entry.push(Attribute::new("sn", "Presley"));
///
/// assert_eq!(template.render(&entry).expect("rendered"), "Elvis Presley");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeTemplate {
    template: String,
    attributes: Vec<String>,
}

impl CompositeTemplate {
    /// Builds a template, checking it has one `%s` per attribute name.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::PlaceholderMismatch`] when the counts differ.
    pub fn new(template: impl Into<String>, attributes: &[&str]) -> Result<Self, GenerationError> {
        let resolved = template.into();
        let expected = resolved.matches(PLACEHOLDER).count();
        if expected != attributes.len() {
            return Err(GenerationError::PlaceholderMismatch {
                template: resolved,
                expected,
                actual: attributes.len(),
            });
        }
        Ok(Self {
            template: resolved,
            attributes: attributes.iter().map(|name| (*name).to_owned()).collect(),
        })
    }

    /// Returns the attribute names read by the template.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Fills the template from the first value of each named attribute.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::MissingAttribute`] if the entry lacks any
    /// of the named attributes.
    pub fn render(&self, entry: &Entry) -> Result<String, GenerationError> {
        let mut rendered = String::with_capacity(self.template.len());
        let mut parts = self.template.split(PLACEHOLDER);
        if let Some(head) = parts.next() {
            rendered.push_str(head);
        }
        for (part, name) in parts.zip(&self.attributes) {
            rendered.push_str(entry.first(name)?.value());
            rendered.push_str(part);
        }
        Ok(rendered)
    }
}

/// Returns `true` for characters allowed in a login name.
#[must_use]
pub const fn is_login_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Builds a lowercase ASCII login from a given name, a salt letter and a
/// surname.
///
/// The first three login-safe characters of the given name are followed by
/// the salt and every login-safe character of the surname.
///
/// # Example
///
/// ```
/// use gen_dit::username;
///
/// assert_eq!(username("Élodie", "O'Brien", 'q'), "lodqobrien");
/// assert_eq!(username("Ada", "Lovelace", 'x'), "adaxlovelace");
/// ```
#[must_use]
pub fn username(given_name: &str, surname: &str, salt: char) -> String {
    given_name
        .chars()
        .filter(|c| is_login_char(*c))
        .take(USERNAME_GIVEN_PREFIX)
        .chain(std::iter::once(salt))
        .chain(surname.chars().filter(|c| is_login_char(*c)))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Draws a random lowercase ASCII letter used as username salt.
pub fn salt_letter<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(rng.random_range(b'a'..=b'z'))
}

/// Builds the login for an entry from its `givenName` and `sn`.
///
/// # Errors
///
/// Returns [`GenerationError::MissingAttribute`] if either name is absent.
pub fn username_for<R: Rng + ?Sized>(entry: &Entry, rng: &mut R) -> Result<String, GenerationError> {
    let given_name = entry.first("givenName")?.value();
    let surname = entry.first("sn")?.value();
    Ok(username(given_name, surname, salt_letter(rng)))
}

/// Builds a two-level home directory, `/home/e/elvis` for `elvis`.
///
/// # Errors
///
/// Returns [`GenerationError::MissingAttribute`] when the entry has no `uid`
/// and [`GenerationError::EmptyValue`] when the `uid` is empty.
pub fn home_directory(entry: &Entry) -> Result<String, GenerationError> {
    let login = entry.first("uid")?.value();
    let initial = login.chars().next().ok_or_else(|| GenerationError::EmptyValue {
        name: "uid".to_owned(),
    })?;
    Ok(format!("/home/{initial}/{login}"))
}
