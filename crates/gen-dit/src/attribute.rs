//! Attribute name/value pairs and their LDIF separators.
//!
//! Values are held decoded. A value that is not an LDIF safe string is
//! rendered base64 encoded behind the `::` separator.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// How an attribute value is introduced on its LDIF line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Separator {
    /// Plain text value (`name: value`).
    #[default]
    Text,
    /// Value is a URL the loader dereferences (`name:< file:///...`).
    Url,
    /// Value is base64 encoded on output (`name:: ...`).
    Base64,
}

/// Reports whether `value` may be written verbatim after a `:` separator.
///
/// Safe strings hold only ASCII other than NUL, LF and CR, do not start with
/// a space, `:` or `<`, and do not end with a space.
///
/// # Example
///
/// ```
/// use gen_dit::is_safe_string;
///
/// assert!(is_safe_string("Garcia"));
/// assert!(!is_safe_string("García"));
/// assert!(!is_safe_string(":colon"));
/// ```
#[must_use]
pub fn is_safe_string(value: &str) -> bool {
    let mut bytes = value.bytes();
    let Some(first) = bytes.next() else {
        return true;
    };
    is_safe_init_char(first) && bytes.all(is_safe_char) && !value.ends_with(' ')
}

const fn is_safe_char(byte: u8) -> bool {
    byte.is_ascii() && !matches!(byte, b'\0' | b'\n' | b'\r')
}

const fn is_safe_init_char(byte: u8) -> bool {
    is_safe_char(byte) && !matches!(byte, b' ' | b':' | b'<')
}

impl Separator {
    /// Returns the separator as it appears between name and value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => ":",
            Self::Url => ":<",
            Self::Base64 => "::",
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single attribute value attached to an entry.
///
/// # Example
///
/// ```
/// use gen_dit::{Attribute, Separator};
///
/// let attr = Attribute::new("domain", "example");
/// assert_eq!(attr.separator(), Separator::Text);
/// assert_eq!(attr.to_string(), "domain: example");
///
/// let accented = Attribute::new("sn", "García");
/// assert_eq!(accented.separator(), Separator::Base64);
/// assert_eq!(accented.value(), "García");
/// assert_eq!(accented.to_string(), "sn:: R2FyY8OtYQ==");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    name: String,
    value: String,
    separator: Separator,
}

impl Attribute {
    /// Creates a text attribute, switching to base64 output when the value
    /// is not a safe string.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let resolved = value.into();
        let separator = if is_safe_string(&resolved) {
            Separator::Text
        } else {
            Separator::Base64
        };
        Self::with_separator(name, resolved, separator)
    }

    /// Creates an attribute with an explicit separator.
    pub fn with_separator(
        name: impl Into<String>,
        value: impl Into<String>,
        separator: Separator,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            separator,
        }
    }

    /// Returns the attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the decoded attribute value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the separator used when rendering.
    #[must_use]
    pub const fn separator(&self) -> Separator {
        self.separator
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.separator {
            Separator::Base64 => {
                let encoded = STANDARD.encode(&self.value);
                write!(f, "{}{} {encoded}", self.name, self.separator)
            }
            Separator::Text | Separator::Url => {
                write!(f, "{}{} {}", self.name, self.separator, self.value)
            }
        }
    }
}
