//! LDIF rendering of entries and re-parsing of rendered blocks.

use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::attribute::{Attribute, Separator};
use crate::entry::Entry;
use crate::error::LdifError;

const DN: &str = "dn";

/// Renders an entry as an LDIF block without a trailing newline.
///
/// The block starts with the `dn:` line and lists every attribute in
/// insertion order. The DN and any value that is not a safe string are
/// written base64 encoded behind `::`.
///
/// # Example
///
/// ```
/// use gen_dit::{Attribute, Entry, EntryKind, render_entry};
///
/// let mut entry = Entry::new(EntryKind::ORGANIZATIONAL_UNIT);
/// entry.push(Attribute::new("objectclass", "organizationalUnit"));
/// entry.push(Attribute::new("ou", "People"));
///
/// assert_eq!(
///     render_entry(&entry, "dc=example,dc=com"),
///     "dn: ou=People,dc=example,dc=com\nobjectclass: organizationalUnit\nou: People"
/// );
/// ```
#[must_use]
pub fn render_entry(entry: &Entry, suffix: &str) -> String {
    let mut lines = Vec::with_capacity(entry.attributes().len() + 1);
    lines.push(Attribute::new(DN, entry.dn(suffix)).to_string());
    lines.extend(entry.attributes().iter().map(ToString::to_string));
    lines.join("\n")
}

/// Writes LDIF blocks to an output stream, one blank line after each.
#[derive(Debug)]
pub struct LdifWriter<W> {
    out: W,
    suffix: String,
    written: usize,
}

impl<W: Write> LdifWriter<W> {
    /// Wraps `out`, rendering DNs below `suffix`.
    pub fn new(out: W, suffix: impl Into<String>) -> Self {
        Self {
            out,
            suffix: suffix.into(),
            written: 0,
        }
    }

    /// Writes one entry followed by a blank separator line.
    ///
    /// # Errors
    ///
    /// Returns [`LdifError::Write`] if the underlying stream fails.
    pub fn write_entry(&mut self, entry: &Entry) -> Result<(), LdifError> {
        let block = render_entry(entry, &self.suffix);
        writeln!(self.out, "{block}\n").map_err(|err| LdifError::Write {
            message: err.to_string(),
        })?;
        self.written += 1;
        Ok(())
    }

    /// Flushes the underlying stream.
    ///
    /// # Errors
    ///
    /// Returns [`LdifError::Write`] if flushing fails.
    pub fn flush(&mut self) -> Result<(), LdifError> {
        self.out.flush().map_err(|err| LdifError::Write {
            message: err.to_string(),
        })
    }

    /// Returns the number of entries written so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Returns the wrapped stream.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// A parsed LDIF block: its DN and attributes in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBlock {
    /// Distinguished name from the `dn:` line.
    pub dn: String,
    /// Attributes in the order they appeared.
    pub attributes: Vec<Attribute>,
}

/// Parses one rendered LDIF block back into its DN and attributes.
///
/// # Errors
///
/// Returns [`LdifError::MissingDn`] if the first line is not a `dn:` line and
/// [`LdifError::MalformedLine`] for lines without a separator or with a
/// base64 value that does not decode to UTF-8. Line numbers count every line
/// of the block, blank ones included.
pub fn parse_block(block: &str) -> Result<ParsedBlock, LdifError> {
    let mut lines = block
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.is_empty());

    let (dn_number, dn_line) = lines.next().ok_or(LdifError::MissingDn)?;
    if !dn_line.starts_with("dn:") {
        return Err(LdifError::MissingDn);
    }
    let dn_attribute = parse_attribute_line(dn_line, dn_number)?;
    if dn_attribute.separator() == Separator::Url {
        return Err(LdifError::MalformedLine {
            line_number: dn_number,
            line: dn_line.to_owned(),
        });
    }

    let attributes = lines
        .map(|(line_number, line)| parse_attribute_line(line, line_number))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedBlock {
        dn: dn_attribute.value().to_owned(),
        attributes,
    })
}

fn parse_attribute_line(line: &str, line_number: usize) -> Result<Attribute, LdifError> {
    let malformed = || LdifError::MalformedLine {
        line_number,
        line: line.to_owned(),
    };
    let (name, rest) = line.split_once(':').ok_or_else(malformed)?;
    if name.is_empty() {
        return Err(malformed());
    }
    let (separator, remainder) = if let Some(value) = rest.strip_prefix('<') {
        (Separator::Url, value)
    } else if let Some(value) = rest.strip_prefix(':') {
        (Separator::Base64, value)
    } else {
        (Separator::Text, rest)
    };
    let raw = remainder.strip_prefix(' ').ok_or_else(malformed)?;
    let value = match separator {
        Separator::Base64 => decode_value(raw).ok_or_else(malformed)?,
        Separator::Text | Separator::Url => raw.to_owned(),
    };
    Ok(Attribute::with_separator(name, value, separator))
}

fn decode_value(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}
