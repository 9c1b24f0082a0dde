//! Error types for the gen-dit crate.
//!
//! Each concern gets its own semantic error enum built with `thiserror`.
//! [`RunError`] collects them for the driver so the binary can report a
//! single failure and exit.

use std::path::PathBuf;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while building a value pool.
///
/// Pools are loaded before any entry is generated, so these errors abort a
/// run during setup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The pool file or directory could not be read.
    #[error("failed to read pool source at '{path}': {message}")]
    Io {
        /// Path to the pool file or directory.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The pool has no candidate values.
    #[error("pool '{origin}' has no values to choose from")]
    Empty {
        /// File path or label describing where the pool came from.
        origin: String,
    },

    /// A line of a weighted or ratio pool could not be parsed.
    #[error("malformed line {line} in pool '{origin}': {message}")]
    Malformed {
        /// File path or label describing where the pool came from.
        origin: String,
        /// One-based line number within the source, counting skipped lines.
        line: usize,
        /// Description of the problem.
        message: String,
    },
}

/// Errors raised while generating attribute values for an entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A derived generator needed an attribute the entry does not carry.
    #[error("entry has no '{name}' attribute")]
    MissingAttribute {
        /// Name of the missing attribute.
        name: String,
    },

    /// A prerequisite attribute exists but its value is empty.
    #[error("attribute '{name}' has an empty value")]
    EmptyValue {
        /// Name of the empty attribute.
        name: String,
    },

    /// Two counters were registered under the same name.
    #[error("counter '{name}' is already registered")]
    DuplicateCounter {
        /// Counter name.
        name: String,
    },

    /// A counter generator referenced a counter that was never registered.
    #[error("counter '{name}' is not registered")]
    UnknownCounter {
        /// Counter name.
        name: String,
    },

    /// A composite template and its attribute list disagree in length.
    #[error("template '{template}' has {expected} placeholders but {actual} attributes were given")]
    PlaceholderMismatch {
        /// The format template.
        template: String,
        /// Placeholder count found in the template.
        expected: usize,
        /// Number of attribute names supplied.
        actual: usize,
    },

    /// A pool yielded no value at generation time.
    #[error("pool for '{name}' yielded no value")]
    EmptyPool {
        /// Attribute being generated.
        name: String,
    },
}

/// Errors raised by entry registries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// An entry with the same identifier is already registered.
    #[error("{kind} '{identifier}' is already registered")]
    DuplicateIdentifier {
        /// Entry kind label, such as `person` or `group`.
        kind: String,
        /// The colliding identifier.
        identifier: String,
    },

    /// The entry does not carry its identifying attribute.
    #[error("{kind} entry has no '{attribute}' attribute to register under")]
    MissingIdentifier {
        /// Entry kind label.
        kind: String,
        /// Name of the identifying attribute.
        attribute: String,
    },
}

/// Errors raised while building or querying the org chart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// The org chart was requested with zero tiers.
    #[error("org chart needs at least one tier")]
    NoTiers,

    /// The identifier was not part of the population the chart was built from.
    #[error("'{identifier}' is not a member of the org chart")]
    UnknownMember {
        /// The identifier that was looked up.
        identifier: String,
    },
}

/// Errors raised while reading or writing LDIF text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LdifError {
    /// An attribute line had no recognised separator.
    #[error("malformed LDIF line {line_number}: '{line}'")]
    MalformedLine {
        /// One-based line number within the block.
        line_number: usize,
        /// The offending line.
        line: String,
    },

    /// The block did not start with a `dn:` line.
    #[error("LDIF block does not start with a dn line")]
    MissingDn,

    /// Writing to the output stream failed.
    #[error("failed to write LDIF output: {message}")]
    Write {
        /// Description of the I/O error.
        message: String,
    },
}

/// Errors raised while writing the tier report side file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DumpError {
    /// The report could not be serialised.
    #[error("failed to serialise tier report: {message}")]
    Serialise {
        /// Serialiser error message.
        message: String,
    },

    /// The report file could not be written.
    #[error("failed to write tier report at '{path}': {message}")]
    Write {
        /// Path of the report file.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },
}

/// Errors that abort a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// Settings could not be loaded or are invalid.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },

    /// A pool could not be loaded.
    #[error("pool error: {0}")]
    Pool(#[from] PoolError),

    /// Attribute generation failed.
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Registering an entry failed for a reason other than a duplicate.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The org chart could not be built or queried.
    #[error("hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    /// Output could not be written.
    #[error("output error: {0}")]
    Ldif(#[from] LdifError),

    /// The tier report could not be written.
    #[error("tier report error: {0}")]
    Dump(#[from] DumpError),
}
