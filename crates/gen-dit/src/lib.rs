//! Synthetic LDAP directory tree generation.
//!
//! This crate fabricates a directory tree (root domain, organisational
//! units, people, primary groups and secondary groups) with randomised but
//! plausible attributes and writes it as LDIF for bulk-loading into test and
//! demo directory servers.
//!
//! # Overview
//!
//! - Value pools and generators produce single attribute values
//! - Object-class descriptors map attributes to generators and are filled in
//!   two passes so derived values can read primary ones
//! - Registries keep people and groups unique by RDN value
//! - An org chart sorts people into tiers and assigns managers
//! - A driver streams every entry to the output as LDIF
//!
//! All randomness comes from one seeded [`GenerationContext`], so a fixed
//! seed reproduces a run exactly.
//!
//! # Example
//!
//! ```
//! use gen_dit::{
//!     Attribute, Entry, EntryKind, GenerationContext, Generator, ObjectClass, fill_entry,
//!     render_entry,
//! };
//!
//! let class = ObjectClass::new("organizationalUnit", &["ou", "description"])
//!     .with_primary("description", Generator::Constant("Synthetic people".to_owned()));
//! let mut ctx = GenerationContext::new(42);
//!
//! let mut unit = fill_entry(EntryKind::ORGANIZATIONAL_UNIT, &[class], &mut ctx)
//!     .expect("entry fills");
//! unit.push(Attribute::new("ou", "People"));
//!
//! assert_eq!(
//!     render_entry(&unit, "dc=example,dc=com"),
//!     "dn: ou=People,dc=example,dc=com\n\
//!      objectclass: organizationalUnit\n\
//!      description: Synthetic people\n\
//!      ou: People"
//! );
//! ```

mod attribute;
mod config;
mod context;
mod dump;
mod entry;
mod error;
mod generator;
mod groups;
mod hierarchy;
mod ldif;
mod registry;
mod run;
mod schema;
mod sources;
#[cfg(test)]
mod test_support;

pub use attribute::{Attribute, Separator, is_safe_string};
pub use config::{GeneratorSettings, ORGANIZATIONAL_UNIT, PASSPHRASE, RunOptions, default_data_dir};
pub use context::GenerationContext;
pub use dump::write_tier_report;
pub use entry::{Entry, EntryKind};
pub use error::{
    DumpError, GenerationError, HierarchyError, LdifError, PoolError, RegistryError, RunError,
};
pub use generator::{
    AddressGenerator, CompositeTemplate, DESCRIPTION_MAX_WORDS, DESCRIPTION_MIN_WORDS,
    DigitTemplate, Generator, PASSWORD_SCHEME, PasswordHasher, Pool, StreetGenerator,
    WeightedPool, WordSource, hash_with_salt, home_directory, is_login_char, photo_pool,
    read_source, salt_letter, username, username_for, verify_password,
};
pub use groups::{
    GroupDefinition, MEMBER_UID, SECONDARY_GID_START, load_group_definitions,
    parse_group_definitions, primary_group, secondary_group,
};
pub use hierarchy::{DEFAULT_TIER_COUNT, MANAGER, OrgChart, TierReport, TierSummary};
pub use ldif::{LdifWriter, ParsedBlock, parse_block, render_entry};
pub use registry::Registry;
pub use run::{RunSummary, generate, root_domain_component, run};
pub use schema::{ACCOUNT_NUMBER_START, OBJECT_CLASS, ObjectClass, Schema, SchemaOptions, fill_entry};
pub use sources::{DEFAULT_WORD_LIST, Sources, files};
