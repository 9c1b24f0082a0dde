//! Object-class descriptors and the two-pass entry filler.
//!
//! An [`ObjectClass`] is plain data: the class name, the attributes it
//! declares, and two generator tables. [`fill_entry`] runs every class's
//! primary table first and only then every class's derived table, so a
//! derived generator may read attributes produced by any class's primary
//! pass or by an earlier derived generator.

use crate::attribute::Attribute;
use crate::context::GenerationContext;
use crate::entry::{Entry, EntryKind};
use crate::error::GenerationError;
use crate::generator::{
    AddressGenerator, CompositeTemplate, DigitTemplate, Generator, PasswordHasher, StreetGenerator,
};
use crate::sources::Sources;

/// Attribute carrying each class name on the entry.
pub const OBJECT_CLASS: &str = "objectclass";

/// First value handed out by the `uidNumber` and `gidNumber` counters.
pub const ACCOUNT_NUMBER_START: u64 = 32_000;

const PHONE: &str = "%d%d%d %d%d%d %d%d%d%d";

const DOMAIN_ATTRS: &[&str] = &[
    "dc", "associatedName", "organizationName", "description", "businessCategory", "seeAlso",
    "searchGuide", "userPassword", "localityName", "stateOrProvinceName", "streetAddress",
    "physicalDeliveryOfficeName", "postalAddress", "postalCode", "postOfficeBox",
    "facsimileTelephoneNumber", "internationalISDNNumber", "telephoneNumber",
    "teletexTerminalIdentifier", "telexNumber", "preferredDeliveryMethod", "destinationIndicator",
    "registeredAddress", "x121Address",
];

const ORGANIZATIONAL_UNIT_ATTRS: &[&str] = &[
    "ou", "userPassword", "searchGuide", "seeAlso", "businessCategory", "x121Address",
    "registeredAddress", "destinationIndicator", "preferredDeliveryMethod", "telexNumber",
    "teletexTerminalIdentifier", "telephoneNumber", "internationaliSDNNumber",
    "facsimileTelephoneNumber", "street", "postOfficeBox", "postalCode", "postalAddress",
    "physicalDeliveryOfficeName", "st", "l", "description",
];

const PERSON_ATTRS: &[&str] = &["sn", "cn", "userPassword", "telephoneNumber", "seeAlso", "description"];

const ORGANIZATIONAL_PERSON_ATTRS: &[&str] = &[
    "title", "x121Address", "registeredAddress", "destinationIndicator",
    "preferredDeliveryMethod", "telexNumber", "teletexTerminalIdentifier", "telephoneNumber",
    "internationaliSDNNumber", "facsimileTelephoneNumber", "street", "postOfficeBox",
    "postalCode", "postalAddress", "physicalDeliveryOfficeName", "ou", "st", "l",
];

// `uid` precedes `mail` so the derived mail template can read it.
const INET_ORG_PERSON_ATTRS: &[&str] = &[
    "audio", "businessCategory", "carLicense", "departmentNumber", "displayName",
    "employeeNumber", "employeeType", "givenName", "homePhone", "homePostalAddress", "initials",
    "jpegPhoto", "labeledURI", "manager", "mobile", "o", "pager", "photo", "roomNumber",
    "secretary", "uid", "userCertificate", "x500uniqueIdentifier", "preferredLanguage",
    "userSMIMECertificate", "userPKCS12", "mail",
];

const POSIX_ACCOUNT_ATTRS: &[&str] = &[
    "cn", "uid", "uidNumber", "gidNumber", "homeDirectory", "userPassword", "loginShell", "gecos",
    "description",
];

const SHADOW_ACCOUNT_ATTRS: &[&str] = &[
    "uid", "userPassword", "shadowLastChange", "shadowMin", "shadowMax", "shadowWarning",
    "shadowInactive", "shadowExpire", "shadowFlag", "description",
];

const POSIX_GROUP_ATTRS: &[&str] = &["cn", "gidNumber", "userPassword", "memberUid", "description"];

/// One schema facet of an entry: declared attributes plus generators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectClass {
    name: &'static str,
    attrs: &'static [&'static str],
    primary: Vec<(&'static str, Generator)>,
    derived: Vec<(&'static str, Generator)>,
}

impl ObjectClass {
    /// Declares a class with no generators.
    #[must_use]
    pub const fn new(name: &'static str, attrs: &'static [&'static str]) -> Self {
        Self {
            name,
            attrs,
            primary: Vec::new(),
            derived: Vec::new(),
        }
    }

    /// Registers a generator for the primary pass.
    #[must_use]
    pub fn with_primary(mut self, attr: &'static str, generator: Generator) -> Self {
        self.primary.push((attr, generator));
        self
    }

    /// Registers a generator for the derived pass.
    #[must_use]
    pub fn with_derived(mut self, attr: &'static str, generator: Generator) -> Self {
        self.derived.push((attr, generator));
        self
    }

    /// Returns the class name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared attribute names, in order.
    #[must_use]
    pub const fn attrs(&self) -> &'static [&'static str] {
        self.attrs
    }

    /// Runs the primary pass against `entry`.
    ///
    /// # Errors
    ///
    /// Propagates the first [`GenerationError`] raised by a generator.
    pub fn generate_attrs(
        &self,
        entry: &mut Entry,
        ctx: &mut GenerationContext,
    ) -> Result<(), GenerationError> {
        self.generate_from(&self.primary, entry, ctx)
    }

    /// Runs the derived pass against `entry`.
    ///
    /// # Errors
    ///
    /// Propagates the first [`GenerationError`] raised by a generator.
    pub fn generate_derived_attrs(
        &self,
        entry: &mut Entry,
        ctx: &mut GenerationContext,
    ) -> Result<(), GenerationError> {
        self.generate_from(&self.derived, entry, ctx)
    }

    fn generate_from(
        &self,
        table: &[(&'static str, Generator)],
        entry: &mut Entry,
        ctx: &mut GenerationContext,
    ) -> Result<(), GenerationError> {
        for attr in self.attrs {
            let Some((_, generator)) = table.iter().find(|(name, _)| name == attr) else {
                continue;
            };
            let value = generator.generate(attr, entry, ctx)?;
            entry.push(value);
        }
        Ok(())
    }
}

/// Builds an entry of `kind` from `classes` in two passes.
///
/// Each class first contributes its `objectclass` value and primary
/// attributes, in class order. Once every class has done so, each class's
/// derived attributes are generated in the same order.
///
/// # Errors
///
/// Returns [`GenerationError`] if any generator fails; no partial entry is
/// returned.
pub fn fill_entry(
    kind: EntryKind,
    classes: &[ObjectClass],
    ctx: &mut GenerationContext,
) -> Result<Entry, GenerationError> {
    let mut entry = Entry::new(kind);
    for class in classes {
        entry.push(Attribute::new(OBJECT_CLASS, class.name()));
        class.generate_attrs(&mut entry, ctx)?;
    }
    for class in classes {
        class.generate_derived_attrs(&mut entry, ctx)?;
    }
    Ok(entry)
}

/// Values baked into the standard schema at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOptions {
    /// Domain appended to every generated `mail` value.
    pub email_domain: String,
    /// Constant `ou` given to every person.
    pub organizational_unit: String,
    /// Passphrase hashed into every `userPassword`.
    pub passphrase: String,
}

/// The class catalogue used for each kind of generated entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    person: Vec<ObjectClass>,
    group: Vec<ObjectClass>,
    organizational_unit: Vec<ObjectClass>,
    domain: Vec<ObjectClass>,
}

impl Schema {
    /// Builds the standard catalogue from loaded pools.
    ///
    /// Registers the `uidNumber` and `gidNumber` counters in `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::DuplicateCounter`] if the counters were
    /// already registered in this context.
    pub fn standard(
        sources: &Sources,
        options: &SchemaOptions,
        ctx: &mut GenerationContext,
    ) -> Result<Self, GenerationError> {
        ctx.register_counter("uidNumber", ACCOUNT_NUMBER_START)?;
        ctx.register_counter("gidNumber", ACCOUNT_NUMBER_START)?;

        let person = ObjectClass::new("person", PERSON_ATTRS)
            .with_primary("sn", Generator::Pool(sources.last_names.clone()))
            .with_primary(
                "userPassword",
                Generator::Password(PasswordHasher::new(options.passphrase.clone())),
            )
            .with_primary("telephoneNumber", Generator::Digits(DigitTemplate::new(PHONE)))
            .with_primary("description", Generator::Description(sources.words.clone()))
            .with_derived(
                "cn",
                Generator::Composite(CompositeTemplate::new("%s %s", &["givenName", "sn"])?),
            );

        let organizational_person =
            ObjectClass::new("organizationalPerson", ORGANIZATIONAL_PERSON_ATTRS)
                .with_primary("postOfficeBox", Generator::Digits(DigitTemplate::new("%d%d%d%d")))
                .with_primary(
                    "postalCode",
                    Generator::Digits(DigitTemplate::new("%d%d%d%d%d-%d%d%d%d")),
                )
                .with_primary(
                    "facsimileTelephoneNumber",
                    Generator::Digits(DigitTemplate::new(PHONE)),
                )
                .with_primary(
                    "street",
                    Generator::Street(StreetGenerator::new(sources.streets.clone())),
                )
                .with_primary("st", Generator::Pool(sources.states.clone()))
                .with_primary("l", Generator::Pool(sources.cities.clone()))
                .with_primary("ou", Generator::Constant(options.organizational_unit.clone()));

        let mut inet_org_person = ObjectClass::new("inetOrgPerson", INET_ORG_PERSON_ATTRS)
            .with_primary("givenName", Generator::Pool(sources.first_names.clone()))
            .with_primary(
                "employeeNumber",
                Generator::Digits(DigitTemplate::new("%d%d%d-%d%d-%d%d%d%d")),
            )
            .with_primary("homePhone", Generator::Digits(DigitTemplate::new(PHONE)))
            .with_primary("mobile", Generator::Digits(DigitTemplate::new(PHONE)))
            .with_primary("pager", Generator::Digits(DigitTemplate::new(PHONE)))
            .with_primary(
                "homePostalAddress",
                Generator::Address(AddressGenerator::new(
                    sources.streets.clone(),
                    sources.cities.clone(),
                    sources.states.clone(),
                )),
            )
            .with_primary("employeeType", Generator::Weighted(sources.employee_types.clone()))
            .with_derived("uid", Generator::Username)
            .with_derived(
                "mail",
                Generator::Composite(CompositeTemplate::new(
                    format!("%s@{}", options.email_domain),
                    &["uid"],
                )?),
            );
        if let Some(photos) = &sources.photos {
            inet_org_person = inet_org_person.with_primary("jpegPhoto", Generator::Photo(photos.clone()));
        }

        let posix_account = ObjectClass::new("posixAccount", POSIX_ACCOUNT_ATTRS)
            .with_primary("uidNumber", Generator::Counter("uidNumber".to_owned()))
            .with_primary("gidNumber", Generator::Counter("gidNumber".to_owned()))
            .with_primary("loginShell", Generator::Weighted(sources.shells.clone()))
            .with_derived("homeDirectory", Generator::HomeDirectory);

        let shadow_account = ObjectClass::new("shadowAccount", SHADOW_ACCOUNT_ATTRS)
            .with_primary("shadowLastChange", Generator::DaysSinceEpoch)
            .with_primary("shadowMin", Generator::Constant("0".to_owned()))
            .with_primary("shadowMax", Generator::Constant("90".to_owned()))
            .with_primary("shadowWarning", Generator::Constant("14".to_owned()))
            .with_primary("shadowInactive", Generator::Constant("0".to_owned()));

        Ok(Self {
            person: vec![
                person,
                organizational_person,
                inet_org_person,
                posix_account,
                shadow_account,
            ],
            group: vec![ObjectClass::new("posixGroup", POSIX_GROUP_ATTRS)],
            organizational_unit: vec![ObjectClass::new(
                "organizationalUnit",
                ORGANIZATIONAL_UNIT_ATTRS,
            )],
            domain: vec![ObjectClass::new("domain", DOMAIN_ATTRS)],
        })
    }

    /// Returns the classes every person is built from, in fill order.
    #[must_use]
    pub fn person_classes(&self) -> &[ObjectClass] {
        &self.person
    }

    /// Generates a new person entry.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] if any generator fails.
    pub fn new_person(&self, ctx: &mut GenerationContext) -> Result<Entry, GenerationError> {
        fill_entry(EntryKind::PERSON, &self.person, ctx)
    }

    /// Builds a group named `cn`, with `gidNumber` set when given.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] if any generator fails.
    pub fn new_group(
        &self,
        cn: &str,
        gid_number: Option<&str>,
        ctx: &mut GenerationContext,
    ) -> Result<Entry, GenerationError> {
        let mut entry = fill_entry(EntryKind::GROUP, &self.group, ctx)?;
        entry.push(Attribute::new("cn", cn));
        if let Some(gid) = gid_number {
            entry.push(Attribute::new("gidNumber", gid));
        }
        Ok(entry)
    }

    /// Builds an organisational unit named `ou`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] if any generator fails.
    pub fn new_organizational_unit(
        &self,
        ou: &str,
        ctx: &mut GenerationContext,
    ) -> Result<Entry, GenerationError> {
        let mut entry = fill_entry(EntryKind::ORGANIZATIONAL_UNIT, &self.organizational_unit, ctx)?;
        entry.push(Attribute::new("ou", ou));
        Ok(entry)
    }

    /// Builds the root domain entry carrying `dc`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] if any generator fails.
    pub fn new_root_domain(
        &self,
        dc: &str,
        ctx: &mut GenerationContext,
    ) -> Result<Entry, GenerationError> {
        let mut entry = fill_entry(EntryKind::ROOT_DOMAIN, &self.domain, ctx)?;
        entry.push(Attribute::new("dc", dc));
        Ok(entry)
    }
}
