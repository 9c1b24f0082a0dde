//! Primary and secondary group construction.
//!
//! Every person gets a primary group named after their login. Secondary
//! groups come from a definitions file of `<ratio> <name>` lines; each
//! person joins a secondary group independently with probability `ratio`,
//! so group sizes vary from run to run.

use std::path::Path;

use rand::Rng;

use crate::attribute::Attribute;
use crate::context::GenerationContext;
use crate::entry::Entry;
use crate::error::{GenerationError, PoolError};
use crate::generator::{data_lines, read_source};
use crate::schema::Schema;

/// First `gidNumber` assigned to a secondary group.
pub const SECONDARY_GID_START: u64 = 2_000;

/// Attribute listing a group member's login.
pub const MEMBER_UID: &str = "memberUid";

/// A secondary group and the share of people who belong to it.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDefinition {
    name: String,
    ratio: f64,
}

impl GroupDefinition {
    /// Builds a definition, rejecting ratios outside `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Malformed`] for an out-of-range ratio or an empty
    /// name. `origin` and `line` locate the definition in its source.
    pub fn new(
        name: impl Into<String>,
        ratio: f64,
        origin: &str,
        line: usize,
    ) -> Result<Self, PoolError> {
        let resolved_name = name.into();
        let malformed = |message: String| PoolError::Malformed {
            origin: origin.to_owned(),
            line,
            message,
        };
        if !(0.0..=1.0).contains(&ratio) {
            return Err(malformed(format!("ratio {ratio} is outside [0, 1]")));
        }
        if resolved_name.is_empty() {
            return Err(malformed("group name is empty".to_owned()));
        }
        Ok(Self {
            name: resolved_name,
            ratio,
        })
    }

    /// Returns the group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the probability that any one person joins.
    #[must_use]
    pub const fn ratio(&self) -> f64 {
        self.ratio
    }
}

/// Parses group definitions from `<ratio><whitespace><name>` lines.
///
/// Names may contain spaces; everything after the first run of whitespace
/// is the name.
///
/// # Errors
///
/// Returns [`PoolError::Malformed`] for unparsable lines and
/// [`PoolError::Empty`] if no definitions are present.
///
/// # Example
///
/// ```
/// use gen_dit::parse_group_definitions;
///
/// let groups = parse_group_definitions("groups", "0.5 staff\n0.05 release team\n")
///     .expect("definitions parse");
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups.last().map(|group| group.name()), Some("release team"));
/// ```
pub fn parse_group_definitions(
    origin: &str,
    contents: &str,
) -> Result<Vec<GroupDefinition>, PoolError> {
    let mut definitions = Vec::new();
    for (line_number, line) in data_lines(contents) {
        let malformed = |message: String| PoolError::Malformed {
            origin: origin.to_owned(),
            line: line_number,
            message,
        };
        let (raw_ratio, raw_name) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| malformed("expected '<ratio> <name>'".to_owned()))?;
        let ratio = raw_ratio
            .parse::<f64>()
            .map_err(|err| malformed(format!("invalid ratio '{raw_ratio}': {err}")))?;
        definitions.push(GroupDefinition::new(raw_name.trim(), ratio, origin, line_number)?);
    }
    if definitions.is_empty() {
        return Err(PoolError::Empty {
            origin: origin.to_owned(),
        });
    }
    Ok(definitions)
}

/// Loads group definitions from a file.
///
/// # Errors
///
/// Returns [`PoolError`] if the file cannot be read or parsed.
pub fn load_group_definitions(path: &Path) -> Result<Vec<GroupDefinition>, PoolError> {
    let contents = read_source(path)?;
    parse_group_definitions(&path.display().to_string(), &contents)
}

/// Builds the primary group for `person`.
///
/// The group takes the person's `uid` as its name and sole member and
/// shares the person's `gidNumber`.
///
/// # Errors
///
/// Returns [`GenerationError::MissingAttribute`] if the person lacks `uid`
/// or `gidNumber`.
pub fn primary_group(
    schema: &Schema,
    person: &Entry,
    ctx: &mut GenerationContext,
) -> Result<Entry, GenerationError> {
    let uid = person.first("uid")?.value();
    let gid = person.first("gidNumber")?.value();
    let mut group = schema.new_group(uid, Some(gid), ctx)?;
    group.push(Attribute::new(MEMBER_UID, uid));
    Ok(group)
}

/// Builds one secondary group, drawing membership from `people`.
///
/// One Bernoulli trial is made per person in iteration order.
///
/// # Errors
///
/// Returns [`GenerationError::MissingAttribute`] if a selected person has
/// no `uid`.
pub fn secondary_group<'a>(
    schema: &Schema,
    definition: &GroupDefinition,
    gid_number: u64,
    people: impl IntoIterator<Item = &'a Entry>,
    ctx: &mut GenerationContext,
) -> Result<Entry, GenerationError> {
    let gid = gid_number.to_string();
    let mut group = schema.new_group(definition.name(), Some(&gid), ctx)?;
    for person in people {
        if ctx.rng().random_bool(definition.ratio()) {
            group.push(Attribute::new(MEMBER_UID, person.first("uid")?.value()));
        }
    }
    Ok(group)
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::entry::EntryKind;
    use crate::schema::SchemaOptions;
    use crate::test_support::sample_sources;

    struct Setup {
        schema: Schema,
        ctx: GenerationContext,
    }

    #[fixture]
    fn setup() -> Setup {
        let mut ctx = GenerationContext::new(11).with_days_since_epoch(19_500);
        let options = SchemaOptions {
            email_domain: "example.com".to_owned(),
            organizational_unit: "Global Learning Services".to_owned(),
            passphrase: "redhat".to_owned(),
        };
        let schema = Schema::standard(&sample_sources(), &options, &mut ctx).expect("schema");
        Setup { schema, ctx }
    }

    fn person(uid: &str) -> Entry {
        let mut entry = Entry::new(EntryKind::PERSON);
        entry.push(Attribute::new("uid", uid));
        entry.push(Attribute::new("gidNumber", "32005"));
        entry
    }

    fn members(group: &Entry) -> Vec<&str> {
        group.values(MEMBER_UID).into_iter().map(Attribute::value).collect()
    }

    #[rstest]
    #[case("0.5 staff", "staff", 0.5)]
    #[case("0.05 release team", "release team", 0.05)]
    #[case("1 everyone", "everyone", 1.0)]
    #[case("0\tnobody", "nobody", 0.0)]
    fn parses_definition_lines(#[case] line: &str, #[case] name: &str, #[case] ratio: f64) {
        let groups = parse_group_definitions("groups", line).expect("parse");
        let group = groups.first().expect("one group");
        assert_eq!(group.name(), name);
        assert_eq!(group.ratio().to_bits(), ratio.to_bits());
    }

    #[rstest]
    #[case("1.5 too-many")]
    #[case("-0.1 negative")]
    #[case("NaN odd")]
    #[case("half staff")]
    #[case("0.5")]
    fn rejects_malformed_definitions(#[case] line: &str) {
        let result = parse_group_definitions("groups", line);
        assert!(
            matches!(result, Err(PoolError::Malformed { line: 1, .. })),
            "unexpected result for '{line}': {result:?}"
        );
    }

    #[test]
    fn empty_definitions_are_rejected() {
        let result = parse_group_definitions("groups", "# none\n");
        assert_eq!(
            result,
            Err(PoolError::Empty {
                origin: "groups".to_owned()
            })
        );
    }

    #[rstest]
    fn primary_group_mirrors_person(setup: Setup) {
        let Setup { schema, mut ctx } = setup;
        let group = primary_group(&schema, &person("adamlovelace"), &mut ctx).expect("group");

        assert_eq!(group.identifier().expect("cn"), "adamlovelace");
        assert_eq!(group.first("gidNumber").expect("gid").value(), "32005");
        assert_eq!(members(&group), vec!["adamlovelace"]);
    }

    #[rstest]
    fn primary_group_needs_gid(setup: Setup) {
        let Setup { schema, mut ctx } = setup;
        let mut entry = Entry::new(EntryKind::PERSON);
        entry.push(Attribute::new("uid", "solo"));

        let result = primary_group(&schema, &entry, &mut ctx);

        assert_eq!(
            result,
            Err(GenerationError::MissingAttribute {
                name: "gidNumber".to_owned()
            })
        );
    }

    #[rstest]
    #[case(1.0, 3)]
    #[case(0.0, 0)]
    fn certain_ratios_give_exact_membership(
        setup: Setup,
        #[case] ratio: f64,
        #[case] expected: usize,
    ) {
        let Setup { schema, mut ctx } = setup;
        let people = [person("a"), person("b"), person("c")];
        let definition = GroupDefinition::new("team", ratio, "test", 1).expect("definition");

        let group = secondary_group(&schema, &definition, SECONDARY_GID_START, &people, &mut ctx)
            .expect("group");

        assert_eq!(members(&group).len(), expected);
        assert_eq!(group.first("gidNumber").expect("gid").value(), "2000");
    }

    #[rstest]
    fn membership_tracks_ratio(setup: Setup) {
        let Setup { schema, mut ctx } = setup;
        let people: Vec<Entry> = (0..2_000).map(|i| person(&format!("user{i}"))).collect();
        let definition = GroupDefinition::new("half", 0.5, "test", 1).expect("definition");

        let group =
            secondary_group(&schema, &definition, 2_001, &people, &mut ctx).expect("group");

        let joined = members(&group).len();
        assert!((800..=1_200).contains(&joined), "{joined} of 2000 joined");
    }
}
