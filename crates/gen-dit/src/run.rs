//! The generation driver: base entries, people, managers, then groups.
//!
//! Entries stream to the output as they are finished. People are held in a
//! registry until the org chart is built, because every person must exist
//! before managers can be drawn.

use std::io::Write;

use tracing::{debug, info, warn};

use crate::config::{ORGANIZATIONAL_UNIT, PASSPHRASE, RunOptions};
use crate::context::GenerationContext;
use crate::dump::write_tier_report;
use crate::entry::{Entry, EntryKind};
use crate::error::{RegistryError, RunError};
use crate::groups::{SECONDARY_GID_START, primary_group, secondary_group};
use crate::hierarchy::OrgChart;
use crate::ldif::LdifWriter;
use crate::registry::Registry;
use crate::schema::{Schema, SchemaOptions};
use crate::sources::Sources;

const PROGRESS_INTERVAL: usize = 1_000;

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Seed the run's RNG was initialised with.
    pub seed: u64,
    /// Root domain and organisational-unit entries written.
    pub base_entries: usize,
    /// People registered and written.
    pub people: usize,
    /// Generated people dropped because their `uid` was taken.
    pub duplicates: usize,
    /// Primary and secondary groups written.
    pub groups: usize,
    /// Every entry written, of any kind.
    pub entries_written: usize,
}

/// Loads the pools named by `options`, seeds a context and runs
/// [`generate`].
///
/// # Errors
///
/// Returns [`RunError`] if a pool cannot be loaded or generation fails.
pub fn run<W: Write>(options: &RunOptions, out: W) -> Result<RunSummary, RunError> {
    let sources = Sources::load(
        &options.data_dir,
        options.face_dir.as_deref(),
        options.word_list.as_deref(),
    )?;
    let mut ctx = options
        .seed
        .map_or_else(GenerationContext::from_random_seed, GenerationContext::new);
    info!(seed = ctx.seed(), "generation context seeded");
    generate(options, &sources, &mut ctx, out)
}

/// Generates the whole tree into `out` as LDIF.
///
/// # Errors
///
/// Returns [`RunError`] on the first generation, output or side-file
/// failure. Duplicate people and groups are dropped, not reported as
/// errors.
pub fn generate<W: Write>(
    options: &RunOptions,
    sources: &Sources,
    ctx: &mut GenerationContext,
    out: W,
) -> Result<RunSummary, RunError> {
    let schema = Schema::standard(
        sources,
        &SchemaOptions {
            email_domain: options.email_domain.clone(),
            organizational_unit: ORGANIZATIONAL_UNIT.to_owned(),
            passphrase: PASSPHRASE.to_owned(),
        },
        ctx,
    )?;
    let mut writer = LdifWriter::new(out, options.suffix.as_str());
    let mut summary = RunSummary {
        seed: ctx.seed(),
        ..RunSummary::default()
    };

    if options.create_base_entries {
        summary.base_entries = write_base_entries(&schema, options, ctx, &mut writer)?;
    }

    let (mut people, duplicates) = generate_people(&schema, options.user_count, ctx)?;
    summary.duplicates = duplicates;

    info!(tiers = options.tier_count, "building management hierarchy");
    let chart = assign_managers(&mut people, options, ctx)?;
    for person in &people {
        writer.write_entry(person)?;
    }
    summary.people = people.len();

    write_tier_report(&options.tier_dump, &chart.report())?;
    debug!(path = %options.tier_dump, sizes = ?chart.sizes(), "tier report written");

    summary.groups = write_groups(&schema, sources, &people, ctx, &mut writer)?;

    writer.flush()?;
    summary.entries_written = writer.written();
    info!(
        people = summary.people,
        duplicates = summary.duplicates,
        groups = summary.groups,
        entries = summary.entries_written,
        "done"
    );
    Ok(summary)
}

/// Extracts the `dc` value from the first RDN of `suffix`.
///
/// # Errors
///
/// Returns [`RunError::Config`] if the first RDN has no `attr=value` form.
///
/// # Example
///
/// ```
/// use gen_dit::root_domain_component;
///
/// assert_eq!(root_domain_component("dc=example,dc=com").ok(), Some("example"));
/// assert!(root_domain_component("example.com").is_err());
/// ```
pub fn root_domain_component(suffix: &str) -> Result<&str, RunError> {
    suffix
        .split(',')
        .next()
        .and_then(|rdn| rdn.split_once('='))
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| RunError::Config {
            message: format!("suffix '{suffix}' does not start with an attr=value RDN"),
        })
}

fn write_base_entries<W: Write>(
    schema: &Schema,
    options: &RunOptions,
    ctx: &mut GenerationContext,
    writer: &mut LdifWriter<W>,
) -> Result<usize, RunError> {
    info!("generating dc and ou entries");
    let dc = root_domain_component(&options.suffix)?;
    writer.write_entry(&schema.new_root_domain(dc, ctx)?)?;

    let mut units = Registry::new(EntryKind::ORGANIZATIONAL_UNIT);
    for ou in ["People", "Groups"] {
        register_and_write(&mut units, writer, schema.new_organizational_unit(ou, ctx)?)?;
    }
    Ok(units.len() + 1)
}

fn generate_people(
    schema: &Schema,
    count: usize,
    ctx: &mut GenerationContext,
) -> Result<(Registry, usize), RunError> {
    info!(count, "generating people");
    let mut people = Registry::new(EntryKind::PERSON);
    let mut duplicates = 0;
    for index in 0..count {
        if index > 0 && index.is_multiple_of(PROGRESS_INTERVAL) {
            info!(generated = index, "generating people");
        }
        match people.register(schema.new_person(ctx)?) {
            Ok(()) => {}
            Err(RegistryError::DuplicateIdentifier { identifier, .. }) => {
                debug!(%identifier, "dropping person with duplicate uid");
                duplicates += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok((people, duplicates))
}

fn assign_managers(
    people: &mut Registry,
    options: &RunOptions,
    ctx: &mut GenerationContext,
) -> Result<OrgChart, RunError> {
    let identifiers: Vec<String> = people
        .identifiers()
        .into_iter()
        .map(str::to_owned)
        .collect();
    let chart = OrgChart::assign(&identifiers, options.tier_count, ctx.rng())?;
    for identifier in &identifiers {
        let manager =
            chart.manager_attribute(identifier, people, &options.suffix, ctx.rng())?;
        if let (Some(attribute), Some(person)) = (manager, people.get_mut(identifier)) {
            person.push(attribute);
        }
    }
    Ok(chart)
}

fn write_groups<W: Write>(
    schema: &Schema,
    sources: &Sources,
    people: &Registry,
    ctx: &mut GenerationContext,
    writer: &mut LdifWriter<W>,
) -> Result<usize, RunError> {
    let mut groups = Registry::new(EntryKind::GROUP);

    info!("building primary groups");
    for person in people {
        register_and_write(&mut groups, writer, primary_group(schema, person, ctx)?)?;
    }

    info!("building secondary groups");
    let mut gid_number = SECONDARY_GID_START;
    for definition in &sources.groups {
        let group = secondary_group(schema, definition, gid_number, people, ctx)?;
        gid_number += 1;
        register_and_write(&mut groups, writer, group)?;
    }
    Ok(groups.len())
}

/// Registers `entry` and writes it; a duplicate is logged and skipped.
fn register_and_write<W: Write>(
    registry: &mut Registry,
    writer: &mut LdifWriter<W>,
    entry: Entry,
) -> Result<(), RunError> {
    match registry.register(entry.clone()) {
        Ok(()) => Ok(writer.write_entry(&entry)?),
        Err(RegistryError::DuplicateIdentifier { kind, identifier }) => {
            warn!(%kind, %identifier, "skipping duplicate entry");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::config::default_data_dir;
    use crate::generator::Pool;
    use crate::ldif::parse_block;
    use crate::test_support::sample_sources;

    fn options(label: &str) -> RunOptions {
        let dump = std::env::temp_dir().join(format!(
            "gen-dit-run-{label}-{}.json",
            std::process::id()
        ));
        RunOptions {
            create_base_entries: true,
            suffix: "dc=example,dc=com".to_owned(),
            user_count: 40,
            email_domain: "example.com".to_owned(),
            data_dir: default_data_dir(),
            face_dir: None,
            word_list: None,
            seed: Some(2026),
            tier_count: 6,
            tier_dump: Utf8PathBuf::from_path_buf(dump).expect("utf-8 temp dir"),
        }
    }

    #[fixture]
    fn ctx() -> GenerationContext {
        GenerationContext::new(2026).with_days_since_epoch(20_000)
    }

    fn blocks(output: &[u8]) -> Vec<String> {
        String::from_utf8(output.to_vec())
            .expect("utf-8 output")
            .split("\n\n")
            .filter(|block| !block.trim().is_empty())
            .map(ToOwned::to_owned)
            .collect()
    }

    #[rstest]
    #[case("dc=example,dc=com", "example")]
    #[case("dc=redhat, dc=com", "redhat")]
    #[case("o=acme", "acme")]
    fn root_component_is_first_rdn_value(#[case] suffix: &str, #[case] expected: &str) {
        assert_eq!(root_domain_component(suffix).ok(), Some(expected));
    }

    #[rstest]
    #[case("example.com")]
    #[case("dc=,dc=com")]
    fn malformed_suffix_is_a_config_error(#[case] suffix: &str) {
        assert!(matches!(
            root_domain_component(suffix),
            Err(RunError::Config { .. })
        ));
    }

    #[rstest]
    fn run_emits_base_entries_people_and_groups(mut ctx: GenerationContext) {
        let options = options("full");
        let sources = sample_sources();
        let mut output = Vec::new();

        let summary = generate(&options, &sources, &mut ctx, &mut output).expect("run");

        let blocks = blocks(&output);
        assert_eq!(summary.base_entries, 3);
        assert_eq!(summary.people + summary.duplicates, 40);
        assert_eq!(summary.groups, summary.people + sources.groups.len());
        assert_eq!(blocks.len(), summary.entries_written);
        assert_eq!(
            summary.entries_written,
            summary.base_entries + summary.people + summary.groups
        );
        let dns: Vec<String> = blocks
            .iter()
            .take(3)
            .map(|block| parse_block(block).expect("block").dn)
            .collect();
        assert_eq!(
            dns,
            vec![
                "dc=example,dc=com",
                "ou=People,dc=example,dc=com",
                "ou=Groups,dc=example,dc=com",
            ]
        );
        drop(std::fs::remove_file(&options.tier_dump));
    }

    #[rstest]
    fn same_seed_reproduces_output() {
        let options = options("repeat");
        let sources = sample_sources();
        let mut first = Vec::new();
        let mut second = Vec::new();

        let mut ctx_a = GenerationContext::new(7).with_days_since_epoch(20_000);
        generate(&options, &sources, &mut ctx_a, &mut first).expect("first run");
        let mut ctx_b = GenerationContext::new(7).with_days_since_epoch(20_000);
        generate(&options, &sources, &mut ctx_b, &mut second).expect("second run");

        assert!(!first.is_empty());
        assert_eq!(first, second);
        drop(std::fs::remove_file(&options.tier_dump));
    }

    #[rstest]
    fn people_managers_point_at_registered_people(mut ctx: GenerationContext) {
        let mut options = options("managers");
        options.create_base_entries = false;
        let mut output = Vec::new();

        generate(&options, &sample_sources(), &mut ctx, &mut output).expect("run");

        let parsed: Vec<_> = blocks(&output)
            .iter()
            .map(|block| parse_block(block).expect("block"))
            .collect();
        let person_dns: Vec<&str> = parsed
            .iter()
            .filter(|block| block.dn.contains(",ou=People,"))
            .map(|block| block.dn.as_str())
            .collect();
        for block in &parsed {
            for attribute in block.attributes.iter().filter(|attr| attr.name() == "manager") {
                assert!(person_dns.contains(&attribute.value()));
                assert_ne!(attribute.value(), block.dn);
            }
        }
        drop(std::fs::remove_file(&options.tier_dump));
    }

    #[rstest]
    fn colliding_logins_are_dropped_and_counted(mut ctx: GenerationContext) {
        let options = options("duplicates");
        let mut sources = sample_sources();
        // One given name and one surname leave only the salt letter to vary.
        sources.first_names = Pool::new("first_names", vec!["Ada".to_owned()]).expect("pool");
        sources.last_names = Pool::new("last_names", vec!["Lovelace".to_owned()]).expect("pool");
        let mut output = Vec::new();

        let summary = generate(&options, &sources, &mut ctx, &mut output).expect("run");

        assert!(summary.duplicates > 0);
        assert!(summary.people <= 26);
        assert_eq!(summary.people + summary.duplicates, options.user_count);
        let person_blocks = blocks(&output)
            .iter()
            .filter(|block| block.contains(",ou=People,"))
            .count();
        assert_eq!(person_blocks, summary.people);
        drop(std::fs::remove_file(&options.tier_dump));
    }

    #[rstest]
    fn zero_tiers_aborts_the_run(mut ctx: GenerationContext) {
        let mut options = options("no-tiers");
        options.tier_count = 0;

        let result = generate(&options, &sample_sources(), &mut ctx, Vec::<u8>::new());

        assert_eq!(
            result,
            Err(RunError::Hierarchy(crate::error::HierarchyError::NoTiers))
        );
    }
}
