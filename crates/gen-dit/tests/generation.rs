//! End-to-end generation tests over the bundled lists.
//!
//! These tests run the driver into an in-memory buffer and check the LDIF
//! stream, the tier report side file, and attribute-level guarantees.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

mod test_support;

use std::collections::HashSet;

use gen_dit::{
    Attribute, ParsedBlock, PoolError, RunError, Separator, TierReport, generate, parse_block,
    run,
};
use rstest::rstest;
use test_support::{
    fixed_context, ldif_blocks, load_sources, options_in, read_scratch_file, unique_temp_dir,
    write_scratch_file,
};

fn parsed(output: &[u8]) -> Vec<ParsedBlock> {
    ldif_blocks(output)
        .iter()
        .map(|block| parse_block(block).expect("block parses"))
        .collect()
}

fn values<'a>(block: &'a ParsedBlock, name: &str) -> Vec<&'a str> {
    block
        .attributes
        .iter()
        .filter(|attribute| attribute.name() == name)
        .map(|attribute| attribute.value())
        .collect()
}

fn people(blocks: &[ParsedBlock]) -> Vec<&ParsedBlock> {
    blocks
        .iter()
        .filter(|block| block.dn.contains(",ou=People,"))
        .collect()
}

#[test]
fn full_run_writes_every_kind_of_entry() {
    let dir = unique_temp_dir("full-run").expect("temp dir");
    let options = options_in(&dir, 200, 2026);
    let sources = load_sources(&options).expect("bundled lists");
    let mut ctx = fixed_context(2026);
    let mut output = Vec::new();

    let summary = generate(&options, &sources, &mut ctx, &mut output).expect("run");

    let blocks = parsed(&output);
    assert_eq!(blocks.len(), summary.entries_written);
    assert_eq!(summary.people + summary.duplicates, 200);
    assert_eq!(people(&blocks).len(), summary.people);
    let group_blocks = blocks
        .iter()
        .filter(|block| block.dn.contains(",ou=Groups,"))
        .count();
    assert_eq!(group_blocks, summary.people + sources.groups.len());
    assert_eq!(
        blocks.first().map(|block| block.dn.as_str()),
        Some("dc=example,dc=com")
    );
}

#[test]
fn people_carry_consistent_derived_attributes() {
    let dir = unique_temp_dir("derived").expect("temp dir");
    let options = options_in(&dir, 100, 7);
    let sources = load_sources(&options).expect("bundled lists");
    let mut output = Vec::new();

    generate(&options, &sources, &mut fixed_context(7), &mut output).expect("run");

    let blocks = parsed(&output);
    for person in people(&blocks) {
        let uid = *values(person, "uid").first().expect("uid");
        assert!(!uid.is_empty());
        assert!(
            uid.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
            "unexpected login '{uid}'"
        );
        assert_eq!(person.dn, format!("uid={uid},ou=People,dc=example,dc=com"));
        assert_eq!(values(person, "mail"), vec![format!("{uid}@example.com").as_str()]);
        let first_letter = uid.chars().next().expect("non-empty uid");
        assert_eq!(
            values(person, "homeDirectory"),
            vec![format!("/home/{first_letter}/{uid}").as_str()]
        );
        assert_eq!(values(person, "objectclass").len(), 5);
        assert_eq!(values(person, "shadowLastChange"), vec!["20000"]);
        assert!(values(person, "jpegPhoto").is_empty());
    }
}

#[test]
fn every_manager_is_a_generated_person() {
    let dir = unique_temp_dir("managers").expect("temp dir");
    let options = options_in(&dir, 150, 99);
    let sources = load_sources(&options).expect("bundled lists");
    let mut output = Vec::new();

    generate(&options, &sources, &mut fixed_context(99), &mut output).expect("run");

    let blocks = parsed(&output);
    let everyone = people(&blocks);
    let dns: HashSet<&str> = everyone.iter().map(|person| person.dn.as_str()).collect();
    let mut managed = 0;
    for person in &everyone {
        let managers = values(person, "manager");
        assert!(managers.len() <= 1);
        for manager in managers {
            assert!(dns.contains(manager), "unknown manager {manager}");
            assert_ne!(manager, person.dn);
            managed += 1;
        }
    }
    assert!(managed > 0, "nobody was given a manager");
    assert!(managed < everyone.len(), "the top tier must have no manager");
}

#[test]
fn tier_report_accounts_for_every_person() {
    let dir = unique_temp_dir("tiers").expect("temp dir");
    let options = options_in(&dir, 100, 5);
    let sources = load_sources(&options).expect("bundled lists");

    let summary =
        generate(&options, &sources, &mut fixed_context(5), Vec::<u8>::new()).expect("run");

    let contents = read_scratch_file(&options.tier_dump).expect("tier report written");
    let report: TierReport = serde_json::from_str(&contents).expect("report parses");
    assert_eq!(report.tiers.len(), 6);
    let total: usize = report.tiers.iter().map(|tier| tier.size).sum();
    assert_eq!(total, summary.people);
    for (index, tier) in report.tiers.iter().enumerate() {
        assert_eq!(tier.tier, index);
        assert_eq!(tier.size, tier.members.len());
    }
}

#[test]
fn accented_names_are_written_as_ascii_base64() {
    let dir = unique_temp_dir("ascii").expect("temp dir");
    let options = options_in(&dir, 300, 17);
    let sources = load_sources(&options).expect("bundled lists");
    let mut output = Vec::new();

    generate(&options, &sources, &mut fixed_context(17), &mut output).expect("run");

    assert!(output.is_ascii(), "LDIF output holds non-ASCII bytes");
    let blocks = parsed(&output);
    let accented: Vec<&Attribute> = people(&blocks)
        .into_iter()
        .flat_map(|person| person.attributes.iter())
        .filter(|attribute| !attribute.value().is_ascii())
        .collect();
    assert!(!accented.is_empty(), "bundled lists should yield accented names");
    for attribute in accented {
        assert_eq!(attribute.separator(), Separator::Base64);
    }
}

#[test]
fn primary_groups_mirror_their_person() {
    let dir = unique_temp_dir("primary").expect("temp dir");
    let options = options_in(&dir, 30, 13);
    let sources = load_sources(&options).expect("bundled lists");
    let mut output = Vec::new();

    generate(&options, &sources, &mut fixed_context(13), &mut output).expect("run");

    let blocks = parsed(&output);
    for person in people(&blocks) {
        let uid = *values(person, "uid").first().expect("uid");
        let dn = format!("cn={uid},ou=Groups,dc=example,dc=com");
        let group = blocks
            .iter()
            .find(|block| block.dn == dn)
            .expect("primary group exists");
        assert_eq!(values(group, "memberUid"), vec![uid]);
        assert_eq!(values(group, "gidNumber"), values(person, "gidNumber"));
    }
}

#[test]
fn photo_directory_adds_url_attributes() {
    let dir = unique_temp_dir("photos").expect("temp dir");
    let faces = dir.join("faces");
    write_scratch_file(&faces.join("face-1.jpg"), b"jpeg").expect("photo");
    write_scratch_file(&faces.join("face-2.jpg"), b"jpeg").expect("photo");
    let mut options = options_in(&dir, 10, 3);
    options.face_dir = Some(faces.into_std_path_buf());
    let sources = load_sources(&options).expect("bundled lists");
    let mut output = Vec::new();

    generate(&options, &sources, &mut fixed_context(3), &mut output).expect("run");

    let blocks = parsed(&output);
    for person in people(&blocks) {
        let photo = person
            .attributes
            .iter()
            .find(|attribute| attribute.name() == "jpegPhoto")
            .expect("photo attribute");
        assert_eq!(photo.separator(), Separator::Url);
        assert!(photo.value().starts_with("file:///"));
        assert!(photo.value().ends_with(".jpg"));
    }
}

#[rstest]
#[case(11)]
#[case(4_242)]
fn seeded_runs_are_identical(#[case] seed: u64) {
    let dir = unique_temp_dir("repeat").expect("temp dir");
    let options = options_in(&dir, 50, seed);
    let sources = load_sources(&options).expect("bundled lists");
    let mut first = Vec::new();
    let mut second = Vec::new();

    generate(&options, &sources, &mut fixed_context(seed), &mut first).expect("first");
    generate(&options, &sources, &mut fixed_context(seed), &mut second).expect("second");

    assert_eq!(first, second);
}

#[test]
fn missing_data_dir_fails_before_output() {
    let dir = unique_temp_dir("missing").expect("temp dir");
    let mut options = options_in(&dir, 10, 1);
    options.data_dir = dir.join("no-such-lists").into_std_path_buf();
    let mut output = Vec::new();

    let result = run(&options, &mut output);

    assert!(matches!(result, Err(RunError::Pool(PoolError::Io { .. }))));
    assert!(output.is_empty());
}

#[test]
fn rendered_blocks_round_trip_through_the_parser() {
    let dir = unique_temp_dir("round-trip").expect("temp dir");
    let options = options_in(&dir, 5, 21);
    let sources = load_sources(&options).expect("bundled lists");
    let mut output = Vec::new();

    generate(&options, &sources, &mut fixed_context(21), &mut output).expect("run");

    for block in ldif_blocks(&output) {
        let parsed = parse_block(&block).expect("block parses");
        let mut rendered = vec![Attribute::new("dn", parsed.dn.clone()).to_string()];
        rendered.extend(parsed.attributes.iter().map(ToString::to_string));
        assert_eq!(rendered.join("\n"), block);
    }
}
