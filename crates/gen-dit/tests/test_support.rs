//! Shared helpers for gen-dit integration tests.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use gen_dit::{GenerationContext, PoolError, RunOptions, Sources, default_data_dir, files};

/// Fixed clock value so seeded runs render identical shadow attributes.
pub const FIXED_DAYS_SINCE_EPOCH: u64 = 20_000;

/// Create a unique scratch directory under `target/gen-dit-tests`.
///
/// # Errors
///
/// Returns any filesystem errors encountered while creating the directory.
pub fn unique_temp_dir(prefix: &str) -> io::Result<Utf8PathBuf> {
    static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let process_id = std::process::id();
    let dir = Utf8PathBuf::from("target")
        .join("gen-dit-tests")
        .join(format!("{prefix}-{process_id}-{counter}"));
    workspace()?.create_dir_all(&dir)?;
    Ok(dir)
}

fn workspace() -> io::Result<Dir> {
    Dir::open_ambient_dir(".", ambient_authority())
}

/// Read a scratch file relative to the crate root.
///
/// # Errors
///
/// Returns any filesystem errors encountered while reading.
pub fn read_scratch_file(path: &Utf8Path) -> io::Result<String> {
    workspace()?.read_to_string(path)
}

/// Write a scratch file relative to the crate root, creating its parent.
///
/// # Errors
///
/// Returns any filesystem errors encountered while writing.
pub fn write_scratch_file(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    let root = workspace()?;
    if let Some(parent) = path.parent() {
        root.create_dir_all(parent)?;
    }
    root.write(path, contents)
}

/// Run options over the bundled lists, writing the tier report into `dir`.
pub fn options_in(dir: &Utf8Path, user_count: usize, seed: u64) -> RunOptions {
    RunOptions {
        create_base_entries: true,
        suffix: "dc=example,dc=com".to_owned(),
        user_count,
        email_domain: "example.com".to_owned(),
        data_dir: default_data_dir(),
        face_dir: None,
        word_list: Some(bundled_word_list()),
        seed: Some(seed),
        tier_count: 6,
        tier_dump: dir.join("tiers.json"),
    }
}

/// A bundled list standing in for the system dictionary.
pub fn bundled_word_list() -> PathBuf {
    default_data_dir().join(files::CITIES)
}

/// Load the bundled pools for `options`.
///
/// # Errors
///
/// Returns [`PoolError`] if a bundled list cannot be loaded.
pub fn load_sources(options: &RunOptions) -> Result<Sources, PoolError> {
    Sources::load(
        &options.data_dir,
        options.face_dir.as_deref(),
        options.word_list.as_deref(),
    )
}

/// A context with a fixed seed and clock.
pub fn fixed_context(seed: u64) -> GenerationContext {
    GenerationContext::new(seed).with_days_since_epoch(FIXED_DAYS_SINCE_EPOCH)
}

/// Split LDIF output into non-empty blocks.
pub fn ldif_blocks(output: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(output)
        .split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
