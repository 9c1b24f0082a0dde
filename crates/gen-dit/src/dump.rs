//! Diagnostics side file holding the final tier population map.
//!
//! The report is serialised to JSON and written through a temporary file
//! in the target directory, then renamed into place, so a reader never sees
//! a half-written report.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{
    ambient_authority,
    fs::{Dir, OpenOptions},
};

use crate::error::DumpError;
use crate::hierarchy::TierReport;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Writes `report` as pretty-printed JSON to `path`.
///
/// # Errors
///
/// Returns [`DumpError::Serialise`] if the report cannot be encoded and
/// [`DumpError::Write`] if the directory cannot be opened or the file
/// cannot be written.
///
/// # Example
///
/// ```
/// use camino::Utf8PathBuf;
/// use gen_dit::{OrgChart, write_tier_report};
///
/// let dir = std::env::temp_dir().join(format!("gen-dit-doc-{}", std::process::id()));
/// std::fs::create_dir_all(&dir).expect("create temp dir");
/// let path = Utf8PathBuf::from_path_buf(dir.join("tiers.json")).expect("utf-8 path");
///
/// let chart = OrgChart::from_samples(vec![("ada".to_owned(), 0.0)], 2).expect("chart");
/// write_tier_report(&path, &chart.report()).expect("write report");
///
/// let contents = std::fs::read_to_string(&path).expect("read report");
/// assert!(contents.contains("\"ada\""));
/// std::fs::remove_dir_all(&dir).expect("clean up");
/// ```
pub fn write_tier_report(path: &Utf8Path, report: &TierReport) -> Result<(), DumpError> {
    let contents = serde_json::to_string_pretty(report).map_err(|err| DumpError::Serialise {
        message: err.to_string(),
    })?;
    let (dir, file_name) = open_parent(path)?;
    write_atomic(&dir, file_name, path, &contents)
}

fn open_parent(path: &Utf8Path) -> Result<(Dir, &str), DumpError> {
    let Some(Utf8Component::Normal(file_name)) = path.components().next_back() else {
        return Err(write_error(path, "tier report path must name a file"));
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| write_error(parent, &err.to_string()))?;
    Ok((dir, file_name))
}

fn write_atomic(
    dir: &Dir,
    file_name: &str,
    target_path: &Utf8Path,
    contents: &str,
) -> Result<(), DumpError> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{file_name}.tmp.{}.{stamp}.{counter}",
        std::process::id()
    );

    write_to_temp_file(dir, &tmp_name, target_path, contents)?;
    if let Err(err) = rename_into_place(dir, &tmp_name, file_name) {
        if dir.remove_file(&tmp_name).is_err() {
            // Leftover temp file is harmless.
        }
        return Err(write_error(target_path, &err.to_string()));
    }
    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        // Directory sync is best effort.
    }
    Ok(())
}

fn write_to_temp_file(
    dir: &Dir,
    tmp_name: &str,
    target_path: &Utf8Path,
    contents: &str,
) -> Result<(), DumpError> {
    let tmp_path = target_path.with_file_name(tmp_name);
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir
        .open_with(tmp_name, &options)
        .map_err(|err| write_error(&tmp_path, &err.to_string()))?;

    let written = file.write_all(contents.as_bytes()).and_then(|()| file.sync_all());
    if let Err(err) = written {
        drop(file);
        drop(dir.remove_file(tmp_name));
        return Err(write_error(&tmp_path, &err.to_string()));
    }
    Ok(())
}

#[cfg(windows)]
fn rename_into_place(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn rename_into_place(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn write_error(path: &Utf8Path, message: &str) -> DumpError {
    DumpError::Write {
        path: Utf8PathBuf::from(path),
        message: message.to_owned(),
    }
}
