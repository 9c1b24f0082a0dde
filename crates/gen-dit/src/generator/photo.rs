//! Photo selection from a directory of image files.

use std::path::{self, Path};

use cap_std::{ambient_authority, fs::Dir};

use crate::error::PoolError;
use crate::generator::pool::Pool;

/// Lists the regular files in `dir` as `file://` URLs, sorted by name.
///
/// The URLs are absolute so the LDIF loader can dereference them from any
/// working directory.
///
/// # Errors
///
/// Returns [`PoolError::Io`] if the directory cannot be read and
/// [`PoolError::Empty`] if it contains no files.
pub fn photo_pool(dir: &Path) -> Result<Pool, PoolError> {
    let io_error = |message: String| PoolError::Io {
        path: dir.to_path_buf(),
        message,
    };
    let absolute = path::absolute(dir).map_err(|err| io_error(err.to_string()))?;
    let handle =
        Dir::open_ambient_dir(dir, ambient_authority()).map_err(|err| io_error(err.to_string()))?;

    let mut names = Vec::new();
    for item in handle.entries().map_err(|err| io_error(err.to_string()))? {
        let entry = item.map_err(|err| io_error(err.to_string()))?;
        let is_file = entry
            .file_type()
            .map_err(|err| io_error(err.to_string()))?
            .is_file();
        if is_file {
            names.push(entry.file_name());
        }
    }
    names.sort();

    let urls = names
        .into_iter()
        .map(|name| format!("file://{}", absolute.join(name).display()))
        .collect();
    Pool::new(dir.display().to_string(), urls)
}
