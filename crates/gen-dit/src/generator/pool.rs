//! Uniform and weighted value pools, optionally loaded from list files.
//!
//! List files hold one value per line. Blank lines and lines whose first
//! non-space character is `#` are skipped. Weighted files prefix each value
//! with an integer weight: `200 /bin/bash`.

use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};
use rand::Rng;
use rand::seq::IndexedRandom;
use rand::seq::index;

use crate::error::PoolError;

/// Reads a pool source file through a capability handle on its parent
/// directory.
///
/// # Errors
///
/// Returns [`PoolError::Io`] if the file cannot be opened or is not UTF-8.
pub fn read_source(path: &Path) -> Result<String, PoolError> {
    let io_error = |message: String| PoolError::Io {
        path: path.to_path_buf(),
        message,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io_error("pool path must be a file".to_owned()))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| io_error(err.to_string()))?;
    dir.read_to_string(Path::new(file_name))
        .map_err(|err| io_error(err.to_string()))
}

/// Yields `(line number, trimmed line)` for every data line in `contents`.
pub(crate) fn data_lines(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// A non-empty list of candidate values picked uniformly at random.
///
/// # Example
///
/// ```
/// use gen_dit::Pool;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let pool = Pool::new("domains", vec!["redhat".to_owned(), "example".to_owned()])
///     .expect("pool is non-empty");
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
///
/// let value = pool.pick(&mut rng).expect("non-empty pool");
/// assert!(value == "redhat" || value == "example");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    origin: String,
    values: Vec<String>,
}

impl Pool {
    /// Builds a pool from in-memory values.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Empty`] when `values` is empty.
    pub fn new(origin: impl Into<String>, values: Vec<String>) -> Result<Self, PoolError> {
        let resolved_origin = origin.into();
        if values.is_empty() {
            return Err(PoolError::Empty {
                origin: resolved_origin,
            });
        }
        Ok(Self {
            origin: resolved_origin,
            values,
        })
    }

    /// Builds a pool from list-file contents.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Empty`] when the contents hold no data lines.
    pub fn parse(origin: impl Into<String>, contents: &str) -> Result<Self, PoolError> {
        let values = data_lines(contents)
            .map(|(_, line)| line.to_owned())
            .collect();
        Self::new(origin, values)
    }

    /// Loads a pool from a list file.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Io`] if the file cannot be read and
    /// [`PoolError::Empty`] if it holds no values.
    pub fn from_file(path: &Path) -> Result<Self, PoolError> {
        let contents = read_source(path)?;
        Self::parse(path.display().to_string(), &contents)
    }

    /// Returns where the pool was loaded from.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns the candidate values.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns the number of candidate values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Picks one value uniformly at random.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.values.choose(rng).map(String::as_str)
    }

    /// Picks `amount` distinct positions without replacement.
    ///
    /// The amount is clamped to the pool size.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, amount: usize) -> Vec<&str> {
        let clamped = amount.min(self.values.len());
        index::sample(rng, self.values.len(), clamped)
            .into_iter()
            .filter_map(|position| self.values.get(position))
            .map(String::as_str)
            .collect()
    }
}

/// Values picked with probability proportional to an integer weight.
///
/// The cumulative table is built once when the pool is constructed. Each
/// pick draws `d` uniformly from `[0, total)` and returns the first value
/// whose cumulative bound is strictly greater than `d`, so a draw equal to a
/// bound belongs to the next value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedPool {
    origin: String,
    cumulative: Vec<(String, u64)>,
    total: u64,
}

impl WeightedPool {
    /// Builds a pool from `(value, weight)` pairs.
    ///
    /// A value listed twice keeps its first position and its last weight.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Malformed`] for zero weights and
    /// [`PoolError::Empty`] when no pairs are given.
    pub fn new(origin: impl Into<String>, weights: Vec<(String, u64)>) -> Result<Self, PoolError> {
        let resolved_origin = origin.into();
        let mut merged: Vec<(String, u64)> = Vec::with_capacity(weights.len());
        for (position, (value, weight)) in weights.into_iter().enumerate() {
            if weight == 0 {
                return Err(PoolError::Malformed {
                    origin: resolved_origin,
                    line: position + 1,
                    message: format!("weight for '{value}' must be positive"),
                });
            }
            if let Some(existing) = merged.iter_mut().find(|(known, _)| *known == value) {
                existing.1 = weight;
            } else {
                merged.push((value, weight));
            }
        }
        if merged.is_empty() {
            return Err(PoolError::Empty {
                origin: resolved_origin,
            });
        }

        let mut total: u64 = 0;
        let cumulative = merged
            .into_iter()
            .map(|(value, weight)| {
                total = total.saturating_add(weight);
                (value, total)
            })
            .collect();

        Ok(Self {
            origin: resolved_origin,
            cumulative,
            total,
        })
    }

    /// Builds a pool from weighted list-file contents.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Malformed`] for lines without a value or with a
    /// weight that is not a positive integer.
    pub fn parse(origin: impl Into<String>, contents: &str) -> Result<Self, PoolError> {
        let resolved_origin = origin.into();
        let mut weights = Vec::new();
        for (line_number, line) in data_lines(contents) {
            let malformed = |message: String| PoolError::Malformed {
                origin: resolved_origin.clone(),
                line: line_number,
                message,
            };
            let (raw_weight, raw_value) = line
                .split_once(char::is_whitespace)
                .ok_or_else(|| malformed("expected '<weight> <value>'".to_owned()))?;
            let weight = raw_weight
                .parse::<u64>()
                .map_err(|err| malformed(format!("invalid weight '{raw_weight}': {err}")))?;
            if weight == 0 {
                return Err(malformed(format!("weight for '{}' must be positive", raw_value.trim())));
            }
            weights.push((raw_value.trim().to_owned(), weight));
        }
        Self::new(resolved_origin, weights)
    }

    /// Loads a pool from a weighted list file.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, PoolError> {
        let contents = read_source(path)?;
        Self::parse(path.display().to_string(), &contents)
    }

    /// Returns where the pool was loaded from.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns the sum of all weights.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Returns the value whose cumulative range contains `draw`.
    ///
    /// `draw` is expected in `[0, total)`; larger draws yield `None`.
    #[must_use]
    pub fn select(&self, draw: u64) -> Option<&str> {
        self.cumulative
            .iter()
            .find(|(_, bound)| draw < *bound)
            .map(|(value, _)| value.as_str())
    }

    /// Picks one value with probability proportional to its weight.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        let draw = rng.random_range(0..self.total);
        self.select(draw)
    }
}
