//! The pools a run draws from, loaded once before generation starts.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::PoolError;
use crate::generator::{Pool, WeightedPool, WordSource, photo_pool};
use crate::groups::{GroupDefinition, load_group_definitions};

/// System word list consulted when none is configured.
pub const DEFAULT_WORD_LIST: &str = "/usr/share/dict/words";

/// File names expected inside the data directory.
pub mod files {
    /// Given names, one per line.
    pub const FIRST_NAMES: &str = "first_names";
    /// Surnames, one per line.
    pub const LAST_NAMES: &str = "last_names";
    /// Street names, one per line.
    pub const STREETS: &str = "streets";
    /// State abbreviations, one per line.
    pub const STATES: &str = "states";
    /// City names, one per line.
    pub const CITIES: &str = "cities";
    /// Weighted employee types: `<weight> <type>`.
    pub const EMPLOYEE_TYPES: &str = "employee_types";
    /// Weighted login shells: `<weight> <shell>`.
    pub const SHELLS: &str = "shells";
    /// Secondary groups: `<ratio> <name>`.
    pub const GROUPS: &str = "groups";
}

/// Every pool the standard schema and the group builder need.
#[derive(Debug, Clone, PartialEq)]
pub struct Sources {
    /// Given names.
    pub first_names: Pool,
    /// Surnames.
    pub last_names: Pool,
    /// Street names.
    pub streets: Pool,
    /// State abbreviations.
    pub states: Pool,
    /// City names.
    pub cities: Pool,
    /// Weighted employee types.
    pub employee_types: WeightedPool,
    /// Weighted login shells.
    pub shells: WeightedPool,
    /// Secondary group definitions.
    pub groups: Vec<GroupDefinition>,
    /// Vocabulary for descriptions.
    pub words: WordSource,
    /// Photo URLs; `None` when no photo directory is configured.
    pub photos: Option<Pool>,
}

impl Sources {
    /// Loads every pool.
    ///
    /// `word_list` overrides the system word list. Without an override a
    /// missing system list falls back to the built-in lorem vocabulary; an
    /// explicit list that cannot be read is an error.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError`] if a pool file is missing, empty or malformed.
    pub fn load(
        data_dir: &Path,
        face_dir: Option<&Path>,
        word_list: Option<&Path>,
    ) -> Result<Self, PoolError> {
        debug!(data_dir = %data_dir.display(), "loading pools");
        let sources = Self {
            first_names: Pool::from_file(&data_dir.join(files::FIRST_NAMES))?,
            last_names: Pool::from_file(&data_dir.join(files::LAST_NAMES))?,
            streets: Pool::from_file(&data_dir.join(files::STREETS))?,
            states: Pool::from_file(&data_dir.join(files::STATES))?,
            cities: Pool::from_file(&data_dir.join(files::CITIES))?,
            employee_types: WeightedPool::from_file(&data_dir.join(files::EMPLOYEE_TYPES))?,
            shells: WeightedPool::from_file(&data_dir.join(files::SHELLS))?,
            groups: load_group_definitions(&data_dir.join(files::GROUPS))?,
            words: load_words(word_list)?,
            photos: face_dir.map(photo_pool).transpose()?,
        };
        debug!(
            first_names = sources.first_names.len(),
            last_names = sources.last_names.len(),
            groups = sources.groups.len(),
            photos = sources.photos.as_ref().map_or(0, Pool::len),
            "pools loaded"
        );
        Ok(sources)
    }
}

fn load_words(word_list: Option<&Path>) -> Result<WordSource, PoolError> {
    if let Some(path) = word_list {
        return Pool::from_file(path).map(WordSource::Pool);
    }
    match Pool::from_file(Path::new(DEFAULT_WORD_LIST)) {
        Ok(pool) => Ok(WordSource::Pool(pool)),
        Err(err @ PoolError::Malformed { .. }) => Err(err),
        Err(err) => {
            warn!(error = %err, "system word list unavailable; using lorem vocabulary");
            Ok(WordSource::Lorem)
        }
    }
}
