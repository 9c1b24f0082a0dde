//! Generator configuration loaded via OrthoConfig.
//!
//! Values layer as defaults, then a configuration file, then `GEN_DIT_*`
//! environment variables, then command-line flags.

use std::path::PathBuf;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::error::RunError;
use crate::hierarchy::DEFAULT_TIER_COUNT;

const DEFAULT_SUFFIX: &str = "dc=example,dc=com";
const DEFAULT_USER_COUNT: usize = 1_000;
const DEFAULT_EMAIL_DOMAIN: &str = "example.com";
const DEFAULT_TIER_DUMP_NAME: &str = "gen-dit-tiers.json";

/// Constant `ou` value given to every generated person.
pub const ORGANIZATIONAL_UNIT: &str = "Global Learning Services";

/// Passphrase hashed into every generated `userPassword`.
pub const PASSPHRASE: &str = "redhat";

/// Directory holding the bundled pool files.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("lists")
}

fn default_tier_dump() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_TIER_DUMP_NAME)
}

/// Configuration values controlling one generation run.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GEN_DIT")]
pub struct GeneratorSettings {
    /// Emit the root domain and the People and Groups units first.
    #[ortho_config(default = false, cli_short = 'b')]
    pub create_base_entries: bool,
    /// Directory suffix every DN ends with.
    #[ortho_config(cli_short = 's')]
    pub suffix: Option<String>,
    /// Number of people to generate.
    #[ortho_config(cli_short = 'n')]
    pub nusers: Option<usize>,
    /// Domain used for generated mail addresses.
    #[ortho_config(cli_short = 'e')]
    pub email_domain: Option<String>,
    /// Directory holding the pool files.
    #[ortho_config(cli_short = 'd')]
    pub data_dir: Option<PathBuf>,
    /// Directory of photos; without it no `jpegPhoto` is generated.
    #[ortho_config(cli_short = 'f')]
    pub face_dir: Option<PathBuf>,
    /// Word list for descriptions, replacing the system list.
    #[ortho_config(cli_short = 'w')]
    pub word_list: Option<PathBuf>,
    /// RNG seed; a random seed is drawn and logged when absent.
    #[ortho_config(cli_short = 'S')]
    pub seed: Option<u64>,
    /// Number of management tiers.
    #[ortho_config(cli_short = 't')]
    pub tiers: Option<usize>,
    /// Path of the tier report side file.
    #[ortho_config(cli_short = 'T')]
    pub tier_dump: Option<PathBuf>,
}

impl GeneratorSettings {
    /// Return the configured suffix, falling back to the default.
    #[must_use]
    pub fn suffix(&self) -> &str {
        self.suffix.as_deref().unwrap_or(DEFAULT_SUFFIX)
    }

    /// Return the configured user count, falling back to the default.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.nusers.unwrap_or(DEFAULT_USER_COUNT)
    }

    /// Return the configured mail domain, falling back to the default.
    #[must_use]
    pub fn email_domain(&self) -> &str {
        self.email_domain.as_deref().unwrap_or(DEFAULT_EMAIL_DOMAIN)
    }

    /// Return the configured data directory, falling back to the bundled
    /// lists.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Return the configured tier count, falling back to the default.
    #[must_use]
    pub fn tier_count(&self) -> usize {
        self.tiers.unwrap_or(DEFAULT_TIER_COUNT)
    }

    /// Return the configured tier report path, falling back to the
    /// temporary directory.
    #[must_use]
    pub fn tier_dump(&self) -> PathBuf {
        self.tier_dump.clone().unwrap_or_else(default_tier_dump)
    }

    /// Resolves every default into the options a run consumes.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Config`] when the tier report path is not UTF-8.
    pub fn run_options(&self) -> Result<RunOptions, RunError> {
        let tier_dump = Utf8PathBuf::from_path_buf(self.tier_dump()).map_err(|path| {
            RunError::Config {
                message: format!("tier report path '{}' is not UTF-8", path.display()),
            }
        })?;
        Ok(RunOptions {
            create_base_entries: self.create_base_entries,
            suffix: self.suffix().to_owned(),
            user_count: self.user_count(),
            email_domain: self.email_domain().to_owned(),
            data_dir: self.data_dir(),
            face_dir: self.face_dir.clone(),
            word_list: self.word_list.clone(),
            seed: self.seed,
            tier_count: self.tier_count(),
            tier_dump,
        })
    }
}

/// Fully resolved run options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Emit the root domain and the People and Groups units first.
    pub create_base_entries: bool,
    /// Directory suffix every DN ends with.
    pub suffix: String,
    /// Number of people to generate.
    pub user_count: usize,
    /// Domain used for generated mail addresses.
    pub email_domain: String,
    /// Directory holding the pool files.
    pub data_dir: PathBuf,
    /// Directory of photos, if any.
    pub face_dir: Option<PathBuf>,
    /// Word list override, if any.
    pub word_list: Option<PathBuf>,
    /// RNG seed, if fixed.
    pub seed: Option<u64>,
    /// Number of management tiers.
    pub tier_count: usize,
    /// Path of the tier report side file.
    pub tier_dump: Utf8PathBuf,
}
