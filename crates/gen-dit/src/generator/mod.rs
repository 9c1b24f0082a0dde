//! Attribute value generators.
//!
//! A [`Generator`] produces one attribute for one entry. Object-class
//! descriptors map attribute names to generators; the entry filler calls
//! [`Generator::generate`] in declared order, so derived generators can read
//! attributes produced earlier.

mod address;
mod derived;
mod digits;
mod password;
mod photo;
mod pool;

use fake::Fake;
use fake::faker::lorem::raw::Words;
use fake::locales::EN;
use rand::Rng;

use crate::attribute::{Attribute, Separator};
use crate::context::GenerationContext;
use crate::entry::Entry;
use crate::error::GenerationError;

pub use address::{AddressGenerator, StreetGenerator};
pub use derived::{CompositeTemplate, home_directory, is_login_char, salt_letter, username, username_for};
pub use digits::DigitTemplate;
pub use password::{PasswordHasher, SCHEME as PASSWORD_SCHEME, hash_with_salt, verify_password};
pub use photo::photo_pool;
pub use pool::{Pool, WeightedPool, read_source};

pub(crate) use pool::data_lines;

/// Fewest words in a generated description.
pub const DESCRIPTION_MIN_WORDS: usize = 10;

/// Most words in a generated description.
pub const DESCRIPTION_MAX_WORDS: usize = 20;

/// Where description words come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordSource {
    /// Sample without replacement from a word list.
    Pool(Pool),
    /// Use the built-in lorem-ipsum vocabulary.
    Lorem,
}

impl WordSource {
    /// Produces 10 to 20 words joined by single spaces.
    pub fn description<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        match self {
            Self::Pool(pool) => {
                let count = rng.random_range(DESCRIPTION_MIN_WORDS..=DESCRIPTION_MAX_WORDS);
                pool.sample(rng, count).join(" ")
            }
            Self::Lorem => {
                let words: Vec<String> =
                    Words(EN, DESCRIPTION_MIN_WORDS..DESCRIPTION_MAX_WORDS + 1).fake_with_rng(rng);
                words.join(" ")
            }
        }
    }
}

/// One way of producing an attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generator {
    /// The same string every time.
    Constant(String),
    /// Uniform pick from a pool.
    Pool(Pool),
    /// Weighted pick from a pool.
    Weighted(WeightedPool),
    /// Random digits substituted into a template.
    Digits(DigitTemplate),
    /// Next value of the named counter in the generation context.
    Counter(String),
    /// Template filled from other attributes of the entry.
    Composite(CompositeTemplate),
    /// House number and street name.
    Street(StreetGenerator),
    /// Full postal address.
    Address(AddressGenerator),
    /// `file://` URL of a photo, rendered with the URL separator.
    Photo(Pool),
    /// Salted hash of a fixed passphrase.
    Password(PasswordHasher),
    /// Login built from `givenName` and `sn`.
    Username,
    /// Home directory built from `uid`.
    HomeDirectory,
    /// Free text of random words.
    Description(WordSource),
    /// Whole days since the Unix epoch at run start.
    DaysSinceEpoch,
}

impl Generator {
    /// Builds a pool generator from literal values.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PoolError::Empty`] when `values` is empty.
    pub fn pool_of(origin: &str, values: &[&str]) -> Result<Self, crate::error::PoolError> {
        Pool::new(origin, values.iter().map(|value| (*value).to_owned()).collect()).map(Self::Pool)
    }

    /// Generates the attribute `name` for `entry`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] when a derived generator cannot find its
    /// source attributes, a counter is unknown, or a pool yields nothing.
    ///
    /// # Example
    ///
    /// ```
    /// use gen_dit::{Entry, EntryKind, GenerationContext, Generator};
    ///
    /// let generator = Generator::pool_of("domains", &["redhat", "example"]).expect("pool");
    /// let mut ctx = GenerationContext::new(42);
    /// let entry = Entry::new(EntryKind::DOMAIN);
    ///
    /// let attr = generator.generate("domain", &entry, &mut ctx).expect("generated");
    /// assert_eq!(attr.name(), "domain");
    /// assert!(attr.value() == "redhat" || attr.value() == "example");
    /// assert_eq!(attr.separator().as_str(), ":");
    /// ```
    pub fn generate(
        &self,
        name: &str,
        entry: &Entry,
        ctx: &mut GenerationContext,
    ) -> Result<Attribute, GenerationError> {
        let empty_pool = || GenerationError::EmptyPool {
            name: name.to_owned(),
        };
        let value = match self {
            Self::Constant(value) => value.clone(),
            Self::Pool(pool) => pool.pick(ctx.rng()).ok_or_else(empty_pool)?.to_owned(),
            Self::Weighted(pool) => pool.pick(ctx.rng()).ok_or_else(empty_pool)?.to_owned(),
            Self::Digits(template) => template.generate(ctx.rng()),
            Self::Counter(counter) => ctx.next_counter(counter)?.to_string(),
            Self::Composite(template) => template.render(entry)?,
            Self::Street(street) => street.generate(ctx.rng()).ok_or_else(empty_pool)?,
            Self::Address(address) => address.generate(ctx.rng()).ok_or_else(empty_pool)?,
            Self::Photo(photos) => {
                let url = photos.pick(ctx.rng()).ok_or_else(empty_pool)?;
                return Ok(Attribute::with_separator(name, url, Separator::Url));
            }
            Self::Password(hasher) => hasher.generate(ctx.rng()),
            Self::Username => username_for(entry, ctx.rng())?,
            Self::HomeDirectory => home_directory(entry)?,
            Self::Description(words) => words.description(ctx.rng()),
            Self::DaysSinceEpoch => ctx.days_since_epoch().to_string(),
        };
        Ok(Attribute::new(name, value))
    }
}
