//! Street and postal address composition.

use rand::Rng;

use crate::generator::digits::DigitTemplate;
use crate::generator::pool::Pool;

const HOUSE_NUMBER: &str = "%d%d%d%d";
const ZIP_CODE: &str = "%d%d%d%d%d-%d%d%d%d";

/// Produces `"<house number> <street name>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetGenerator {
    number: DigitTemplate,
    streets: Pool,
}

impl StreetGenerator {
    /// Picks street names from `streets`.
    #[must_use]
    pub fn new(streets: Pool) -> Self {
        Self {
            number: DigitTemplate::new(HOUSE_NUMBER),
            streets,
        }
    }

    /// Generates one street line.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        let number = self.number.generate(rng);
        let street = self.streets.pick(rng)?;
        Some(format!("{number} {street}"))
    }
}

/// Produces an LDAP postal address: `"<street> $ <city>, <state> <zip>"`.
///
/// `$` separates address lines in the postal address syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressGenerator {
    street: StreetGenerator,
    cities: Pool,
    states: Pool,
    zip: DigitTemplate,
}

impl AddressGenerator {
    /// Builds an address generator from street, city and state pools.
    #[must_use]
    pub fn new(streets: Pool, cities: Pool, states: Pool) -> Self {
        Self {
            street: StreetGenerator::new(streets),
            cities,
            states,
            zip: DigitTemplate::new(ZIP_CODE),
        }
    }

    /// Generates one postal address.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        let street = self.street.generate(rng)?;
        let state = self.states.pick(rng)?;
        let city = self.cities.pick(rng)?;
        let zip = self.zip.generate(rng);
        Some(format!("{street} $ {city}, {state} {zip}"))
    }
}
