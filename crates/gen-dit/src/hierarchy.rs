//! Management hierarchy: people sorted into tiers of shrinking size.
//!
//! Each person draws one exponential sample. Samples are scaled by
//! `max + 1` into `[0, 1)` and spread over the tiers, so tier 0 collects
//! most of the population and each higher tier holds fewer people. A
//! person's manager is a random member of the first non-empty tier above
//! their own, which rules out self-management and sideways or downward
//! reporting.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;
use crate::error::HierarchyError;
use crate::registry::Registry;

/// Tier count used when none is configured.
pub const DEFAULT_TIER_COUNT: usize = 6;

/// Attribute naming a person's manager by DN.
pub const MANAGER: &str = "manager";

/// People partitioned into management tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgChart {
    tiers: Vec<Vec<String>>,
    lookup: HashMap<String, usize>,
}

impl OrgChart {
    /// Draws one exponential sample per identifier and assigns tiers.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::NoTiers`] when `tier_count` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use gen_dit::OrgChart;
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let people: Vec<String> = (0..100).map(|i| format!("user{i}")).collect();
    /// let mut rng = ChaCha8Rng::seed_from_u64(7);
    ///
    /// let chart = OrgChart::assign(&people, 6, &mut rng).expect("six tiers");
    /// assert_eq!(chart.sizes().iter().sum::<usize>(), 100);
    /// ```
    pub fn assign<S, R>(
        identifiers: &[S],
        tier_count: usize,
        rng: &mut R,
    ) -> Result<Self, HierarchyError>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let samples = identifiers
            .iter()
            .map(|identifier| (identifier.as_ref().to_owned(), exponential_sample(rng)))
            .collect();
        Self::from_samples(samples, tier_count)
    }

    /// Assigns tiers from precomputed non-negative samples.
    ///
    /// A repeated identifier keeps the tier of its first sample.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::NoTiers`] when `tier_count` is zero.
    pub fn from_samples(
        samples: Vec<(String, f64)>,
        tier_count: usize,
    ) -> Result<Self, HierarchyError> {
        if tier_count == 0 {
            return Err(HierarchyError::NoTiers);
        }
        let biggest = samples
            .iter()
            .map(|(_, sample)| *sample)
            .fold(0.0, f64::max);
        let mut tiers = vec![Vec::new(); tier_count];
        let mut lookup = HashMap::with_capacity(samples.len());
        for (identifier, sample) in samples {
            if lookup.contains_key(&identifier) {
                continue;
            }
            let tier = tier_index(sample, biggest, tier_count);
            if let Some(members) = tiers.get_mut(tier) {
                lookup.insert(identifier.clone(), tier);
                members.push(identifier);
            }
        }
        Ok(Self { tiers, lookup })
    }

    /// Returns the number of tiers, including empty ones.
    #[must_use]
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Returns how many people were placed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Returns `true` when nobody was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Returns the population of each tier, bottom first.
    #[must_use]
    pub fn sizes(&self) -> Vec<usize> {
        self.tiers.iter().map(Vec::len).collect()
    }

    /// Returns the members of tier `index` in placement order.
    #[must_use]
    pub fn tier(&self, index: usize) -> Option<&[String]> {
        self.tiers.get(index).map(Vec::as_slice)
    }

    /// Returns the tier holding `identifier`.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::UnknownMember`] if the identifier was not
    /// placed.
    pub fn tier_of(&self, identifier: &str) -> Result<usize, HierarchyError> {
        self.lookup
            .get(identifier)
            .copied()
            .ok_or_else(|| HierarchyError::UnknownMember {
                identifier: identifier.to_owned(),
            })
    }

    /// Picks a manager for `identifier` from the first populated tier above.
    ///
    /// Returns `Ok(None)` for people in the topmost populated tier.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::UnknownMember`] if the identifier was not
    /// placed.
    pub fn manager_for<R: Rng + ?Sized>(
        &self,
        identifier: &str,
        rng: &mut R,
    ) -> Result<Option<&str>, HierarchyError> {
        let own = self.tier_of(identifier)?;
        let manager = self
            .tiers
            .iter()
            .skip(own + 1)
            .find(|members| !members.is_empty())
            .and_then(|members| members.choose(rng))
            .map(String::as_str);
        Ok(manager)
    }

    /// Builds the `manager` attribute for `identifier`, naming the manager
    /// by DN.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::UnknownMember`] if the identifier was not
    /// placed or the chosen manager is not in `people`.
    pub fn manager_attribute<R: Rng + ?Sized>(
        &self,
        identifier: &str,
        people: &Registry,
        suffix: &str,
        rng: &mut R,
    ) -> Result<Option<Attribute>, HierarchyError> {
        let Some(manager) = self.manager_for(identifier, rng)? else {
            return Ok(None);
        };
        let entry = people
            .get(manager)
            .ok_or_else(|| HierarchyError::UnknownMember {
                identifier: manager.to_owned(),
            })?;
        Ok(Some(Attribute::new(MANAGER, entry.dn(suffix))))
    }

    /// Summarises the tier populations for the diagnostics side file.
    #[must_use]
    pub fn report(&self) -> TierReport {
        let tiers = self
            .tiers
            .iter()
            .enumerate()
            .map(|(tier, members)| TierSummary {
                tier,
                size: members.len(),
                members: members.clone(),
            })
            .collect();
        TierReport { tiers }
    }
}

/// Serialisable tier population map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierReport {
    /// One summary per tier, bottom first.
    pub tiers: Vec<TierSummary>,
}

/// Population of a single tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSummary {
    /// Tier index; 0 is the bottom of the organisation.
    pub tier: usize,
    /// Number of members.
    pub size: usize,
    /// Member identifiers in placement order.
    pub members: Vec<String>,
}

#[expect(
    clippy::float_arithmetic,
    reason = "inverse-CDF transform of a uniform draw"
)]
fn exponential_sample<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let uniform: f64 = rng.random();
    -(1.0 - uniform).ln()
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "scaled samples lie in [0, tier_count) and are truncated to a tier index"
)]
fn tier_index(sample: f64, biggest: f64, tier_count: usize) -> usize {
    let scaled = sample / (biggest + 1.0) * tier_count as f64;
    (scaled as usize).min(tier_count.saturating_sub(1))
}
