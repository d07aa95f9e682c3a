//! Weighted hatch and evolution tables.
//!
//! The table maps a species to its candidate successors with relative
//! weights. Hatching and each evolution step draw one successor. A species
//! with no entry is terminal.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Candidate successors of one species, keyed by species name.
pub type Candidates = BTreeMap<String, f64>;

/// Species to weighted successor candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvolutionTable {
    entries: BTreeMap<String, Candidates>,
}

impl EvolutionTable {
    /// A table with no entries; every species is terminal.
    pub const fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add or replace the candidates for `species`.
    #[must_use]
    pub fn with_entry<I, S>(mut self, species: impl Into<String>, candidates: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let candidates = candidates
            .into_iter()
            .map(|(name, weight)| (name.into(), weight))
            .collect();
        self.entries.insert(species.into(), candidates);
        self
    }

    /// The successor candidates of `species`, if it has any.
    pub fn candidates(&self, species: &str) -> Option<&Candidates> {
        self.entries.get(species).filter(|c| !c.is_empty())
    }

    /// Whether `species` has no successors.
    pub fn is_terminal(&self, species: &str) -> bool {
        self.candidates(species).is_none()
    }

    /// Draw a successor of `species`.
    ///
    /// A uniform sample `r` in `[0, total)` is compared against the running
    /// sum of weights; the first candidate whose running sum exceeds `r`
    /// wins. Returns `None` when `species` is terminal.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn resolve(&self, species: &str, rng: &mut impl Rng) -> Option<String> {
        let candidates = self.candidates(species)?;
        let total: f64 = candidates.values().copied().sum();
        let first = candidates.keys().next()?;
        if !total.is_finite() || total <= 0.0 {
            return Some(first.clone());
        }

        let r = rng.random::<f64>() * total;
        let mut running = 0.0;
        for (name, weight) in candidates {
            running += weight;
            if running > r {
                return Some(name.clone());
            }
        }
        // Floating-point summation can leave `running` a hair below `r`.
        Some(first.clone())
    }

    /// Check that every weight is finite and non-negative and every entry
    /// has a positive total.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending species.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (species, candidates) in &self.entries {
            for (name, weight) in candidates {
                if !weight.is_finite() || *weight < 0.0 {
                    return Err(ConfigError::Invalid {
                        reason: format!("weight for {species} -> {name} must be non-negative, got {weight}"),
                    });
                }
            }
            let total: f64 = candidates.values().copied().sum();
            if !candidates.is_empty() && total <= 0.0 {
                return Err(ConfigError::Invalid {
                    reason: format!("candidates for {species} have zero total weight"),
                });
            }
        }
        Ok(())
    }
}

impl Default for EvolutionTable {
    /// The built-in line: one egg, two rookies, three champions, two
    /// ultimates, two terminal megas.
    fn default() -> Self {
        Self::empty()
            .with_entry("speckled_egg", [("mochi", 3.0), ("pebble", 1.0)])
            .with_entry("mochi", [("fluff", 2.0), ("sprout", 1.0)])
            .with_entry("pebble", [("sprout", 1.0), ("ember", 1.0)])
            .with_entry("fluff", [("guardian", 1.0)])
            .with_entry("sprout", [("guardian", 1.0), ("drake", 1.0)])
            .with_entry("ember", [("drake", 1.0)])
            .with_entry("guardian", [("titan", 1.0)])
            .with_entry("drake", [("wyrm", 2.0), ("titan", 1.0)])
    }
}
