//! Weighted scoring of FPGAs as mapping targets.
//!
//! The score combines how large an FPGA is relative to the average candidate
//! with how far it is from the design inputs:
//!
//! ```text
//! score = resource_weight * resource_score + io_weight * (distance_from_input + 1)
//! ```
//!
//! The comparator orders ascending by score with ties broken by FPGA name.
//! Which end of the order is "best" is up to the caller. With a positive
//! resource weight and a negative I/O weight, higher scores mean larger and
//! closer FPGAs, which is what [`FpgaComparator::best`] picks.

use crate::fpga::Fpga;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Weights for the FPGA score components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight of the normalized resource size.
    pub resource_weight: f64,
    /// Weight of the distance from the inputs (plus one).
    pub io_weight: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            resource_weight: 1.0,
            io_weight: -0.5,
        }
    }
}

/// Ranks FPGAs against the average total resources of a candidate set.
#[derive(Debug, Clone)]
pub struct FpgaComparator {
    weights: ScoreWeights,
    baseline: IndexMap<String, f64>,
}

impl FpgaComparator {
    /// Builds a comparator whose baseline is the average total resource
    /// vector of `candidates`.
    pub fn new<'a>(weights: ScoreWeights, candidates: impl IntoIterator<Item = &'a Fpga>) -> Self {
        let mut sums: IndexMap<String, f64> = IndexMap::new();
        let mut count = 0usize;
        for fpga in candidates {
            count += 1;
            for (name, entry) in fpga.resources().iter() {
                *sums.entry(name.to_string()).or_insert(0.0) += entry.total as f64;
            }
        }
        if count > 0 {
            for value in sums.values_mut() {
                *value /= count as f64;
            }
        }
        Self {
            weights,
            baseline: sums,
        }
    }

    /// The weights in use.
    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    /// Average total of each resource across the candidates.
    pub fn baseline(&self) -> &IndexMap<String, f64> {
        &self.baseline
    }

    /// Mean ratio of the FPGA's totals to the baseline over every resource
    /// with a positive baseline, clamped to be non-negative. An FPGA of
    /// exactly average size scores 1.
    pub fn resource_score(&self, fpga: &Fpga) -> f64 {
        let ratios: Vec<f64> = self
            .baseline
            .iter()
            .filter(|(_, avg)| **avg > 0.0)
            .map(|(name, &avg)| fpga.resources().total(name) as f64 / avg)
            .collect();
        if ratios.is_empty() {
            return 0.0;
        }
        (ratios.iter().sum::<f64>() / ratios.len() as f64).max(0.0)
    }

    /// The weighted score of `fpga`.
    pub fn weighted_score(&self, fpga: &Fpga) -> f64 {
        self.weights.resource_weight * self.resource_score(fpga)
            + self.weights.io_weight * (f64::from(fpga.distance_from_input) + 1.0)
    }

    /// Ascending order by score, ties broken by ordinal FPGA name.
    pub fn compare(&self, a: &Fpga, b: &Fpga) -> Ordering {
        self.weighted_score(a)
            .total_cmp(&self.weighted_score(b))
            .then_with(|| a.name.cmp(&b.name))
    }

    /// Sorts FPGAs ascending by [`compare`](Self::compare).
    pub fn sort(&self, fpgas: &mut [&Fpga]) {
        fpgas.sort_by(|a, b| self.compare(a, b));
    }

    fn best_first(&self, a: &Fpga, b: &Fpga) -> Ordering {
        self.weighted_score(b)
            .total_cmp(&self.weighted_score(a))
            .then_with(|| a.name.cmp(&b.name))
    }

    /// Sorts FPGAs best first: descending score, ties by ordinal name.
    pub fn rank(&self, fpgas: &mut [&Fpga]) {
        fpgas.sort_by(|a, b| self.best_first(a, b));
    }

    /// The highest-scoring candidate. Among equal scores the name that sorts
    /// first wins.
    pub fn best<'a>(&self, candidates: impl IntoIterator<Item = &'a Fpga>) -> Option<&'a Fpga> {
        candidates.into_iter().min_by(|a, b| self.best_first(a, b))
    }
}
