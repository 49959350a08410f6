//! Plain resource-amount vectors.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vector of named resource amounts (e.g. `{LUT: 120, FF: 64, BRAM: 2}`).
///
/// Resource names keep their first-seen order, which is also the tie-break
/// order for [`highest_resource`](Self::highest_resource) and
/// [`lowest_resource`](Self::lowest_resource). Absent names read as zero, and
/// equality treats an explicit zero the same as an absent entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceInfo {
    amounts: IndexMap<String, u64>,
}

impl ResourceInfo {
    /// Creates an empty resource vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, amount: u64) -> Self {
        self.set(name, amount);
        self
    }

    /// Sets the amount of a resource, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, amount: u64) {
        self.amounts.insert(name.into(), amount);
    }

    /// Returns the amount of a resource, or 0 if it is not present.
    pub fn get(&self, name: &str) -> u64 {
        self.amounts.get(name).copied().unwrap_or(0)
    }

    /// Returns `true` if the resource has an entry (even a zero one).
    pub fn contains(&self, name: &str) -> bool {
        self.amounts.contains_key(name)
    }

    /// Iterates over `(name, amount)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.amounts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Iterates over resource names in first-seen order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.amounts.keys().map(String::as_str)
    }

    /// Returns the number of named entries.
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Returns `true` if every amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amounts.values().all(|&v| v == 0)
    }

    /// Adds every amount of `other` into `self`.
    pub fn add(&mut self, other: &ResourceInfo) {
        for (name, amount) in other.iter() {
            let slot = self.amounts.entry(name.to_string()).or_insert(0);
            *slot = slot.saturating_add(amount);
        }
    }

    /// Subtracts every amount of `other` from `self`, flooring at zero.
    pub fn remove(&mut self, other: &ResourceInfo) {
        for (name, amount) in other.iter() {
            if let Some(slot) = self.amounts.get_mut(name) {
                *slot = slot.saturating_sub(amount);
            }
        }
    }

    /// Returns `self + other` without modifying either operand.
    pub fn plus(&self, other: &ResourceInfo) -> ResourceInfo {
        let mut out = self.clone();
        out.add(other);
        out
    }

    /// Returns `self - other` (floored at zero) without modifying either operand.
    pub fn minus(&self, other: &ResourceInfo) -> ResourceInfo {
        let mut out = self.clone();
        out.remove(other);
        out
    }

    /// Returns every amount multiplied by `factor`.
    pub fn scaled(&self, factor: u64) -> ResourceInfo {
        Self {
            amounts: self
                .amounts
                .iter()
                .map(|(k, v)| (k.clone(), v.saturating_mul(factor)))
                .collect(),
        }
    }

    /// Returns the sum of all amounts, used as a coarse size key.
    pub fn total_amount(&self) -> u64 {
        self.amounts.values().fold(0u64, |acc, v| acc.saturating_add(*v))
    }

    /// Returns `true` if every amount in `self` is at most the same amount in
    /// `other` (absent names in `other` count as zero).
    pub fn fits_within(&self, other: &ResourceInfo) -> bool {
        self.iter().all(|(name, amount)| amount <= other.get(name))
    }

    /// Returns the resource with the largest amount. Ties go to the resource
    /// seen first.
    pub fn highest_resource(&self) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (name, amount) in self.iter() {
            if best.map_or(true, |(_, b)| amount > b) {
                best = Some((name, amount));
            }
        }
        best
    }

    /// Returns the resource with the smallest amount. Ties go to the resource
    /// seen first.
    pub fn lowest_resource(&self) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (name, amount) in self.iter() {
            if best.map_or(true, |(_, b)| amount < b) {
                best = Some((name, amount));
            }
        }
        best
    }
}

impl PartialEq for ResourceInfo {
    fn eq(&self, other: &Self) -> bool {
        self.names()
            .chain(other.names())
            .all(|name| self.get(name) == other.get(name))
    }
}

impl Eq for ResourceInfo {}

impl<S: Into<String>> FromIterator<(S, u64)> for ResourceInfo {
    fn from_iter<T: IntoIterator<Item = (S, u64)>>(iter: T) -> Self {
        let mut info = ResourceInfo::new();
        for (name, amount) in iter {
            info.set(name, amount);
        }
        info
    }
}

impl fmt::Display for ResourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, amount)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {amount}")?;
        }
        write!(f, "}}")
    }
}
