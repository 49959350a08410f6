//! Total/used resource ledger with atomic allocation transactions.

use crate::info::ResourceInfo;
use indexmap::IndexMap;
use mfpga_common::MappingError;
use serde::{Deserialize, Serialize};

/// The `(total, used)` pair tracked for one resource.
///
/// Allocation keeps `used <= total`. A deserialized snapshot may break it,
/// in which case nothing is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Capacity of the resource.
    pub total: u64,
    /// Amount currently allocated.
    pub used: u64,
}

impl ResourceEntry {
    /// Returns `total - used`, or 0 for an entry already over its total.
    pub fn available(&self) -> u64 {
        self.total.saturating_sub(self.used)
    }
}

/// A ledger of named resources with total, used and available amounts.
///
/// Queries for unknown resource names return 0. Allocation and deallocation
/// validate every resource of the delta before touching any of them, so a
/// failed transaction has no partial effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSet {
    entries: IndexMap<String, ResourceEntry>,
}

impl ResourceSet {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger with the given totals and nothing used.
    pub fn from_totals(totals: &ResourceInfo) -> Self {
        Self {
            entries: totals
                .iter()
                .map(|(name, total)| (name.to_string(), ResourceEntry { total, used: 0 }))
                .collect(),
        }
    }

    /// Sets the total capacity of a resource.
    ///
    /// Fails with [`MappingError::ResourceAllocation`] if `amount` is below the
    /// amount currently used.
    pub fn set_total(&mut self, name: &str, amount: u64) -> Result<(), MappingError> {
        let used = self.used(name);
        if amount < used {
            return Err(MappingError::ResourceAllocation {
                resource: name.to_string(),
                reason: format!("cannot set total to {amount} while {used} is in use"),
            });
        }
        self.entries.entry(name.to_string()).or_default().total = amount;
        Ok(())
    }

    /// Returns the total capacity of a resource (0 if unknown).
    pub fn total(&self, name: &str) -> u64 {
        self.entries.get(name).map_or(0, |e| e.total)
    }

    /// Returns the used amount of a resource (0 if unknown).
    pub fn used(&self, name: &str) -> u64 {
        self.entries.get(name).map_or(0, |e| e.used)
    }

    /// Returns the available amount of a resource (0 if unknown).
    pub fn available(&self, name: &str) -> u64 {
        self.entries.get(name).map_or(0, ResourceEntry::available)
    }

    /// Returns the ledger entry for a resource, if present.
    pub fn entry(&self, name: &str) -> Option<ResourceEntry> {
        self.entries.get(name).copied()
    }

    /// Iterates over `(name, entry)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ResourceEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Atomically increases `used` by every amount in `delta`.
    ///
    /// Fails without any effect if some resource would exceed its total.
    pub fn allocate(&mut self, delta: &ResourceInfo) -> Result<(), MappingError> {
        for (name, amount) in delta.iter() {
            let entry = self.entries.get(name).copied().unwrap_or_default();
            let new_used = entry.used.checked_add(amount);
            if new_used.map_or(true, |u| u > entry.total) {
                return Err(MappingError::ResourceAllocation {
                    resource: name.to_string(),
                    reason: format!(
                        "allocating {amount} exceeds total {} (used {})",
                        entry.total, entry.used
                    ),
                });
            }
        }
        for (name, amount) in delta.iter() {
            if amount == 0 {
                continue;
            }
            if let Some(entry) = self.entries.get_mut(name) {
                entry.used += amount;
            }
        }
        Ok(())
    }

    /// Atomically decreases `used` by every amount in `delta`.
    ///
    /// Fails without any effect if some resource would drop below zero.
    pub fn deallocate(&mut self, delta: &ResourceInfo) -> Result<(), MappingError> {
        for (name, amount) in delta.iter() {
            let used = self.used(name);
            if amount > used {
                return Err(MappingError::ResourceAllocation {
                    resource: name.to_string(),
                    reason: format!("releasing {amount} exceeds used amount {used}"),
                });
            }
        }
        for (name, amount) in delta.iter() {
            if amount == 0 {
                continue;
            }
            if let Some(entry) = self.entries.get_mut(name) {
                entry.used -= amount;
            }
        }
        Ok(())
    }

    /// Returns `true` if every resource in `required` has at least that much
    /// available. Resources missing from the ledger have 0 available.
    pub fn can_support(&self, required: &ResourceInfo) -> bool {
        required
            .iter()
            .all(|(name, amount)| self.available(name) >= amount)
    }

    /// Returns the totals as a plain resource vector.
    pub fn total_info(&self) -> ResourceInfo {
        self.entries.iter().map(|(k, e)| (k.clone(), e.total)).collect()
    }

    /// Returns the used amounts as a plain resource vector.
    pub fn used_info(&self) -> ResourceInfo {
        self.entries.iter().map(|(k, e)| (k.clone(), e.used)).collect()
    }

    /// Returns the available amounts as a plain resource vector.
    pub fn available_info(&self) -> ResourceInfo {
        self.entries
            .iter()
            .map(|(k, e)| (k.clone(), e.available()))
            .collect()
    }

    /// Renders the needed-versus-available table for `required`, one
    /// `'{resource}' : {needed} / {available}` line per non-zero requirement.
    pub fn support_report(&self, required: &ResourceInfo) -> String {
        required
            .iter()
            .filter(|(_, needed)| *needed > 0)
            .map(|(name, needed)| format!("'{name}' : {needed} / {}", self.available(name)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
