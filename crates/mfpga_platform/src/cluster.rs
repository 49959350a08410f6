//! Named sets of FPGAs (for example the FPGAs of one board).

use crate::fpga::Fpga;
use mfpga_common::{Arena, FpgaId, MappingError};
use serde::{Deserialize, Serialize};

/// A named set of FPGAs. An FPGA belongs to at most one cluster.
///
/// The cluster keeps the member IDs; each member keeps the cluster name as a
/// back-reference. Both sides are updated together by the methods here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    name: String,
    members: Vec<FpgaId>,
}

impl Cluster {
    /// Creates an empty cluster.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Cluster name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member FPGAs in insertion order.
    pub fn members(&self) -> &[FpgaId] {
        &self.members
    }

    /// Returns `true` if `fpga` is a member.
    pub fn contains(&self, fpga: FpgaId) -> bool {
        self.members.contains(&fpga)
    }

    /// Adds `fpga` to this cluster.
    ///
    /// Idempotent for a member; fails with
    /// [`MappingError::FpgaAlreadyClustered`] if the FPGA is in another
    /// cluster.
    pub fn add_fpga(&mut self, fpga: &mut Fpga) -> Result<(), MappingError> {
        match fpga.cluster() {
            Some(current) if current == self.name => {
                if !self.contains(fpga.id) {
                    self.members.push(fpga.id);
                }
                Ok(())
            }
            Some(current) => Err(MappingError::FpgaAlreadyClustered {
                fpga: fpga.name.clone(),
                cluster: current.to_string(),
            }),
            None => {
                self.members.push(fpga.id);
                fpga.set_cluster(Some(self.name.clone()));
                Ok(())
            }
        }
    }

    /// Removes `fpga` from this cluster.
    ///
    /// Fails with [`MappingError::FpgaNotClustered`] if the FPGA is not a
    /// member, including when it belongs to another cluster.
    pub fn remove_fpga(&mut self, fpga: &mut Fpga) -> Result<(), MappingError> {
        if fpga.cluster() != Some(self.name.as_str()) {
            return Err(MappingError::FpgaNotClustered {
                fpga: fpga.name.clone(),
                cluster: self.name.clone(),
            });
        }
        self.members.retain(|&m| m != fpga.id);
        fpga.set_cluster(None);
        Ok(())
    }

    /// Renames the cluster and updates every FPGA that refers to the old
    /// name.
    pub fn rename(&mut self, name: impl Into<String>, fpgas: &mut Arena<FpgaId, Fpga>) {
        let name = name.into();
        for (_, fpga) in fpgas.iter_mut() {
            if fpga.cluster() == Some(self.name.as_str()) {
                fpga.set_cluster(Some(name.clone()));
            }
        }
        self.name = name;
    }
}
