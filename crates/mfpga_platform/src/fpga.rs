//! Physical FPGAs and the group mapping state machine.
//!
//! Each `(FPGA, group)` pair is either unmapped or mapped. [`Fpga::map_group`]
//! moves a group from unmapped to mapped by allocating its resources plus the
//! marginal interconnect cost and seating its attachments on the fabric;
//! [`Fpga::unmap_group`] reverses both steps.
//!
//! The resources charged for the interconnect are always
//! `infrastructure_cost(ports_in_use)`: mapping charges the growth from the
//! current port count, unmapping releases the shrink back to the remaining
//! port count.

use crate::vortex::{Vortex, VortexSpec};
use mfpga_common::{ComponentId, FpgaId, GroupId, MappingError, MfpgaResult};
use mfpga_design::{Design, GroupTarget};
use mfpga_resource::{ResourceInfo, ResourceSet};
use serde::{Deserialize, Serialize};

/// A physical FPGA that hosts mapped groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fpga {
    /// Assigned when the FPGA is added to a [`Platform`](crate::Platform).
    pub id: FpgaId,
    /// Unique name within the platform.
    pub name: String,
    /// Architecture family (e.g. `artix7`).
    pub family: String,
    /// Whether this FPGA hosts the design inputs.
    pub is_input: bool,
    /// Hop distance from the nearest input FPGA (0 for an input FPGA).
    pub distance_from_input: u32,
    resources: ResourceSet,
    vortex_spec: VortexSpec,
    vortex: Vortex,
    mapped: Vec<GroupId>,
    cluster: Option<String>,
}

impl Fpga {
    /// Creates an empty FPGA with the given total resources.
    pub fn new(
        name: impl Into<String>,
        family: impl Into<String>,
        totals: &ResourceInfo,
        vortex_spec: VortexSpec,
    ) -> Self {
        Self {
            id: FpgaId::from_raw(0),
            name: name.into(),
            family: family.into(),
            is_input: false,
            distance_from_input: 0,
            resources: ResourceSet::from_totals(totals),
            vortex: Vortex::new(vortex_spec.ports_per_router),
            vortex_spec,
            mapped: Vec::new(),
            cluster: None,
        }
    }

    /// Marks the FPGA as an input source.
    pub fn as_input(mut self) -> Self {
        self.is_input = true;
        self.distance_from_input = 0;
        self
    }

    /// Sets the configured distance from the inputs.
    pub fn with_distance(mut self, distance: u32) -> Self {
        self.distance_from_input = distance;
        self
    }

    /// The resource ledger.
    pub fn resources(&self) -> &ResourceSet {
        &self.resources
    }

    /// Changes the total of one resource. Fails if it would drop below the
    /// amount in use.
    pub fn set_total(&mut self, resource: &str, amount: u64) -> Result<(), MappingError> {
        self.resources.set_total(resource, amount)
    }

    /// Total resources.
    pub fn total_resources(&self) -> ResourceInfo {
        self.resources.total_info()
    }

    /// Used resources.
    pub fn used_resources(&self) -> ResourceInfo {
        self.resources.used_info()
    }

    /// Available resources.
    pub fn available_resources(&self) -> ResourceInfo {
        self.resources.available_info()
    }

    /// Router geometry and fabric cost model.
    pub fn vortex_spec(&self) -> &VortexSpec {
        &self.vortex_spec
    }

    /// The router/bridge topology.
    pub fn vortex(&self) -> &Vortex {
        &self.vortex
    }

    /// Cluster this FPGA belongs to, if any.
    pub fn cluster(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    pub(crate) fn set_cluster(&mut self, cluster: Option<String>) {
        self.cluster = cluster;
    }

    /// Groups mapped here, in mapping order.
    pub fn mapped_groups(&self) -> &[GroupId] {
        &self.mapped
    }

    /// Returns `true` if `group` is mapped here.
    pub fn is_mapped_here(&self, group: GroupId) -> bool {
        self.mapped.contains(&group)
    }

    /// Components of every mapped group.
    pub fn mapped_components(&self, design: &Design) -> Vec<ComponentId> {
        self.mapped
            .iter()
            .flat_map(|&g| design.group(g).members().iter().copied())
            .collect()
    }

    /// Component attachments currently seated on the fabric.
    pub fn ports_in_use(&self) -> u32 {
        self.vortex.attached_port_count()
    }

    /// Cost of the fabric at its current port count.
    pub fn current_infrastructure_cost(&self) -> MfpgaResult<ResourceInfo> {
        self.vortex_spec.infrastructure_cost(self.ports_in_use())
    }

    /// Extra fabric resources needed to seat `group`'s attachments on top of
    /// what is already attached.
    pub fn infrastructure_cost_to_support(
        &self,
        design: &Design,
        group: GroupId,
    ) -> MfpgaResult<ResourceInfo> {
        self.vortex_spec
            .marginal_cost(self.ports_in_use(), design.group_port_count(group))
    }

    /// Resources `group` needs here: member requirements plus fabric growth.
    pub fn resources_to_support(
        &self,
        design: &Design,
        group: GroupId,
    ) -> MfpgaResult<ResourceInfo> {
        let mut needed = design.required_resources(group);
        needed.add(&self.infrastructure_cost_to_support(design, group)?);
        Ok(needed)
    }

    /// Returns `true` if the available resources cover `group` and the
    /// fabric growth it causes.
    pub fn has_sufficient_resources(&self, design: &Design, group: GroupId) -> MfpgaResult<bool> {
        let needed = self.resources_to_support(design, group)?;
        Ok(self.resources.can_support(&needed))
    }

    /// Maps `group` onto this FPGA.
    ///
    /// Mapping a group that is already mapped here succeeds without effect.
    /// If the fabric rejects an attachment, the allocation and any attachments
    /// already seated are rolled back before the error is returned.
    pub fn map_group(&mut self, design: &mut Design, group: GroupId) -> Result<(), MappingError> {
        if let Some(target) = design.group(group).target() {
            if target.fpga == self.id && self.is_mapped_here(group) {
                return Ok(());
            }
            return Err(MappingError::GroupAlreadyMapped {
                group: design.group(group).name.clone(),
                target: target.name.clone(),
            });
        }

        let needed = self.resources_to_support(design, group)?;
        if !self.resources.can_support(&needed) {
            return Err(MappingError::InsufficientResources {
                fpga: self.name.clone(),
                group: design.group(group).name.clone(),
                report: self.resources.support_report(&needed),
            });
        }
        self.resources.allocate(&needed)?;

        let members = design.group(group).members().to_vec();
        for (index, &member) in members.iter().enumerate() {
            let component = design.component(member);
            let ports: Vec<String> = component
                .attachments
                .iter()
                .map(|a| a.name().to_string())
                .collect();
            if self.vortex.attach(member, &ports) {
                continue;
            }
            let err = MappingError::AttachmentRejected {
                fpga: self.name.clone(),
                component: component.name.clone(),
                ports: ports.len() as u32,
                capacity: self.vortex_spec.ports_per_router,
            };
            for &seated in &members[..index] {
                self.vortex.detach(seated);
            }
            self.resources.deallocate(&needed)?;
            log::warn!("rolled back mapping of group '{}': {err}", design.group(group).name);
            return Err(err);
        }

        self.mapped.push(group);
        design.group_mut(group).set_target(GroupTarget {
            fpga: self.id,
            name: self.name.clone(),
        });
        log::debug!(
            "mapped group '{}' to FPGA '{}' ({} routers, used {})",
            design.group(group).name,
            self.name,
            self.vortex.router_count(),
            self.resources.used_info()
        );
        Ok(())
    }

    /// Unmaps `group` from this FPGA, releasing its resources and detaching
    /// its components from the fabric.
    pub fn unmap_group(&mut self, design: &mut Design, group: GroupId) -> Result<(), MappingError> {
        if design.group(group).target_fpga() != Some(self.id) || !self.is_mapped_here(group) {
            return Err(MappingError::GroupNotMapped {
                group: design.group(group).name.clone(),
                fpga: self.name.clone(),
            });
        }

        let ports = design.group_port_count(group);
        let current = self.ports_in_use();
        let mut release = design.required_resources(group);
        release.add(
            &self
                .vortex_spec
                .marginal_cost(current.saturating_sub(ports), ports)?,
        );
        self.resources.deallocate(&release)?;

        for &member in design.group(group).members() {
            self.vortex.detach(member);
        }
        self.mapped.retain(|&g| g != group);
        design.group_mut(group).clear_target();
        log::debug!(
            "unmapped group '{}' from FPGA '{}'",
            design.group(group).name,
            self.name
        );
        Ok(())
    }
}
