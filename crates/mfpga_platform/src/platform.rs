//! The platform container: FPGAs, links and clusters.

use crate::cluster::Cluster;
use crate::fpga::Fpga;
use crate::link::Link;
use mfpga_common::{Arena, FpgaId, GroupId, InternalError, LinkId, MappingError};
use mfpga_design::Design;
use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The physical side of a mapping problem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Platform {
    fpgas: Arena<FpgaId, Fpga>,
    links: Arena<LinkId, Link>,
    clusters: Vec<Cluster>,
    /// Auxiliary index: FPGA name to ID (rebuilt on deserialization).
    #[serde(skip)]
    fpga_by_name: HashMap<String, FpgaId>,
}

impl Platform {
    /// Creates an empty platform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an FPGA and returns its ID. Cluster membership on the incoming
    /// FPGA is discarded; use [`add_fpga_to_cluster`](Self::add_fpga_to_cluster).
    pub fn add_fpga(&mut self, mut fpga: Fpga) -> FpgaId {
        let id = self.fpgas.next_id();
        fpga.id = id;
        fpga.set_cluster(None);
        self.fpga_by_name.insert(fpga.name.clone(), id);
        self.fpgas.alloc(fpga)
    }

    /// Adds a link between two FPGAs and returns its ID.
    pub fn add_link(&mut self, from: FpgaId, to: FpgaId, speed: f64, bidirectional: bool) -> LinkId {
        let arrow = if bidirectional { "<->" } else { "->" };
        let name = format!("{} {arrow} {}", self.fpgas[from].name, self.fpgas[to].name);
        let mut link = Link::new(name, from, to, speed);
        if !bidirectional {
            link = link.directed();
        }
        link.id = self.links.next_id();
        self.links.alloc(link)
    }

    /// Returns the FPGA with the given ID.
    pub fn fpga(&self, id: FpgaId) -> &Fpga {
        &self.fpgas[id]
    }

    /// Returns a mutable reference to the FPGA with the given ID.
    pub fn fpga_mut(&mut self, id: FpgaId) -> &mut Fpga {
        &mut self.fpgas[id]
    }

    /// Looks up an FPGA by name.
    pub fn fpga_by_name(&self, name: &str) -> Option<FpgaId> {
        self.fpga_by_name.get(name).copied()
    }

    /// All FPGAs.
    pub fn fpgas(&self) -> &Arena<FpgaId, Fpga> {
        &self.fpgas
    }

    /// Returns the link with the given ID.
    pub fn link(&self, id: LinkId) -> &Link {
        &self.links[id]
    }

    /// Returns a mutable reference to the link with the given ID.
    pub fn link_mut(&mut self, id: LinkId) -> &mut Link {
        &mut self.links[id]
    }

    /// All links.
    pub fn links(&self) -> &Arena<LinkId, Link> {
        &self.links
    }

    /// The first link that carries traffic from `a` to `b`.
    pub fn link_between(&self, a: FpgaId, b: FpgaId) -> Option<LinkId> {
        self.links
            .iter()
            .find(|(_, l)| l.connects(a, b))
            .map(|(id, _)| id)
    }

    /// All clusters in creation order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Looks up a cluster by name.
    pub fn cluster(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.name() == name)
    }

    fn slot(fpgas: &mut Arena<FpgaId, Fpga>, id: FpgaId) -> Result<&mut Fpga, MappingError> {
        fpgas.try_get_mut(id).ok_or_else(|| {
            InternalError::new(format!("FPGA {id} does not belong to this platform")).into()
        })
    }

    fn cluster_index(&self, name: &str) -> Result<usize, MappingError> {
        self.clusters
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| MappingError::UnknownCluster(name.to_string()))
    }

    /// Creates an empty cluster.
    pub fn add_cluster(&mut self, name: impl Into<String>) -> Result<(), MappingError> {
        let name = name.into();
        if self.cluster(&name).is_some() {
            return Err(MappingError::DuplicateCluster(name));
        }
        self.clusters.push(Cluster::new(name));
        Ok(())
    }

    /// Adds `fpga` to the named cluster.
    pub fn add_fpga_to_cluster(&mut self, cluster: &str, fpga: FpgaId) -> Result<(), MappingError> {
        let index = self.cluster_index(cluster)?;
        let member = Self::slot(&mut self.fpgas, fpga)?;
        self.clusters[index].add_fpga(member)
    }

    /// Removes `fpga` from the named cluster.
    pub fn remove_fpga_from_cluster(
        &mut self,
        cluster: &str,
        fpga: FpgaId,
    ) -> Result<(), MappingError> {
        let index = self.cluster_index(cluster)?;
        let member = Self::slot(&mut self.fpgas, fpga)?;
        self.clusters[index].remove_fpga(member)
    }

    /// Renames a cluster, updating every member's back-reference.
    pub fn rename_cluster(&mut self, old: &str, new: &str) -> Result<(), MappingError> {
        let index = self.cluster_index(old)?;
        if old != new && self.cluster(new).is_some() {
            return Err(MappingError::DuplicateCluster(new.to_string()));
        }
        self.clusters[index].rename(new, &mut self.fpgas);
        Ok(())
    }

    /// Maps `group` onto `fpga`.
    pub fn map_group(
        &mut self,
        fpga: FpgaId,
        design: &mut Design,
        group: GroupId,
    ) -> Result<(), MappingError> {
        Self::slot(&mut self.fpgas, fpga)?.map_group(design, group)
    }

    /// Unmaps `group` from `fpga`.
    pub fn unmap_group(
        &mut self,
        fpga: FpgaId,
        design: &mut Design,
        group: GroupId,
    ) -> Result<(), MappingError> {
        Self::slot(&mut self.fpgas, fpga)?.unmap_group(design, group)
    }

    /// Normalizes every link against the fastest one.
    pub fn normalize_links(&mut self) {
        let max_speed = self
            .links
            .values()
            .map(|l| l.speed)
            .fold(0.0_f64, f64::max);
        for (_, link) in self.links.iter_mut() {
            link.normalize_speed_to(max_speed);
        }
    }

    /// Sets `distance_from_input` of every FPGA to its hop count from the
    /// nearest input FPGA along the links. FPGAs unreachable from any input
    /// keep their configured distance. Does nothing if no FPGA is an input.
    pub fn compute_input_distances(&mut self) {
        let mut graph: DiGraph<FpgaId, ()> = DiGraph::new();
        let nodes: Vec<NodeIndex> = self.fpgas.ids().map(|id| graph.add_node(id)).collect();
        for link in self.links.values() {
            let (a, b) = (
                nodes[link.from.as_raw() as usize],
                nodes[link.to.as_raw() as usize],
            );
            graph.add_edge(a, b, ());
            if link.bidirectional {
                graph.add_edge(b, a, ());
            }
        }

        let mut nearest: HashMap<NodeIndex, u32> = HashMap::new();
        for (id, fpga) in self.fpgas.iter() {
            if !fpga.is_input {
                continue;
            }
            let hops = dijkstra(&graph, nodes[id.as_raw() as usize], None, |_| 1u32);
            for (node, distance) in hops {
                let slot = nearest.entry(node).or_insert(distance);
                *slot = (*slot).min(distance);
            }
        }

        for (id, fpga) in self.fpgas.iter_mut() {
            if let Some(&distance) = nearest.get(&nodes[id.as_raw() as usize]) {
                fpga.distance_from_input = distance;
            }
        }
        log::debug!("computed input distances for {} FPGA(s)", nearest.len());
    }

    /// Rebuilds auxiliary indices after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.fpga_by_name = self
            .fpgas
            .iter()
            .map(|(id, f)| (f.name.clone(), id))
            .collect();
    }
}
