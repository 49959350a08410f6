//! The on-chip interconnect fabric (vortex) of one FPGA.
//!
//! The fabric is built from routers with a fixed number of ports. Every
//! component attachment occupies one port. When a component no longer fits
//! on any router, a new router is added and bridged to the fullest one; each
//! bridge occupies one port on both of its routers. Routers and bridges
//! always form a tree.
//!
//! Two views of the fabric exist:
//!
//! - [`VortexSpec`] is the pure cost model: given a port count it returns how
//!   many routers (and bridges) are needed and what they cost. Resource
//!   accounting in [`Fpga`](crate::Fpga) uses only this view.
//! - [`Vortex`] is the concrete topology (which attachment sits on which
//!   router), consumed by hardware-project emitters.

use mfpga_common::{BridgeId, ComponentId, InternalError, MfpgaResult, RouterId};
use mfpga_resource::ResourceInfo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Upper bound on fixed-point iterations in [`VortexSpec::router_count_for`].
///
/// Each iteration adds at least one router, and the count is bounded by
/// `ports / (ports_per_router - 2) + 1`, so any reasonable fabric converges
/// in a handful of steps.
pub const MAX_ROUTER_ITERATIONS: u32 = 64;

/// Router geometry and the resource cost of fabric building blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VortexSpec {
    /// Ports on one router. Must be greater than 2.
    pub ports_per_router: u32,
    /// Resources of one router instance.
    pub router: ResourceInfo,
    /// Resources of one bridge instance.
    pub bridge: ResourceInfo,
    /// Resources of one bridge endpoint (two per bridge).
    pub bridge_endpoint: ResourceInfo,
}

impl Default for VortexSpec {
    fn default() -> Self {
        Self {
            ports_per_router: 8,
            router: ResourceInfo::new(),
            bridge: ResourceInfo::new(),
            bridge_endpoint: ResourceInfo::new(),
        }
    }
}

impl VortexSpec {
    /// Number of routers needed to seat `ports` component attachments.
    ///
    /// Every router beyond the first brings a bridge whose two endpoints take
    /// two more ports, which may in turn require another router. The count is
    /// iterated to a fixed point.
    pub fn router_count_for(&self, ports: u32) -> MfpgaResult<u32> {
        if ports == 0 {
            return Ok(0);
        }
        if self.ports_per_router == 0 {
            return Err(InternalError::new("router port capacity is zero"));
        }
        let cap = u64::from(self.ports_per_router);
        let ports = u64::from(ports);
        let mut routers = ports.div_ceil(cap);
        for iteration in 0..MAX_ROUTER_ITERATIONS {
            let needed = ports + 2 * (routers - 1);
            let next = needed.div_ceil(cap);
            log::trace!("router fixed point #{iteration}: {needed} ports -> {next} routers");
            if next == routers {
                return u32::try_from(routers)
                    .map_err(|_| InternalError::new(format!("router count {routers} overflows")));
            }
            routers = next;
        }
        Err(InternalError::new(format!(
            "router count for {ports} ports did not converge after {MAX_ROUTER_ITERATIONS} iterations \
             (ports per router: {})",
            self.ports_per_router
        )))
    }

    /// Total fabric cost for `ports` attachments: routers, bridges and two
    /// endpoints per bridge.
    pub fn infrastructure_cost(&self, ports: u32) -> MfpgaResult<ResourceInfo> {
        let routers = self.router_count_for(ports)?;
        let bridges = routers.saturating_sub(1);
        let mut cost = self.router.scaled(u64::from(routers));
        cost.add(&self.bridge.scaled(u64::from(bridges)));
        cost.add(&self.bridge_endpoint.scaled(2 * u64::from(bridges)));
        Ok(cost)
    }

    /// Cost of growing the fabric from `current` to `current + additional`
    /// ports.
    pub fn marginal_cost(&self, current: u32, additional: u32) -> MfpgaResult<ResourceInfo> {
        let before = self.infrastructure_cost(current)?;
        let after = self.infrastructure_cost(current.saturating_add(additional))?;
        Ok(after.minus(&before))
    }
}

/// One attachment seated on a router port.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortBinding {
    /// The component owning the attachment.
    pub component: ComponentId,
    /// Attachment name within the component.
    pub attachment: String,
}

/// A router instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Router {
    /// Router ID, local to the fabric.
    pub id: RouterId,
    /// Port capacity.
    pub capacity: u32,
    /// Component attachments seated on this router.
    pub bindings: Vec<PortBinding>,
    /// Bridges with an endpoint on this router.
    pub bridges: Vec<BridgeId>,
}

impl Router {
    fn new(id: RouterId, capacity: u32) -> Self {
        Self {
            id,
            capacity,
            bindings: Vec::new(),
            bridges: Vec::new(),
        }
    }

    /// Ports taken by attachments and bridge endpoints.
    pub fn used_ports(&self) -> u32 {
        (self.bindings.len() + self.bridges.len()) as u32
    }

    /// Ports still free.
    pub fn free_ports(&self) -> u32 {
        self.capacity.saturating_sub(self.used_ports())
    }

    fn components(&self) -> Vec<ComponentId> {
        let mut out: Vec<ComponentId> = Vec::new();
        for b in &self.bindings {
            if !out.contains(&b.component) {
                out.push(b.component);
            }
        }
        out
    }

    fn ports_of(&self, component: ComponentId) -> u32 {
        self.bindings
            .iter()
            .filter(|b| b.component == component)
            .count() as u32
    }
}

/// A bridge between two routers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bridge {
    /// Bridge ID, local to the fabric.
    pub id: BridgeId,
    /// One endpoint.
    pub a: RouterId,
    /// The other endpoint.
    pub b: RouterId,
}

impl Bridge {
    fn other(&self, router: RouterId) -> RouterId {
        if self.a == router {
            self.b
        } else {
            self.a
        }
    }
}

/// The concrete router/bridge topology of one FPGA.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vortex {
    ports_per_router: u32,
    routers: BTreeMap<RouterId, Router>,
    bridges: BTreeMap<BridgeId, Bridge>,
    next_router: u32,
    next_bridge: u32,
}

impl Vortex {
    /// Creates an empty fabric whose routers have `ports_per_router` ports.
    pub fn new(ports_per_router: u32) -> Self {
        Self {
            ports_per_router,
            ..Self::default()
        }
    }

    /// Port capacity of each router.
    pub fn ports_per_router(&self) -> u32 {
        self.ports_per_router
    }

    /// Routers in ID order.
    pub fn routers(&self) -> impl Iterator<Item = &Router> {
        self.routers.values()
    }

    /// Bridges in ID order.
    pub fn bridges(&self) -> impl Iterator<Item = &Bridge> {
        self.bridges.values()
    }

    /// Number of routers.
    pub fn router_count(&self) -> usize {
        self.routers.len()
    }

    /// Number of bridges.
    pub fn bridge_count(&self) -> usize {
        self.bridges.len()
    }

    /// Number of component attachments seated anywhere in the fabric.
    pub fn attached_port_count(&self) -> u32 {
        self.routers.values().map(|r| r.bindings.len() as u32).sum()
    }

    /// Returns `true` if any attachment of `component` is seated.
    pub fn is_attached(&self, component: ComponentId) -> bool {
        self.router_of(component).is_some()
    }

    /// The router holding `component`'s attachments, if attached.
    pub fn router_of(&self, component: ComponentId) -> Option<RouterId> {
        self.routers
            .values()
            .find(|r| r.bindings.iter().any(|b| b.component == component))
            .map(|r| r.id)
    }

    /// Seats every named attachment of `component` on a single router.
    ///
    /// Returns `false` without changing the fabric if the attachments cannot
    /// be seated on one router. Attaching an already attached component, or
    /// one without attachments, succeeds without effect.
    pub fn attach(&mut self, component: ComponentId, attachments: &[String]) -> bool {
        let needed = attachments.len() as u32;
        if needed == 0 || self.is_attached(component) {
            return true;
        }
        if needed > self.ports_per_router {
            log::warn!(
                "component {component} needs {needed} ports, routers have {}",
                self.ports_per_router
            );
            return false;
        }
        if self.routers.is_empty() {
            self.add_router();
        }
        if let Some(target) = self.routers.values().find(|r| r.free_ports() >= needed) {
            let target = target.id;
            self.seat(target, component, attachments);
            return true;
        }

        // No router has room: grow the fabric next to the fullest router.
        let Some(full) = self
            .routers
            .values()
            .min_by_key(|r| (r.free_ports(), r.id))
            .map(|r| r.id)
        else {
            return false;
        };
        let full_free = self.routers[&full].free_ports();
        let fresh_free = self.ports_per_router - 1;

        let victim = if full_free == 0 {
            let router = &self.routers[&full];
            let candidate = router
                .components()
                .into_iter()
                .map(|c| (router.ports_of(c), c))
                .filter(|(ports, _)| *ports <= fresh_free)
                .min();
            match candidate {
                Some(v) => Some(v),
                None => {
                    log::warn!("router {full} is full and no component can be moved off it");
                    return false;
                }
            }
        } else {
            None
        };
        let moved = victim.map_or(0, |(ports, _)| ports);
        let full_after = full_free + moved - 1;
        let fresh_after = fresh_free - moved;
        let place_on_full = needed <= full_after;
        if !place_on_full && needed > fresh_after {
            log::warn!("no room for component {component} after growing the fabric");
            return false;
        }

        let fresh = self.add_router();
        if let Some((_, evicted)) = victim {
            log::debug!("moving component {evicted} from router {full} to router {fresh}");
            self.move_component(evicted, full, fresh);
        }
        self.add_bridge(full, fresh);
        let target = if place_on_full { full } else { fresh };
        self.seat(target, component, attachments);
        true
    }

    /// Removes every seated attachment of `component`, then shrinks the
    /// fabric. Idempotent.
    pub fn detach(&mut self, component: ComponentId) {
        for router in self.routers.values_mut() {
            router.bindings.retain(|b| b.component != component);
        }
        self.shrink();
    }

    fn shrink(&mut self) {
        if self.routers.values().all(|r| r.bindings.is_empty()) {
            self.routers.clear();
            self.bridges.clear();
            self.next_router = 0;
            self.next_bridge = 0;
            return;
        }
        // Fold leaf routers back into their neighbour while they fit.
        while let Some((leaf, bridge, parent)) = self.foldable_leaf() {
            log::debug!("removing router {leaf} and bridge {bridge}");
            let bindings = self
                .routers
                .get_mut(&leaf)
                .map(|r| std::mem::take(&mut r.bindings))
                .unwrap_or_default();
            self.remove_bridge(bridge);
            self.routers.remove(&leaf);
            if let Some(p) = self.routers.get_mut(&parent) {
                p.bindings.extend(bindings);
            }
        }
    }

    fn foldable_leaf(&self) -> Option<(RouterId, BridgeId, RouterId)> {
        self.routers.values().rev().find_map(|r| {
            let [bridge] = r.bridges.as_slice() else {
                return None;
            };
            let parent = self.bridges.get(bridge)?.other(r.id);
            let room = self.routers.get(&parent)?.free_ports() + 1;
            (r.bindings.len() as u32 <= room).then_some((r.id, *bridge, parent))
        })
    }

    fn add_router(&mut self) -> RouterId {
        let id = RouterId::from_raw(self.next_router);
        self.next_router += 1;
        self.routers.insert(id, Router::new(id, self.ports_per_router));
        log::debug!("created router {id}");
        id
    }

    fn add_bridge(&mut self, a: RouterId, b: RouterId) -> BridgeId {
        let id = BridgeId::from_raw(self.next_bridge);
        self.next_bridge += 1;
        self.bridges.insert(id, Bridge { id, a, b });
        for end in [a, b] {
            if let Some(r) = self.routers.get_mut(&end) {
                r.bridges.push(id);
            }
        }
        id
    }

    fn remove_bridge(&mut self, id: BridgeId) {
        if let Some(bridge) = self.bridges.remove(&id) {
            for end in [bridge.a, bridge.b] {
                if let Some(r) = self.routers.get_mut(&end) {
                    r.bridges.retain(|&b| b != id);
                }
            }
        }
    }

    fn seat(&mut self, router: RouterId, component: ComponentId, attachments: &[String]) {
        if let Some(r) = self.routers.get_mut(&router) {
            r.bindings.extend(attachments.iter().map(|name| PortBinding {
                component,
                attachment: name.clone(),
            }));
        }
    }

    fn move_component(&mut self, component: ComponentId, from: RouterId, to: RouterId) {
        let mut moved = Vec::new();
        if let Some(r) = self.routers.get_mut(&from) {
            let (taken, kept) = std::mem::take(&mut r.bindings)
                .into_iter()
                .partition(|b| b.component == component);
            r.bindings = kept;
            moved = taken;
        }
        if let Some(r) = self.routers.get_mut(&to) {
            r.bindings.extend(moved);
        }
    }
}
