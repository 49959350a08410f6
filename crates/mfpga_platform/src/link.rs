//! Inter-FPGA links and their usage accounting.

use mfpga_common::{ConnectionId, FpgaId, LinkId, MappingError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Usage may undershoot zero by this much through float rounding.
const USAGE_EPSILON: f64 = 1e-9;

/// A physical channel between two FPGAs.
///
/// Usage is the sum of the data densities of the connections routed over
/// the link. [`Link::link_usage`] scales it by the link's speed relative to
/// the fastest link in the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Assigned when the link is added to a [`Platform`](crate::Platform).
    pub id: LinkId,
    /// Display name, `A <-> B` or `A -> B`.
    pub name: String,
    /// Source FPGA.
    pub from: FpgaId,
    /// Sink FPGA.
    pub to: FpgaId,
    /// Raw speed in arbitrary units.
    pub speed: f64,
    /// Whether traffic can flow in both directions.
    pub bidirectional: bool,
    normalization: f64,
    usage: f64,
    connections: BTreeMap<ConnectionId, f64>,
}

impl Link {
    /// Creates an unused link with a normalization factor of 1.
    pub fn new(name: impl Into<String>, from: FpgaId, to: FpgaId, speed: f64) -> Self {
        Self {
            id: LinkId::from_raw(0),
            name: name.into(),
            from,
            to,
            speed,
            bidirectional: true,
            normalization: 1.0,
            usage: 0.0,
            connections: BTreeMap::new(),
        }
    }

    /// Makes the link one-directional.
    pub fn directed(mut self) -> Self {
        self.bidirectional = false;
        self
    }

    /// Returns `true` if traffic from `a` to `b` can use this link.
    pub fn connects(&self, a: FpgaId, b: FpgaId) -> bool {
        (self.from == a && self.to == b) || (self.bidirectional && self.from == b && self.to == a)
    }

    /// Sets the normalization factor to `speed / max_speed`.
    ///
    /// A non-positive `max_speed` resets the factor to 1.
    pub fn normalize_speed_to(&mut self, max_speed: f64) {
        self.normalization = if max_speed > 0.0 {
            self.speed / max_speed
        } else {
            1.0
        };
    }

    /// Speed relative to the fastest link.
    pub fn normalization_factor(&self) -> f64 {
        self.normalization
    }

    /// Sum of the data densities routed over the link.
    pub fn usage(&self) -> f64 {
        self.usage
    }

    /// Usage scaled by the normalization factor.
    pub fn link_usage(&self) -> f64 {
        if self.normalization > 0.0 {
            self.usage / self.normalization
        } else if self.usage > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }

    /// Connections currently routed over the link.
    pub fn connections(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.connections.keys().copied()
    }

    /// Density `connection` was routed with, if it is routed here.
    pub fn density_of(&self, connection: ConnectionId) -> Option<f64> {
        self.connections.get(&connection).copied()
    }

    /// Routes a connection over the link.
    ///
    /// Fails with [`MappingError::ConnectionLinkAllocation`] if the connection
    /// is already routed here or the density is negative or not finite.
    pub fn add_connection(
        &mut self,
        connection: ConnectionId,
        data_density: f64,
    ) -> Result<(), MappingError> {
        if !data_density.is_finite() || data_density < 0.0 {
            return Err(MappingError::ConnectionLinkAllocation {
                link: self.name.clone(),
                reason: format!("connection {connection} has invalid density {data_density}"),
            });
        }
        if self.connections.contains_key(&connection) {
            return Err(MappingError::ConnectionLinkAllocation {
                link: self.name.clone(),
                reason: format!("connection {connection} is already routed over this link"),
            });
        }
        self.connections.insert(connection, data_density);
        self.usage += data_density;
        Ok(())
    }

    /// Removes a routed connection and releases the density it was added
    /// with. Removing a connection that is not routed here has no effect.
    ///
    /// Fails with [`MappingError::ConnectionLinkAllocation`] if the usage
    /// would become negative.
    pub fn remove_connection(&mut self, connection: ConnectionId) -> Result<(), MappingError> {
        let Some(&density) = self.connections.get(&connection) else {
            return Ok(());
        };
        let remaining = self.usage - density;
        if remaining < -USAGE_EPSILON {
            return Err(MappingError::ConnectionLinkAllocation {
                link: self.name.clone(),
                reason: format!(
                    "removing density {density} from usage {} would go negative",
                    self.usage
                ),
            });
        }
        self.connections.remove(&connection);
        self.usage = if self.connections.is_empty() {
            0.0
        } else {
            remaining.max(0.0)
        };
        Ok(())
    }
}
