//! Logical connections between components.

use mfpga_common::{ComponentId, ConnectionId};
use serde::{Deserialize, Serialize};

/// A communication edge between two components.
///
/// `data_density` is the relative traffic weight the connection adds to an
/// inter-FPGA link when its endpoints are placed on different FPGAs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Assigned when the connection is added to a [`Design`](crate::Design).
    pub id: ConnectionId,
    /// Source component.
    pub from: ComponentId,
    /// Sink component.
    pub to: ComponentId,
    /// Traffic weight, non-negative.
    pub data_density: f64,
}

impl Connection {
    /// Returns `true` if `component` is one of the endpoints.
    pub fn touches(&self, component: ComponentId) -> bool {
        self.from == component || self.to == component
    }
}
