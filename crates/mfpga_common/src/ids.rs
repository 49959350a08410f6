//! Opaque ID newtypes for mapping entities.
//!
//! Each ID is a thin `u32` wrapper that is `Copy`, `Hash`, and
//! `Serialize`/`Deserialize`. Design-side IDs (components, groups,
//! connections) index into a `Design`; platform-side IDs (FPGAs, links)
//! index into a `Platform`. Router and bridge IDs are local to one FPGA's
//! interconnect fabric.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a logical component in a design.
    ComponentId
);

define_id!(
    /// Opaque, copyable ID for a group (subsystem) of components.
    GroupId
);

define_id!(
    /// Opaque, copyable ID for a logical connection between two components.
    ConnectionId
);

define_id!(
    /// Opaque, copyable ID for a physical FPGA in a platform.
    FpgaId
);

define_id!(
    /// Opaque, copyable ID for an inter-FPGA link.
    LinkId
);

define_id!(
    /// Opaque, copyable ID for a router in an FPGA's interconnect fabric.
    RouterId
);

define_id!(
    /// Opaque, copyable ID for a bridge between two routers.
    BridgeId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn id_roundtrip() {
        let id = FpgaId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
    }

    #[test]
    fn id_equality_and_order() {
        let a = GroupId::from_raw(3);
        let b = GroupId::from_raw(3);
        let c = GroupId::from_raw(4);
        assert_eq!(a, b);
        assert!(a < c);
    }

    #[test]
    fn id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(ComponentId::from_raw(1));
        set.insert(ComponentId::from_raw(2));
        set.insert(ComponentId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn id_display() {
        assert_eq!(format!("{}", RouterId::from_raw(7)), "7");
    }

    #[test]
    fn id_serde_roundtrip() {
        let id = LinkId::from_raw(55);
        let json = serde_json::to_string(&id).unwrap();
        let restored: LinkId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }
}
