//! The mapping error taxonomy.
//!
//! Every mapping transaction (resource allocation, group mapping, cluster
//! membership, link accounting) fails immediately with one of these errors.
//! None of them is retried internally: the placement driver decides whether to
//! try another FPGA, abort, or report.

use crate::result::InternalError;

/// Errors raised by resource accounting and mapping transactions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// A total/used/available invariant would be violated.
    #[error("resource allocation error on '{resource}': {reason}")]
    ResourceAllocation {
        /// The resource whose ledger would have been corrupted.
        resource: String,
        /// Why the change was refused.
        reason: String,
    },

    /// A mapping cannot be satisfied by available capacity plus the required
    /// interconnect growth.
    #[error("FPGA '{fpga}' has insufficient resources to map group '{group}':\n{report}")]
    InsufficientResources {
        /// The FPGA that was asked to host the group.
        fpga: String,
        /// The group that did not fit.
        group: String,
        /// One `'{resource}' : {needed} / {available}` line per resource.
        report: String,
    },

    /// The group is already mapped to a different FPGA.
    #[error("group '{group}' is already mapped to FPGA '{target}'")]
    GroupAlreadyMapped {
        /// The group being mapped.
        group: String,
        /// The FPGA it is currently mapped to.
        target: String,
    },

    /// The group is not mapped to the FPGA it is being unmapped from.
    #[error("group '{group}' is not mapped to FPGA '{fpga}'")]
    GroupNotMapped {
        /// The group being unmapped.
        group: String,
        /// The FPGA the unmap was requested on.
        fpga: String,
    },

    /// The FPGA already belongs to another cluster.
    #[error("FPGA '{fpga}' is already in cluster '{cluster}'")]
    FpgaAlreadyClustered {
        /// The FPGA being added.
        fpga: String,
        /// The cluster it currently belongs to.
        cluster: String,
    },

    /// The FPGA is not a member of the cluster it is being removed from.
    #[error("FPGA '{fpga}' is not a member of cluster '{cluster}'")]
    FpgaNotClustered {
        /// The FPGA being removed.
        fpga: String,
        /// The cluster the removal was requested on.
        cluster: String,
    },

    /// Link usage bookkeeping would become inconsistent.
    #[error("link '{link}': {reason}")]
    ConnectionLinkAllocation {
        /// Display name of the link (`from <-> to`).
        link: String,
        /// Why the change was refused.
        reason: String,
    },

    /// The component already belongs to another group.
    #[error("component '{component}' already belongs to group '{group}'")]
    ComponentAlreadyGrouped {
        /// The component being added.
        component: String,
        /// The group that currently owns it.
        group: String,
    },

    /// The interconnect fabric could not seat a component's attachments.
    #[error(
        "component '{component}' needs {ports} router ports but routers on FPGA '{fpga}' provide {capacity}"
    )]
    AttachmentRejected {
        /// The FPGA whose fabric rejected the attachment.
        fpga: String,
        /// The component being attached.
        component: String,
        /// Ports the component needs on a single router.
        ports: u32,
        /// Port capacity of one router.
        capacity: u32,
    },

    /// A cluster name did not resolve.
    #[error("unknown cluster '{0}'")]
    UnknownCluster(String),

    /// A cluster with this name already exists.
    #[error("cluster '{0}' already exists")]
    DuplicateCluster(String),

    /// A bug in the mapper.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_insufficient_resources() {
        let err = MappingError::InsufficientResources {
            fpga: "F0".to_string(),
            group: "g1".to_string(),
            report: "'LUT' : 95 / 88".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "FPGA 'F0' has insufficient resources to map group 'g1':\n'LUT' : 95 / 88"
        );
    }

    #[test]
    fn display_group_already_mapped() {
        let err = MappingError::GroupAlreadyMapped {
            group: "g0".to_string(),
            target: "A".to_string(),
        };
        assert_eq!(err.to_string(), "group 'g0' is already mapped to FPGA 'A'");
    }

    #[test]
    fn display_cluster_errors() {
        let err = MappingError::FpgaAlreadyClustered {
            fpga: "F1".to_string(),
            cluster: "C1".to_string(),
        };
        assert!(err.to_string().contains("already in cluster 'C1'"));

        let err = MappingError::FpgaNotClustered {
            fpga: "F1".to_string(),
            cluster: "C2".to_string(),
        };
        assert!(err.to_string().contains("not a member of cluster 'C2'"));
    }

    #[test]
    fn internal_is_transparent() {
        let err: MappingError = InternalError::new("diverged").into();
        assert_eq!(err.to_string(), "internal mapping error: diverged");
    }
}
