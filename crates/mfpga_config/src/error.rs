//! Error types for descriptor loading and validation.

use mfpga_common::MappingError;

/// Errors that can occur when loading or validating a descriptor.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the descriptor.
    #[error("failed to read descriptor: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse descriptor: {0}")]
    ParseError(String),

    /// A name refers to an entity that is not declared.
    #[error("unknown {kind} '{name}'")]
    UnknownReference {
        /// What kind of entity was referenced (`fpga`, `component`, ...).
        kind: &'static str,
        /// The unresolved name.
        name: String,
    },

    /// Two entities of the same kind share a name.
    #[error("duplicate {kind} '{name}'")]
    Duplicate {
        /// What kind of entity was duplicated.
        kind: &'static str,
        /// The repeated name.
        name: String,
    },

    /// A descriptor value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Building the model from a valid descriptor failed.
    #[error("{0}")]
    Mapping(#[from] MappingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_reference() {
        let err = ConfigError::UnknownReference {
            kind: "fpga",
            name: "F9".to_string(),
        };
        assert_eq!(format!("{err}"), "unknown fpga 'F9'");
    }

    #[test]
    fn display_duplicate() {
        let err = ConfigError::Duplicate {
            kind: "component",
            name: "dma".to_string(),
        };
        assert_eq!(format!("{err}"), "duplicate component 'dma'");
    }

    #[test]
    fn display_validation_error() {
        let err = ConfigError::ValidationError("ports_per_router must be greater than 2".into());
        assert_eq!(
            format!("{err}"),
            "validation error: ports_per_router must be greater than 2"
        );
    }

    #[test]
    fn mapping_error_is_transparent() {
        let err: ConfigError = MappingError::FpgaAlreadyClustered {
            fpga: "F0".into(),
            cluster: "c".into(),
        }
        .into();
        assert_eq!(format!("{err}"), MappingError::FpgaAlreadyClustered {
            fpga: "F0".into(),
            cluster: "c".into(),
        }
        .to_string());
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::IoError(io_err);
        assert!(format!("{err}").starts_with("failed to read descriptor:"));
    }
}
