//! # Mesh Errors
//!
//! Error types for the labeling pipeline.
//!
//! ## Error Policy
//!
//! - Configuration and label-integrity errors are fatal and propagate to
//!   the caller
//! - Degenerate cells and out-of-bounds samples are absorbed by their stage
//!   and only show up in the stage reports

use config::ConfigError;
use thiserror::Error;

use crate::volume::VoxelIndex;

/// Errors that can occur while building a labeled mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Invalid run configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A sampled voxel holds a value outside the four-class label scheme
    #[error("Unexpected label {value} at voxel {index} (cell {cell}); allowed labels are 0, 1, 2, 3")]
    LabelIntegrity {
        cell: usize,
        value: u16,
        index: VoxelIndex,
    },

    /// Label volume metadata or data is inconsistent
    #[error("Invalid volume: {message}")]
    InvalidVolume { message: String },

    /// Mesh and attribute arrays disagree
    #[error("Invalid mesh: {message}")]
    InvalidMesh { message: String },

    /// The external mesh generator failed
    #[error("Mesh generation failed: {message}")]
    Generation { message: String },

    /// Malformed VTK input
    #[error("Malformed VTK data: {message}")]
    Malformed { message: String },

    /// Input file uses a feature this reader does not handle
    #[error("Unsupported: {message}")]
    Unsupported { message: String },

    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MeshError {
    /// Creates an invalid volume error.
    pub fn invalid_volume(message: impl Into<String>) -> Self {
        Self::InvalidVolume {
            message: message.into(),
        }
    }

    /// Creates an invalid mesh error.
    pub fn invalid_mesh(message: impl Into<String>) -> Self {
        Self::InvalidMesh {
            message: message.into(),
        }
    }

    /// Creates a mesh generation error.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Creates a malformed input error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates an unsupported feature error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }
}

impl From<vtkio::Error> for MeshError {
    fn from(err: vtkio::Error) -> Self {
        Self::malformed(err.to_string())
    }
}

/// Result type alias for pipeline operations.
pub type MeshResult<T> = Result<T, MeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_error_names_value_and_voxel() {
        let err = MeshError::LabelIntegrity {
            cell: 7,
            value: 5,
            index: VoxelIndex::new(1, 0, 2),
        };
        let message = err.to_string();
        assert!(message.contains("label 5"));
        assert!(message.contains("(1, 0, 2)"));
        assert!(message.contains("cell 7"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MeshError>();
    }
}
