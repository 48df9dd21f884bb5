//! Error types for mesh topology and spheroid lookups

use thiserror::Error;

/// Errors that can occur while building topology, grids, or lookup tables
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpheroidError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A face references a vertex that does not exist
    #[error("face {face} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    VertexOutOfRange {
        face: usize,
        vertex: u32,
        vertex_count: usize,
    },
    /// A face repeats one of its vertex ids
    #[error("face {face} repeats a vertex id")]
    DegenerateFace { face: usize },
    /// An operation received no usable input
    #[error("empty input: {0}")]
    EmptyInput(String),
    /// A per-vertex field does not match the vertex count
    #[error("field has {actual} values, expected {expected}")]
    FieldLength { expected: usize, actual: usize },
    /// More elements than 32-bit ids can address
    #[error("{count} {kind} exceed the id limit of {limit}")]
    IdOverflow {
        kind: &'static str,
        count: usize,
        limit: u64,
    },
}

/// Result type alias for spheroid grid operations
pub type Result<T> = std::result::Result<T, SpheroidError>;

/// Check that `count` elements can be numbered with ids below `limit`
pub(crate) fn check_id_capacity(kind: &'static str, count: usize, limit: u64) -> Result<()> {
    if count as u64 > limit {
        return Err(SpheroidError::IdOverflow { kind, count, limit });
    }
    Ok(())
}
