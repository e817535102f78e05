use thiserror::Error;

/// Errors raised by native Merkle helpers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    #[error("Direction must be 0 or 1, got {0}")]
    InvalidDirection(u8),
    #[error("Tree depth {0} exceeds the maximum of {}", super::MAX_TREE_DEPTH)]
    DepthTooLarge(usize),
    #[error("Leaf index {index} out of range for depth {depth}")]
    IndexOutOfRange { index: u64, depth: usize },
    #[error("Tree of depth {depth} cannot hold {leaves} leaves")]
    TooManyLeaves { leaves: usize, depth: usize },
    #[error("Path has {path} elements but {directions} directions")]
    PathLengthMismatch { path: usize, directions: usize },
}
