//! Errors for weighted sampling.

/// Errors returned by [`WeightedSampler`](crate::WeightedSampler) and its iterators.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    /// The caller passed something the sampler cannot work with
    /// (empty item list, weight overflow, negative count, out-of-range draw).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The subtree-weight invariant does not hold at `node`.
    ///
    /// Never expected in correct operation.
    #[error("corrupt sampler state at node {node}: {reason}")]
    CorruptState { node: usize, reason: &'static str },
    /// Every drawable item has already been drawn.
    #[error("sampler is exhausted")]
    Exhausted,
}

impl SampleError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn corrupt(node: usize, reason: &'static str) -> Self {
        tracing::warn!(node, reason, "weight tree invariant violated");
        Self::CorruptState { node, reason }
    }
}
