//! Sampler configuration.

/// How zero-weight items are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ZeroWeights {
    /// Kept in the item list but never drawn, and not counted as remaining.
    #[default]
    Unreachable,
    /// Drawn uniformly at random once all positive weight has been drawn.
    Trailing,
    /// Construction fails if any item has weight zero.
    Reject,
}

/// Construction-time options for a [`WeightedSampler`](crate::WeightedSampler).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SamplerConfig {
    pub zero_weights: ZeroWeights,
}

impl SamplerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the zero-weight policy.
    pub fn with_zero_weights(mut self, zero_weights: ZeroWeights) -> Self {
        self.zero_weights = zero_weights;
        self
    }
}
