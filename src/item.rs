//! Weighted items.

/// An immutable `(weight, value)` pair.
///
/// `weight` is the relative likelihood of selection. A weight of `0` is never
/// drawn while any positive-weight item remains; what happens afterwards is
/// governed by [`ZeroWeights`](crate::ZeroWeights).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedItem<T> {
    pub weight: u64,
    pub value: T,
}

impl<T> WeightedItem<T> {
    pub fn new(weight: u64, value: T) -> Self {
        Self { weight, value }
    }
}

impl<T> From<(u64, T)> for WeightedItem<T> {
    fn from((weight, value): (u64, T)) -> Self {
        Self { weight, value }
    }
}
