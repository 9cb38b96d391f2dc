//! Weighted sampling without replacement.
//!
//! [`WeightedSampler`] holds a fixed list of weighted items and draws them one
//! at a time with probability proportional to the weight still remaining.
//! Each removing draw costs O(log n).
//!
//! Two styles are supported:
//! - **mutable**: [`take_with_rng`](WeightedSampler::take_with_rng),
//!   [`shuffle_with_rng`](WeightedSampler::shuffle_with_rng) and
//!   [`sample_without_replacement_with_rng`](WeightedSampler::sample_without_replacement_with_rng)
//!   remove items from the sampler in place.
//! - **persistent**: [`draw_with_rng`](WeightedSampler::draw_with_rng) leaves the
//!   sampler untouched and returns the drawn value together with a remainder
//!   sampler. The item list is shared; the weight array is copied (O(n) per draw).
//!
//! Every `*_with_rng` entrypoint has a convenience form that uses `rand::rng()`,
//! and every draw can also be driven by an explicit draw value (`*_at`) in
//! `0..draw_bound()`, which makes a fixed sequence of draws a deterministic
//! random source.

use std::sync::Arc;

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::config::SamplerConfig;
use crate::error::SampleError;
use crate::item::WeightedItem;
use crate::tree::WeightTree;

/// A weighted sampler over a fixed item list.
///
/// Zero-weight items are never drawn while positive weight remains; see
/// [`ZeroWeights`](crate::ZeroWeights) for the rest.
#[derive(Debug)]
pub struct WeightedSampler<T> {
    items: Arc<[WeightedItem<T>]>,
    tree: WeightTree,
    config: SamplerConfig,
}

// Manual impl: cloning shares the item list, so `T: Clone` is not needed.
impl<T> Clone for WeightedSampler<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            tree: self.tree.clone(),
            config: self.config,
        }
    }
}

impl<T> WeightedSampler<T> {
    /// Build a sampler with the default [`SamplerConfig`].
    ///
    /// Fails with [`SampleError::InvalidArgument`] if `items` is empty or the
    /// weights sum past `u64::MAX`.
    pub fn new<I>(items: I) -> Result<Self, SampleError>
    where
        I: IntoIterator<Item = WeightedItem<T>>,
    {
        Self::with_config(items, SamplerConfig::default())
    }

    /// Build a sampler from `(weight, value)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, SampleError>
    where
        I: IntoIterator<Item = (u64, T)>,
    {
        Self::new(pairs.into_iter().map(WeightedItem::from))
    }

    /// Build a sampler with an explicit config.
    pub fn with_config<I>(items: I, config: SamplerConfig) -> Result<Self, SampleError>
    where
        I: IntoIterator<Item = WeightedItem<T>>,
    {
        let items: Arc<[WeightedItem<T>]> = items.into_iter().collect();
        let weights: Vec<u64> = items.iter().map(|item| item.weight).collect();
        let tree = WeightTree::new(&weights, config.zero_weights)?;
        Ok(Self {
            items,
            tree,
            config,
        })
    }

    /// Number of items the sampler was built from, drawn or not.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`: construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The original item list, in construction order.
    pub fn items(&self) -> &[WeightedItem<T>] {
        &self.items
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Number of items that can still be drawn.
    pub fn remaining(&self) -> usize {
        self.tree.remaining()
    }

    /// Sum of the weights of items not yet drawn.
    pub fn remaining_weight(&self) -> u64 {
        self.tree.total_weight()
    }

    /// Exclusive upper bound for the explicit draw values taken by the `*_at` methods.
    pub fn draw_bound(&self) -> u64 {
        self.tree.draw_bound()
    }

    pub fn is_exhausted(&self) -> bool {
        self.tree.is_exhausted()
    }

    /// Check the subtree-weight invariant across the whole tree.
    pub fn validate(&self) -> Result<(), SampleError> {
        let weights: Vec<u64> = self.items.iter().map(|item| item.weight).collect();
        self.tree.validate(&weights)
    }

    // --- with replacement -------------------------------------------------

    /// Draw one value without removing it.
    pub fn sample(&self) -> Result<&T, SampleError> {
        let mut rng = rand::rng();
        self.sample_with_rng(&mut rng)
    }

    /// Draw one value without removing it, using a caller-supplied RNG.
    pub fn sample_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&T, SampleError> {
        let index = self.sample_index_with_rng(rng)?;
        Ok(&self.items[index].value)
    }

    pub fn sample_index_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<usize, SampleError> {
        let draw = self.tree.random_draw(rng)?;
        self.tree.index_at(draw)
    }

    /// Index of the item that `draw` selects, without removing it.
    pub fn sample_index_at(&self, draw: u64) -> Result<usize, SampleError> {
        self.tree.index_at(draw)
    }

    // --- mutable removal --------------------------------------------------

    /// Draw and remove one value.
    ///
    /// Fails with [`SampleError::Exhausted`] once nothing is left.
    pub fn take(&mut self) -> Result<&T, SampleError> {
        let mut rng = rand::rng();
        self.take_with_rng(&mut rng)
    }

    pub fn take_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&T, SampleError> {
        let index = self.tree.take_with_rng(rng)?;
        Ok(&self.items[index].value)
    }

    /// Draw and remove one item, returning its position in [`items`](Self::items).
    pub fn take_index_with_rng<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<usize, SampleError> {
        self.tree.take_with_rng(rng)
    }

    /// Remove the item selected by `draw` (in `0..draw_bound()`) and return its position.
    pub fn take_at(&mut self, draw: u64) -> Result<usize, SampleError> {
        self.tree.take_at(draw)
    }

    /// Lazily draw every remaining item in weighted random order.
    pub fn shuffle(&mut self) -> Draws<'_, T, ThreadRng> {
        Draws::new(self, None, rand::rng())
    }

    pub fn shuffle_with_rng<'a, R: Rng + ?Sized>(
        &'a mut self,
        rng: &'a mut R,
    ) -> Draws<'a, T, &'a mut R> {
        Draws::new(self, None, rng)
    }

    /// Lazily draw up to `count` distinct items.
    ///
    /// Fewer than `count` are produced if the sampler runs out first.
    /// `count` may be any integer type; negative values are rejected with
    /// [`SampleError::InvalidArgument`].
    pub fn sample_without_replacement<C>(
        &mut self,
        count: C,
    ) -> Result<Draws<'_, T, ThreadRng>, SampleError>
    where
        C: TryInto<usize> + Copy + std::fmt::Display,
    {
        let count = checked_count(count)?;
        Ok(Draws::new(self, Some(count), rand::rng()))
    }

    pub fn sample_without_replacement_with_rng<'a, C, R>(
        &'a mut self,
        count: C,
        rng: &'a mut R,
    ) -> Result<Draws<'a, T, &'a mut R>, SampleError>
    where
        C: TryInto<usize> + Copy + std::fmt::Display,
        R: Rng + ?Sized,
    {
        let count = checked_count(count)?;
        Ok(Draws::new(self, Some(count), rng))
    }

    // --- persistent -------------------------------------------------------

    /// Draw one value and return it with the remainder, leaving `self` untouched.
    pub fn draw(&self) -> Result<(&T, Self), SampleError> {
        let mut rng = rand::rng();
        self.draw_with_rng(&mut rng)
    }

    pub fn draw_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(&T, Self), SampleError> {
        let draw = self.tree.random_draw(rng)?;
        self.draw_at(draw)
    }

    /// Persistent form of [`take_at`](Self::take_at).
    pub fn draw_at(&self, draw: u64) -> Result<(&T, Self), SampleError> {
        let mut remainder = self.clone();
        let index = remainder.tree.take_at(draw)?;
        Ok((&self.items[index].value, remainder))
    }
}

fn checked_count<C>(count: C) -> Result<usize, SampleError>
where
    C: TryInto<usize> + Copy + std::fmt::Display,
{
    count.try_into().map_err(|_| {
        SampleError::invalid(format!("count must be a non-negative item count (got {count})"))
    })
}

/// Lazy, finite sequence of removing draws.
///
/// Created by [`WeightedSampler::shuffle`] and
/// [`WeightedSampler::sample_without_replacement`]. Each element is one
/// irreversible removal from the underlying sampler, so the sequence cannot
/// be restarted. It ends when the requested count is reached or the sampler
/// is exhausted, and stops for good after yielding an error.
#[derive(Debug)]
pub struct Draws<'a, T, R> {
    items: &'a [WeightedItem<T>],
    tree: &'a mut WeightTree,
    rng: R,
    limit: Option<usize>,
    failed: bool,
}

impl<'a, T, R: Rng> Draws<'a, T, R> {
    fn new(sampler: &'a mut WeightedSampler<T>, limit: Option<usize>, rng: R) -> Self {
        let WeightedSampler { items, tree, .. } = sampler;
        Self {
            items: &**items,
            tree,
            rng,
            limit,
            failed: false,
        }
    }

    /// Yield item positions instead of values.
    pub fn indices(self) -> DrawIndices<'a, T, R> {
        DrawIndices { inner: self }
    }

    fn next_index(&mut self) -> Option<Result<usize, SampleError>> {
        if self.failed || self.limit == Some(0) || self.tree.is_exhausted() {
            return None;
        }
        if let Some(limit) = self.limit.as_mut() {
            *limit -= 1;
        }
        let taken = self.tree.take_with_rng(&mut self.rng);
        self.failed = taken.is_err();
        Some(taken)
    }

    fn remaining_hint(&self) -> usize {
        if self.failed {
            return 0;
        }
        let remaining = self.tree.remaining();
        self.limit.map_or(remaining, |limit| limit.min(remaining))
    }
}

impl<'a, T, R: Rng> Iterator for Draws<'a, T, R> {
    type Item = Result<&'a T, SampleError>;

    fn next(&mut self) -> Option<Self::Item> {
        let items = self.items;
        self.next_index()
            .map(|taken| taken.map(|index| &items[index].value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // An internal error may end the sequence early.
        (0, Some(self.remaining_hint()))
    }
}

impl<T, R: Rng> std::iter::FusedIterator for Draws<'_, T, R> {}

/// [`Draws`] yielding positions in [`WeightedSampler::items`].
#[derive(Debug)]
pub struct DrawIndices<'a, T, R> {
    inner: Draws<'a, T, R>,
}

impl<T, R: Rng> Iterator for DrawIndices<'_, T, R> {
    type Item = Result<usize, SampleError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next_index()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, R: Rng> std::iter::FusedIterator for DrawIndices<'_, T, R> {}
