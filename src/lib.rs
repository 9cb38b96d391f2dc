//! `fukubiki`: weighted sampling without replacement.
//!
//! A [`WeightedSampler`] draws items from a fixed list one at a time, each with
//! probability proportional to its weight among the items not yet drawn.
//! Weights live in an array-form binary tree of subtree sums, so both a draw
//! and the removal that follows it are O(log n).
//!
//! Exposed modules:
//! - `sampler`: the sampler itself, mutable draws and the lazy `Draws` iterator.
//! - `distribution`: the persistent view, where each draw returns a remainder.
//! - `config`: construction options (zero-weight policy).
//! - `item`, `error`: the input pair type and the error taxonomy.
//!
//! ```
//! use fukubiki::WeightedSampler;
//! use rand::SeedableRng;
//!
//! let mut reviewers = WeightedSampler::from_pairs([(100, "ana"), (20, "bo"), (20, "cy")])?;
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let picked = reviewers
//!     .sample_without_replacement_with_rng(2, &mut rng)?
//!     .collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(picked.len(), 2);
//! assert_ne!(picked[0], picked[1]);
//! # Ok::<(), fukubiki::SampleError>(())
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod distribution;
pub mod error;
pub mod item;
pub mod sampler;
mod tree;

pub use config::{SamplerConfig, ZeroWeights};
pub use distribution::{Distribution, Remainders};
pub use error::SampleError;
pub use item::WeightedItem;
pub use sampler::{DrawIndices, Draws, WeightedSampler};
