//! Persistent distributions.
//!
//! A [`Distribution`] never changes under a draw: drawing returns the value
//! together with a *remainder* distribution that no longer contains it.
//! Chaining remainders until [`SampleError::Exhausted`] gives a
//! without-replacement sequence, while every intermediate remainder stays
//! valid and can be drawn from independently (e.g. from another thread).

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::error::SampleError;
use crate::sampler::WeightedSampler;

/// A distribution that can be sampled with or without replacement.
pub trait Distribution: Sized {
    type Value;

    /// Draw one value, leaving the distribution as it is.
    fn sample_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&Self::Value, SampleError>;

    /// Draw one value and return it with the distribution of everything else.
    fn draw_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(&Self::Value, Self), SampleError>;

    fn is_exhausted(&self) -> bool;

    /// Lazily follow the chain of remainders, yielding one value per draw.
    fn remainders_with_rng<R: Rng>(self, rng: R) -> Remainders<Self, R> {
        Remainders {
            current: Some(self),
            rng,
        }
    }

    fn remainders(self) -> Remainders<Self, ThreadRng> {
        self.remainders_with_rng(rand::rng())
    }
}

impl<T> Distribution for WeightedSampler<T> {
    type Value = T;

    fn sample_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&T, SampleError> {
        WeightedSampler::sample_with_rng(self, rng)
    }

    fn draw_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(&T, Self), SampleError> {
        WeightedSampler::draw_with_rng(self, rng)
    }

    fn is_exhausted(&self) -> bool {
        WeightedSampler::is_exhausted(self)
    }
}

/// Iterator over a chain of remainders.
///
/// Ends once the current remainder is exhausted; after an internal error it
/// yields that error once and then ends.
#[derive(Debug)]
pub struct Remainders<D, R> {
    current: Option<D>,
    rng: R,
}

impl<D, R> Remainders<D, R> {
    /// The distribution the next draw will be taken from.
    pub fn current(&self) -> Option<&D> {
        self.current.as_ref()
    }
}

impl<D, R> Iterator for Remainders<D, R>
where
    D: Distribution,
    D::Value: Clone,
    R: Rng,
{
    type Item = Result<D::Value, SampleError>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        if current.is_exhausted() {
            return None;
        }
        match current.draw_with_rng(&mut self.rng) {
            Ok((value, remainder)) => {
                let value = value.clone();
                self.current = Some(remainder);
                Some(Ok(value))
            }
            Err(SampleError::Exhausted) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

impl<D, R> std::iter::FusedIterator for Remainders<D, R>
where
    D: Distribution,
    D::Value: Clone,
    R: Rng,
{
}
