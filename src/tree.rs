//! Array-form weight tree.
//!
//! Item `i` lives at node `i` of a complete binary tree whose children are
//! `2i + 1` and `2i + 2`. Every node stores the remaining weight of its whole
//! subtree, its own item included. A node's own remaining weight is therefore
//! `tree[i] - tree[2i + 1] - tree[2i + 2]`, and is always either zero (drawn)
//! or the item's original weight.
//!
//! A draw `r` in `[0, tree[0])` maps to the item whose interval contains it,
//! where intervals are laid out as left subtree, own item, right subtree.
//! Removing an item subtracts its weight from the node and every ancestor.
//! Both are O(log n).

use rand::Rng;

use crate::config::ZeroWeights;
use crate::error::SampleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    /// A positive-weight node located by a weighted draw.
    Weighted(usize),
    /// A slot in the list of remaining zero-weight items.
    Zero(usize),
}

#[derive(Debug, Clone)]
pub(crate) struct WeightTree {
    tree: Vec<u64>,
    /// Remaining zero-weight items; only populated under `ZeroWeights::Trailing`.
    zeros: Vec<usize>,
    remaining: usize,
}

impl WeightTree {
    pub(crate) fn new(weights: &[u64], zero_weights: ZeroWeights) -> Result<Self, SampleError> {
        if weights.is_empty() {
            return Err(SampleError::invalid("item list must be non-empty"));
        }
        let total = weights
            .iter()
            .try_fold(0u64, |acc, &w| acc.checked_add(w))
            .ok_or_else(|| SampleError::invalid("total weight overflows u64"))?;

        let mut zeros = Vec::new();
        let mut positive = 0usize;
        for (i, &w) in weights.iter().enumerate() {
            if w > 0 {
                positive += 1;
                continue;
            }
            match zero_weights {
                ZeroWeights::Unreachable => {}
                ZeroWeights::Trailing => zeros.push(i),
                ZeroWeights::Reject => {
                    return Err(SampleError::invalid(format!("item {i} has zero weight")))
                }
            }
        }

        // Children always have larger indices than their parent, so one
        // backwards pass sees every subtree complete before folding it upward.
        // No subtree sum exceeds `total`, so the additions cannot overflow.
        let n = weights.len();
        let mut tree = vec![0u64; n];
        for i in (1..n).rev() {
            tree[i] += weights[i];
            tree[(i - 1) / 2] += tree[i];
        }
        tree[0] += weights[0];
        debug_assert_eq!(tree[0], total);

        let remaining = positive + zeros.len();
        tracing::debug!(
            items = n,
            total_weight = total,
            zero_weight_items = n - positive,
            remaining,
            "built weight tree"
        );

        Ok(Self {
            tree,
            zeros,
            remaining,
        })
    }

    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    pub(crate) fn total_weight(&self) -> u64 {
        self.tree[0]
    }

    /// Exclusive upper bound for draw values.
    ///
    /// The remaining weight while it is positive, then the number of
    /// remaining zero-weight items.
    pub(crate) fn draw_bound(&self) -> u64 {
        match self.total_weight() {
            0 => self.zeros.len() as u64,
            total => total,
        }
    }

    /// Subtree weight at `node`; missing nodes weigh nothing.
    #[inline]
    fn subtree_weight(&self, node: usize) -> u64 {
        self.tree.get(node).copied().unwrap_or(0)
    }

    fn own_weight(&self, node: usize) -> Result<u64, SampleError> {
        let left = 2 * node + 1;
        let children = self
            .subtree_weight(left)
            .checked_add(self.subtree_weight(left + 1))
            .ok_or_else(|| SampleError::corrupt(node, "child weights overflow"))?;
        self.tree[node]
            .checked_sub(children)
            .ok_or_else(|| SampleError::corrupt(node, "children outweigh their parent"))
    }

    /// Find the node whose interval contains `r`. Requires `r < tree[0]`.
    fn locate(&self, mut r: u64) -> Result<usize, SampleError> {
        let mut node = 0usize;
        loop {
            let left = 2 * node + 1;
            let left_weight = self.subtree_weight(left);
            if r < left_weight {
                node = left;
                continue;
            }
            r -= left_weight;

            let own = self.own_weight(node)?;
            if r < own {
                return Ok(node);
            }
            r -= own;

            let right = left + 1;
            if right >= self.tree.len() {
                return Err(SampleError::corrupt(node, "draw fell past the last item"));
            }
            node = right;
        }
    }

    fn select(&self, draw: u64) -> Result<Selection, SampleError> {
        if self.is_exhausted() {
            return Err(SampleError::Exhausted);
        }
        let bound = self.draw_bound();
        if bound == 0 {
            return Err(SampleError::corrupt(0, "items remain but nothing is drawable"));
        }
        if draw >= bound {
            return Err(SampleError::invalid(format!(
                "draw {draw} is out of range 0..{bound}"
            )));
        }
        if self.total_weight() > 0 {
            self.locate(draw).map(Selection::Weighted)
        } else {
            Ok(Selection::Zero(draw as usize))
        }
    }

    /// Uniform draw in `0..draw_bound()`.
    pub(crate) fn random_draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<u64, SampleError> {
        if self.is_exhausted() {
            return Err(SampleError::Exhausted);
        }
        match self.draw_bound() {
            0 => Err(SampleError::corrupt(0, "items remain but nothing is drawable")),
            bound => Ok(rng.random_range(0..bound)),
        }
    }

    /// Item index for `draw`, without removing it.
    pub(crate) fn index_at(&self, draw: u64) -> Result<usize, SampleError> {
        match self.select(draw)? {
            Selection::Weighted(node) => Ok(node),
            Selection::Zero(slot) => Ok(self.zeros[slot]),
        }
    }

    /// Remove and return the item index for `draw`.
    pub(crate) fn take_at(&mut self, draw: u64) -> Result<usize, SampleError> {
        let index = match self.select(draw)? {
            Selection::Weighted(node) => {
                self.remove(node)?;
                node
            }
            Selection::Zero(slot) => self.zeros.swap_remove(slot),
        };
        self.remaining -= 1;
        tracing::trace!(index, draw, remaining = self.remaining, "took item");
        Ok(index)
    }

    pub(crate) fn take_with_rng<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<usize, SampleError> {
        let draw = self.random_draw(rng)?;
        self.take_at(draw)
    }

    /// Zero out `node`'s own weight and propagate the decrease to the root.
    fn remove(&mut self, node: usize) -> Result<(), SampleError> {
        let own = self.own_weight(node)?;
        if own == 0 {
            return Err(SampleError::corrupt(node, "item was already drawn"));
        }
        let mut index = node;
        loop {
            self.tree[index] = self.tree[index]
                .checked_sub(own)
                .ok_or_else(|| SampleError::corrupt(index, "ancestor lighter than its descendant"))?;
            if index == 0 {
                return Ok(());
            }
            index = (index - 1) / 2;
        }
    }

    /// Check the subtree-weight invariant against the original `weights`.
    pub(crate) fn validate(&self, weights: &[u64]) -> Result<(), SampleError> {
        if weights.len() != self.tree.len() {
            return Err(SampleError::corrupt(0, "tree size does not match item count"));
        }
        let mut undrawn = 0usize;
        for (node, &weight) in weights.iter().enumerate() {
            let own = self.own_weight(node)?;
            if own != 0 && own != weight {
                return Err(SampleError::corrupt(
                    node,
                    "own weight does not match the item's weight",
                ));
            }
            if own != 0 {
                undrawn += 1;
            }
        }
        if let Some(&node) = self.zeros.iter().find(|&&i| weights.get(i) != Some(&0)) {
            return Err(SampleError::corrupt(node, "trailing item has positive weight"));
        }
        if undrawn + self.zeros.len() != self.remaining {
            return Err(SampleError::corrupt(0, "remaining count does not match the tree"));
        }
        Ok(())
    }

    #[cfg(test)]
    fn as_slice(&self) -> &[u64] {
        &self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(weights: &[u64]) -> WeightTree {
        WeightTree::new(weights, ZeroWeights::Unreachable).expect("valid weights")
    }

    #[test]
    fn build_sums_every_subtree() {
        assert_eq!(tree(&[100, 20, 20]).as_slice(), &[140, 20, 20]);
        assert_eq!(tree(&[1, 2, 3, 4, 5]).as_slice(), &[15, 11, 3, 4, 5]);
        assert_eq!(tree(&[7]).as_slice(), &[7]);
    }

    #[test]
    fn build_rejects_empty_and_overflow() {
        let err = WeightTree::new(&[], ZeroWeights::Unreachable).expect_err("empty rejected");
        assert!(matches!(err, SampleError::InvalidArgument(_)));

        let err = WeightTree::new(&[u64::MAX, 1], ZeroWeights::Unreachable)
            .expect_err("overflow rejected");
        assert!(matches!(err, SampleError::InvalidArgument(_)));
    }

    #[test]
    fn intervals_are_left_own_right() {
        let t = tree(&[100, 20, 20]);
        assert_eq!(t.index_at(0), Ok(1));
        assert_eq!(t.index_at(19), Ok(1));
        assert_eq!(t.index_at(20), Ok(0));
        assert_eq!(t.index_at(119), Ok(0));
        assert_eq!(t.index_at(120), Ok(2));
        assert_eq!(t.index_at(139), Ok(2));

        let t = tree(&[1, 2, 3, 4, 5]);
        let located: Vec<usize> = (0..15).map(|r| t.index_at(r).expect("in range")).collect();
        assert_eq!(located, [3, 3, 3, 3, 1, 1, 4, 4, 4, 4, 4, 0, 2, 2, 2]);
    }

    #[test]
    fn take_propagates_to_root() {
        let mut t = tree(&[100, 20, 20]);
        assert_eq!(t.take_at(20), Ok(0));
        assert_eq!(t.as_slice(), &[40, 20, 20]);
        assert_eq!(t.remaining(), 2);

        // Right-hand draws are shifted past the drawn root.
        assert_eq!(t.index_at(20), Ok(2));
        assert_eq!(t.take_at(0), Ok(1));
        assert_eq!(t.as_slice(), &[20, 0, 20]);

        assert_eq!(t.take_at(0), Ok(2));
        assert_eq!(t.as_slice(), &[0, 0, 0]);
        assert!(t.is_exhausted());
        assert_eq!(t.take_at(0), Err(SampleError::Exhausted));
    }

    #[test]
    fn out_of_range_draw_is_invalid() {
        let mut t = tree(&[3, 4]);
        assert!(matches!(t.take_at(7), Err(SampleError::InvalidArgument(_))));
        assert_eq!(t.remaining(), 2);
        t.validate(&[3, 4]).expect("untouched");
    }

    #[test]
    fn validate_holds_after_every_take() {
        let weights = [5, 0, 9, 1, 1, 12, 3];
        let mut t = tree(&weights);
        t.validate(&weights).expect("fresh tree");
        while !t.is_exhausted() {
            t.take_at(t.draw_bound() / 2).expect("draw in range");
            t.validate(&weights).expect("invariant after take");
        }
        assert_eq!(t.total_weight(), 0);
    }

    #[test]
    fn corrupted_tree_is_detected() {
        let mut t = tree(&[1, 2, 3, 4, 5]);
        t.tree[2] = 500;
        assert!(matches!(
            t.validate(&[1, 2, 3, 4, 5]),
            Err(SampleError::CorruptState { node: 0, .. })
        ));
        // Draws left of the root never look at the bad node.
        assert_eq!(t.index_at(0), Ok(3));
        assert!(matches!(
            t.index_at(11),
            Err(SampleError::CorruptState { node: 0, .. })
        ));
    }

    #[test]
    fn removing_drawn_node_is_corrupt() {
        let mut t = tree(&[100, 20, 20]);
        t.take_at(20).expect("takes root");
        assert!(matches!(
            t.remove(0),
            Err(SampleError::CorruptState { node: 0, .. })
        ));
    }

    #[test]
    fn unreachable_zeros_do_not_count() {
        let mut t = tree(&[0, 5, 0]);
        assert_eq!(t.remaining(), 1);
        assert_eq!(t.take_at(4), Ok(1));
        assert!(t.is_exhausted());
    }

    #[test]
    fn trailing_zeros_follow_positive_weight() {
        let weights = [0, 5, 0];
        let mut t = WeightTree::new(&weights, ZeroWeights::Trailing).expect("valid weights");
        assert_eq!(t.remaining(), 3);
        assert_eq!(t.draw_bound(), 5);
        assert_eq!(t.take_at(0), Ok(1));

        assert_eq!(t.draw_bound(), 2);
        assert_eq!(t.index_at(1), Ok(2));
        assert_eq!(t.take_at(1), Ok(2));
        assert_eq!(t.take_at(0), Ok(0));
        t.validate(&weights).expect("consistent");
        assert_eq!(t.take_at(0), Err(SampleError::Exhausted));
    }

    #[test]
    fn reject_zeros() {
        let err = WeightTree::new(&[3, 0], ZeroWeights::Reject).expect_err("zero rejected");
        assert_eq!(err, SampleError::InvalidArgument("item 1 has zero weight".into()));
    }
}
