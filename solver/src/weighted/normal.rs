use alloc::vec::Vec;
use core::cmp::Ordering;

use common_errors::LeverageError;
use common_math::Dec;
use common_structs::Denom;
use multiversx_sc::api::ManagedTypeApi;

use super::{compare_denoms, WeightedDecCoin};

/// Collateral matched against a borrow under ordinary token weights.
#[derive(Clone)]
pub struct WeightedNormalPair<M: ManagedTypeApi> {
    pub collateral: WeightedDecCoin<M>,
    pub borrow: WeightedDecCoin<M>,
}

impl<M: ManagedTypeApi> WeightedNormalPair<M> {
    /// Collateral weight descending, borrow weight descending, then both denoms ascending.
    pub fn order(&self, other: &Self) -> Ordering {
        other
            .collateral
            .weight
            .cmp(&self.collateral.weight)
            .then_with(|| other.borrow.weight.cmp(&self.borrow.weight))
            .then_with(|| compare_denoms(&self.collateral.denom, &other.collateral.denom))
            .then_with(|| compare_denoms(&self.borrow.denom, &other.borrow.denom))
    }

    pub fn can_combine(&self, other: &Self) -> bool {
        self.collateral.denom == other.collateral.denom && self.borrow.denom == other.borrow.denom
    }

    fn is_zero(&self) -> bool {
        self.collateral.value.is_zero() && self.borrow.value.is_zero()
    }
}

#[derive(Clone)]
pub struct WeightedNormalPairs<M: ManagedTypeApi> {
    pairs: Vec<WeightedNormalPair<M>>,
}

impl<M: ManagedTypeApi> Default for WeightedNormalPairs<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ManagedTypeApi> WeightedNormalPairs<M> {
    pub fn new() -> Self {
        WeightedNormalPairs { pairs: Vec::new() }
    }

    /// Adds a pair, combining it with an existing pair of the same denoms, and re-sorts.
    /// An all-zero pair of new denoms only registers when the container is empty.
    pub fn add(&mut self, pair: WeightedNormalPair<M>) -> Result<(), LeverageError> {
        if let Some(existing) = self.pairs.iter_mut().find(|p| p.can_combine(&pair)) {
            existing.collateral.value = existing.collateral.value.add(&pair.collateral.value)?;
            existing.borrow.value = existing.borrow.value.add(&pair.borrow.value)?;
        } else if self.pairs.is_empty() || !pair.is_zero() {
            self.pairs.push(pair);
        } else {
            return Ok(());
        }

        self.pairs.sort_by(|a, b| a.order(b));
        Ok(())
    }

    /// Removes and returns every pair matching `predicate`. Remaining pairs stay sorted.
    pub(crate) fn split_off<F>(&mut self, mut predicate: F) -> Vec<WeightedNormalPair<M>>
    where
        F: FnMut(&WeightedNormalPair<M>) -> bool,
    {
        let (removed, kept): (Vec<_>, Vec<_>) =
            core::mem::take(&mut self.pairs).into_iter().partition(|p| predicate(p));
        self.pairs = kept;
        removed
    }

    pub fn total_collateral(&self) -> Result<Dec<M>, LeverageError> {
        self.pairs
            .iter()
            .try_fold(Dec::zero(), |sum, p| sum.add(&p.collateral.value))
    }

    pub fn total_borrowed(&self) -> Result<Dec<M>, LeverageError> {
        self.pairs
            .iter()
            .try_fold(Dec::zero(), |sum, p| sum.add(&p.borrow.value))
    }

    pub fn collateral_of(&self, denom: &Denom<M>) -> Result<Dec<M>, LeverageError> {
        self.pairs
            .iter()
            .filter(|p| p.collateral.denom == *denom)
            .try_fold(Dec::zero(), |sum, p| sum.add(&p.collateral.value))
    }

    pub fn borrowed_of(&self, denom: &Denom<M>) -> Result<Dec<M>, LeverageError> {
        self.pairs
            .iter()
            .filter(|p| p.borrow.denom == *denom)
            .try_fold(Dec::zero(), |sum, p| sum.add(&p.borrow.value))
    }

    pub fn is_sorted(&self) -> bool {
        self.pairs
            .windows(2)
            .all(|pair| pair[0].order(&pair[1]) != Ordering::Greater)
    }

    pub fn get(&self, index: usize) -> Option<&WeightedNormalPair<M>> {
        self.pairs.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, WeightedNormalPair<M>> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
