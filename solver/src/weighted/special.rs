use alloc::vec::Vec;
use core::cmp::Ordering;

use common_errors::LeverageError;
use common_math::Dec;
use common_structs::{DecCoin, Denom};
use multiversx_sc::api::ManagedTypeApi;

use super::compare_denoms;

/// One slot of preferential collateralization: value of `collateral` backing
/// value of `borrow` at `special_weight`.
#[derive(Clone)]
pub struct WeightedSpecialPair<M: ManagedTypeApi> {
    pub collateral: DecCoin<M>,
    pub borrow: DecCoin<M>,
    /// Collateral weight or liquidation threshold of the pair
    pub special_weight: Dec<M>,
}

impl<M: ManagedTypeApi> WeightedSpecialPair<M> {
    pub fn empty(collateral: Denom<M>, borrow: Denom<M>, special_weight: Dec<M>) -> Self {
        WeightedSpecialPair {
            collateral: DecCoin::zero(collateral),
            borrow: DecCoin::zero(borrow),
            special_weight,
        }
    }

    /// Special weight descending, then collateral denom, then borrow denom.
    pub fn order(&self, other: &Self) -> Ordering {
        other
            .special_weight
            .cmp(&self.special_weight)
            .then_with(|| compare_denoms(&self.collateral.denom, &other.collateral.denom))
            .then_with(|| compare_denoms(&self.borrow.denom, &other.borrow.denom))
    }

    pub fn can_combine(&self, other: &Self) -> bool {
        self.collateral.denom == other.collateral.denom && self.borrow.denom == other.borrow.denom
    }
}

/// Sorted special pair slots. Zero valued slots are kept: a position lists every
/// pair that could apply to it.
#[derive(Clone)]
pub struct WeightedSpecialPairs<M: ManagedTypeApi> {
    pairs: Vec<WeightedSpecialPair<M>>,
}

impl<M: ManagedTypeApi> Default for WeightedSpecialPairs<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ManagedTypeApi> WeightedSpecialPairs<M> {
    pub fn new() -> Self {
        WeightedSpecialPairs { pairs: Vec::new() }
    }

    /// Adds a pair, combining amounts with an existing slot of the same denoms, and re-sorts.
    pub fn add(&mut self, pair: WeightedSpecialPair<M>) -> Result<(), LeverageError> {
        if let Some(existing) = self.pairs.iter_mut().find(|p| p.can_combine(&pair)) {
            existing.collateral.amount = existing.collateral.amount.add(&pair.collateral.amount)?;
            existing.borrow.amount = existing.borrow.amount.add(&pair.borrow.amount)?;
        } else {
            self.pairs.push(pair);
        }

        self.pairs.sort_by(|a, b| a.order(b));
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&WeightedSpecialPair<M>> {
        self.pairs.get(index)
    }

    /// Mutable slot access. Amounts may change, weights and denoms must not.
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut WeightedSpecialPair<M>> {
        self.pairs.get_mut(index)
    }

    pub fn total_collateral(&self) -> Result<Dec<M>, LeverageError> {
        self.pairs
            .iter()
            .try_fold(Dec::zero(), |sum, p| sum.add(&p.collateral.amount))
    }

    pub fn total_borrowed(&self) -> Result<Dec<M>, LeverageError> {
        self.pairs
            .iter()
            .try_fold(Dec::zero(), |sum, p| sum.add(&p.borrow.amount))
    }

    pub fn collateral_of(&self, denom: &Denom<M>) -> Result<Dec<M>, LeverageError> {
        self.pairs
            .iter()
            .filter(|p| p.collateral.denom == *denom)
            .try_fold(Dec::zero(), |sum, p| sum.add(&p.collateral.amount))
    }

    pub fn borrowed_of(&self, denom: &Denom<M>) -> Result<Dec<M>, LeverageError> {
        self.pairs
            .iter()
            .filter(|p| p.borrow.denom == *denom)
            .try_fold(Dec::zero(), |sum, p| sum.add(&p.borrow.amount))
    }

    pub fn is_sorted(&self) -> bool {
        self.pairs
            .windows(2)
            .all(|pair| pair[0].order(&pair[1]) != Ordering::Greater)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, WeightedSpecialPair<M>> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
