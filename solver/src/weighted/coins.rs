use alloc::vec::Vec;
use core::cmp::Ordering;

use common_errors::LeverageError;
use common_math::Dec;
use common_structs::Denom;
use multiversx_sc::api::ManagedTypeApi;

use super::compare_denoms;

/// USD value of a single denom together with the weight that orders it.
#[derive(Clone)]
pub struct WeightedDecCoin<M: ManagedTypeApi> {
    pub denom: Denom<M>,
    pub value: Dec<M>,
    /// Collateral weight or liquidation threshold of the denom's token
    pub weight: Dec<M>,
}

impl<M: ManagedTypeApi> WeightedDecCoin<M> {
    pub fn new(denom: Denom<M>, value: Dec<M>, weight: Dec<M>) -> Self {
        WeightedDecCoin {
            denom,
            value,
            weight,
        }
    }

    /// Zero valued coin, used as a position marker when comparing against a denom.
    pub fn marker(denom: Denom<M>, weight: Dec<M>) -> Self {
        Self::new(denom, Dec::zero(), weight)
    }

    /// Weight descending, then denom ascending.
    pub fn order(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| compare_denoms(&self.denom, &other.denom))
    }

    pub fn before(&self, other: &Self) -> bool {
        self.order(other) == Ordering::Less
    }
}

/// Sorted list of weighted coins with at most one entry per denom.
#[derive(Clone)]
pub struct WeightedDecCoins<M: ManagedTypeApi> {
    coins: Vec<WeightedDecCoin<M>>,
}

impl<M: ManagedTypeApi> Default for WeightedDecCoins<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ManagedTypeApi> WeightedDecCoins<M> {
    pub fn new() -> Self {
        WeightedDecCoins { coins: Vec::new() }
    }

    /// Adds a coin, merging it into an existing entry of the same denom, and re-sorts.
    ///
    /// A zero valued coin of a new denom only registers when the container is empty.
    pub fn add(&mut self, coin: WeightedDecCoin<M>) -> Result<(), LeverageError> {
        if let Some(existing) = self.coins.iter_mut().find(|c| c.denom == coin.denom) {
            existing.value = existing.value.add(&coin.value)?;
        } else if self.coins.is_empty() || !coin.value.is_zero() {
            self.coins.push(coin);
        } else {
            return Ok(());
        }

        self.coins.sort_by(|a, b| a.order(b));
        Ok(())
    }

    /// Subtracts value from a denom in place. Slot order is left untouched, even
    /// when the entry drops to zero, so callers may keep iterating by index.
    pub fn sub(&mut self, denom: &Denom<M>, amount: &Dec<M>) -> Result<(), LeverageError> {
        let coin = self
            .coins
            .iter_mut()
            .find(|c| c.denom == *denom)
            .ok_or(LeverageError::DenomNotFound)?;

        let remaining = coin.value.sub(amount)?;
        if remaining.is_negative() {
            return Err(LeverageError::NegativeValue);
        }
        coin.value = remaining;
        Ok(())
    }

    /// Removes a denom entirely, returning its value.
    pub fn take(&mut self, denom: &Denom<M>) -> Dec<M> {
        match self.coins.iter().position(|c| c.denom == *denom) {
            Some(index) => self.coins.remove(index).value,
            None => Dec::zero(),
        }
    }

    /// Drops zero valued entries, keeping the order of the rest.
    pub fn prune(&mut self) {
        self.coins.retain(|c| !c.value.is_zero());
    }

    pub fn amount_of(&self, denom: &Denom<M>) -> Dec<M> {
        self.coins
            .iter()
            .find(|c| c.denom == *denom)
            .map(|c| c.value.clone())
            .unwrap_or_else(Dec::zero)
    }

    pub fn total(&self) -> Result<Dec<M>, LeverageError> {
        self.coins
            .iter()
            .try_fold(Dec::zero(), |sum, c| sum.add(&c.value))
    }

    pub fn has_positive(&self) -> bool {
        self.coins.iter().any(|c| c.value.is_positive())
    }

    pub fn is_sorted(&self) -> bool {
        self.coins
            .windows(2)
            .all(|pair| pair[0].order(&pair[1]) != Ordering::Greater)
    }

    pub fn get(&self, index: usize) -> Option<&WeightedDecCoin<M>> {
        self.coins.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, WeightedDecCoin<M>> {
        self.coins.iter()
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn into_vec(self) -> Vec<WeightedDecCoin<M>> {
        self.coins
    }
}
