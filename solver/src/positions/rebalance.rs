use alloc::vec::Vec;

use common_errors::LeverageError;
use common_math::Dec;
use common_structs::Denom;
use log::{trace, warn};
use multiversx_sc::api::ManagedTypeApi;

use crate::weighted::{DenomDisplay, WeightedDecCoin, WeightedDecCoins, WeightedNormalPair};

use super::AccountPosition;

impl<M: ManagedTypeApi> AccountPosition<M> {
    /// Dismantles every normal pair whose borrow sorts at or after `denom` and
    /// re-matches those borrows from the tail, lowest weights first.
    ///
    /// Collateral freed this way, together with the previous unpaired collateral,
    /// becomes the new unpaired collateral. Only normal pairs move, so the
    /// rebalance finishes in a single pass. No-op when already over limit.
    pub(crate) fn displace_borrows_after(&mut self, denom: &Denom<M>) -> Result<(), LeverageError> {
        if self.unpaired_borrows.has_positive() {
            return Ok(());
        }

        let marker = WeightedDecCoin::marker(denom.clone(), self.token_weight(denom));
        let displaced = self
            .normal_pairs
            .split_off(|pair| !pair.borrow.before(&marker));
        if displaced.is_empty() {
            return Ok(());
        }

        let mut pool = core::mem::take(&mut self.unpaired_collateral);
        let mut freed_borrows = WeightedDecCoins::new();
        for pair in displaced {
            pool.add(pair.collateral)?;
            freed_borrows.add(pair.borrow)?;
        }

        let mut collateral = pool.into_vec();
        let mut borrows = freed_borrows.into_vec();
        let collateral_order: Vec<usize> = (0..collateral.len()).rev().collect();
        let borrow_order: Vec<usize> = (0..borrows.len()).rev().collect();
        let matched = self.match_normal_assets(
            &mut collateral,
            &mut borrows,
            &collateral_order,
            &borrow_order,
            true,
        )?;

        self.settle_rematch(matched, collateral, &borrows)?;
        trace!(
            "displaced borrows after {}: {} normal pairs, {} unpaired collateral",
            DenomDisplay(denom),
            self.normal_pairs.len(),
            self.unpaired_collateral.len()
        );
        Ok(())
    }

    /// Writes the result of a tail re-match back into the position. Any borrow that
    /// found no collateral means the rebalance would leave the position over limit.
    pub(crate) fn settle_rematch(
        &mut self,
        matched: Vec<WeightedNormalPair<M>>,
        collateral: Vec<WeightedDecCoin<M>>,
        borrows: &[WeightedDecCoin<M>],
    ) -> Result<(), LeverageError> {
        if borrows.iter().any(|b| b.value.is_positive()) {
            warn!("rebalance left borrows without collateral");
            return Err(LeverageError::PositionOverLimit);
        }

        for pair in matched {
            self.normal_pairs.add(pair)?;
        }
        for coin in collateral.into_iter().filter(|c| c.value.is_positive()) {
            self.unpaired_collateral.add(coin)?;
        }
        Ok(())
    }

    /// Borrows `denom` through every special pair that accepts it, using only
    /// unpaired collateral.
    ///
    /// # Arguments
    /// - `cap` - Stop once this much has been borrowed; `None` borrows without limit
    /// - `skip_index` - Slot that must not receive new borrows
    /// - `excluded_collateral` - Collateral denom that must stay unpaired
    ///
    /// # Returns
    /// - The value borrowed. `borrowed_value` is left for the caller to adjust.
    pub(crate) fn fill_special_pairs(
        &mut self,
        denom: &Denom<M>,
        cap: Option<&Dec<M>>,
        skip_index: Option<usize>,
        excluded_collateral: Option<&Denom<M>>,
    ) -> Result<Dec<M>, LeverageError> {
        let mut filled = Dec::zero();

        for index in 0..self.special_pairs.len() {
            if skip_index == Some(index) {
                continue;
            }
            let Some(slot) = self.special_pairs.get_mut(index) else {
                break;
            };
            if slot.borrow.denom != *denom
                || excluded_collateral.is_some_and(|excluded| slot.collateral.denom == *excluded)
            {
                continue;
            }

            let available = self.unpaired_collateral.amount_of(&slot.collateral.denom);
            if !available.is_positive() {
                continue;
            }

            let capacity = available.mul(&slot.special_weight)?;
            let borrow = match cap {
                Some(cap) => {
                    let remaining = cap.sub(&filled)?;
                    if !remaining.is_positive() {
                        break;
                    }
                    capacity.min_of(&remaining)
                }
                None => capacity.clone(),
            };
            let used = if borrow == capacity {
                available
            } else {
                borrow.quo(&slot.special_weight)?.min_of(&available)
            };

            slot.collateral.amount = slot.collateral.amount.add(&used)?;
            slot.borrow.amount = slot.borrow.amount.add(&borrow)?;
            let collateral_denom = slot.collateral.denom.clone();
            self.unpaired_collateral.sub(&collateral_denom, &used)?;
            filled = filled.add(&borrow)?;
        }

        self.unpaired_collateral.prune();
        Ok(filled)
    }

    /// Converts unpaired collateral into new normal pairs borrowing `denom`.
    ///
    /// Each coin backs the new borrow at `min(coin weight, max(denom weight, minimum
    /// borrow factor))`. Coins with zero effective weight stay unpaired. Filling
    /// stops at `cap`, with the last coin only partially used.
    ///
    /// # Returns
    /// - The value borrowed. `borrowed_value` is left for the caller to adjust.
    pub(crate) fn fill_ordinary_collateral(
        &mut self,
        denom: &Denom<M>,
        cap: &Dec<M>,
        excluded_collateral: Option<&Denom<M>>,
    ) -> Result<Dec<M>, LeverageError> {
        let borrow_weight = self.token_weight(denom);
        let mut filled = Dec::zero();
        let mut new_pairs = Vec::new();

        for coin in self.unpaired_collateral.iter() {
            if !coin.value.is_positive()
                || excluded_collateral.is_some_and(|excluded| coin.denom == *excluded)
            {
                continue;
            }
            let remaining = cap.sub(&filled)?;
            if !remaining.is_positive() {
                break;
            }

            let weight = self.pair_weight(&coin.weight, &borrow_weight);
            if weight.is_zero() {
                continue;
            }

            let capacity = coin.value.mul(&weight)?;
            let (used, borrow) = if capacity <= remaining {
                (coin.value.clone(), capacity)
            } else {
                (remaining.quo(&weight)?.min_of(&coin.value), remaining)
            };

            filled = filled.add(&borrow)?;
            new_pairs.push(WeightedNormalPair {
                collateral: WeightedDecCoin::new(coin.denom.clone(), used, coin.weight.clone()),
                borrow: WeightedDecCoin::new(denom.clone(), borrow, borrow_weight.clone()),
            });
        }

        for pair in new_pairs {
            self.unpaired_collateral
                .sub(&pair.collateral.denom, &pair.collateral.value)?;
            self.normal_pairs.add(pair)?;
        }
        self.unpaired_collateral.prune();
        Ok(filled)
    }
}
