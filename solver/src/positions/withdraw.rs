use alloc::vec::Vec;

use common_errors::LeverageError;
use common_math::Dec;
use common_structs::Denom;
use log::{debug, warn};
use multiversx_sc::api::ManagedTypeApi;

use crate::weighted::{DenomDisplay, WeightedDecCoin, WeightedDecCoins};

use super::bound::largest_healthy;
use super::AccountPosition;

impl<M: ManagedTypeApi> AccountPosition<M> {
    /// Maximum value of `denom` collateral the account can withdraw while staying
    /// at or under its borrow limit. The position itself is not modified.
    ///
    /// Collateral is released in three stages:
    /// 1. unpaired collateral of the denom
    /// 2. normal pairs, by re-matching their borrows onto other collateral
    /// 3. special pairs, starting at the lowest priority slot, by moving each
    ///    pair's borrow onto other collateral
    ///
    /// # Returns
    /// - Zero for liquidation positions, accounts over limit, and denoms the
    ///   account holds no collateral of
    pub fn max_withdraw(&self, denom: &Denom<M>) -> Result<Dec<M>, LeverageError> {
        if self.is_for_liquidation
            || self.unpaired_borrows.has_positive()
            || !self.has_collateral(denom)?
        {
            return Ok(Dec::zero());
        }

        let estimate = self.estimate_withdraw(denom)?;
        let max_withdraw = largest_healthy(denom, &estimate, |amount| {
            self.healthy_after_withdraw(denom, amount)
        })?;

        debug!(
            "max withdraw of {}: estimate={} allowed={}",
            DenomDisplay(denom),
            estimate,
            max_withdraw
        );
        Ok(max_withdraw)
    }

    /// Collateral released by the three withdrawal stages, before the result is
    /// checked against a rebuilt position.
    pub(super) fn estimate_withdraw(&self, denom: &Denom<M>) -> Result<Dec<M>, LeverageError> {
        let mut trial = self.clone();
        let mut withdrawn = trial.take_unpaired_collateral(denom)?;
        withdrawn = withdrawn.add(&trial.withdraw_normal_collateral(denom)?)?;

        if trial.normal_pairs.collateral_of(denom)?.is_positive() {
            return Ok(withdrawn);
        }

        let special_indexes: Vec<usize> = trial
            .special_pairs
            .iter()
            .enumerate()
            .filter(|(_, pair)| {
                pair.collateral.denom == *denom && pair.collateral.amount.is_positive()
            })
            .map(|(index, _)| index)
            .collect();

        for index in special_indexes.into_iter().rev() {
            let mut attempt = trial.clone();
            match attempt.withdraw_from_special_pair(index) {
                Ok(amount) => {
                    let swept = attempt.take_unpaired_collateral(denom)?;
                    withdrawn = withdrawn.add(&amount)?.add(&swept)?;
                    trial = attempt;
                }
                Err(LeverageError::PositionOverLimit) => {
                    warn!(
                        "special pair {} could not release {}",
                        index,
                        DenomDisplay(denom)
                    );
                    break;
                }
                Err(err) => return Err(err),
            }

            let still_paired = trial
                .special_pairs
                .get(index)
                .is_some_and(|pair| pair.collateral.amount.is_positive());
            if still_paired {
                break;
            }
        }

        Ok(withdrawn)
    }

    /// Removes all unpaired collateral of a denom from the position.
    fn take_unpaired_collateral(&mut self, denom: &Denom<M>) -> Result<Dec<M>, LeverageError> {
        let taken = self.unpaired_collateral.take(denom);
        self.collateral_value = self.collateral_value.sub(&taken)?;
        Ok(taken)
    }

    /// Frees as much `denom` collateral from normal pairs as possible and removes it.
    ///
    /// Pairs whose collateral sorts at or after `denom` are taken apart and their
    /// borrows re-matched from the tail, with `denom` offered last. If the borrows
    /// do not fit, the position is left as it was and nothing is withdrawn.
    fn withdraw_normal_collateral(&mut self, denom: &Denom<M>) -> Result<Dec<M>, LeverageError> {
        let mut trial = self.clone();
        match trial.rematch_without(denom) {
            Ok(withdrawn) => {
                *self = trial;
                Ok(withdrawn)
            }
            Err(LeverageError::PositionOverLimit) => {
                warn!("normal pairs could not release {}", DenomDisplay(denom));
                Ok(Dec::zero())
            }
            Err(err) => Err(err),
        }
    }

    fn rematch_without(&mut self, denom: &Denom<M>) -> Result<Dec<M>, LeverageError> {
        let marker = WeightedDecCoin::marker(denom.clone(), self.token_weight(denom));
        let displaced = self
            .normal_pairs
            .split_off(|pair| !pair.collateral.before(&marker));

        let mut pool = core::mem::take(&mut self.unpaired_collateral);
        let mut freed_borrows = WeightedDecCoins::new();
        for pair in displaced {
            pool.add(pair.collateral)?;
            freed_borrows.add(pair.borrow)?;
        }

        let mut collateral = pool.into_vec();
        let mut borrows = freed_borrows.into_vec();
        let target = collateral.iter().position(|c| c.denom == *denom);
        let mut collateral_order: Vec<usize> = (0..collateral.len())
            .rev()
            .filter(|index| Some(*index) != target)
            .collect();
        collateral_order.extend(target);
        let borrow_order: Vec<usize> = (0..borrows.len()).rev().collect();

        let matched = self.match_normal_assets(
            &mut collateral,
            &mut borrows,
            &collateral_order,
            &borrow_order,
            true,
        )?;

        let withdrawn = match target.and_then(|index| collateral.get_mut(index)) {
            Some(coin) => core::mem::replace(&mut coin.value, Dec::zero()),
            None => Dec::zero(),
        };

        self.settle_rematch(matched, collateral, &borrows)?;
        self.collateral_value = self.collateral_value.sub(&withdrawn)?;
        Ok(withdrawn)
    }

    /// Moves the borrow of one special pair onto other collateral, releasing as
    /// much of the pair's collateral as the move allows.
    ///
    /// The pair's slot index stays valid afterwards, even when it is emptied.
    /// Borrowed value is unchanged: the borrow only changes hands.
    ///
    /// # Returns
    /// - The collateral value released from the pair
    fn withdraw_from_special_pair(&mut self, index: usize) -> Result<Dec<M>, LeverageError> {
        let Some(pair) = self.special_pairs.get(index).cloned() else {
            return Ok(Dec::zero());
        };
        let collateral_denom = &pair.collateral.denom;
        let borrow_denom = &pair.borrow.denom;

        let released = if pair.borrow.amount.is_positive() {
            self.displace_borrows_after(borrow_denom)?;
            let special = self.fill_special_pairs(
                borrow_denom,
                Some(&pair.borrow.amount),
                Some(index),
                Some(collateral_denom),
            )?;
            let remaining = pair.borrow.amount.sub(&special)?;
            let ordinary = if remaining.is_positive() {
                self.fill_ordinary_collateral(borrow_denom, &remaining, Some(collateral_denom))?
            } else {
                Dec::zero()
            };
            let moved = special.add(&ordinary)?.min_of(&pair.borrow.amount);

            let released = if moved == pair.borrow.amount {
                pair.collateral.amount.clone()
            } else {
                moved
                    .quo(&pair.special_weight)?
                    .min_of(&pair.collateral.amount)
            };

            if let Some(slot) = self.special_pairs.get_mut(index) {
                slot.borrow.amount = slot.borrow.amount.sub(&moved)?;
                slot.collateral.amount = slot.collateral.amount.sub(&released)?;
            }
            released
        } else {
            if let Some(slot) = self.special_pairs.get_mut(index) {
                slot.collateral.amount = Dec::zero();
            }
            pair.collateral.amount.clone()
        };

        self.collateral_value = self.collateral_value.sub(&released)?;
        Ok(released)
    }
}
