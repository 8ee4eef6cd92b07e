use alloc::vec::Vec;

use common_errors::{
    LeverageError, ERROR_INVALID_MINIMUM_BORROW_FACTOR, ERROR_PAIR_UNKNOWN_DENOM,
};
use common_math::Dec;
use common_structs::{DecCoin, Denom, SpecialAssetPair, Token};
use log::debug;
use multiversx_sc::api::ManagedTypeApi;

use crate::registry::TokenSet;
use crate::weighted::{
    WeightedDecCoin, WeightedDecCoins, WeightedNormalPairs, WeightedSpecialPair,
    WeightedSpecialPairs,
};

use super::AccountPosition;

/// Builds the canonical position of an account from the USD values of its
/// collateral and borrows.
///
/// Special pairs are filled first, in priority order. Remaining assets are then
/// matched into normal pairs from the highest weight down, and whatever is left
/// becomes unpaired collateral or unpaired borrows.
///
/// # Arguments
/// - `tokens` - Registered tokens; each one is validated before use
/// - `pairs` - Special asset pairs; both denoms must appear in `tokens`
/// - `collateral` / `borrowed` - USD values by base denom
/// - `is_for_liquidation` - Use liquidation thresholds instead of collateral weights
/// - `minimum_borrow_factor` - Floor on the borrow side weight, zero disables it
///
/// # Errors
/// - `InvalidToken`, `InvalidPair`, `InvalidParams` on bad settings
/// - `NegativeValue` on negative USD values
/// - `Overflow` from decimal arithmetic
pub fn new_position<M: ManagedTypeApi>(
    tokens: &[Token<M>],
    pairs: &[SpecialAssetPair<M>],
    collateral: &[DecCoin<M>],
    borrowed: &[DecCoin<M>],
    is_for_liquidation: bool,
    minimum_borrow_factor: &Dec<M>,
) -> Result<AccountPosition<M>, LeverageError> {
    if minimum_borrow_factor.is_negative() || *minimum_borrow_factor >= Dec::one() {
        return Err(LeverageError::InvalidParams(
            ERROR_INVALID_MINIMUM_BORROW_FACTOR,
        ));
    }

    let mut position = AccountPosition::empty(
        TokenSet::from_tokens(tokens)?,
        is_for_liquidation,
        minimum_borrow_factor.clone(),
    );
    position.insert_special_pairs(pairs)?;
    position.arrange(collateral, borrowed)?;

    Ok(position)
}

impl<M: ManagedTypeApi> AccountPosition<M> {
    fn empty(
        tokens: TokenSet<M>,
        is_for_liquidation: bool,
        minimum_borrow_factor: Dec<M>,
    ) -> Self {
        AccountPosition {
            special_pairs: WeightedSpecialPairs::new(),
            normal_pairs: WeightedNormalPairs::new(),
            unpaired_collateral: WeightedDecCoins::new(),
            unpaired_borrows: WeightedDecCoins::new(),
            tokens,
            collateral_value: Dec::zero(),
            borrowed_value: Dec::zero(),
            is_for_liquidation,
            minimum_borrow_factor,
        }
    }

    /// Builds the position the same account would have with other holdings,
    /// keeping its tokens, special pair slots and settings.
    pub(crate) fn rebuilt(
        &self,
        collateral: &[DecCoin<M>],
        borrowed: &[DecCoin<M>],
    ) -> Result<Self, LeverageError> {
        let mut position = Self::empty(
            self.tokens.clone(),
            self.is_for_liquidation,
            self.minimum_borrow_factor.clone(),
        );
        for slot in self.special_pairs.iter() {
            position.special_pairs.add(WeightedSpecialPair::empty(
                slot.collateral.denom.clone(),
                slot.borrow.denom.clone(),
                slot.special_weight.clone(),
            ))?;
        }
        position.arrange(collateral, borrowed)?;
        Ok(position)
    }

    /// Collateral and borrowed value by denom, summed over every container.
    pub(crate) fn holdings(&self) -> Result<(Vec<DecCoin<M>>, Vec<DecCoin<M>>), LeverageError> {
        let mut collateral = Vec::new();
        let mut borrowed = Vec::new();
        for pair in self.special_pairs.iter() {
            accumulate(&mut collateral, &pair.collateral.denom, &pair.collateral.amount)?;
            accumulate(&mut borrowed, &pair.borrow.denom, &pair.borrow.amount)?;
        }
        for pair in self.normal_pairs.iter() {
            accumulate(&mut collateral, &pair.collateral.denom, &pair.collateral.value)?;
            accumulate(&mut borrowed, &pair.borrow.denom, &pair.borrow.value)?;
        }
        for coin in self.unpaired_collateral.iter() {
            accumulate(&mut collateral, &coin.denom, &coin.value)?;
        }
        for coin in self.unpaired_borrows.iter() {
            accumulate(&mut borrowed, &coin.denom, &coin.value)?;
        }
        Ok((collateral, borrowed))
    }

    /// Matches holdings into the position's empty special pair slots, then into
    /// normal pairs, and records the leftovers as unpaired.
    fn arrange(
        &mut self,
        collateral: &[DecCoin<M>],
        borrowed: &[DecCoin<M>],
    ) -> Result<(), LeverageError> {
        let mut unsorted_collateral = self.weigh(collateral)?;
        let mut unsorted_borrows = self.weigh(borrowed)?;
        self.collateral_value = unsorted_collateral.total()?;
        self.borrowed_value = unsorted_borrows.total()?;

        self.match_special_pairs(&mut unsorted_collateral, &mut unsorted_borrows)?;

        let mut collateral = unsorted_collateral.into_vec();
        let mut borrows = unsorted_borrows.into_vec();
        let collateral_order: Vec<usize> = (0..collateral.len()).collect();
        let borrow_order: Vec<usize> = (0..borrows.len()).collect();
        let matched = self.match_normal_assets(
            &mut collateral,
            &mut borrows,
            &collateral_order,
            &borrow_order,
            false,
        )?;
        for pair in matched {
            self.normal_pairs.add(pair)?;
        }

        for coin in collateral.into_iter().filter(|c| c.value.is_positive()) {
            self.unpaired_collateral.add(coin)?;
        }
        for coin in borrows.into_iter().filter(|c| c.value.is_positive()) {
            self.unpaired_borrows.add(coin)?;
        }

        debug!(
            "position built: collateral={} borrowed={} special={} normal={} liquidation={}",
            self.collateral_value,
            self.borrowed_value,
            self.special_pairs.len(),
            self.normal_pairs.len(),
            self.is_for_liquidation
        );
        Ok(())
    }

    /// Registers every applicable special pair as an empty slot.
    ///
    /// The effective weight never drops below the ordinary weight the same
    /// collateral would get against the same borrow. Slots whose effective
    /// weight is zero could never hold value and are left out.
    ///
    /// A pair declared at or below the ordinary weight keeps its slot at the
    /// ordinary weight: slots are matched before normal pairs, so the pair still
    /// decides which collateral backs its borrow first.
    fn insert_special_pairs(&mut self, pairs: &[SpecialAssetPair<M>]) -> Result<(), LeverageError> {
        for pair in pairs {
            pair.validate()?;
            if !self.tokens.contains(&pair.collateral) || !self.tokens.contains(&pair.borrow) {
                return Err(LeverageError::InvalidPair(ERROR_PAIR_UNKNOWN_DENOM));
            }

            let ordinary = self.pair_weight(
                &self.token_weight(&pair.collateral),
                &self.token_weight(&pair.borrow),
            );
            let weight = pair.weight(self.is_for_liquidation).max_of(&ordinary);
            if weight.is_zero() {
                continue;
            }

            self.special_pairs.add(WeightedSpecialPair::empty(
                pair.collateral.clone(),
                pair.borrow.clone(),
                weight,
            ))?;
        }
        Ok(())
    }

    fn weigh(&self, coins: &[DecCoin<M>]) -> Result<WeightedDecCoins<M>, LeverageError> {
        let mut weighted = WeightedDecCoins::new();
        for coin in coins {
            if coin.amount.is_negative() {
                return Err(LeverageError::NegativeValue);
            }
            weighted.add(WeightedDecCoin::new(
                coin.denom.clone(),
                coin.amount.clone(),
                self.token_weight(&coin.denom),
            ))?;
        }
        Ok(weighted)
    }

    /// Fills each special pair slot in priority order from the unsorted assets.
    fn match_special_pairs(
        &mut self,
        collateral: &mut WeightedDecCoins<M>,
        borrows: &mut WeightedDecCoins<M>,
    ) -> Result<(), LeverageError> {
        for index in 0..self.special_pairs.len() {
            let Some(slot) = self.special_pairs.get_mut(index) else {
                break;
            };
            let b = borrows.amount_of(&slot.borrow.denom);
            let c = collateral.amount_of(&slot.collateral.denom);
            if !b.is_positive() || !c.is_positive() {
                continue;
            }

            let pair_limit = c.mul(&slot.special_weight)?;
            let (used_collateral, used_borrow) = if pair_limit >= b {
                (b.quo(&slot.special_weight)?.min_of(&c), b)
            } else {
                (c, pair_limit)
            };

            borrows.sub(&slot.borrow.denom, &used_borrow)?;
            collateral.sub(&slot.collateral.denom, &used_collateral)?;
            slot.collateral.amount = used_collateral;
            slot.borrow.amount = used_borrow;
        }
        Ok(())
    }
}

fn accumulate<M: ManagedTypeApi>(
    coins: &mut Vec<DecCoin<M>>,
    denom: &Denom<M>,
    amount: &Dec<M>,
) -> Result<(), LeverageError> {
    if !amount.is_positive() {
        return Ok(());
    }
    match coins.iter_mut().find(|c| c.denom == *denom) {
        Some(coin) => coin.amount = coin.amount.add(amount)?,
        None => coins.push(DecCoin::new(denom.clone(), amount.clone())),
    }
    Ok(())
}
