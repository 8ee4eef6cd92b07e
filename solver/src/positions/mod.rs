mod borrow;
mod bound;
mod builder;
mod rebalance;
mod withdraw;

use alloc::vec::Vec;
use core::fmt;

use common_errors::LeverageError;
use common_math::Dec;
use common_structs::Denom;
use multiversx_sc::api::ManagedTypeApi;

use crate::registry::TokenSet;
use crate::weighted::{
    DenomDisplay, WeightedDecCoin, WeightedDecCoins, WeightedNormalPair, WeightedNormalPairs,
    WeightedSpecialPairs,
};

pub use builder::new_position;

/// An account's collateral and borrows arranged into special pairs, normal
/// pairs and unpaired leftovers.
///
/// Built once per query from USD values, queried, then discarded. The position
/// never stores token amounts, only values.
#[derive(Clone)]
pub struct AccountPosition<M: ManagedTypeApi> {
    /// Every special pair that could apply to the account, including empty ones
    special_pairs: WeightedSpecialPairs<M>,
    /// Collateral matched against borrows under ordinary weights
    normal_pairs: WeightedNormalPairs<M>,
    /// Collateral not backing any borrow
    unpaired_collateral: WeightedDecCoins<M>,
    /// Borrows without collateral backing; non-empty means over limit
    unpaired_borrows: WeightedDecCoins<M>,
    tokens: TokenSet<M>,
    collateral_value: Dec<M>,
    borrowed_value: Dec<M>,
    /// When true, weights are liquidation thresholds instead of collateral weights
    is_for_liquidation: bool,
    /// Floor applied to the borrow side weight of a pairing
    minimum_borrow_factor: Dec<M>,
}

impl<M: ManagedTypeApi> AccountPosition<M> {
    /// Borrow limit, or liquidation threshold for positions built for liquidation.
    ///
    /// # Returns
    /// - Over limit: the borrowed value that is backed by collateral
    /// - Otherwise: borrowed value plus the weighted value of all unpaired collateral
    pub fn limit(&self) -> Result<Dec<M>, LeverageError> {
        let unpaired_borrowed = self.unpaired_borrows.total()?;
        if unpaired_borrowed.is_positive() {
            return self.borrowed_value.sub(&unpaired_borrowed);
        }

        let mut limit = self.borrowed_value.clone();
        for coin in self.unpaired_collateral.iter() {
            limit = limit.add(&coin.value.mul(&coin.weight)?)?;
        }
        Ok(limit)
    }

    pub fn is_healthy(&self) -> Result<bool, LeverageError> {
        Ok(self.borrowed_value <= self.limit()?)
    }

    pub fn is_for_liquidation(&self) -> bool {
        self.is_for_liquidation
    }

    pub fn collateral_value(&self) -> &Dec<M> {
        &self.collateral_value
    }

    pub fn borrowed_value(&self) -> &Dec<M> {
        &self.borrowed_value
    }

    pub fn minimum_borrow_factor(&self) -> &Dec<M> {
        &self.minimum_borrow_factor
    }

    pub fn special_pairs(&self) -> &WeightedSpecialPairs<M> {
        &self.special_pairs
    }

    pub fn normal_pairs(&self) -> &WeightedNormalPairs<M> {
        &self.normal_pairs
    }

    pub fn unpaired_collateral(&self) -> &WeightedDecCoins<M> {
        &self.unpaired_collateral
    }

    pub fn unpaired_borrows(&self) -> &WeightedDecCoins<M> {
        &self.unpaired_borrows
    }

    pub fn tokens(&self) -> &TokenSet<M> {
        &self.tokens
    }

    /// Total collateral value of a denom across all containers.
    pub fn collateral_of(&self, denom: &Denom<M>) -> Result<Dec<M>, LeverageError> {
        self.special_pairs
            .collateral_of(denom)?
            .add(&self.normal_pairs.collateral_of(denom)?)?
            .add(&self.unpaired_collateral.amount_of(denom))
    }

    /// Total borrowed value of a denom across all containers.
    pub fn borrowed_of(&self, denom: &Denom<M>) -> Result<Dec<M>, LeverageError> {
        self.special_pairs
            .borrowed_of(denom)?
            .add(&self.normal_pairs.borrowed_of(denom)?)?
            .add(&self.unpaired_borrows.amount_of(denom))
    }

    pub fn has_collateral(&self, denom: &Denom<M>) -> Result<bool, LeverageError> {
        Ok(self.collateral_of(denom)?.is_positive())
    }

    pub(crate) fn token_weight(&self, denom: &Denom<M>) -> Dec<M> {
        self.tokens.weight(denom, self.is_for_liquidation)
    }

    /// Effective weight of an ordinary pairing: the collateral weight, capped by
    /// the borrow weight raised to the minimum borrow factor.
    pub(crate) fn pair_weight(&self, collateral_weight: &Dec<M>, borrow_weight: &Dec<M>) -> Dec<M> {
        collateral_weight.min_of(&borrow_weight.max_of(&self.minimum_borrow_factor))
    }

    /// Matches collateral against borrows with two cursors, walking each side in
    /// the given index order and exhausting at least one side per step.
    ///
    /// Matched values are subtracted from `collateral` and `borrows` in place.
    /// With `skip_zero_weight`, collateral that cannot back the current borrow is
    /// left unmatched instead of being paired against a zero borrow.
    pub(crate) fn match_normal_assets(
        &self,
        collateral: &mut [WeightedDecCoin<M>],
        borrows: &mut [WeightedDecCoin<M>],
        collateral_order: &[usize],
        borrow_order: &[usize],
        skip_zero_weight: bool,
    ) -> Result<Vec<WeightedNormalPair<M>>, LeverageError> {
        let mut pairs = Vec::new();
        let mut c_cursor = 0;
        let mut b_cursor = 0;

        while let (Some(&ci), Some(&bi)) =
            (collateral_order.get(c_cursor), borrow_order.get(b_cursor))
        {
            let c = &collateral[ci];
            let b = &borrows[bi];
            if !c.value.is_positive() {
                c_cursor += 1;
                continue;
            }
            if !b.value.is_positive() {
                b_cursor += 1;
                continue;
            }

            let weight = self.pair_weight(&c.weight, &b.weight);
            if skip_zero_weight && weight.is_zero() {
                c_cursor += 1;
                continue;
            }

            let pair_limit = c.value.mul(&weight)?;
            let (used_collateral, used_borrow) = if pair_limit <= b.value {
                c_cursor += 1;
                (c.value.clone(), pair_limit)
            } else {
                b_cursor += 1;
                (b.value.quo(&weight)?.min_of(&c.value), b.value.clone())
            };

            if used_collateral.is_positive() || used_borrow.is_positive() {
                pairs.push(WeightedNormalPair {
                    collateral: WeightedDecCoin::new(
                        c.denom.clone(),
                        used_collateral.clone(),
                        c.weight.clone(),
                    ),
                    borrow: WeightedDecCoin::new(
                        b.denom.clone(),
                        used_borrow.clone(),
                        b.weight.clone(),
                    ),
                });
            }

            collateral[ci].value = collateral[ci].value.sub(&used_collateral)?;
            borrows[bi].value = borrows[bi].value.sub(&used_borrow)?;
        }

        Ok(pairs)
    }
}

impl<M: ManagedTypeApi> fmt::Display for AccountPosition<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "special:")?;
        for pair in self.special_pairs.iter() {
            writeln!(
                f,
                "  {}{}, {}{}, {}",
                pair.collateral.amount,
                DenomDisplay(&pair.collateral.denom),
                pair.borrow.amount,
                DenomDisplay(&pair.borrow.denom),
                pair.special_weight
            )?;
        }
        writeln!(f, "normal:")?;
        for pair in self.normal_pairs.iter() {
            writeln!(
                f,
                "  {{{}{} {}}}, {{{}{} {}}}",
                pair.collateral.value,
                DenomDisplay(&pair.collateral.denom),
                pair.collateral.weight,
                pair.borrow.value,
                DenomDisplay(&pair.borrow.denom),
                pair.borrow.weight
            )?;
        }
        for coin in self.unpaired_collateral.iter() {
            writeln!(
                f,
                "  {{{}{} {}}}, -",
                coin.value,
                DenomDisplay(&coin.denom),
                coin.weight
            )?;
        }
        for coin in self.unpaired_borrows.iter() {
            writeln!(
                f,
                "  -, {{{}{} {}}}",
                coin.value,
                DenomDisplay(&coin.denom),
                coin.weight
            )?;
        }
        Ok(())
    }
}
