use alloc::vec::Vec;

use common_errors::LeverageError;
use common_math::Dec;
use common_structs::{DecCoin, Denom};
use log::trace;
use multiversx_sc::api::ManagedTypeApi;

use crate::weighted::DenomDisplay;

use super::AccountPosition;

/// Halving steps allowed when narrowing a bound.
const MAX_SEARCH_STEPS: usize = 256;

impl<M: ManagedTypeApi> AccountPosition<M> {
    /// Whether the account, rebuilt with `amount` more of `denom` borrowed, is
    /// still within its limit.
    pub(crate) fn healthy_after_borrow(
        &self,
        denom: &Denom<M>,
        amount: &Dec<M>,
    ) -> Result<bool, LeverageError> {
        let (collateral, mut borrowed) = self.holdings()?;
        shift(&mut borrowed, denom, amount)?;
        self.rebuilt(&collateral, &borrowed)?.is_healthy()
    }

    /// Whether the account, rebuilt with `amount` less of `denom` collateral, is
    /// still within its limit.
    pub(crate) fn healthy_after_withdraw(
        &self,
        denom: &Denom<M>,
        amount: &Dec<M>,
    ) -> Result<bool, LeverageError> {
        let (mut collateral, borrowed) = self.holdings()?;
        shift(&mut collateral, denom, &amount.neg())?;
        self.rebuilt(&collateral, &borrowed)?.is_healthy()
    }
}

/// Largest amount in `[0, upper]` that `is_healthy` accepts, given that zero is
/// accepted. `upper` is tried first and returned as is when it passes.
pub(crate) fn largest_healthy<M, F>(
    denom: &Denom<M>,
    upper: &Dec<M>,
    mut is_healthy: F,
) -> Result<Dec<M>, LeverageError>
where
    M: ManagedTypeApi,
    F: FnMut(&Dec<M>) -> Result<bool, LeverageError>,
{
    if !upper.is_positive() {
        return Ok(Dec::zero());
    }
    if is_healthy(upper)? {
        return Ok(upper.clone());
    }

    let unit = Dec::from_raw_u128(1);
    let two = Dec::from_int(2);
    let mut healthy = Dec::zero();
    let mut unhealthy = upper.clone();
    for _ in 0..MAX_SEARCH_STEPS {
        let gap = unhealthy.sub(&healthy)?;
        if gap <= unit {
            break;
        }
        let mid = healthy.add(&gap.quo_truncate(&two)?)?;
        if is_healthy(&mid)? {
            healthy = mid;
        } else {
            unhealthy = mid;
        }
    }

    trace!(
        "bound for {} narrowed from {} to {}",
        DenomDisplay(denom),
        upper,
        healthy
    );
    Ok(healthy)
}

/// Changes the value held of `denom` by `delta`, never below zero.
fn shift<M: ManagedTypeApi>(
    coins: &mut Vec<DecCoin<M>>,
    denom: &Denom<M>,
    delta: &Dec<M>,
) -> Result<(), LeverageError> {
    match coins.iter_mut().find(|c| c.denom == *denom) {
        Some(coin) => coin.amount = coin.amount.add(delta)?.max_of(&Dec::zero()),
        None if delta.is_positive() => coins.push(DecCoin::new(denom.clone(), delta.clone())),
        None => {}
    }
    Ok(())
}
