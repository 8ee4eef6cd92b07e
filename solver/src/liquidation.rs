//! Liquidation sizing: how much a liquidator repays, how much collateral the
//! borrower loses, and how much the liquidator receives.

use common_errors::LeverageError;
use common_math::{interpolate, Dec};
use common_structs::{LeverageParams, Token};
use log::trace;
use multiversx_sc::api::ManagedTypeApi;
use multiversx_sc::types::BigUint;

/// Integer token amounts decided by a single liquidation.
#[derive(Clone)]
pub struct LiquidationAmounts<M: ManagedTypeApi> {
    /// Base tokens the liquidator repays
    pub repay: BigUint<M>,
    /// Collateral uTokens taken from the borrower
    pub burn: BigUint<M>,
    /// Base reward tokens the liquidator receives
    pub reward: BigUint<M>,
}

impl<M: ManagedTypeApi> LiquidationAmounts<M> {
    pub fn zero() -> Self {
        LiquidationAmounts {
            repay: BigUint::zero(),
            burn: BigUint::zero(),
            reward: BigUint::zero(),
        }
    }

    pub fn is_zero(&self) -> bool {
        let zero = BigUint::zero();
        self.repay == zero && self.burn == zero && self.reward == zero
    }
}

/// Computes the amounts repaid, burned and rewarded by a liquidation, starting
/// from the largest repayment and scaling it down by the most severe limit.
///
/// # Arguments
/// - `available_repay` - Lowest of liquidator balance, requested repayment and borrowed amount
/// - `available_collateral` - Borrower's collateral of the reward uToken
/// - `available_reward` - Unreserved reward tokens held by the module
/// - `repay_price` / `reward_price` - Oracle prices of the base denoms
/// - `utoken_rate` - Reward tokens per collateral uToken
/// - `incentive` - Liquidation incentive of the reward token
/// - `close_factor` - Share of the borrowed value that may be repaid
/// - `borrowed_value` - Borrower's borrowed value in USD
///
/// # Returns
/// - Repay rounded up, burn rounded down, and reward derived from the rounded burn
#[allow(clippy::too_many_arguments)]
pub fn compute_liquidation<M: ManagedTypeApi>(
    available_repay: &BigUint<M>,
    available_collateral: &BigUint<M>,
    available_reward: &BigUint<M>,
    repay_price: &Dec<M>,
    reward_price: &Dec<M>,
    utoken_rate: &Dec<M>,
    incentive: &Dec<M>,
    close_factor: &Dec<M>,
    borrowed_value: &Dec<M>,
) -> Result<LiquidationAmounts<M>, LeverageError> {
    if utoken_rate.is_zero() || reward_price.is_zero() || repay_price.is_zero() {
        return Ok(LiquidationAmounts::zero());
    }

    let max_repay = Dec::from_big_uint(available_repay)?;
    let max_reward = max_repay
        .mul(repay_price)?
        .mul(&Dec::one().add(incentive)?)?
        .quo(reward_price)?;
    let max_collateral = max_reward.quo(utoken_rate)?;

    if max_repay.is_zero()
        || max_reward.is_zero()
        || max_collateral.is_zero()
        || close_factor.is_zero()
        || borrowed_value.is_zero()
    {
        return Ok(LiquidationAmounts::zero());
    }

    let mut ratio = Dec::one();
    ratio = ratio.min_of(
        &borrowed_value
            .mul(close_factor)?
            .quo(&max_repay.mul(repay_price)?)?,
    );
    ratio = ratio.min_of(&Dec::from_big_uint(available_collateral)?.quo(&max_collateral)?);
    ratio = ratio.min_of(&Dec::from_big_uint(available_reward)?.quo(&max_reward)?);
    ratio = ratio.max_of(&Dec::zero());

    let repay_dec = max_repay.mul(&ratio)?;
    let collateral_dec = max_collateral.mul(&ratio)?;

    // each amount rounds on its own, so repay can be worth more than the burn
    let repay = repay_dec.ceil()?.round_uint()?;
    let burn = collateral_dec.truncate_uint()?;
    let reward = Dec::from_big_uint(&burn)?.mul(utoken_rate)?.truncate_uint()?;

    trace!("liquidation ratio {} repay {} burn {}", ratio, repay_dec, collateral_dec);

    Ok(LiquidationAmounts {
        repay,
        burn,
        reward,
    })
}

/// Dynamic close factor of a borrower.
///
/// Zero when the account cannot be liquidated, one for dust positions or when
/// complete liquidation is always allowed, otherwise linear between
/// `minimum_close_factor` at the threshold and one at
/// `borrowed / threshold = 1 + complete_liquidation_threshold`.
pub fn compute_close_factor<M: ManagedTypeApi>(
    borrowed_value: &Dec<M>,
    liquidation_threshold: &Dec<M>,
    small_liquidation_size: &Dec<M>,
    minimum_close_factor: &Dec<M>,
    complete_liquidation_threshold: &Dec<M>,
) -> Result<Dec<M>, LeverageError> {
    if !liquidation_threshold.is_positive() || *borrowed_value <= *liquidation_threshold {
        return Ok(Dec::zero());
    }
    if *borrowed_value <= *small_liquidation_size || complete_liquidation_threshold.is_zero() {
        return Ok(Dec::one());
    }

    scaled_close_factor(
        borrowed_value,
        liquidation_threshold,
        minimum_close_factor,
        complete_liquidation_threshold,
    )
}

fn scaled_close_factor<M: ManagedTypeApi>(
    borrowed_value: &Dec<M>,
    liquidation_threshold: &Dec<M>,
    minimum_close_factor: &Dec<M>,
    complete_liquidation_threshold: &Dec<M>,
) -> Result<Dec<M>, LeverageError> {
    let x = borrowed_value.quo(liquidation_threshold)?.sub(&Dec::one())?;
    let close_factor = interpolate(
        &x,
        &Dec::zero(),
        minimum_close_factor,
        complete_liquidation_threshold,
        &Dec::one(),
    )?;
    Ok(close_factor.min_of(&Dec::one()).max_of(&Dec::zero()))
}

/// Incentive paid for liquidating `token`. Direct liquidations, which pay out
/// base tokens instead of uTokens, give up `direct_liquidation_fee` of it.
pub fn liquidation_incentive<M: ManagedTypeApi>(
    token: &Token<M>,
    direct: bool,
    params: &LeverageParams<M>,
) -> Result<Dec<M>, LeverageError> {
    if !direct {
        return Ok(token.liquidation_incentive.clone());
    }
    let kept = Dec::one().sub(&params.direct_liquidation_fee)?;
    token.liquidation_incentive.mul(&kept)
}

/// Incentive of the reward token and close factor for a borrower.
///
/// Unlike [`compute_close_factor`], an account is not checked for eligibility
/// here: a zero threshold yields a full close.
///
/// # Errors
/// - `NegativeValue` if the borrowed value or threshold is negative
pub fn liquidation_params<M: ManagedTypeApi>(
    reward_token: &Token<M>,
    borrowed_value: &Dec<M>,
    liquidation_threshold: &Dec<M>,
    params: &LeverageParams<M>,
) -> Result<(Dec<M>, Dec<M>), LeverageError> {
    if borrowed_value.is_negative() || liquidation_threshold.is_negative() {
        return Err(LeverageError::NegativeValue);
    }

    let incentive = reward_token.liquidation_incentive.clone();
    if liquidation_threshold.is_zero()
        || *borrowed_value <= params.small_liquidation_size
        || params.complete_liquidation_threshold.is_zero()
    {
        return Ok((incentive, Dec::one()));
    }

    let close_factor = scaled_close_factor(
        borrowed_value,
        liquidation_threshold,
        &params.minimum_close_factor,
        &params.complete_liquidation_threshold,
    )?;
    Ok((incentive, close_factor))
}
