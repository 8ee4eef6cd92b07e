use leverage_solver::*;

pub mod setup;
use setup::*;

#[allow(clippy::too_many_arguments)]
fn liquidate(
    repay: u64,
    collateral: u64,
    reward: u64,
    repay_price: &str,
    reward_price: &str,
    rate: &str,
    incentive: &str,
    close_factor: &str,
    borrowed_value: &str,
) -> (u64, u64, u64) {
    let amounts = compute_liquidation(
        &big(repay),
        &big(collateral),
        &big(reward),
        &dec(repay_price),
        &dec(reward_price),
        &dec(rate),
        &dec(incentive),
        &dec(close_factor),
        &dec(borrowed_value),
    )
    .unwrap();
    (
        amounts.repay.to_u64().unwrap(),
        amounts.burn.to_u64().unwrap(),
        amounts.reward.to_u64().unwrap(),
    )
}

// ============== COMPUTE LIQUIDATION TESTS ==============

#[test]
fn liquidation_basic() {
    let result = liquidate(1000, 5000, 5000, "1", "1", "1", "0.1", "1", "10000");
    assert_eq!(result, (1000, 1100, 1100));
}

#[test]
fn liquidation_limited_by_collateral() {
    let result = liquidate(1000, 220, 5000, "1", "1", "1", "0.1", "1", "10000");
    assert_eq!(result, (200, 220, 220));
}

#[test]
fn liquidation_limited_by_reward_liquidity() {
    let result = liquidate(1000, 5000, 110, "1", "1", "1", "0.1", "1", "10000");
    assert_eq!(result, (100, 110, 110));
}

#[test]
fn liquidation_limited_by_close_factor() {
    let result = liquidate(1000, 5000, 5000, "1", "1", "1", "0.1", "0.5", "1000");
    assert_eq!(result, (500, 550, 550));
}

/// Prices and a uToken rate that do not divide evenly.
///
/// Covers:
/// - Repay rounds up
/// - Burn rounds down
/// - Reward derives from the rounded burn and rounds down
#[test]
fn liquidation_rounding() {
    let (repay, burn, reward) = liquidate(1000, 5000, 5000, "1", "1", "3", "0", "1", "10000");
    assert_eq!((repay, burn, reward), (1000, 333, 999));

    let (repay, burn, reward) = liquidate(1000, 100, 5000, "1", "1", "1", "0.5", "1", "10000");
    // ratio 100 / 1500 leaves 66.66... to repay
    assert_eq!((repay, burn, reward), (67, 100, 100));
}

/// Repay rounds up while burn rounds down, so at a uToken rate of 3 the repaid
/// value exceeds the value of the burned collateral by one. These amounts are
/// the expected output, not an error to correct.
#[test]
fn liquidation_rounding_repay_value_exceeds_burn_value() {
    let (repay, burn, reward) = liquidate(1000, 5000, 5000, "1", "1", "3", "0", "1", "10000");
    assert_eq!((repay, burn, reward), (1000, 333, 999));

    let repay_value = dec(&repay.to_string());
    let burn_value = dec(&burn.to_string()).mul(&dec("3")).unwrap();
    assert_eq!(burn_value, dec(&reward.to_string()));
    assert_eq!(repay_value.sub(&burn_value).unwrap(), Dec::one());
}

#[test]
fn liquidation_zero_guards() {
    let zero = (0, 0, 0);
    assert_eq!(liquidate(1000, 5000, 5000, "1", "1", "0", "0.1", "1", "10000"), zero);
    assert_eq!(liquidate(1000, 5000, 5000, "0", "1", "1", "0.1", "1", "10000"), zero);
    assert_eq!(liquidate(1000, 5000, 5000, "1", "0", "1", "0.1", "1", "10000"), zero);
    assert_eq!(liquidate(1000, 5000, 5000, "1", "1", "1", "0.1", "0", "10000"), zero);
    assert_eq!(liquidate(1000, 5000, 5000, "1", "1", "1", "0.1", "1", "0"), zero);
    assert_eq!(liquidate(0, 5000, 5000, "1", "1", "1", "0.1", "1", "10000"), zero);
    assert_eq!(liquidate(1000, 0, 5000, "1", "1", "1", "0.1", "1", "10000"), zero);
}

// ============== CLOSE FACTOR TESTS ==============

fn close_factor(borrowed: &str, threshold: &str) -> Dec<Api> {
    compute_close_factor(
        &dec(borrowed),
        &dec(threshold),
        &dec("500"),
        &dec("0.05"),
        &dec("0.4"),
    )
    .unwrap()
}

#[test]
fn close_factor_not_liquidatable() {
    assert_eq!(close_factor("800", "800"), Dec::zero());
    assert_eq!(close_factor("700", "800"), Dec::zero());
    assert_eq!(close_factor("700", "0"), Dec::zero());
}

#[test]
fn close_factor_small_positions_close_fully() {
    assert_eq!(close_factor("400", "300"), Dec::one());

    let unlimited = compute_close_factor(
        &dec("1000"),
        &dec("800"),
        &dec("500"),
        &dec("0.05"),
        &Dec::zero(),
    )
    .unwrap();
    assert_eq!(unlimited, Dec::one());
}

#[test]
fn close_factor_interpolates_and_clamps() {
    // x = 0.25, halfway between the minimum close factor and one
    assert_eq!(close_factor("1000", "800"), dec("0.64375"));
    assert_eq!(close_factor("2000", "800"), Dec::one());
}

// ============== INCENTIVE AND PARAMS TESTS ==============

#[test]
fn liquidation_incentive_direct_fee() {
    let reward_token = token("A", "0.4", "0.5");
    let params = LeverageParams::<Api>::default();

    assert_eq!(
        liquidation_incentive(&reward_token, false, &params).unwrap(),
        dec("0.1")
    );
    assert_eq!(
        liquidation_incentive(&reward_token, true, &params).unwrap(),
        dec("0.095")
    );
}

#[test]
fn liquidation_params_close_factor() {
    let reward_token = token("A", "0.4", "0.5");
    let params = LeverageParams::<Api>::default();

    let (incentive, close) =
        liquidation_params(&reward_token, &dec("1000"), &dec("800"), &params).unwrap();
    assert_eq!(incentive, dec("0.1"));
    assert_eq!(close, dec("0.64375"));

    let (_, close) =
        liquidation_params(&reward_token, &dec("1000"), &Dec::zero(), &params).unwrap();
    assert_eq!(close, Dec::one());

    let (_, close) = liquidation_params(&reward_token, &dec("400"), &dec("300"), &params).unwrap();
    assert_eq!(close, Dec::one());

    assert_eq!(
        liquidation_params(&reward_token, &dec("-1"), &dec("800"), &params).err(),
        Some(LeverageError::NegativeValue)
    );
}
