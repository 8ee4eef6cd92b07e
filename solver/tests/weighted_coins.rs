use leverage_solver::*;

pub mod setup;
use setup::*;

fn weighted(name: &str, value: &str, weight: &str) -> WeightedDecCoin<Api> {
    WeightedDecCoin::new(denom(name), dec(value), dec(weight))
}

fn normal(
    collateral: (&str, &str, &str),
    borrow: (&str, &str, &str),
) -> WeightedNormalPair<Api> {
    WeightedNormalPair {
        collateral: weighted(collateral.0, collateral.1, collateral.2),
        borrow: weighted(borrow.0, borrow.1, borrow.2),
    }
}

fn denoms(coins: &WeightedDecCoins<Api>) -> Vec<Denom<Api>> {
    coins.iter().map(|c| c.denom.clone()).collect()
}

// ============== WEIGHTED COINS TESTS ==============

/// Coins sort by weight descending, ties broken by denom ascending.
#[test]
fn weighted_coins_add_merges_and_sorts() {
    let mut coins = WeightedDecCoins::new();
    coins.add(weighted("B", "10", "0.3")).unwrap();
    coins.add(weighted("C", "10", "0.5")).unwrap();
    coins.add(weighted("A", "10", "0.3")).unwrap();
    coins.add(weighted("B", "5", "0.3")).unwrap();

    assert_eq!(denoms(&coins), vec![denom("C"), denom("A"), denom("B")]);
    assert_eq!(coins.amount_of(&denom("B")), dec("15"));
    assert_eq!(coins.total().unwrap(), dec("35"));
    assert!(coins.is_sorted());
}

#[test]
fn weighted_coins_add_order_independent() {
    let inputs = [
        weighted("A", "1", "0.1"),
        weighted("B", "2", "0.2"),
        weighted("A", "3", "0.1"),
    ];

    let mut forward = WeightedDecCoins::new();
    for coin in inputs.iter().cloned() {
        forward.add(coin).unwrap();
    }
    let mut backward = WeightedDecCoins::new();
    for coin in inputs.iter().rev().cloned() {
        backward.add(coin).unwrap();
    }

    assert_eq!(denoms(&forward), denoms(&backward));
    assert_eq!(forward.amount_of(&denom("A")), backward.amount_of(&denom("A")));
}

/// A zero coin only registers in an empty container.
#[test]
fn weighted_coins_zero_insertion() {
    let mut coins = WeightedDecCoins::new();
    coins.add(weighted("A", "0", "0.3")).unwrap();
    assert_eq!(coins.len(), 1);

    coins.add(weighted("B", "0", "0.5")).unwrap();
    assert_eq!(coins.len(), 1);

    coins.add(weighted("A", "4", "0.3")).unwrap();
    assert_eq!(coins.amount_of(&denom("A")), dec("4"));
}

/// Subtraction keeps slots in place, even at zero.
#[test]
fn weighted_coins_sub_keeps_slots() {
    let mut coins = WeightedDecCoins::new();
    coins.add(weighted("A", "10", "0.5")).unwrap();
    coins.add(weighted("B", "10", "0.3")).unwrap();

    coins.sub(&denom("A"), &dec("10")).unwrap();
    assert_eq!(coins.len(), 2);
    assert_eq!(coins.get(0).unwrap().denom, denom("A"));
    assert!(coins.get(0).unwrap().value.is_zero());

    assert_eq!(
        coins.sub(&denom("C"), &dec("1")).err(),
        Some(LeverageError::DenomNotFound)
    );
    assert_eq!(
        coins.sub(&denom("B"), &dec("10.000000000000000001")).err(),
        Some(LeverageError::NegativeValue)
    );
    assert_eq!(coins.amount_of(&denom("B")), dec("10"));

    coins.prune();
    assert_eq!(denoms(&coins), vec![denom("B")]);
}

// ============== PAIR CONTAINER TESTS ==============

/// Special pairs sort by weight, then collateral, then borrow denom, and keep
/// empty slots.
#[test]
fn special_pairs_order_and_empty_slots() {
    let mut pairs = WeightedSpecialPairs::new();
    pairs
        .add(WeightedSpecialPair::empty(denom("B"), denom("A"), dec("0.5")))
        .unwrap();
    pairs
        .add(WeightedSpecialPair::empty(denom("A"), denom("C"), dec("0.4")))
        .unwrap();
    pairs
        .add(WeightedSpecialPair::empty(denom("A"), denom("B"), dec("0.5")))
        .unwrap();

    let order: Vec<(Denom<Api>, Denom<Api>)> = pairs
        .iter()
        .map(|p| (p.collateral.denom.clone(), p.borrow.denom.clone()))
        .collect();
    assert_eq!(
        order,
        vec![
            (denom("A"), denom("B")),
            (denom("B"), denom("A")),
            (denom("A"), denom("C")),
        ]
    );
    assert_eq!(pairs.total_collateral().unwrap(), Dec::zero());
    assert!(pairs.is_sorted());
}

/// Normal pairs sort by collateral weight, then borrow weight, then denoms,
/// and combine pairs of the same denoms.
#[test]
fn normal_pairs_order_and_combine() {
    let mut pairs = WeightedNormalPairs::new();
    pairs
        .add(normal(("D", "10", "0.1"), ("B", "1", "0.3")))
        .unwrap();
    pairs
        .add(normal(("A", "10", "0.4"), ("D", "4", "0.1")))
        .unwrap();
    pairs
        .add(normal(("A", "5", "0.4"), ("B", "2", "0.3")))
        .unwrap();
    pairs
        .add(normal(("A", "5", "0.4"), ("B", "1", "0.3")))
        .unwrap();

    assert_eq!(pairs.len(), 3);
    let first = pairs.get(0).unwrap();
    assert_eq!(first.collateral.denom, denom("A"));
    assert_eq!(first.borrow.denom, denom("B"));
    assert_eq!(first.collateral.value, dec("10"));
    assert_eq!(first.borrow.value, dec("3"));
    assert_eq!(pairs.get(2).unwrap().collateral.denom, denom("D"));

    assert_eq!(pairs.collateral_of(&denom("A")).unwrap(), dec("20"));
    assert_eq!(pairs.borrowed_of(&denom("B")).unwrap(), dec("4"));
    assert!(pairs.is_sorted());
}
