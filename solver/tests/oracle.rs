use leverage_solver::*;

pub mod setup;
use setup::*;

fn historic_token() -> Token<Api> {
    let mut t = token("T", "0.4", "0.5");
    t.historic_medians = 3;
    t
}

fn blacklisted_token() -> Token<Api> {
    let mut t = token("K", "0.4", "0.5");
    t.blacklist = true;
    t.enable_msg_supply = false;
    t.enable_msg_borrow = false;
    t
}

fn wei_token() -> Token<Api> {
    let mut t = token("W", "0.4", "0.5");
    t.exponent = 18;
    t
}

fn registry() -> MockRegistry {
    MockRegistry::new(vec![
        token("A", "0.5", "0.6"),
        token("B", "0.5", "0.6"),
        token("N", "0.5", "0.6"),
        historic_token(),
        blacklisted_token(),
        wei_token(),
    ])
    .with_rate("A", "1.2")
}

fn oracle() -> MockOracle {
    MockOracle::default()
        .with_spot("A", "1.5")
        .with_spot("B", "1")
        .with_spot("K", "1")
        .with_spot("T", "2")
        .with_historic("T", "1.8", 3)
        .with_spot("W", "4")
}

// ============== TOKEN PRICE TESTS ==============

/// Price mode selection for a token with historic medians.
///
/// Covers:
/// - Spot and Query use the spot price
/// - Historic uses the median of medians
/// - High and Low pick the larger and smaller of the two
#[test]
fn token_price_modes() {
    let (registry, oracle) = (registry(), oracle());
    let pricing = Pricing::new(&registry, &oracle);
    let price = |mode| pricing.token_price(&denom("T"), mode).unwrap().price;

    assert_eq!(price(PriceMode::Spot), dec("2"));
    assert_eq!(price(PriceMode::Query), dec("2"));
    assert_eq!(price(PriceMode::Historic), dec("1.8"));
    assert_eq!(price(PriceMode::High), dec("2"));
    assert_eq!(price(PriceMode::QueryHigh), dec("2"));
    assert_eq!(price(PriceMode::Low), dec("1.8"));
    assert_eq!(price(PriceMode::QueryLow), dec("1.8"));
}

/// Tokens without historic medians are priced at spot in every mode.
#[test]
fn token_price_without_historic_medians() {
    let (registry, oracle) = (registry(), oracle());
    let pricing = Pricing::new(&registry, &oracle);

    let high = pricing.token_price(&denom("A"), PriceMode::High).unwrap();
    assert_eq!(high.price, dec("1.5"));
    assert_eq!(high.exponent, 6);
    let historic = pricing.token_price(&denom("A"), PriceMode::Historic).unwrap();
    assert_eq!(historic.price, dec("1.5"));
}

#[test]
fn token_price_errors() {
    let registry = registry();
    let mut oracle = oracle().with_spot("N", "0");
    // one median short of what T requires
    oracle.historic = vec![(denom("T"), dec("1.8"), 2)];
    let pricing = Pricing::new(&registry, &oracle);

    assert_eq!(
        pricing.token_price(&denom("T"), PriceMode::High).err(),
        Some(LeverageError::PriceUnavailable)
    );
    assert!(pricing.token_price(&denom("T"), PriceMode::Spot).is_ok());
    assert_eq!(
        pricing.token_price(&denom("K"), PriceMode::Spot).err(),
        Some(LeverageError::Blacklisted)
    );
    assert_eq!(
        pricing.token_price(&denom("X"), PriceMode::Spot).err(),
        Some(LeverageError::NotRegistered)
    );
    assert_eq!(
        pricing.token_price(&denom("N"), PriceMode::Spot).err(),
        Some(LeverageError::PriceUnavailable)
    );
}

// ============== VALUATION TESTS ==============

#[test]
fn token_value_and_inverse() {
    let (registry, oracle) = (registry(), oracle());
    let pricing = Pricing::new(&registry, &oracle);

    let coin = Coin::new(denom("A"), big(2_000_000));
    assert_eq!(pricing.token_value(&coin, PriceMode::Spot).unwrap(), dec("3"));

    let back = pricing
        .token_with_value(&denom("A"), &dec("3"), PriceMode::Spot)
        .unwrap();
    assert_eq!(back.amount, big(2_000_000));
}

#[test]
fn price_ratio_accounts_for_exponents() {
    let (registry, oracle) = (registry(), oracle());
    let pricing = Pricing::new(&registry, &oracle);

    let ratio = pricing
        .price_ratio(&denom("A"), &denom("W"), PriceMode::Spot)
        .unwrap();
    assert_eq!(ratio, dec("375000000000"));
}

/// Collateral valuation converts uTokens and skips what cannot be priced.
#[test]
fn collateral_values_skip_unpriceable() {
    let (registry, oracle) = (registry(), oracle());
    let pricing = Pricing::new(&registry, &oracle);

    let collateral = vec![
        Coin::new(denom("u/A"), big(1_000_000)),
        Coin::new(denom("u/X"), big(1_000_000)),
        Coin::new(denom("u/K"), big(1_000_000)),
        Coin::new(denom("u/N"), big(1_000_000)),
    ];
    let values = pricing.collateral_values(&collateral).unwrap();

    assert_eq!(values.len(), 1);
    assert_eq!(values[0].denom, denom("A"));
    assert_eq!(values[0].amount, dec("1.8"));

    let not_utoken = vec![Coin::new(denom("A"), big(1))];
    assert_eq!(
        pricing.collateral_values(&not_utoken).err(),
        Some(LeverageError::NotUToken)
    );
}

/// Borrowed valuation skips unregistered tokens but fails on missing prices.
#[test]
fn borrowed_values_require_prices() {
    let (registry, oracle) = (registry(), oracle());
    let pricing = Pricing::new(&registry, &oracle);

    let borrowed = vec![
        Coin::new(denom("A"), big(2_000_000)),
        Coin::new(denom("X"), big(2_000_000)),
    ];
    let values = pricing.borrowed_values(&borrowed).unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].amount, dec("3"));

    let unpriced = vec![Coin::new(denom("N"), big(1))];
    assert_eq!(
        pricing.borrowed_values(&unpriced).err(),
        Some(LeverageError::PriceUnavailable)
    );
}

/// Position built from raw holdings through the registry and the oracle.
#[test]
fn account_position_from_holdings() {
    let registry = MockRegistry::new(vec![token("A", "0.5", "0.6"), token("B", "0.5", "0.6")]);
    let oracle = MockOracle::default()
        .with_spot("A", "1")
        .with_spot("B", "1");
    let pricing = Pricing::new(&registry, &oracle);
    let params = LeverageParams::default();

    let position = pricing
        .account_position(
            &[Coin::new(denom("u/A"), big(100_000_000))],
            &[Coin::new(denom("B"), big(20_000_000))],
            false,
            &params,
        )
        .unwrap();

    assert_eq!(*position.collateral_value(), dec("100"));
    assert_eq!(*position.borrowed_value(), dec("20"));
    assert_eq!(position.limit().unwrap(), dec("50"));
    assert_eq!(position.max_borrow(&denom("B")).unwrap(), dec("30"));

    let mut bad_params = LeverageParams::default();
    bad_params.minimum_borrow_factor = dec("1");
    assert_eq!(
        pricing
            .account_position(&[], &[], false, &bad_params)
            .err()
            .map(|err| err.message()),
        Some(ERROR_INVALID_MINIMUM_BORROW_FACTOR)
    );
}
