#![allow(dead_code)]

use common_constants::UTOKEN_PREFIX;
use leverage_solver::*;
use multiversx_sc::types::{BigUint, ManagedBuffer};
use multiversx_sc_scenario::api::StaticApi;

pub type Api = StaticApi;

pub fn denom(name: &str) -> Denom<Api> {
    ManagedBuffer::from(name)
}

pub fn dec(value: &str) -> Dec<Api> {
    Dec::parse(value).unwrap()
}

pub fn big(value: u64) -> BigUint<Api> {
    BigUint::from(value)
}

pub fn coin(name: &str, value: &str) -> DecCoin<Api> {
    DecCoin::new(denom(name), dec(value))
}

pub fn coins(values: &[(&str, &str)]) -> Vec<DecCoin<Api>> {
    values.iter().map(|(name, value)| coin(name, value)).collect()
}

pub fn minimum_borrow_factor() -> Dec<Api> {
    dec("0.5")
}

/// Token with a 6 decimal exponent, spot pricing and both messages enabled.
pub fn token(name: &str, collateral_weight: &str, liquidation_threshold: &str) -> Token<Api> {
    Token {
        base_denom: denom(name),
        symbol_denom: denom(&name.to_uppercase()),
        exponent: 6,
        collateral_weight: dec(collateral_weight),
        liquidation_threshold: dec(liquidation_threshold),
        liquidation_incentive: dec("0.1"),
        historic_medians: 0,
        enable_msg_supply: true,
        enable_msg_borrow: true,
        blacklist: false,
    }
}

pub fn pair(
    collateral: &str,
    borrow: &str,
    collateral_weight: &str,
    liquidation_threshold: &str,
) -> SpecialAssetPair<Api> {
    SpecialAssetPair {
        collateral: denom(collateral),
        borrow: denom(borrow),
        collateral_weight: dec(collateral_weight),
        liquidation_threshold: dec(liquidation_threshold),
    }
}

pub fn build(
    tokens: &[Token<Api>],
    pairs: &[SpecialAssetPair<Api>],
    collateral: &[(&str, &str)],
    borrowed: &[(&str, &str)],
    is_for_liquidation: bool,
) -> AccountPosition<Api> {
    new_position(
        tokens,
        pairs,
        &coins(collateral),
        &coins(borrowed),
        is_for_liquidation,
        &minimum_borrow_factor(),
    )
    .unwrap()
}

/// Tokens A, B, C, D weighted 0.4 / 0.3 / 0.2 / 0.1, with special pairs A<->B at
/// 0.5 and A<->C at 0.4.
pub fn scenario_a_tokens() -> Vec<Token<Api>> {
    vec![
        token("A", "0.4", "0.5"),
        token("B", "0.3", "0.5"),
        token("C", "0.2", "0.5"),
        token("D", "0.1", "0.5"),
    ]
}

pub fn scenario_a_pairs() -> Vec<SpecialAssetPair<Api>> {
    vec![
        pair("A", "B", "0.5", "0.5"),
        pair("B", "A", "0.5", "0.5"),
        pair("A", "C", "0.4", "0.4"),
        pair("C", "A", "0.4", "0.4"),
    ]
}

/// Collateral {A:100, D:300}, borrows {B:20, C:20, D:20}.
pub fn scenario_a() -> AccountPosition<Api> {
    build(
        &scenario_a_tokens(),
        &scenario_a_pairs(),
        &[("A", "100"), ("D", "300")],
        &[("B", "20"), ("C", "20"), ("D", "20")],
        false,
    )
}

/// Sum of every collateral and borrow value held in the position's containers.
pub fn container_totals(position: &AccountPosition<Api>) -> (Dec<Api>, Dec<Api>) {
    let collateral = position
        .special_pairs()
        .total_collateral()
        .unwrap()
        .add(&position.normal_pairs().total_collateral().unwrap())
        .unwrap()
        .add(&position.unpaired_collateral().total().unwrap())
        .unwrap();
    let borrowed = position
        .special_pairs()
        .total_borrowed()
        .unwrap()
        .add(&position.normal_pairs().total_borrowed().unwrap())
        .unwrap()
        .add(&position.unpaired_borrows().total().unwrap())
        .unwrap();
    (collateral, borrowed)
}

pub fn assert_sorted(position: &AccountPosition<Api>) {
    assert!(position.special_pairs().is_sorted());
    assert!(position.normal_pairs().is_sorted());
    assert!(position.unpaired_collateral().is_sorted());
    assert!(position.unpaired_borrows().is_sorted());
}

/// In-memory token registry with per-token uToken exchange rates.
pub struct MockRegistry {
    pub tokens: Vec<Token<Api>>,
    pub pairs: Vec<SpecialAssetPair<Api>>,
    pub rates: Vec<(Denom<Api>, Dec<Api>)>,
}

impl MockRegistry {
    pub fn new(tokens: Vec<Token<Api>>) -> Self {
        MockRegistry {
            tokens,
            pairs: Vec::new(),
            rates: Vec::new(),
        }
    }

    pub fn with_rate(mut self, base: &str, rate: &str) -> Self {
        self.rates.push((denom(base), dec(rate)));
        self
    }

    pub fn with_pair(mut self, special: SpecialAssetPair<Api>) -> Self {
        self.pairs.push(special);
        self
    }

    fn rate(&self, base: &Denom<Api>) -> Dec<Api> {
        self.rates
            .iter()
            .find(|(d, _)| d == base)
            .map(|(_, rate)| rate.clone())
            .unwrap_or_else(Dec::one)
    }
}

impl TokenRegistry<Api> for MockRegistry {
    fn get_token(&self, base_denom: &Denom<Api>) -> Result<Token<Api>, LeverageError> {
        self.tokens
            .iter()
            .find(|t| t.base_denom == *base_denom)
            .cloned()
            .ok_or(LeverageError::NotRegistered)
    }

    fn to_token(&self, utoken: &Coin<Api>) -> Result<Coin<Api>, LeverageError> {
        if !is_utoken_denom(&utoken.denom) {
            return Err(LeverageError::NotUToken);
        }
        let bytes = utoken.denom.to_boxed_bytes();
        let base = ManagedBuffer::from(&bytes.as_slice()[UTOKEN_PREFIX.len()..]);
        self.get_token(&base)?;
        let amount = Dec::from_big_uint(&utoken.amount)?
            .mul(&self.rate(&base))?
            .truncate_uint()?;
        Ok(Coin::new(base, amount))
    }

    fn all_registered(&self) -> Vec<Token<Api>> {
        self.tokens.clone()
    }

    fn special_pairs(&self) -> Vec<SpecialAssetPair<Api>> {
        self.pairs.clone()
    }
}

/// In-memory oracle keyed by symbol denom.
#[derive(Default)]
pub struct MockOracle {
    pub spot: Vec<(Denom<Api>, Dec<Api>)>,
    pub historic: Vec<(Denom<Api>, Dec<Api>, u32)>,
}

impl MockOracle {
    pub fn with_spot(mut self, symbol: &str, price: &str) -> Self {
        self.spot.push((denom(symbol), dec(price)));
        self
    }

    pub fn with_historic(mut self, symbol: &str, price: &str, medians: u32) -> Self {
        self.historic.push((denom(symbol), dec(price), medians));
        self
    }
}

impl PriceOracle<Api> for MockOracle {
    fn price(&self, symbol: &Denom<Api>, _accept_expired: bool) -> Result<Dec<Api>, LeverageError> {
        self.spot
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, price)| price.clone())
            .ok_or(LeverageError::PriceUnavailable)
    }

    fn avg_price(
        &self,
        symbol: &Denom<Api>,
        num_medians: u32,
        _accept_expired: bool,
    ) -> Result<(Dec<Api>, u32), LeverageError> {
        self.historic
            .iter()
            .find(|(s, _, _)| s == symbol)
            .map(|(_, price, available)| (price.clone(), (*available).min(num_medians)))
            .ok_or(LeverageError::PriceUnavailable)
    }
}
