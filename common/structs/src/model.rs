#![no_std]

use common_constants::{
    DEFAULT_COMPLETE_LIQUIDATION_THRESHOLD, DEFAULT_DIRECT_LIQUIDATION_FEE,
    DEFAULT_MINIMUM_BORROW_FACTOR, DEFAULT_MINIMUM_CLOSE_FACTOR, DEFAULT_SMALL_LIQUIDATION_SIZE,
    UTOKEN_PREFIX,
};
use common_errors::*;
use common_math::Dec;
use multiversx_sc::api::ManagedTypeApi;
use multiversx_sc::types::{BigUint, ManagedBuffer};

pub type Denom<M> = ManagedBuffer<M>;

/// Returns true if the denom carries the uToken prefix.
pub fn is_utoken_denom<M: ManagedTypeApi>(denom: &Denom<M>) -> bool {
    denom.to_boxed_bytes().as_slice().starts_with(UTOKEN_PREFIX)
}

/// Registered token settings, keyed by `base_denom`.
#[derive(Clone)]
pub struct Token<M: ManagedTypeApi> {
    pub base_denom: Denom<M>,
    pub symbol_denom: Denom<M>,
    pub exponent: u32,
    pub collateral_weight: Dec<M>,
    pub liquidation_threshold: Dec<M>,
    pub liquidation_incentive: Dec<M>,
    /// Number of historic medians averaged by the oracle; zero disables historic pricing
    pub historic_medians: u32,
    pub enable_msg_supply: bool,
    pub enable_msg_borrow: bool,
    pub blacklist: bool,
}

impl<M: ManagedTypeApi> Token<M> {
    pub fn can_supply(&self) -> bool {
        self.enable_msg_supply && !self.blacklist
    }

    pub fn can_borrow(&self) -> bool {
        self.enable_msg_borrow && !self.blacklist
    }

    pub fn is_blacklisted(&self) -> bool {
        self.blacklist
    }

    pub fn exempt_from_historic_pricing(&self) -> bool {
        self.historic_medians == 0
    }

    /// Collateral weight, or liquidation threshold when computing liquidation limits.
    pub fn weight(&self, is_for_liquidation: bool) -> &Dec<M> {
        if is_for_liquidation {
            &self.liquidation_threshold
        } else {
            &self.collateral_weight
        }
    }

    pub fn validate(&self) -> Result<(), LeverageError> {
        if self.base_denom.is_empty() {
            return Err(LeverageError::InvalidToken(ERROR_INVALID_BASE_DENOM));
        }
        if is_utoken_denom(&self.base_denom) {
            return Err(LeverageError::InvalidToken(ERROR_BASE_DENOM_IS_UTOKEN));
        }
        if self.symbol_denom.is_empty() {
            return Err(LeverageError::InvalidToken(ERROR_INVALID_SYMBOL_DENOM));
        }

        let one = Dec::one();
        if self.collateral_weight.is_negative() || self.collateral_weight >= one {
            return Err(LeverageError::InvalidToken(ERROR_INVALID_COLLATERAL_WEIGHT));
        }
        if self.liquidation_threshold < self.collateral_weight || self.liquidation_threshold >= one
        {
            return Err(LeverageError::InvalidToken(
                ERROR_INVALID_LIQUIDATION_THRESHOLD,
            ));
        }
        if self.liquidation_incentive.is_negative() || self.liquidation_incentive > one {
            return Err(LeverageError::InvalidToken(
                ERROR_INVALID_LIQUIDATION_INCENTIVE,
            ));
        }

        // blacklisted tokens may not be supplied or borrowed
        if self.blacklist && (self.enable_msg_supply || self.enable_msg_borrow) {
            return Err(LeverageError::InvalidToken(ERROR_BLACKLISTED_TOKEN_ENABLED));
        }

        Ok(())
    }
}

/// Preferential weights granted when `collateral` backs `borrow`.
#[derive(Clone)]
pub struct SpecialAssetPair<M: ManagedTypeApi> {
    pub collateral: Denom<M>,
    pub borrow: Denom<M>,
    pub collateral_weight: Dec<M>,
    pub liquidation_threshold: Dec<M>,
}

impl<M: ManagedTypeApi> SpecialAssetPair<M> {
    pub fn weight(&self, is_for_liquidation: bool) -> &Dec<M> {
        if is_for_liquidation {
            &self.liquidation_threshold
        } else {
            &self.collateral_weight
        }
    }

    pub fn validate(&self) -> Result<(), LeverageError> {
        if self.collateral.is_empty() || self.borrow.is_empty() {
            return Err(LeverageError::InvalidPair(ERROR_INVALID_PAIR_DENOM));
        }
        if self.collateral == self.borrow {
            return Err(LeverageError::InvalidPair(ERROR_PAIR_SAME_DENOM));
        }

        let one = Dec::one();
        if self.collateral_weight.is_negative() || self.collateral_weight >= one {
            return Err(LeverageError::InvalidPair(ERROR_INVALID_PAIR_WEIGHT));
        }
        if self.liquidation_threshold < self.collateral_weight || self.liquidation_threshold >= one
        {
            return Err(LeverageError::InvalidPair(
                ERROR_INVALID_PAIR_LIQUIDATION_THRESHOLD,
            ));
        }

        Ok(())
    }
}

/// Integer token amount in smallest units.
#[derive(Clone)]
pub struct Coin<M: ManagedTypeApi> {
    pub denom: Denom<M>,
    pub amount: BigUint<M>,
}

impl<M: ManagedTypeApi> Coin<M> {
    pub fn new(denom: Denom<M>, amount: BigUint<M>) -> Self {
        Coin { denom, amount }
    }
}

/// Decimal amount, used for USD values keyed by base denom.
#[derive(Clone)]
pub struct DecCoin<M: ManagedTypeApi> {
    pub denom: Denom<M>,
    pub amount: Dec<M>,
}

impl<M: ManagedTypeApi> DecCoin<M> {
    pub fn new(denom: Denom<M>, amount: Dec<M>) -> Self {
        DecCoin { denom, amount }
    }

    pub fn zero(denom: Denom<M>) -> Self {
        DecCoin {
            denom,
            amount: Dec::zero(),
        }
    }
}

/// Oracle price selection.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PriceMode {
    /// Latest spot price
    Spot,
    /// Median of historic medians
    Historic,
    /// Higher of spot and historic, used for borrowed value
    High,
    /// Lower of spot and historic, used for collateral value
    Low,
    /// Spot price, accepting expired prices
    Query,
    /// High, accepting expired prices
    QueryHigh,
    /// Low, accepting expired prices
    QueryLow,
}

impl PriceMode {
    pub fn accepts_expired(&self) -> bool {
        matches!(
            self,
            PriceMode::Query | PriceMode::QueryHigh | PriceMode::QueryLow
        )
    }

    /// Mode used for tokens without historic pricing.
    pub fn to_spot(self) -> Self {
        if self.accepts_expired() {
            PriceMode::Query
        } else {
            PriceMode::Spot
        }
    }

    pub fn needs_spot(&self) -> bool {
        !matches!(self, PriceMode::Historic)
    }

    pub fn needs_historic(&self) -> bool {
        !matches!(self, PriceMode::Spot | PriceMode::Query)
    }
}

/// Module parameters consumed by the solver and the liquidation math.
#[derive(Clone)]
pub struct LeverageParams<M: ManagedTypeApi> {
    pub minimum_borrow_factor: Dec<M>,
    pub small_liquidation_size: Dec<M>,
    pub minimum_close_factor: Dec<M>,
    pub complete_liquidation_threshold: Dec<M>,
    pub direct_liquidation_fee: Dec<M>,
}

impl<M: ManagedTypeApi> Default for LeverageParams<M> {
    fn default() -> Self {
        LeverageParams {
            minimum_borrow_factor: Dec::from_raw_u128(DEFAULT_MINIMUM_BORROW_FACTOR),
            small_liquidation_size: Dec::from_raw_u128(DEFAULT_SMALL_LIQUIDATION_SIZE),
            minimum_close_factor: Dec::from_raw_u128(DEFAULT_MINIMUM_CLOSE_FACTOR),
            complete_liquidation_threshold: Dec::from_raw_u128(
                DEFAULT_COMPLETE_LIQUIDATION_THRESHOLD,
            ),
            direct_liquidation_fee: Dec::from_raw_u128(DEFAULT_DIRECT_LIQUIDATION_FEE),
        }
    }
}

impl<M: ManagedTypeApi> LeverageParams<M> {
    pub fn validate(&self) -> Result<(), LeverageError> {
        let one = Dec::one();
        if self.minimum_borrow_factor.is_negative() || self.minimum_borrow_factor >= one {
            return Err(LeverageError::InvalidParams(
                ERROR_INVALID_MINIMUM_BORROW_FACTOR,
            ));
        }
        if self.small_liquidation_size.is_negative() {
            return Err(LeverageError::InvalidParams(
                ERROR_INVALID_SMALL_LIQUIDATION_SIZE,
            ));
        }
        if self.minimum_close_factor.is_negative()
            || self.minimum_close_factor > one
            || self.complete_liquidation_threshold.is_negative()
            || self.complete_liquidation_threshold > one
        {
            return Err(LeverageError::InvalidParams(
                ERROR_INVALID_CLOSE_FACTOR_PARAMS,
            ));
        }
        if self.direct_liquidation_fee.is_negative() || self.direct_liquidation_fee > one {
            return Err(LeverageError::InvalidParams(ERROR_INVALID_LIQUIDATION_FEE));
        }
        Ok(())
    }
}
