use alloc::vec::Vec;
use core::marker::PhantomData;

use common_errors::LeverageError;
use common_math::Dec;
use common_structs::{Coin, DecCoin, Denom, LeverageParams, PriceMode};
use log::{debug, trace};
use multiversx_sc::api::ManagedTypeApi;

use crate::positions::{new_position, AccountPosition};
use crate::registry::TokenRegistry;
use crate::weighted::DenomDisplay;

/// Price source owned by the host.
pub trait PriceOracle<M: ManagedTypeApi> {
    /// Latest spot price of a symbol in USD per whole token.
    fn price(&self, symbol: &Denom<M>, accept_expired: bool) -> Result<Dec<M>, LeverageError>;

    /// Median of the last `num_medians` historic medians, with the number of
    /// medians actually available.
    fn avg_price(
        &self,
        symbol: &Denom<M>,
        num_medians: u32,
        accept_expired: bool,
    ) -> Result<(Dec<M>, u32), LeverageError>;
}

/// USD price of one whole token and the token's exponent.
#[derive(Clone)]
pub struct TokenPrice<M: ManagedTypeApi> {
    pub price: Dec<M>,
    pub exponent: u32,
}

/// Values token holdings in USD, combining the registry and the oracle.
pub struct Pricing<'a, M, R, O>
where
    M: ManagedTypeApi,
    R: TokenRegistry<M>,
    O: PriceOracle<M>,
{
    registry: &'a R,
    oracle: &'a O,
    _api: PhantomData<M>,
}

impl<'a, M, R, O> Pricing<'a, M, R, O>
where
    M: ManagedTypeApi,
    R: TokenRegistry<M>,
    O: PriceOracle<M>,
{
    pub fn new(registry: &'a R, oracle: &'a O) -> Self {
        Pricing {
            registry,
            oracle,
            _api: PhantomData,
        }
    }

    /// Price of a registered base denom under a price mode.
    ///
    /// Tokens without historic medians are always priced at spot. High and Low
    /// modes pick the larger or smaller of spot and historic.
    ///
    /// # Errors
    /// - `Blacklisted` for blacklisted tokens
    /// - `PriceUnavailable` when fewer medians than required exist or the price is not positive
    pub fn token_price(
        &self,
        base_denom: &Denom<M>,
        mode: PriceMode,
    ) -> Result<TokenPrice<M>, LeverageError> {
        let token = self.registry.get_token(base_denom)?;
        if token.is_blacklisted() {
            return Err(LeverageError::Blacklisted);
        }

        let mode = if token.exempt_from_historic_pricing() {
            mode.to_spot()
        } else {
            mode
        };
        let accept_expired = mode.accepts_expired();

        let spot = if mode.needs_spot() {
            Some(self.oracle.price(&token.symbol_denom, accept_expired)?)
        } else {
            None
        };
        let historic = if mode.needs_historic() {
            let (median, count) = self.oracle.avg_price(
                &token.symbol_denom,
                token.historic_medians,
                accept_expired,
            )?;
            if count < token.historic_medians {
                return Err(LeverageError::PriceUnavailable);
            }
            Some(median)
        } else {
            None
        };

        let price = match (mode, spot, historic) {
            (PriceMode::Spot | PriceMode::Query, Some(spot), _) => spot,
            (PriceMode::Historic, _, Some(historic)) => historic,
            (PriceMode::High | PriceMode::QueryHigh, Some(spot), Some(historic)) => {
                spot.max_of(&historic)
            }
            (PriceMode::Low | PriceMode::QueryLow, Some(spot), Some(historic)) => {
                spot.min_of(&historic)
            }
            _ => return Err(LeverageError::PriceUnavailable),
        };

        if !price.is_positive() {
            return Err(LeverageError::PriceUnavailable);
        }

        trace!("price of {} ({:?}): {}", DenomDisplay(base_denom), mode, price);
        Ok(TokenPrice {
            price,
            exponent: token.exponent,
        })
    }

    /// USD value of a base token amount.
    pub fn token_value(&self, coin: &Coin<M>, mode: PriceMode) -> Result<Dec<M>, LeverageError> {
        let price = self.token_price(&coin.denom, mode)?;
        price
            .price
            .mul(&Dec::from_big_uint(&coin.amount)?)?
            .exponent(-(price.exponent as i32))
    }

    /// Base token amount worth `value` USD, rounded down.
    pub fn token_with_value(
        &self,
        denom: &Denom<M>,
        value: &Dec<M>,
        mode: PriceMode,
    ) -> Result<Coin<M>, LeverageError> {
        let price = self.token_price(denom, mode)?;
        let amount = value
            .exponent(price.exponent as i32)?
            .quo(&price.price)?
            .truncate_uint()?;
        Ok(Coin::new(denom.clone(), amount))
    }

    /// Smallest units of `to_denom` worth one smallest unit of `from_denom`.
    pub fn price_ratio(
        &self,
        from_denom: &Denom<M>,
        to_denom: &Denom<M>,
        mode: PriceMode,
    ) -> Result<Dec<M>, LeverageError> {
        let from = self.token_price(from_denom, mode)?;
        let to = self.token_price(to_denom, mode)?;
        let power_difference = to.exponent as i32 - from.exponent as i32;
        from.price.exponent(power_difference)?.quo(&to.price)
    }

    /// USD values of collateral held as uTokens, priced low.
    ///
    /// Coins of unregistered or blacklisted tokens, and coins without a price,
    /// contribute nothing. Other failures are returned.
    pub fn collateral_values(
        &self,
        collateral: &[Coin<M>],
    ) -> Result<Vec<DecCoin<M>>, LeverageError> {
        let mut values = Vec::with_capacity(collateral.len());
        for utoken in collateral {
            let token = match self.registry.to_token(utoken) {
                Ok(token) => token,
                Err(LeverageError::NotRegistered) => continue,
                Err(err) => return Err(err),
            };
            match self.token_value(&token, PriceMode::Low) {
                Ok(value) => values.push(DecCoin::new(token.denom, value)),
                Err(err) if err.is_oracle_error() || err == LeverageError::NotRegistered => {
                    debug!("collateral {} skipped: {}", DenomDisplay(&token.denom), err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(values)
    }

    /// USD values of borrowed base tokens, priced high. Unregistered tokens are
    /// skipped, a missing price is an error.
    pub fn borrowed_values(
        &self,
        borrowed: &[Coin<M>],
    ) -> Result<Vec<DecCoin<M>>, LeverageError> {
        let mut values = Vec::with_capacity(borrowed.len());
        for coin in borrowed {
            match self.token_value(coin, PriceMode::High) {
                Ok(value) => values.push(DecCoin::new(coin.denom.clone(), value)),
                Err(LeverageError::NotRegistered) => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(values)
    }

    /// Position of an account from its uToken collateral and borrowed base tokens.
    pub fn account_position(
        &self,
        collateral: &[Coin<M>],
        borrowed: &[Coin<M>],
        is_for_liquidation: bool,
        params: &LeverageParams<M>,
    ) -> Result<AccountPosition<M>, LeverageError> {
        params.validate()?;
        let collateral_values = self.collateral_values(collateral)?;
        let borrowed_values = self.borrowed_values(borrowed)?;
        new_position(
            &self.registry.all_registered(),
            &self.registry.special_pairs(),
            &collateral_values,
            &borrowed_values,
            is_for_liquidation,
            &params.minimum_borrow_factor,
        )
    }
}
