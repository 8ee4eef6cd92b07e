#![no_std]

use core::fmt;

pub static ERROR_INVALID_BASE_DENOM: &[u8] = b"Invalid token base denom.";

pub static ERROR_INVALID_SYMBOL_DENOM: &[u8] = b"Invalid token symbol denom.";

pub static ERROR_BASE_DENOM_IS_UTOKEN: &[u8] = b"Token base denom can not be a uToken.";

pub static ERROR_INVALID_COLLATERAL_WEIGHT: &[u8] =
    b"Invalid collateral weight, has to be positive and less than one.";

pub static ERROR_INVALID_LIQUIDATION_THRESHOLD: &[u8] =
    b"Invalid liquidation threshold has to be higher than the collateral weight and less than one.";

pub static ERROR_INVALID_LIQUIDATION_INCENTIVE: &[u8] =
    b"Invalid liquidation incentive, has to be between zero and one.";

pub static ERROR_BLACKLISTED_TOKEN_ENABLED: &[u8] =
    b"Blacklisted token can not have supply or borrow enabled.";

pub static ERROR_DUPLICATE_TOKEN: &[u8] = b"Token already registered.";

pub static ERROR_INVALID_PAIR_DENOM: &[u8] = b"Invalid special pair denom.";

pub static ERROR_PAIR_SAME_DENOM: &[u8] =
    b"Special pair collateral and borrow can not be the same denom.";

pub static ERROR_INVALID_PAIR_WEIGHT: &[u8] =
    b"Invalid special pair weight, has to be positive and less than one.";

pub static ERROR_INVALID_PAIR_LIQUIDATION_THRESHOLD: &[u8] =
    b"Invalid special pair liquidation threshold has to be higher than its collateral weight.";

pub static ERROR_PAIR_UNKNOWN_DENOM: &[u8] = b"Special pair references an unregistered token.";

pub static ERROR_INVALID_MINIMUM_BORROW_FACTOR: &[u8] =
    b"Invalid minimum borrow factor, has to be positive and less than one.";

pub static ERROR_INVALID_CLOSE_FACTOR_PARAMS: &[u8] =
    b"Invalid close factor parameters, have to be between zero and one.";

pub static ERROR_INVALID_LIQUIDATION_FEE: &[u8] =
    b"Invalid direct liquidation fee, has to be between zero and one.";

pub static ERROR_INVALID_SMALL_LIQUIDATION_SIZE: &[u8] = b"Small liquidation size can not be negative.";

pub static ERROR_PRICE_UNAVAILABLE: &[u8] = b"Oracle price unavailable.";

pub static ERROR_NOT_REGISTERED: &[u8] = b"Token not registered.";

pub static ERROR_BLACKLISTED: &[u8] = b"Token is blacklisted.";

pub static ERROR_NOT_UTOKEN: &[u8] = b"Denom is not a uToken.";

pub static ERROR_OVERFLOW: &[u8] = b"Decimal overflow.";

pub static ERROR_DIVISION_BY_ZERO: &[u8] = b"Division by zero.";

pub static ERROR_NEGATIVE_VALUE: &[u8] = b"Value can not be negative.";

pub static ERROR_INVALID_DECIMAL: &[u8] = b"Invalid decimal string.";

pub static ERROR_DENOM_NOT_FOUND: &[u8] = b"Denom not found.";

pub static ERROR_POSITION_OVER_LIMIT: &[u8] = b"Borrow position over limit following rebalance.";

/// Failure returned by every fallible solver operation.
///
/// Variants carrying a message describe which validation rule rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeverageError {
    InvalidToken(&'static [u8]),
    InvalidPair(&'static [u8]),
    InvalidParams(&'static [u8]),
    InvalidDecimal,
    PriceUnavailable,
    NotRegistered,
    Blacklisted,
    NotUToken,
    Overflow,
    DivisionByZero,
    NegativeValue,
    DenomNotFound,
    PositionOverLimit,
}

impl LeverageError {
    pub fn message(&self) -> &'static [u8] {
        match self {
            LeverageError::InvalidToken(msg)
            | LeverageError::InvalidPair(msg)
            | LeverageError::InvalidParams(msg) => msg,
            LeverageError::InvalidDecimal => ERROR_INVALID_DECIMAL,
            LeverageError::PriceUnavailable => ERROR_PRICE_UNAVAILABLE,
            LeverageError::NotRegistered => ERROR_NOT_REGISTERED,
            LeverageError::Blacklisted => ERROR_BLACKLISTED,
            LeverageError::NotUToken => ERROR_NOT_UTOKEN,
            LeverageError::Overflow => ERROR_OVERFLOW,
            LeverageError::DivisionByZero => ERROR_DIVISION_BY_ZERO,
            LeverageError::NegativeValue => ERROR_NEGATIVE_VALUE,
            LeverageError::DenomNotFound => ERROR_DENOM_NOT_FOUND,
            LeverageError::PositionOverLimit => ERROR_POSITION_OVER_LIMIT,
        }
    }

    /// Oracle side failures. Collateral valuation treats these as a zero price.
    pub fn is_oracle_error(&self) -> bool {
        matches!(
            self,
            LeverageError::PriceUnavailable | LeverageError::Blacklisted
        )
    }
}

impl fmt::Display for LeverageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match core::str::from_utf8(self.message()) {
            Ok(msg) => f.write_str(msg),
            Err(_) => Err(fmt::Error),
        }
    }
}
