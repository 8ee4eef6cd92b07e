#![no_std]

/// Fixed point unit for every USD value, weight and price (18 decimals)
pub const WAD: u128 = 1_000_000_000_000_000_000;
pub const WAD_PRECISION: usize = 18;
pub const HALF_WAD: u128 = 500_000_000_000_000_000;

/// Largest bit length a decimal may reach before arithmetic reports an overflow.
/// 256 bits of integer range plus the bits needed for 18 fractional digits.
pub const MAX_DEC_BIT_LEN: u32 = 316;

/// Prefix carried by every uToken denom, e.g. `u/uumee`
pub const UTOKEN_PREFIX: &[u8] = b"u/";

/// Borrow side weight floor used when pairing collateral with a low weight borrow (0.5)
pub const DEFAULT_MINIMUM_BORROW_FACTOR: u128 = 500_000_000_000_000_000;

/// Borrowed value (USD) at or below which a liquidation closes the whole position (500 USD)
pub const DEFAULT_SMALL_LIQUIDATION_SIZE: u128 = 500 * WAD;

/// Close factor applied right past the liquidation threshold (5%)
pub const DEFAULT_MINIMUM_CLOSE_FACTOR: u128 = 50_000_000_000_000_000;

/// Portion past the liquidation threshold at which the close factor reaches 100% (40%)
pub const DEFAULT_COMPLETE_LIQUIDATION_THRESHOLD: u128 = 400_000_000_000_000_000;

/// Incentive reduction applied to liquidations paid out in base tokens (5%)
pub const DEFAULT_DIRECT_LIQUIDATION_FEE: u128 = 50_000_000_000_000_000;
