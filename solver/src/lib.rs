#![no_std]

extern crate alloc;

pub mod liquidation;
pub mod oracle;
pub mod positions;
pub mod registry;
pub mod weighted;

pub use common_errors::*;
pub use common_math::{interpolate, Dec};
pub use common_structs::*;

pub use liquidation::{
    compute_close_factor, compute_liquidation, liquidation_incentive, liquidation_params,
    LiquidationAmounts,
};
pub use oracle::{Pricing, PriceOracle, TokenPrice};
pub use positions::{new_position, AccountPosition};
pub use registry::{TokenRegistry, TokenSet};
pub use weighted::{
    WeightedDecCoin, WeightedDecCoins, WeightedNormalPair, WeightedNormalPairs,
    WeightedSpecialPair, WeightedSpecialPairs,
};
