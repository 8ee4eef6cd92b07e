//! Ordered containers of USD values used while matching borrows to collateral.
//!
//! Every container keeps its elements sorted by priority: the first element is the
//! one the solver consumes first.

mod coins;
mod normal;
mod special;

use core::cmp::Ordering;
use core::fmt;

use common_structs::Denom;
use multiversx_sc::api::ManagedTypeApi;

pub use coins::{WeightedDecCoin, WeightedDecCoins};
pub use normal::{WeightedNormalPair, WeightedNormalPairs};
pub use special::{WeightedSpecialPair, WeightedSpecialPairs};

/// Byte-wise lexicographic comparison of two denoms.
pub fn compare_denoms<M: ManagedTypeApi>(a: &Denom<M>, b: &Denom<M>) -> Ordering {
    a.to_boxed_bytes()
        .as_slice()
        .cmp(b.to_boxed_bytes().as_slice())
}

/// Formats a denom as text, for logs and position dumps.
pub struct DenomDisplay<'a, M: ManagedTypeApi>(pub &'a Denom<M>);

impl<M: ManagedTypeApi> fmt::Display for DenomDisplay<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_boxed_bytes();
        match core::str::from_utf8(bytes.as_slice()) {
            Ok(text) => f.write_str(text),
            Err(_) => Err(fmt::Error),
        }
    }
}
