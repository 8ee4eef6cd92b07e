use common_errors::LeverageError;
use common_math::Dec;
use common_structs::Denom;
use log::debug;
use multiversx_sc::api::ManagedTypeApi;

use crate::weighted::DenomDisplay;

use super::bound::largest_healthy;
use super::AccountPosition;

impl<M: ManagedTypeApi> AccountPosition<M> {
    /// Maximum additional value of `denom` the account can borrow while staying
    /// at or under its borrow limit. The position itself is not modified.
    ///
    /// Borrows sorting after `denom` are first displaced onto the lowest weight
    /// collateral. The freed collateral then fills special pairs borrowing
    /// `denom`, and finally ordinary pairs. The estimate is then checked against
    /// the position rebuilt with the new borrow, where special pairs may claim
    /// collateral that normal pairs hold now, and lowered until it fits.
    ///
    /// # Returns
    /// - Zero for liquidation positions, unknown denoms and accounts over limit
    pub fn max_borrow(&self, denom: &Denom<M>) -> Result<Dec<M>, LeverageError> {
        if self.is_for_liquidation
            || !self.tokens.contains(denom)
            || self.unpaired_borrows.has_positive()
        {
            return Ok(Dec::zero());
        }

        let mut trial = self.clone();
        trial.displace_borrows_after(denom)?;
        let special = trial.fill_special_pairs(denom, None, None, None)?;
        let cap = trial.collateral_value.clone();
        let ordinary = trial.fill_ordinary_collateral(denom, &cap, None)?;
        let estimate = special.add(&ordinary)?;
        let max_borrow = largest_healthy(denom, &estimate, |amount| {
            self.healthy_after_borrow(denom, amount)
        })?;

        debug!(
            "max borrow of {}: special={} ordinary={} allowed={}",
            DenomDisplay(denom),
            special,
            ordinary,
            max_borrow
        );
        Ok(max_borrow)
    }
}
