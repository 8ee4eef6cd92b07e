use alloc::vec::Vec;

use common_errors::{LeverageError, ERROR_DUPLICATE_TOKEN};
use common_math::Dec;
use common_structs::{Coin, Denom, SpecialAssetPair, Token};
use multiversx_sc::api::ManagedTypeApi;

/// Token registry owned by the host.
pub trait TokenRegistry<M: ManagedTypeApi> {
    /// Settings of a registered base denom, or `NotRegistered`.
    fn get_token(&self, base_denom: &Denom<M>) -> Result<Token<M>, LeverageError>;

    /// Converts a uToken amount into its base token amount at the current exchange rate.
    fn to_token(&self, utoken: &Coin<M>) -> Result<Coin<M>, LeverageError>;

    fn all_registered(&self) -> Vec<Token<M>>;

    fn special_pairs(&self) -> Vec<SpecialAssetPair<M>>;
}

/// Validated token settings cached for one solver invocation.
#[derive(Clone)]
pub struct TokenSet<M: ManagedTypeApi> {
    tokens: Vec<Token<M>>,
}

impl<M: ManagedTypeApi> Default for TokenSet<M> {
    fn default() -> Self {
        TokenSet { tokens: Vec::new() }
    }
}

impl<M: ManagedTypeApi> TokenSet<M> {
    pub fn from_tokens(tokens: &[Token<M>]) -> Result<Self, LeverageError> {
        let mut set = Self::default();
        for token in tokens {
            set.insert(token.clone())?;
        }
        Ok(set)
    }

    /// Admits a token after validation. A base denom may only be registered once.
    pub fn insert(&mut self, token: Token<M>) -> Result<(), LeverageError> {
        token.validate()?;
        if self.contains(&token.base_denom) {
            return Err(LeverageError::InvalidToken(ERROR_DUPLICATE_TOKEN));
        }
        self.tokens.push(token);
        Ok(())
    }

    pub fn get(&self, base_denom: &Denom<M>) -> Option<&Token<M>> {
        self.tokens.iter().find(|t| t.base_denom == *base_denom)
    }

    pub fn contains(&self, base_denom: &Denom<M>) -> bool {
        self.get(base_denom).is_some()
    }

    /// Collateral weight (or liquidation threshold) of a denom. Unknown denoms weigh zero.
    pub fn weight(&self, base_denom: &Denom<M>, is_for_liquidation: bool) -> Dec<M> {
        self.get(base_denom)
            .map(|t| t.weight(is_for_liquidation).clone())
            .unwrap_or_else(Dec::zero)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Token<M>> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
