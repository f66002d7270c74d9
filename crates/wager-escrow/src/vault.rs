//! # Stake Vault
//!
//! Holds value against each wager id. Value enters through
//! [`StakeVault::lock`], which pulls from a participant via the
//! [`ValueTransfer`] collaborator, and leaves only through
//! [`StakeVault::disburse`].
//!
//! ## Invariant
//!
//! A disbursement never exceeds what is held for the wager, and either
//! every payout in it happens or none does. `ValueTransfer::payout` is a
//! credit and cannot fail, so the only fallible step runs before any
//! balance moves.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use wager_core::{Amount, AssetId, PartyId, WagerId};

use crate::error::EscrowError;

/// Failure reported by the value-transfer collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The depositor does not hold enough of the asset.
    #[error("{party} holds {available} {asset}, cannot deposit {requested}")]
    InsufficientFunds {
        /// The depositor.
        party: PartyId,
        /// The asset.
        asset: AssetId,
        /// Balance available.
        available: u128,
        /// Amount requested.
        requested: Amount,
    },

    /// The collaborator refused the deposit for its own reasons.
    #[error("deposit rejected: {0}")]
    Rejected(String),
}

/// Opaque value-movement primitive.
///
/// The protocol does not interpret how value is represented; it only asks
/// for deposits into custody and payouts out of it.
pub trait ValueTransfer: Send {
    /// Pull `amount` of `asset` from `from` into custody.
    fn deposit(&mut self, from: &PartyId, asset: &AssetId, amount: Amount)
        -> Result<(), TransferError>;

    /// Credit `amount` of `asset` out of custody to `recipient`.
    fn payout(&mut self, recipient: &PartyId, asset: &AssetId, amount: Amount);
}

/// Account balances kept in memory.
///
/// Balances are 128-bit so that credits of `u64` amounts cannot overflow.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransfer {
    balances: HashMap<(PartyId, AssetId), u128>,
}

impl InMemoryTransfer {
    /// Create an empty set of balances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` into an account.
    pub fn fund(&mut self, party: &PartyId, asset: &AssetId, amount: Amount) {
        *self
            .balances
            .entry((party.clone(), asset.clone()))
            .or_default() += u128::from(amount.units());
    }

    /// Current balance of an account.
    pub fn balance(&self, party: &PartyId, asset: &AssetId) -> u128 {
        self.balances
            .get(&(party.clone(), asset.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of every account balance in `asset`.
    pub fn total_supply(&self, asset: &AssetId) -> u128 {
        self.balances
            .iter()
            .filter(|((_, a), _)| a == asset)
            .map(|(_, v)| *v)
            .sum()
    }
}

impl ValueTransfer for InMemoryTransfer {
    fn deposit(
        &mut self,
        from: &PartyId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let balance = self
            .balances
            .entry((from.clone(), asset.clone()))
            .or_default();
        let requested = u128::from(amount.units());
        if *balance < requested {
            return Err(TransferError::InsufficientFunds {
                party: from.clone(),
                asset: asset.clone(),
                available: *balance,
                requested: amount,
            });
        }
        *balance -= requested;
        Ok(())
    }

    fn payout(&mut self, recipient: &PartyId, asset: &AssetId, amount: Amount) {
        self.fund(recipient, asset, amount);
    }
}

/// One leg of a disbursement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// Who receives value.
    pub recipient: PartyId,
    /// How much.
    pub amount: Amount,
}

impl Payout {
    /// Construct a payout leg.
    pub fn new(recipient: PartyId, amount: Amount) -> Self {
        Self { recipient, amount }
    }
}

#[derive(Debug, Clone)]
struct Holding {
    asset: AssetId,
    amount: Amount,
}

/// Value held in custody, keyed by wager id.
#[derive(Debug)]
pub struct StakeVault<T: ValueTransfer> {
    transfer: T,
    holdings: HashMap<WagerId, Holding>,
}

impl<T: ValueTransfer> StakeVault<T> {
    /// Create a vault over a value-transfer collaborator.
    pub fn new(transfer: T) -> Self {
        Self {
            transfer,
            holdings: HashMap::new(),
        }
    }

    /// Amount held for `wager`.
    pub fn held(&self, wager: &WagerId) -> Amount {
        self.holdings
            .get(wager)
            .map(|h| h.amount)
            .unwrap_or(Amount::ZERO)
    }

    /// Amount held across all wagers in `asset`.
    pub fn total_held(&self, asset: &AssetId) -> u128 {
        self.holdings
            .values()
            .filter(|h| h.asset == *asset)
            .map(|h| u128::from(h.amount.units()))
            .sum()
    }

    /// Read access to the collaborator.
    pub fn transfer(&self) -> &T {
        &self.transfer
    }

    /// Mutable access to the collaborator, for account funding outside the
    /// protocol. Custody balances are not reachable through it.
    pub fn transfer_mut(&mut self) -> &mut T {
        &mut self.transfer
    }

    /// Pull `amount` from `from` into custody under `wager`.
    pub fn lock(
        &mut self,
        wager: WagerId,
        from: &PartyId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), EscrowError> {
        let current = self.held(&wager);
        let next = current.checked_add(amount)?;
        self.transfer.deposit(from, asset, amount)?;
        self.holdings.insert(
            wager,
            Holding {
                asset: asset.clone(),
                amount: next,
            },
        );
        tracing::debug!(wager_id = %wager, from = %from, %amount, "value locked");
        Ok(())
    }

    /// Pay every leg out of `wager`'s custody. Returns the total paid.
    ///
    /// Zero-amount legs are skipped.
    pub fn disburse(&mut self, wager: WagerId, payouts: &[Payout]) -> Result<Amount, EscrowError> {
        let total = payouts
            .iter()
            .try_fold(Amount::ZERO, |acc, p| acc.checked_add(p.amount))?;
        let holding = self
            .holdings
            .get_mut(&wager)
            .ok_or(EscrowError::InsufficientHeld {
                wager_id: wager,
                held: Amount::ZERO,
                requested: total,
            })?;
        if total > holding.amount {
            return Err(EscrowError::InsufficientHeld {
                wager_id: wager,
                held: holding.amount,
                requested: total,
            });
        }
        holding.amount = holding.amount.checked_sub(total)?;
        for payout in payouts.iter().filter(|p| !p.amount.is_zero()) {
            self.transfer
                .payout(&payout.recipient, &holding.asset, payout.amount);
        }
        tracing::debug!(wager_id = %wager, %total, legs = payouts.len(), "value disbursed");
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party(s: &str) -> PartyId {
        PartyId::new(s).unwrap()
    }

    fn usdc() -> AssetId {
        AssetId::new("USDC").unwrap()
    }

    fn funded_vault() -> StakeVault<InMemoryTransfer> {
        let mut transfer = InMemoryTransfer::new();
        transfer.fund(&party("alice"), &usdc(), Amount::new(1_000));
        transfer.fund(&party("bob"), &usdc(), Amount::new(1_000));
        StakeVault::new(transfer)
    }

    #[test]
    fn lock_moves_value_into_custody() {
        let mut vault = funded_vault();
        let w = WagerId::new();
        vault.lock(w, &party("alice"), &usdc(), Amount::new(300)).unwrap();
        vault.lock(w, &party("bob"), &usdc(), Amount::new(300)).unwrap();
        assert_eq!(vault.held(&w), Amount::new(600));
        assert_eq!(vault.transfer().balance(&party("alice"), &usdc()), 700);
        assert_eq!(vault.total_held(&usdc()), 600);
    }

    #[test]
    fn lock_without_funds_changes_nothing() {
        let mut vault = funded_vault();
        let w = WagerId::new();
        let err = vault
            .lock(w, &party("alice"), &usdc(), Amount::new(5_000))
            .unwrap_err();
        assert!(matches!(
            err,
            EscrowError::Transfer(TransferError::InsufficientFunds { .. })
        ));
        assert_eq!(vault.held(&w), Amount::ZERO);
        assert_eq!(vault.transfer().balance(&party("alice"), &usdc()), 1_000);
    }

    #[test]
    fn disburse_pays_all_legs() {
        let mut vault = funded_vault();
        let w = WagerId::new();
        vault.lock(w, &party("alice"), &usdc(), Amount::new(500)).unwrap();
        let paid = vault
            .disburse(
                w,
                &[
                    Payout::new(party("carol"), Amount::new(25)),
                    Payout::new(party("bob"), Amount::new(475)),
                ],
            )
            .unwrap();
        assert_eq!(paid, Amount::new(500));
        assert_eq!(vault.held(&w), Amount::ZERO);
        assert_eq!(vault.transfer().balance(&party("carol"), &usdc()), 25);
        assert_eq!(vault.transfer().balance(&party("bob"), &usdc()), 1_475);
    }

    #[test]
    fn over_disbursement_is_rejected_whole() {
        let mut vault = funded_vault();
        let w = WagerId::new();
        vault.lock(w, &party("alice"), &usdc(), Amount::new(100)).unwrap();
        let err = vault
            .disburse(
                w,
                &[
                    Payout::new(party("bob"), Amount::new(60)),
                    Payout::new(party("carol"), Amount::new(60)),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, EscrowError::InsufficientHeld { .. }));
        assert_eq!(vault.held(&w), Amount::new(100));
        assert_eq!(vault.transfer().balance(&party("bob"), &usdc()), 1_000);
    }

    #[test]
    fn disburse_from_unknown_wager_fails() {
        let mut vault = funded_vault();
        assert!(vault
            .disburse(WagerId::new(), &[Payout::new(party("bob"), Amount::new(1))])
            .is_err());
    }

    #[test]
    fn supply_is_conserved_through_custody() {
        let mut vault = funded_vault();
        let w = WagerId::new();
        vault.lock(w, &party("alice"), &usdc(), Amount::new(400)).unwrap();
        let outside = vault.transfer().total_supply(&usdc());
        assert_eq!(outside + vault.total_held(&usdc()), 2_000);
        vault
            .disburse(w, &[Payout::new(party("bob"), Amount::new(400))])
            .unwrap();
        assert_eq!(vault.transfer().total_supply(&usdc()), 2_000);
    }
}
