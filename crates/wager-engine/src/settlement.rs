//! # Claim Settlement
//!
//! The single code path that moves value out of custody. The engine
//! decides who won; this module decides how money moves.
//!
//! Every disbursement is computed in full, checked against what the vault
//! holds for the wager, and only then paid. A failing call leaves the
//! vault, the balances, and the wager record untouched.
//!
//! ## Fee
//!
//! When the arbitrator took part in deciding the outcome, the claim pays
//! `floor(combined_stake * arbitrator_fee_basis_points / 10000)` to the
//! arbitrator and the remainder to the winner. Rounding always favours
//! the winner.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use wager_core::{Amount, AssetId, PartyId, Timestamp, WagerId};
use wager_escrow::{Payout, PendingResolution, StakeVault, ValueTransfer, Wager, WagerStatus};

use crate::config::BondForfeiture;
use crate::error::WagerError;
use crate::events::ValueMovement;

/// How a claim splits the pot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimBreakdown {
    /// Who receives the remainder.
    pub winner: PartyId,
    /// Remainder after the fee.
    pub winner_amount: Amount,
    /// Who receives the fee, if one applies.
    pub arbitrator: Option<PartyId>,
    /// The arbitrator's cut; zero when no arbitrator took part.
    pub fee: Amount,
}

impl ClaimBreakdown {
    /// Split `wager`'s combined stake between its winner and arbitrator.
    pub fn for_wager(wager: &Wager) -> Result<Self, WagerError> {
        let winner = wager
            .winner
            .clone()
            .ok_or_else(|| WagerError::precondition(wager, "claim", "no winner recorded"))?;
        let pot = wager.combined_stake()?;
        let (arbitrator, fee) = match (&wager.arbitrator, wager.arbitrator_participated) {
            (Some(arbitrator), true) => (
                Some(arbitrator.clone()),
                pot.basis_points(wager.arbitrator_fee_basis_points)?,
            ),
            _ => (None, Amount::ZERO),
        };
        Ok(Self {
            winner,
            winner_amount: pot.checked_sub(fee)?,
            arbitrator,
            fee,
        })
    }

    fn payouts(&self) -> Vec<Payout> {
        let mut legs = Vec::with_capacity(2);
        if let Some(arbitrator) = &self.arbitrator {
            legs.push(Payout::new(arbitrator.clone(), self.fee));
        }
        legs.push(Payout::new(self.winner.clone(), self.winner_amount));
        legs
    }
}

/// Owner of the stake vault.
#[derive(Debug)]
pub struct ClaimSettlement<T: ValueTransfer> {
    vault: StakeVault<T>,
}

impl<T: ValueTransfer> ClaimSettlement<T> {
    /// Wrap a value-transfer collaborator in an empty vault.
    pub fn new(transfer: T) -> Self {
        Self {
            vault: StakeVault::new(transfer),
        }
    }

    /// Value held for one wager.
    pub fn held(&self, wager: &WagerId) -> Amount {
        self.vault.held(wager)
    }

    /// Value held across every wager in `asset`.
    pub fn total_held(&self, asset: &AssetId) -> u128 {
        self.vault.total_held(asset)
    }

    /// The value-transfer collaborator.
    pub fn transfer(&self) -> &T {
        self.vault.transfer()
    }

    /// The value-transfer collaborator, mutably.
    pub fn transfer_mut(&mut self) -> &mut T {
        self.vault.transfer_mut()
    }

    /// Pull a deposit into custody under `wager`.
    pub(crate) fn collect(
        &mut self,
        wager: WagerId,
        from: &PartyId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<ValueMovement, WagerError> {
        self.vault.lock(wager, from, asset, amount)?;
        Ok(ValueMovement::deposit(from.clone(), amount))
    }

    /// Return the creator's stake of a cancelled wager.
    pub(crate) fn refund_creator(&mut self, wager: &Wager) -> Result<Vec<ValueMovement>, WagerError> {
        self.pay(
            wager.id,
            vec![Payout::new(wager.creator.clone(), wager.creator_stake)],
        )
    }

    /// Return both stakes of a mutually refunded wager.
    pub(crate) fn refund_both(&mut self, wager: &Wager) -> Result<Vec<ValueMovement>, WagerError> {
        self.pay(
            wager.id,
            vec![
                Payout::new(wager.creator.clone(), wager.creator_stake),
                Payout::new(wager.counterpart.clone(), wager.counterpart_stake),
            ],
        )
    }

    /// Pay out a challenge bond once the dispute is decided.
    ///
    /// An overturned proposal returns the bond to the challenger. An upheld
    /// one forfeits it under `policy`. The vindicated party is the wager
    /// party the upheld outcome favours, never a proposing arbitrator.
    pub(crate) fn settle_bond(
        &mut self,
        wager: &Wager,
        pending: &PendingResolution,
        final_outcome: bool,
        policy: BondForfeiture,
    ) -> Result<Vec<ValueMovement>, WagerError> {
        let (Some(challenger), Some(bond)) = (&pending.challenger, pending.challenge_bond) else {
            return Ok(Vec::new());
        };
        let recipient = if final_outcome != pending.proposed_outcome {
            challenger.clone()
        } else {
            match (policy, &wager.arbitrator) {
                (BondForfeiture::ToArbitrator, Some(arbitrator)) => arbitrator.clone(),
                (BondForfeiture::ToArbitrator, None) => {
                    tracing::warn!(
                        wager_id = %wager.id,
                        "bond forfeiture targets the arbitrator but none is set, paying winner"
                    );
                    wager.winner_for(final_outcome).clone()
                }
                (BondForfeiture::ToVindicatedParty, _) => wager.winner_for(final_outcome).clone(),
            }
        };
        self.pay(wager.id, vec![Payout::new(recipient, bond)])
    }

    /// Pay a resolved wager's pot to its winner, less any arbitrator fee.
    ///
    /// Valid once, for the winner, while `now <= resolved_at + claim_window`.
    pub(crate) fn claim_winnings(
        &mut self,
        wager: &mut Wager,
        caller: &PartyId,
        now: Timestamp,
        claim_window: Duration,
    ) -> Result<(ClaimBreakdown, Vec<ValueMovement>), WagerError> {
        const OP: &str = "claim";
        require_unsettled(wager, OP)?;
        if wager.winner.as_ref() != Some(caller) {
            return Err(WagerError::authorization(wager, OP, caller, "only the winner may claim"));
        }
        let expiry = claim_expiry(wager, OP, claim_window)?;
        if now > expiry {
            return Err(WagerError::window(
                wager,
                OP,
                now,
                format!("claim window closed at {expiry}"),
            ));
        }

        let breakdown = ClaimBreakdown::for_wager(wager)?;
        let moved = self.pay(wager.id, breakdown.payouts())?;
        wager.transition(WagerStatus::Claimed)?;
        wager.claimed = true;
        Ok((breakdown, moved))
    }

    /// Move an unclaimed pot to `treasury` once the claim window has lapsed.
    pub(crate) fn sweep_unclaimed_funds(
        &mut self,
        wager: &mut Wager,
        now: Timestamp,
        claim_window: Duration,
        treasury: &PartyId,
    ) -> Result<Vec<ValueMovement>, WagerError> {
        const OP: &str = "sweep";
        require_unsettled(wager, OP)?;
        let expiry = claim_expiry(wager, OP, claim_window)?;
        if now <= expiry {
            return Err(WagerError::window(
                wager,
                OP,
                now,
                format!("claim window open until {expiry}"),
            ));
        }

        let pot = wager.combined_stake()?;
        let moved = self.pay(wager.id, vec![Payout::new(treasury.clone(), pot)])?;
        wager.transition(WagerStatus::Swept)?;
        Ok(moved)
    }

    fn pay(
        &mut self,
        wager: WagerId,
        payouts: Vec<Payout>,
    ) -> Result<Vec<ValueMovement>, WagerError> {
        self.vault.disburse(wager, &payouts)?;
        Ok(payouts
            .into_iter()
            .filter(|p| !p.amount.is_zero())
            .map(|p| ValueMovement::payout(p.recipient, p.amount))
            .collect())
    }
}

fn require_unsettled(wager: &Wager, operation: &'static str) -> Result<(), WagerError> {
    match wager.status {
        WagerStatus::Resolved if !wager.claimed => Ok(()),
        WagerStatus::Resolved | WagerStatus::Claimed => {
            Err(WagerError::precondition(wager, operation, "winnings already claimed"))
        }
        WagerStatus::Swept => Err(WagerError::precondition(
            wager,
            operation,
            "unclaimed funds already swept",
        )),
        _ => Err(WagerError::precondition(wager, operation, "wager is not resolved")),
    }
}

fn claim_expiry(
    wager: &Wager,
    operation: &'static str,
    claim_window: Duration,
) -> Result<Timestamp, WagerError> {
    let resolved_at = wager
        .resolved_at
        .ok_or_else(|| WagerError::precondition(wager, operation, "no resolution time recorded"))?;
    Ok(resolved_at.checked_add(claim_window)?)
}
