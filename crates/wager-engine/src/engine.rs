//! # Resolution Engine
//!
//! The write model. Owns the ledger, the settlement path, the event
//! stream, and the status machine that drives a wager from creation to a
//! terminal status.
//!
//! ## Check Order
//!
//! Every entry point reads the clock once, then checks in a fixed order:
//! the wager exists, its status permits the operation, the caller holds
//! the required role, the time bound holds, and finally the supplied
//! amounts are acceptable. Only after every check passes does anything
//! move. A rejected call leaves ledger, vault, and event stream exactly
//! as they were.
//!
//! ## Timeouts
//!
//! No transition fires on its own. Finalization, source timeouts, and
//! sweeps are guards evaluated against the clock when somebody calls
//! them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use wager_core::{Amount, AssetId, Clock, PartyId, Timestamp, WagerId};
use wager_escrow::{
    Page, PageRequest, PendingResolution, ResolutionConfig, ResolutionType, Role, ValueTransfer,
    Wager, WagerLedger, WagerStatus,
};
use wager_source::OutcomeSource;

use crate::config::ProtocolConfig;
use crate::error::{ConfigError, WagerError};
use crate::events::{EventKind, EventLog};
use crate::settlement::{ClaimBreakdown, ClaimSettlement};

/// Parameters of a new wager, supplied by its creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWager {
    /// Who is invited to take the other side.
    pub counterpart: PartyId,
    /// The creator's stake.
    pub stake: Amount,
    /// The stake the counterpart must match. Defaults to `stake`.
    pub counterpart_stake: Option<Amount>,
    /// Asset both stakes are denominated in.
    pub asset: AssetId,
    /// What the wager is about.
    pub description: String,
    /// Who decides, and how.
    pub resolution: ResolutionConfig,
    /// Acceptance must happen strictly before this instant.
    pub acceptance_deadline: Timestamp,
    /// When the outcome is expected to be known.
    pub expected_resolution_time: Timestamp,
}

impl CreateWager {
    /// A symmetric wager: the counterpart matches `stake`.
    pub fn new(
        counterpart: PartyId,
        stake: Amount,
        asset: AssetId,
        description: impl Into<String>,
        resolution: ResolutionConfig,
        acceptance_deadline: Timestamp,
        expected_resolution_time: Timestamp,
    ) -> Self {
        Self {
            counterpart,
            stake,
            counterpart_stake: None,
            asset,
            description: description.into(),
            resolution,
            acceptance_deadline,
            expected_resolution_time,
        }
    }

    /// Require the counterpart to stake a different amount.
    pub fn with_counterpart_stake(mut self, amount: Amount) -> Self {
        self.counterpart_stake = Some(amount);
        self
    }
}

/// Lifecycle driver for every wager in one deployment.
pub struct ResolutionEngine<T: ValueTransfer> {
    config: ProtocolConfig,
    clock: Arc<dyn Clock>,
    sources: Arc<dyn OutcomeSource>,
    ledger: WagerLedger,
    settlement: ClaimSettlement<T>,
    events: EventLog,
}

impl<T: ValueTransfer> std::fmt::Debug for ResolutionEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionEngine")
            .field("config", &self.config)
            .field("wagers", &self.ledger.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl<T: ValueTransfer> ResolutionEngine<T> {
    /// Build an engine. The configuration is validated and then fixed for
    /// the engine's lifetime.
    pub fn new(
        config: ProtocolConfig,
        transfer: T,
        clock: Arc<dyn Clock>,
        sources: Arc<dyn OutcomeSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::info!(
            challenge_period_secs = config.challenge_period.num_seconds(),
            claim_window_secs = config.claim_window.num_seconds(),
            source_timeout_secs = config.source_timeout_period.num_seconds(),
            treasury = %config.treasury,
            "resolution engine started"
        );
        Ok(Self {
            config,
            clock,
            sources,
            ledger: WagerLedger::new(),
            settlement: ClaimSettlement::new(transfer),
            events: EventLog::new(),
        })
    }

    // ── Read model ─────────────────────────────────────────────────────

    /// The engine's configuration.
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Look up a wager.
    pub fn get_wager(&self, wager_id: &WagerId) -> Result<&Wager, WagerError> {
        self.ledger
            .get(wager_id)
            .map_err(|_| WagerError::UnknownWager(*wager_id))
    }

    /// The outcome currently in its challenge window, if any.
    pub fn get_pending_resolution(
        &self,
        wager_id: &WagerId,
    ) -> Result<Option<&PendingResolution>, WagerError> {
        Ok(self.get_wager(wager_id)?.pending.as_ref())
    }

    /// Wagers in which `party` is creator, counterpart, or arbitrator.
    pub fn list_by_participant(&self, party: &PartyId, page: PageRequest) -> Page<Wager> {
        self.ledger.list_by_participant(party, page)
    }

    /// Wagers currently in `status`.
    pub fn list_by_status(&self, status: WagerStatus, page: PageRequest) -> Page<Wager> {
        self.ledger.list_by_status(status, page)
    }

    /// The event stream.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Value held in custody for a wager.
    pub fn held(&self, wager_id: &WagerId) -> Amount {
        self.settlement.held(wager_id)
    }

    /// Value held in custody across every wager in `asset`.
    pub fn total_held(&self, asset: &AssetId) -> u128 {
        self.settlement.total_held(asset)
    }

    /// The value-transfer collaborator.
    pub fn transfer(&self) -> &T {
        self.settlement.transfer()
    }

    /// The value-transfer collaborator, mutably, for funding accounts.
    pub fn transfer_mut(&mut self) -> &mut T {
        self.settlement.transfer_mut()
    }

    // ── Creation and acceptance ────────────────────────────────────────

    /// Open a wager and lock the creator's stake. Returns its id.
    pub fn create_wager(
        &mut self,
        caller: &PartyId,
        request: CreateWager,
    ) -> Result<WagerId, WagerError> {
        self.apply("create", None, caller, |this, now| {
            if request.counterpart == *caller {
                return Err(invalid("creator and counterpart must differ"));
            }
            if request.stake.is_zero() {
                return Err(invalid("stake must be positive"));
            }
            let required = request.counterpart_stake.unwrap_or(request.stake);
            if required.is_zero() {
                return Err(invalid("counterpart stake must be positive"));
            }
            request.stake.checked_add(required)?;

            let lead = request.acceptance_deadline.since(&now);
            if lead < this.config.min_acceptance_window || lead > this.config.max_acceptance_window
            {
                return Err(invalid(format!(
                    "acceptance deadline {} must fall between {}s and {}s from now",
                    request.acceptance_deadline,
                    this.config.min_acceptance_window.num_seconds(),
                    this.config.max_acceptance_window.num_seconds(),
                )));
            }
            if request.expected_resolution_time < request.acceptance_deadline {
                return Err(invalid(
                    "expected resolution time precedes the acceptance deadline",
                ));
            }
            check_resolution(
                &this.config,
                this.sources.as_ref(),
                caller,
                &request.counterpart,
                &request.resolution,
                request.expected_resolution_time,
            )?;

            let id = WagerId::new();
            if this.ledger.get(&id).is_ok() {
                return Err(invalid(format!("wager id {id} already in use")));
            }
            let deposit = this
                .settlement
                .collect(id, caller, &request.asset, request.stake)?;

            let resolution = request.resolution;
            let wager = Wager {
                id,
                creator: caller.clone(),
                counterpart: request.counterpart,
                arbitrator: resolution.arbitrator,
                creator_stake: request.stake,
                counterpart_stake: Amount::ZERO,
                required_counterpart_stake: required,
                stake_asset: request.asset,
                description: request.description,
                resolution_type: resolution.resolution_type,
                source_binding: resolution.source_binding,
                status: WagerStatus::Pending,
                acceptance_deadline: request.acceptance_deadline,
                expected_resolution_time: request.expected_resolution_time,
                created_at: now,
                accepted_at: None,
                resolved_at: None,
                outcome: None,
                winner: None,
                arbitrator_fee_basis_points: resolution.arbitrator_fee_basis_points,
                arbitrator_participated: false,
                claimed: false,
                pending: None,
                refund_consent: Default::default(),
            };
            this.ledger.insert(wager)?;
            this.events.record(
                EventKind::WagerCreated,
                id,
                caller,
                now,
                None,
                WagerStatus::Pending,
                vec![deposit],
                None,
            );
            Ok(id)
        })
    }

    /// Take the other side of a wager by depositing the required stake.
    pub fn accept_wager(
        &mut self,
        caller: &PartyId,
        wager_id: WagerId,
        stake: Amount,
    ) -> Result<(), WagerError> {
        const OP: &str = "accept";
        self.apply(OP, Some(wager_id), caller, |this, now| {
            let wager = lookup(&mut this.ledger, wager_id)?;
            require_status(wager, OP, WagerStatus::Pending)?;
            if *caller != wager.counterpart {
                return Err(WagerError::authorization(
                    wager,
                    OP,
                    caller,
                    "only the invited counterpart may accept",
                ));
            }
            if now >= wager.acceptance_deadline {
                return Err(WagerError::window(
                    wager,
                    OP,
                    now,
                    format!("acceptance closed at {}", wager.acceptance_deadline),
                ));
            }
            if stake != wager.required_counterpart_stake {
                return Err(invalid(format!(
                    "counterpart stake must be {}, got {stake}",
                    wager.required_counterpart_stake
                )));
            }

            let deposit = this
                .settlement
                .collect(wager_id, caller, &wager.stake_asset, stake)?;
            wager.transition(WagerStatus::Active)?;
            wager.counterpart_stake = stake;
            wager.accepted_at = Some(now);
            this.events.record(
                EventKind::WagerAccepted,
                wager_id,
                caller,
                now,
                Some(WagerStatus::Pending),
                WagerStatus::Active,
                vec![deposit],
                None,
            );
            Ok(())
        })
    }

    /// Withdraw an unaccepted wager and refund the creator.
    pub fn cancel_wager(&mut self, caller: &PartyId, wager_id: WagerId) -> Result<(), WagerError> {
        const OP: &str = "cancel";
        self.apply(OP, Some(wager_id), caller, |this, now| {
            let wager = lookup(&mut this.ledger, wager_id)?;
            require_status(wager, OP, WagerStatus::Pending)?;
            if *caller != wager.creator {
                return Err(WagerError::authorization(
                    wager,
                    OP,
                    caller,
                    "only the creator may cancel",
                ));
            }

            let moved = this.settlement.refund_creator(wager)?;
            wager.transition(WagerStatus::Cancelled)?;
            this.events.record(
                EventKind::WagerCancelled,
                wager_id,
                caller,
                now,
                Some(WagerStatus::Pending),
                WagerStatus::Cancelled,
                moved,
                None,
            );
            Ok(())
        })
    }

    // ── Proposal, challenge, dispute ───────────────────────────────────

    /// Put forward an outcome and open its challenge window.
    pub fn propose_resolution(
        &mut self,
        caller: &PartyId,
        wager_id: WagerId,
        outcome: bool,
    ) -> Result<(), WagerError> {
        const OP: &str = "propose resolution for";
        self.apply(OP, Some(wager_id), caller, |this, now| {
            let wager = lookup(&mut this.ledger, wager_id)?;
            require_status(wager, OP, WagerStatus::Active)?;
            if !wager.resolution_type.is_proposal_based() {
                return Err(WagerError::precondition(
                    wager,
                    OP,
                    "outcome comes from the bound source",
                ));
            }
            if !wager.may_propose(caller) {
                return Err(WagerError::authorization(
                    wager,
                    OP,
                    caller,
                    format!("not the proposer under {}", wager.resolution_type),
                ));
            }
            let challenge_deadline = now.checked_add(this.config.challenge_period)?;

            wager.transition(WagerStatus::PendingResolution)?;
            wager.pending = Some(PendingResolution {
                proposed_outcome: outcome,
                proposer: caller.clone(),
                proposed_at: now,
                challenge_deadline,
                challenger: None,
                challenge_bond: None,
            });
            if wager.resolution_type == ResolutionType::Arbitrator {
                wager.arbitrator_participated = true;
            }
            this.events.record(
                EventKind::ResolutionProposed,
                wager_id,
                caller,
                now,
                Some(WagerStatus::Active),
                WagerStatus::PendingResolution,
                Vec::new(),
                Some(outcome),
            );
            Ok(())
        })
    }

    /// Object to a proposed outcome by posting a bond.
    pub fn challenge_resolution(
        &mut self,
        caller: &PartyId,
        wager_id: WagerId,
        bond: Amount,
    ) -> Result<(), WagerError> {
        const OP: &str = "challenge";
        self.apply(OP, Some(wager_id), caller, |this, now| {
            let wager = lookup(&mut this.ledger, wager_id)?;
            require_status(wager, OP, WagerStatus::PendingResolution)?;
            if wager.arbitrator.is_none() {
                return Err(WagerError::precondition(
                    wager,
                    OP,
                    "no arbitrator to hear a dispute",
                ));
            }
            let deadline = pending_of(wager, OP)?.challenge_deadline;
            let proposer = pending_of(wager, OP)?.proposer.clone();
            if !wager.is_party(caller) || *caller == proposer {
                return Err(WagerError::authorization(
                    wager,
                    OP,
                    caller,
                    "only a non-proposing party may challenge",
                ));
            }
            if now >= deadline {
                return Err(WagerError::window(
                    wager,
                    OP,
                    now,
                    format!("challenge window closed at {deadline}"),
                ));
            }
            if bond < this.config.minimum_challenge_bond {
                return Err(invalid(format!(
                    "bond {bond} below minimum {}",
                    this.config.minimum_challenge_bond
                )));
            }

            let deposit = this
                .settlement
                .collect(wager_id, caller, &wager.stake_asset, bond)?;
            wager.transition(WagerStatus::Challenged)?;
            if let Some(pending) = wager.pending.as_mut() {
                pending.challenger = Some(caller.clone());
                pending.challenge_bond = Some(bond);
            }
            this.events.record(
                EventKind::ResolutionChallenged,
                wager_id,
                caller,
                now,
                Some(WagerStatus::PendingResolution),
                WagerStatus::Challenged,
                vec![deposit],
                None,
            );
            Ok(())
        })
    }

    /// Make an unchallenged proposal final once its window has passed.
    pub fn finalize_resolution(
        &mut self,
        caller: &PartyId,
        wager_id: WagerId,
    ) -> Result<(), WagerError> {
        const OP: &str = "finalize";
        self.apply(OP, Some(wager_id), caller, |this, now| {
            let wager = lookup(&mut this.ledger, wager_id)?;
            require_status(wager, OP, WagerStatus::PendingResolution)?;
            let pending = pending_of(wager, OP)?;
            if now < pending.challenge_deadline {
                return Err(WagerError::window(
                    wager,
                    OP,
                    now,
                    format!("challenge window open until {}", pending.challenge_deadline),
                ));
            }
            let outcome = pending.proposed_outcome;

            wager.resolve(outcome, now)?;
            this.events.record(
                EventKind::ResolutionFinalized,
                wager_id,
                caller,
                now,
                Some(WagerStatus::PendingResolution),
                WagerStatus::Resolved,
                Vec::new(),
                Some(outcome),
            );
            Ok(())
        })
    }

    /// Decide a challenged wager and settle the challenge bond.
    pub fn resolve_dispute(
        &mut self,
        caller: &PartyId,
        wager_id: WagerId,
        final_outcome: bool,
    ) -> Result<(), WagerError> {
        const OP: &str = "resolve dispute for";
        self.apply(OP, Some(wager_id), caller, |this, now| {
            let wager = lookup(&mut this.ledger, wager_id)?;
            require_status(wager, OP, WagerStatus::Challenged)?;
            if wager.arbitrator.as_ref() != Some(caller) {
                return Err(WagerError::authorization(
                    wager,
                    OP,
                    caller,
                    "only the arbitrator may resolve a dispute",
                ));
            }
            let pending = pending_of(wager, OP)?.clone();

            let moved = this.settlement.settle_bond(
                wager,
                &pending,
                final_outcome,
                this.config.bond_forfeiture,
            )?;
            wager.arbitrator_participated = true;
            wager.resolve(final_outcome, now)?;
            this.events.record(
                EventKind::DisputeResolved,
                wager_id,
                caller,
                now,
                Some(WagerStatus::Challenged),
                WagerStatus::Resolved,
                moved,
                Some(final_outcome),
            );
            Ok(())
        })
    }

    // ── Outcome sources ────────────────────────────────────────────────

    /// Copy the outcome of a resolved source onto its wager.
    pub fn resolve_from_source(
        &mut self,
        caller: &PartyId,
        wager_id: WagerId,
    ) -> Result<(), WagerError> {
        const OP: &str = "resolve from source";
        self.apply(OP, Some(wager_id), caller, |this, now| {
            let wager = lookup(&mut this.ledger, wager_id)?;
            require_status(wager, OP, WagerStatus::Active)?;
            let binding = source_binding_of(wager, OP)?;
            if !this.sources.is_resolved(&binding)? {
                return Err(WagerError::precondition(
                    wager,
                    OP,
                    format!("source has not resolved {binding}"),
                ));
            }
            let reported = this.sources.outcome(&binding)?;

            wager.resolve(reported.outcome, now)?;
            this.events.record(
                EventKind::ResolvedFromSource,
                wager_id,
                caller,
                now,
                Some(WagerStatus::Active),
                WagerStatus::Resolved,
                Vec::new(),
                Some(reported.outcome),
            );
            Ok(())
        })
    }

    /// Declare a bound source silent past its deadline plus grace.
    pub fn trigger_source_timeout(
        &mut self,
        caller: &PartyId,
        wager_id: WagerId,
    ) -> Result<(), WagerError> {
        const OP: &str = "time out";
        self.apply(OP, Some(wager_id), caller, |this, now| {
            let wager = lookup(&mut this.ledger, wager_id)?;
            require_status(wager, OP, WagerStatus::Active)?;
            let binding = source_binding_of(wager, OP)?;
            let deadline = wager
                .expected_resolution_time
                .checked_add(this.config.source_timeout_period)?;
            if now <= deadline {
                return Err(WagerError::window(
                    wager,
                    OP,
                    now,
                    format!("source has until {deadline}"),
                ));
            }
            let resolved = match this.sources.is_resolved(&binding) {
                Ok(resolved) => resolved,
                Err(e) => {
                    tracing::warn!(
                        wager_id = %wager_id,
                        binding = %binding,
                        error = %e,
                        "source query failed past its deadline, treating as unresolved"
                    );
                    false
                }
            };
            if resolved {
                return Err(WagerError::precondition(
                    wager,
                    OP,
                    "source has resolved, resolve from source instead",
                ));
            }

            wager.transition(WagerStatus::OracleTimedOut)?;
            this.events.record(
                EventKind::SourceTimedOut,
                wager_id,
                caller,
                now,
                Some(WagerStatus::Active),
                WagerStatus::OracleTimedOut,
                Vec::new(),
                None,
            );
            Ok(())
        })
    }

    // ── Timeout recovery ───────────────────────────────────────────────

    /// Record a party's consent to unwind a timed-out wager. The second
    /// consent returns both stakes.
    pub fn accept_mutual_refund(
        &mut self,
        caller: &PartyId,
        wager_id: WagerId,
    ) -> Result<(), WagerError> {
        const OP: &str = "refund";
        self.apply(OP, Some(wager_id), caller, |this, now| {
            let wager = lookup(&mut this.ledger, wager_id)?;
            require_status(wager, OP, WagerStatus::OracleTimedOut)?;
            let mut consent = wager.refund_consent;
            let already = match wager.role_of(caller) {
                Some(Role::Creator) => std::mem::replace(&mut consent.creator, true),
                Some(Role::Counterpart) => std::mem::replace(&mut consent.counterpart, true),
                _ => {
                    return Err(WagerError::authorization(
                        wager,
                        OP,
                        caller,
                        "only a party may consent to a refund",
                    ))
                }
            };
            if already {
                return Err(WagerError::precondition(
                    wager,
                    OP,
                    format!("{caller} already consented"),
                ));
            }

            if !consent.is_mutual() {
                wager.refund_consent = consent;
                this.events.record(
                    EventKind::RefundConsented,
                    wager_id,
                    caller,
                    now,
                    Some(WagerStatus::OracleTimedOut),
                    WagerStatus::OracleTimedOut,
                    Vec::new(),
                    None,
                );
                return Ok(());
            }

            let moved = this.settlement.refund_both(wager)?;
            wager.transition(WagerStatus::Refunded)?;
            wager.refund_consent = consent;
            this.events.record(
                EventKind::WagerRefunded,
                wager_id,
                caller,
                now,
                Some(WagerStatus::OracleTimedOut),
                WagerStatus::Refunded,
                moved,
                None,
            );
            Ok(())
        })
    }

    /// Arbitrator decides a timed-out wager.
    pub fn force_manual_resolution(
        &mut self,
        caller: &PartyId,
        wager_id: WagerId,
        outcome: bool,
    ) -> Result<(), WagerError> {
        const OP: &str = "force resolution of";
        self.apply(OP, Some(wager_id), caller, |this, now| {
            let wager = lookup(&mut this.ledger, wager_id)?;
            require_status(wager, OP, WagerStatus::OracleTimedOut)?;
            let Some(arbitrator) = wager.arbitrator.as_ref() else {
                return Err(WagerError::precondition(
                    wager,
                    OP,
                    "no arbitrator configured, only a mutual refund is available",
                ));
            };
            if arbitrator != caller {
                return Err(WagerError::authorization(
                    wager,
                    OP,
                    caller,
                    "only the arbitrator may force resolution",
                ));
            }

            wager.arbitrator_participated = true;
            wager.resolve(outcome, now)?;
            this.events.record(
                EventKind::ManualResolutionForced,
                wager_id,
                caller,
                now,
                Some(WagerStatus::OracleTimedOut),
                WagerStatus::Resolved,
                Vec::new(),
                Some(outcome),
            );
            Ok(())
        })
    }

    // ── Settlement ─────────────────────────────────────────────────────

    /// Pay the pot to the winner, less any arbitrator fee.
    pub fn claim_winnings(
        &mut self,
        caller: &PartyId,
        wager_id: WagerId,
    ) -> Result<ClaimBreakdown, WagerError> {
        self.apply("claim", Some(wager_id), caller, |this, now| {
            let wager = lookup(&mut this.ledger, wager_id)?;
            let (breakdown, moved) =
                this.settlement
                    .claim_winnings(wager, caller, now, this.config.claim_window)?;
            this.events.record(
                EventKind::WinningsClaimed,
                wager_id,
                caller,
                now,
                Some(WagerStatus::Resolved),
                WagerStatus::Claimed,
                moved,
                wager.outcome,
            );
            Ok(breakdown)
        })
    }

    /// Move an unclaimed pot to the treasury. Returns the amount swept.
    pub fn sweep_unclaimed_funds(
        &mut self,
        caller: &PartyId,
        wager_id: WagerId,
    ) -> Result<Amount, WagerError> {
        self.apply("sweep", Some(wager_id), caller, |this, now| {
            let wager = lookup(&mut this.ledger, wager_id)?;
            let moved = this.settlement.sweep_unclaimed_funds(
                wager,
                now,
                this.config.claim_window,
                &this.config.treasury,
            )?;
            let swept = moved
                .iter()
                .try_fold(Amount::ZERO, |acc, m| acc.checked_add(m.amount))?;
            this.events.record(
                EventKind::UnclaimedFundsSwept,
                wager_id,
                caller,
                now,
                Some(WagerStatus::Resolved),
                WagerStatus::Swept,
                moved,
                wager.outcome,
            );
            Ok(swept)
        })
    }

    /// Read the clock once, run `op`, and log a rejection.
    fn apply<R>(
        &mut self,
        operation: &'static str,
        wager_id: Option<WagerId>,
        caller: &PartyId,
        op: impl FnOnce(&mut Self, Timestamp) -> Result<R, WagerError>,
    ) -> Result<R, WagerError> {
        let now = self.clock.now();
        op(self, now).map_err(|e| {
            tracing::debug!(
                operation,
                wager_id = ?wager_id,
                actor = %caller,
                kind = ?e.kind(),
                error = %e,
                "transition rejected"
            );
            e
        })
    }
}

fn invalid(reason: impl Into<String>) -> WagerError {
    WagerError::Validation(reason.into())
}

fn lookup(ledger: &mut WagerLedger, wager_id: WagerId) -> Result<&mut Wager, WagerError> {
    ledger
        .get_mut(&wager_id)
        .map_err(|_| WagerError::UnknownWager(wager_id))
}

fn require_status(
    wager: &Wager,
    operation: &'static str,
    expected: WagerStatus,
) -> Result<(), WagerError> {
    if wager.status != expected {
        return Err(WagerError::precondition(
            wager,
            operation,
            format!("requires status {expected}"),
        ));
    }
    Ok(())
}

fn pending_of<'a>(
    wager: &'a Wager,
    operation: &'static str,
) -> Result<&'a PendingResolution, WagerError> {
    wager
        .pending
        .as_ref()
        .ok_or_else(|| WagerError::precondition(wager, operation, "no proposal recorded"))
}

fn source_binding_of(
    wager: &Wager,
    operation: &'static str,
) -> Result<wager_core::BindingId, WagerError> {
    match (&wager.resolution_type, &wager.source_binding) {
        (ResolutionType::ExternalSource, Some(binding)) => Ok(binding.clone()),
        _ => Err(WagerError::precondition(
            wager,
            operation,
            "wager is not bound to an outcome source",
        )),
    }
}

fn check_resolution(
    config: &ProtocolConfig,
    sources: &dyn OutcomeSource,
    creator: &PartyId,
    counterpart: &PartyId,
    resolution: &ResolutionConfig,
    expected_resolution_time: Timestamp,
) -> Result<(), WagerError> {
    match (resolution.resolution_type, &resolution.arbitrator) {
        (ResolutionType::Arbitrator, None) => {
            return Err(invalid("arbitrator resolution requires an arbitrator"));
        }
        (_, Some(arbitrator)) if arbitrator == creator || arbitrator == counterpart => {
            return Err(invalid("arbitrator must not be a party to the wager"));
        }
        _ => {}
    }
    if resolution.arbitrator.is_none() && resolution.arbitrator_fee_basis_points > 0 {
        return Err(invalid("arbitrator fee set without an arbitrator"));
    }
    if resolution.arbitrator_fee_basis_points > config.max_arbitrator_fee_basis_points {
        return Err(invalid(format!(
            "arbitrator fee {} bps exceeds cap {} bps",
            resolution.arbitrator_fee_basis_points, config.max_arbitrator_fee_basis_points
        )));
    }
    match (resolution.resolution_type, &resolution.source_binding) {
        (ResolutionType::ExternalSource, None) => {
            Err(invalid("external resolution requires a source binding"))
        }
        (ResolutionType::ExternalSource, Some(binding)) => {
            let metadata = sources
                .metadata(binding)
                .map_err(|e| invalid(format!("source binding {binding} unusable: {e}")))?;
            // Source timeouts run from this instant.
            if metadata.expected_resolution_time != expected_resolution_time {
                return Err(invalid(format!(
                    "expected resolution time {} differs from source binding {} ({})",
                    expected_resolution_time, binding, metadata.expected_resolution_time
                )));
            }
            Ok(())
        }
        (_, Some(_)) => Err(invalid(
            "source binding given for a self-reported resolution",
        )),
        (_, None) => Ok(()),
    }
}
