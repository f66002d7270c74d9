//! # Wager Record and Status Graph
//!
//! A [`Wager`] is the canonical record of one bilateral staked bet. Its
//! [`WagerStatus`] moves only along the edges of the graph below.
//!
//! ## Design Choice: Validated Enum over Typestate
//!
//! Wagers live in a ledger keyed by id and are looked up by callers who do
//! not know the status at compile time, so the status is a runtime enum.
//! Every change goes through [`Wager::transition`], which rejects anything
//! that is not an edge.
//!
//! ## Status Graph
//!
//! ```text
//! Pending ──accept──▶ Active ──propose──▶ PendingResolution ──challenge──▶ Challenged
//!    │                  │  │                     │                            │
//!  cancel               │  └──source──┐      finalize                    resolve_dispute
//!    ▼                  │             ▼          ▼                            ▼
//! Cancelled          timeout       Resolved ◀────┴────────────────────────────┘
//!                       ▼             ▲  │
//!                 OracleTimedOut ─force┘  ├──claim──▶ Claimed
//!                       │                 └──sweep──▶ Swept
//!                  mutual refund
//!                       ▼
//!                    Refunded
//! ```
//!
//! Cancelled, Refunded, Claimed, and Swept are terminal.

use serde::{Deserialize, Serialize};

use wager_core::{Amount, AssetId, BindingId, PartyId, Timestamp, ValidationError, WagerId};

use crate::error::EscrowError;

// ── Status ─────────────────────────────────────────────────────────────

/// Lifecycle status of a wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WagerStatus {
    /// Created; creator's stake is held; awaiting the counterpart.
    Pending,
    /// Both stakes are held; awaiting resolution.
    Active,
    /// A self-reported outcome is inside its challenge window.
    PendingResolution,
    /// A proposed outcome was challenged; awaiting the arbitrator.
    Challenged,
    /// The bound source missed its deadline plus the timeout period.
    OracleTimedOut,
    /// Outcome and winner are final; awaiting claim.
    Resolved,
    /// Winner withdrew the pot. Terminal.
    Claimed,
    /// Claim window lapsed; pot went to the treasury. Terminal.
    Swept,
    /// Creator withdrew before acceptance. Terminal.
    Cancelled,
    /// Both parties agreed to unwind after a source timeout. Terminal.
    Refunded,
}

impl WagerStatus {
    /// The canonical string name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::PendingResolution => "PENDING_RESOLUTION",
            Self::Challenged => "CHALLENGED",
            Self::OracleTimedOut => "ORACLE_TIMED_OUT",
            Self::Resolved => "RESOLVED",
            Self::Claimed => "CLAIMED",
            Self::Swept => "SWEPT",
            Self::Cancelled => "CANCELLED",
            Self::Refunded => "REFUNDED",
        }
    }

    /// Whether this status is terminal (no further transitions allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Claimed | Self::Swept | Self::Cancelled | Self::Refunded
        )
    }

    /// Whether both stakes are (or were last) held in the vault.
    pub fn holds_both_stakes(&self) -> bool {
        matches!(
            self,
            Self::Active
                | Self::PendingResolution
                | Self::Challenged
                | Self::OracleTimedOut
                | Self::Resolved
        )
    }

    /// Valid target statuses from this status.
    pub fn valid_transitions(&self) -> &'static [WagerStatus] {
        match self {
            Self::Pending => &[Self::Active, Self::Cancelled],
            Self::Active => &[Self::PendingResolution, Self::OracleTimedOut, Self::Resolved],
            Self::PendingResolution => &[Self::Challenged, Self::Resolved],
            Self::Challenged => &[Self::Resolved],
            Self::OracleTimedOut => &[Self::Refunded, Self::Resolved],
            Self::Resolved => &[Self::Claimed, Self::Swept],
            Self::Claimed | Self::Swept | Self::Cancelled | Self::Refunded => &[],
        }
    }

    /// Whether `to` is an edge from this status.
    pub fn can_transition_to(&self, to: WagerStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Every status, in lifecycle order.
    pub fn all() -> &'static [WagerStatus] {
        &[
            Self::Pending,
            Self::Active,
            Self::PendingResolution,
            Self::Challenged,
            Self::OracleTimedOut,
            Self::Resolved,
            Self::Claimed,
            Self::Swept,
            Self::Cancelled,
            Self::Refunded,
        ]
    }
}

impl std::fmt::Display for WagerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Resolution configuration ───────────────────────────────────────────

/// Who decides the outcome of a wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionType {
    /// The creator self-reports, subject to a challenge window.
    CreatorResolves,
    /// The counterpart self-reports, subject to a challenge window.
    CounterpartResolves,
    /// Either party self-reports, subject to a challenge window.
    EitherResolves,
    /// The named arbitrator reports, subject to a challenge window.
    Arbitrator,
    /// A bound outcome source decides; no challenge window.
    ExternalSource,
}

impl ResolutionType {
    /// Whether outcomes are proposed by a participant rather than a source.
    pub fn is_proposal_based(&self) -> bool {
        !matches!(self, Self::ExternalSource)
    }
}

impl std::fmt::Display for ResolutionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CreatorResolves => "creator_resolves",
            Self::CounterpartResolves => "counterpart_resolves",
            Self::EitherResolves => "either_resolves",
            Self::Arbitrator => "arbitrator",
            Self::ExternalSource => "external_source",
        };
        f.write_str(s)
    }
}

/// Resolution settings supplied at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Who decides.
    pub resolution_type: ResolutionType,
    /// Hears challenges and forces resolution after a source timeout.
    /// Required for [`ResolutionType::Arbitrator`], optional otherwise.
    pub arbitrator: Option<PartyId>,
    /// Which source question decides the wager.
    /// Required for [`ResolutionType::ExternalSource`], forbidden otherwise.
    pub source_binding: Option<BindingId>,
    /// Arbitrator's cut of the pot when they participate.
    pub arbitrator_fee_basis_points: u32,
}

impl ResolutionConfig {
    /// Self-report by the given type, no arbitrator, no fee.
    pub fn self_report(resolution_type: ResolutionType) -> Self {
        Self {
            resolution_type,
            arbitrator: None,
            source_binding: None,
            arbitrator_fee_basis_points: 0,
        }
    }

    /// Resolution by a named arbitrator taking `fee_bps`.
    pub fn arbitrated(arbitrator: PartyId, fee_bps: u32) -> Self {
        Self {
            resolution_type: ResolutionType::Arbitrator,
            arbitrator: Some(arbitrator),
            source_binding: None,
            arbitrator_fee_basis_points: fee_bps,
        }
    }

    /// Resolution by an outcome source.
    pub fn external(binding: BindingId) -> Self {
        Self {
            resolution_type: ResolutionType::ExternalSource,
            arbitrator: None,
            source_binding: Some(binding),
            arbitrator_fee_basis_points: 0,
        }
    }

    /// Add an arbitrator to hear disputes and timeouts.
    pub fn with_arbitrator(mut self, arbitrator: PartyId, fee_bps: u32) -> Self {
        self.arbitrator = Some(arbitrator);
        self.arbitrator_fee_basis_points = fee_bps;
        self
    }
}

// ── Sub-records ────────────────────────────────────────────────────────

/// A participant's role in a wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Opened the wager.
    Creator,
    /// Accepted the wager.
    Counterpart,
    /// Neutral third party.
    Arbitrator,
}

/// An outcome awaiting its challenge window.
///
/// Present only while the wager is PendingResolution or Challenged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingResolution {
    /// The outcome put forward.
    pub proposed_outcome: bool,
    /// Who put it forward.
    pub proposer: PartyId,
    /// When.
    pub proposed_at: Timestamp,
    /// Challenges are accepted strictly before this instant.
    pub challenge_deadline: Timestamp,
    /// Who challenged, if anyone.
    pub challenger: Option<PartyId>,
    /// The bond posted with the challenge.
    pub challenge_bond: Option<Amount>,
}

/// Mutual-refund consent after a source timeout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundConsent {
    /// Creator has consented.
    pub creator: bool,
    /// Counterpart has consented.
    pub counterpart: bool,
}

impl RefundConsent {
    /// Both parties have consented.
    pub fn is_mutual(&self) -> bool {
        self.creator && self.counterpart
    }
}

// ── The Wager ──────────────────────────────────────────────────────────

/// The canonical record of a bilateral staked wager.
///
/// Outcome `true` means the creator's prediction came true: the creator
/// wins. Outcome `false` means the counterpart wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wager {
    /// Unique wager identifier.
    pub id: WagerId,
    /// Who opened the wager.
    pub creator: PartyId,
    /// Who is invited to take the other side.
    pub counterpart: PartyId,
    /// Optional neutral party.
    pub arbitrator: Option<PartyId>,
    /// Stake deposited by the creator.
    pub creator_stake: Amount,
    /// Stake deposited by the counterpart; zero until accepted.
    pub counterpart_stake: Amount,
    /// The stake the counterpart must match on acceptance.
    pub required_counterpart_stake: Amount,
    /// Asset both stakes are denominated in.
    pub stake_asset: AssetId,
    /// What the wager is about.
    pub description: String,
    /// Who decides.
    pub resolution_type: ResolutionType,
    /// Bound source question, for external resolution.
    pub source_binding: Option<BindingId>,
    /// Current lifecycle status.
    pub status: WagerStatus,
    /// Acceptance must happen strictly before this instant.
    pub acceptance_deadline: Timestamp,
    /// When the outcome is expected to be known.
    pub expected_resolution_time: Timestamp,
    /// When the wager was created.
    pub created_at: Timestamp,
    /// When the counterpart accepted.
    pub accepted_at: Option<Timestamp>,
    /// When the outcome became final.
    pub resolved_at: Option<Timestamp>,
    /// Final outcome.
    pub outcome: Option<bool>,
    /// Final winner; set on resolution and retained afterwards.
    pub winner: Option<PartyId>,
    /// Arbitrator's cut of the pot, in basis points.
    pub arbitrator_fee_basis_points: u32,
    /// Whether the arbitrator took part in deciding the outcome.
    pub arbitrator_participated: bool,
    /// Whether the pot has been claimed.
    pub claimed: bool,
    /// The outcome in its challenge window, if any.
    pub pending: Option<PendingResolution>,
    /// Refund consent after a source timeout.
    pub refund_consent: RefundConsent,
}

impl Wager {
    /// The role `party` plays in this wager, if any.
    pub fn role_of(&self, party: &PartyId) -> Option<Role> {
        if *party == self.creator {
            Some(Role::Creator)
        } else if *party == self.counterpart {
            Some(Role::Counterpart)
        } else if self.arbitrator.as_ref() == Some(party) {
            Some(Role::Arbitrator)
        } else {
            None
        }
    }

    /// Whether `party` is the creator or the counterpart.
    pub fn is_party(&self, party: &PartyId) -> bool {
        matches!(self.role_of(party), Some(Role::Creator | Role::Counterpart))
    }

    /// Whether `party` may propose an outcome under this wager's resolution type.
    pub fn may_propose(&self, party: &PartyId) -> bool {
        match self.resolution_type {
            ResolutionType::CreatorResolves => *party == self.creator,
            ResolutionType::CounterpartResolves => *party == self.counterpart,
            ResolutionType::EitherResolves => self.is_party(party),
            ResolutionType::Arbitrator => self.arbitrator.as_ref() == Some(party),
            ResolutionType::ExternalSource => false,
        }
    }

    /// The party that wins under `outcome`.
    pub fn winner_for(&self, outcome: bool) -> &PartyId {
        if outcome {
            &self.creator
        } else {
            &self.counterpart
        }
    }

    /// Sum of both stakes.
    pub fn combined_stake(&self) -> Result<Amount, ValidationError> {
        self.creator_stake.checked_add(self.counterpart_stake)
    }

    /// Move to `to` if it is an edge from the current status.
    pub fn transition(&mut self, to: WagerStatus) -> Result<(), EscrowError> {
        if !self.status.can_transition_to(to) {
            return Err(EscrowError::InvalidTransition {
                wager_id: self.id,
                from: self.status.as_str(),
                to: to.as_str(),
            });
        }
        self.status = to;
        Ok(())
    }

    /// Record a final outcome and its winner, and move to Resolved.
    pub fn resolve(&mut self, outcome: bool, at: Timestamp) -> Result<(), EscrowError> {
        self.transition(WagerStatus::Resolved)?;
        self.outcome = Some(outcome);
        self.winner = Some(self.winner_for(outcome).clone());
        self.resolved_at = Some(at);
        self.pending = None;
        Ok(())
    }
}
