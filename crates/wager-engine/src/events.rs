//! # Event Stream
//!
//! Every successful write-model entry point appends exactly one
//! [`WagerEvent`]. The stream is the only externally observable history;
//! there is no separate audit table.

use serde::{Deserialize, Serialize};

use wager_core::{Amount, PartyId, Timestamp, WagerId};
use wager_escrow::WagerStatus;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// An offer was created and the creator stake locked.
    WagerCreated,
    /// The counterpart matched the stake; the wager is live.
    WagerAccepted,
    /// An unaccepted offer was withdrawn and its stake returned.
    WagerCancelled,
    /// An outcome was proposed and the challenge window opened.
    ResolutionProposed,
    /// A proposal was disputed with a bond.
    ResolutionChallenged,
    /// An unchallenged proposal became final.
    ResolutionFinalized,
    /// The arbitrator decided a challenged proposal.
    DisputeResolved,
    /// The bound outcome source supplied the result.
    ResolvedFromSource,
    /// The outcome source stayed silent past its grace period.
    SourceTimedOut,
    /// One party consented to a mutual refund.
    RefundConsented,
    /// Both parties consented and both stakes were returned.
    WagerRefunded,
    /// The arbitrator resolved a timed-out wager.
    ManualResolutionForced,
    /// The winner collected the pot, less any fee.
    WinningsClaimed,
    /// An unclaimed pot went to the treasury after the claim window.
    UnclaimedFundsSwept,
}

impl EventKind {
    /// Stable snake_case name, used as the log message.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WagerCreated => "wager_created",
            Self::WagerAccepted => "wager_accepted",
            Self::WagerCancelled => "wager_cancelled",
            Self::ResolutionProposed => "resolution_proposed",
            Self::ResolutionChallenged => "resolution_challenged",
            Self::ResolutionFinalized => "resolution_finalized",
            Self::DisputeResolved => "dispute_resolved",
            Self::ResolvedFromSource => "resolved_from_source",
            Self::SourceTimedOut => "source_timed_out",
            Self::RefundConsented => "refund_consented",
            Self::WagerRefunded => "wager_refunded",
            Self::ManualResolutionForced => "manual_resolution_forced",
            Self::WinningsClaimed => "winnings_claimed",
            Self::UnclaimedFundsSwept => "unclaimed_funds_swept",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a value movement relative to the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Into custody.
    In,
    /// Out of custody.
    Out,
}

/// One leg of value that moved as part of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueMovement {
    /// Depositor or recipient.
    pub party: PartyId,
    /// How much.
    pub amount: Amount,
    /// Into or out of the vault.
    pub direction: Direction,
}

impl ValueMovement {
    /// A deposit into custody.
    pub fn deposit(party: PartyId, amount: Amount) -> Self {
        Self {
            party,
            amount,
            direction: Direction::In,
        }
    }

    /// A payout out of custody.
    pub fn payout(party: PartyId, amount: Amount) -> Self {
        Self {
            party,
            amount,
            direction: Direction::Out,
        }
    }
}

/// A single entry in the event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WagerEvent {
    /// Position in the stream, starting at zero.
    pub sequence: u64,
    /// What happened.
    pub kind: EventKind,
    /// The wager it happened to.
    pub wager_id: WagerId,
    /// Who invoked the entry point.
    pub actor: PartyId,
    /// Clock reading at the call.
    pub timestamp: Timestamp,
    /// Status before the call; `None` for creation.
    pub from: Option<WagerStatus>,
    /// Status after the call.
    pub to: WagerStatus,
    /// Value moved by the call.
    pub amounts: Vec<ValueMovement>,
    /// Outcome proposed or decided by the call, if any.
    pub outcome: Option<bool>,
}

/// Append-only event stream.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<WagerEvent>,
}

impl EventLog {
    /// An empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, assigning its sequence number.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &mut self,
        kind: EventKind,
        wager_id: WagerId,
        actor: &PartyId,
        timestamp: Timestamp,
        from: Option<WagerStatus>,
        to: WagerStatus,
        amounts: Vec<ValueMovement>,
        outcome: Option<bool>,
    ) -> &WagerEvent {
        let sequence = self.events.len() as u64;
        tracing::info!(
            wager_id = %wager_id,
            actor = %actor,
            from = from.map(|s| s.as_str()).unwrap_or("NONE"),
            to = to.as_str(),
            sequence,
            "{}",
            kind
        );
        let index = self.events.len();
        self.events.push(WagerEvent {
            sequence,
            kind,
            wager_id,
            actor: actor.clone(),
            timestamp,
            from,
            to,
            amounts,
            outcome,
        });
        &self.events[index]
    }

    /// Every event in order.
    pub fn all(&self) -> &[WagerEvent] {
        &self.events
    }

    /// Events concerning one wager, in order.
    pub fn for_wager(&self, wager_id: &WagerId) -> Vec<&WagerEvent> {
        self.events
            .iter()
            .filter(|e| e.wager_id == *wager_id)
            .collect()
    }

    /// Number of events recorded.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// One JSON object per line, in order.
    pub fn to_json_lines(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&serde_json::to_string(event)?);
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party(s: &str) -> PartyId {
        PartyId::new(s).unwrap()
    }

    fn t() -> Timestamp {
        Timestamp::parse("2026-03-01T12:00:00Z").unwrap()
    }

    #[test]
    fn sequence_numbers_are_dense() {
        let mut log = EventLog::new();
        let w = WagerId::new();
        log.record(
            EventKind::WagerCreated,
            w,
            &party("alice"),
            t(),
            None,
            WagerStatus::Pending,
            vec![ValueMovement::deposit(party("alice"), Amount::new(10))],
            None,
        );
        let second = log.record(
            EventKind::WagerAccepted,
            w,
            &party("bob"),
            t(),
            Some(WagerStatus::Pending),
            WagerStatus::Active,
            vec![ValueMovement::deposit(party("bob"), Amount::new(10))],
            None,
        );
        assert_eq!(second.sequence, 1);
        assert_eq!(log.len(), 2);
        assert_eq!(log.all()[0].sequence, 0);
    }

    #[test]
    fn for_wager_filters() {
        let mut log = EventLog::new();
        let a = WagerId::new();
        let b = WagerId::new();
        for id in [a, b, a] {
            log.record(
                EventKind::WagerCreated,
                id,
                &party("alice"),
                t(),
                None,
                WagerStatus::Pending,
                Vec::new(),
                None,
            );
        }
        let events = log.for_wager(&a);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].sequence, 2);
    }

    #[test]
    fn json_lines_export() {
        let mut log = EventLog::new();
        assert_eq!(log.to_json_lines().unwrap(), "");
        log.record(
            EventKind::WinningsClaimed,
            WagerId::new(),
            &party("bob"),
            t(),
            Some(WagerStatus::Resolved),
            WagerStatus::Claimed,
            vec![ValueMovement::payout(party("bob"), Amount::new(20))],
            Some(false),
        );
        let lines = log.to_json_lines().unwrap();
        assert_eq!(lines.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(lines.trim_end()).unwrap();
        assert_eq!(value["kind"], "WinningsClaimed");
        assert_eq!(value["amounts"][0]["direction"], "Out");
        assert_eq!(value["amounts"][0]["amount"], 20);
        assert_eq!(value["timestamp"], "2026-03-01T12:00:00Z");
        let back: WagerEvent = serde_json::from_str(lines.trim_end()).unwrap();
        assert_eq!(back, log.all()[0]);
    }

    #[test]
    fn kind_names_are_snake_case() {
        assert_eq!(EventKind::UnclaimedFundsSwept.to_string(), "unclaimed_funds_swept");
        assert_eq!(EventKind::SourceTimedOut.as_str(), "source_timed_out");
    }
}
