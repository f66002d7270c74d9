//! Shared fixture for the cross-crate suites: one engine over in-memory
//! balances, a manual clock, and a manual-report source routed through
//! the registry.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Duration;
use wager_core::{Amount, AssetId, BindingId, ManualClock, PartyId, Timestamp, WagerId};
use wager_engine::{CreateWager, ProtocolConfig, ResolutionEngine};
use wager_escrow::{InMemoryTransfer, ResolutionConfig};
use wager_source::{ManualReportSource, OutcomeSourceRegistry};

/// One whole unit of a six-decimal asset.
pub const UNIT: u64 = 1_000_000;

/// Every named party starts with this many units.
pub const OPENING_BALANCE: u64 = 100 * UNIT;

pub const PARTIES: [&str; 4] = ["alice", "bob", "carol", "mallory"];

pub fn party(name: &str) -> PartyId {
    PartyId::new(name).unwrap()
}

pub fn usdc() -> AssetId {
    AssetId::new("USDC").unwrap()
}

pub fn t0() -> Timestamp {
    Timestamp::parse("2026-06-01T00:00:00Z").unwrap()
}

pub fn at(offset: Duration) -> Timestamp {
    t0().checked_add(offset).unwrap()
}

pub fn binding() -> BindingId {
    BindingId::new("feed:btc-usd-above-150k").unwrap()
}

pub struct World {
    pub engine: ResolutionEngine<InMemoryTransfer>,
    pub clock: ManualClock,
    pub feed: Arc<ManualReportSource>,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(ProtocolConfig::default())
    }

    pub fn with_config(config: ProtocolConfig) -> Self {
        let clock = ManualClock::new(t0());
        let feed = Arc::new(ManualReportSource::new());
        feed.define(binding(), "BTC above 150k on June 8", at(Duration::days(7)))
            .unwrap();
        let registry = Arc::new(OutcomeSourceRegistry::new());
        registry.register_source("manual", feed.clone()).unwrap();
        registry.bind(binding(), "manual").unwrap();

        let mut transfer = InMemoryTransfer::new();
        for name in PARTIES {
            transfer.fund(&party(name), &usdc(), Amount::new(OPENING_BALANCE));
        }
        let engine =
            ResolutionEngine::new(config, transfer, Arc::new(clock.clone()), registry).unwrap();
        Self {
            engine,
            clock,
            feed,
        }
    }

    /// Alice offers `stake` to Bob, accepting before tomorrow; outcome
    /// expected a week out.
    pub fn offer(&mut self, resolution: ResolutionConfig, stake: u64) -> WagerId {
        let now = self.clock_now();
        let request = CreateWager::new(
            party("bob"),
            Amount::new(stake),
            usdc(),
            "BTC closes above 150k on June 8",
            resolution,
            now.checked_add(Duration::days(1)).unwrap(),
            now.checked_add(Duration::days(7)).unwrap(),
        );
        self.engine.create_wager(&party("alice"), request).unwrap()
    }

    /// An offered and accepted wager.
    pub fn open(&mut self, resolution: ResolutionConfig, stake: u64) -> WagerId {
        let id = self.offer(resolution, stake);
        self.engine
            .accept_wager(&party("bob"), id, Amount::new(stake))
            .unwrap();
        id
    }

    pub fn clock_now(&self) -> Timestamp {
        use wager_core::Clock;
        self.clock.now()
    }

    pub fn balance(&self, name: &str) -> u128 {
        self.engine.transfer().balance(&party(name), &usdc())
    }

    /// Value outside custody plus value inside it.
    pub fn supply(&self) -> u128 {
        self.engine.transfer().total_supply(&usdc()) + self.engine.total_held(&usdc())
    }
}
