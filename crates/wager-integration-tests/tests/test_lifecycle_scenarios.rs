//! End-to-end lifecycle scenarios across ledger, vault, sources, engine,
//! and settlement. Amounts are in six-decimal base units.

mod common;

use chrono::Duration;
use common::{at, binding, party, World, OPENING_BALANCE, UNIT};
use wager_core::{Amount, PartyId};
use wager_engine::{EventKind, ProtocolConfig};
use wager_escrow::{ResolutionConfig, ResolutionType, WagerStatus};

fn kinds(world: &World, id: &wager_core::WagerId) -> Vec<EventKind> {
    world
        .engine
        .events()
        .for_wager(id)
        .iter()
        .map(|e| e.kind)
        .collect()
}

#[test]
fn uncontested_self_report_pays_creator() {
    let mut world = World::new();
    let id = world.open(
        ResolutionConfig::self_report(ResolutionType::EitherResolves),
        UNIT,
    );

    world
        .engine
        .propose_resolution(&party("alice"), id, true)
        .unwrap();
    world
        .clock
        .set(at(Duration::hours(24) + Duration::seconds(1)));
    world
        .engine
        .finalize_resolution(&party("mallory"), id)
        .unwrap();

    let breakdown = world.engine.claim_winnings(&party("alice"), id).unwrap();
    assert_eq!(breakdown.winner_amount, Amount::new(2 * UNIT));
    assert_eq!(breakdown.fee, Amount::ZERO);
    assert_eq!(world.balance("alice"), u128::from(OPENING_BALANCE + UNIT));
    assert_eq!(world.balance("bob"), u128::from(OPENING_BALANCE - UNIT));

    let wager = world.engine.get_wager(&id).unwrap();
    assert_eq!(wager.status, WagerStatus::Claimed);
    assert!(wager.claimed);
    assert_eq!(
        kinds(&world, &id),
        vec![
            EventKind::WagerCreated,
            EventKind::WagerAccepted,
            EventKind::ResolutionProposed,
            EventKind::ResolutionFinalized,
            EventKind::WinningsClaimed,
        ]
    );
}

#[test]
fn overturned_proposal_returns_bond_to_challenger() {
    let bond = UNIT / 10;
    let mut world = World::with_config(ProtocolConfig {
        minimum_challenge_bond: Amount::new(bond),
        ..ProtocolConfig::default()
    });
    let id = world.open(
        ResolutionConfig::self_report(ResolutionType::EitherResolves)
            .with_arbitrator(party("carol"), 0),
        UNIT,
    );

    world
        .engine
        .propose_resolution(&party("alice"), id, true)
        .unwrap();
    world.clock.set(at(Duration::hours(12)));
    world
        .engine
        .challenge_resolution(&party("bob"), id, Amount::new(bond))
        .unwrap();
    assert_eq!(world.engine.held(&id), Amount::new(2 * UNIT + bond));

    world.clock.set(at(Duration::hours(30)));
    world
        .engine
        .resolve_dispute(&party("carol"), id, false)
        .unwrap();
    let wager = world.engine.get_wager(&id).unwrap();
    assert_eq!(wager.status, WagerStatus::Resolved);
    assert_eq!(wager.winner, Some(party("bob")));
    assert_eq!(wager.resolved_at, Some(at(Duration::hours(30))));
    assert_eq!(world.engine.held(&id), Amount::new(2 * UNIT));

    world.engine.claim_winnings(&party("bob"), id).unwrap();
    assert_eq!(world.balance("bob"), u128::from(OPENING_BALANCE + UNIT));
    assert_eq!(world.balance("alice"), u128::from(OPENING_BALANCE - UNIT));
    assert_eq!(
        world.engine.get_wager(&id).unwrap().status,
        WagerStatus::Claimed
    );
}

#[test]
fn silent_source_unwinds_by_mutual_refund() {
    let mut world = World::new();
    let id = world.open(ResolutionConfig::external(binding()), UNIT);
    assert_eq!(
        world.engine.get_wager(&id).unwrap().expected_resolution_time,
        at(Duration::days(7))
    );

    world
        .clock
        .set(at(Duration::days(37) + Duration::seconds(1)));
    world
        .engine
        .trigger_source_timeout(&party("mallory"), id)
        .unwrap();
    world
        .engine
        .accept_mutual_refund(&party("bob"), id)
        .unwrap();
    world
        .engine
        .accept_mutual_refund(&party("alice"), id)
        .unwrap();

    assert_eq!(
        world.engine.get_wager(&id).unwrap().status,
        WagerStatus::Refunded
    );
    assert_eq!(world.balance("alice"), u128::from(OPENING_BALANCE));
    assert_eq!(world.balance("bob"), u128::from(OPENING_BALANCE));
    assert_eq!(world.engine.held(&id), Amount::ZERO);
}

#[test]
fn unclaimed_pot_is_swept_to_treasury() {
    let mut world = World::new();
    let id = world.open(
        ResolutionConfig::self_report(ResolutionType::CreatorResolves),
        UNIT,
    );
    world
        .engine
        .propose_resolution(&party("alice"), id, true)
        .unwrap();
    world.clock.set(at(Duration::days(1)));
    world
        .engine
        .finalize_resolution(&party("bob"), id)
        .unwrap();
    let resolved_at = world.engine.get_wager(&id).unwrap().resolved_at.unwrap();

    world.clock.set(
        resolved_at
            .checked_add(Duration::days(90) + Duration::seconds(1))
            .unwrap(),
    );
    let swept = world
        .engine
        .sweep_unclaimed_funds(&party("mallory"), id)
        .unwrap();
    assert_eq!(swept, Amount::new(2 * UNIT));
    assert_eq!(
        world
            .engine
            .transfer()
            .balance(&PartyId::treasury(), &common::usdc()),
        u128::from(2 * UNIT)
    );

    let err = world.engine.claim_winnings(&party("alice"), id).unwrap_err();
    assert_eq!(err.kind(), wager_engine::ErrorKind::Precondition);
    let wager = world.engine.get_wager(&id).unwrap();
    assert_eq!(wager.status, WagerStatus::Swept);
    assert!(!wager.claimed);
}

#[test]
fn arbitrator_fee_comes_off_the_top() {
    let mut world = World::new();
    let id = world.open(ResolutionConfig::arbitrated(party("carol"), 500), 5 * UNIT);

    world
        .engine
        .propose_resolution(&party("carol"), id, false)
        .unwrap();
    world.clock.set(at(Duration::hours(24)));
    world
        .engine
        .finalize_resolution(&party("alice"), id)
        .unwrap();

    let breakdown = world.engine.claim_winnings(&party("bob"), id).unwrap();
    assert_eq!(breakdown.fee, Amount::new(UNIT / 2));
    assert_eq!(breakdown.winner_amount, Amount::new(9 * UNIT + UNIT / 2));
    assert_eq!(
        world.balance("carol"),
        u128::from(OPENING_BALANCE + UNIT / 2)
    );
    assert_eq!(
        world.balance("bob"),
        u128::from(OPENING_BALANCE - 5 * UNIT + 9 * UNIT + UNIT / 2)
    );
}

#[test]
fn arbitrator_upholding_its_own_proposal_forwards_bond_to_winner() {
    let bond = 1_000;
    let mut world = World::new();
    let id = world.open(ResolutionConfig::arbitrated(party("carol"), 0), UNIT);

    world
        .engine
        .propose_resolution(&party("carol"), id, true)
        .unwrap();
    world
        .engine
        .challenge_resolution(&party("bob"), id, Amount::new(bond))
        .unwrap();
    world
        .engine
        .resolve_dispute(&party("carol"), id, true)
        .unwrap();

    assert_eq!(world.balance("carol"), u128::from(OPENING_BALANCE));
    assert_eq!(world.balance("alice"), u128::from(OPENING_BALANCE - UNIT + bond));
    assert_eq!(world.balance("bob"), u128::from(OPENING_BALANCE - UNIT - bond));
    assert_eq!(world.engine.held(&id), Amount::new(2 * UNIT));
}
