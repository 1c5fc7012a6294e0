//! End-to-end payment flow tests against the in-memory repository.
//!
//! Exercises the full lifecycle: seed a game, record buy-ins and
//! cash-outs, close it, plan the settlement, record payments, and watch
//! `is_fully_settled` flip once the last debt clears.

use std::sync::Arc;

use chrono::Utc;
use pokernight::db::InMemoryRepository;
use pokernight::game::{Game, GameManager, GameState, LedgerError};
use pokernight::money::Money;
use pokernight::payment::{Payment, PaymentConfig, PaymentError, PaymentManager};
use pokernight::settlement::plan_settlement;

fn cents(units: i64) -> Money {
    Money::from_minor(units)
}

fn game_fixture(id: i64) -> Game {
    Game {
        id,
        group_id: 1,
        stakes: "1/2 NL".to_string(),
        default_buy_in: cents(2500),
        bank_player_id: 1,
        state: GameState::Open,
        started_at: Utc::now(),
        ended_at: None,
    }
}

struct Harness {
    games: GameManager,
    payments: PaymentManager,
}

async fn harness() -> Harness {
    harness_with_tolerance(Money::ZERO).await
}

async fn harness_with_tolerance(tolerance: Money) -> Harness {
    let repo = Arc::new(InMemoryRepository::new());
    repo.insert_game(game_fixture(1)).await;

    let config = PaymentConfig {
        overpayment_tolerance: tolerance,
    };
    Harness {
        games: GameManager::new(repo.clone()),
        payments: PaymentManager::new(repo.clone(), repo, config),
    }
}

/// Play out game 1 so that player 2 owes 500 and player 3 owes 300 to
/// player 1 (the bank).
async fn play_standard_game(h: &Harness) {
    for player in [1, 2, 3] {
        h.games.record_buy_in(1, player, cents(2500)).await.unwrap();
    }
    h.games.record_cash_out(1, 1, cents(3300)).await.unwrap();
    h.games.record_cash_out(1, 2, cents(2000)).await.unwrap();
    h.games.record_cash_out(1, 3, cents(2200)).await.unwrap();
    h.games.close_game(1).await.unwrap();
}

#[tokio::test]
async fn test_full_settlement_flow() {
    let h = harness().await;
    play_standard_game(&h).await;

    // Plan from the game's outstanding balances
    let balances = h.payments.outstanding_balances(1).await.unwrap();
    assert_eq!(balances[&1], cents(800));
    assert_eq!(balances[&2], cents(-500));
    assert_eq!(balances[&3], cents(-300));
    assert!(!h.payments.is_fully_settled(1).await.unwrap());

    let plan = plan_settlement(&balances).unwrap();
    assert_eq!(plan.len(), 2);

    // Pay the plan one transfer at a time, each under a fresh key
    for transfer in &plan {
        assert!(!h.payments.is_fully_settled(1).await.unwrap());
        h.payments
            .record_payment(
                1,
                transfer.from,
                transfer.to,
                transfer.amount,
                Payment::new_idempotency_key(),
            )
            .await
            .unwrap();
    }

    assert!(h.payments.is_fully_settled(1).await.unwrap());
    let balances = h.payments.outstanding_balances(1).await.unwrap();
    assert!(balances.values().all(|b| b.is_zero()));
}

#[tokio::test]
async fn test_partial_payments_accumulate() {
    let h = harness().await;
    play_standard_game(&h).await;

    h.payments
        .record_payment(1, 2, 1, cents(200), "p1".to_string())
        .await
        .unwrap();
    h.payments
        .record_payment(1, 2, 1, cents(300), "p2".to_string())
        .await
        .unwrap();

    let balances = h.payments.outstanding_balances(1).await.unwrap();
    assert_eq!(balances[&2], Money::ZERO);
    assert_eq!(balances[&1], cents(300));
    assert!(!h.payments.is_fully_settled(1).await.unwrap());
}

#[tokio::test]
async fn test_payments_rejected_while_game_open() {
    let h = harness().await;
    h.games.record_buy_in(1, 1, cents(2500)).await.unwrap();
    h.games.record_buy_in(1, 2, cents(2500)).await.unwrap();

    let err = h
        .payments
        .record_payment(1, 2, 1, cents(100), "early".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::GameNotCompleted(1)));
}

#[tokio::test]
async fn test_duplicate_idempotency_key_rejected() {
    let h = harness().await;
    play_standard_game(&h).await;

    h.payments
        .record_payment(1, 2, 1, cents(100), "retry-me".to_string())
        .await
        .unwrap();

    // A network retry resubmits the identical request
    let err = h
        .payments
        .record_payment(1, 2, 1, cents(100), "retry-me".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::DuplicatePayment(_)));

    // Only the first submission was booked
    let balances = h.payments.outstanding_balances(1).await.unwrap();
    assert_eq!(balances[&2], cents(-400));
}

#[tokio::test]
async fn test_overpayment_rejected_and_balances_unchanged() {
    let h = harness().await;
    play_standard_game(&h).await;

    let err = h
        .payments
        .record_payment(1, 2, 1, cents(501), "too-much".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::Overpayment { .. }));

    let balances = h.payments.outstanding_balances(1).await.unwrap();
    assert_eq!(balances[&2], cents(-500));
    assert_eq!(balances[&1], cents(800));
}

#[tokio::test]
async fn test_tolerance_permits_rounding_slack() {
    let h = harness_with_tolerance(cents(5)).await;
    play_standard_game(&h).await;

    // Paying 502 against a 500 debt is within the 5-cent tolerance
    h.payments
        .record_payment(1, 2, 1, cents(502), "rounded-up".to_string())
        .await
        .unwrap();
    let balances = h.payments.outstanding_balances(1).await.unwrap();
    assert_eq!(balances[&2], cents(2));
}

#[tokio::test]
async fn test_close_game_blocks_on_imbalance_via_manager() {
    let h = harness().await;
    h.games.record_buy_in(1, 1, cents(2500)).await.unwrap();
    h.games.record_buy_in(1, 2, cents(2500)).await.unwrap();
    h.games.record_cash_out(1, 1, cents(4000)).await.unwrap();
    h.games.record_cash_out(1, 2, cents(1001)).await.unwrap();

    let err = h.games.close_game(1).await.unwrap_err();
    match err {
        LedgerError::LedgerImbalance { residual, .. } => assert_eq!(residual, cents(1)),
        other => panic!("expected LedgerImbalance, got {other:?}"),
    }

    // Still open: correct the entry and close for real
    h.games.record_cash_out(1, 2, cents(1000)).await.unwrap();
    let game = h.games.close_game(1).await.unwrap();
    assert_eq!(game.state, GameState::Completed);
    assert!(game.ended_at.is_some());
}

#[tokio::test]
async fn test_profit_query_via_manager() {
    let h = harness().await;
    play_standard_game(&h).await;

    assert_eq!(h.games.profit_of(1, 1).await.unwrap(), cents(800));
    assert_eq!(h.games.profit_of(1, 2).await.unwrap(), cents(-500));
    assert!(matches!(
        h.games.profit_of(1, 42).await,
        Err(LedgerError::PlayerNotInGame(42))
    ));
}

#[test]
fn test_fresh_idempotency_keys_are_unique() {
    assert_ne!(
        Payment::new_idempotency_key(),
        Payment::new_idempotency_key()
    );
}

#[tokio::test]
async fn test_unknown_game_fails() {
    let h = harness().await;
    assert!(matches!(
        h.games.record_buy_in(99, 1, cents(100)).await,
        Err(LedgerError::GameNotFound(99))
    ));
}
