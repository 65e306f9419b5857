//! Property-based tests for LedgerEngine.
//!
//! - Property 1: Funding accumulates exactly
//! - Property 2: Take never drains an account
//! - Property 3: Joins move exactly the collected contributions
//! - Property 4: Settlement pays the leader
//! - Property 5: A backed settlement splits the pot in equal shares

use proptest::prelude::*;

use backer_shared::{PlayerId, Points, TournamentId};

use super::engine::LedgerEngine;
use super::funding::{entry_contribution, prize_share};

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

/// Strategy for positive point amounts small enough to never overflow.
fn points() -> impl Strategy<Value = Points> {
    1i64..1_000_000i64
}

fn player(index: usize) -> PlayerId {
    PlayerId::new(format!("P{index}"))
}

async fn total_balance(engine: &LedgerEngine, players: usize) -> Points {
    let mut total = 0;
    for index in 0..players {
        total += engine.balance(&player(index)).await.unwrap();
    }
    total
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 1: Balance after repeated funding equals the sum funded.
    #[test]
    fn prop_fund_accumulates(amounts in prop::collection::vec(points(), 1..20)) {
        let balance = block_on(async {
            let engine = LedgerEngine::in_memory();
            for amount in &amounts {
                engine.fund(&player(0), *amount).await.unwrap();
            }
            engine.balance(&player(0)).await.unwrap()
        });
        prop_assert_eq!(balance, amounts.iter().sum::<Points>());
    }

    /// Property 2: A take succeeds iff it leaves a positive balance.
    #[test]
    fn prop_take_keeps_balance_positive(funded in points(), taken in points()) {
        let (result, balance) = block_on(async {
            let engine = LedgerEngine::in_memory();
            engine.fund(&player(0), funded).await.unwrap();
            let result = engine.take(&player(0), taken).await;
            (result, engine.balance(&player(0)).await.unwrap())
        });

        if taken < funded {
            prop_assert!(result.is_ok());
            prop_assert_eq!(balance, funded - taken);
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(balance, funded);
        }
        prop_assert!(balance > 0);
    }

    /// Property 3: A backed join debits one contribution from each
    /// participant and nothing else.
    #[test]
    fn prop_join_debits_contributions(
        deposit in points(),
        balances in prop::collection::vec(points(), 1..6),
    ) {
        let players = balances.len();
        let backers: Vec<PlayerId> = (1..players).map(player).collect();
        let (joined, before, after) = block_on(async {
            let engine = LedgerEngine::in_memory();
            for (index, amount) in balances.iter().enumerate() {
                engine.fund(&player(index), *amount).await.unwrap();
            }
            engine.announce_tournament(TournamentId(1), deposit).await.unwrap();
            let before = total_balance(&engine, players).await;
            let joined = engine
                .join_tournament(TournamentId(1), &player(0), &backers)
                .await
                .is_ok();
            (joined, before, total_balance(&engine, players).await)
        });

        let contribution = entry_contribution(deposit, backers.len());
        if joined {
            let heads = Points::try_from(players).unwrap();
            prop_assert_eq!(before - after, contribution * heads);
            prop_assert!(balances[0] >= contribution);
            prop_assert!(balances[1..].iter().all(|b| *b > contribution));
        } else {
            prop_assert_eq!(before, after);
        }
    }

    /// Property 4: The winner is the first joiner with the highest balance
    /// and an unbacked winner is credited the whole pot.
    #[test]
    fn prop_settlement_pays_leader(
        deposit in 1i64..10_000i64,
        extras in prop::collection::vec(0i64..10_000i64, 1..6),
    ) {
        let entrants = extras.len();
        let (winner, before, after) = block_on(async {
            let engine = LedgerEngine::in_memory();
            for (index, extra) in extras.iter().enumerate() {
                engine.fund(&player(index), deposit + extra).await.unwrap();
                engine.fund(&player(index), 1).await.unwrap();
            }
            engine.announce_tournament(TournamentId(1), deposit).await.unwrap();
            for index in 0..entrants {
                engine.join_tournament(TournamentId(1), &player(index), &[]).await.unwrap();
            }
            let before = total_balance(&engine, entrants).await;
            let winner = engine.result_tournament().await.unwrap().unwrap();
            (winner, before, total_balance(&engine, entrants).await)
        });

        let best = extras.iter().copied().max().unwrap();
        let first_best = extras.iter().position(|e| *e == best).unwrap();
        let pot = deposit * Points::try_from(entrants).unwrap();
        prop_assert_eq!(winner.player_id, player(first_best));
        prop_assert_eq!(winner.prize, pot);
        prop_assert_eq!(after - before, prize_share(pot, 0));
    }

    /// Property 5: A backed winner and each of their backers gain exactly
    /// one floor share of the pot.
    #[test]
    fn prop_backed_settlement_splits_pot(
        deposit in 1i64..10_000i64,
        backers in 1usize..5,
        extras in prop::collection::vec(0i64..10_000i64, 5),
    ) {
        let contribution = entry_contribution(deposit, backers);
        let rival = backers + 1;
        let (winner, gains) = block_on(async {
            let engine = LedgerEngine::in_memory();
            // Winner keeps at least one point after paying, the rival ends at zero
            engine.fund(&player(0), contribution + 1).await.unwrap();
            for index in 1..=backers {
                engine.fund(&player(index), contribution + 1 + extras[index - 1]).await.unwrap();
            }
            engine.fund(&player(rival), deposit).await.unwrap();

            engine.announce_tournament(TournamentId(1), deposit).await.unwrap();
            engine.join_tournament(TournamentId(1), &player(rival), &[]).await.unwrap();
            let backer_ids: Vec<PlayerId> = (1..=backers).map(player).collect();
            engine.join_tournament(TournamentId(1), &player(0), &backer_ids).await.unwrap();

            let mut before = Vec::new();
            for index in 0..=backers {
                before.push(engine.balance(&player(index)).await.unwrap());
            }
            let winner = engine.result_tournament().await.unwrap().unwrap();
            let mut gains = Vec::new();
            for (index, old) in before.into_iter().enumerate() {
                gains.push(engine.balance(&player(index)).await.unwrap() - old);
            }
            (winner, gains)
        });

        let pot = deposit * 2;
        prop_assert_eq!(winner.player_id, player(0));
        prop_assert_eq!(winner.prize, pot);
        prop_assert!(gains.iter().all(|gain| *gain == prize_share(pot, backers)));
    }
}
