//! Integration tests for the Mancala engine.
//!
//! These tests verify complete game flows from a fresh board through to the
//! final settlement.

use mancala_core::*;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Play a list of pits, failing the test on the first rejected move
fn play(game: &mut GameState, pits: &[i64]) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for (turn, &pit) in pits.iter().enumerate() {
        let moved = game
            .apply_move(pit)
            .unwrap_or_else(|e| panic!("move {} (pit {}) rejected: {}", turn + 1, pit, e));
        events.extend(moved);
    }
    events
}

/// Play random legal moves until the game ends
fn random_playout(seed: u64, initial_stones: u32) -> GameState {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = GameState::new(initial_stones);
    let total = game.total_stones();
    let mut iterations = 0;
    let max_iterations = 10_000;

    while !game.is_finished() && iterations < max_iterations {
        let legal = game.legal_pits();
        let pit = *legal.choose(&mut rng).expect("unfinished game has a legal pit");
        let mover = game.current_player.unwrap_or(if pit < STORE_A {
            Player::A
        } else {
            Player::B
        });
        let opponent_store_before = game.store(mover.opponent());

        let events = game.apply_move(pit as i64).unwrap();

        assert_eq!(game.total_stones(), total, "seed {seed}: stones not conserved");
        if !matches!(events.last(), Some(GameEvent::GameFinished { .. })) {
            assert_eq!(
                game.store(mover.opponent()),
                opponent_store_before,
                "seed {seed}: sowing touched the opponent's store"
            );
        }
        iterations += 1;
    }

    assert!(
        game.is_finished(),
        "Game should finish within {} moves",
        max_iterations
    );
    game
}

#[test]
fn test_create_fills_small_pits() {
    let game = GameState::new(6);

    for position in 1..=14 {
        let expected = if position == STORE_A || position == STORE_B {
            0
        } else {
            6
        };
        assert_eq!(game.stones(position), expected, "position {position}");
    }
    assert_eq!(game.phase, GamePhase::Created);
    assert_eq!(game.current_player, None);
}

#[test]
fn test_first_move_sows_through_own_store() {
    let mut game = GameState::new(6);
    let events = play(&mut game, &[2]);

    assert_eq!(
        game.board.counts(),
        &[6, 0, 7, 7, 7, 7, 1, 7, 6, 6, 6, 6, 6, 0]
    );
    assert_eq!(game.phase, GamePhase::InProgress);
    // The sixth stone lands on pit 8, so the turn passes
    assert_eq!(game.current_player, Some(Player::B));
    assert_eq!(
        events,
        vec![
            GameEvent::StonesSown {
                player: Player::A,
                pit: 2,
                stones: 6,
                last_position: 8,
            },
            GameEvent::TurnPassed {
                from: Player::A,
                to: Player::B,
            },
        ]
    );
    assert_eq!(events[0].player(), Some(Player::A));
}

#[test]
fn test_second_move_must_follow_turn() {
    let mut game = GameState::new(6);
    play(&mut game, &[2]);

    assert_eq!(
        game.apply_move(3),
        Err(GameError::IllegalMove(IllegalMove::NotYourTurn))
    );
    play(&mut game, &[13]);
}

#[test]
fn test_capture_fixture() {
    let mut game = GameState::with_pits(
        [1, 0, 4, 5, 4, 3, 5, 8, 7, 11, 8, 9, 7, 0],
        Some(Player::A),
        GamePhase::InProgress,
    );
    let events = play(&mut game, &[1]);

    assert_eq!(game.stones(1), 0);
    assert_eq!(game.stones(2), 0);
    assert_eq!(game.stones(12), 0);
    assert_eq!(game.stones(13), 7);
    assert_eq!(game.store(Player::A), 15);
    assert_eq!(game.current_player, Some(Player::B));
    assert!(events.contains(&GameEvent::Captured {
        player: Player::A,
        pit: 2,
        opposite_pit: 12,
        stones: 10,
    }));
}

#[test]
fn test_finishing_move_sweeps_board() {
    let mut game = GameState::with_pits(
        [0, 0, 0, 0, 0, 1, 19, 8, 7, 10, 8, 9, 7, 3],
        Some(Player::A),
        GamePhase::InProgress,
    );
    let total = game.total_stones();
    let events = play(&mut game, &[6]);

    for player in Player::ALL {
        for pit in player.pits() {
            assert_eq!(game.stones(pit), 0, "pit {pit}");
        }
    }
    assert_eq!(game.store(Player::A), 20);
    assert_eq!(game.store(Player::B), 52);
    assert_eq!(game.store(Player::A) + game.store(Player::B), total);
    assert_eq!(game.phase, GamePhase::WonB);
    assert_eq!(game.winner(), Some(Player::B));
    assert_eq!(
        events.last(),
        Some(&GameEvent::GameFinished {
            phase: GamePhase::WonB,
            store_a: 20,
            store_b: 52,
        })
    );
}

#[test]
fn test_finished_game_rejects_moves() {
    let mut game = GameState::with_pits(
        [0, 0, 0, 0, 0, 1, 19, 8, 7, 10, 8, 9, 7, 3],
        Some(Player::A),
        GamePhase::InProgress,
    );
    play(&mut game, &[6]);
    let finished = game.clone();

    for pit in [1, 6, 8, 13, 0, 7] {
        assert_eq!(
            game.apply_move(pit),
            Err(GameError::FinishedGame {
                store_a: 20,
                store_b: 52,
                phase: GamePhase::WonB,
            })
        );
    }
    assert_eq!(game, finished);
}

#[test]
fn test_illegal_selections() {
    let mut game = GameState::new(6);
    let fresh = game.clone();

    for pit in [0, 15, -3, i64::from(i32::MAX)] {
        assert_eq!(
            game.apply_move(pit),
            Err(GameError::IllegalMove(IllegalMove::OutOfRange))
        );
    }
    for pit in [7, 14] {
        assert_eq!(
            game.apply_move(pit),
            Err(GameError::IllegalMove(IllegalMove::FromStore))
        );
    }
    assert_eq!(game, fresh);
}

#[test]
fn test_recorded_game_won_by_b() {
    let mut game = GameState::new(6);
    play(
        &mut game,
        &[
            2, 13, 3, 11, 4, 10, 1, 13, 5, 9, 1, 12, 2, 8, 3, 11, 4, 10, 5, 9, 1, 12, 2, 3, 8, 4,
            9, 6, 13, 5, 10, 1, 9, 2, 11, 4, 12, 1, 13, 1, 10, 2, 3, 8, 9, 4, 10, 5, 8, 6,
        ],
    );

    assert_eq!(game.store(Player::A), 18);
    assert_eq!(game.store(Player::B), 54);
    assert_eq!(game.phase, GamePhase::WonB);
}

#[test]
fn test_recorded_game_won_by_a() {
    let mut game = GameState::new(6);
    play(
        &mut game,
        &[
            8, 9, 6, 9, 3, 10, 2, 11, 4, 12, 1, 13, 3, 9, 2, 1, 8, 1, 9, 2, 13, 3, 1, 11, 1, 13,
            12, 2, 13, 10, 1, 11, 2, 12, 13,
        ],
    );

    assert_eq!(game.store(Player::A), 57);
    assert_eq!(game.store(Player::B), 15);
    assert_eq!(game.phase, GamePhase::WonA);
}

#[test]
fn test_random_playouts_conserve_stones() {
    for seed in 0..50 {
        let stones = 1 + (seed % 6) as u32;
        let game = random_playout(seed, stones);

        assert!(game.phase.is_terminal());
        assert_eq!(game.side_stones(Player::A), 0);
        assert_eq!(game.side_stones(Player::B), 0);
        assert_eq!(
            game.store(Player::A) + game.store(Player::B),
            12 * stones,
            "seed {seed}"
        );

        let expected = match game.store(Player::A).cmp(&game.store(Player::B)) {
            std::cmp::Ordering::Greater => GamePhase::WonA,
            std::cmp::Ordering::Less => GamePhase::WonB,
            std::cmp::Ordering::Equal => GamePhase::Tied,
        };
        assert_eq!(game.phase, expected, "seed {seed}");
    }
}

#[test]
fn test_state_round_trips_through_json() {
    let mut game = GameState::new(4);
    play(&mut game, &[3, 1]);

    let json = serde_json::to_string(&game).unwrap();
    let restored: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, game);
}
