//! Replay capture and playback tests.
//!
//! Games are played to the end with scanning bots on the caller's thread,
//! then frozen and stepped through with a cursor.

use std::sync::Arc;

use chrono::Utc;
use dice_territory::bot::{MovePolicy, ScanningBot};
use dice_territory::core::{Extent, Move, Participant, PerPlayer, Rect};
use dice_territory::map::TerritoryView;
use dice_territory::replay::{Replay, ReplayBase};
use dice_territory::rules::GameMode;
use dice_territory::session::{GameSession, SessionBuilder, SessionIdCounter};

fn finished_game(seed: u64, mode: GameMode) -> GameSession {
    let mut session = SessionBuilder::new()
        .seed(seed)
        .mode(mode)
        .skip_limit(3)
        .id_counter(Arc::new(SessionIdCounter::new()))
        .build()
        .unwrap();
    let mut bots = [ScanningBot::new(Participant::Creator), ScanningBot::new(Participant::Client)];

    session.start();
    while session.is_running() {
        for bot in &mut bots {
            bot.play_turn(&mut session);
        }
    }
    session
}

fn rebuild(replay: &Replay) -> Result<Replay, dice_territory::Error> {
    let mut base = ReplayBase::new(replay.id(), replay.ended_at()).with_name(replay.name());
    base.set_start_position(
        replay.map_size(),
        replay.start_rect(Participant::Creator),
        replay.start_rect(Participant::Client),
    )?;
    Replay::construct(base, replay.rule(), replay.moves().iter().copied().collect())
}

/// Stepping forward one move at a time matches a direct rebuild.
#[test]
fn test_stepping_matches_show_move() {
    let session = finished_game(7, GameMode::StreakRule);
    let replay = session.create_replay().unwrap();

    let mut stepped = replay.cursor();
    while stepped.next() {}

    let mut direct = replay.cursor();
    direct.show_move(replay.len() - 1);

    assert_eq!(stepped.position(), direct.position());
    assert_eq!(stepped.grid(), direct.grid());
    assert_eq!(stepped.grid(), session.map().grid());
    assert_eq!(stepped.areas(), session.areas());
}

/// Every intermediate board agrees between stepping and rebuilding.
#[test]
fn test_every_position_consistent() {
    let replay = finished_game(13, GameMode::AccumulationRule).create_replay().unwrap();
    let mut stepped = replay.cursor();
    let mut direct = replay.cursor();

    for index in 1..replay.len() {
        assert!(stepped.next());
        direct.show_move(index);
        assert_eq!(stepped.grid(), direct.grid(), "diverged at half-move {index}");

        let m = replay.get(index).unwrap();
        assert_eq!(stepped.areas(), PerPlayer::new(m.creator_points, m.client_points));
    }
}

/// Stepping back to the start restores the initial board.
#[test]
fn test_previous_undoes_everything() {
    let replay = finished_game(3, GameMode::StreakRule).create_replay().unwrap();
    let mut cursor = replay.cursor();
    cursor.to_end();

    while cursor.previous() {}
    assert_eq!(cursor.position(), 0);
    assert_eq!(cursor.grid(), replay.initial_map().grid());
    assert_eq!(cursor.areas(), replay.initial_map().areas());
}

/// The replay starts from the start rectangles, not the final board.
#[test]
fn test_replay_initial_board() {
    let session = finished_game(5, GameMode::StreakRule);
    let replay = session.create_replay().unwrap();

    assert_eq!(replay.get(0), Some(Move::EMPTY));
    assert_eq!(replay.len(), session.moves().len() + 1);
    assert_eq!(replay.start_rects(), session.map().start_rects());
    assert_eq!(
        replay.initial_map().claimed(),
        replay.start_points(Participant::Creator) + replay.start_points(Participant::Client)
    );
    assert_eq!(replay.final_areas(), session.areas());
    assert_eq!(replay.id(), session.id());
}

/// A replay rebuilt from its parts validates and matches.
#[test]
fn test_construct_from_parts() {
    let replay = finished_game(17, GameMode::StreakRule).create_replay().unwrap();
    let rebuilt = rebuild(&replay).unwrap();

    assert_eq!(rebuilt, replay);
}

/// Corrupted persisted moves are rejected as a whole.
#[test]
fn test_construct_rejects_corruption() {
    let replay = finished_game(19, GameMode::StreakRule).create_replay().unwrap();
    let placed = replay
        .moves()
        .iter()
        .position(|m| !m.skipped && !m.is_sentinel())
        .expect("bots place at least once");

    let mut base = ReplayBase::new("corrupt", Utc::now());
    base.set_start_position(
        replay.map_size(),
        replay.start_rect(Participant::Creator),
        replay.start_rect(Participant::Client),
    )
    .unwrap();

    let mut moves: Vec<Move> = replay.moves().iter().copied().collect();
    // Hand the placement to the other participant
    moves[placed].player = moves[placed].player.map(Participant::opponent);

    let err = Replay::construct(base, replay.rule(), moves).unwrap_err();
    assert!(err.is_invalid_data());
}

/// Start rectangles must sit in their corners.
#[test]
fn test_base_rejects_shifted_start() {
    let mut base = ReplayBase::new("shifted", Utc::now());
    let err = base
        .set_start_position(Extent::new(20, 20), Rect::new(14, 15, 5, 5), Rect::new(0, 0, 3, 4))
        .unwrap_err();

    assert!(err.is_invalid_data());
    assert!(!base.is_start_position_set());
}
