//! Session tests - game flow driven through a virtual clock

use blockfall::core::{
    Board, FinalScore, GameSession, ManualScheduler, NullSink, Randomizer, ResetPolicy,
    ScriptedSource, SessionConfig,
};
use blockfall::types::{Color, GameAction, Phase, PieceKind, Timer};

type Session = GameSession<ManualScheduler, Vec<FinalScore>>;

fn scripted(config: SessionConfig, kinds: Vec<PieceKind>) -> Session {
    GameSession::new(config, ManualScheduler::new(), Vec::new())
        .with_source(Box::new(ScriptedSource::new(kinds)))
}

/// Board whose bottom `rows` rows are full except columns 3..7
fn board_with_i_gaps(rows: i32) -> Board {
    let mut board = Board::new(10, 20);
    for y in (20 - rows)..20 {
        for x in (0..3).chain(7..10) {
            board.set(x, y, Some(Color::RED));
        }
    }
    board
}

#[test]
fn test_game_lifecycle() {
    let mut game = scripted(SessionConfig::classic(), vec![PieceKind::T]);
    assert_eq!(game.phase(), Phase::NotStarted);

    assert!(game.apply_action(GameAction::Start));
    assert_eq!(game.phase(), Phase::Running);

    assert!(game.apply_action(GameAction::Pause));
    assert_eq!(game.phase(), Phase::Paused);
    assert!(!game.apply_action(GameAction::MoveLeft));

    assert!(game.apply_action(GameAction::TogglePause));
    assert_eq!(game.phase(), Phase::Running);
    assert!(game.apply_action(GameAction::MoveLeft));
}

#[test]
fn test_gravity_follows_clock() {
    let mut game = scripted(SessionConfig::classic(), vec![PieceKind::S]);
    game.start();

    assert_eq!(game.advance_clock(999), 0);
    assert_eq!(game.active().y, 0);
    assert_eq!(game.advance_clock(1), 1);
    assert_eq!(game.active().y, 1);
    assert_eq!(game.advance_clock(5000), 5);
    assert_eq!(game.active().y, 6);
}

#[test]
fn test_not_started_has_no_gravity() {
    let mut game = scripted(SessionConfig::classic(), vec![PieceKind::S]);
    game.advance_clock(10_000);
    assert_eq!(game.active().y, 0);
    assert_eq!(game.phase(), Phase::NotStarted);
}

#[test]
fn test_levels_speed_up_play() {
    // Four I pieces, each completing one row.
    let mut game = scripted(SessionConfig::classic(), vec![PieceKind::I])
        .with_board(board_with_i_gaps(4));
    game.start();

    let expected = [(2, 500), (3, 333), (4, 250), (5, 200)];
    for (level, interval) in expected {
        while game.move_down() {}
        assert_eq!(game.level(), level);
        assert_eq!(game.drop_interval_ms(), interval);
    }
    assert_eq!(game.score(), 400);
    assert_eq!(game.lines(), 4);
    assert_eq!(game.board().filled_count(), 0);
}

#[test]
fn test_level_is_capped_at_ten() {
    let mut board = Board::new(10, 20);
    for y in 8..20 {
        for x in (0..3).chain(7..10) {
            board.set(x, y, Some(Color::RED));
        }
    }
    let mut game = scripted(SessionConfig::classic(), vec![PieceKind::I]).with_board(board);
    game.start();

    for _ in 0..12 {
        while game.move_down() {}
    }
    assert_eq!(game.lines(), 12);
    assert_eq!(game.score(), 1200);
    assert_eq!(game.level(), 10);
    assert_eq!(game.drop_interval_ms(), 100);
}

#[test]
fn test_vertical_i_clears_four_rows_at_once() {
    let mut board = Board::new(10, 20);
    for y in 16..20 {
        for x in 0..9 {
            board.set(x, y, Some(Color::GREEN));
        }
    }
    let mut game = scripted(SessionConfig::classic(), vec![PieceKind::I]).with_board(board);
    game.start();

    assert!(game.rotate());
    while game.move_right() {}
    assert_eq!(game.active().x, 9);
    while game.move_down() {}

    let event = game.take_last_event().unwrap();
    assert_eq!(event.lines_cleared, 4);
    assert_eq!(event.score_delta, 400);
    assert_eq!(game.level(), 5);
    assert_eq!(game.board().filled_count(), 0);
}

#[test]
fn test_game_over_submits_once_and_stops_timers() {
    let mut game = scripted(SessionConfig::classic(), vec![PieceKind::O]);
    game.start();
    game.set_fast_drop(true);

    // Fast drop alone stacks squares until one locks on the top row.
    game.advance_clock(60_000);

    assert_eq!(game.phase(), Phase::GameOver);
    assert!(!game.fast_drop());
    assert_eq!(game.scheduler().pending_count(), 0);
    assert!(!game.is_timer_armed(Timer::Drop));
    assert!(!game.is_timer_armed(Timer::FastDrop));
    assert_eq!(
        game.sink().as_slice(),
        &[FinalScore {
            player: "playerOne".to_string(),
            score: 0,
            level: 1,
            lines: 0,
        }]
    );

    game.advance_clock(60_000);
    assert_eq!(game.sink().len(), 1);
}

#[test]
fn test_reset_after_game_over_starts_new_episode() {
    let mut game = scripted(SessionConfig::classic(), vec![PieceKind::O]);
    game.start();
    game.set_fast_drop(true);
    game.advance_clock(60_000);
    assert!(game.phase().is_over());

    assert!(game.apply_action(GameAction::Reset));
    assert_eq!(game.phase(), Phase::Running);
    assert_eq!(game.episode_id(), 1);
    assert_eq!(game.board().filled_count(), 0);

    let y = game.active().y;
    game.advance_clock(1000);
    assert_eq!(game.active().y, y + 1);
}

#[test]
fn test_reset_policy_not_started() {
    let config = SessionConfig {
        reset_policy: ResetPolicy::NotStarted,
        ..SessionConfig::classic()
    };
    let mut game = scripted(config, vec![PieceKind::L]);
    game.start();
    game.advance_clock(2000);

    game.reset();
    assert_eq!(game.phase(), Phase::NotStarted);
    game.advance_clock(5000);
    assert_eq!(game.active().y, 0);
}

#[test]
fn test_pause_keeps_level_interval() {
    let mut game = scripted(SessionConfig::classic(), vec![PieceKind::I])
        .with_board(board_with_i_gaps(2));
    game.start();
    while game.move_down() {}
    while game.move_down() {}
    assert_eq!(game.drop_interval_ms(), 333);

    game.pause();
    game.advance_clock(10_000);
    game.resume();

    let y = game.active().y;
    game.advance_clock(333);
    assert_eq!(game.active().y, y + 1);
}

#[test]
fn test_fast_drop_runs_alongside_gravity() {
    let mut game = scripted(SessionConfig::classic(), vec![PieceKind::J]);
    game.start();
    game.advance_clock(500);

    assert!(game.apply_action(GameAction::FastDropOn));
    assert_eq!(game.active().y, 1);

    // 500..1000: fast drops at 600..1000 plus the gravity tick at 1000.
    game.advance_clock(500);
    assert_eq!(game.active().y, 7);

    assert!(game.apply_action(GameAction::FastDropOff));
    assert!(!game.apply_action(GameAction::FastDropOff));
    game.advance_clock(1000);
    assert_eq!(game.active().y, 8);
}

#[test]
fn test_wide_layout_plays() {
    let config = SessionConfig {
        randomizer: Randomizer::Bag,
        seed: 5,
        ..SessionConfig::wide()
    };
    let mut game = GameSession::new(config, ManualScheduler::new(), NullSink);
    game.start();
    assert_eq!(game.active().x, 6);
    assert_eq!(game.snapshot().cells.len(), 15 * 30);

    while game.move_down() {}
    assert_eq!(game.pieces_spawned(), 2);
    assert_eq!(game.board().filled_count(), 4);
}

#[test]
fn test_same_seed_same_game() {
    let play = || {
        let config = SessionConfig {
            seed: 31337,
            ..SessionConfig::classic()
        };
        let mut game = GameSession::new(config, ManualScheduler::new(), NullSink);
        game.start();
        let mut kinds = Vec::new();
        for _ in 0..6 {
            kinds.push(game.active().kind);
            while game.move_down() {}
        }
        (kinds, game.snapshot())
    };

    assert_eq!(play(), play());
}
