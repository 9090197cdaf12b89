//! Integration tests for faction-go
//!
//! Faction scenarios, plus properties of the move generator checked over
//! seeded random positions.

use faction_go::analysis::{Analysis, EyeCount, disputed_territory, simulate_move};
use faction_go::board::{Board, Cell, Color};
use faction_go::config::PacingConfig;
use faction_go::game::{BoardState, Opponent, Play};
use faction_go::moves::{MoveOptions, eye_creation_moves};
use faction_go::pacing::Pacer;
use faction_go::patterns::{neighborhood, patterns, symmetries, template_matches};
use faction_go::personality::get_move;
use faction_go::roll::FixedRoll;

// =============================================================================
// Helpers
// =============================================================================

fn pacer() -> Pacer {
    Pacer::new(PacingConfig::instant())
}

const CAPTURE: [&str; 5] = ["XO...", ".....", ".....", ".....", "....."];
const DEFEND: [&str; 5] = ["OX...", ".....", ".....", ".....", "....."];
const EYE: [&str; 7] = [
    "...O...", "OOOO...", ".......", ".......", ".......", ".......", ".......",
];

/// A 7x7 board with stones scattered at random.
fn random_board(rng: &mut fastrand::Rng) -> Board {
    let rows: Vec<String> = (0..7)
        .map(|_| {
            (0..7)
                .map(|_| match rng.u8(0..10) {
                    0..=2 => 'X',
                    3..=5 => 'O',
                    _ => '.',
                })
                .collect()
        })
        .collect();
    Board::from_rows(&rows).unwrap()
}

fn stones(board: &Board, color: Color) -> usize {
    board.points().filter(|&pt| board.stone(pt) == Some(color)).count()
}

async fn choose(rows: &[&str], opponent: Opponent) -> Play {
    let state = BoardState::from_rows(rows, Some(opponent)).unwrap();
    get_move(&state, Color::White, opponent, &pacer(), false, &mut FixedRoll(0.0))
        .await
        .unwrap()
}

// =============================================================================
// Faction scenarios
// =============================================================================

#[tokio::test]
async fn test_black_hand_captures() {
    assert_eq!(choose(&CAPTURE, Opponent::TheBlackHand).await, Play::Move((1, 0)));
}

#[tokio::test]
async fn test_slum_snakes_defend() {
    assert_eq!(choose(&DEFEND, Opponent::SlumSnakes).await, Play::Move((1, 0)));
}

#[tokio::test]
async fn test_daedalus_makes_eye() {
    assert_eq!(choose(&EYE, Opponent::Daedalus).await, Play::Move((0, 1)));
}

#[tokio::test]
async fn test_capture_and_defend_win_under_any_seed() {
    let p = pacer();
    for seed in 0..20 {
        let state = BoardState::from_rows(&CAPTURE, None).unwrap();
        let mut rng = fastrand::Rng::with_seed(seed);
        let play = get_move(&state, Color::White, Opponent::TheBlackHand, &p, false, &mut rng)
            .await
            .unwrap();
        assert_eq!(play, Play::Move((1, 0)), "seed {seed}");

        let state = BoardState::from_rows(&DEFEND, None).unwrap();
        let play = get_move(&state, Color::White, Opponent::SlumSnakes, &p, false, &mut rng)
            .await
            .unwrap();
        assert_eq!(play, Play::Move((1, 0)), "seed {seed}");
    }
}

#[tokio::test]
async fn test_every_faction_plays_on_open_board() {
    let p = pacer();
    for opponent in Opponent::ALL {
        let state = BoardState::new(7, Some(opponent)).unwrap();
        let mut rng = fastrand::Rng::with_seed(3);
        let play = get_move(&state, Color::Black, opponent, &p, false, &mut rng)
            .await
            .unwrap();
        // an empty board always offers expansion in the fallback
        let Play::Move(pt) = play else {
            panic!("{opponent} passed on an empty board");
        };
        assert!(state.board.is_empty(pt));
    }
}

#[tokio::test]
async fn test_seeded_decisions_are_reproducible() {
    let p = pacer();
    let mut rng = fastrand::Rng::with_seed(11);
    for _ in 0..10 {
        let board = random_board(&mut rng);
        let state = BoardState {
            board,
            ..BoardState::new(7, None).unwrap()
        };
        for opponent in Opponent::ALL {
            let seed = rng.u64(..);
            let a = get_move(&state, Color::White, opponent, &p, false, &mut fastrand::Rng::with_seed(seed))
                .await
                .unwrap();
            let b = get_move(&state, Color::White, opponent, &p, false, &mut fastrand::Rng::with_seed(seed))
                .await
                .unwrap();
            assert_eq!(a, b);
        }
    }
}

// =============================================================================
// Move generator properties
// =============================================================================

#[test]
fn test_capture_removes_stones() {
    let p = pacer();
    let mut rng = fastrand::Rng::with_seed(5);
    let mut captures = 0;
    for _ in 0..200 {
        let board = random_board(&mut rng);
        let state = BoardState {
            board,
            ..BoardState::new(7, None).unwrap()
        };
        for player in [Color::Black, Color::White] {
            let moves = MoveOptions::new(&state, player, rng.f64(), true, &p);
            if let Some(m) = moves.capture() {
                let after = simulate_move(&state.board, m.point, player);
                assert!(
                    stones(&after, player.opponent()) < stones(&state.board, player.opponent()),
                    "capture at {:?} took nothing\n{}",
                    m.point,
                    state.board
                );
                captures += 1;
            }
        }
    }
    assert!(captures > 0);
}

#[test]
fn test_capture_two_stone_chain() {
    let state = BoardState::from_rows(&["XX...", "OO...", ".....", ".....", "....."], None).unwrap();
    let p = pacer();
    let moves = MoveOptions::new(&state, Color::White, 0.0, true, &p);
    let capture = moves.capture().unwrap();
    assert_eq!(capture.point, (0, 2));
    let after = simulate_move(&state.board, capture.point, Color::White);
    assert_eq!(stones(&after, Color::Black), 0);
}

#[test]
fn test_eye_moves_never_lose_eyes() {
    let mut rng = fastrand::Rng::with_seed(9);
    for _ in 0..200 {
        let board = random_board(&mut rng);
        let state = BoardState {
            board,
            ..BoardState::new(7, None).unwrap()
        };
        let analysis = Analysis::new(&state.board);
        for player in [Color::Black, Color::White] {
            let before = EyeCount::of(&state.board, player);
            let available = disputed_territory(&state, player, true);
            for m in eye_creation_moves(&state.board, &analysis, player, &available, usize::MAX) {
                let after = EyeCount::of(&simulate_move(&state.board, m.point, player), player);
                assert!(after.alive >= before.alive, "{:?} lost a living group", m.point);
                assert!(after.eyes >= before.eyes, "{:?} lost an eye", m.point);
                assert!(after.alive > before.alive || after.eyes > before.eyes);
                assert_eq!(m.creates_life, after.alive > before.alive);
            }
        }
    }
}

#[test]
fn test_eye_moves_sort_life_first() {
    let mut rng = fastrand::Rng::with_seed(21);
    for _ in 0..200 {
        let board = random_board(&mut rng);
        let state = BoardState {
            board,
            ..BoardState::new(7, None).unwrap()
        };
        let analysis = Analysis::new(&state.board);
        let available = disputed_territory(&state, Color::White, true);
        let moves = eye_creation_moves(&state.board, &analysis, Color::White, &available, usize::MAX);
        let first_plain = moves.iter().position(|m| !m.creates_life).unwrap_or(moves.len());
        assert!(moves[first_plain..].iter().all(|m| !m.creates_life));
    }
}

// =============================================================================
// Pattern symmetry
// =============================================================================

#[test]
fn test_pattern_symmetry_closure() {
    let mut rng = fastrand::Rng::with_seed(13);
    let mut matched = 0;
    for _ in 0..100 {
        let board = random_board(&mut rng);
        for pt in board.points().filter(|&pt| board.is_empty(pt)) {
            let hood = neighborhood(&board, pt);
            for template in patterns() {
                for player in [Color::Black, Color::White] {
                    if !template_matches(template, &hood, player) {
                        continue;
                    }
                    matched += 1;
                    let templates = symmetries(template);
                    let hoods = symmetries(&hood);
                    for (t, h) in templates.iter().zip(hoods.iter()) {
                        assert!(template_matches(t, h, player));
                    }
                }
            }
        }
    }
    assert!(matched > 0);
}

#[test]
fn test_offline_nodes_read_as_edge() {
    let board = Board::from_rows(&["#####", "#...#", "#.X.#", "#...#", "#####"]).unwrap();
    let hood = neighborhood(&board, (1, 1));
    assert_eq!(hood.iter().filter(|c| c.is_none()).count(), 5);
    assert_eq!(hood[4], Some(Cell::Empty));
    assert_eq!(hood[8], Some(Cell::Stone(Color::Black)));
}
