//! Personality-driven move selection.
//!
//! Each opponent walks the move categories of [`MoveOptions`] in its own
//! order, with a single roll deciding the probabilistic steps. When the
//! ladder gives nothing, [`get_move`] falls back to a uniform pick among the
//! reasonable moves that are still legal, and passes if there are none.

use tracing::debug;

use crate::analysis::check_placement;
use crate::board::{Color, Point};
use crate::constants::*;
use crate::error::{GoError, MoveError};
use crate::game::{BoardState, Opponent, Play};
use crate::moves::{Move, MoveOptions, MoveType};
use crate::pacing::Pacer;
use crate::roll::{Roll, pick};

/// A ladder decision: the category that won and its move.
pub type Choice = (MoveType, Move);

impl Opponent {
    /// Whether blunder-avoidance is on for this decision.
    pub fn is_smart(self, roll: f64) -> bool {
        match self {
            Opponent::Netburners => false,
            Opponent::SlumSnakes => roll < SLUM_SNAKES_SMART,
            Opponent::TheBlackHand => roll < BLACK_HAND_SMART,
            _ => true,
        }
    }
}

/// Categories tried, in order, when the personality ladder gives nothing.
const FALLBACK_ORDER: [MoveType; 7] = [
    MoveType::Growth,
    MoveType::Surround,
    MoveType::Defend,
    MoveType::Expansion,
    MoveType::Pattern,
    MoveType::EyeMove,
    MoveType::EyeBlock,
];

/// Choose a move for `player` as `opponent` would.
///
/// Draws four values from `rng`: the smart flag, the move-option roll, the
/// personality roll and the fallback pick. Waits one pacing cycle before
/// looking at the board and another after choosing.
pub async fn get_move<R: Roll>(
    state: &BoardState,
    player: Color,
    opponent: Opponent,
    pacer: &Pacer,
    use_offline_cycles: bool,
    rng: &mut R,
) -> Result<Play, GoError> {
    if state.is_over() {
        return Err(MoveError::GameOver.into());
    }
    pacer.wait_cycle(use_offline_cycles).await;

    let smart = opponent.is_smart(rng.roll());
    let moves = MoveOptions::new(state, player, rng.roll(), smart, pacer);

    if let Some((kind, m)) = priority_move(opponent, &moves, rng.roll()).await {
        debug!(%opponent, %player, ?kind, point = ?m.point, "priority move");
        return Ok(Play::Move(m.point));
    }

    let mut options: Vec<Point> = Vec::new();
    for kind in FALLBACK_ORDER {
        if let Some(m) = moves.get(kind).await {
            if check_placement(state, m.point, player).is_ok() {
                options.push(m.point);
            }
        }
    }
    let chosen = pick(&options, rng.roll());
    pacer.wait_cycle(use_offline_cycles).await;

    match chosen {
        Some(pt) => {
            debug!(%opponent, %player, point = ?pt, candidates = options.len(), "fallback move");
            Ok(Play::Move(pt))
        }
        None => {
            debug!(%opponent, %player, "no move, passing");
            Ok(Play::Pass)
        }
    }
}

/// Run the priority ladder for one opponent.
pub async fn priority_move(opponent: Opponent, moves: &MoveOptions<'_>, roll: f64) -> Option<Choice> {
    match opponent {
        Opponent::Netburners => netburners(moves, roll).await,
        Opponent::SlumSnakes => slum_snakes(moves, roll).await,
        Opponent::TheBlackHand => black_hand(moves, roll).await,
        Opponent::Tetrads => tetrads(moves, roll).await,
        Opponent::Daedalus => daedalus(moves, roll).await,
        Opponent::Illuminati => illuminati(moves, roll).await,
    }
}

fn tagged(kind: MoveType, m: Option<Move>) -> Option<Choice> {
    m.map(|m| (kind, m))
}

/// A surround that leaves the target chain with at most `max` liberties.
fn tight_surround(surround: Option<Move>, max: usize) -> Option<Choice> {
    surround
        .filter(|m| m.new_liberty_count.is_some_and(|n| n <= max))
        .map(|m| (MoveType::Surround, m))
}

// =============================================================================
// Ladders
// =============================================================================

/// The default ladder: kill, save, live, threaten, deny, then shape.
async fn illuminati(moves: &MoveOptions<'_>, roll: f64) -> Option<Choice> {
    if let Some(c) = tagged(MoveType::Capture, moves.capture()) {
        return Some(c);
    }
    if let Some(c) = tagged(MoveType::DefendCapture, moves.defend_capture()) {
        return Some(c);
    }
    if let Some(c) = tagged(MoveType::EyeMove, moves.eye_move()) {
        return Some(c);
    }
    let surround = moves.surround();
    if let Some(c) = tight_surround(surround, 1) {
        return Some(c);
    }
    if let Some(c) = tagged(MoveType::EyeBlock, moves.eye_block()) {
        return Some(c);
    }
    if let Some(c) = tagged(MoveType::Corner, moves.corner()) {
        return Some(c);
    }

    let has_moves = [
        moves.eye_move(),
        moves.eye_block(),
        moves.growth(),
        moves.defend(),
        surround,
    ]
    .iter()
    .flatten()
    .count();
    if roll > ILLUMINATI_PATTERN_SKIP || has_moves == 0 {
        if let Some(c) = tagged(MoveType::Pattern, moves.pattern().await) {
            return Some(c);
        }
    }
    if roll > ILLUMINATI_JUMP {
        if let Some(c) = tagged(MoveType::Jump, moves.jump()) {
            return Some(c);
        }
    }
    if roll < ILLUMINATI_SURROUND {
        return tight_surround(surround, 2);
    }
    None
}

/// Illuminati, but occasionally distracted.
async fn daedalus(moves: &MoveOptions<'_>, roll: f64) -> Option<Choice> {
    if roll < DAEDALUS_FOCUS {
        return illuminati(moves, roll).await;
    }
    None
}

/// Close contact: captures, escapes, then shape and pressure.
async fn tetrads(moves: &MoveOptions<'_>, roll: f64) -> Option<Choice> {
    if let Some(c) = tagged(MoveType::Capture, moves.capture()) {
        return Some(c);
    }
    if let Some(c) = tagged(MoveType::DefendCapture, moves.defend_capture()) {
        return Some(c);
    }
    if let Some(c) = tagged(MoveType::Pattern, moves.pattern().await) {
        return Some(c);
    }
    if let Some(c) = tight_surround(moves.surround(), 1) {
        return Some(c);
    }
    if roll < TETRADS_DEFER {
        return illuminati(moves, roll).await;
    }
    None
}

/// Always captures or smothers when it can.
async fn black_hand(moves: &MoveOptions<'_>, roll: f64) -> Option<Choice> {
    if let Some(c) = tagged(MoveType::Capture, moves.capture()) {
        return Some(c);
    }
    let surround = moves.surround();
    if let Some(c) = tight_surround(surround, 1) {
        return Some(c);
    }
    if let Some(c) = tagged(MoveType::DefendCapture, moves.defend_capture()) {
        return Some(c);
    }
    if let Some(c) = tight_surround(surround, 2) {
        return Some(c);
    }

    if roll < BLACK_HAND_DEFER {
        illuminati(moves, roll).await
    } else if roll < BLACK_HAND_SURROUND && surround.is_some() {
        tagged(MoveType::Surround, surround)
    } else if roll < BLACK_HAND_RANDOM {
        tagged(MoveType::Random, moves.random())
    } else {
        None
    }
}

/// Defends first, then snakes chains across the board.
async fn slum_snakes(moves: &MoveOptions<'_>, roll: f64) -> Option<Choice> {
    if let Some(c) = tagged(MoveType::DefendCapture, moves.defend_capture()) {
        return Some(c);
    }

    if roll < SLUM_SNAKES_DEFER {
        illuminati(moves, roll).await
    } else if roll < SLUM_SNAKES_GROWTH && moves.growth().is_some() {
        tagged(MoveType::Growth, moves.growth())
    } else if roll < SLUM_SNAKES_RANDOM {
        tagged(MoveType::Random, moves.random())
    } else {
        None
    }
}

/// Mostly scattered stones with the odd good move.
async fn netburners(moves: &MoveOptions<'_>, roll: f64) -> Option<Choice> {
    if roll < NETBURNERS_DEFER {
        illuminati(moves, roll).await
    } else if roll < NETBURNERS_EXPANSION && moves.expansion().is_some() {
        tagged(MoveType::Expansion, moves.expansion())
    } else if roll < NETBURNERS_GROWTH && moves.growth().is_some() {
        tagged(MoveType::Growth, moves.growth())
    } else if roll < NETBURNERS_RANDOM {
        tagged(MoveType::Random, moves.random())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PacingConfig;
    use crate::roll::FixedRoll;

    fn pacer() -> Pacer {
        Pacer::new(PacingConfig::instant())
    }

    #[test]
    fn test_smart_flag() {
        assert!(!Opponent::Netburners.is_smart(0.0));
        assert!(Opponent::SlumSnakes.is_smart(0.29));
        assert!(!Opponent::SlumSnakes.is_smart(0.3));
        assert!(Opponent::TheBlackHand.is_smart(0.79));
        assert!(!Opponent::TheBlackHand.is_smart(0.8));
        assert!(Opponent::Illuminati.is_smart(0.99));
    }

    #[tokio::test]
    async fn test_daedalus_gets_distracted() {
        let state = BoardState::from_rows(&["OX...", ".....", ".....", ".....", "....."], None).unwrap();
        let p = pacer();
        let moves = MoveOptions::new(&state, Color::White, 0.0, true, &p);
        assert!(priority_move(Opponent::Daedalus, &moves, 0.95).await.is_none());
        let (kind, m) = priority_move(Opponent::Daedalus, &moves, 0.5).await.unwrap();
        assert_eq!(kind, MoveType::DefendCapture);
        assert_eq!(m.point, (1, 0));
    }

    #[tokio::test]
    async fn test_netburners_expand_on_open_board() {
        let state = BoardState::new(5, None).unwrap();
        let p = pacer();
        let moves = MoveOptions::new(&state, Color::White, 0.0, false, &p);
        let (kind, m) = priority_move(Opponent::Netburners, &moves, 0.3).await.unwrap();
        assert_eq!(kind, MoveType::Expansion);
        assert_eq!(m.point, (1, 1));
        // nothing contested yet, so random gives nothing either
        assert!(priority_move(Opponent::Netburners, &moves, 0.7).await.is_none());
    }

    #[tokio::test]
    async fn test_get_move_falls_back_to_expansion() {
        let state = BoardState::new(5, Some(Opponent::Netburners)).unwrap();
        let p = pacer();
        // personality roll 0.9 skips the whole Netburners ladder
        let play = get_move(&state, Color::Black, Opponent::Netburners, &p, false, &mut FixedRoll(0.9))
            .await
            .unwrap();
        let Play::Move(pt) = play else {
            panic!("expected a move, got {play:?}");
        };
        assert!(check_placement(&state, pt, Color::Black).is_ok());
    }

    #[tokio::test]
    async fn test_get_move_passes_without_legal_moves() {
        // both empty points are black eyes; white may only commit suicide
        let state = BoardState::from_rows(&["X.X", "XXX", "X.X"], None).unwrap();
        let p = pacer();
        let play = get_move(&state, Color::White, Opponent::Illuminati, &p, false, &mut FixedRoll(0.0))
            .await
            .unwrap();
        assert_eq!(play, Play::Pass);
    }

    #[tokio::test]
    async fn test_get_move_rejects_finished_game() {
        let mut state = BoardState::new(5, None).unwrap();
        state.previous_player = None;
        let p = pacer();
        let result = get_move(&state, Color::White, Opponent::Tetrads, &p, false, &mut FixedRoll(0.0)).await;
        assert!(matches!(result, Err(GoError::Move(MoveError::GameOver))));
    }
}
