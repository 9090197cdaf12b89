//! Candidate moves by category.
//!
//! [`MoveOptions`] computes one candidate per [`MoveType`] on demand and
//! remembers it for the rest of the decision. Nothing here mutates the
//! board. Only the pattern scan suspends; every other category is a plain
//! synchronous computation.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::analysis::{
    Analysis, EyeCount, contested_points, disputed_territory, effective_liberties_of_new_move,
    eyes_by_chain, min_liberty_count_of_adjacent_chains, simulate_move, weakest_adjacent_chain,
};
use crate::board::{Board, Cell, Color, Point};
use crate::constants::{
    CORNER_MIN_LIVE_POINTS, EYE_BLOCK_MAX_LIBERTIES, MAX_CONTESTED_REGION, NO_CHAIN_LIBERTIES,
};
use crate::game::BoardState;
use crate::pacing::Pacer;
use crate::patterns::find_any_matched_pattern;
use crate::roll::pick;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MoveType {
    Capture,
    DefendCapture,
    EyeMove,
    EyeBlock,
    Pattern,
    Growth,
    Expansion,
    Jump,
    Defend,
    Surround,
    Corner,
    Random,
}

/// A candidate point plus the liberty counts it changes, when known.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub point: Point,
    pub old_liberty_count: Option<usize>,
    pub new_liberty_count: Option<usize>,
}

impl Move {
    pub fn at(point: Point) -> Self {
        Self {
            point,
            old_liberty_count: None,
            new_liberty_count: None,
        }
    }

    fn with_counts(point: Point, old: usize, new: usize) -> Self {
        Self {
            point,
            old_liberty_count: Some(old),
            new_liberty_count: Some(new),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EyeMove {
    pub point: Point,
    /// Playing here gives a chain its second eye.
    pub creates_life: bool,
}

/// Lazily evaluated, memoized candidates for one decision.
pub struct MoveOptions<'a> {
    state: &'a BoardState,
    analysis: Analysis,
    player: Color,
    roll: f64,
    smart: bool,
    pacer: &'a Pacer,
    available: Vec<Point>,
    contested: Vec<Point>,
    expansion: Vec<Point>,
    end_game: bool,
    cache: RefCell<HashMap<MoveType, Option<Move>>>,
}

impl<'a> MoveOptions<'a> {
    pub fn new(state: &'a BoardState, player: Color, roll: f64, smart: bool, pacer: &'a Pacer) -> Self {
        let board = &state.board;
        let analysis = Analysis::new(board);
        let available = disputed_territory(state, player, smart);
        let contested = contested_points(board, &analysis, &available, MAX_CONTESTED_REGION);
        let expansion = expansion_points(board, &analysis, &available);
        // Everything is settled and someone already passed: only play what can change the score.
        let end_game = contested.is_empty() && state.pass_count > 0;

        Self {
            state,
            analysis,
            player,
            roll,
            smart,
            pacer,
            available,
            contested,
            expansion,
            end_game,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn player(&self) -> Color {
        self.player
    }

    pub fn smart(&self) -> bool {
        self.smart
    }

    pub fn available(&self) -> &[Point] {
        &self.available
    }

    pub fn is_end_game(&self) -> bool {
        self.end_game
    }

    fn board(&self) -> &Board {
        &self.state.board
    }

    fn memo(&self, kind: MoveType, compute: impl FnOnce() -> Option<Move>) -> Option<Move> {
        let cached = self.cache.borrow().get(&kind).copied();
        if let Some(hit) = cached {
            return hit;
        }
        let result = compute();
        self.cache.borrow_mut().insert(kind, result);
        result
    }

    /// Any category by name.
    pub async fn get(&self, kind: MoveType) -> Option<Move> {
        match kind {
            MoveType::Capture => self.capture(),
            MoveType::DefendCapture => self.defend_capture(),
            MoveType::EyeMove => self.eye_move(),
            MoveType::EyeBlock => self.eye_block(),
            MoveType::Pattern => self.pattern().await,
            MoveType::Growth => self.growth(),
            MoveType::Expansion => self.expansion(),
            MoveType::Jump => self.jump(),
            MoveType::Defend => self.defend(),
            MoveType::Surround => self.surround(),
            MoveType::Corner => self.corner(),
            MoveType::Random => self.random(),
        }
    }

    /// A surround move that takes the last liberty.
    pub fn capture(&self) -> Option<Move> {
        self.memo(MoveType::Capture, || {
            self.surround().filter(|m| m.new_liberty_count == Some(0))
        })
    }

    /// A defend move that lifts a chain out of atari.
    pub fn defend_capture(&self) -> Option<Move> {
        self.memo(MoveType::DefendCapture, || {
            self.defend().filter(|m| {
                m.old_liberty_count == Some(1) && m.new_liberty_count.is_some_and(|n| n > 1)
            })
        })
    }

    pub fn eye_move(&self) -> Option<Move> {
        self.memo(MoveType::EyeMove, || {
            if self.end_game {
                return None;
            }
            eye_creation_moves(self.board(), &self.analysis, self.player, &self.available, usize::MAX)
                .first()
                .map(|m| Move::at(m.point))
        })
    }

    /// Block the opponent's only way to make an eye.
    ///
    /// Several simultaneous threats cannot be stopped with one stone, so
    /// they are left alone.
    pub fn eye_block(&self) -> Option<Move> {
        self.memo(MoveType::EyeBlock, || {
            if self.end_game {
                return None;
            }
            let threats = eye_creation_moves(
                self.board(),
                &self.analysis,
                self.player.opponent(),
                &self.available,
                EYE_BLOCK_MAX_LIBERTIES,
            );
            let (life, eye): (Vec<EyeMove>, Vec<EyeMove>) = threats.into_iter().partition(|m| m.creates_life);
            match (life.as_slice(), eye.as_slice()) {
                ([only], _) => Some(Move::at(only.point)),
                ([], [only]) => Some(Move::at(only.point)),
                _ => None,
            }
        })
    }

    pub async fn pattern(&self) -> Option<Move> {
        let cached = self.cache.borrow().get(&MoveType::Pattern).copied();
        if let Some(hit) = cached {
            return hit;
        }
        let result = if self.end_game {
            None
        } else {
            find_any_matched_pattern(
                self.board(),
                &self.analysis,
                self.player,
                &self.available,
                self.smart,
                self.roll,
                self.pacer,
            )
            .await
            .map(Move::at)
        };
        self.cache.borrow_mut().insert(MoveType::Pattern, result);
        result
    }

    /// The liberty of a multi-stone chain that adds the most liberties.
    pub fn growth(&self) -> Option<Move> {
        self.memo(MoveType::Growth, || {
            if self.end_game {
                return None;
            }
            let moves = self.liberty_growth_moves(true);
            best_increase(&moves, self.roll)
        })
    }

    /// The biggest escape for a chain in atari.
    pub fn defend(&self) -> Option<Move> {
        self.memo(MoveType::Defend, || {
            let moves: Vec<Move> = self
                .liberty_growth_moves(false)
                .into_iter()
                .filter(|m| {
                    let (old, new) = counts(m);
                    old <= 1 && new > old
                })
                .collect();
            best_increase(&moves, self.roll)
        })
    }

    pub fn surround(&self) -> Option<Move> {
        self.memo(MoveType::Surround, || {
            surround_move(self.board(), &self.analysis, self.player, &self.available, self.smart)
        })
    }

    /// Open space, or contested single points once the board fills up.
    pub fn expansion(&self) -> Option<Move> {
        self.memo(MoveType::Expansion, || pick(&self.expansion, self.roll).map(Move::at))
    }

    /// An expansion point two steps from a friendly stone.
    pub fn jump(&self) -> Option<Move> {
        self.memo(MoveType::Jump, || {
            let board = self.board();
            let mine = Some(Cell::Stone(self.player));
            let jumps: Vec<Point> = self
                .expansion
                .iter()
                .copied()
                .filter(|&pt| {
                    [(0, 2), (2, 0), (0, -2), (-2, 0)]
                        .iter()
                        .any(|&(dx, dy)| board.get_offset(pt, dx, dy) == mine)
                })
                .collect();
            pick(&jumps, self.roll).map(Move::at)
        })
    }

    pub fn corner(&self) -> Option<Move> {
        self.memo(MoveType::Corner, || corner_move(self.board()).map(Move::at))
    }

    /// Any available point, but only while something is still contested.
    pub fn random(&self) -> Option<Move> {
        self.memo(MoveType::Random, || {
            if self.contested.is_empty() {
                return None;
            }
            pick(&self.available, self.roll).map(Move::at)
        })
    }

    /// Liberties of friendly chains where playing keeps or adds liberties.
    fn liberty_growth_moves(&self, multi_stone_only: bool) -> Vec<Move> {
        let board = self.board();
        let mut moves = Vec::new();
        for chain in self.analysis.chains_of(self.player) {
            if multi_stone_only && chain.len() < 2 {
                continue;
            }
            for &lib in &chain.liberties {
                if !self.available.contains(&lib) {
                    continue;
                }
                let new = effective_liberties_of_new_move(board, &self.analysis, lib, self.player).len();
                let old = min_liberty_count_of_adjacent_chains(board, &self.analysis, lib, self.player);
                if new > 1 && new >= old {
                    moves.push(Move::with_counts(lib, old, new));
                }
            }
        }
        moves
    }
}

fn counts(m: &Move) -> (usize, usize) {
    (
        m.old_liberty_count.unwrap_or(NO_CHAIN_LIBERTIES),
        m.new_liberty_count.unwrap_or(0),
    )
}

/// Among `moves`, pick one with the largest liberty gain.
fn best_increase(moves: &[Move], roll: f64) -> Option<Move> {
    let gain = |m: &Move| {
        let (old, new) = counts(m);
        new as isize - old as isize
    };
    let best = moves.iter().map(gain).max()?;
    let candidates: Vec<Move> = moves.iter().copied().filter(|m| gain(m) == best).collect();
    pick(&candidates, roll)
}

/// Available points whose four neighbors are all empty.
///
/// Falls back to contested single-point regions when no open area is left.
fn expansion_points(board: &Board, analysis: &Analysis, available: &[Point]) -> Vec<Point> {
    let open: Vec<Point> = available
        .iter()
        .copied()
        .filter(|&pt| {
            board
                .neighbors(pt)
                .iter()
                .all(|n| n.is_some_and(|n| board.is_empty(n)))
        })
        .collect();
    if !open.is_empty() {
        return open;
    }
    contested_points(board, analysis, available, 1)
}

/// Pick the best liberty of an opponent chain to play on.
///
/// Captures come first, then ataris, then plain surrounds. Moves that leave
/// the new stone easy to capture without capturing anything are dropped.
fn surround_move(
    board: &Board,
    analysis: &Analysis,
    player: Color,
    available: &[Point],
    smart: bool,
) -> Option<Move> {
    let opponent = player.opponent();
    let mut captures = Vec::new();
    let mut ataris = Vec::new();
    let mut surrounds = Vec::new();

    let enemy_liberties = analysis
        .chains_of(opponent)
        .flat_map(|c| c.liberties.iter().copied())
        .filter(|pt| available.contains(pt));

    for pt in enemy_liberties {
        let new_libs = effective_liberties_of_new_move(board, analysis, pt, player).len();
        let weakest = weakest_adjacent_chain(board, analysis, pt, opponent);
        let enemy_len = weakest.map_or(NO_CHAIN_LIBERTIES, |c| c.len());
        let enemy_libs = weakest.map_or(NO_CHAIN_LIBERTIES, |c| c.liberties.len());
        let liberty_regions = weakest.map_or(0, |c| {
            let mut ids: Vec<_> = c.liberties.iter().filter_map(|&l| analysis.chain_id(l)).collect();
            ids.sort_unstable();
            ids.dedup();
            ids.len()
        });

        if new_libs <= 2 && enemy_libs > 2 {
            continue;
        }

        let candidate = Move::with_counts(pt, enemy_libs, enemy_libs.saturating_sub(1));
        if enemy_libs <= 1 {
            captures.push(candidate);
        } else if enemy_libs == 2 && (new_libs >= 2 || (liberty_regions == 1 && enemy_len > 3) || !smart) {
            ataris.push(candidate);
        } else if new_libs >= 2 {
            surrounds.push(candidate);
        }
    }

    captures.into_iter().chain(ataris).chain(surrounds).next()
}

/// Moves that give `player` a new eye or a new living group.
///
/// Candidates are liberties of `player`'s multi-stone chains that are not yet
/// alive. Moves creating life sort first.
pub fn eye_creation_moves(
    board: &Board,
    analysis: &Analysis,
    player: Color,
    available: &[Point],
    max_liberties: usize,
) -> Vec<EyeMove> {
    let eyes = eyes_by_chain(board, analysis, player);
    let current = EyeCount::from_eyes(&eyes);

    let mut candidates: Vec<Point> = Vec::new();
    for chain in analysis.chains_of(player) {
        if chain.len() < 2 || chain.liberties.len() > max_liberties {
            continue;
        }
        if eyes.get(&chain.id).is_some_and(|e| e.len() >= 2) {
            continue;
        }
        for &pt in &chain.liberties {
            if candidates.contains(&pt) || !available.contains(&pt) {
                continue;
            }
            let around = board.neighbors(pt);
            let enclosing = around
                .iter()
                .filter(|n| n.is_none_or(|n| board.stone(n) == Some(player)))
                .count();
            let has_space = around.iter().any(|n| n.is_some_and(|n| board.is_empty(n)));
            if enclosing >= 2 && has_space {
                candidates.push(pt);
            }
        }
    }

    let mut moves: Vec<EyeMove> = candidates
        .into_iter()
        .filter_map(|pt| {
            let after = EyeCount::of(&simulate_move(board, pt, player), player);
            let creates_life = after.alive > current.alive;
            let keeps_eyes = after.eyes >= current.eyes;
            let adds_eye = after.alive == current.alive && after.eyes > current.eyes;
            ((creates_life && keeps_eyes) || adds_eye).then_some(EyeMove {
                point: pt,
                creates_life,
            })
        })
        .collect();
    moves.sort_by_key(|m| !m.creates_life);
    moves
}

/// An anchor point inside an untouched corner.
fn corner_move(board: &Board) -> Option<Point> {
    let edge = board.size - 1;
    let far = edge - 2;
    let corners = [
        ((far, far), (far, far, edge, edge)),
        ((2, far), (0, far, 2, edge)),
        ((2, 2), (0, 0, 2, 2)),
        ((far, 2), (far, 0, edge, 2)),
    ];
    corners
        .into_iter()
        .find(|&(anchor, area)| board.is_empty(anchor) && corner_is_open(board, area))
        .map(|(anchor, _)| anchor)
}

/// Mostly intact and completely empty.
fn corner_is_open(board: &Board, (x1, y1, x2, y2): (usize, usize, usize, usize)) -> bool {
    let live: Vec<Point> = board
        .live_points()
        .filter(|&(x, y)| x >= x1 && x <= x2 && y >= y1 && y <= y2)
        .collect();
    live.len() >= CORNER_MIN_LIVE_POINTS && live.iter().all(|&pt| board.is_empty(pt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PacingConfig;

    fn pacer() -> Pacer {
        Pacer::new(PacingConfig::instant())
    }

    fn state(rows: &[&str]) -> BoardState {
        BoardState::from_rows(rows, None).unwrap()
    }

    const EMPTY5: [&str; 5] = [".....", ".....", ".....", ".....", "....."];

    #[test]
    fn test_empty_board_options() {
        let s = state(&EMPTY5);
        let p = pacer();
        let moves = MoveOptions::new(&s, Color::White, 0.0, true, &p);
        assert_eq!(moves.expansion().map(|m| m.point), Some((1, 1)));
        assert_eq!(moves.corner().map(|m| m.point), Some((2, 2)));
        assert_eq!(moves.random(), None);
        assert_eq!(moves.jump(), None);
        assert_eq!(moves.capture(), None);
        assert_eq!(moves.growth(), None);
        assert_eq!(moves.defend(), None);
    }

    #[test]
    fn test_corner_skips_occupied_corner() {
        let s = state(&[".......", ".......", ".......", ".......", ".......", ".....X.", "......."]);
        let p = pacer();
        let moves = MoveOptions::new(&s, Color::White, 0.0, true, &p);
        assert_eq!(moves.corner().map(|m| m.point), Some((2, 4)));
    }

    #[test]
    fn test_corner_needs_enough_live_points() {
        let p = pacer();
        // two offline nodes leave seven live points: still a corner
        let s = state(&[".......", ".......", ".......", ".......", ".......", ".......", ".....##"]);
        let moves = MoveOptions::new(&s, Color::White, 0.0, true, &p);
        assert_eq!(moves.corner().map(|m| m.point), Some((4, 4)));

        let s = state(&[".......", ".......", ".......", ".......", ".......", ".......", "....###"]);
        let moves = MoveOptions::new(&s, Color::White, 0.0, true, &p);
        assert_eq!(moves.corner().map(|m| m.point), Some((2, 4)));
    }

    #[test]
    fn test_open_ground_is_not_contested() {
        let p = pacer();
        let mut rows = vec![".".repeat(9); 9];
        rows[2].replace_range(2..3, "X");
        rows[6].replace_range(6..7, "O");
        let s = BoardState::from_rows(&rows, None).unwrap();
        let moves = MoveOptions::new(&s, Color::White, 0.0, true, &p);
        assert!(moves.random().is_some());

        // one region of 359 points is too big to be fought over
        let mut rows = vec![".".repeat(19); 19];
        rows[3].replace_range(3..4, "X");
        rows[15].replace_range(15..16, "O");
        let s = BoardState::from_rows(&rows, None).unwrap();
        let moves = MoveOptions::new(&s, Color::White, 0.0, true, &p);
        assert_eq!(moves.random(), None);
    }

    #[test]
    fn test_capture_and_defend() {
        let s = state(&["XO...", ".....", ".....", ".....", "....."]);
        let p = pacer();
        let moves = MoveOptions::new(&s, Color::White, 0.0, true, &p);
        let capture = moves.capture().unwrap();
        assert_eq!(capture.point, (1, 0));
        assert_eq!(capture.new_liberty_count, Some(0));

        let s = state(&["OX...", ".....", ".....", ".....", "....."]);
        let moves = MoveOptions::new(&s, Color::White, 0.0, true, &p);
        let defend = moves.defend_capture().unwrap();
        assert_eq!(defend.point, (1, 0));
        assert_eq!(defend.old_liberty_count, Some(1));
        assert_eq!(defend.new_liberty_count, Some(2));
    }

    #[test]
    fn test_surround_prefers_atari() {
        // black stone on the edge with two liberties left
        let s = state(&[".OX..", ".....", ".....", ".....", "....."]);
        let p = pacer();
        let moves = MoveOptions::new(&s, Color::White, 0.0, true, &p);
        let surround = moves.surround().unwrap();
        assert_eq!(surround.point, (0, 3));
        assert_eq!(surround.old_liberty_count, Some(2));
        assert_eq!(surround.new_liberty_count, Some(1));
        assert_eq!(moves.capture(), None);
    }

    #[test]
    fn test_growth_prefers_largest_gain() {
        let s = state(&[".......", ".......", "..OO...", ".......", ".......", ".......", "......."]);
        let p = pacer();
        let moves = MoveOptions::new(&s, Color::White, 0.0, true, &p);
        let growth = moves.growth().unwrap();
        assert_eq!(growth.point, (2, 1));
        assert_eq!(growth.old_liberty_count, Some(6));
        assert_eq!(growth.new_liberty_count, Some(8));
    }

    #[test]
    fn test_jump_needs_friendly_stone() {
        let s = state(&[".......", ".......", ".......", "...O...", ".......", ".......", "......."]);
        let p = pacer();
        let moves = MoveOptions::new(&s, Color::White, 0.0, true, &p);
        // first open point two steps from (3, 3)
        assert_eq!(moves.jump().map(|m| m.point), Some((1, 3)));
        let moves = MoveOptions::new(&s, Color::Black, 0.0, true, &p);
        assert_eq!(moves.jump(), None);
    }

    const NEAR_LIFE: [&str; 5] = ["...OX", "OOOOX", "XXXX.", ".....", "....."];

    #[test]
    fn test_eye_move_and_block() {
        let mut s = state(&NEAR_LIFE);
        let p = pacer();
        let white = MoveOptions::new(&s, Color::White, 0.0, true, &p);
        assert_eq!(white.eye_move().map(|m| m.point), Some((0, 1)));

        s.previous_player = Some(Color::White);
        let black = MoveOptions::new(&s, Color::Black, 0.0, true, &p);
        assert_eq!(black.eye_block().map(|m| m.point), Some((0, 1)));
    }

    #[test]
    fn test_end_game_suppresses_eye_moves() {
        let mut s = state(&NEAR_LIFE);
        s.pass_count = 1;
        let p = pacer();
        let moves = MoveOptions::new(&s, Color::White, 0.0, true, &p);
        assert!(moves.is_end_game());
        assert_eq!(moves.eye_move(), None);
        assert_eq!(moves.eye_block(), None);
        assert_eq!(moves.growth(), None);
    }

    #[tokio::test]
    async fn test_pattern_is_memoized() {
        let s = state(&["OXO..", ".....", ".....", ".....", "....."]);
        let p = pacer();
        let moves = MoveOptions::new(&s, Color::White, 0.0, true, &p);
        let first = moves.pattern().await;
        assert!(first.is_some());
        assert_eq!(moves.get(MoveType::Pattern).await, first);
    }
}
