//! Board analysis: chains, liberties, eyes, territory and legality.
//!
//! Everything here is a pure function over a board snapshot, except
//! [`make_move`], [`pass_turn`] and [`end_game`], which are the only
//! primitives that mutate a [`BoardState`].
//!
//! Chains cover empty regions as well as stones, so every live point has a
//! chain id. Ids are only meaningful within the [`Analysis`] that produced them.

use std::collections::BTreeMap;

use crate::board::{Board, Cell, Color, Point};
use crate::constants::{MAX_EYE_SHARE, MAX_EYE_SIZE, NO_CHAIN_LIBERTIES};
use crate::error::MoveError;
use crate::game::{BoardState, Play};

pub type ChainId = usize;

/// A maximal connected group of identical cells.
#[derive(Clone, Debug)]
pub struct Chain {
    pub id: ChainId,
    pub cell: Cell,
    pub points: Vec<Point>,
    /// Distinct empty neighbors. Always empty for empty regions.
    pub liberties: Vec<Point>,
}

impl Chain {
    pub fn color(&self) -> Option<Color> {
        match self.cell {
            Cell::Stone(c) => Some(c),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Chain decomposition of one board snapshot.
#[derive(Clone, Debug)]
pub struct Analysis {
    size: usize,
    chain_of: Vec<Option<ChainId>>,
    chains: Vec<Chain>,
}

impl Analysis {
    pub fn new(board: &Board) -> Self {
        let size = board.size;
        let mut chain_of = vec![None; size * size];
        let mut chains = Vec::new();

        for start in board.live_points() {
            if chain_of[start.0 * size + start.1].is_some() {
                continue;
            }
            let Some(cell) = board.get(start) else {
                continue;
            };
            let id = chains.len();
            let mut points = Vec::new();
            let mut liberties = Vec::new();
            let mut liberty_seen = vec![false; size * size];
            let mut stack = vec![start];
            chain_of[start.0 * size + start.1] = Some(id);

            while let Some(pt) = stack.pop() {
                points.push(pt);
                for n in board.adjacent(pt) {
                    let ni = n.0 * size + n.1;
                    match board.get(n) {
                        Some(c) if c == cell => {
                            if chain_of[ni].is_none() {
                                chain_of[ni] = Some(id);
                                stack.push(n);
                            }
                        }
                        Some(Cell::Empty) if matches!(cell, Cell::Stone(_)) => {
                            if !liberty_seen[ni] {
                                liberty_seen[ni] = true;
                                liberties.push(n);
                            }
                        }
                        _ => {}
                    }
                }
            }
            points.sort_unstable();
            liberties.sort_unstable();
            chains.push(Chain {
                id,
                cell,
                points,
                liberties,
            });
        }

        Self {
            size,
            chain_of,
            chains,
        }
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn chain(&self, id: ChainId) -> &Chain {
        &self.chains[id]
    }

    pub fn chain_id(&self, (x, y): Point) -> Option<ChainId> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.chain_of[x * self.size + y]
    }

    pub fn chain_at(&self, pt: Point) -> Option<&Chain> {
        self.chain_id(pt).map(|id| &self.chains[id])
    }

    /// Stone chains of one color.
    pub fn chains_of(&self, color: Color) -> impl Iterator<Item = &Chain> {
        self.chains
            .iter()
            .filter(move |c| c.cell == Cell::Stone(color))
    }

    /// Distinct chains orthogonally touching `chain`, excluding itself.
    pub fn neighboring_chains(&self, board: &Board, chain: &Chain) -> Vec<&Chain> {
        let mut ids: Vec<ChainId> = chain
            .points
            .iter()
            .flat_map(|&pt| board.adjacent(pt))
            .filter_map(|n| self.chain_id(n))
            .filter(|&id| id != chain.id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.into_iter().map(|id| &self.chains[id]).collect()
    }
}

// =============================================================================
// Liberty queries
// =============================================================================

/// Liberties the mover's group would have after playing at `pt`.
///
/// Union of `pt`'s empty neighbors and the liberties of every friendly chain
/// it would join, minus `pt` itself. Captures are not accounted for.
pub fn effective_liberties_of_new_move(
    board: &Board,
    analysis: &Analysis,
    pt: Point,
    player: Color,
) -> Vec<Point> {
    let mut libs = Vec::new();
    for n in board.adjacent(pt) {
        match board.get(n) {
            Some(Cell::Empty) => libs.push(n),
            Some(Cell::Stone(c)) if c == player => {
                if let Some(chain) = analysis.chain_at(n) {
                    libs.extend_from_slice(&chain.liberties);
                }
            }
            _ => {}
        }
    }
    libs.sort_unstable();
    libs.dedup();
    libs.retain(|&l| l != pt);
    libs
}

/// The chain of `color` next to `pt` with the fewest liberties.
pub fn weakest_adjacent_chain<'a>(
    board: &Board,
    analysis: &'a Analysis,
    pt: Point,
    color: Color,
) -> Option<&'a Chain> {
    board
        .adjacent(pt)
        .filter(|&n| board.stone(n) == Some(color))
        .filter_map(|n| analysis.chain_at(n))
        .min_by_key(|c| c.liberties.len())
}

/// Liberty count of the weakest `color` chain next to `pt`.
pub fn min_liberty_count_of_adjacent_chains(
    board: &Board,
    analysis: &Analysis,
    pt: Point,
    color: Color,
) -> usize {
    weakest_adjacent_chain(board, analysis, pt, color)
        .map(|c| c.liberties.len())
        .unwrap_or(NO_CHAIN_LIBERTIES)
}

// =============================================================================
// Eyes
// =============================================================================

/// Eyes of `player`, keyed by the chain that encloses them.
///
/// An eye is a small empty region whose only neighboring chain is a single
/// `player` chain (edges and offline nodes count as enclosing).
pub fn eyes_by_chain(
    board: &Board,
    analysis: &Analysis,
    player: Color,
) -> BTreeMap<ChainId, Vec<Vec<Point>>> {
    let live = board.live_points().count() as f64;
    let mut eyes: BTreeMap<ChainId, Vec<Vec<Point>>> = BTreeMap::new();

    for region in analysis.chains().iter().filter(|c| c.cell == Cell::Empty) {
        if region.len() > MAX_EYE_SIZE || region.len() as f64 >= live * MAX_EYE_SHARE {
            continue;
        }
        let borders = analysis.neighboring_chains(board, region);
        if let [owner] = borders.as_slice() {
            if owner.cell == Cell::Stone(player) {
                eyes.entry(owner.id).or_default().push(region.points.clone());
            }
        }
    }
    eyes
}

/// Alive groups and total eyes for one side.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EyeCount {
    /// Chains with two or more eyes.
    pub alive: usize,
    pub eyes: usize,
}

impl EyeCount {
    pub fn of(board: &Board, player: Color) -> Self {
        let analysis = Analysis::new(board);
        Self::from_eyes(&eyes_by_chain(board, &analysis, player))
    }

    pub fn from_eyes(eyes: &BTreeMap<ChainId, Vec<Vec<Point>>>) -> Self {
        EyeCount {
            alive: eyes.values().filter(|e| e.len() >= 2).count(),
            eyes: eyes.values().map(Vec::len).sum(),
        }
    }
}

// =============================================================================
// Territory
// =============================================================================

/// Every point `player` may legally play.
///
/// With `exclude_friendly_eyes`, points inside the eyes of `player`'s alive
/// chains are left out: filling them can only hurt.
pub fn disputed_territory(state: &BoardState, player: Color, exclude_friendly_eyes: bool) -> Vec<Point> {
    let mut moves: Vec<Point> = state
        .board
        .live_points()
        .filter(|&pt| check_placement(state, pt, player).is_ok())
        .collect();

    if exclude_friendly_eyes {
        let analysis = Analysis::new(&state.board);
        let eyes = eyes_by_chain(&state.board, &analysis, player);
        let friendly: Vec<Point> = eyes
            .values()
            .filter(|e| e.len() >= 2)
            .flatten()
            .flatten()
            .copied()
            .collect();
        moves.retain(|pt| !friendly.contains(pt));
    }
    moves
}

/// Available points inside an empty region bordered by both colors.
pub fn contested_points(
    board: &Board,
    analysis: &Analysis,
    available: &[Point],
    max_region: usize,
) -> Vec<Point> {
    available
        .iter()
        .copied()
        .filter(|&pt| {
            let Some(region) = analysis.chain_at(pt) else {
                return false;
            };
            if region.len() > max_region {
                return false;
            }
            let borders = analysis.neighboring_chains(board, region);
            let touches = |color| borders.iter().any(|c| c.color() == Some(color));
            touches(Color::Black) && touches(Color::White)
        })
        .collect()
}

// =============================================================================
// Move execution
// =============================================================================

/// Collect all stones in the group at `start`. Returns the group size.
fn collect_group(board: &Board, start: Point, out: &mut Vec<Point>) -> usize {
    let Some(color) = board.get(start) else {
        return 0;
    };
    let mut stack = vec![start];
    let mut visited = vec![false; board.size * board.size];
    let mut count = 0;

    while let Some(pt) = stack.pop() {
        let i = pt.0 * board.size + pt.1;
        if visited[i] {
            continue;
        }
        visited[i] = true;
        if board.get(pt) == Some(color) {
            out.push(pt);
            count += 1;
            for n in board.adjacent(pt) {
                if board.get(n) == Some(color) {
                    stack.push(n);
                }
            }
        }
    }
    count
}

/// Count the distinct liberties of the group at `start`.
fn group_liberties(board: &Board, start: Point) -> usize {
    let Some(color) = board.get(start) else {
        return 0;
    };
    let mut stack = vec![start];
    let mut visited = vec![false; board.size * board.size];
    let mut liberty_visited = vec![false; board.size * board.size];
    let mut libs = 0;

    while let Some(pt) = stack.pop() {
        let i = pt.0 * board.size + pt.1;
        if visited[i] {
            continue;
        }
        visited[i] = true;
        for n in board.adjacent(pt) {
            let ni = n.0 * board.size + n.1;
            match board.get(n) {
                Some(Cell::Empty) => {
                    if !liberty_visited[ni] {
                        liberty_visited[ni] = true;
                        libs += 1;
                    }
                }
                Some(c) if c == color && !visited[ni] => stack.push(n),
                _ => {}
            }
        }
    }
    libs
}

/// Place a stone and remove captured opponent groups.
fn place(board: &Board, pt: Point, player: Color) -> (Board, usize) {
    let mut next = board.clone();
    next.set(pt, Cell::Stone(player));

    let mut to_remove = Vec::new();
    let mut captured = 0;
    for n in board.adjacent(pt) {
        if next.stone(n) == Some(player.opponent()) && group_liberties(&next, n) == 0 {
            captured += collect_group(&next, n, &mut to_remove);
        }
    }
    for r in to_remove {
        next.set(r, Cell::Empty);
    }
    (next, captured)
}

/// The board after `player` plays at `pt`, captures resolved.
///
/// Does not check legality.
pub fn simulate_move(board: &Board, pt: Point, player: Color) -> Board {
    place(board, pt, player).0
}

/// Check a placement ignoring turn order. Returns the resulting board.
pub fn check_placement(state: &BoardState, pt: Point, player: Color) -> Result<Board, MoveError> {
    match state.board.cell(pt) {
        None => return Err(MoveError::OffBoard(pt)),
        Some(Cell::Offline) => return Err(MoveError::Offline(pt)),
        Some(Cell::Stone(_)) => return Err(MoveError::Occupied(pt)),
        Some(Cell::Empty) => {}
    }

    let (next, captured) = place(&state.board, pt, player);
    if captured == 0 && group_liberties(&next, pt) == 0 {
        return Err(MoveError::Suicide(pt));
    }
    if state.previous_boards.contains(&next) {
        return Err(MoveError::Repeat(pt));
    }
    Ok(next)
}

/// Full legality check, including game-over and turn order.
pub fn validate_move(state: &BoardState, pt: Point, player: Color) -> Result<Board, MoveError> {
    match state.previous_player {
        None => Err(MoveError::GameOver),
        Some(prev) if prev == player => Err(MoveError::NotYourTurn),
        Some(_) => check_placement(state, pt, player),
    }
}

/// Play a move, recording the previous board in the history.
pub fn make_move(state: &mut BoardState, pt: Point, player: Color) -> Result<(), MoveError> {
    let next = validate_move(state, pt, player)?;
    let prior = std::mem::replace(&mut state.board, next);
    state.previous_boards.push(prior);
    state.previous_player = Some(player);
    state.pass_count = 0;
    Ok(())
}

/// Record a pass. Returns `true` when this pass ended the game.
pub fn pass_turn(state: &mut BoardState, player: Color) -> bool {
    if state.is_over() {
        return false;
    }
    state.previous_player = Some(player);
    state.pass_count += 1;
    if state.pass_count >= 2 {
        end_game(state);
        return true;
    }
    false
}

pub fn end_game(state: &mut BoardState) {
    state.previous_player = None;
}

/// Reconstruct the most recent play from the board history.
pub fn previous_move(state: &BoardState) -> Play {
    let Some(mover) = state.previous_player else {
        return Play::GameOver;
    };
    if state.pass_count > 0 {
        return Play::Pass;
    }
    let Some(prior) = state.previous_boards.last() else {
        return Play::Pass;
    };
    state
        .board
        .live_points()
        .find(|&pt| prior.is_empty(pt) && state.board.stone(pt) == Some(mover))
        .map(Play::Move)
        .unwrap_or(Play::Pass)
}
