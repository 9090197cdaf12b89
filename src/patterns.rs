//! 3x3 shape patterns for move generation.
//!
//! Each template is a 9-character string read row by row, where row `r`
//! covers column `x - 1 + r` and character `c` covers `y - 1 + c` around
//! the candidate point:
//! - X: the mover's stone
//! - O: the opponent's stone
//! - x: anything but the opponent's stone (mover, empty or edge)
//! - o: anything but the mover's stone
//! - .: empty
//! - ' ': edge of the board (off-board or offline node)
//! - ?: anything
//!
//! Templates are mover-relative, so one catalogue serves both colors. Each is
//! expanded into its 8 dihedral variants on first use.

use std::sync::OnceLock;

use crate::analysis::{Analysis, effective_liberties_of_new_move};
use crate::board::{Board, Cell, Color, Point};
use crate::pacing::Pacer;
use crate::roll::pick;

pub type Template = [u8; 9];

/// Cells around a point; `None` is the edge sentinel.
pub type Neighborhood = [Option<Cell>; 9];

const PAT3_SRC: &[&str] = &[
    // 1- hane pattern - enclosing hane
    "XOX...???",
    // 2- hane pattern - non-cutting hane
    "XO....?.?",
    // 3- hane pattern - magari
    "XO?X..o.?",
    // 4- generic pattern - katatsuke or diagonal attachment
    ".O.X.....",
    // 5- cut1 pattern (kiri) - unprotected cut
    "XO?O.x?x?",
    // 6- cut1 pattern (kiri) - peeped cut
    "XO?O.X???",
    // 7- cut2 pattern (de)
    "?X?O.Oxxx",
    // 8- cut keima
    "OX?x.O???",
    // 9- side pattern - chase
    "X.?O.?   ",
    // 10- side pattern - block side cut
    "OX?X.O   ",
    // 11- side pattern - block side connection
    "?X?o.O   ",
    // 12- side pattern - sagari
    "?XOo.o   ",
    // 13- side pattern - cut
    "?OXX.O   ",
];

static PATTERNS: OnceLock<Vec<Template>> = OnceLock::new();

/// The full expanded catalogue. Symmetric templates repeat.
pub fn patterns() -> &'static [Template] {
    PATTERNS.get_or_init(expand_patterns)
}

fn expand_patterns() -> Vec<Template> {
    let mut out = Vec::with_capacity(PAT3_SRC.len() * 8);
    for src in PAT3_SRC {
        let mut bytes = [b'?'; 9];
        bytes.copy_from_slice(&src.as_bytes()[..9]);
        pat_enumerate(&bytes, &mut out);
    }
    out
}

/// All 8 rotations and reflections of a 3x3 grid.
pub fn symmetries<T: Copy>(src: &[T; 9]) -> Vec<[T; 9]> {
    let mut out = Vec::with_capacity(8);
    pat_enumerate(src, &mut out);
    out
}

fn pat_enumerate<T: Copy>(src: &[T; 9], out: &mut Vec<[T; 9]>) {
    let mut src = *src;
    pat_enumerate1(&src, out);
    rot90(&mut src);
    pat_enumerate1(&src, out);
}

fn pat_enumerate1<T: Copy>(src: &[T; 9], out: &mut Vec<[T; 9]>) {
    let mut src = *src;
    pat_enumerate2(&src, out);
    vertflip(&mut src);
    pat_enumerate2(&src, out);
}

fn pat_enumerate2<T: Copy>(src: &[T; 9], out: &mut Vec<[T; 9]>) {
    let mut src = *src;
    out.push(src);
    horizflip(&mut src);
    out.push(src);
}

/// Swap the first and last rows.
pub fn horizflip<T: Copy>(src: &mut [T; 9]) {
    src.swap(0, 6);
    src.swap(1, 7);
    src.swap(2, 8);
}

/// Swap the first and last columns.
pub fn vertflip<T: Copy>(src: &mut [T; 9]) {
    src.swap(0, 2);
    src.swap(3, 5);
    src.swap(6, 8);
}

/// Quarter turn.
pub fn rot90<T: Copy>(src: &mut [T; 9]) {
    let t = src[0];
    src[0] = src[2];
    src[2] = src[8];
    src[8] = src[6];
    src[6] = t;

    let t = src[1];
    src[1] = src[5];
    src[5] = src[7];
    src[7] = src[3];
    src[3] = t;
}

/// Read the 3x3 neighborhood centered on `pt`.
pub fn neighborhood(board: &Board, pt: Point) -> Neighborhood {
    std::array::from_fn(|i| {
        let dx = (i / 3) as isize - 1;
        let dy = (i % 3) as isize - 1;
        board.get_offset(pt, dx, dy)
    })
}

fn glyph_matches(glyph: u8, cell: Option<Cell>, player: Color) -> bool {
    let mine = Some(Cell::Stone(player));
    let theirs = Some(Cell::Stone(player.opponent()));
    match glyph {
        b'X' => cell == mine,
        b'O' => cell == theirs,
        b'x' => cell != theirs,
        b'o' => cell != mine,
        b'.' => cell == Some(Cell::Empty),
        b' ' => cell.is_none(),
        b'?' => true,
        _ => false,
    }
}

/// Does a neighborhood satisfy one template for `player`?
pub fn template_matches(template: &Template, hood: &Neighborhood, player: Color) -> bool {
    template
        .iter()
        .zip(hood.iter())
        .all(|(&glyph, &cell)| glyph_matches(glyph, cell, player))
}

/// Does the point match any expanded template?
pub fn pattern_match(board: &Board, pt: Point, player: Color) -> bool {
    let hood = neighborhood(board, pt);
    patterns().iter().any(|t| template_matches(t, &hood, player))
}

/// Pick one available point that matches a shape pattern.
///
/// With `smart`, points that would leave the new stone's group with a
/// single liberty are skipped. Yields to the scheduler after every row.
pub async fn find_any_matched_pattern(
    board: &Board,
    analysis: &Analysis,
    player: Color,
    available: &[Point],
    smart: bool,
    roll: f64,
    pacer: &Pacer,
) -> Option<Point> {
    let mut moves = Vec::new();
    for x in 0..board.size {
        for y in 0..board.size {
            let pt = (x, y);
            if !available.contains(&pt) || !pattern_match(board, pt, player) {
                continue;
            }
            if smart && effective_liberties_of_new_move(board, analysis, pt, player).len() <= 1 {
                continue;
            }
            moves.push(pt);
        }
        pacer.row_yield().await;
    }
    pick(&moves, roll)
}
