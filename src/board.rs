//! Square board grid with offline nodes.
//!
//! Points are `(x, y)` pairs. Lookups outside the grid, and lookups of
//! offline (dead) nodes, return `None`: both read as the board edge.

use std::fmt;

use crate::constants::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::error::BoardError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// Contents of one intersection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Stone(Color),
    Offline,
}

pub type Point = (usize, usize);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    pub size: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(BoardError::InvalidSize(size));
        }
        Ok(Self {
            size,
            cells: vec![Cell::Empty; size * size],
        })
    }

    /// Parse a board from text, one string per column `x`.
    ///
    /// Character `y` of string `x` is the point `(x, y)`:
    /// `X` black, `O` white, `.` empty, `#` offline.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, BoardError> {
        let mut board = Board::new(rows.len())?;
        for (x, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let len = row.chars().count();
            if len != board.size {
                return Err(BoardError::RaggedRow {
                    row: x,
                    len,
                    expected: board.size,
                });
            }
            for (y, glyph) in row.chars().enumerate() {
                let cell = match glyph {
                    'X' => Cell::Stone(Color::Black),
                    'O' => Cell::Stone(Color::White),
                    '.' => Cell::Empty,
                    '#' => Cell::Offline,
                    _ => return Err(BoardError::UnknownGlyph { glyph, x, y }),
                };
                board.set((x, y), cell);
            }
        }
        Ok(board)
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        x * self.size + y
    }

    pub fn in_bounds(&self, (x, y): Point) -> bool {
        x < self.size && y < self.size
    }

    /// The cell at `pt`, or `None` off the board.
    pub fn cell(&self, (x, y): Point) -> Option<Cell> {
        if x >= self.size || y >= self.size {
            return None;
        }
        Some(self.cells[self.idx(x, y)])
    }

    /// The cell at `pt`, or `None` for the edge sentinel (off-board or offline).
    pub fn get(&self, pt: Point) -> Option<Cell> {
        match self.cell(pt) {
            Some(Cell::Offline) | None => None,
            live => live,
        }
    }

    /// Signed lookup, for offsets that may run off the low edge.
    pub fn get_offset(&self, (x, y): Point, dx: isize, dy: isize) -> Option<Cell> {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        self.get((nx, ny))
    }

    pub fn stone(&self, pt: Point) -> Option<Color> {
        match self.get(pt) {
            Some(Cell::Stone(c)) => Some(c),
            _ => None,
        }
    }

    pub fn is_empty(&self, pt: Point) -> bool {
        self.get(pt) == Some(Cell::Empty)
    }

    pub(crate) fn set(&mut self, (x, y): Point, cell: Cell) {
        let i = self.idx(x, y);
        self.cells[i] = cell;
    }

    /// Every point of the grid, column by column.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let s = self.size;
        (0..s).flat_map(move |x| (0..s).map(move |y| (x, y)))
    }

    /// Every point that is not an offline node.
    pub fn live_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.points().filter(|&pt| self.get(pt).is_some())
    }

    /// Orthogonal neighbors in north, east, south, west order.
    ///
    /// Entries are `None` where the neighbor is the edge sentinel.
    pub fn neighbors(&self, (x, y): Point) -> [Option<Point>; 4] {
        let live = |pt: Option<Point>| pt.filter(|&p| self.get(p).is_some());
        [
            live(Some((x, y + 1))),
            live(Some((x + 1, y))),
            live(y.checked_sub(1).map(|ny| (x, ny))),
            live(x.checked_sub(1).map(|nx| (nx, y))),
        ]
    }

    /// Live orthogonal neighbors.
    pub fn adjacent(&self, pt: Point) -> impl Iterator<Item = Point> {
        self.neighbors(pt).into_iter().flatten()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.size).rev() {
            for x in 0..self.size {
                let ch = match self.cell((x, y)) {
                    Some(Cell::Stone(Color::Black)) => 'X',
                    Some(Cell::Stone(Color::White)) => 'O',
                    Some(Cell::Offline) => '#',
                    _ => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
