//! Game state: the position plus turn metadata, and the opponent profiles.

use std::fmt;
use std::str::FromStr;

use crate::board::{Board, Color, Point};
use crate::constants::*;
use crate::error::BoardError;

/// One turn's outcome as seen by a waiting player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Play {
    Move(Point),
    Pass,
    GameOver,
}

/// The six AI personalities.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Opponent {
    Netburners,
    SlumSnakes,
    TheBlackHand,
    Tetrads,
    Daedalus,
    Illuminati,
}

impl Opponent {
    pub const ALL: [Opponent; 6] = [
        Opponent::Netburners,
        Opponent::SlumSnakes,
        Opponent::TheBlackHand,
        Opponent::Tetrads,
        Opponent::Daedalus,
        Opponent::Illuminati,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Opponent::Netburners => "Netburners",
            Opponent::SlumSnakes => "Slum Snakes",
            Opponent::TheBlackHand => "The Black Hand",
            Opponent::Tetrads => "Tetrads",
            Opponent::Daedalus => "Daedalus",
            Opponent::Illuminati => "Illuminati",
        }
    }

    /// Starting score for white against this opponent.
    pub fn komi(self) -> f64 {
        match self {
            Opponent::Netburners => KOMI_NETBURNERS,
            Opponent::SlumSnakes => KOMI_SLUM_SNAKES,
            Opponent::TheBlackHand => KOMI_BLACK_HAND,
            Opponent::Tetrads => KOMI_TETRADS,
            Opponent::Daedalus => KOMI_DAEDALUS,
            Opponent::Illuminati => KOMI_ILLUMINATI,
        }
    }
}

impl fmt::Display for Opponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Opponent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "netburners" => Ok(Opponent::Netburners),
            "slumsnakes" => Ok(Opponent::SlumSnakes),
            "theblackhand" | "blackhand" => Ok(Opponent::TheBlackHand),
            "tetrads" => Ok(Opponent::Tetrads),
            "daedalus" => Ok(Opponent::Daedalus),
            "illuminati" => Ok(Opponent::Illuminati),
            _ => Err(format!("unknown opponent: {s}")),
        }
    }
}

/// The position plus everything needed to decide whose turn it is.
#[derive(Clone, Debug)]
pub struct BoardState {
    pub board: Board,
    /// Side that moved last; `None` once the game is over.
    pub previous_player: Option<Color>,
    /// Consecutive passes.
    pub pass_count: u32,
    /// AI profile playing white, if any.
    pub ai: Option<Opponent>,
    pub komi_override: Option<f64>,
    /// Every earlier board, oldest first.
    pub previous_boards: Vec<Board>,
}

impl BoardState {
    /// A fresh game with black to move.
    pub fn new(size: usize, ai: Option<Opponent>) -> Result<Self, BoardError> {
        Ok(Self {
            board: Board::new(size)?,
            previous_player: Some(Color::White),
            pass_count: 0,
            ai,
            komi_override: None,
            previous_boards: Vec::new(),
        })
    }

    /// A position from board text with white to move.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], ai: Option<Opponent>) -> Result<Self, BoardError> {
        Ok(Self {
            board: Board::from_rows(rows)?,
            previous_player: Some(Color::Black),
            pass_count: 0,
            ai,
            komi_override: None,
            previous_boards: Vec::new(),
        })
    }

    pub fn is_over(&self) -> bool {
        self.previous_player.is_none()
    }

    /// Side to move, or `None` when the game is over.
    pub fn to_move(&self) -> Option<Color> {
        self.previous_player.map(Color::opponent)
    }

    /// Number of placed moves (passes do not add a board).
    pub fn move_count(&self) -> usize {
        self.previous_boards.len()
    }

    pub fn komi(&self) -> f64 {
        match (self.komi_override, self.ai) {
            (Some(komi), _) => komi,
            (None, Some(ai)) => ai.komi(),
            (None, None) => KOMI_DEFAULT,
        }
    }
}
