//! Session and pacing configuration.

use std::time::Duration;

use crate::constants::{BONUS_CYCLE_COST, BONUS_CYCLE_DELAY, CYCLE_DELAY, PATTERN_ROW_DELAY};
use crate::game::Opponent;

/// How long the engine yields between steps.
#[derive(Clone, Debug, PartialEq)]
pub struct PacingConfig {
    /// Regular wait between engine steps.
    pub cycle: Duration,
    /// Shortened wait while bonus cycles remain.
    pub bonus_cycle: Duration,
    /// Wait after each row of the pattern scan.
    pub pattern_row: Duration,
    /// Bonus cycles spent per shortened wait.
    pub bonus_cost: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            cycle: CYCLE_DELAY,
            bonus_cycle: BONUS_CYCLE_DELAY,
            pattern_row: PATTERN_ROW_DELAY,
            bonus_cost: BONUS_CYCLE_COST,
        }
    }
}

impl PacingConfig {
    /// No delays at all; every wait is a bare scheduler yield.
    pub fn instant() -> Self {
        Self {
            cycle: Duration::ZERO,
            bonus_cycle: Duration::ZERO,
            pattern_row: Duration::ZERO,
            bonus_cost: BONUS_CYCLE_COST,
        }
    }
}

/// Everything needed to start a game session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub board_size: usize,
    /// AI profile playing white; `None` for two external players.
    pub opponent: Option<Opponent>,
    /// Seed for move selection (None = random)
    pub seed: Option<u64>,
    pub komi_override: Option<f64>,
    pub pacing: PacingConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board_size: 7,
            opponent: Some(Opponent::Illuminati),
            seed: None,
            komi_override: None,
            pacing: PacingConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn with_board_size(mut self, size: usize) -> Self {
        self.board_size = size;
        self
    }

    pub fn with_opponent(mut self, opponent: Option<Opponent>) -> Self {
        self.opponent = opponent;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_komi(mut self, komi: f64) -> Self {
        self.komi_override = Some(komi);
        self
    }

    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }
}
