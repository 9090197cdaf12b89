//! Constants for board limits, pacing, and personality tuning.
//!
//! This module contains the configuration constants for the decision engine.
//! Values that a host might want to change per session (delays, seeds) are
//! mirrored in [`crate::config`]; the ones here are the fixed defaults.

use std::time::Duration;

// =============================================================================
// Board Geometry
// =============================================================================

/// Smallest supported board (corner moves need a 3x3 area).
pub const MIN_BOARD_SIZE: usize = 3;

/// Largest supported board.
pub const MAX_BOARD_SIZE: usize = 19;

/// Liberty count reported when no adjacent chain exists.
pub const NO_CHAIN_LIBERTIES: usize = 99;

/// Empty regions larger than this are open ground rather than contested.
pub const MAX_CONTESTED_REGION: usize = 99;

// =============================================================================
// Eye Detection
// =============================================================================

/// Largest empty region that can still count as an eye.
pub const MAX_EYE_SIZE: usize = 11;

/// An eye must also cover less than this share of the live points.
pub const MAX_EYE_SHARE: f64 = 0.4;

/// Eye blocking only looks at opponent chains with at most this many liberties.
pub const EYE_BLOCK_MAX_LIBERTIES: usize = 5;

/// Corner takeover needs at least this many live points in the 3x3 corner area.
pub const CORNER_MIN_LIVE_POINTS: usize = 7;

// =============================================================================
// Pacing
// =============================================================================

/// Wait between engine steps when no bonus cycles are stored.
pub const CYCLE_DELAY: Duration = Duration::from_millis(200);

/// Wait between engine steps while bonus cycles are being spent.
pub const BONUS_CYCLE_DELAY: Duration = Duration::from_millis(40);

/// Wait after each scanned row of the pattern search.
pub const PATTERN_ROW_DELAY: Duration = Duration::from_millis(10);

/// Bonus cycles debited per shortened wait.
pub const BONUS_CYCLE_COST: u64 = 2;

// =============================================================================
// Smart Flag Probabilities
// =============================================================================

/// Slum Snakes avoid blunders this often.
pub const SLUM_SNAKES_SMART: f64 = 0.3;

/// The Black Hand avoids blunders this often.
pub const BLACK_HAND_SMART: f64 = 0.8;

// =============================================================================
// Priority Ladder Thresholds
// =============================================================================

/// Illuminati skip pattern moves below this roll (unless nothing else exists).
pub const ILLUMINATI_PATTERN_SKIP: f64 = 0.25;

/// Illuminati only consider jumps above this roll.
pub const ILLUMINATI_JUMP: f64 = 0.4;

/// Illuminati only consider loose surrounds below this roll.
pub const ILLUMINATI_SURROUND: f64 = 0.6;

/// Daedalus follow the Illuminati ladder below this roll.
pub const DAEDALUS_FOCUS: f64 = 0.9;

/// Tetrads defer to the Illuminati ladder below this roll.
pub const TETRADS_DEFER: f64 = 0.4;

/// The Black Hand: defer / surround / random thresholds.
pub const BLACK_HAND_DEFER: f64 = 0.3;
pub const BLACK_HAND_SURROUND: f64 = 0.75;
pub const BLACK_HAND_RANDOM: f64 = 0.8;

/// Slum Snakes: defer / growth / random thresholds.
pub const SLUM_SNAKES_DEFER: f64 = 0.2;
pub const SLUM_SNAKES_GROWTH: f64 = 0.6;
pub const SLUM_SNAKES_RANDOM: f64 = 0.65;

/// Netburners: defer / expansion / growth / random thresholds.
pub const NETBURNERS_DEFER: f64 = 0.2;
pub const NETBURNERS_EXPANSION: f64 = 0.4;
pub const NETBURNERS_GROWTH: f64 = 0.6;
pub const NETBURNERS_RANDOM: f64 = 0.75;

// =============================================================================
// Komi
// =============================================================================

pub const KOMI_NETBURNERS: f64 = 1.5;
pub const KOMI_SLUM_SNAKES: f64 = 3.5;
pub const KOMI_BLACK_HAND: f64 = 3.5;
pub const KOMI_TETRADS: f64 = 5.5;
pub const KOMI_DAEDALUS: f64 = 5.5;
pub const KOMI_ILLUMINATI: f64 = 7.5;

/// Komi when no AI opponent is configured.
pub const KOMI_DEFAULT: f64 = 5.5;
