//! A running game: board state, turn slots, pacing and the AI seat.
//!
//! [`GoSession`] is a cheap handle (`Rc` inside) meant for a single-threaded
//! runtime. AI turns run as local tasks, so every method that can start one
//! must be called from within a [`tokio::task::LocalSet`].

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, error, info, warn};

use crate::analysis::{self, make_move, pass_turn, previous_move};
use crate::board::{Color, Point};
use crate::config::{PacingConfig, SessionConfig};
use crate::error::{GoError, MoveError};
use crate::game::{BoardState, Opponent, Play};
use crate::pacing::Pacer;
use crate::personality::get_move;
use crate::turns::{NextTurn, TurnSynchronizer};

struct SessionInner {
    state: BoardState,
    /// Bumped whenever the board state is replaced.
    generation: u64,
    turns: TurnSynchronizer,
    rng: fastrand::Rng,
}

/// Identifies one turn of one game. Any stone, pass, game end or new game
/// changes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TurnKey {
    generation: u64,
    moves: usize,
    passes: u32,
    mover: Option<Color>,
}

impl SessionInner {
    fn turn_key(&self) -> TurnKey {
        TurnKey {
            generation: self.generation,
            moves: self.state.move_count(),
            passes: self.state.pass_count,
            mover: self.state.previous_player,
        }
    }
}

#[derive(Clone)]
pub struct GoSession {
    inner: Rc<RefCell<SessionInner>>,
    pacer: Rc<Pacer>,
}

impl GoSession {
    /// Start a fresh game with black to move.
    ///
    /// Turns are armed but not started; call [`GoSession::reset_promises`]
    /// (or make the first move) to begin.
    pub fn new(config: SessionConfig) -> Result<Self, GoError> {
        let mut state = BoardState::new(config.board_size, config.opponent)?;
        state.komi_override = config.komi_override;
        Ok(Self::from_state(state, config.pacing, config.seed))
    }

    /// Wrap an existing position, e.g. one parsed from board text.
    pub fn from_state(state: BoardState, pacing: PacingConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let inner = SessionInner {
            state,
            generation: 0,
            turns: TurnSynchronizer::new(),
            rng,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
            pacer: Rc::new(Pacer::new(pacing)),
        }
    }

    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    /// A copy of the current position.
    pub fn snapshot(&self) -> BoardState {
        self.inner.borrow().state.clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.borrow().generation
    }

    pub fn is_over(&self) -> bool {
        self.inner.borrow().state.is_over()
    }

    pub fn add_offline_cycles(&self, cycles: u64) {
        self.pacer.add_cycles(cycles);
    }

    /// The future that resolves the next time it is `color`'s turn.
    ///
    /// Already resolved with [`Play::GameOver`] if the game has ended.
    pub fn next_turn(&self, color: Color) -> NextTurn {
        let mut inner = self.inner.borrow_mut();
        if inner.state.is_over() {
            return inner.turns.game_over();
        }
        inner.turns.next_turn(color)
    }

    /// Process the move that was just made.
    ///
    /// Resolves the waiting side, starts the AI if it is white's turn and
    /// an opponent is configured, and returns the future of the side that
    /// just moved. Calling it again for the same move changes nothing.
    ///
    /// # Panics
    ///
    /// Starting an AI turn outside a `LocalSet` panics.
    pub fn handle_next_turn(&self, use_offline_cycles: bool) -> NextTurn {
        let mut inner = self.inner.borrow_mut();
        let Some(mover) = inner.state.previous_player else {
            return inner.turns.game_over();
        };
        let play = previous_move(&inner.state);
        let Some(turn) = inner.turns.advance(mover, play) else {
            return inner.turns.next_turn(mover);
        };

        let current = mover.opponent();
        debug!(%current, ?play, "turn advanced");
        // the engine only ever plays white
        let ai = inner.state.ai.filter(|_| current == Color::White);
        if let Some(ai) = ai {
            self.spawn_ai_turn(&mut inner, ai, current, use_offline_cycles);
        }
        turn
    }

    fn spawn_ai_turn(&self, inner: &mut SessionInner, ai: Opponent, color: Color, use_offline_cycles: bool) {
        let snapshot = inner.state.clone();
        let key = inner.turn_key();
        let rng = inner.rng.fork();
        let session = self.clone();
        tokio::task::spawn_local(async move {
            session
                .play_ai_turn(snapshot, key, ai, color, use_offline_cycles, rng)
                .await;
        });
    }

    /// The game moved on or was replaced since `key` was taken.
    fn is_stale(&self, key: TurnKey) -> bool {
        self.inner.borrow().turn_key() != key
    }

    async fn play_ai_turn(
        self,
        snapshot: BoardState,
        key: TurnKey,
        ai: Opponent,
        color: Color,
        use_offline_cycles: bool,
        mut rng: fastrand::Rng,
    ) {
        let play = match get_move(&snapshot, color, ai, &self.pacer, use_offline_cycles, &mut rng).await {
            Ok(play) => play,
            Err(err) => {
                error!(%ai, %err, "AI move computation failed");
                return;
            }
        };
        if self.is_stale(key) {
            debug!(%ai, ?play, "discarding AI result for an earlier turn");
            return;
        }

        match play {
            Play::Pass => {
                let ended = pass_turn(&mut self.inner.borrow_mut().state, color);
                if ended {
                    self.finish();
                    return;
                }
            }
            Play::Move(pt) => {
                self.pacer.wait_cycle(use_offline_cycles).await;
                if self.is_stale(key) {
                    warn!(%ai, point = ?pt, "AI move attempted, but the board state has changed");
                    return;
                }
                let result = make_move(&mut self.inner.borrow_mut().state, pt, color);
                if let Err(err) = result {
                    error!(%ai, point = ?pt, %err, "invalid AI move attempted");
                    return;
                }
            }
            Play::GameOver => return,
        }
        self.handle_next_turn(use_offline_cycles);
    }

    /// Play a stone for `color` and advance the turn.
    pub fn play(&self, pt: Point, color: Color) -> Result<NextTurn, GoError> {
        make_move(&mut self.inner.borrow_mut().state, pt, color)?;
        Ok(self.handle_next_turn(true))
    }

    /// Pass for `color`. Two passes in a row end the game.
    pub fn pass(&self, color: Color) -> Result<NextTurn, GoError> {
        let ended = {
            let mut inner = self.inner.borrow_mut();
            match inner.state.to_move() {
                None => return Err(MoveError::GameOver.into()),
                Some(c) if c != color => return Err(MoveError::NotYourTurn.into()),
                Some(_) => pass_turn(&mut inner.state, color),
            }
        };
        if ended {
            self.finish();
            return Ok(self.next_turn(color));
        }
        Ok(self.handle_next_turn(true))
    }

    /// End the game now, releasing every waiter with game over.
    pub fn end_game(&self) {
        analysis::end_game(&mut self.inner.borrow_mut().state);
        self.finish();
    }

    fn finish(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.turns.reset(true);
        info!(moves = inner.state.move_count(), "game over");
    }

    /// Release every waiter with game over. Re-arms both colors unless the
    /// game ended.
    pub fn reset(&self, end_of_game: bool) {
        self.inner.borrow_mut().turns.reset(end_of_game);
    }

    /// Reset the turn cycle and start it again from the current position.
    pub fn reset_promises(&self) -> NextTurn {
        self.reset(false);
        self.handle_next_turn(true)
    }

    /// Replace the game with a fresh board and start the first turn.
    ///
    /// Waiters on the old game are released with game over first.
    pub fn new_game(&self, board_size: usize, opponent: Option<Opponent>) -> Result<NextTurn, GoError> {
        let state = BoardState::new(board_size, opponent)?;
        {
            let mut inner = self.inner.borrow_mut();
            inner.turns.reset(false);
            inner.state = state;
            inner.generation += 1;
        }
        match opponent {
            Some(ai) => info!(size = board_size, %ai, "new game"),
            None => info!(size = board_size, "new game"),
        }
        Ok(self.handle_next_turn(true))
    }
}
