//! Turn handoff between the engine and external players.
//!
//! Each color owns one slot holding a [`NextTurn`] future and, while that
//! future is pending, the resolver that will complete it. A slot is only
//! re-armed after its previous future resolved, so a color never has two
//! pending futures at once.

use tokio::sync::watch;

use crate::board::Color;
use crate::game::Play;

/// A future for "the next time it is this color's turn".
///
/// Cloning shares the same underlying resolution. Two handles are the same
/// future exactly when their [`id`](NextTurn::id)s match.
#[derive(Clone, Debug)]
pub struct NextTurn {
    id: u64,
    rx: watch::Receiver<Option<Play>>,
}

impl NextTurn {
    fn pending(id: u64) -> (Self, watch::Sender<Option<Play>>) {
        let (tx, rx) = watch::channel(None);
        (Self { id, rx }, tx)
    }

    /// A future that is already complete.
    pub fn resolved(id: u64, play: Play) -> Self {
        let (_, rx) = watch::channel(Some(play));
        Self { id, rx }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_resolved(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// The resolved value, if any, without waiting.
    pub fn peek(&self) -> Option<Play> {
        *self.rx.borrow()
    }

    /// Wait for the turn. A dropped resolver reads as game over.
    pub async fn wait(mut self) -> Play {
        // a closed channel still holds the last value sent
        let _ = self.rx.wait_for(Option::is_some).await;
        self.peek().unwrap_or(Play::GameOver)
    }
}

/// One color's slot: the current future plus its resolver while pending.
#[derive(Debug)]
pub struct PlayerPromise {
    next_turn: NextTurn,
    resolver: Option<watch::Sender<Option<Play>>>,
}

impl PlayerPromise {
    fn resolved(id: u64, play: Play) -> Self {
        Self {
            next_turn: NextTurn::resolved(id, play),
            resolver: None,
        }
    }

    pub fn next_turn(&self) -> &NextTurn {
        &self.next_turn
    }

    pub fn is_pending(&self) -> bool {
        self.resolver.is_some()
    }

    /// Complete the pending future. Returns `false` if nothing was pending.
    pub fn resolve(&mut self, play: Play) -> bool {
        match self.resolver.take() {
            Some(tx) => {
                tx.send_replace(Some(play));
                true
            }
            None => false,
        }
    }

    /// Replace a resolved future with a fresh pending one.
    fn arm(&mut self, id: u64) {
        let (next_turn, tx) = NextTurn::pending(id);
        self.next_turn = next_turn;
        self.resolver = Some(tx);
    }
}

/// The two turn slots of one game session.
#[derive(Debug)]
pub struct TurnSynchronizer {
    black: PlayerPromise,
    white: PlayerPromise,
    next_id: u64,
}

impl Default for TurnSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnSynchronizer {
    /// Both slots armed and pending.
    pub fn new() -> Self {
        let mut turns = Self {
            black: PlayerPromise::resolved(0, Play::GameOver),
            white: PlayerPromise::resolved(1, Play::GameOver),
            next_id: 2,
        };
        turns.reset(false);
        turns
    }

    pub fn slot(&self, color: Color) -> &PlayerPromise {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    fn slot_mut(&mut self, color: Color) -> &mut PlayerPromise {
        match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        }
    }

    pub fn next_turn(&self, color: Color) -> NextTurn {
        self.slot(color).next_turn.clone()
    }

    /// A fresh future that is already resolved with [`Play::GameOver`].
    pub fn game_over(&mut self) -> NextTurn {
        NextTurn::resolved(self.fresh_id(), Play::GameOver)
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Resolve every pending future with [`Play::GameOver`].
    ///
    /// Unless the game itself ended, both slots are armed again right away.
    pub fn reset(&mut self, end_of_game: bool) {
        for color in [Color::Black, Color::White] {
            self.slot_mut(color).resolve(Play::GameOver);
            if !end_of_game {
                let id = self.fresh_id();
                self.slot_mut(color).arm(id);
            }
        }
    }

    /// Hand the turn from `mover` to its opponent.
    ///
    /// The opponent's pending future resolves with `play`. The mover's slot
    /// is armed if its last future already resolved. Returns the mover's
    /// future, or `None` if this move was already handled.
    pub fn advance(&mut self, mover: Color, play: Play) -> Option<NextTurn> {
        if !self.slot_mut(mover.opponent()).resolve(play) {
            return None;
        }
        if !self.slot(mover).is_pending() {
            let id = self.fresh_id();
            self.slot_mut(mover).arm(id);
        }
        Some(self.next_turn(mover))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_synchronizer_is_pending() {
        let turns = TurnSynchronizer::new();
        assert!(turns.slot(Color::Black).is_pending());
        assert!(turns.slot(Color::White).is_pending());
        assert!(!turns.next_turn(Color::Black).is_resolved());
        assert_ne!(turns.next_turn(Color::Black).id(), turns.next_turn(Color::White).id());
    }

    #[test]
    fn test_reset_resolves_with_game_over() {
        let mut turns = TurnSynchronizer::new();
        let black = turns.next_turn(Color::Black);
        let white = turns.next_turn(Color::White);

        turns.reset(true);
        assert_eq!(black.peek(), Some(Play::GameOver));
        assert_eq!(white.peek(), Some(Play::GameOver));
        assert!(!turns.slot(Color::Black).is_pending());

        turns.reset(false);
        assert!(turns.slot(Color::Black).is_pending());
        assert_ne!(turns.next_turn(Color::Black).id(), black.id());
    }

    #[test]
    fn test_advance_is_idempotent() {
        let mut turns = TurnSynchronizer::new();
        let white = turns.next_turn(Color::White);

        let first = turns.advance(Color::Black, Play::Move((2, 2))).unwrap();
        assert_eq!(white.peek(), Some(Play::Move((2, 2))));
        // black's slot was still pending, so it is reused
        assert!(!first.is_resolved());
        assert!(turns.advance(Color::Black, Play::Move((2, 2))).is_none());
        assert_eq!(turns.next_turn(Color::Black).id(), first.id());
    }

    #[test]
    fn test_advance_rearms_resolved_slot() {
        let mut turns = TurnSynchronizer::new();
        turns.advance(Color::Black, Play::Move((0, 0)));
        let black_before = turns.next_turn(Color::Black);

        let white_turn = turns.advance(Color::White, Play::Move((1, 1))).unwrap();
        assert_eq!(black_before.peek(), Some(Play::Move((1, 1))));
        assert!(!white_turn.is_resolved());

        // white slot resolved after black's move, and is pending again now
        assert!(turns.slot(Color::White).is_pending());
        assert!(!turns.slot(Color::Black).is_pending());
    }

    #[tokio::test]
    async fn test_wait_sees_resolution() {
        let mut turns = TurnSynchronizer::new();
        let white = turns.next_turn(Color::White);
        let waiter = tokio::spawn(white.wait());
        tokio::task::yield_now().await;
        turns.advance(Color::Black, Play::Pass);
        assert_eq!(waiter.await.unwrap(), Play::Pass);
    }

    #[tokio::test]
    async fn test_dropped_resolver_reads_as_game_over() {
        let (turn, tx) = NextTurn::pending(7);
        drop(tx);
        assert_eq!(turn.wait().await, Play::GameOver);
    }
}
