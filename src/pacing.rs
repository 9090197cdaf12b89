//! Cooperative pacing waits.
//!
//! The engine yields between steps so a host UI can repaint. While bonus
//! (offline) cycles are stored, each wait is shortened and debits the budget,
//! which lets a fast-forwarded game run almost instantly.

use std::cell::Cell;
use std::time::Duration;

use crate::config::PacingConfig;

#[derive(Debug, Default)]
pub struct Pacer {
    config: PacingConfig,
    stored_cycles: Cell<u64>,
}

impl Pacer {
    pub fn new(config: PacingConfig) -> Self {
        Self {
            config,
            stored_cycles: Cell::new(0),
        }
    }

    pub fn config(&self) -> &PacingConfig {
        &self.config
    }

    pub fn stored_cycles(&self) -> u64 {
        self.stored_cycles.get()
    }

    pub fn add_cycles(&self, cycles: u64) {
        self.stored_cycles.set(self.stored_cycles.get().saturating_add(cycles));
    }

    /// Length of the next step wait, debiting bonus cycles if they are used.
    fn next_cycle(&self, use_offline_cycles: bool) -> Duration {
        let stored = self.stored_cycles.get();
        if use_offline_cycles && stored > 0 {
            self.stored_cycles.set(stored.saturating_sub(self.config.bonus_cost));
            self.config.bonus_cycle
        } else {
            self.config.cycle
        }
    }

    /// Wait between engine steps.
    pub async fn wait_cycle(&self, use_offline_cycles: bool) {
        sleep_or_yield(self.next_cycle(use_offline_cycles)).await;
    }

    /// Wait after one row of a board scan.
    pub async fn row_yield(&self) {
        sleep_or_yield(self.config.pattern_row).await;
    }
}

async fn sleep_or_yield(duration: Duration) {
    if duration.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_cycles_are_debited() {
        let pacer = Pacer::new(PacingConfig::default());
        assert_eq!(pacer.next_cycle(true), pacer.config().cycle);

        pacer.add_cycles(3);
        assert_eq!(pacer.next_cycle(false), pacer.config().cycle);
        assert_eq!(pacer.stored_cycles(), 3);

        assert_eq!(pacer.next_cycle(true), pacer.config().bonus_cycle);
        assert_eq!(pacer.stored_cycles(), 1);
        assert_eq!(pacer.next_cycle(true), pacer.config().bonus_cycle);
        assert_eq!(pacer.stored_cycles(), 0);
        assert_eq!(pacer.next_cycle(true), pacer.config().cycle);
    }

    #[tokio::test]
    async fn test_instant_pacing_yields() {
        let pacer = Pacer::new(PacingConfig::instant());
        pacer.add_cycles(10);
        pacer.wait_cycle(true).await;
        pacer.row_yield().await;
        assert_eq!(pacer.stored_cycles(), 8);
    }
}
