//! Reaction timer log.

use rand::Rng;
use std::collections::VecDeque;
use std::time::Duration;

pub const MIN_DELAY_MS: u64 = 1200;
pub const MAX_DELAY_MS: u64 = 3000;
pub const HISTORY_LEN: usize = 10;

/// How long to wait before showing the go signal.
pub fn random_delay<R: Rng + ?Sized>(rng: &mut R) -> Duration {
    Duration::from_millis(rng.gen_range(MIN_DELAY_MS..=MAX_DELAY_MS))
}

#[derive(Debug, Clone, Default)]
pub struct ReactionLog {
    best_ms: Option<u64>,
    recent: VecDeque<u64>,
}

impl ReactionLog {
    /// Record one attempt; returns whether it is a new best.
    pub fn record(&mut self, elapsed: Duration) -> bool {
        let ms = elapsed.as_millis() as u64;
        self.recent.push_front(ms);
        self.recent.truncate(HISTORY_LEN);
        let best = self.best_ms.map_or(true, |b| ms < b);
        if best {
            self.best_ms = Some(ms);
        }
        best
    }

    pub fn best_ms(&self) -> Option<u64> {
        self.best_ms
    }

    /// Most recent first.
    pub fn recent(&self) -> impl Iterator<Item = u64> + '_ {
        self.recent.iter().copied()
    }

    pub fn average_ms(&self) -> Option<u64> {
        if self.recent.is_empty() {
            return None;
        }
        Some(self.recent.iter().sum::<u64>() / self.recent.len() as u64)
    }
}
