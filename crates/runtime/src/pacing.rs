//! Cosmetic pacing between actor steps.
//!
//! Pauses only exist so a presentation layer can show one action at a time.
//! Rules never depend on them, and [`Pacing::instant`] collapses every pause
//! to zero for tests and headless runs.
use std::time::Duration;

use async_trait::async_trait;

/// Point of the round a pause follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Beat {
    /// After one actor resolved.
    Action,
    /// After end-of-round bookkeeping.
    Round,
}

/// Awaited by the session between steps.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, beat: Beat);
}

/// Fixed delays per beat, slept on the tokio timer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pacing {
    pub action: Duration,
    pub round: Duration,
}

impl Pacing {
    /// No pauses at all.
    pub fn instant() -> Self {
        Self::default()
    }

    /// `ms` after each action and twice that after each round.
    pub fn from_millis(ms: u64) -> Self {
        Self {
            action: Duration::from_millis(ms),
            round: Duration::from_millis(ms.saturating_mul(2)),
        }
    }

    pub fn delay(&self, beat: Beat) -> Duration {
        match beat {
            Beat::Action => self.action,
            Beat::Round => self.round,
        }
    }

    pub fn is_instant(&self) -> bool {
        self.action.is_zero() && self.round.is_zero()
    }
}

#[async_trait]
impl Pacer for Pacing {
    async fn pause(&self, beat: Beat) {
        let delay = self.delay(beat);
        if delay.is_zero() {
            return;
        }
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_pacing_has_no_delays() {
        let pacing = Pacing::instant();
        assert!(pacing.is_instant());
        assert_eq!(pacing.delay(Beat::Action), Duration::ZERO);
        assert_eq!(pacing.delay(Beat::Round), Duration::ZERO);
    }

    #[test]
    fn rounds_pause_longer_than_actions() {
        let pacing = Pacing::from_millis(40);
        assert_eq!(pacing.delay(Beat::Action), Duration::from_millis(40));
        assert_eq!(pacing.delay(Beat::Round), Duration::from_millis(80));
    }
}
