//! Objective tracking for the active level

use super::level::ObjectiveKind;
use crate::consts::SIM_RATE;

/// Live counters for the active level's goal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectiveTracker {
    kind: ObjectiveKind,
    /// Hazards destroyed, only counted for `Collect`
    progress: u32,
    /// Remaining steps, only counted down for `Survive`
    survival_ticks: i64,
}

impl ObjectiveTracker {
    /// Fresh counters for a level that is starting. Survival seconds are
    /// converted to steps once, here.
    pub fn start(kind: ObjectiveKind) -> Self {
        let survival_ticks = match kind {
            ObjectiveKind::Survive { amount } => i64::from(amount) * i64::from(SIM_RATE),
            _ => 0,
        };
        Self {
            kind,
            progress: 0,
            survival_ticks,
        }
    }

    pub fn kind(&self) -> ObjectiveKind {
        self.kind
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn survival_ticks(&self) -> i64 {
        self.survival_ticks
    }

    /// Whole seconds left on a survival countdown, rounded up, never negative
    pub fn remaining_secs(&self) -> u32 {
        let rate = i64::from(SIM_RATE);
        let ticks = self.survival_ticks.max(0);
        ((ticks + rate - 1) / rate) as u32
    }

    pub fn record_kills(&mut self, kills: u32) {
        if let ObjectiveKind::Collect { .. } = self.kind {
            self.progress = self.progress.saturating_add(kills);
        }
    }

    /// One simulation step elapsed in `playing`
    pub fn tick(&mut self) {
        if let ObjectiveKind::Survive { .. } = self.kind {
            self.survival_ticks -= 1;
        }
    }

    pub fn is_complete(&self) -> bool {
        match self.kind {
            ObjectiveKind::Collect { amount } => self.progress >= amount,
            ObjectiveKind::Survive { .. } => self.survival_ticks <= 0,
            ObjectiveKind::Endless => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_completes_at_amount() {
        let mut tracker = ObjectiveTracker::start(ObjectiveKind::Collect { amount: 10 });
        tracker.record_kills(9);
        assert!(!tracker.is_complete());
        tracker.record_kills(1);
        assert!(tracker.is_complete());
        assert_eq!(tracker.progress(), 10);
    }

    #[test]
    fn test_collect_ignores_survival_ticks() {
        let mut tracker = ObjectiveTracker::start(ObjectiveKind::Collect { amount: 1 });
        for _ in 0..10_000 {
            tracker.tick();
        }
        assert!(!tracker.is_complete());
    }

    #[test]
    fn test_survive_counts_sim_rate_steps() {
        let mut tracker = ObjectiveTracker::start(ObjectiveKind::Survive { amount: 30 });
        assert_eq!(tracker.survival_ticks(), 1800);
        assert_eq!(tracker.remaining_secs(), 30);

        for _ in 0..1799 {
            tracker.tick();
            assert!(!tracker.is_complete());
        }
        assert_eq!(tracker.remaining_secs(), 1);
        tracker.tick();
        assert!(tracker.is_complete());
        assert_eq!(tracker.remaining_secs(), 0);
    }

    #[test]
    fn test_survive_ignores_kills() {
        let mut tracker = ObjectiveTracker::start(ObjectiveKind::Survive { amount: 5 });
        tracker.record_kills(50);
        assert_eq!(tracker.progress(), 0);
    }

    #[test]
    fn test_endless_never_completes() {
        let mut tracker = ObjectiveTracker::start(ObjectiveKind::Endless);
        tracker.record_kills(1_000);
        for _ in 0..10_000 {
            tracker.tick();
        }
        assert!(!tracker.is_complete());
    }
}
