use std::time::Duration;

use thiserror::Error;

use super::mode_toggle::DEFAULT_FOCUS_DURATION;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerStateError {
    #[error("session duration must be positive")]
    NonPositiveDuration,
}

/// Snapshot of a countdown. Every transition returns a new value; a state is
/// never running and completed at the same time.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerState {
    total_duration: Duration,
    remaining_duration: Duration,
    progress: f32,
    is_running: bool,
    is_completed: bool,
}

impl TimerState {
    pub fn configured(duration: Duration) -> Result<Self, TimerStateError> {
        if duration.is_zero() {
            return Err(TimerStateError::NonPositiveDuration);
        }

        Ok(Self {
            total_duration: duration,
            remaining_duration: duration,
            progress: 0.0,
            is_running: false,
            is_completed: false,
        })
    }

    pub fn running(&self) -> Self {
        Self {
            is_running: !self.is_completed,
            ..self.clone()
        }
    }

    pub fn paused(&self) -> Self {
        Self {
            is_running: false,
            ..self.clone()
        }
    }

    /// Applies a freshly sampled remaining time. The value is clamped so it
    /// never exceeds the current one, and reaching zero completes the state.
    pub fn advanced(&self, remaining: Duration) -> Self {
        let remaining = remaining.min(self.remaining_duration);
        if remaining.is_zero() {
            return self.completed();
        }

        Self {
            remaining_duration: remaining,
            progress: progress_for(self.total_duration, remaining),
            ..self.clone()
        }
    }

    pub fn completed(&self) -> Self {
        Self {
            total_duration: self.total_duration,
            remaining_duration: Duration::ZERO,
            progress: 1.0,
            is_running: false,
            is_completed: true,
        }
    }

    pub fn reset(&self) -> Self {
        Self {
            total_duration: self.total_duration,
            remaining_duration: self.total_duration,
            progress: 0.0,
            is_running: false,
            is_completed: false,
        }
    }

    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    pub fn remaining_duration(&self) -> Duration {
        self.remaining_duration
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn remaining_minutes(&self) -> u64 {
        self.remaining_duration.as_secs() / 60
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_duration.as_secs() % 60
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            total_duration: DEFAULT_FOCUS_DURATION,
            remaining_duration: DEFAULT_FOCUS_DURATION,
            progress: 0.0,
            is_running: false,
            is_completed: false,
        }
    }
}

fn progress_for(total: Duration, remaining: Duration) -> f32 {
    let ratio = remaining.as_secs_f64() / total.as_secs_f64();
    (1.0 - ratio).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_minutes() -> TimerState {
        TimerState::configured(Duration::from_secs(600)).unwrap()
    }

    #[test]
    fn configured_state_is_idle() {
        let state = ten_minutes();

        assert_eq!(state.total_duration(), Duration::from_secs(600));
        assert_eq!(state.remaining_duration(), Duration::from_secs(600));
        assert_eq!(state.progress(), 0.0);
        assert!(!state.is_running());
        assert!(!state.is_completed());
    }

    #[test]
    fn zero_duration_is_rejected() {
        let result = TimerState::configured(Duration::ZERO);

        assert_eq!(result, Err(TimerStateError::NonPositiveDuration));
    }

    #[test]
    fn advancing_recomputes_progress() {
        let state = ten_minutes().running().advanced(Duration::from_secs(150));

        assert_eq!(state.remaining_duration(), Duration::from_secs(150));
        assert!((state.progress() - 0.75).abs() < f32::EPSILON);
        assert!(state.is_running());
    }

    #[test]
    fn advancing_never_increases_remaining_time() {
        let state = ten_minutes()
            .running()
            .advanced(Duration::from_secs(300))
            .advanced(Duration::from_secs(400));

        assert_eq!(state.remaining_duration(), Duration::from_secs(300));
    }

    #[test]
    fn advancing_to_zero_completes() {
        let state = ten_minutes().running().advanced(Duration::ZERO);

        assert!(state.is_completed());
        assert!(!state.is_running());
        assert_eq!(state.remaining_duration(), Duration::ZERO);
        assert_eq!(state.progress(), 1.0);
    }

    #[test]
    fn completed_state_cannot_run() {
        let state = ten_minutes().completed().running();

        assert!(!state.is_running());
        assert!(state.is_completed());
    }

    #[test]
    fn reset_restores_configured_duration() {
        let state = ten_minutes().running().advanced(Duration::ZERO).reset();

        assert_eq!(state, ten_minutes());
    }

    #[test]
    fn paused_keeps_remaining_time() {
        let state = ten_minutes()
            .running()
            .advanced(Duration::from_secs(597))
            .paused();

        assert!(!state.is_running());
        assert_eq!(state.remaining_duration(), Duration::from_secs(597));
    }

    #[test]
    fn display_helpers_split_minutes_and_seconds() {
        let state = ten_minutes().running().advanced(Duration::from_millis(125_400));

        assert_eq!(state.remaining_minutes(), 2);
        assert_eq!(state.remaining_seconds(), 5);
    }

    #[test]
    fn default_state_is_a_focus_session() {
        let state = TimerState::default();

        assert_eq!(state.total_duration(), Duration::from_secs(1500));
        assert!(!state.is_running());
    }
}
