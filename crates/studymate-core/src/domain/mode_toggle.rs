use std::time::Duration;

use super::SessionMode;

pub const DEFAULT_FOCUS_DURATION: Duration = Duration::from_secs(25 * 60);
pub const DEFAULT_BREAK_DURATION: Duration = Duration::from_secs(5 * 60);

/// Alternates between focus and break sessions and knows how long each one
/// lasts by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeToggle {
    current: SessionMode,
    focus_duration: Duration,
    break_duration: Duration,
}

impl ModeToggle {
    pub fn new(focus_duration: Duration, break_duration: Duration) -> Self {
        Self {
            current: SessionMode::Focus,
            focus_duration,
            break_duration,
        }
    }

    pub fn current_mode(&self) -> SessionMode {
        self.current
    }

    pub fn default_duration(&self, mode: SessionMode) -> Duration {
        match mode {
            SessionMode::Focus => self.focus_duration,
            SessionMode::Break => self.break_duration,
        }
    }

    pub fn current_default_duration(&self) -> Duration {
        self.default_duration(self.current)
    }

    /// Flips to the other mode and returns the duration the next session
    /// should be configured with.
    pub fn toggle(&mut self) -> Duration {
        self.current = self.current.other();
        self.current_default_duration()
    }
}

impl Default for ModeToggle {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_DURATION, DEFAULT_BREAK_DURATION)
    }
}
