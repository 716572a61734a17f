mod mode_toggle;
mod session_mode;
mod study_session;
mod study_stats;
mod subject;
mod timer_state;

pub use mode_toggle::{ModeToggle, DEFAULT_BREAK_DURATION, DEFAULT_FOCUS_DURATION};
pub use session_mode::SessionMode;
pub use study_session::{StudySession, StudySessionId};
pub use study_stats::{DailyStudyTime, StudyPeriod, SubjectStudyTime};
pub use subject::{Subject, SubjectId, DEFAULT_SUBJECT_COLOR, UNASSIGNED_SUBJECT};
pub use timer_state::{TimerState, TimerStateError};
