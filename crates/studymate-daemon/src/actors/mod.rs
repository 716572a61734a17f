mod notifier;
mod recorder;
mod timer;

pub use notifier::NotifierActor;
pub use recorder::SessionRecorderBridge;
pub use timer::{TimerActor, TimerError, TimerHandle, TimerSettings, TimerStatus};
