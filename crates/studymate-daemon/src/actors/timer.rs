use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use studymate_core::{
    ModeToggle, SessionMode, SubjectId, TimerConfig, TimerState, TimerStateError,
    DEFAULT_BREAK_DURATION, DEFAULT_FOCUS_DURATION, UNASSIGNED_SUBJECT,
};

const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("invalid duration: {0}")]
    InvalidDuration(#[from] TimerStateError),

    #[error("timer actor is unavailable")]
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Configure { duration: Duration },
    Start,
    Pause,
    Reset,
    Toggle,
    SelectSubject { subject_id: SubjectId },
}

pub enum TimerMessage {
    Command {
        command: TimerCommand,
        reply: oneshot::Sender<TimerStatus>,
    },
    GetStatus {
        reply: oneshot::Sender<TimerStatus>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimerStatus {
    pub state: TimerState,
    pub mode: SessionMode,
    pub subject_id: SubjectId,
}

/// Raised once when a countdown runs down to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCompleted {
    pub subject_id: SubjectId,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub total_duration: Duration,
    pub mode: SessionMode,
}

#[derive(Debug, Clone)]
pub struct TimerSettings {
    pub focus_duration: Duration,
    pub break_duration: Duration,
    pub tick_interval: Duration,
    pub auto_advance: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_duration: DEFAULT_FOCUS_DURATION,
            break_duration: DEFAULT_BREAK_DURATION,
            tick_interval: DEFAULT_TICK_INTERVAL,
            auto_advance: true,
        }
    }
}

impl From<&TimerConfig> for TimerSettings {
    fn from(config: &TimerConfig) -> Self {
        Self {
            focus_duration: config.focus_duration(),
            break_duration: config.break_duration(),
            tick_interval: config.tick_interval(),
            auto_advance: config.auto_advance,
        }
    }
}

/// One countdown run. `base` is the remaining time captured when the run
/// started; the live value is always derived from the elapsed clock time.
struct Countdown {
    generation: u64,
    base: Duration,
    reference: Instant,
}

impl Countdown {
    fn remaining(&self, now: Instant) -> Duration {
        self.base
            .saturating_sub(now.saturating_duration_since(self.reference))
    }
}

pub struct TimerActor {
    receiver: mpsc::Receiver<TimerMessage>,
    state_sender: watch::Sender<TimerState>,
    completion_sender: broadcast::Sender<SessionCompleted>,
    modes: ModeToggle,
    tick_interval: Duration,
    auto_advance: bool,
    countdown: Option<Countdown>,
    generation: u64,
    session_started_at: Option<DateTime<Utc>>,
    subject_id: SubjectId,
}

#[derive(Clone)]
pub struct TimerHandle {
    sender: mpsc::Sender<TimerMessage>,
    state_receiver: watch::Receiver<TimerState>,
    completion_sender: broadcast::Sender<SessionCompleted>,
}

impl TimerHandle {
    /// Rejects a zero duration here, before the actor sees it.
    pub async fn configure(&self, duration: Duration) -> Result<TimerStatus, TimerError> {
        TimerState::configured(duration)?;
        self.command(TimerCommand::Configure { duration }).await
    }

    pub async fn start(&self) -> Result<TimerStatus, TimerError> {
        self.command(TimerCommand::Start).await
    }

    pub async fn pause(&self) -> Result<TimerStatus, TimerError> {
        self.command(TimerCommand::Pause).await
    }

    pub async fn reset(&self) -> Result<TimerStatus, TimerError> {
        self.command(TimerCommand::Reset).await
    }

    pub async fn toggle(&self) -> Result<TimerStatus, TimerError> {
        self.command(TimerCommand::Toggle).await
    }

    pub async fn select_subject(&self, subject_id: SubjectId) -> Result<TimerStatus, TimerError> {
        self.command(TimerCommand::SelectSubject { subject_id })
            .await
    }

    pub async fn status(&self) -> Result<TimerStatus, TimerError> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.sender
            .send(TimerMessage::GetStatus {
                reply: reply_sender,
            })
            .await
            .map_err(|_| TimerError::Unavailable)?;
        reply_receiver.await.map_err(|_| TimerError::Unavailable)
    }

    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.state_receiver.clone()
    }

    pub fn completions(&self) -> broadcast::Receiver<SessionCompleted> {
        self.completion_sender.subscribe()
    }

    pub fn snapshot(&self) -> TimerState {
        self.state_receiver.borrow().clone()
    }

    /// Resolves once the actor has applied the command.
    async fn command(&self, command: TimerCommand) -> Result<TimerStatus, TimerError> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.sender
            .send(TimerMessage::Command {
                command,
                reply: reply_sender,
            })
            .await
            .map_err(|_| TimerError::Unavailable)?;
        reply_receiver.await.map_err(|_| TimerError::Unavailable)
    }
}

impl TimerActor {
    pub fn new(settings: TimerSettings) -> (Self, TimerHandle) {
        let (sender, receiver) = mpsc::channel(32);
        let (completion_sender, _) = broadcast::channel(16);

        let modes = ModeToggle::new(settings.focus_duration, settings.break_duration);
        let initial_state =
            TimerState::configured(modes.current_default_duration()).unwrap_or_default();
        let (state_sender, state_receiver) = watch::channel(initial_state);

        let actor = Self {
            receiver,
            state_sender,
            completion_sender: completion_sender.clone(),
            modes,
            tick_interval: settings.tick_interval,
            auto_advance: settings.auto_advance,
            countdown: None,
            generation: 0,
            session_started_at: None,
            subject_id: UNASSIGNED_SUBJECT,
        };

        let handle = TimerHandle {
            sender,
            state_receiver,
            completion_sender,
        };

        (actor, handle)
    }

    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut armed_generation = None;

        info!(tick_interval = ?self.tick_interval, "timer actor started");

        loop {
            tokio::select! {
                message = self.receiver.recv() => {
                    let Some(message) = message else { break };
                    self.handle_message(message);

                    let active_generation = self.countdown.as_ref().map(|countdown| countdown.generation);
                    if active_generation.is_some() && active_generation != armed_generation {
                        ticker.reset();
                        armed_generation = active_generation;
                    }
                }
                _ = ticker.tick(), if self.countdown.is_some() => {
                    self.on_tick(armed_generation);
                }
            }
        }

        debug!("timer actor stopped");
    }

    fn handle_message(&mut self, message: TimerMessage) {
        match message {
            TimerMessage::Command { command, reply } => {
                self.apply(command);
                let _ = reply.send(self.current_status());
            }
            TimerMessage::GetStatus { reply } => {
                let _ = reply.send(self.current_status());
            }
        }
    }

    fn apply(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::Configure { duration } => self.configure(duration),
            TimerCommand::Start => self.start(),
            TimerCommand::Pause => self.pause(),
            TimerCommand::Reset => self.reset(),
            TimerCommand::Toggle => self.toggle(),
            TimerCommand::SelectSubject { subject_id } => {
                self.subject_id = subject_id;
                info!(subject_id, "subject selected");
            }
        }
    }

    fn current_state(&self) -> TimerState {
        self.state_sender.borrow().clone()
    }

    fn publish(&self, state: TimerState) {
        self.state_sender.send_replace(state);
    }

    fn configure(&mut self, duration: Duration) {
        match TimerState::configured(duration) {
            Ok(state) => {
                self.countdown = None;
                self.session_started_at = None;
                self.publish(state);
                info!(?duration, mode = %self.modes.current_mode(), "timer configured");
            }
            Err(error) => {
                warn!(%error, ?duration, "timer configuration rejected");
            }
        }
    }

    fn start(&mut self) {
        if self.countdown.is_some() {
            debug!("start ignored, countdown already active");
            return;
        }

        let state = self.current_state();
        if state.is_completed() {
            debug!("start ignored, session already completed");
            return;
        }

        self.generation += 1;
        self.countdown = Some(Countdown {
            generation: self.generation,
            base: state.remaining_duration(),
            reference: Instant::now(),
        });
        self.session_started_at.get_or_insert_with(Utc::now);
        self.publish(state.running());

        info!(
            remaining = ?state.remaining_duration(),
            generation = self.generation,
            mode = %self.modes.current_mode(),
            "countdown started"
        );
    }

    /// Samples the clock one last time so time run since the latest tick counts.
    fn pause(&mut self) {
        let Some(countdown) = self.countdown.take() else {
            debug!("pause ignored, no active countdown");
            return;
        };

        let state = self
            .current_state()
            .advanced(countdown.remaining(Instant::now()));

        if state.is_completed() {
            self.complete(state);
            return;
        }

        let state = state.paused();
        info!(remaining = ?state.remaining_duration(), "countdown paused");
        self.publish(state);
    }

    fn reset(&mut self) {
        self.countdown = None;
        self.session_started_at = None;
        self.publish(self.current_state().reset());
        info!("timer reset");
    }

    fn toggle(&mut self) {
        let duration = self.modes.toggle();
        info!(mode = %self.modes.current_mode(), "mode toggled");
        self.configure(duration);
    }

    fn on_tick(&mut self, armed_generation: Option<u64>) {
        let Some(countdown) = &self.countdown else {
            return;
        };

        if Some(countdown.generation) != armed_generation {
            debug!(generation = countdown.generation, "discarding tick armed for another run");
            return;
        }

        let remaining = countdown.remaining(Instant::now());
        let state = self.current_state().advanced(remaining);

        if state.is_completed() {
            self.complete(state);
        } else {
            self.publish(state);
        }
    }

    fn complete(&mut self, state: TimerState) {
        self.countdown = None;

        let ended_at = Utc::now();
        let mode = self.modes.current_mode();
        let event = SessionCompleted {
            subject_id: self.subject_id,
            started_at: self.session_started_at.take().unwrap_or(ended_at),
            ended_at,
            total_duration: state.total_duration(),
            mode,
        };

        self.publish(state);
        info!(%mode, total = ?event.total_duration, "session completed");

        if self.completion_sender.send(event).is_err() {
            debug!("no completion subscribers");
        }

        if self.auto_advance {
            self.toggle();
        }
    }

    fn current_status(&self) -> TimerStatus {
        TimerStatus {
            state: self.current_state(),
            mode: self.modes.current_mode(),
            subject_id: self.subject_id,
        }
    }
}
