use std::time::Duration;

use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Length of the window at the start of a session in which it can still be
/// cancelled outright.
pub const CANCEL_COUNTDOWN_SECONDS: u32 = 10;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimerMode {
    Countdown,
    Countup,
}

/// Immutable snapshot taken when the user starts a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PomodoroConfig {
    pub mode: TimerMode,
    pub minutes: u32,
}

impl PomodoroConfig {
    pub fn new(mode: TimerMode, minutes: u32) -> Self {
        Self { mode, minutes }
    }

    pub fn target_seconds(&self) -> u32 {
        self.minutes.saturating_mul(60)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FocusState {
    Idle,
    Canceling,
    Focusing,
    Paused,
    Completed,
    Abandoned,
}

impl FocusState {
    /// States in which the one-second interval runs.
    pub fn is_ticking(self) -> bool {
        matches!(self, FocusState::Canceling | FocusState::Focusing)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, FocusState::Completed | FocusState::Abandoned)
    }
}

/// Notifications handed to the owner of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEvent {
    Cancelled,
    Completed,
    GaveUp,
    Abandoned,
    Restarted,
}

/// Controls the UI should offer for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusAction {
    Cancel { seconds_left: u32 },
    SlideToGiveUp,
    Pause,
    Resume,
    End,
    ConfirmEnd,
    DeclineEnd,
    Back,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusSettings {
    pub cancel_window_secs: u32,
    /// Count the cancel window towards elapsed focus time.
    pub count_cancel_window: bool,
}

impl FocusSettings {
    /// The cancel window lasts at least one second.
    pub fn normalized(mut self) -> Self {
        self.cancel_window_secs = self.cancel_window_secs.max(1);
        self
    }
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            cancel_window_secs: CANCEL_COUNTDOWN_SECONDS,
            count_cancel_window: true,
        }
    }
}

/// Repeating one-second timer owned by a session.
///
/// A session holds one only while it is in a ticking state; leaving that state
/// drops it, and with it any partially accumulated second.
#[derive(Debug, Clone)]
struct Interval {
    period: Duration,
    accumulated: Duration,
}

impl Interval {
    fn every_second() -> Self {
        Self {
            period: Duration::from_secs(1),
            accumulated: Duration::ZERO,
        }
    }

    /// Adds `dt`; when a period completes returns the unused remainder.
    fn consume(&mut self, dt: Duration) -> Option<Duration> {
        let total = self.accumulated + dt;
        if total >= self.period {
            self.accumulated = Duration::ZERO;
            Some(total - self.period)
        } else {
            self.accumulated = total;
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct FocusSession {
    config: PomodoroConfig,
    settings: FocusSettings,
    state: FocusState,
    elapsed_seconds: u32,
    cancel_countdown: u32,
    confirm_open: bool,
    interval: Option<Interval>,
    started_at: DateTime<Local>,
}

impl FocusSession {
    pub fn start(config: PomodoroConfig, settings: FocusSettings) -> Self {
        let settings = settings.normalized();
        info!(
            mode = %config.mode,
            minutes = config.minutes,
            cancel_window = settings.cancel_window_secs,
            "focus session started"
        );
        Self {
            config,
            settings,
            state: FocusState::Canceling,
            elapsed_seconds: 0,
            cancel_countdown: settings.cancel_window_secs,
            confirm_open: false,
            interval: Some(Interval::every_second()),
            started_at: Local::now(),
        }
    }

    pub fn config(&self) -> PomodoroConfig {
        self.config
    }

    pub fn settings(&self) -> FocusSettings {
        self.settings
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn cancel_countdown(&self) -> u32 {
        self.cancel_countdown
    }

    pub fn pending_confirmation(&self) -> bool {
        self.confirm_open
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    fn transition(&mut self, next: FocusState) {
        if next == self.state {
            return;
        }
        debug!(from = %self.state, to = %next, elapsed = self.elapsed_seconds, "focus state change");
        self.state = next;
        // release the running interval; a ticking state gets a fresh one
        self.interval = next.is_ticking().then(Interval::every_second);
    }

    fn count_second(&mut self) -> Option<FocusEvent> {
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        if self.config.mode == TimerMode::Countdown
            && self.elapsed_seconds >= self.config.target_seconds()
        {
            self.transition(FocusState::Completed);
            info!(elapsed = self.elapsed_seconds, "focus session completed");
            return Some(FocusEvent::Completed);
        }
        None
    }

    /// One-second step.
    pub fn tick(&mut self) -> Option<FocusEvent> {
        match self.state {
            FocusState::Canceling => {
                if self.settings.count_cancel_window {
                    if let Some(event) = self.count_second() {
                        return Some(event);
                    }
                }
                if self.cancel_countdown <= 1 {
                    self.cancel_countdown = 0;
                    self.transition(FocusState::Focusing);
                } else {
                    self.cancel_countdown -= 1;
                }
                None
            }
            FocusState::Focusing => self.count_second(),
            _ => None,
        }
    }

    /// Drives the session by wall-clock time, firing [`FocusSession::tick`]
    /// once per whole second spent in a ticking state.
    pub fn advance(&mut self, dt: Duration) -> Vec<FocusEvent> {
        let mut events = Vec::new();
        let mut budget = dt;

        while let Some(interval) = self.interval.as_mut() {
            match interval.consume(budget) {
                Some(rest) => {
                    budget = rest;
                    if let Some(event) = self.tick() {
                        events.push(event);
                    }
                }
                None => break,
            }
        }

        events
    }

    pub fn cancel(&mut self) -> Option<FocusEvent> {
        if self.state != FocusState::Canceling {
            return None;
        }
        info!("focus session cancelled in cancel window");
        self.interval = None;
        Some(FocusEvent::Cancelled)
    }

    pub fn pause_resume(&mut self) {
        match self.state {
            FocusState::Focusing => self.transition(FocusState::Paused),
            FocusState::Paused => self.transition(FocusState::Focusing),
            _ => {}
        }
    }

    /// Opens the confirmation gate for ending a count-up session early.
    pub fn request_end(&mut self) {
        if self.config.mode == TimerMode::Countup
            && matches!(self.state, FocusState::Focusing | FocusState::Paused)
        {
            self.confirm_open = true;
        }
    }

    pub fn confirm_end(&mut self) -> Option<FocusEvent> {
        if !self.confirm_open {
            return None;
        }
        self.confirm_open = false;
        if !matches!(self.state, FocusState::Focusing | FocusState::Paused) {
            return None;
        }
        self.transition(FocusState::Abandoned);
        info!(elapsed = self.elapsed_seconds, "focus session ended early");
        Some(FocusEvent::Abandoned)
    }

    pub fn decline_end(&mut self) {
        self.confirm_open = false;
    }

    /// Abandons a countdown session without confirmation.
    pub fn give_up(&mut self) -> Option<FocusEvent> {
        if self.config.mode != TimerMode::Countdown || self.state != FocusState::Focusing {
            return None;
        }
        self.transition(FocusState::Abandoned);
        info!(elapsed = self.elapsed_seconds, "focus session given up");
        Some(FocusEvent::GaveUp)
    }

    /// Fresh session with the same config, only from a terminal state.
    pub fn restart(&self) -> Option<FocusSession> {
        if !self.state.is_terminal() {
            return None;
        }
        Some(FocusSession::start(self.config, self.settings))
    }

    pub fn display_seconds(&self) -> u32 {
        match self.config.mode {
            TimerMode::Countdown => self
                .config
                .target_seconds()
                .saturating_sub(self.elapsed_seconds),
            TimerMode::Countup => self.elapsed_seconds,
        }
    }

    pub fn display_time(&self) -> String {
        crate::dial::format_time(self.display_seconds())
    }

    pub fn slogan(&self) -> Option<&'static str> {
        match self.state {
            FocusState::Canceling | FocusState::Focusing => {
                Some("Focusing now, try not to get distracted~")
            }
            FocusState::Paused => Some("Focus paused! Take a short rest"),
            FocusState::Abandoned => {
                Some("Maybe something more important needed you this time!")
            }
            FocusState::Completed => Some("Great job! One step closer to your goals~"),
            FocusState::Idle => None,
        }
    }

    pub fn actions(&self) -> Vec<FocusAction> {
        if self.confirm_open {
            return vec![FocusAction::DeclineEnd, FocusAction::ConfirmEnd];
        }
        match (self.state, self.config.mode) {
            (FocusState::Canceling, _) => vec![FocusAction::Cancel {
                seconds_left: self.cancel_countdown,
            }],
            (FocusState::Focusing, TimerMode::Countdown) => vec![FocusAction::SlideToGiveUp],
            (FocusState::Focusing, TimerMode::Countup) => vec![FocusAction::Pause],
            (FocusState::Paused, TimerMode::Countup) => {
                vec![FocusAction::End, FocusAction::Resume]
            }
            (FocusState::Paused, TimerMode::Countdown) => vec![FocusAction::Resume],
            (FocusState::Completed | FocusState::Abandoned, _) => {
                vec![FocusAction::Back, FocusAction::Restart]
            }
            (FocusState::Idle, _) => vec![],
        }
    }
}
