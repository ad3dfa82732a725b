use tracing::debug;

use crate::dial::{angle_to_minutes, clamp_angle, minutes_to_angle, snap_minutes, STEP_MINUTES};
use crate::focus::{
    FocusEvent, FocusSession, FocusSettings, FocusState, PomodoroConfig, TimerMode,
};

/// Callbacks fired as a focus session ends, restarts or is cancelled.
pub trait FocusListener {
    fn on_cancel(&mut self) {}
    fn on_complete(&mut self) {}
    fn on_give_up(&mut self) {}
    fn on_restart(&mut self) {}
}

/// Listener that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl FocusListener for NoopListener {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupDefaults {
    pub mode: TimerMode,
    pub minutes: u32,
}

impl Default for SetupDefaults {
    fn default() -> Self {
        Self {
            mode: TimerMode::Countdown,
            minutes: crate::dial::DEFAULT_MINUTES,
        }
    }
}

#[derive(Debug, Clone)]
pub enum View {
    Setup,
    Focus(FocusSession),
}

/// Setup screen state plus the session currently shown, if any.
#[derive(Debug, Clone)]
pub struct Pomodoro {
    mode: TimerMode,
    minutes: u32,
    angle: f64,
    settings: FocusSettings,
    view: View,
}

impl Pomodoro {
    pub fn new(defaults: SetupDefaults, settings: FocusSettings) -> Self {
        let minutes = snap_minutes(defaults.minutes);
        Self {
            mode: defaults.mode,
            minutes,
            angle: minutes_to_angle(minutes),
            settings,
            view: View::Setup,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn settings(&self) -> FocusSettings {
        self.settings
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn is_setup(&self) -> bool {
        matches!(self.view, View::Setup)
    }

    pub fn session(&self) -> Option<&FocusSession> {
        match &self.view {
            View::Focus(session) => Some(session),
            View::Setup => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut FocusSession> {
        match &mut self.view {
            View::Focus(session) => Some(session),
            View::Setup => None,
        }
    }

    pub fn focus_state(&self) -> FocusState {
        self.session()
            .map(FocusSession::state)
            .unwrap_or(FocusState::Idle)
    }

    pub fn toggle_mode(&mut self) {
        if !self.is_setup() {
            return;
        }
        self.mode = match self.mode {
            TimerMode::Countdown => TimerMode::Countup,
            TimerMode::Countup => TimerMode::Countdown,
        };
    }

    /// Dial moved; minutes follow the quantized angle.
    pub fn set_angle(&mut self, angle: f64) {
        if !self.is_setup() {
            return;
        }
        self.angle = clamp_angle(angle);
        self.minutes = angle_to_minutes(self.angle);
    }

    /// Keyboard equivalent of the dial, one grid step per unit.
    pub fn nudge_minutes(&mut self, steps: i32) {
        if !self.is_setup() {
            return;
        }
        let delta = steps.saturating_mul(STEP_MINUTES as i32);
        let next = (self.minutes as i64 + delta as i64).max(0) as u32;
        self.minutes = snap_minutes(next);
        self.angle = minutes_to_angle(self.minutes);
    }

    /// Snapshots the setup into a config and switches to the focus view.
    pub fn start_session(&mut self) -> PomodoroConfig {
        let minutes = match self.mode {
            TimerMode::Countdown => self.minutes,
            TimerMode::Countup => 0,
        };
        let config = PomodoroConfig::new(self.mode, minutes);
        self.view = View::Focus(FocusSession::start(config, self.settings));
        config
    }

    /// Handles a session notification, switching views where needed.
    pub fn apply(&mut self, event: FocusEvent, listener: &mut impl FocusListener) {
        debug!(?event, "focus event");
        match event {
            FocusEvent::Cancelled => {
                self.view = View::Setup;
                listener.on_cancel();
            }
            FocusEvent::Completed => listener.on_complete(),
            FocusEvent::GaveUp | FocusEvent::Abandoned => listener.on_give_up(),
            FocusEvent::Restarted => listener.on_restart(),
        }
    }

    /// Back to setup from a finished session.
    pub fn back(&mut self) {
        if self.focus_state().is_terminal() {
            self.view = View::Setup;
        }
    }

    pub fn cancel(&mut self, listener: &mut impl FocusListener) {
        if let Some(event) = self.session_mut().and_then(FocusSession::cancel) {
            self.apply(event, listener);
        }
    }

    pub fn give_up(&mut self, listener: &mut impl FocusListener) {
        if let Some(event) = self.session_mut().and_then(FocusSession::give_up) {
            self.apply(event, listener);
        }
    }

    pub fn confirm_end(&mut self, listener: &mut impl FocusListener) {
        if let Some(event) = self.session_mut().and_then(FocusSession::confirm_end) {
            self.apply(event, listener);
        }
    }

    pub fn restart(&mut self, listener: &mut impl FocusListener) {
        if let Some(fresh) = self.session().and_then(FocusSession::restart) {
            self.view = View::Focus(fresh);
            self.apply(FocusEvent::Restarted, listener);
        }
    }

    pub fn advance(&mut self, dt: std::time::Duration, listener: &mut impl FocusListener) {
        let events = match self.session_mut() {
            Some(session) => session.advance(dt),
            None => return,
        };
        for event in events {
            self.apply(event, listener);
        }
    }
}
