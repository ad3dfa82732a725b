pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use pomodial::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    dial_gesture::DialGesture,
    focus::{FocusAction, FocusState, TimerMode},
    logging,
    pomodoro::{FocusListener, Pomodoro},
    runtime::{CrosstermEventSource, FixedTicker, PomoEvent, PomoEventSource, Runner, Ticker},
    slide::{SlideOutcome, SlideToCancel},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::{Duration, Instant},
};
use tracing::info;

use crate::ui::{FocusLayout, SetupLayout};

/// pomodoro focus timer with a draggable duration dial
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A pomodoro focus timer for the terminal. Drag the dial (or use the arrow keys) to pick a duration, then stay focused; a countdown can only be given up by sliding the bar all the way."
)]
pub struct Cli {
    /// timer mode for the setup screen
    #[clap(short = 'm', long, value_enum)]
    mode: Option<TimerMode>,

    /// initial countdown length in minutes (5-180, snapped to 5 minute steps)
    #[clap(short = 't', long)]
    minutes: Option<u32>,

    /// seconds at the start of a session during which it can be cancelled
    #[clap(long = "cancel-window")]
    cancel_window: Option<u32>,

    /// fraction of the pointer rotation applied to the dial
    #[clap(long)]
    sensitivity: Option<f64>,

    /// do not count the cancel window towards focus time
    #[clap(long)]
    exclude_cancel_window: bool,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_defaults: bool,

    /// verbose logging (honours RUST_LOG)
    #[clap(long)]
    debug: bool,
}

impl Cli {
    /// Overlay command line flags on the stored configuration
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(minutes) = self.minutes {
            config.minutes = minutes;
        }
        if let Some(secs) = self.cancel_window {
            config.cancel_window_secs = secs;
        }
        if let Some(sensitivity) = self.sensitivity {
            config.dial_sensitivity = sensitivity;
        }
        if self.exclude_cancel_window {
            config.count_cancel_window = false;
        }
        config.sanitized()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drag {
    Dial,
    Slide { start_column: u16 },
}

/// Last session notification, shown in the footer.
#[derive(Debug, Default)]
pub struct Notices {
    pub last: Option<&'static str>,
}

impl FocusListener for Notices {
    fn on_cancel(&mut self) {
        self.last = Some("Session cancelled");
    }

    fn on_complete(&mut self) {
        self.last = Some("Focus complete");
    }

    fn on_give_up(&mut self) {
        self.last = Some("Session ended early");
    }

    fn on_restart(&mut self) {
        self.last = Some("Session restarted");
    }
}

#[derive(Debug)]
pub struct App {
    pub pomodoro: Pomodoro,
    pub dial: DialGesture,
    pub slide: SlideToCancel,
    pub drag: Option<Drag>,
    pub notices: Notices,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let pomodoro = Pomodoro::new(config.setup_defaults(), config.focus_settings());
        let dial = DialGesture::new(Default::default(), pomodoro.angle())
            .with_sensitivity(config.dial_sensitivity);

        Self {
            pomodoro,
            dial,
            slide: SlideToCancel::new(config.cancel_threshold, config.color_threshold),
            drag: None,
            notices: Notices::default(),
        }
    }

    pub fn on_tick(&mut self, dt: Duration) {
        self.pomodoro.advance(dt, &mut self.notices);
        self.sync();
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind != KeyEventKind::Press {
            return Flow::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        if self.pomodoro.is_setup() {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
                KeyCode::Left | KeyCode::Char('h') => self.pomodoro.nudge_minutes(-1),
                KeyCode::Right | KeyCode::Char('l') => self.pomodoro.nudge_minutes(1),
                KeyCode::Char('m') => self.pomodoro.toggle_mode(),
                KeyCode::Enter => {
                    self.notices.last = None;
                    let config = self.pomodoro.start_session();
                    info!(mode = %config.mode, minutes = config.minutes, "session requested");
                }
                _ => {}
            }
            self.sync();
            return Flow::Continue;
        }

        let confirming = self
            .pomodoro
            .session()
            .is_some_and(|s| s.pending_confirmation());

        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('y') if confirming => self.pomodoro.confirm_end(&mut self.notices),
            KeyCode::Char('n') if confirming => {
                if let Some(session) = self.pomodoro.session_mut() {
                    session.decline_end();
                }
            }
            KeyCode::Char('c') => self.pomodoro.cancel(&mut self.notices),
            KeyCode::Char(' ') => {
                if let Some(session) = self.pomodoro.session_mut() {
                    session.pause_resume();
                }
            }
            KeyCode::Char('e') => {
                if let Some(session) = self.pomodoro.session_mut() {
                    session.request_end();
                }
            }
            KeyCode::Char('g') => self.pomodoro.give_up(&mut self.notices),
            KeyCode::Char('r') => self.pomodoro.restart(&mut self.notices),
            KeyCode::Char('b') => self.pomodoro.back(),
            _ => {}
        }
        self.sync();
        Flow::Continue
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent, area: Rect) {
        let (column, row) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.pomodoro.is_setup() {
                    if self.pomodoro.mode() != TimerMode::Countdown {
                        return;
                    }
                    let dial = SetupLayout::new(area).dial;
                    if dial.contains(column, row) {
                        self.dial.set_center(dial.center());
                        self.dial.begin(dial.touch_point(column, row));
                        if self.dial.is_active() {
                            self.drag = Some(Drag::Dial);
                        }
                    }
                } else if self.slide_visible() {
                    let bar = FocusLayout::new(area).controls;
                    if ui::rect_contains(bar, column, row) {
                        self.slide.set_container_width(bar.width as f64);
                        self.drag = Some(Drag::Slide {
                            start_column: column,
                        });
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => match self.drag {
                Some(Drag::Dial) => {
                    let dial = SetupLayout::new(area).dial;
                    if let Some(angle) = self.dial.update(dial.touch_point(column, row)) {
                        self.pomodoro.set_angle(angle);
                    }
                }
                Some(Drag::Slide { start_column }) => {
                    self.slide.update(column as f64 - start_column as f64);
                }
                None => {}
            },
            MouseEventKind::Up(MouseButton::Left) => match self.drag.take() {
                Some(Drag::Dial) => self.dial.end(),
                Some(Drag::Slide { .. }) => {
                    if self.slide.end() == SlideOutcome::Cancelled {
                        self.pomodoro.give_up(&mut self.notices);
                    }
                }
                None => {}
            },
            _ => {}
        }
        self.sync();
    }

    fn slide_visible(&self) -> bool {
        self.pomodoro
            .session()
            .is_some_and(|s| s.actions().contains(&FocusAction::SlideToGiveUp))
    }

    /// Keeps the gesture widgets consistent with the current view.
    fn sync(&mut self) {
        let setup = self.pomodoro.is_setup();
        self.dial.set_disabled(!setup);
        if !self.dial.is_active() {
            self.dial.set_angle(self.pomodoro.angle());
        }
        if !setup && matches!(self.drag, Some(Drag::Dial)) {
            self.drag = None;
        }

        if self.pomodoro.focus_state() != FocusState::Focusing {
            self.slide.reset();
            if matches!(self.drag, Some(Drag::Slide { .. })) {
                self.drag = None;
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = AppDirs::log_dir().and_then(|dir| logging::init(&dir, cli.debug));

    let store = FileConfigStore::new();
    let config = cli.apply_to(store.load());
    if cli.save_defaults {
        store.save(&config)?;
        info!(path = %store.path().display(), "saved defaults");
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let res = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend, E: PomoEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    let tick_rate = runner.tick_interval();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        let event = runner.step_timeout(timeout);

        // sessions follow the wall clock, however busy the input is
        let now = Instant::now();
        app.on_tick(now.duration_since(last_tick));
        last_tick = now;

        match event {
            PomoEvent::Tick | PomoEvent::Resize => {}
            PomoEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    break;
                }
            }
            PomoEvent::Mouse(mouse) => {
                let size = terminal.size()?;
                app.on_mouse(mouse, Rect::new(0, 0, size.width, size.height));
            }
        }
    }

    info!("quit");
    Ok(())
}
