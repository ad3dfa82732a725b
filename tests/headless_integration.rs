use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pomodial::{
    dial::{minutes_to_angle, point_on_circle, Point, MAX_MINUTES, MIN_MINUTES},
    dial_gesture::DialGesture,
    focus::{FocusSettings, FocusState, TimerMode},
    pomodoro::{FocusListener, Pomodoro, SetupDefaults},
    runtime::{FixedTicker, PomoEvent, Runner, TestEventSource},
};

#[derive(Default)]
struct Recorder {
    events: Vec<&'static str>,
}

impl FocusListener for Recorder {
    fn on_cancel(&mut self) {
        self.events.push("cancel");
    }

    fn on_complete(&mut self) {
        self.events.push("complete");
    }

    fn on_give_up(&mut self) {
        self.events.push("give_up");
    }

    fn on_restart(&mut self) {
        self.events.push("restart");
    }
}

fn short_settings() -> FocusSettings {
    FocusSettings {
        cancel_window_secs: 1,
        count_cancel_window: false,
    }
}

// Headless countdown driven through Runner/TestEventSource without a TTY.
// Every Tick stands for a full minute so the session finishes quickly.
#[test]
fn headless_countdown_completes_by_ticks() {
    let mut pomodoro = Pomodoro::new(
        SetupDefaults {
            mode: TimerMode::Countdown,
            minutes: 5,
        },
        short_settings(),
    );
    let mut recorder = Recorder::default();
    pomodoro.start_session();

    let (_tx, rx) = mpsc::channel::<PomoEvent>();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    for _ in 0..20u32 {
        if let PomoEvent::Tick = runner.step() {
            pomodoro.advance(Duration::from_secs(60), &mut recorder);
        }
        if pomodoro.focus_state().is_terminal() {
            break;
        }
    }

    assert_eq!(pomodoro.focus_state(), FocusState::Completed);
    assert_eq!(recorder.events, vec!["complete"]);
    let session = pomodoro.session().unwrap();
    assert_eq!(session.display_time(), "00:00");
    assert_eq!(session.elapsed_seconds(), 5 * 60);
}

#[test]
fn headless_countup_end_needs_confirmation() {
    let mut pomodoro = Pomodoro::new(
        SetupDefaults {
            mode: TimerMode::Countup,
            minutes: 25,
        },
        short_settings(),
    );
    let mut recorder = Recorder::default();
    pomodoro.start_session();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    tx.send(PomoEvent::Key(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE)))
        .unwrap();
    tx.send(PomoEvent::Key(KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE)))
        .unwrap();

    // let the cancel window pass first
    pomodoro.advance(Duration::from_secs(4), &mut recorder);
    assert_eq!(pomodoro.focus_state(), FocusState::Focusing);
    assert_eq!(pomodoro.session().unwrap().elapsed_seconds(), 3);

    for _ in 0..2u32 {
        match runner.step() {
            PomoEvent::Key(key) if key.code == KeyCode::Char('e') => {
                pomodoro.session_mut().unwrap().request_end();
                assert_eq!(pomodoro.focus_state(), FocusState::Focusing);
            }
            PomoEvent::Key(key) if key.code == KeyCode::Char('y') => {
                pomodoro.confirm_end(&mut recorder);
            }
            _ => {}
        }
    }

    assert_eq!(pomodoro.focus_state(), FocusState::Abandoned);
    assert_eq!(recorder.events, vec!["give_up"]);

    pomodoro.restart(&mut recorder);
    assert_eq!(pomodoro.focus_state(), FocusState::Canceling);
    assert_eq!(pomodoro.session().unwrap().elapsed_seconds(), 0);
    assert_eq!(recorder.events, vec!["give_up", "restart"]);
}

#[test]
fn headless_dial_drag_does_not_jump_across_top() {
    let mut pomodoro = Pomodoro::new(SetupDefaults::default(), FocusSettings::default());
    let center = Point::new(20.0, 20.0);
    let mut dial = DialGesture::new(center, pomodoro.angle());
    let touch = |angle: f64| point_on_circle(center.x, center.y, 15.0, angle);

    // counter-clockwise past 12 o'clock pins the dial at the minimum
    dial.begin(touch(10.0));
    for angle in [0.0, 350.0, 330.0, 300.0] {
        if let Some(a) = dial.update(touch(angle)) {
            pomodoro.set_angle(a);
        }
    }
    dial.end();
    assert_eq!(pomodoro.angle(), 0.0);
    assert_eq!(pomodoro.minutes(), MIN_MINUTES);

    // a full clockwise sweep tops out at the maximum and stays there
    dial.begin(touch(0.0));
    let mut angle = 0.0;
    while angle <= 720.0 {
        if let Some(a) = dial.update(touch(angle % 360.0)) {
            pomodoro.set_angle(a);
        }
        angle += 15.0;
    }
    dial.end();
    assert_eq!(pomodoro.angle(), minutes_to_angle(MAX_MINUTES));
    assert_eq!(pomodoro.minutes(), MAX_MINUTES);
}

#[test]
fn headless_cancel_window_returns_to_setup() {
    let mut pomodoro = Pomodoro::new(SetupDefaults::default(), FocusSettings::default());
    let mut recorder = Recorder::default();
    pomodoro.start_session();

    pomodoro.advance(Duration::from_millis(9_500), &mut recorder);
    assert_eq!(pomodoro.session().unwrap().cancel_countdown(), 1);

    pomodoro.cancel(&mut recorder);
    assert!(pomodoro.is_setup());
    assert_eq!(recorder.events, vec!["cancel"]);
}
