use pomodial::{
    dial::{arc_points, display_sweep, format_time, point_on_circle, Point},
    focus::{FocusAction, FocusSession, FocusState, TimerMode},
    slide::{SlideToCancel, BASE_COLOR, DANGER_COLOR, HANDLE_MARGIN, HANDLE_WIDTH},
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Points},
        Block, Borders, Clear, Paragraph, Widget, Wrap,
    },
    Frame,
};

use crate::App;

const ARC_SEGMENTS: usize = 240;
const CONTROLS_MAX_WIDTH: u16 = 60;

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Dial placement in terminal cells.
///
/// Dial space uses one unit per cell column and two units per cell row, which
/// keeps the ring round on typical terminal fonts. y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialGeometry {
    pub rect: Rect,
}

impl DialGeometry {
    fn width(&self) -> f64 {
        self.rect.width as f64
    }

    fn height(&self) -> f64 {
        self.rect.height as f64 * 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.width() / 2.0, self.height() / 2.0)
    }

    pub fn radius(&self) -> f64 {
        (self.width().min(self.height()) / 2.0 - 1.5).max(1.0)
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        rect_contains(self.rect, column, row)
    }

    /// Center of a cell in dial space.
    pub fn touch_point(&self, column: u16, row: u16) -> Point {
        Point::new(
            column as f64 - self.rect.x as f64 + 0.5,
            (row as f64 - self.rect.y as f64 + 0.5) * 2.0,
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SetupLayout {
    pub header: Rect,
    pub dial: DialGeometry,
    pub readout: Rect,
    pub footer: Rect,
}

impl SetupLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Mode switch
                Constraint::Min(8),    // Dial
                Constraint::Length(3), // Duration readout
                Constraint::Length(3), // Help
            ])
            .split(area);

        let dial_area = chunks[1];
        let width = dial_area.width.min(dial_area.height.saturating_mul(2));
        let dial = Rect::new(
            dial_area.x + (dial_area.width - width) / 2,
            dial_area.y,
            width,
            dial_area.height,
        );

        Self {
            header: chunks[0],
            dial: DialGeometry { rect: dial },
            readout: chunks[2],
            footer: chunks[3],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FocusLayout {
    pub header: Rect,
    pub clock: Rect,
    pub slogan: Rect,
    pub controls: Rect,
    pub footer: Rect,
}

impl FocusLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Mode and start time
                Constraint::Min(0),
                Constraint::Length(3), // Clock
                Constraint::Length(2), // Slogan
                Constraint::Min(0),
                Constraint::Length(3), // Buttons or slide bar
                Constraint::Length(3), // Help
            ])
            .split(area);

        let row = chunks[5];
        let width = row.width.saturating_sub(4).min(CONTROLS_MAX_WIDTH);
        let controls = Rect::new(row.x + (row.width - width) / 2, row.y, width, row.height);

        Self {
            header: chunks[0],
            clock: chunks[2],
            slogan: chunks[3],
            controls,
            footer: chunks[6],
        }
    }
}

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.pomodoro.session() {
            None => render_setup(self, area, buf),
            Some(session) => render_focus(self, session, area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn render_footer(help: &str, notice: Option<&str>, area: Rect, buf: &mut Buffer) {
    let mut lines = vec![Line::from(Span::styled(
        help.to_string(),
        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
    ))];
    if let Some(notice) = notice {
        lines.push(Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::Yellow),
        )));
    }
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn mode_switch(mode: TimerMode) -> Line<'static> {
    let selected = bold().fg(Color::Green);
    let dim = Style::default().add_modifier(Modifier::DIM);
    let (down, up) = match mode {
        TimerMode::Countdown => (selected, dim),
        TimerMode::Countup => (dim, selected),
    };
    Line::from(vec![
        Span::styled(" countdown ", down),
        Span::raw("│"),
        Span::styled(" countup ", up),
    ])
}

fn render_setup(app: &App, area: Rect, buf: &mut Buffer) {
    let layout = SetupLayout::new(area);
    let pomodoro = &app.pomodoro;

    Paragraph::new(mode_switch(pomodoro.mode()))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" pomodial "))
        .render(layout.header, buf);

    match pomodoro.mode() {
        TimerMode::Countdown => render_dial(app.dial.angle(), layout.dial, buf),
        TimerMode::Countup => {
            Paragraph::new("Counts up from zero until you stop")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray))
                .render(layout.dial.rect, buf);
        }
    }

    let readout = match pomodoro.mode() {
        TimerMode::Countdown => format_time(pomodoro.minutes() * 60),
        TimerMode::Countup => format_time(0),
    };
    Paragraph::new(Span::styled(readout, bold()))
        .alignment(Alignment::Center)
        .render(layout.readout, buf);

    let help = match pomodoro.mode() {
        TimerMode::Countdown => "drag dial or ←/→ adjust · (m)ode · (enter) start · (esc) quit",
        TimerMode::Countup => "(m)ode · (enter) start · (esc) quit",
    };
    render_footer(help, app.notices.last, layout.footer, buf);
}

fn render_dial(angle: f64, geometry: DialGeometry, buf: &mut Buffer) {
    if geometry.rect.is_empty() {
        return;
    }
    let (w, h) = (geometry.width(), geometry.height());
    let center = geometry.center();
    let radius = geometry.radius();

    // canvas y grows upwards
    let flip = |p: Point| (p.x, h - p.y);
    let arc: Vec<(f64, f64)> = arc_points(center.x, center.y, radius, display_sweep(angle), ARC_SEGMENTS)
        .into_iter()
        .map(flip)
        .collect();
    let knob = flip(point_on_circle(center.x, center.y, radius, display_sweep(angle)));

    Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, w])
        .y_bounds([0.0, h])
        .paint(|ctx| {
            ctx.draw(&Circle {
                x: center.x,
                y: h - center.y,
                radius,
                color: Color::DarkGray,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &arc,
                color: Color::Green,
            });
            ctx.draw(&Circle {
                x: knob.0,
                y: knob.1,
                radius: 1.0,
                color: Color::White,
            });
        })
        .render(geometry.rect, buf);
}

fn render_focus(app: &App, session: &FocusSession, area: Rect, buf: &mut Buffer) {
    let layout = FocusLayout::new(area);
    let config = session.config();

    let title = match config.mode {
        TimerMode::Countdown => format!("countdown · {} min", config.minutes),
        TimerMode::Countup => "countup".to_string(),
    };
    Paragraph::new(Line::from(vec![
        Span::styled(title, bold()),
        Span::raw(format!(
            "  started {}",
            session.started_at().format("%H:%M")
        )),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(" focus "))
    .render(layout.header, buf);

    let clock_style = match session.state() {
        FocusState::Paused => bold().add_modifier(Modifier::DIM),
        FocusState::Completed => bold().fg(Color::Green),
        FocusState::Abandoned => bold().fg(Color::Gray),
        _ => bold(),
    };
    Paragraph::new(Span::styled(session.display_time(), clock_style))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
        .render(layout.clock, buf);

    if let Some(slogan) = session.slogan() {
        let style = if session.state() == FocusState::Completed {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Gray)
        };
        Paragraph::new(Span::styled(slogan, style))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout.slogan, buf);
    }

    let actions = session.actions();
    if actions.contains(&FocusAction::SlideToGiveUp) {
        render_slide(&app.slide, layout.controls, buf);
    } else {
        Paragraph::new(Line::from(action_spans(&actions)))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
            .render(layout.controls, buf);
    }

    render_footer("(esc) quit", app.notices.last, layout.footer, buf);

    if session.pending_confirmation() {
        render_confirm(area, buf);
    }
}

fn action_label(action: FocusAction) -> String {
    match action {
        FocusAction::Cancel { seconds_left } => format!("(c)ancel ({}s)", seconds_left),
        FocusAction::SlideToGiveUp => "slide to give up".to_string(),
        FocusAction::Pause => "(space) pause".to_string(),
        FocusAction::Resume => "(space) resume".to_string(),
        FocusAction::End => "(e)nd".to_string(),
        FocusAction::ConfirmEnd => "(y) end now".to_string(),
        FocusAction::DeclineEnd => "(n) keep going".to_string(),
        FocusAction::Back => "(b)ack".to_string(),
        FocusAction::Restart => "(r)estart".to_string(),
    }
}

fn action_spans(actions: &[FocusAction]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (idx, action) in actions.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(action_label(*action), bold()));
    }
    spans
}

fn render_slide(slide: &SlideToCancel, area: Rect, buf: &mut Buffer) {
    let rgb = slide.track_color(BASE_COLOR, DANGER_COLOR);
    let track_color = Color::Rgb(rgb.r, rgb.g, rgb.b);

    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(track_color))
        .render(area, buf);
    if area.height < 3 || area.width < HANDLE_WIDTH as u16 + 2 {
        return;
    }

    let inner_y = area.y + area.height / 2;
    let right_edge = (area.x + area.width) as f64;
    let handle_x = (right_edge - HANDLE_MARGIN - HANDLE_WIDTH + slide.handle_offset())
        .round()
        .max(area.x as f64) as u16;
    let handle_width = (HANDLE_WIDTH as u16).min(area.width);

    // filled track between the handle and the right edge
    let fill_end = area.x + area.width.saturating_sub(1);
    for x in handle_x..fill_end {
        if let Some(cell) = buf.cell_mut((x, inner_y)) {
            cell.set_bg(track_color);
        }
    }

    let hint_width = handle_x.saturating_sub(area.x + 1);
    if hint_width > 0 {
        Paragraph::new(slide.hint_text())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .render(Rect::new(area.x + 1, inner_y, hint_width, 1), buf);
    }

    Paragraph::new("◀◀◀")
        .alignment(Alignment::Center)
        .style(bold().fg(Color::White).bg(track_color))
        .render(Rect::new(handle_x, inner_y, handle_width, 1), buf);
}

fn render_confirm(area: Rect, buf: &mut Buffer) {
    let width = area.width.min(44);
    let height = area.height.min(6);
    let dialog = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    Clear.render(dialog, buf);
    Paragraph::new(vec![
        Line::from("End this session early?"),
        Line::from(""),
        Line::from(action_spans(&[
            FocusAction::DeclineEnd,
            FocusAction::ConfirmEnd,
        ])),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" heads up ")
            .border_style(Style::default().fg(Color::Yellow)),
    )
    .render(dialog, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomodial::config::Config;
    use std::time::Duration;

    fn rendered(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    fn area() -> Rect {
        Rect::new(0, 0, 80, 30)
    }

    #[test]
    fn test_setup_shows_default_duration() {
        let app = App::new(&Config::default());
        let text = rendered(&app, area());
        assert!(text.contains("15:00"));
        assert!(text.contains("countdown"));
    }

    #[test]
    fn test_setup_countup_hides_dial() {
        let mut app = App::new(&Config::default());
        app.pomodoro.toggle_mode();
        let text = rendered(&app, area());
        assert!(text.contains("Counts up from zero"));
        assert!(text.contains("00:00"));
    }

    #[test]
    fn test_focus_shows_cancel_countdown() {
        let mut app = App::new(&Config::default());
        app.pomodoro.start_session();
        app.on_tick(Duration::from_secs(3));
        let text = rendered(&app, area());
        assert!(text.contains("(c)ancel (7s)"));
        assert!(text.contains("14:57"));
    }

    #[test]
    fn test_focus_shows_slide_bar() {
        let mut app = App::new(&Config::default());
        app.pomodoro.start_session();
        app.on_tick(Duration::from_secs(11));
        let text = rendered(&app, area());
        assert!(text.contains("slide left to give up"));
        assert!(text.contains("14:49"));
    }

    #[test]
    fn test_confirm_dialog_rendered() {
        let mut app = App::new(&Config::default());
        app.pomodoro.toggle_mode();
        app.pomodoro.start_session();
        app.on_tick(Duration::from_secs(10));
        if let Some(session) = app.pomodoro.session_mut() {
            session.request_end();
        }
        let text = rendered(&app, area());
        assert!(text.contains("End this session early?"));
        assert!(text.contains("(y) end now"));
    }

    #[test]
    fn test_small_area_does_not_panic() {
        let mut app = App::new(&Config::default());
        let small = Rect::new(0, 0, 20, 5);
        rendered(&app, small);
        app.pomodoro.start_session();
        app.on_tick(Duration::from_secs(11));
        rendered(&app, small);
    }

    #[test]
    fn test_dial_geometry_is_round() {
        let dial = SetupLayout::new(area()).dial;
        assert_eq!(dial.width(), dial.height());
        let c = dial.center();
        assert_eq!(c, Point::new(dial.width() / 2.0, dial.height() / 2.0));

        let p = dial.touch_point(dial.rect.x, dial.rect.y);
        assert_eq!(p, Point::new(0.5, 1.0));
        assert!(dial.contains(dial.rect.x, dial.rect.y));
        assert!(!dial.contains(dial.rect.x + dial.rect.width, dial.rect.y));
    }

    #[test]
    fn test_controls_are_centered_and_bounded() {
        let controls = FocusLayout::new(area()).controls;
        assert_eq!(controls.width, CONTROLS_MAX_WIDTH);
        assert_eq!(controls.x, 10);
    }
}
