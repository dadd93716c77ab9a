use crate::calc::grid::{current_month, first_of_month, month_name, next_month, prev_month};
use crate::calc::{
    auto_target_month, build_cells, DayCell, DayRole, DraftRange, SelectionState, SyncLoop,
    SyncOutcome,
};
use crate::data::trip::{format_date, trip_on};
use crate::data::{AppSettings, HolidayData, HolidayKind, Trip};
use crate::remote::{delete_and_refresh, save_and_confirm, TripStore};
use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers};
use log::info;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io::Stdout;
use std::time::{Duration as StdDuration, Instant};

const DRAFT_COLOR: Color = Color::Yellow;
const TRIP_COLOR: Color = Color::Cyan;
const HOLIDAY_COLOR: Color = Color::Red;
const WORKDAY_COLOR: Color = Color::Magenta;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    fn color(self) -> Color {
        match self {
            ToastKind::Info => Color::Cyan,
            ToastKind::Success => Color::Green,
            ToastKind::Error => Color::Red,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

pub struct App<'a> {
    store: &'a dyn TripStore,
    holidays: &'a HolidayData,
    trips: Vec<Trip>,
    draft: DraftRange,
    sync: SyncLoop,
    mode: Mode,
    displayed_month: NaiveDate,
    /// Keyboard cursor; stands in for the mouse click target.
    selected_date: NaiveDate,
    today: NaiveDate,
    /// Shown until the next keypress.
    toast: Option<Toast>,
    show_trip_list: bool,
    endpoint_label: String,
}

impl<'a> App<'a> {
    pub fn new(
        store: &'a dyn TripStore,
        holidays: &'a HolidayData,
        settings: &AppSettings,
        today: NaiveDate,
    ) -> Self {
        App {
            store,
            holidays,
            trips: Vec::new(),
            draft: DraftRange::new(),
            sync: SyncLoop::new(settings.poll_interval()),
            mode: Mode::View,
            displayed_month: current_month(today),
            selected_date: today,
            today,
            toast: None,
            show_trip_list: false,
            endpoint_label: settings.endpoint().unwrap_or("(not configured)").to_string(),
        }
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// Foreground load on start-up; failures are shown. Starts the sync loop.
    pub fn initial_load(&mut self, now: Instant) {
        self.refresh(false);
        self.sync.start(now);
    }

    /// Driven by the event loop. Does nothing while editing.
    pub fn tick(&mut self, now: Instant) {
        if self.mode == Mode::Edit {
            return;
        }
        match self.sync.tick(self.store, &mut self.trips, now) {
            SyncOutcome::Updated => {
                self.show(ToastKind::Info, "Trips updated in the background");
                self.auto_navigate();
            }
            SyncOutcome::Idle | SyncOutcome::Unchanged | SyncOutcome::Failed(_) => {}
        }
    }

    fn show(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            kind,
        });
    }

    /// Manual or start-up fetch. `announce` adds a success toast.
    fn refresh(&mut self, announce: bool) {
        match self.sync.load(self.store, &mut self.trips) {
            Ok(()) => {
                self.auto_navigate();
                if announce {
                    self.show(ToastKind::Success, format!("Loaded {} trip(s)", self.trips.len()));
                }
            }
            Err(e) => self.show(ToastKind::Error, e.to_string()),
        }
    }

    fn auto_navigate(&mut self) {
        if !self.draft.is_empty() {
            return;
        }
        if let Some(month) = auto_target_month(&self.draft, &self.trips, self.today) {
            self.jump_to_month(month);
        }
    }

    fn jump_to_month(&mut self, month: NaiveDate) {
        self.displayed_month = first_of_month(month);
        if first_of_month(self.selected_date) != self.displayed_month {
            self.selected_date = self.displayed_month;
        }
    }

    fn move_cursor(&mut self, days: i64) {
        if let Some(d) = self.selected_date.checked_add_signed(Duration::days(days)) {
            self.selected_date = d;
            if first_of_month(d) != self.displayed_month {
                self.displayed_month = first_of_month(d);
            }
        }
    }

    fn enter_edit(&mut self) {
        self.mode = Mode::Edit;
        self.draft.reset();
        self.sync.cancel();
    }

    fn leave_edit(&mut self) {
        self.mode = Mode::View;
        self.draft.reset();
        self.sync.start(Instant::now());
    }

    /// A click on the cursor date. Padding days are ignored.
    fn click_selected(&mut self) {
        let clickable = build_cells(
            self.displayed_month,
            self.today,
            &self.draft,
            &self.trips,
            self.holidays,
        )
        .iter()
        .any(|c| c.date == self.selected_date && c.interactive);
        if !clickable {
            return;
        }
        let previous_start = self.draft.start();
        self.draft.click(self.selected_date);
        if let Some(start) = self.draft.start() {
            if previous_start != Some(start) {
                self.jump_to_month(start);
            }
        }
    }

    fn save_draft(&mut self) {
        let Some((start, end)) = self.draft.complete_range() else {
            self.show(ToastKind::Info, "Pick a start and an end date first");
            return;
        };
        match save_and_confirm(self.store, None, start, end) {
            Ok((id, trips)) => {
                info!("trip {id} saved for {start}..{end}");
                self.sync.record(&trips);
                self.trips = trips;
                self.leave_edit();
                self.auto_navigate();
                self.show(
                    ToastKind::Success,
                    format!("Saved trip {} – {}", format_date(start), format_date(end)),
                );
            }
            Err(e) => self.show(ToastKind::Error, e.to_string()),
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = trip_on(&self.trips, self.selected_date).map(|t| t.id.clone()) else {
            self.show(
                ToastKind::Info,
                format!("No trip on {}", format_date(self.selected_date)),
            );
            return;
        };
        match delete_and_refresh(self.store, &id) {
            Ok(trips) => {
                self.sync.record(&trips);
                self.trips = trips;
                self.auto_navigate();
                self.show(ToastKind::Success, format!("Deleted trip {id}"));
            }
            Err(e) => self.show(ToastKind::Error, e.to_string()),
        }
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        self.toast = None;

        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        match code {
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Up => self.move_cursor(-7),
            KeyCode::Down => self.move_cursor(7),
            KeyCode::Char('n') => self.jump_to_month(next_month(self.displayed_month)),
            KeyCode::Char('p') => self.jump_to_month(prev_month(self.displayed_month)),
            KeyCode::Char('t') => {
                self.jump_to_month(current_month(self.today));
                self.selected_date = self.today;
            }
            KeyCode::Char('l') => self.show_trip_list = !self.show_trip_list,
            _ => match self.mode {
                Mode::View => return self.handle_view_key(code),
                Mode::Edit => self.handle_edit_key(code),
            },
        }
        false
    }

    fn handle_view_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('e') => self.enter_edit(),
            KeyCode::Char('r') => self.refresh(true),
            KeyCode::Char('x') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('q') => return true,
            _ => {}
        }
        false
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(' ') | KeyCode::Enter => self.click_selected(),
            KeyCode::Char('c') => self.draft.reset(),
            KeyCode::Char('s') => self.save_draft(),
            KeyCode::Esc => self.leave_edit(),
            _ => {}
        }
    }

    pub fn render(&mut self, f: &mut Frame) {
        let size = f.area();
        let columns = if self.show_trip_list {
            vec![Constraint::Length(30), Constraint::Min(30)]
        } else {
            vec![Constraint::Length(30), Constraint::Min(0)]
        };
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(columns)
            .split(size);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(10), // title + weekday header + up to 6 weeks + border
                Constraint::Min(12),    // details + help
            ])
            .split(halves[0]);

        self.render_calendar(f, left[0]);
        self.render_details_and_help(f, left[1]);
        if self.show_trip_list {
            self.render_trip_list(f, halves[1]);
        }
    }

    fn render_calendar(&self, f: &mut Frame, area: Rect) {
        let cells = build_cells(
            self.displayed_month,
            self.today,
            &self.draft,
            &self.trips,
            self.holidays,
        );
        let title = format!(
            "{} {}",
            month_name(self.displayed_month.month()),
            self.displayed_month.year()
        );
        let mut lines: Vec<Line> = vec![
            Line::from(Span::styled(
                format!("{:^21}", title),
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )),
            Line::from("Su Mo Tu We Th Fr Sa"),
        ];
        for week in cells.chunks(7) {
            let mut spans = Vec::with_capacity(14);
            for cell in week {
                let style = day_cell_style(cell, cell.date == self.selected_date);
                spans.push(Span::styled(format!("{:2}", cell.date.day()), style));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }
        let mode = match self.mode {
            Mode::View => " View ",
            Mode::Edit => " Edit ",
        };
        let widget = Paragraph::new(lines).block(Block::default().borders(Borders::TOP).title(mode));
        f.render_widget(widget, area);
    }

    fn render_details_and_help(&self, f: &mut Frame, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();

        if let Some(toast) = &self.toast {
            lines.push(Line::from(Span::styled(
                toast.message.clone(),
                Style::default()
                    .fg(toast.kind.color())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(format!("{}:", format_date(self.selected_date))));
        if let Some(h) = self.holidays.lookup(self.selected_date) {
            lines.push(Line::from(format!("  {} ({})", h.name, h.kind.label())));
        }
        match trip_on(&self.trips, self.selected_date) {
            Some(t) => lines.push(Line::from(format!(
                "  Trip {}: {} – {} ({} days)",
                t.id,
                format_date(t.start_date),
                format_date(t.end_date),
                t.days()
            ))),
            None => lines.push(Line::from("  (no trip)")),
        }

        if self.mode == Mode::Edit {
            let draft = match self.draft.state() {
                SelectionState::Empty => "Draft: pick a start date".to_string(),
                SelectionState::Partial => format!(
                    "Draft: {} – pick an end date",
                    self.draft.start().map(format_date).unwrap_or_default()
                ),
                SelectionState::Complete => format!(
                    "Draft: {} – {} (s=save)",
                    self.draft.start().map(format_date).unwrap_or_default(),
                    self.draft.end().map(format_date).unwrap_or_default()
                ),
            };
            lines.push(Line::from(Span::styled(draft, Style::default().fg(DRAFT_COLOR))));
        }

        let key_rows: Vec<Row> = match self.mode {
            Mode::View => vec![
                Row::new(vec!["← → ↑ ↓", "Move date", "n / p", "Next/prev month"]),
                Row::new(vec!["e", "Plan a trip", "t", "Today"]),
                Row::new(vec!["x", "Delete trip", "r", "Refresh"]),
                Row::new(vec!["l", "Trip list", "q/Ctrl+C", "Quit"]),
            ],
            Mode::Edit => vec![
                Row::new(vec!["← → ↑ ↓", "Move date", "n / p", "Next/prev month"]),
                Row::new(vec!["Space", "Pick date", "c", "Clear draft"]),
                Row::new(vec!["s", "Save trip", "Esc", "Cancel"]),
                Row::new(vec!["l", "Trip list", "Ctrl+C", "Quit"]),
            ],
        };
        let help_table = Table::new(
            key_rows,
            [
                Constraint::Length(8),
                Constraint::Length(12),
                Constraint::Length(8),
                Constraint::Length(16),
            ],
        )
        .block(Block::default().borders(Borders::NONE))
        .column_spacing(1);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(4),    // details
                Constraint::Length(4), // help table
                Constraint::Length(1), // endpoint footer
            ])
            .split(area);

        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::NONE)),
            chunks[0],
        );
        f.render_widget(help_table, chunks[1]);

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("Store  ", Style::default().add_modifier(Modifier::DIM)),
            Span::styled(self.endpoint_label.clone(), Style::default().fg(Color::DarkGray)),
        ]));
        f.render_widget(footer, chunks[2]);
    }

    fn render_trip_list(&self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let header = Row::new(vec![
            Cell::from("#").style(bold),
            Cell::from("Id").style(bold),
            Cell::from("Start").style(bold),
            Cell::from("End").style(bold),
            Cell::from("Days").style(bold),
        ]);
        let rows: Vec<Row> = self
            .trips
            .iter()
            .enumerate()
            .map(|(i, t)| {
                Row::new(vec![
                    Cell::from(format!("{}", i + 1)),
                    Cell::from(t.id.clone()),
                    Cell::from(format_date(t.start_date)),
                    Cell::from(format_date(t.end_date)),
                    Cell::from(t.days().to_string()),
                ])
            })
            .collect();

        let mut table_state = TableState::default();
        table_state.select(self.trips.iter().position(|t| t.contains(self.selected_date)));

        let table = Table::new(
            rows,
            [
                Constraint::Length(3),
                Constraint::Length(14),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(5),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" Trips "))
        .row_highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
        f.render_stateful_widget(table, area, &mut table_state);
    }
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(250))? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key.code, key.modifiers) {
                    break;
                }
            }
        }
        app.tick(Instant::now());
    }
    Ok(())
}

/// Determines the ratatui `Style` for a calendar day cell.
pub(crate) fn day_cell_style(cell: &DayCell, is_selected: bool) -> Style {
    let mut style = match cell.role {
        DayRole::DraftBoundary { .. } => Style::default()
            .fg(Color::Black)
            .bg(DRAFT_COLOR)
            .add_modifier(Modifier::BOLD),
        DayRole::DraftInterior => Style::default().fg(DRAFT_COLOR).add_modifier(Modifier::BOLD),
        DayRole::TripBoundary { .. } => Style::default()
            .fg(Color::Black)
            .bg(TRIP_COLOR)
            .add_modifier(Modifier::BOLD),
        DayRole::TripInterior => Style::default().fg(TRIP_COLOR),
        DayRole::Plain => match cell.holiday.as_ref().map(|h| h.kind) {
            Some(HolidayKind::Holiday) => Style::default().fg(HOLIDAY_COLOR),
            Some(HolidayKind::Workday) => Style::default().fg(WORKDAY_COLOR),
            None => Style::default(),
        },
    };
    if cell.saved_distinct && cell.role == DayRole::TripInterior {
        style = style.add_modifier(Modifier::DIM);
    }
    if cell.holiday.is_some() && cell.role != DayRole::Plain {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if !cell.in_month {
        style = style.add_modifier(Modifier::DIM);
    }
    if cell.is_today {
        style = style.add_modifier(Modifier::REVERSED);
    }
    if is_selected {
        style = style.add_modifier(Modifier::SLOW_BLINK | Modifier::UNDERLINED | Modifier::BOLD);
    }
    style
}
