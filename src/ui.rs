use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use expense_tracker::{
    spending_summary, AppContext, ExpenseError, ExpenseForm, FormField, PendingDelete, Severity,
    SpendingSummary, TableView, CHART_TITLE,
};
use log::{error, info};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap,
    },
    Frame, Terminal,
};
use std::io;

const FORM_FIELDS: [FormField; 3] = [FormField::Date, FormField::Category, FormField::Amount];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(FormField),
    Table,
}

impl Focus {
    pub fn next(&self) -> Self {
        match self {
            Focus::Field(FormField::Date) => Focus::Field(FormField::Category),
            Focus::Field(FormField::Category) => Focus::Field(FormField::Amount),
            Focus::Field(FormField::Amount) => Focus::Table,
            Focus::Table => Focus::Field(FormField::Date),
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Focus::Field(FormField::Date) => Focus::Table,
            Focus::Field(FormField::Category) => Focus::Field(FormField::Date),
            Focus::Field(FormField::Amount) => Focus::Field(FormField::Category),
            Focus::Table => Focus::Field(FormField::Amount),
        }
    }
}

/// Modal overlays. While one is open it receives every key.
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    Message {
        severity: Severity,
        title: String,
        body: String,
    },
    Confirm(PendingDelete),
    Chart(SpendingSummary),
}

pub struct App {
    pub ctx: AppContext,
    pub form: ExpenseForm,
    pub table: TableView,
    pub state: TableState,
    pub focus: Focus,
    pub dialog: Option<Dialog>,
    pub today: String,
    pub should_quit: bool,
}

impl App {
    /// Build the shell and load the table once.
    pub fn new(ctx: AppContext) -> Result<Self, ExpenseError> {
        let mut app = Self {
            ctx,
            form: ExpenseForm::new(),
            table: TableView::new(),
            state: TableState::default(),
            focus: Focus::Field(FormField::Date),
            dialog: None,
            today: chrono::Local::now().format("%Y-%m-%d").to_string(),
            should_quit: false,
        };
        app.refresh_table()?;
        Ok(app)
    }

    fn refresh_table(&mut self) -> Result<(), ExpenseError> {
        self.table.refresh(&self.ctx)?;
        self.clamp_cursor();
        Ok(())
    }

    /// Keep the row cursor on a real row after the row list changed.
    fn clamp_cursor(&mut self) {
        let len = self.table.rows.len();
        let selected = match self.state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.state.select(selected);
    }

    fn show_message(&mut self, severity: Severity, title: &str, body: &str) {
        self.dialog = Some(Dialog::Message {
            severity,
            title: title.to_string(),
            body: body.to_string(),
        });
    }

    fn show_error(&mut self, err: ExpenseError) {
        if let ExpenseError::Storage(ref e) = err {
            error!("event=action_failed module=ui error={}", e);
        }
        self.dialog = Some(Dialog::Message {
            severity: err.severity(),
            title: err.title().to_string(),
            body: err.to_string(),
        });
    }

    pub fn add_expense(&mut self) {
        let result = self
            .form
            .submit(&self.ctx)
            .and_then(|_| self.refresh_table());

        match result {
            Ok(()) => {
                self.show_message(Severity::Info, "Success", "Expense added successfully!");
                self.focus = Focus::Field(FormField::Date);
            }
            Err(err) => self.show_error(err),
        }
    }

    pub fn show_analytics(&mut self) {
        match spending_summary(&self.ctx) {
            Ok(summary) => self.dialog = Some(Dialog::Chart(summary)),
            Err(err) => self.show_error(err),
        }
    }

    pub fn delete_selected(&mut self) {
        match self.table.request_delete(&self.table.selection()) {
            Ok(pending) => self.dialog = Some(Dialog::Confirm(pending)),
            Err(err) => self.show_error(err),
        }
    }

    fn answer_confirm(&mut self, confirmed: bool) {
        let Some(Dialog::Confirm(pending)) = self.dialog.take() else {
            return;
        };

        // The table reloads itself after a confirmed delete
        match self.table.confirm_delete(&self.ctx, pending, confirmed) {
            Ok(removed) => {
                self.clamp_cursor();
                if confirmed {
                    info!("event=delete_confirm module=ui removed={}", removed);
                }
            }
            Err(err) => self.show_error(err),
        }
    }

    pub fn next_row(&mut self) {
        let len = self.table.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.table.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    fn toggle_current_row(&mut self) {
        let current = self
            .state
            .selected()
            .and_then(|i| self.table.rows.get(i))
            .map(|expense| expense.id);

        if let Some(id) = current {
            self.table.toggle_mark(id);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if matches!(self.dialog, Some(Dialog::Confirm(_))) {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.answer_confirm(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.answer_confirm(false)
                }
                _ => {}
            }
            return;
        }

        if self.dialog.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.dialog = None;
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            KeyCode::F(2) => self.add_expense(),
            KeyCode::F(3) => self.show_analytics(),
            KeyCode::F(4) => self.delete_selected(),
            _ => match self.focus {
                Focus::Field(field) => self.handle_field_key(field, key),
                Focus::Table => self.handle_table_key(key),
            },
        }
    }

    fn handle_field_key(&mut self, field: FormField, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.add_expense(),
            KeyCode::Backspace => {
                self.form.field_mut(field).pop();
            }
            KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.field_mut(field).push(c);
            }
            _ => {}
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.next_row(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_row(),
            KeyCode::Char(' ') => self.toggle_current_row(),
            KeyCode::Delete | KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Home => {
                if !self.table.rows.is_empty() {
                    self.state.select(Some(0));
                }
            }
            KeyCode::End => {
                if !self.table.rows.is_empty() {
                    self.state.select(Some(self.table.rows.len() - 1));
                }
            }
            _ => {}
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle(&app.ctx.config.title))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("event=ui_loop module=ui status=error error={}", err);
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(5), // Entry form
            Constraint::Length(3), // Add / Analytics buttons
            Constraint::Min(5),    // Expense records
            Constraint::Length(3), // Delete button + key hints
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_form(f, chunks[1], app);
    render_buttons(f, chunks[2]);
    render_table(f, chunks[3], app);
    render_status_bar(f, chunks[4], app);

    match &app.dialog {
        Some(Dialog::Message {
            severity,
            title,
            body,
        }) => render_message(f, *severity, title, body),
        Some(Dialog::Confirm(pending)) => render_confirm(f, pending),
        Some(Dialog::Chart(summary)) => render_chart(f, summary),
        None => {}
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let header_text = vec![Line::from(vec![
        Span::styled(
            "Track Your Expenses",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Records: {}", app.table.rows.len()),
            Style::default().fg(Color::White),
        ),
    ])];

    let header = Paragraph::new(header_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = FORM_FIELDS
        .iter()
        .map(|field| {
            let focused = app.focus == Focus::Field(*field);
            let value = app.form.field(*field);

            let label_style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };

            let mut spans = vec![
                Span::styled(if focused { "→ " } else { "  " }, label_style),
                Span::styled(format!("{:<20}", field.label()), label_style),
            ];

            if value.is_empty() && *field == FormField::Date && !focused {
                spans.push(Span::styled(
                    format!("e.g. {}", app.today),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                ));
            } else {
                spans.push(Span::raw(value.to_string()));
            }

            if focused {
                spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
            }

            Line::from(spans)
        })
        .collect();

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" New Expense "),
    );

    f.render_widget(form, area);
}

fn button<'a>(key: &'a str, label: &'a str, color: Color) -> Vec<Span<'a>> {
    vec![
        Span::raw("[ "),
        Span::styled(key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(" ]"),
    ]
}

fn render_buttons(f: &mut Frame, area: Rect) {
    let mut spans = button("F2", "Add Expense", Color::Green);
    spans.push(Span::raw("    "));
    spans.extend(button("F3", "View Analytics", Color::Blue));

    let buttons = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::White)));

    f.render_widget(buttons, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["ID", "Date", "Category", "Amount"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.table.rows.iter().map(|expense| {
        let marked = app.table.is_marked(expense.id);
        let id_cell = if marked {
            format!("✓ {}", expense.id)
        } else {
            format!("  {}", expense.id)
        };

        let cells = vec![
            Cell::from(id_cell),
            Cell::from(expense.date.clone()),
            Cell::from(truncate(&expense.category, 24)),
            Cell::from(format!("{:.2}", expense.amount)),
        ];

        let style = if marked {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        Row::new(cells).style(style).height(1)
    });

    let border_color = if app.focus == Focus::Table {
        Color::Yellow
    } else {
        Color::White
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(14),
            Constraint::Length(26),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(" Expense Records "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = button("F4", "Delete Selected", Color::Red);

    let selected = app.table.selection().len();
    if selected > 0 {
        status_spans.push(Span::raw(" "));
        status_spans.push(Span::styled(
            format!("({} selected)", selected),
            Style::default().fg(Color::Red),
        ));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Focus | "));
    status_spans.push(Span::styled("Space", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Select | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Add | "));
    status_spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    }
}

fn render_message(f: &mut Frame, severity: Severity, title: &str, body: &str) {
    let area = centered_rect(50, 25, f.size());
    let color = severity_color(severity);

    let content = vec![
        Line::from(""),
        Line::from(Span::raw(body.to_string())),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to close",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    let dialog = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", title)),
        );

    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn render_confirm(f: &mut Frame, pending: &PendingDelete) {
    let area = centered_rect(50, 25, f.size());

    let content = vec![
        Line::from(""),
        Line::from(Span::raw(pending.prompt())),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Yes    "),
            Span::styled("n", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" No"),
        ]),
    ];

    let dialog = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Confirm Delete "),
        );

    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// Sample the unit disc on a braille-dot grid and bucket each dot by slice.
///
/// `cols`/`rows` are the canvas size in terminal cells. Cells are about twice
/// as tall as wide, so the x bounds are widened to keep the pie round; the
/// returned value is that half-width.
fn pie_points(summary: &SpendingSummary, cols: u16, rows: u16) -> (f64, Vec<Vec<(f64, f64)>>) {
    const Y_EXTENT: f64 = 1.05;
    let mut buckets = vec![Vec::new(); summary.slices.len()];
    if cols == 0 || rows == 0 {
        return (Y_EXTENT, buckets);
    }

    let x_extent = Y_EXTENT * f64::from(cols) / (2.0 * f64::from(rows));
    let dots_x = u32::from(cols) * 2;
    let dots_y = u32::from(rows) * 4;

    for px in 0..dots_x {
        let x = -x_extent + (f64::from(px) + 0.5) / f64::from(dots_x) * 2.0 * x_extent;
        for py in 0..dots_y {
            let y = -Y_EXTENT + (f64::from(py) + 0.5) / f64::from(dots_y) * 2.0 * Y_EXTENT;
            if x * x + y * y > 1.0 {
                continue;
            }
            // Counter-clockwise from 3 o'clock
            let fraction = y.atan2(x).rem_euclid(std::f64::consts::TAU) / std::f64::consts::TAU;
            if let Some(i) = summary.slice_at(fraction) {
                buckets[i].push((x, y));
            }
        }
    }

    (x_extent, buckets)
}

fn render_chart(f: &mut Frame, summary: &SpendingSummary) {
    let area = centered_rect(80, 80, f.size());
    f.render_widget(Clear, area);

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", CHART_TITLE))
        .title_alignment(Alignment::Center);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner);

    let (x_extent, buckets) = pie_points(summary, chunks[0].width, chunks[0].height);
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-x_extent, x_extent])
        .y_bounds([-1.05, 1.05])
        .paint(|ctx| {
            for (slice, coords) in summary.slices.iter().zip(&buckets) {
                ctx.draw(&Points {
                    coords: coords.as_slice(),
                    color: rgb(slice.color),
                });
            }
        });
    f.render_widget(canvas, chunks[0]);

    let mut legend: Vec<Line> = summary
        .slices
        .iter()
        .map(|slice| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(rgb(slice.color))),
                Span::raw(slice.label()),
                Span::styled(
                    format!("  {:.2}", slice.total),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();
    legend.push(Line::from(""));
    legend.push(Line::from(Span::styled(
        "Press Esc to close",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    let legend = Paragraph::new(legend).block(Block::default().borders(Borders::LEFT));
    f.render_widget(legend, chunks[1]);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expense_tracker::db;
    use ratatui::backend::TestBackend;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn fill_form(app: &mut App, date: &str, category: &str, amount: &str) {
        app.focus = Focus::Field(FormField::Date);
        type_text(app, date);
        press(app, KeyCode::Tab);
        type_text(app, category);
        press(app, KeyCode::Tab);
        type_text(app, amount);
    }

    fn new_app() -> App {
        App::new(AppContext::in_memory().unwrap()).unwrap()
    }

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_startup_loads_existing_rows() {
        let ctx = AppContext::in_memory().unwrap();
        db::insert_expense(&ctx.conn, "2024-01-01", "Food", 10.0).unwrap();

        let app = App::new(ctx).unwrap();
        assert_eq!(app.table.rows.len(), 1);
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_add_expense_via_keys() {
        let mut app = new_app();
        fill_form(&mut app, "2024-01-01", "Food", "12.5");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.table.rows.len(), 1);
        assert_eq!(app.form, ExpenseForm::new());
        assert!(matches!(
            app.dialog,
            Some(Dialog::Message { severity: Severity::Info, .. })
        ));

        press(&mut app, KeyCode::Enter);
        assert!(app.dialog.is_none());
    }

    #[test]
    fn test_invalid_amount_shows_error_and_keeps_form() {
        let mut app = new_app();
        fill_form(&mut app, "2024-01-01", "Food", "abc");
        press(&mut app, KeyCode::F(2));

        assert!(app.table.rows.is_empty());
        assert_eq!(app.form.amount, "abc");
        match &app.dialog {
            Some(Dialog::Message { severity, body, .. }) => {
                assert_eq!(*severity, Severity::Error);
                assert_eq!(body, "Please enter a valid amount.");
            }
            other => panic!("expected error dialog, got {:?}", other),
        }
    }

    #[test]
    fn test_delete_without_selection_warns() {
        let mut app = new_app();
        fill_form(&mut app, "2024-01-01", "Food", "1");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::F(4));
        assert!(matches!(
            app.dialog,
            Some(Dialog::Message { severity: Severity::Warning, .. })
        ));
        assert_eq!(app.table.rows.len(), 1);
    }

    #[test]
    fn test_delete_selected_with_confirmation() {
        let ctx = AppContext::in_memory().unwrap();
        db::insert_expense(&ctx.conn, "2024-01-01", "Food", 10.0).unwrap();
        db::insert_expense(&ctx.conn, "2024-02-01", "Rent", 900.0).unwrap();
        let mut app = App::new(ctx).unwrap();

        app.focus = Focus::Table;
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Delete);
        assert!(matches!(app.dialog, Some(Dialog::Confirm(_))));

        // Declining leaves everything in place
        press(&mut app, KeyCode::Char('n'));
        assert!(app.dialog.is_none());
        assert_eq!(app.table.rows.len(), 2);

        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::Char('y'));
        assert!(app.dialog.is_none());
        assert_eq!(app.table.rows.len(), 1);
        assert_eq!(app.table.rows[0].category, "Food");
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_analytics_empty_and_with_data() {
        let mut app = new_app();
        press(&mut app, KeyCode::F(3));
        match &app.dialog {
            Some(Dialog::Message { severity, body, .. }) => {
                assert_eq!(*severity, Severity::Info);
                assert_eq!(body, "No expenses to analyze yet.");
            }
            other => panic!("expected empty-state notice, got {:?}", other),
        }
        press(&mut app, KeyCode::Esc);

        fill_form(&mut app, "2024-01-01", "Food", "10");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::F(3));
        assert!(matches!(app.dialog, Some(Dialog::Chart(_))));

        let text = screen_text(&mut app);
        assert!(text.contains("Spending Distribution"));
        assert!(text.contains("Food 100.0%"));
    }

    #[test]
    fn test_main_screen_layout() {
        let mut app = new_app();
        let text = screen_text(&mut app);

        for expected in [
            "Track Your Expenses",
            "Date (YYYY-MM-DD)",
            "Category",
            "Amount",
            "Add Expense",
            "View Analytics",
            "Expense Records",
            "Delete Selected",
        ] {
            assert!(text.contains(expected), "missing {:?}", expected);
        }
    }

    #[test]
    fn test_esc_quits_only_without_dialog() {
        let mut app = new_app();
        press(&mut app, KeyCode::F(3));
        press(&mut app, KeyCode::Esc);
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_focus_cycles() {
        let start = Focus::Field(FormField::Date);
        let mut focus = start;
        for _ in 0..4 {
            focus = focus.next();
        }
        assert_eq!(focus, start);
        assert_eq!(start.previous(), Focus::Table);
    }

    #[test]
    fn test_pie_points_cover_each_slice() {
        let summary = SpendingSummary::from_totals(vec![
            expense_tracker::CategoryTotal {
                category: "A".to_string(),
                total: 1.0,
            },
            expense_tracker::CategoryTotal {
                category: "B".to_string(),
                total: 3.0,
            },
        ])
        .unwrap();

        let (_, buckets) = pie_points(&summary, 40, 20);
        assert_eq!(buckets.len(), 2);
        assert!(!buckets[0].is_empty());
        assert!(buckets[1].len() > buckets[0].len() * 2);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long category", 10), "a very ...");
    }
}
