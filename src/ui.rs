use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use splitit::{
    collection_plan, summary_view, Action, AssignmentMode, Badge, CollectionPlan, Currency,
    CurrencyFormat, ExpenseId, PersonId, PricingMode, Reducer, SettleProgress, SettleSubMode,
    SplitMode, SplitState, SplitSummary, SummaryView, ViewMode,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Items,
    People,
}

impl Pane {
    pub fn toggle(&self) -> Self {
        match self {
            Pane::Items => Pane::People,
            Pane::People => Pane::Items,
        }
    }
}

/// Field being typed into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    ManualTotal,
    Description(ExpenseId),
    Price(ExpenseId),
    Name(PersonId),
    Amount(PersonId),
}

impl EditTarget {
    fn prompt(&self) -> &'static str {
        match self {
            EditTarget::ManualTotal => "Total",
            EditTarget::Description(_) => "Item",
            EditTarget::Price(_) => "Price",
            EditTarget::Name(_) => "Name",
            EditTarget::Amount(_) => "Amount",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub target: EditTarget,
    pub buffer: String,
}

pub struct App {
    pub state: SplitState,
    pub reducer: Reducer,
    pub progress: SettleProgress,
    pub currency: Currency,
    pub pane: Pane,
    pub items_state: TableState,
    pub people_state: TableState,
    pub input: Option<Input>,
    pub message: Option<String>,
}

impl App {
    pub fn new(state: SplitState, currency: Currency) -> Self {
        let mut app = App {
            state,
            reducer: Reducer::new(),
            progress: SettleProgress::new(),
            currency,
            pane: Pane::People,
            items_state: TableState::default(),
            people_state: TableState::default(),
            input: None,
            message: None,
        };
        app.clamp_selection();
        app
    }

    pub fn summary(&self) -> SplitSummary {
        self.reducer.engine().evaluate(&self.state)
    }

    pub fn plan(&self, summary: &SplitSummary) -> CollectionPlan {
        collection_plan(&self.state, summary, &self.progress)
    }

    pub fn view(&self) -> (SplitSummary, CollectionPlan, SummaryView) {
        let summary = self.summary();
        let plan = self.plan(&summary);
        let view = summary_view(&self.state, &summary, Some(&plan), &self.currency);
        (summary, plan, view)
    }

    pub fn dispatch(&mut self, action: Action) {
        self.state = self.reducer.apply(&self.state, action);
        self.progress.observe(&self.state);
        self.clamp_selection();
    }

    pub fn selected_expense(&self) -> Option<ExpenseId> {
        self.items_state
            .selected()
            .and_then(|i| self.state.expenses.get(i))
            .map(|e| e.id.clone())
    }

    pub fn selected_person(&self) -> Option<PersonId> {
        self.people_state
            .selected()
            .and_then(|i| self.state.people.get(i))
            .map(|p| p.id.clone())
    }

    fn clamp_selection(&mut self) {
        clamp(&mut self.items_state, self.state.expenses.len());
        clamp(&mut self.people_state, self.state.people.len());
    }

    fn move_selection(&mut self, down: bool) {
        let (table, len) = match self.pane {
            Pane::Items => (&mut self.items_state, self.state.expenses.len()),
            Pane::People => (&mut self.people_state, self.state.people.len()),
        };
        if len == 0 {
            return;
        }
        let i = table.selected().unwrap_or(0);
        let next = if down { (i + 1) % len } else { (i + len - 1) % len };
        table.select(Some(next));
    }

    fn begin_edit(&mut self, target: EditTarget) {
        let buffer = match &target {
            EditTarget::ManualTotal => self.state.manual_total.clone(),
            EditTarget::Description(id) => self.state.expense(id).map(|e| e.description.clone()).unwrap_or_default(),
            EditTarget::Price(id) => self.state.expense(id).map(|e| e.price.clone()).unwrap_or_default(),
            EditTarget::Name(id) => self.state.person(id).map(|p| p.name.clone()).unwrap_or_default(),
            EditTarget::Amount(id) => self.state.person(id).map(|p| p.amount.clone()).unwrap_or_default(),
        };
        self.input = Some(Input { target, buffer });
    }

    fn commit_edit(&mut self) {
        let Some(Input { target, buffer }) = self.input.take() else {
            return;
        };
        let action = match target {
            EditTarget::ManualTotal => Action::SetManualTotal { total: buffer },
            EditTarget::Description(id) => Action::SetExpenseDescription { id, description: buffer },
            EditTarget::Price(id) => Action::SetExpensePrice { id, price: buffer },
            EditTarget::Name(id) => Action::RenamePerson { id, name: buffer },
            EditTarget::Amount(id) => Action::SetPersonAmount { id, amount: buffer },
        };
        self.dispatch(action);
    }

    /// Returns true when the app should quit
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        self.message = None;

        if self.input.is_some() {
            match code {
                KeyCode::Enter => self.commit_edit(),
                KeyCode::Esc => self.input = None,
                KeyCode::Backspace => {
                    if let Some(input) = self.input.as_mut() {
                        input.buffer.pop();
                    }
                }
                KeyCode::Char(c) => {
                    if let Some(input) = self.input.as_mut() {
                        input.buffer.push(c);
                    }
                }
                _ => {}
            }
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.state.assignment_mode.is_active() {
                    self.dispatch(Action::ExitAssignmentMode);
                } else {
                    return true;
                }
            }
            KeyCode::Tab => self.pane = self.pane.toggle(),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Char('v') => self.toggle_view(),
            _ => match self.state.view_mode {
                ViewMode::Consumption => self.handle_consumption_key(code),
                ViewMode::Settle => self.handle_settle_key(code),
            },
        }

        false
    }

    fn toggle_view(&mut self) {
        let mode = match self.state.view_mode {
            ViewMode::Consumption => ViewMode::Settle,
            ViewMode::Settle => ViewMode::Consumption,
        };
        self.dispatch(Action::SetViewMode { mode });
        if mode == ViewMode::Settle && self.state.view_mode != ViewMode::Settle {
            self.message = Some("Balance the split before settling".to_string());
        } else if mode == ViewMode::Settle {
            self.pane = Pane::People;
        }
    }

    fn handle_consumption_key(&mut self, code: KeyCode) {
        let assigning = self.state.assignment_mode.is_active();

        match (self.pane, code) {
            (_, KeyCode::Char('t')) if !self.state.has_items() => self.begin_edit(EditTarget::ManualTotal),
            (_, KeyCode::Char('s')) => {
                let mode = match self.state.split_mode {
                    SplitMode::Equally => SplitMode::Amounts,
                    SplitMode::Amounts => SplitMode::Equally,
                };
                self.dispatch(Action::SetSplitMode { mode });
            }
            (_, KeyCode::Char('m')) => {
                let mode = match self.state.pricing_mode {
                    PricingMode::Total => PricingMode::Each,
                    PricingMode::Each => PricingMode::Total,
                };
                self.dispatch(Action::SetPricingMode { mode });
            }
            (_, KeyCode::Char('x')) if assigning => self.dispatch(Action::SelectAll),

            (Pane::Items, KeyCode::Char('a')) if !assigning => {
                self.dispatch(Action::add_expense());
                self.items_state.select(Some(self.state.expenses.len().saturating_sub(1)));
            }
            (Pane::People, KeyCode::Char('a')) if !assigning => {
                self.dispatch(Action::add_person());
                self.people_state.select(Some(self.state.people.len().saturating_sub(1)));
            }

            (Pane::Items, _) => {
                let Some(id) = self.selected_expense() else { return };
                match code {
                    KeyCode::Enter => self.dispatch(Action::FocusItem { id }),
                    KeyCode::Char(' ') => self.dispatch(Action::ToggleExpense { id }),
                    KeyCode::Char('d') => self.dispatch(Action::RemoveExpense { id }),
                    KeyCode::Char('n') => self.begin_edit(EditTarget::Description(id)),
                    KeyCode::Char('p') => self.begin_edit(EditTarget::Price(id)),
                    KeyCode::Char('e') => {
                        let mode = match self.state.expense(&id).and_then(|e| e.pricing_mode) {
                            None => Some(PricingMode::Total),
                            Some(PricingMode::Total) => Some(PricingMode::Each),
                            Some(PricingMode::Each) => None,
                        };
                        self.dispatch(Action::SetExpensePricingMode { id, mode });
                    }
                    _ => {}
                }
            }
            (Pane::People, _) => {
                let Some(id) = self.selected_person() else { return };
                match code {
                    KeyCode::Enter => self.dispatch(Action::FocusPerson { id }),
                    KeyCode::Char(' ') => self.dispatch(Action::TogglePerson { id }),
                    KeyCode::Char('d') => self.dispatch(Action::RemovePerson { id }),
                    KeyCode::Char('n') => self.begin_edit(EditTarget::Name(id)),
                    KeyCode::Char('p') if self.state.split_mode == SplitMode::Amounts => {
                        self.begin_edit(EditTarget::Amount(id))
                    }
                    _ => {}
                }
            }
        }
    }

    fn handle_settle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('o') => {
                let mode = match self.progress.sub_mode() {
                    SettleSubMode::OnePayer => SettleSubMode::Everyone,
                    SettleSubMode::Everyone => SettleSubMode::OnePayer,
                };
                self.progress.set_sub_mode(mode);
            }
            KeyCode::Char('c') => self.dispatch(Action::SetPayer { id: None }),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(id) = self.selected_person() else { return };
                let awaiting = self.progress.sub_mode() == SettleSubMode::OnePayer && self.state.payer_id.is_none();
                if awaiting {
                    self.dispatch(Action::SetPayer { id: Some(id) });
                } else if self.state.payer_id.as_ref() != Some(&id) || self.progress.sub_mode() == SettleSubMode::Everyone {
                    self.progress.toggle_paid(&id);
                }
            }
            _ => {}
        }
    }
}

fn clamp(table: &mut TableState, len: usize) {
    match (table.selected(), len) {
        (_, 0) => table.select(None),
        (None, _) => table.select(Some(0)),
        (Some(i), len) if i >= len => table.select(Some(len - 1)),
        _ => {}
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Ok(());
            }
            if app.handle_key(key.code) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let (summary, plan, view) = app.view();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Tables
            Constraint::Length(3), // Summary
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app, &view);

    match app.state.view_mode {
        ViewMode::Consumption => {
            let content = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[1]);
            render_items(f, content[0], app, &summary);
            render_people(f, content[1], app, &view);
        }
        ViewMode::Settle => render_settle(f, chunks[1], app, &plan),
    }

    // Summary is hidden while assigning
    if !app.state.assignment_mode.is_active() {
        render_summary(f, chunks[2], &view);
    }
    render_status_bar(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App, view: &SummaryView) {
    let mut spans = vec![Span::styled(
        "Split the Bill",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw("  |  "));

    for (i, (mode, name)) in [(ViewMode::Consumption, "Consumption"), (ViewMode::Settle, "Settle")]
        .iter()
        .enumerate()
    {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        let style = if *mode == app.state.view_mode {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else if *mode == ViewMode::Settle && !view.can_settle {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(*name, style));
    }

    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!("Total: {} {}", view.symbol, view.total),
        Style::default().fg(Color::White),
    ));
    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!("Split: {:?}", app.state.split_mode),
        Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!("Pricing: {}", app.state.pricing_mode.label()),
        Style::default().fg(Color::Cyan),
    ));

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));
    f.render_widget(header, area);
}

fn pane_border(app: &App, pane: Pane) -> Style {
    if app.pane == pane {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_items(f: &mut Frame, area: Rect, app: &mut App, summary: &SplitSummary) {
    let header = Row::new(
        ["", "Item", "Price", "Mode", "Who", "Line"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))),
    )
    .style(Style::default().bg(Color::DarkGray))
    .height(1);

    let mode = &app.state.assignment_mode;
    let rows = app.state.expenses.iter().map(|expense| {
        let active = mode.active_item() == Some(&expense.id);
        let marker = match mode {
            AssignmentMode::PersonActive { person_id } if app.state.is_assigned(&expense.id, person_id) => "✓",
            AssignmentMode::PersonActive { .. } => "·",
            _ if active => "▶",
            _ => "",
        };
        let line_total = summary
            .pools
            .iter()
            .find(|pool| pool.expense_id.as_ref() == Some(&expense.id))
            .map(|pool| pool.line_total)
            .unwrap_or_default();

        let style = if mode.active_item().is_some() && !active {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Row::new(vec![
            Cell::from(marker),
            Cell::from(truncate(expense.display_name(), 20)),
            Cell::from(expense.price.clone()),
            Cell::from(app.state.effective_pricing_mode(expense).label()),
            Cell::from(app.state.assignees(&expense.id).len().to_string()),
            Cell::from(app.currency.format_amount(line_total)),
        ])
        .style(style)
    });

    let title = match mode.active_person().and_then(|id| app.state.person(id)) {
        Some(person) => format!(" Items for {} ", person.display_name()),
        None if app.state.has_items() => " Items ".to_string(),
        None => format!(" Items (total {}) ", app.state.manual_total),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Min(12),
            Constraint::Length(10),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).border_style(pane_border(app, Pane::Items)).title(title))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.items_state);
}

fn render_people(f: &mut Frame, area: Rect, app: &mut App, view: &SummaryView) {
    let header = Row::new(
        ["", "", "Name", "Amount", "Items"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))),
    )
    .style(Style::default().bg(Color::DarkGray))
    .height(1);

    let mode = &app.state.assignment_mode;
    let rows = view.people.iter().map(|line| {
        let active = mode.active_person() == Some(&line.person_id);
        let marker = match mode {
            AssignmentMode::ItemActive { item_id } if app.state.is_assigned(item_id, &line.person_id) => "✓",
            AssignmentMode::ItemActive { .. } => "·",
            _ if active => "▶",
            _ => "",
        };
        let style = if mode.active_person().is_some() && !active {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Row::new(vec![
            Cell::from(marker),
            Cell::from(line.initial.clone()).style(Style::default().fg(Color::Green)),
            Cell::from(truncate(&line.name, 18)),
            Cell::from(line.displayed_amount.clone()),
            Cell::from(line.item_count.to_string()),
        ])
        .style(style)
    });

    let title = match mode.active_item().and_then(|id| app.state.expense(id)) {
        Some(expense) => format!(" Who had {}? ", expense.display_name()),
        None => format!(" People · {:?} ", app.state.split_mode),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(12),
            Constraint::Length(12),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).border_style(pane_border(app, Pane::People)).title(title))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.people_state);
}

fn render_settle(f: &mut Frame, area: Rect, app: &mut App, plan: &CollectionPlan) {
    let header = Row::new(
        ["Name", "Role", "Amount", "Status"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))),
    )
    .style(Style::default().bg(Color::DarkGray))
    .height(1);

    // Rows follow roster order so the selection index maps onto state.people
    let rows = app.state.people.iter().map(|person| {
        let payer = plan.payer.as_ref().filter(|p| p.person_id == person.id);
        let debtor = plan.debtors.iter().find(|d| d.person_id == person.id);

        let (role, amount, status, color) = match (payer, debtor) {
            (Some(payer), _) => ("Paid by", app.currency.display(payer.share), "", Color::Cyan),
            (None, Some(debtor)) if debtor.paid => ("Owes", app.currency.display(debtor.owes), "Paid", Color::Green),
            (None, Some(debtor)) => ("Owes", app.currency.display(debtor.owes), "Owed", Color::Red),
            (None, None) => ("Who paid?", String::new(), "", Color::White),
        };

        Row::new(vec![
            Cell::from(truncate(person.display_name(), 20)),
            Cell::from(role),
            Cell::from(amount),
            Cell::from(status).style(Style::default().fg(color)),
        ])
    });

    let title = match plan.sub_mode {
        SettleSubMode::OnePayer => " Settle · One Person ",
        SettleSubMode::Everyone => " Settle · Everyone ",
    };

    let table = Table::new(
        rows,
        [
            Constraint::Min(14),
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Yellow)).title(title))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.people_state);
}

fn render_summary(f: &mut Frame, area: Rect, view: &SummaryView) {
    let badge_color = match view.badge {
        Some(Badge::Balanced) | Some(Badge::Collected) => Color::Green,
        Some(Badge::Over) => Color::Red,
        Some(Badge::Remaining) => Color::Yellow,
        None => Color::White,
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", view.covered_label), Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{} {}", view.symbol, view.covered),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(format!("{} ", view.remaining_label), Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{} {}", view.symbol, view.remaining),
            Style::default().fg(badge_color).add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(badge) = view.badge {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("[{}]", badge.label()),
            Style::default().fg(badge_color),
        ));
    }

    let summary = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::White)));
    f.render_widget(summary, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let spans = if let Some(input) = &app.input {
        vec![
            Span::styled(format!(" {}: ", input.target.prompt()), Style::default().fg(Color::Cyan)),
            Span::raw(format!("{}▏", input.buffer)),
            Span::raw("   "),
            key("Enter"),
            Span::raw(" Save | "),
            key("Esc"),
            Span::raw(" Cancel"),
        ]
    } else if let Some(message) = &app.message {
        vec![Span::styled(format!(" {} ", message), Style::default().fg(Color::Red))]
    } else if app.state.view_mode == ViewMode::Settle {
        vec![
            key(" Enter"),
            Span::raw(" Payer/Paid | "),
            key("o"),
            Span::raw(" One/Everyone | "),
            key("c"),
            Span::raw(" Clear payer | "),
            key("v"),
            Span::raw(" Back | "),
            Span::styled("q", Style::default().fg(Color::Red)),
            Span::raw(" Quit"),
        ]
    } else if app.state.assignment_mode.is_active() {
        vec![
            key(" Tab"),
            Span::raw(" Pane | "),
            key("Space"),
            Span::raw(" Toggle | "),
            key("x"),
            Span::raw(" Select all | "),
            key("Enter/Esc"),
            Span::raw(" Done"),
        ]
    } else {
        vec![
            key(" Tab"),
            Span::raw(" Pane | "),
            key("a"),
            Span::raw(" Add | "),
            key("n/p"),
            Span::raw(" Edit | "),
            key("d"),
            Span::raw(" Del | "),
            key("Enter"),
            Span::raw(" Assign | "),
            key("s/m/e"),
            Span::raw(" Modes | "),
            key("t"),
            Span::raw(" Total | "),
            key("v"),
            Span::raw(" Settle | "),
            Span::styled("q", Style::default().fg(Color::Red)),
            Span::raw(" Quit"),
        ]
    };

    let status_bar = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::White)));
    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
