use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use price_analyzer::export::format_unit_price;
use price_analyzer::shell::{parse_query, Query};
use price_analyzer::{Catalog, Record, SourceSummary};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Results,
    Sources,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Results => Page::Sources,
            Page::Sources => Page::Results,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Results => "Search Results",
            Page::Sources => "Sources",
        }
    }
}

pub struct App<'a> {
    pub catalog: &'a Catalog,
    pub sources: Vec<SourceSummary>,
    pub input: String,
    pub last_query: Option<String>,
    pub results: Vec<&'a Record>,
    pub message: Option<String>,
    pub state: TableState,
    pub sources_state: TableState,
    pub current_page: Page,
    pub should_quit: bool,
}

impl<'a> App<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        let mut sources_state = TableState::default();
        sources_state.select(Some(0));

        Self {
            catalog,
            sources: catalog.source_summary(),
            input: String::new(),
            last_query: None,
            results: Vec::new(),
            message: None,
            state: TableState::default(),
            sources_state,
            current_page: Page::Results,
            should_quit: false,
        }
    }

    /// Run whatever is in the input box, same rules as the console loop
    pub fn submit(&mut self) {
        let line = std::mem::take(&mut self.input);

        match parse_query(&line) {
            Query::Exit => self.should_quit = true,
            Query::Empty => self.message = Some("Query can't be empty".to_string()),
            Query::Search(query) => {
                self.results = self.catalog.search(&query);
                self.message = if self.results.is_empty() {
                    Some("Nothing found for your query, try again.".to_string())
                } else {
                    None
                };
                self.state
                    .select(if self.results.is_empty() { None } else { Some(0) });
                self.last_query = Some(query);
                self.current_page = Page::Results;
            }
        }
    }

    pub fn next(&mut self) {
        let len = self.results.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.results.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.results.len();
        if len == 0 {
            return;
        }
        let i = self.state.selected().map(|i| (i + 20).min(len - 1)).unwrap_or(0);
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.results.is_empty() {
            return;
        }
        let i = self.state.selected().map(|i| i.saturating_sub(20)).unwrap_or(0);
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("TUI event loop failed")
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Esc => app.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true
                }
                KeyCode::Enter => app.submit(),
                KeyCode::Tab => app.current_page = app.current_page.next(),
                KeyCode::Backspace => {
                    app.input.pop();
                }
                KeyCode::Char(c) => app.input.push(c),
                KeyCode::Down => app.next(),
                KeyCode::Up => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home if !app.results.is_empty() => app.state.select(Some(0)),
                KeyCode::End if !app.results.is_empty() => {
                    app.state.select(Some(app.results.len() - 1))
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Length(3), // Query input
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_input(f, chunks[1], app);

    match app.current_page {
        Page::Results => render_results(f, chunks[2], app),
        Page::Sources => render_sources(f, chunks[2], app),
    }

    render_status_bar(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in [Page::Results, Page::Sources].iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Records: {}", app.catalog.len()),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Files: {}", app.sources.len()),
        Style::default().fg(Color::Green),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Yellow)),
        Span::raw(app.input.as_str()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Query (\"exit\" to quit) "),
    );

    f.render_widget(input, area);
}

fn render_results(f: &mut Frame, area: Rect, app: &mut App) {
    if let Some(message) = &app.message {
        let notice = Paragraph::new(format!("  {}", message))
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL).title(" Results "));
        f.render_widget(notice, area);
        return;
    }

    let header_cells = ["№", "Name", "Price", "Weight", "File", "Per unit"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.results.iter().enumerate().map(|(i, r)| {
        let cells = vec![
            Cell::from(format!("{}", i + 1)),
            Cell::from(truncate(r.name(), 40)),
            Cell::from(r.price().to_string()),
            Cell::from(r.weight().to_string()),
            Cell::from(truncate(r.source_label(), 24)),
            Cell::from(format_unit_price(r.unit_price())).style(Style::default().fg(Color::Green)),
        ];

        Row::new(cells).height(1)
    });

    let title = match &app.last_query {
        Some(q) => format!(" Results for \"{}\" ({}) ", q, app.results.len()),
        None => " Type a product name and press Enter ".to_string(),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(42),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(26),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_sources(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["File", "Records", "Avg per unit"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.sources.iter().map(|s| {
        Row::new(vec![
            Cell::from(s.source_label.clone()),
            Cell::from(s.count.to_string()),
            Cell::from(format!("{:.1}", s.avg_unit_price)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(30),
            Constraint::Length(10),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Sources - Records per File "),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.sources_state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);

    let status_spans = vec![
        Span::styled(
            format!(" Row: {}/{} ", selected, app.results.len()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Search | "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Page | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Nav | "),
        Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)),
        Span::raw(" Fast | "),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.append(vec![
            Record::new("молоко", 80, 1, "price_a.csv").unwrap(),
            Record::new("молоко топлёное", 90, 2, "price_b.csv").unwrap(),
        ]);
        catalog
    }

    #[test]
    fn test_submit_searches_lowercased() {
        let catalog = catalog();
        let mut app = App::new(&catalog);
        app.input = "  МОЛОКО ".to_string();
        app.submit();

        assert!(app.input.is_empty());
        assert_eq!(app.last_query.as_deref(), Some("молоко"));
        assert_eq!(app.results.len(), 2);
        assert_eq!(app.results[0].name(), "молоко топлёное");
        assert_eq!(app.state.selected(), Some(0));
        assert!(app.message.is_none());
    }

    #[test]
    fn test_submit_empty_and_not_found() {
        let catalog = catalog();
        let mut app = App::new(&catalog);
        app.submit();
        assert_eq!(app.message.as_deref(), Some("Query can't be empty"));

        app.input = "кефир".to_string();
        app.submit();
        assert!(app.results.is_empty());
        assert!(app.message.as_deref().unwrap().starts_with("Nothing found"));
    }

    #[test]
    fn test_submit_exit() {
        let catalog = catalog();
        let mut app = App::new(&catalog);
        app.input = "exit".to_string();
        app.submit();
        assert!(app.should_quit);
    }

    #[test]
    fn test_navigation_wraps() {
        let catalog = catalog();
        let mut app = App::new(&catalog);
        app.input = "молоко".to_string();
        app.submit();
        app.next();
        assert_eq!(app.state.selected(), Some(1));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
        app.previous();
        assert_eq!(app.state.selected(), Some(1));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("молоко", 10), "молоко");
        assert_eq!(truncate("молоко топлёное", 8), "молок...");
    }
}
