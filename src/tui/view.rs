use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
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

use crate::db::SnapshotReader;
use crate::error::{AppError, Result};
use crate::report::format::{fmt_opt2, fmt_pct2, fmt_thousands, short_mint, truncate, MISSING};
use crate::tui::app::{next_index, prev_index, LoadStatus, WatchState};
use crate::types::ScoredToken;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Interactive view of the latest ranking. Returns when the user presses `q`.
pub async fn run(reader: &SnapshotReader, app: &mut WatchState, refresh_secs: u64) -> Result<()> {
    // Initial fetch before rendering
    app.refresh(reader).await;

    enable_raw_mode()?;
    let mut terminal = or_restore(setup_terminal(), restore_terminal)?;

    let mut table_state = TableState::default();
    table_state.select(next_index(None, app.ranked.len()));

    let result = run_loop(
        &mut terminal,
        app,
        reader,
        &mut table_state,
        Duration::from_secs(refresh_secs),
    )
    .await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Best-effort undo of raw mode and the alternate screen.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Run `restore` before propagating a setup failure, so raw mode never outlives an error.
fn or_restore<T>(setup: io::Result<T>, restore: impl FnOnce()) -> Result<T> {
    setup.map_err(|e| {
        restore();
        AppError::from(e)
    })
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut WatchState,
    reader: &SnapshotReader,
    table_state: &mut TableState,
    refresh_interval: Duration,
) -> Result<()> {
    loop {
        terminal
            .draw(|f| render(f, app, table_state, refresh_interval))
            .map_err(|e| AppError::Terminal(e.to_string()))?;

        let timeout = refresh_interval
            .checked_sub(app.last_refresh.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            reload(app, reader, table_state).await;
                        }
                        KeyCode::Down | KeyCode::Char('j') => {
                            table_state.select(next_index(table_state.selected(), app.ranked.len()));
                        }
                        KeyCode::Up | KeyCode::Char('k') => {
                            table_state.select(prev_index(table_state.selected(), app.ranked.len()));
                        }
                        _ => {}
                    }
                }
            }
        }

        if app.last_refresh.elapsed() >= refresh_interval {
            reload(app, reader, table_state).await;
        }
    }
}

async fn reload(app: &mut WatchState, reader: &SnapshotReader, table_state: &mut TableState) {
    app.refresh(reader).await;
    let len = app.ranked.len();
    let keep = match table_state.selected() {
        Some(i) if len > 0 => Some(i.min(len - 1)),
        _ => next_index(None, len),
    };
    table_state.select(keep);
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(f: &mut Frame, app: &WatchState, table_state: &mut TableState, refresh: Duration) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_body(f, app, table_state, chunks[1]);
    render_footer(f, refresh, chunks[2]);
}

fn render_header(f: &mut Frame, app: &WatchState, area: Rect) {
    let (status_text, status_color) = match &app.status {
        LoadStatus::Ready => ("● live".to_string(), Color::Green),
        LoadStatus::Loading => ("◌ loading".to_string(), Color::Yellow),
        LoadStatus::Empty => ("○ no snapshot yet".to_string(), Color::Yellow),
        LoadStatus::Error(e) => (format!("✗ {}", truncate(e, 40)), Color::Red),
    };

    let ts = app.ts.map_or(MISSING.to_string(), |ts| ts.to_string());

    let spans = vec![
        Span::styled(
            " Token Scanner  ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw("  │  "),
        Span::styled(format!("ts={ts}"), Style::default().fg(Color::White)),
        Span::raw("  │  "),
        Span::styled(
            format!("{} tokens", app.ranked.len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  │  "),
        Span::styled(truncate(&app.db_path, 40), Style::default().fg(Color::DarkGray)),
    ];

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(paragraph, area);
}

fn render_body(f: &mut Frame, app: &WatchState, table_state: &mut TableState, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_ranking(f, app, table_state, halves[0]);
    render_detail(f, app.selected(table_state.selected()), halves[1]);
}

fn render_ranking(f: &mut Frame, app: &WatchState, state: &mut TableState, area: Rect) {
    let header_cells = ["#", "Symbol", "Mint", "Score", "Safety"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .ranked
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let score = t.bundle.score;
            Row::new(vec![
                Cell::from(format!("{}", i + 1)).style(Style::default().fg(Color::DarkGray)),
                Cell::from(truncate(t.display_symbol(), 10)),
                Cell::from(short_mint(&t.record.mint)),
                Cell::from(format!("{:.1}", score * 100.0))
                    .style(Style::default().fg(score_color(score))),
                Cell::from(format!("{:.1}", t.bundle.safety * 100.0)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(9),
            Constraint::Length(6),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                " RANKING ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    f.render_stateful_widget(table, area, state);
}

fn render_detail(f: &mut Frame, token: Option<&ScoredToken>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " DETAIL ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let Some(t) = token else {
        f.render_widget(Paragraph::new("no token selected").block(block), area);
        return;
    };

    let b = &t.bundle;
    let r = &t.record;
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} {}", t.display_symbol(), r.mint),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];
    for (label, v) in [
        ("score", b.score),
        ("safety", b.safety),
        ("liq", b.liq),
        ("mkt", b.mkt),
        ("momentum", b.momentum),
        ("flows", b.flows),
        ("distr", b.distr),
    ] {
        lines.push(sub_score_line(label, v));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw(format!(
        "tvl ${}  spread {}%  impact1k {}%",
        r.tvl_usd.map_or(MISSING.to_string(), fmt_thousands),
        fmt_opt2(r.spread_pct).trim(),
        fmt_opt2(r.impact_1k_pct).trim(),
    )));
    lines.push(Line::raw(format!(
        "r5m {}%  r15m {}%  net buy ${}  buyers {}",
        fmt_pct2(r.r_5m).trim(),
        fmt_pct2(r.r_15m).trim(),
        fmt_thousands(r.net_buy_usd_5m),
        r.unique_buyers_5m,
    )));
    lines.push(Line::raw(format!(
        "top10 {}  decimals {}",
        r.top10_pct.map_or(MISSING.to_string(), |p| format!("{:.1}%", p * 100.0)),
        r.decimals,
    )));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn sub_score_line(label: &str, v: f64) -> Line<'static> {
    const BAR: usize = 20;
    let filled = (v.clamp(0.0, 1.0) * BAR as f64).round() as usize;
    Line::from(vec![
        Span::raw(format!("{label:<9}")),
        Span::styled(format!("{v:.3} "), Style::default().fg(score_color(v))),
        Span::styled("█".repeat(filled), Style::default().fg(score_color(v))),
        Span::styled("░".repeat(BAR - filled), Style::default().fg(Color::DarkGray)),
    ])
}

fn render_footer(f: &mut Frame, refresh: Duration, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" [q] ", Style::default().fg(Color::Yellow)),
        Span::raw("quit  "),
        Span::styled("[r] ", Style::default().fg(Color::Yellow)),
        Span::raw("refresh  "),
        Span::styled("[↑↓ / j k] ", Style::default().fg(Color::Yellow)),
        Span::raw("select  "),
        Span::styled(
            format!("auto-refresh: {}s", refresh.as_secs()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(line).style(Style::default().fg(Color::White)), area);
}

fn score_color(v: f64) -> Color {
    if v >= 0.7 {
        Color::Green
    } else if v >= 0.4 {
        Color::Yellow
    } else {
        Color::Red
    }
}
